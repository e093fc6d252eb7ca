//! Client configuration parameters
//!
//! Everything needed to reach the Floker server: scheme, host, port, root
//! path and access token, plus the optional device path used for topic
//! auto-completion. Values are supplied once at construction (typically from
//! NVS or compile-time constants in the firmware binary).

use serde::{Deserialize, Serialize};

use crate::client::retry::RetryPolicy;

/// URL scheme for TLS connections.
pub const HTTPS_SCHEME: &str = "https://";
/// URL scheme for plain connections.
pub const HTTP_SCHEME: &str = "http://";

/// Default server port when `secure` is set.
pub const HTTPS_PORT: u16 = 443;
/// Default server port for plain HTTP.
pub const HTTP_PORT: u16 = 80;

/// Prefix prepended to subscribed topics when a device path is configured.
pub const IOT_PATH_PREFIX: &str = "iot/";

/// Core client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Use HTTPS instead of HTTP.
    pub secure: bool,
    /// Server hostname or IP.
    pub host: String,
    /// Server port; `None` selects 443/80 from `secure`.
    pub port: Option<u16>,
    /// Root path on the server, e.g. `"/floker/"`. Must start with `/`.
    pub root_path: String,
    /// Opaque access token passed through on every request.
    pub token: String,
    /// Device path for topic auto-completion (`iot/{device_path}{topic}`)
    /// and for the liveness topic tree. `None` disables auto-completion.
    pub device_path: Option<String>,
    /// Device type reported by connection polling.
    pub device_type: String,
    /// Retry policy applied by the forced read/write variants.
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Configuration for a plain-HTTP server with sensible defaults.
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            secure: false,
            host: host.into(),
            port: None,
            root_path: String::from("/"),
            token: token.into(),
            device_path: None,
            device_type: String::from(default_device_type()),
            retry: RetryPolicy::default(),
        }
    }

    /// Effective server port.
    pub fn port(&self) -> u16 {
        self.port
            .unwrap_or(if self.secure { HTTPS_PORT } else { HTTP_PORT })
    }

    /// `{scheme}{host}:{port}{root_path}` — the base every request URI
    /// starts from.
    pub fn base_url(&self) -> String {
        let scheme = if self.secure { HTTPS_SCHEME } else { HTTP_SCHEME };
        format!("{}{}:{}{}", scheme, self.host, self.port(), self.root_path)
    }

    /// Apply device-path auto-completion to a topic.
    ///
    /// With `device_path = Some("kitchen/lamp")`, the topic `"/power"`
    /// resolves to `"iot/kitchen/lamp/power"`. Without a device path (or
    /// with `autocomplete = false`) the topic is used verbatim.
    pub fn resolve_topic(&self, topic: &str, autocomplete: bool) -> String {
        match &self.device_path {
            Some(device) if autocomplete => format!("{IOT_PATH_PREFIX}{device}{topic}"),
            _ => topic.to_owned(),
        }
    }
}

/// Device type reported when the caller doesn't override it.
pub fn default_device_type() -> &'static str {
    if cfg!(target_os = "espidf") {
        "esp32"
    } else {
        "host"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ports_follow_scheme() {
        let mut c = ClientConfig::new("floker.example", "tok");
        assert_eq!(c.port(), 80);
        c.secure = true;
        assert_eq!(c.port(), 443);
        c.port = Some(8080);
        assert_eq!(c.port(), 8080);
    }

    #[test]
    fn base_url_composition() {
        let mut c = ClientConfig::new("floker.example", "tok");
        c.root_path = String::from("/floker/");
        assert_eq!(c.base_url(), "http://floker.example:80/floker/");
        c.secure = true;
        c.port = None;
        assert_eq!(c.base_url(), "https://floker.example:443/floker/");
    }

    #[test]
    fn topic_autocompletion() {
        let mut c = ClientConfig::new("h", "t");
        assert_eq!(c.resolve_topic("/led", true), "/led");
        c.device_path = Some(String::from("kitchen/lamp"));
        assert_eq!(c.resolve_topic("/led", true), "iot/kitchen/lamp/led");
        assert_eq!(c.resolve_topic("/led", false), "/led");
    }

    #[test]
    fn serde_roundtrip() {
        let mut c = ClientConfig::new("floker.example", "tok");
        c.device_path = Some(String::from("dev42"));
        let json = serde_json::to_string(&c).unwrap();
        let c2: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c2.host, "floker.example");
        assert_eq!(c2.device_path.as_deref(), Some("dev42"));
        assert_eq!(c2.retry, c.retry);
    }
}
