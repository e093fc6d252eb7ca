//! WiFi station-mode bootstrap.
//!
//! Connection establishment is a collaborator of the sync core, not part of
//! it — the client only needs the assigned IP for the liveness metadata
//! push. This adapter therefore stays deliberately thin: validate the
//! credentials, block until the station is up, hand back the IP.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: blocking `esp_idf_svc::wifi` station connect.
//! - **all other targets**: simulation stub for host-side tests.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Errors & validation
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WifiError {
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed(String),
}

impl fmt::Display for WifiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::ConnectionFailed(msg) => write!(f, "WiFi connection failed: {msg}"),
        }
    }
}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_credentials(ssid: &str, password: &str) -> Result<(), WifiError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(WifiError::InvalidSsid);
    }
    if !password.is_empty() && (password.len() < 8 || password.len() > 64) {
        return Err(WifiError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Station bootstrap
// ───────────────────────────────────────────────────────────────

/// Blocking station connect; returns the driver handle and assigned IP.
#[cfg(target_os = "espidf")]
pub fn connect_station(
    modem: esp_idf_hal::modem::Modem,
    ssid: &str,
    password: &str,
) -> Result<(Box<esp_idf_svc::wifi::EspWifi<'static>>, String), WifiError> {
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::info;

    validate_credentials(ssid, password)?;

    let sys_loop =
        EspSystemEventLoop::take().map_err(|e| WifiError::ConnectionFailed(e.to_string()))?;
    let nvs =
        EspDefaultNvsPartition::take().map_err(|e| WifiError::ConnectionFailed(e.to_string()))?;

    let mut esp_wifi = Box::new(
        EspWifi::new(modem, sys_loop.clone(), Some(nvs))
            .map_err(|e| WifiError::ConnectionFailed(e.to_string()))?,
    );
    let mut wifi = BlockingWifi::wrap(esp_wifi.as_mut(), sys_loop)
        .map_err(|e| WifiError::ConnectionFailed(e.to_string()))?;

    let auth_method = if password.is_empty() {
        AuthMethod::None
    } else {
        AuthMethod::WPA2Personal
    };
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: ssid.try_into().map_err(|()| WifiError::InvalidSsid)?,
        password: password.try_into().map_err(|()| WifiError::InvalidPassword)?,
        auth_method,
        ..Default::default()
    }))
    .map_err(|e| WifiError::ConnectionFailed(e.to_string()))?;

    info!("connecting to {ssid}");
    wifi.start()
        .map_err(|e| WifiError::ConnectionFailed(e.to_string()))?;
    wifi.connect()
        .map_err(|e| WifiError::ConnectionFailed(e.to_string()))?;
    wifi.wait_netif_up()
        .map_err(|e| WifiError::ConnectionFailed(e.to_string()))?;

    let ip = esp_wifi
        .sta_netif()
        .get_ip_info()
        .map_err(|e| WifiError::ConnectionFailed(e.to_string()))?
        .ip
        .to_string();
    info!("connected, ip {ip}");
    Ok((esp_wifi, ip))
}

/// Simulation stub: always "connects" with a loopback IP.
#[cfg(not(target_os = "espidf"))]
pub fn connect_station(ssid: &str, password: &str) -> Result<String, WifiError> {
    validate_credentials(ssid, password)?;
    log::info!("WiFi(sim): pretending to join {ssid}");
    Ok(String::from("127.0.0.1"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_validation() {
        assert_eq!(
            validate_credentials("", "password1"),
            Err(WifiError::InvalidSsid)
        );
        assert_eq!(
            validate_credentials("net", "short"),
            Err(WifiError::InvalidPassword)
        );
        assert_eq!(validate_credentials("net", ""), Ok(())); // open network
        assert_eq!(validate_credentials("net", "password1"), Ok(()));
    }
}
