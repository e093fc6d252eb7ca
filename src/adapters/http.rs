//! HTTP transport adapters.
//!
//! Implements the [`Transport`] port over the platform HTTP stack:
//!
//! - **`target_os = "espidf"`** — [`EspHttpTransport`], one
//!   `EspHttpConnection` per exchange via the `embedded-svc` client traits.
//! - **`not(target_os = "espidf")`** — [`UreqTransport`], a blocking `ureq`
//!   agent with connect/read timeouts for host-side tools.
//!
//! Both follow the wire contract from [`client::codec`](crate::client::codec):
//! reads and writes are query-string GETs, batched tasks are one POST with a
//! JSON array body. Success is exactly HTTP 200; connections are not reused
//! across calls.

use crate::client::codec;
use crate::client::transport::{Transport, TransportError};
use crate::config::ClientConfig;

// ───────────────────────────────────────────────────────────────
// ESP-IDF implementation
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp_impl::EspHttpTransport;

#[cfg(target_os = "espidf")]
mod esp_impl {
    use embedded_svc::http::client::Client;
    use embedded_svc::io::Write as _;
    use esp_idf_svc::http::client::{Configuration, EspHttpConnection};

    use super::{ClientConfig, Transport, TransportError, codec};

    /// One-connection-per-request HTTP transport over ESP-IDF.
    pub struct EspHttpTransport {
        base_url: String,
        token: String,
        secure: bool,
    }

    impl EspHttpTransport {
        pub fn new(config: &ClientConfig) -> Self {
            Self {
                base_url: config.base_url(),
                token: config.token.clone(),
                secure: config.secure,
            }
        }

        fn connect(&self) -> Result<Client<EspHttpConnection>, TransportError> {
            let connection = EspHttpConnection::new(&Configuration {
                use_global_ca_store: self.secure,
                crt_bundle_attach: if self.secure {
                    Some(esp_idf_svc::sys::esp_crt_bundle_attach)
                } else {
                    None
                },
                ..Default::default()
            })
            .map_err(|e| TransportError::Connection(e.to_string()))?;
            Ok(Client::wrap(connection))
        }

        fn get(&self, uri: &str) -> Result<String, TransportError> {
            let mut client = self.connect()?;
            let request = client
                .get(uri)
                .map_err(|e| TransportError::Connection(format!("{e:?}")))?;
            let response = request
                .submit()
                .map_err(|e| TransportError::Connection(format!("{e:?}")))?;
            read_ok_body(response)
        }

        fn post(&self, uri: &str, body: &str) -> Result<String, TransportError> {
            let length = body.len().to_string();
            let headers = [
                ("Content-Type", "application/json"),
                ("Content-Length", length.as_str()),
            ];
            let mut client = self.connect()?;
            let mut request = client
                .post(uri, &headers)
                .map_err(|e| TransportError::Connection(format!("{e:?}")))?;
            request
                .write_all(body.as_bytes())
                .map_err(|e| TransportError::Io(format!("{e:?}")))?;
            let response = request
                .submit()
                .map_err(|e| TransportError::Connection(format!("{e:?}")))?;
            read_ok_body(response)
        }
    }

    fn read_ok_body<R>(mut response: R) -> Result<String, TransportError>
    where
        R: embedded_svc::http::Status + embedded_svc::io::Read,
        R::Error: core::fmt::Debug,
    {
        let status = response.status();
        if status != 200 {
            return Err(TransportError::Status(status));
        }
        let mut body = Vec::new();
        let mut chunk = [0u8; 256];
        loop {
            let n = response
                .read(&mut chunk)
                .map_err(|e| TransportError::Io(format!("{e:?}")))?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..n]);
        }
        String::from_utf8(body).map_err(|e| TransportError::Io(e.to_string()))
    }

    impl Transport for EspHttpTransport {
        fn read(&mut self, topic: &str) -> Result<String, TransportError> {
            self.get(&codec::read_uri(&self.base_url, &self.token, topic))
        }

        fn write(&mut self, topic: &str, state: &str) -> Result<(), TransportError> {
            self.get(&codec::write_uri(&self.base_url, &self.token, topic, state))
                .map(|_| ())
        }

        fn multi(&mut self, body: &str) -> Result<String, TransportError> {
            self.post(&codec::multi_uri(&self.base_url, &self.token), body)
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Host implementation
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub use host_impl::UreqTransport;

#[cfg(not(target_os = "espidf"))]
mod host_impl {
    use std::time::Duration;

    use super::{ClientConfig, Transport, TransportError, codec};

    /// Blocking HTTP transport for host-side use against a real server.
    pub struct UreqTransport {
        agent: ureq::Agent,
        base_url: String,
        token: String,
    }

    impl UreqTransport {
        pub fn new(config: &ClientConfig) -> Self {
            Self {
                agent: ureq::AgentBuilder::new()
                    .timeout_connect(Duration::from_secs(5))
                    .timeout_read(Duration::from_secs(10))
                    .build(),
                base_url: config.base_url(),
                token: config.token.clone(),
            }
        }

        fn get(&self, uri: &str) -> Result<String, TransportError> {
            let response = self.agent.get(uri).call().map_err(map_ureq)?;
            response
                .into_string()
                .map_err(|e| TransportError::Io(e.to_string()))
        }
    }

    fn map_ureq(e: ureq::Error) -> TransportError {
        match e {
            ureq::Error::Status(code, _) => TransportError::Status(code),
            ureq::Error::Transport(t) => TransportError::Connection(t.to_string()),
        }
    }

    impl Transport for UreqTransport {
        fn read(&mut self, topic: &str) -> Result<String, TransportError> {
            self.get(&codec::read_uri(&self.base_url, &self.token, topic))
        }

        fn write(&mut self, topic: &str, state: &str) -> Result<(), TransportError> {
            self.get(&codec::write_uri(&self.base_url, &self.token, topic, state))
                .map(|_| ())
        }

        fn multi(&mut self, body: &str) -> Result<String, TransportError> {
            let response = self
                .agent
                .post(&codec::multi_uri(&self.base_url, &self.token))
                .set("Content-Type", "application/json")
                .send_string(body)
                .map_err(map_ureq)?;
            response
                .into_string()
                .map_err(|e| TransportError::Io(e.to_string()))
        }
    }
}
