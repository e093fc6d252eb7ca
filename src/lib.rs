//! Floker device client library.
//!
//! Keeps locally registered channels — topic/callback bindings — in sync
//! with a Floker HTTP key/value server by periodic polling, invoking each
//! callback exactly when its topic's remote state changes.
//!
//! The core is platform-agnostic and fully testable on the host; all
//! ESP-IDF-specific code lives in [`adapters`] behind
//! `#[cfg(target_os = "espidf")]`.
//!
//! ```no_run
//! use floker_client::adapters::time::MonotonicClock;
//! use floker_client::client::transport::NullTransport;
//! use floker_client::{ClientConfig, FlokerClient};
//!
//! let mut config = ClientConfig::new("floker.example", "token");
//! config.device_path = Some(String::from("lamp42"));
//!
//! let mut client = FlokerClient::new(config);
//! client.subscribe("/power", Box::new(|state| println!("power -> {state}")));
//!
//! let mut transport = NullTransport; // EspHttpTransport / UreqTransport in real use
//! let clock = MonotonicClock::new();
//! loop {
//!     client.handle(&mut transport, &clock);
//! }
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod client;
pub mod config;
pub mod error;

pub use client::{
    ChannelHandle, ChannelRegistry, Clock, FlokerClient, PollMode, RetryPolicy, StateCallback,
    Transport, TransportError,
};
pub use config::ClientConfig;
pub use error::{Error, Result};
