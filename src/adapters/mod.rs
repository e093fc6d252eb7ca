//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter | Implements  | Connects to                          |
//! |---------|-------------|--------------------------------------|
//! | `http`  | `Transport` | ESP-IDF HTTP client / `ureq` (host)  |
//! | `time`  | `Clock`     | ESP high-res timer / `std` (host)    |
//! | `wifi`  | —           | ESP-IDF WiFi STA / simulation (host) |

pub mod http;
pub mod time;
pub mod wifi;
