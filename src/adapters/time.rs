//! ESP32 time adapter.
//!
//! Implements the [`Clock`] port for the liveness reporter and retry helper.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic) and
//!   the FreeRTOS task delay.
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` and
//!   `std::thread::sleep` for host-side testing and simulation.

use crate::client::Clock;

/// Monotonic clock for the current platform.
pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(target_os = "espidf")]
impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000
    }

    fn sleep_ms(&self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }
}

#[cfg(not(target_os = "espidf"))]
impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn sleep_ms(&self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
