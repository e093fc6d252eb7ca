//! Connection polling — the built-in liveness/metadata reporter.
//!
//! Two-phase state machine layered on top of the normal poll cycle:
//!
//! - **Uninitialized**: every cycle writes the `"connected"` marker. On the
//!   first cycle whose marker write succeeds, the reporter additionally reads
//!   the server-assigned poll interval once, pushes the static device
//!   metadata (type, library version, IP) and transitions to Initialized.
//! - **Initialized**: the marker is rewritten only once the interval has
//!   elapsed; the static metadata is never pushed again.
//!
//! The interval itself is exposed to the server as one more subscribed
//! channel (see [`ConnectionPolling::interval_channel`]): interval updates
//! ride the ordinary poll-cycle machinery instead of a dedicated path. The
//! cell is shared between the reporter and that channel's callback, so there
//! is no process-wide mutable state.

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, info, warn};

use super::registry::StateCallback;
use super::transport::Transport;

/// Topic subtree all device liveness state lives under.
pub const DEFAULT_POLLING_ROOT: &str = "devices/";
/// Liveness marker topic suffix.
pub const STATE_PATH: &str = "/state";
/// Poll-interval topic suffix.
pub const INTERVAL_PATH: &str = "/interval";
/// Device-type topic suffix.
pub const TYPE_PATH: &str = "/type";
/// Library-version topic suffix.
pub const VERSION_PATH: &str = "/version";
/// Device-IP topic suffix.
pub const IP_PATH: &str = "/ip";

/// Marker value written to the state topic.
pub const CONNECTED_MARKER: &str = "connected";

/// Liveness update interval until the server assigns one.
pub const DEFAULT_INTERVAL_MS: u64 = 10_000;

/// The five topics the reporter touches, derived from the device name.
#[derive(Debug, Clone)]
pub struct LivenessTopics {
    pub state: String,
    pub interval: String,
    pub device_type: String,
    pub version: String,
    pub ip: String,
}

impl LivenessTopics {
    /// Build the default topic tree for `device` under `devices/`.
    pub fn for_device(device: &str) -> Self {
        let base = format!("{DEFAULT_POLLING_ROOT}{device}");
        Self {
            state: format!("{base}{STATE_PATH}"),
            interval: format!("{base}{INTERVAL_PATH}"),
            device_type: format!("{base}{TYPE_PATH}"),
            version: format!("{base}{VERSION_PATH}"),
            ip: format!("{base}{IP_PATH}"),
        }
    }
}

/// Liveness/metadata reporter state.
pub struct ConnectionPolling {
    topics: LivenessTopics,
    device_type: String,
    device_ip: String,
    interval_ms: Rc<Cell<u64>>,
    last_update_ms: u64,
    static_info_pushed: bool,
}

impl ConnectionPolling {
    pub fn new(topics: LivenessTopics, device_type: String) -> Self {
        Self {
            topics,
            device_type,
            device_ip: String::new(),
            interval_ms: Rc::new(Cell::new(DEFAULT_INTERVAL_MS)),
            last_update_ms: 0,
            static_info_pushed: false,
        }
    }

    /// IP reported in the one-time metadata push. Set it before the first
    /// cycle (after the network comes up).
    pub fn set_device_ip(&mut self, ip: String) {
        self.device_ip = ip;
    }

    /// Current liveness update interval in milliseconds.
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms.get()
    }

    /// Whether the one-time metadata push has completed.
    pub fn is_initialized(&self) -> bool {
        self.static_info_pushed
    }

    /// The synthetic channel that lets the server adjust the poll interval:
    /// `(topic, callback)` ready for registration. The callback shares the
    /// interval cell with this reporter.
    pub fn interval_channel(&self) -> (String, StateCallback) {
        let interval = Rc::clone(&self.interval_ms);
        let callback: StateCallback = Box::new(move |state| match state.trim().parse::<u64>() {
            Ok(ms) => {
                info!("poll interval updated to {ms} ms");
                interval.set(ms);
            }
            Err(_) => warn!("ignoring non-numeric poll interval {state:?}"),
        });
        (self.topics.interval.clone(), callback)
    }

    /// Run one liveness step. `now_ms` is a monotonic timestamp.
    ///
    /// Write failures are logged and dropped; an Uninitialized reporter
    /// simply tries again on the next cycle.
    pub fn handle(&mut self, transport: &mut impl Transport, now_ms: u64) {
        if self.static_info_pushed {
            if now_ms.saturating_sub(self.last_update_ms) > self.interval_ms.get()
                && transport
                    .write(&self.topics.state, CONNECTED_MARKER)
                    .is_ok()
            {
                self.last_update_ms = now_ms;
            }
            return;
        }

        // Uninitialized: announce ourselves every cycle until it sticks.
        if let Err(e) = transport.write(&self.topics.state, CONNECTED_MARKER) {
            debug!("liveness write failed ({e}), still unannounced");
            return;
        }
        self.last_update_ms = now_ms;

        // One-shot interval fetch; later updates arrive via the channel.
        match transport.read(&self.topics.interval) {
            Ok(value) => match value.trim().parse::<u64>() {
                Ok(ms) => self.interval_ms.set(ms),
                Err(_) => warn!("server interval {value:?} is not numeric, keeping default"),
            },
            Err(e) => debug!("interval read failed ({e}), keeping default"),
        }

        self.push_static_info(transport);
        self.static_info_pushed = true;
        info!(
            "connection polling initialized, interval {} ms",
            self.interval_ms.get()
        );
    }

    fn push_static_info(&self, transport: &mut impl Transport) {
        let version = env!("CARGO_PKG_VERSION");
        for (topic, value) in [
            (&self.topics.device_type, self.device_type.as_str()),
            (&self.topics.version, version),
            (&self.topics.ip, self.device_ip.as_str()),
        ] {
            if let Err(e) = transport.write(topic, value) {
                warn!("metadata write to {topic} failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_tree_uses_default_paths() {
        let t = LivenessTopics::for_device("dev42");
        assert_eq!(t.state, "devices/dev42/state");
        assert_eq!(t.interval, "devices/dev42/interval");
        assert_eq!(t.device_type, "devices/dev42/type");
        assert_eq!(t.version, "devices/dev42/version");
        assert_eq!(t.ip, "devices/dev42/ip");
    }

    #[test]
    fn interval_channel_updates_shared_cell() {
        let polling = ConnectionPolling::new(LivenessTopics::for_device("d"), "esp32".into());
        let (topic, mut callback) = polling.interval_channel();
        assert_eq!(topic, "devices/d/interval");

        callback("2500");
        assert_eq!(polling.interval_ms(), 2500);

        // Garbage keeps the previous value.
        callback("soon");
        assert_eq!(polling.interval_ms(), 2500);
    }
}
