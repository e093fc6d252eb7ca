//! Client facade — registry, liveness and poll cycle behind one handle.
//!
//! **Transport-decoupled**: the client does not own a transport or a clock.
//! Both are injected at the call sites, so the whole engine runs unmodified
//! against the ESP-IDF HTTP client on device, `ureq` on a host, or a mock in
//! tests.

use log::info;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

use super::clock::Clock;
use super::codec;
use super::liveness::{ConnectionPolling, LivenessTopics};
use super::poll::{self, PollMode};
use super::registry::{ChannelHandle, ChannelRegistry, StateCallback};
use super::retry::with_retry;
use super::transport::Transport;

/// Synchronizes registered channels with the Floker server.
pub struct FlokerClient {
    config: ClientConfig,
    registry: ChannelRegistry,
    liveness: Option<ConnectionPolling>,
    mode: PollMode,
}

impl FlokerClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            registry: ChannelRegistry::new(),
            liveness: None,
            mode: PollMode::default(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Switch between per-channel and batched polling. Takes effect on the
    /// next [`handle`](Self::handle) call.
    pub fn set_poll_mode(&mut self, mode: PollMode) {
        self.mode = mode;
    }

    /// Number of registered channels, synthetic ones included.
    pub fn channel_count(&self) -> usize {
        self.registry.len()
    }

    // ── Subscriptions ─────────────────────────────────────────

    /// Register a channel with device-path auto-completion applied.
    pub fn subscribe(&mut self, topic: &str, callback: StateCallback) -> ChannelHandle {
        let resolved = self.config.resolve_topic(topic, true);
        self.subscribe_raw(resolved, callback)
    }

    /// Register a channel on a verbatim topic.
    pub fn subscribe_raw(&mut self, topic: String, callback: StateCallback) -> ChannelHandle {
        info!("subscribed to {topic}");
        self.registry.register(topic, callback)
    }

    /// Last observed state of a channel, `None` until its first read.
    pub fn cached_state(&self, handle: ChannelHandle) -> Option<&str> {
        self.registry.get(handle).and_then(|ch| ch.cached_state())
    }

    // ── Connection polling ────────────────────────────────────

    /// Enable the liveness/metadata reporter for `device` (falls back to the
    /// configured device path). Registers the synthetic interval channel, so
    /// call this before the first [`handle`](Self::handle).
    pub fn enable_connection_polling(&mut self, device: Option<&str>) -> Result<()> {
        let device = device
            .or(self.config.device_path.as_deref())
            .ok_or(Error::Config("connection polling needs a device name"))?;
        let polling = ConnectionPolling::new(
            LivenessTopics::for_device(device),
            self.config.device_type.clone(),
        );
        let (topic, callback) = polling.interval_channel();
        self.subscribe_raw(topic, callback);
        self.liveness = Some(polling);
        Ok(())
    }

    /// IP reported in the one-time metadata push. No-op until connection
    /// polling is enabled.
    pub fn set_device_ip(&mut self, ip: &str) {
        if let Some(liveness) = self.liveness.as_mut() {
            liveness.set_device_ip(ip.to_owned());
        }
    }

    // ── Per-cycle entry point ─────────────────────────────────

    /// Run one cycle: liveness first, then one poll pass over every
    /// registered channel. Callbacks for all observed changes complete
    /// before this returns.
    ///
    /// Single-threaded by construction — callbacks cannot reach back into
    /// the client (it is mutably borrowed for the duration of the cycle), so
    /// mid-cycle registration is impossible rather than merely forbidden.
    pub fn handle(&mut self, transport: &mut impl Transport, clock: &impl Clock) {
        if let Some(liveness) = self.liveness.as_mut() {
            liveness.handle(transport, clock.now_ms());
        }
        poll::run_cycle(self.mode, &mut self.registry, transport);
    }

    // ── Direct topic access ───────────────────────────────────
    //
    // Each passthrough comes in an auto-completed and a `_raw` form, the
    // same split as `subscribe`/`subscribe_raw`. The raw form addresses a
    // verbatim topic, e.g. another device's `devices/…` subtree.

    /// One-shot read of a topic (auto-completed), single attempt.
    pub fn read(&self, transport: &mut impl Transport, topic: &str) -> Result<String> {
        self.read_raw(transport, &self.config.resolve_topic(topic, true))
    }

    /// One-shot read of a verbatim topic, single attempt.
    pub fn read_raw(&self, transport: &mut impl Transport, topic: &str) -> Result<String> {
        Ok(transport.read(topic)?)
    }

    /// One-shot write to a topic (auto-completed), single attempt.
    pub fn write(&self, transport: &mut impl Transport, topic: &str, state: &str) -> Result<()> {
        self.write_raw(transport, &self.config.resolve_topic(topic, true), state)
    }

    /// One-shot write to a verbatim topic, single attempt.
    pub fn write_raw(
        &self,
        transport: &mut impl Transport,
        topic: &str,
        state: &str,
    ) -> Result<()> {
        Ok(transport.write(topic, state)?)
    }

    /// Read a topic (auto-completed), retrying per the configured policy.
    pub fn read_forced(
        &self,
        transport: &mut impl Transport,
        clock: &impl Clock,
        topic: &str,
    ) -> Result<String> {
        self.read_forced_raw(transport, clock, &self.config.resolve_topic(topic, true))
    }

    /// Read a verbatim topic, retrying per the configured policy.
    pub fn read_forced_raw(
        &self,
        transport: &mut impl Transport,
        clock: &impl Clock,
        topic: &str,
    ) -> Result<String> {
        Ok(with_retry(self.config.retry, clock, || transport.read(topic))?)
    }

    /// Write a topic (auto-completed), retrying per the configured policy.
    pub fn write_forced(
        &self,
        transport: &mut impl Transport,
        clock: &impl Clock,
        topic: &str,
        state: &str,
    ) -> Result<()> {
        self.write_forced_raw(transport, clock, &self.config.resolve_topic(topic, true), state)
    }

    /// Write a verbatim topic, retrying per the configured policy.
    pub fn write_forced_raw(
        &self,
        transport: &mut impl Transport,
        clock: &impl Clock,
        topic: &str,
        state: &str,
    ) -> Result<()> {
        Ok(with_retry(self.config.retry, clock, || {
            transport.write(topic, state)
        })?)
    }

    /// Read several topics (auto-completed) in one `multi` exchange,
    /// returning their states in request order. The whole batch fails as a
    /// unit on any transport or decode error.
    pub fn read_batch(
        &self,
        transport: &mut impl Transport,
        topics: &[&str],
    ) -> Result<Vec<String>> {
        let resolved: Vec<String> = topics
            .iter()
            .map(|t| self.config.resolve_topic(t, true))
            .collect();
        let refs: Vec<&str> = resolved.iter().map(String::as_str).collect();
        let body = codec::encode_read_batch(&refs)?;
        let response = transport.multi(&body)?;
        Ok(codec::decode_batch_response(&response, topics.len())?)
    }
}
