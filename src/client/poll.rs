//! Poll-cycle dispatch — one pass over the registry per `handle()` call.
//!
//! Two modes share the same change-detection rule (fire the callback iff the
//! observed value differs from the cache, then update the cache):
//!
//! - **Classic**: one `Transport::read` per channel. A failing topic leaves
//!   that channel untouched and never blocks the others.
//! - **Batched**: one `Transport::multi` covering every channel, correlated
//!   positionally. Any transport or decode failure drops the whole batch —
//!   no channel is updated, no partial application.
//!
//! Channels are processed strictly in registry order and callbacks run
//! sequentially on the calling thread.

use log::{debug, warn};

use super::codec;
use super::registry::ChannelRegistry;
use super::transport::Transport;

/// How one poll cycle talks to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollMode {
    /// One read request per channel per cycle.
    Classic,
    /// One aggregated multi request per cycle.
    #[default]
    Batched,
}

/// Run one poll cycle over every registered channel.
///
/// Never surfaces an error: failures are logged and the affected channels
/// simply keep their cached state until the next cycle.
pub fn run_cycle(mode: PollMode, registry: &mut ChannelRegistry, transport: &mut impl Transport) {
    if registry.is_empty() {
        return;
    }
    match mode {
        PollMode::Classic => classic_cycle(registry, transport),
        PollMode::Batched => batched_cycle(registry, transport),
    }
}

fn classic_cycle(registry: &mut ChannelRegistry, transport: &mut impl Transport) {
    for channel in registry.iter_mut() {
        match transport.read(channel.topic()) {
            Ok(state) => {
                if channel.apply(&state) {
                    debug!("{}: state changed to {state:?}", channel.topic());
                }
            }
            Err(e) => {
                // Per-channel isolation: skip, keep cache, carry on.
                debug!("{}: read failed ({e}), skipping", channel.topic());
            }
        }
    }
}

fn batched_cycle(registry: &mut ChannelRegistry, transport: &mut impl Transport) {
    let body = {
        let topics: Vec<&str> = registry.topics().collect();
        match codec::encode_read_batch(&topics) {
            Ok(body) => body,
            Err(e) => {
                warn!("batch encode failed: {e}");
                return;
            }
        }
    };

    let response = match transport.multi(&body) {
        Ok(response) => response,
        Err(e) => {
            debug!("multi request failed ({e}), cycle dropped");
            return;
        }
    };

    let states = match codec::decode_batch_response(&response, registry.len()) {
        Ok(states) => states,
        Err(e) => {
            warn!("batch response rejected: {e}");
            return;
        }
    };

    // Positional pairing: response[i] belongs to registry[i].
    for (channel, state) in registry.iter_mut().zip(states) {
        if channel.apply(&state) {
            debug!("{}: state changed to {state:?}", channel.topic());
        }
    }
}
