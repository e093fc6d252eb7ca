//! Channel-synchronization core.
//!
//! Keeps a set of registered channels (topic → callback → cached state) in
//! sync with the Floker server by periodic polling:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      FlokerClient                            │
//! │                                                              │
//! │  ┌───────────┐   ┌──────────┐   ┌────────────────────────┐  │
//! │  │ Liveness  │──▶│  Poll    │──▶│  ChannelRegistry       │  │
//! │  │ (reporter)│   │  cycle   │   │  topic · cb · cache    │  │
//! │  └───────────┘   └──────────┘   └────────────────────────┘  │
//! │        │              │                                      │
//! │        ▼              ▼                                      │
//! │  ┌──────────┐   ┌──────────┐                                │
//! │  │ Transport │◀──│  Codec   │   (uri + task envelopes)      │
//! │  │ (trait)   │   │          │                                │
//! │  └──────────┘   └──────────┘                                │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs synchronously inside [`FlokerClient::handle`]: one call
//! drives the liveness reporter, then one poll cycle over every registered
//! channel, invoking callbacks for each observed state change before
//! returning. There is no background task and no locking.

pub mod clock;
pub mod codec;
pub mod engine;
pub mod liveness;
pub mod poll;
pub mod registry;
pub mod retry;
pub mod transport;

pub use clock::Clock;
pub use engine::FlokerClient;
pub use poll::PollMode;
pub use registry::{ChannelHandle, ChannelRegistry, StateCallback};
pub use retry::RetryPolicy;
pub use transport::{Transport, TransportError};
