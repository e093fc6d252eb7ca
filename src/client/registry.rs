//! Channel registry — ordered topic/callback/cache bindings.
//!
//! Registration is append-only: a channel lives for the process lifetime and
//! its position in the registry never changes. Order matters — batched-mode
//! request/response correlation is positional — so iteration always yields
//! channels in registration order.
//!
//! Topics are not deduplicated: registering the same topic twice yields two
//! independent channels with independent callbacks and caches, and both fire
//! on the same remote change.

/// Callback invoked with the newly observed state of a channel's topic.
pub type StateCallback = Box<dyn FnMut(&str)>;

/// Index-based handle to a registered channel, stable for the process
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelHandle(usize);

/// One topic → callback binding with its last-observed state.
///
/// The cache starts as `None` ("never observed") — distinct from every
/// possible server value, so the first observed value always counts as a
/// change.
pub struct Channel {
    topic: String,
    callback: StateCallback,
    cached: Option<String>,
}

impl Channel {
    fn new(topic: String, callback: StateCallback) -> Self {
        Self {
            topic,
            callback,
            cached: None,
        }
    }

    /// The remote topic this channel tracks.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Last observed state, `None` until the first successful read.
    pub fn cached_state(&self) -> Option<&str> {
        self.cached.as_deref()
    }

    /// Apply a freshly observed state: if it differs from the cache (or the
    /// channel has never observed a value), invoke the callback exactly once
    /// and update the cache. Returns whether the callback fired.
    pub fn apply(&mut self, new_state: &str) -> bool {
        if self.cached.as_deref() == Some(new_state) {
            return false;
        }
        (self.callback)(new_state);
        self.cached = Some(new_state.to_owned());
        true
    }
}

/// Insertion-ordered, append-only collection of channels.
///
/// Backed by a `Vec`, so growth re-homes the storage with every existing
/// channel's topic, callback and cached state carried over intact. Handles
/// are indices and stay valid forever; there is no unregister. Allocation
/// failure aborts the process — the hard embedded constraint, with no
/// recovery path.
#[derive(Default)]
pub struct ChannelRegistry {
    channels: Vec<Channel>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a channel; its cached state starts unobserved.
    pub fn register(&mut self, topic: String, callback: StateCallback) -> ChannelHandle {
        self.channels.push(Channel::new(topic, callback));
        ChannelHandle(self.channels.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn get(&self, handle: ChannelHandle) -> Option<&Channel> {
        self.channels.get(handle.0)
    }

    /// Topics in registration order.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(Channel::topic)
    }

    /// Channels in registration order, mutable for the poll cycle.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Channel> {
        self.channels.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn registration_preserves_order_and_sentinel() {
        let mut reg = ChannelRegistry::new();
        for topic in ["a", "b", "c"] {
            reg.register(topic.into(), Box::new(|_| {}));
        }
        let topics: Vec<&str> = reg.topics().collect();
        assert_eq!(topics, ["a", "b", "c"]);
        for ch in reg.iter_mut() {
            assert_eq!(ch.cached_state(), None);
        }
    }

    #[test]
    fn first_observation_always_fires() {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&fired);
        let mut ch = Channel::new("t".into(), Box::new(move |s| sink.borrow_mut().push(s.to_owned())));

        assert!(ch.apply("v1"));
        assert!(!ch.apply("v1"));
        assert!(ch.apply("v2"));
        assert_eq!(*fired.borrow(), ["v1", "v2"]);
        assert_eq!(ch.cached_state(), Some("v2"));
    }

    #[test]
    fn duplicate_topics_are_independent_channels() {
        let hits = Rc::new(RefCell::new(0u32));
        let mut reg = ChannelRegistry::new();
        for _ in 0..2 {
            let h = Rc::clone(&hits);
            reg.register("same".into(), Box::new(move |_| *h.borrow_mut() += 1));
        }
        for ch in reg.iter_mut() {
            ch.apply("v");
        }
        assert_eq!(*hits.borrow(), 2);
    }

    #[test]
    fn handles_survive_growth() {
        let mut reg = ChannelRegistry::new();
        let first = reg.register("first".into(), Box::new(|_| {}));
        for i in 0..100 {
            reg.register(format!("t{i}"), Box::new(|_| {}));
        }
        assert_eq!(reg.get(first).map(Channel::topic), Some("first"));
    }
}
