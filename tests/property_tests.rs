//! Property tests for the channel registry's ordering and change-detection
//! invariants.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32 targets.
//! On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use std::cell::RefCell;
use std::rc::Rc;

use floker_client::ChannelRegistry;
use proptest::prelude::*;

proptest! {
    /// Registration preserves the exact topic sequence, whatever the topics
    /// are (duplicates included), and every fresh channel starts unobserved.
    #[test]
    fn registration_preserves_order(
        topics in proptest::collection::vec("[a-z0-9/_]{0,20}", 0..50),
    ) {
        let mut reg = ChannelRegistry::new();
        for topic in &topics {
            reg.register(topic.clone(), Box::new(|_| {}));
        }

        let registered: Vec<String> = reg.topics().map(str::to_owned).collect();
        prop_assert_eq!(&registered, &topics);
        for ch in reg.iter_mut() {
            prop_assert_eq!(ch.cached_state(), None);
        }
    }

    /// For any observed state sequence, the callback fires exactly once per
    /// consecutive distinct value — never for a repeat of the cached state —
    /// and the cache always ends up at the last observed value.
    #[test]
    fn callback_fires_once_per_distinct_observation(
        states in proptest::collection::vec("[a-z]{0,3}", 1..40),
    ) {
        let observed: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&observed);

        let mut reg = ChannelRegistry::new();
        reg.register(
            String::from("topic"),
            Box::new(move |s| sink.borrow_mut().push(s.to_owned())),
        );

        for state in &states {
            for ch in reg.iter_mut() {
                ch.apply(state);
            }
        }

        let mut expected: Vec<String> = Vec::new();
        for state in &states {
            if expected.last() != Some(state) {
                expected.push(state.clone());
            }
        }
        prop_assert_eq!(&*observed.borrow(), &expected);

        let last = states.last().cloned();
        for ch in reg.iter_mut() {
            prop_assert_eq!(ch.cached_state(), last.as_deref());
        }
    }
}
