//! Read-evaluate-write pipeline around the acceptance filter
//!
//! Wires a [`PointStore`] to the [`PointAcceptanceFilter`]: each incoming fix
//! is evaluated against the stored latest point, persisted on acceptance, and
//! forwarded to registered callbacks. Taking `&mut self` serializes the cycle
//! per processor, which is the ordering the filter's contract requires.

use crate::core::{Decision, Point};
use crate::filter::PointAcceptanceFilter;
use crate::store::{PointStore, StoreError};
use std::collections::HashMap;
use tracing::debug;

/// Callback invoked with every accepted point
pub type AcceptedPointCallback = Box<dyn Fn(&Point) + Send>;

/// Handle identifying a registered callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Streaming fix processor for one tracked entity
pub struct FixProcessor<S: PointStore> {
    store: S,
    filter: PointAcceptanceFilter,
    callbacks: HashMap<CallbackHandle, AcceptedPointCallback>,
    callback_counter: u32,
    accepted: u64,
    rejected: u64,
}

impl<S: PointStore> FixProcessor<S> {
    /// Create a processor with the reference filter thresholds
    pub fn new(store: S) -> Self {
        Self::with_filter(store, PointAcceptanceFilter::new())
    }

    /// Create a processor with a custom filter
    pub fn with_filter(store: S, filter: PointAcceptanceFilter) -> Self {
        Self {
            store,
            filter,
            callbacks: HashMap::new(),
            callback_counter: 0,
            accepted: 0,
            rejected: 0,
        }
    }

    /// Evaluate one fix against the stored latest point, persisting it and
    /// notifying callbacks when it is accepted.
    pub fn process_fix(&mut self, fix: Point) -> Result<Decision, StoreError> {
        let last_accepted = self.store.retrieve_latest()?;
        let evaluation = self.filter.evaluate_detailed(&fix, last_accepted.as_ref());

        match evaluation.decision {
            Decision::Accept => {
                debug!(
                    provider = %fix.provider,
                    reason = ?evaluation.reason,
                    distance_m = evaluation.distance_m,
                    elapsed_ms = evaluation.elapsed_ms,
                    velocity_mps = evaluation.velocity_mps,
                    "adding point"
                );
                self.store.store(fix.clone())?;
                self.accepted += 1;
                for callback in self.callbacks.values() {
                    callback(&fix);
                }
            }
            Decision::Reject => {
                debug!(
                    provider = %fix.provider,
                    reason = ?evaluation.reason,
                    distance_m = evaluation.distance_m,
                    elapsed_ms = evaluation.elapsed_ms,
                    velocity_mps = evaluation.velocity_mps,
                    "ignoring point"
                );
                self.rejected += 1;
            }
        }

        Ok(evaluation.decision)
    }

    /// Register a callback invoked with every accepted point
    pub fn register_accepted_callback(&mut self, callback: AcceptedPointCallback) -> CallbackHandle {
        self.callback_counter += 1;
        let handle = CallbackHandle(self.callback_counter);
        self.callbacks.insert(handle, callback);
        handle
    }

    /// Remove a previously registered callback; returns whether it existed
    pub fn unregister_callback(&mut self, handle: CallbackHandle) -> bool {
        self.callbacks.remove(&handle).is_some()
    }

    /// Total fixes accepted and rejected so far
    pub fn counts(&self) -> (u64, u64) {
        (self.accepted, self.rejected)
    }

    pub fn filter(&self) -> &PointAcceptanceFilter {
        &self.filter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the processor and return its store
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryPointStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn fix(latitude: f64, accuracy: f64, timestamp: i64) -> Point {
        Point::new(latitude, -122.0, accuracy, timestamp, "gps")
    }

    #[test]
    fn test_first_fix_is_stored() {
        let mut processor = FixProcessor::new(MemoryPointStore::new());

        let decision = processor.process_fix(fix(37.0, 20.0, 1_000)).unwrap();

        assert_eq!(decision, Decision::Accept);
        let latest = processor.store().retrieve_latest().unwrap().unwrap();
        assert_eq!(latest.timestamp, 1_000);
    }

    #[test]
    fn test_rejected_fix_leaves_store_unchanged() {
        let mut processor = FixProcessor::new(MemoryPointStore::new());
        processor.process_fix(fix(37.0, 20.0, 1_000)).unwrap();

        // Worse accuracy, inside the time window: rejected
        let decision = processor.process_fix(fix(37.0, 60.0, 5_000)).unwrap();

        assert_eq!(decision, Decision::Reject);
        let latest = processor.store().retrieve_latest().unwrap().unwrap();
        assert_eq!(latest.timestamp, 1_000);
        assert_eq!(processor.counts(), (1, 1));
    }

    #[test]
    fn test_accepted_fix_becomes_new_reference() {
        let mut processor = FixProcessor::new(MemoryPointStore::new());
        processor.process_fix(fix(37.0, 20.0, 1_000)).unwrap();
        processor.process_fix(fix(37.0005, 15.0, 6_000)).unwrap();

        // Evaluated against the second fix, not the first: 31 s after the
        // first fix but only 26 s after the second, and accuracy got worse,
        // so this is rejected
        let decision = processor.process_fix(fix(37.001, 30.0, 32_000)).unwrap();

        assert_eq!(decision, Decision::Reject);
        let latest = processor.store().retrieve_latest().unwrap().unwrap();
        assert_eq!(latest.timestamp, 6_000);
    }

    #[test]
    fn test_callbacks_fire_only_on_accept() {
        let mut processor = FixProcessor::new(MemoryPointStore::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        processor.register_accepted_callback(Box::new(move |_point| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        processor.process_fix(fix(37.0, 20.0, 1_000)).unwrap();
        processor.process_fix(fix(37.0, 60.0, 5_000)).unwrap();
        processor.process_fix(fix(37.0, 10.0, 9_000)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unregistered_callback_no_longer_fires() {
        let mut processor = FixProcessor::new(MemoryPointStore::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = processor.register_accepted_callback(Box::new(move |_point| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(handle.id(), 1);

        assert!(processor.unregister_callback(handle));
        assert!(!processor.unregister_callback(handle));

        processor.process_fix(fix(37.0, 20.0, 1_000)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_into_store_returns_store_with_latest_point() {
        let mut processor = FixProcessor::new(MemoryPointStore::new());
        processor.process_fix(fix(37.0, 20.0, 1_000)).unwrap();

        let store = processor.into_store();

        let latest = store.retrieve_latest().unwrap().unwrap();
        assert_eq!(latest.timestamp, 1_000);
    }
}
