//! Streaming location-sample filter
//!
//! Raw GPS/network fixes are noisy: accuracy varies per fix and occasional
//! readings imply impossible movement. This crate decides, one fix at a time,
//! whether a candidate becomes the new confirmed point or is discarded,
//! using a lightweight heuristic instead of a full statistical filter.
//!
//! The decision itself is the pure [`PointAcceptanceFilter`]; the latest
//! accepted point lives behind the [`PointStore`] seam, and [`FixProcessor`]
//! wires the two together into the retrieve-evaluate-store cycle a caller
//! would otherwise write by hand.

pub mod core;
pub mod filter;
pub mod geodesy;
pub mod processor;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{
    Decision, Point, ACCURACY_TOLERANCE_PERCENT, TIME_THRESHOLD_MS, VELOCITY_THRESHOLD_MPS,
};
pub use crate::filter::{DecisionReason, Evaluation, FilterParams, PointAcceptanceFilter};
pub use crate::geodesy::haversine_distance_m;
pub use crate::processor::{AcceptedPointCallback, CallbackHandle, FixProcessor};
pub use crate::store::{JsonPointStore, MemoryPointStore, PointStore, StoreError};
pub use crate::utils::config::{ConfigError, FilterConfig};
