//! Policy constants for the acceptance heuristic

/// Maximum age of the last accepted point before any candidate is admitted
/// regardless of accuracy (milliseconds)
pub const TIME_THRESHOLD_MS: i64 = 30_000;

/// A worse-accuracy fix from the same provider is tolerated while its
/// degradation stays within previous accuracy divided by this factor
pub const ACCURACY_TOLERANCE_PERCENT: f64 = 10.0;

/// Implied speeds above this are treated as physically implausible (m/s)
pub const VELOCITY_THRESHOLD_MPS: f64 = 200.0;
