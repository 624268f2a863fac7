//! One-shot accept/reject decision for candidate location fixes
//!
//! The filter compares a candidate fix against the most recently accepted
//! point and admits it when the implied movement is physically plausible and
//! the fix either improves accuracy, follows a long gap, or degrades accuracy
//! only marginally. It holds no mutable state; the latest accepted point
//! lives with the caller (see [`crate::store::PointStore`]).

use crate::core::{
    Decision, Point, ACCURACY_TOLERANCE_PERCENT, TIME_THRESHOLD_MS, VELOCITY_THRESHOLD_MPS,
};
use crate::geodesy::haversine_distance_m;

/// Tunable thresholds for the acceptance heuristic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Elapsed time after which any plausible candidate is accepted (ms)
    pub time_threshold_ms: i64,
    /// Divisor applied to the previous accuracy to bound tolerable degradation
    pub accuracy_tolerance_percent: f64,
    /// Maximum plausible speed between consecutive points (m/s)
    pub velocity_threshold_mps: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            time_threshold_ms: TIME_THRESHOLD_MS,
            accuracy_tolerance_percent: ACCURACY_TOLERANCE_PERCENT,
            velocity_threshold_mps: VELOCITY_THRESHOLD_MPS,
        }
    }
}

/// Why a candidate was accepted or rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    /// No prior point existed, nothing to compare against
    FirstPoint,
    /// Candidate reports a tighter accuracy radius than the previous point
    ImprovedAccuracy,
    /// The previous point is older than the time threshold
    StaleReference,
    /// Worse accuracy from the same provider, within the tolerated margin
    TolerableDegradation,
    /// The implied speed exceeds the velocity threshold
    ExcessiveVelocity,
    /// Plausible movement but no accuracy or staleness condition held
    NoAdmissionPath,
}

/// Full result of one evaluation, for logging and diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub decision: Decision,
    pub reason: DecisionReason,
    /// Great-circle distance to the previous point (meters); 0 without history
    pub distance_m: f64,
    /// Candidate timestamp minus previous timestamp (ms); 0 without history
    pub elapsed_ms: i64,
    /// Implied speed (m/s); may be infinite for sub-second non-zero movement
    pub velocity_mps: f64,
}

/// Pure decision function deciding whether a candidate fix becomes the new
/// confirmed point
#[derive(Debug, Clone, Default)]
pub struct PointAcceptanceFilter {
    params: FilterParams,
}

impl PointAcceptanceFilter {
    /// Create a filter with the reference thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter with custom thresholds
    pub fn with_params(params: FilterParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    /// Decide whether `candidate` should replace `last_accepted`.
    ///
    /// Total over its inputs: degenerate geometry and zero or negative time
    /// deltas still produce a decision, never an error.
    pub fn evaluate(&self, candidate: &Point, last_accepted: Option<&Point>) -> Decision {
        self.evaluate_detailed(candidate, last_accepted).decision
    }

    /// Like [`evaluate`](Self::evaluate), additionally reporting the computed
    /// distance, elapsed time, implied velocity, and decision reason.
    pub fn evaluate_detailed(&self, candidate: &Point, last_accepted: Option<&Point>) -> Evaluation {
        let last = match last_accepted {
            Some(last) => last,
            None => {
                return Evaluation {
                    decision: Decision::Accept,
                    reason: DecisionReason::FirstPoint,
                    distance_m: 0.0,
                    elapsed_ms: 0,
                    velocity_mps: 0.0,
                }
            }
        };

        let accuracy_improved = candidate.accuracy < last.accuracy;
        let accuracy_delta = (last.accuracy - candidate.accuracy).abs();
        let lower_accuracy_tolerable = candidate.accuracy > last.accuracy
            && candidate.provider == last.provider
            && accuracy_delta <= last.accuracy / self.params.accuracy_tolerance_percent;

        let elapsed_ms = candidate.timestamp - last.timestamp;
        let distance_m = haversine_distance_m(
            last.latitude,
            last.longitude,
            candidate.latitude,
            candidate.longitude,
        );

        // Truncating millisecond-to-second division, matching the reference
        // arithmetic. A sub-second gap leaves zero elapsed seconds: any real
        // movement then implies infinite speed and is rejected, while a
        // zero-distance candidate keeps a defined velocity of zero so the
        // accuracy paths below stay reachable.
        let elapsed_s = elapsed_ms / 1000;
        let velocity_mps = if elapsed_s == 0 {
            if distance_m == 0.0 {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            distance_m / elapsed_s as f64
        };

        let plausible = velocity_mps <= self.params.velocity_threshold_mps;
        let stale = elapsed_ms > self.params.time_threshold_ms;

        let (decision, reason) = if !plausible {
            (Decision::Reject, DecisionReason::ExcessiveVelocity)
        } else if accuracy_improved {
            (Decision::Accept, DecisionReason::ImprovedAccuracy)
        } else if stale {
            (Decision::Accept, DecisionReason::StaleReference)
        } else if lower_accuracy_tolerable {
            (Decision::Accept, DecisionReason::TolerableDegradation)
        } else {
            (Decision::Reject, DecisionReason::NoAdmissionPath)
        };

        Evaluation {
            decision,
            reason,
            distance_m,
            elapsed_ms,
            velocity_mps,
        }
    }
}
