//! Penalty Magnitudes, Weights, Floors, and Status Buckets
//!
//! The shape of every scorer is the same: start at 100, subtract a base
//! penalty when a boundary is crossed, add a linear term for how far past
//! the boundary the measurement sits (capped per tier), clamp to the domain
//! floor. The constants here set those magnitudes.
//!
//! Domain floors are deliberately nonzero: a single saturated input must
//! not collapse the weighted composite to zero and drown out what the other
//! domains still say.

// ===== DOMAIN FLOORS =====

/// Minimum electrical health score.
pub const ELECTRICAL_FLOOR: f32 = 20.0;

/// Minimum thermal health score.
pub const THERMAL_FLOOR: f32 = 20.0;

/// Minimum mechanical health score.
pub const MECHANICAL_FLOOR: f32 = 25.0;

// ===== ELECTRICAL PENALTIES =====

/// Base penalty for voltage past a warning boundary (either side).
pub const PENALTY_VOLTAGE_WARNING: f32 = 20.0;

/// Base penalty for voltage past a critical boundary (either side).
pub const PENALTY_VOLTAGE_CRITICAL: f32 = 40.0;

/// Extra penalty per volt past the boundary, capped by
/// [`PENALTY_VOLTAGE_SLOPE_CAP`].
pub const PENALTY_VOLTAGE_SLOPE: f32 = 5.0;
pub const PENALTY_VOLTAGE_SLOPE_CAP: f32 = 15.0;

/// Base penalty for current under the no-load boundary.
pub const PENALTY_CURRENT_LOW: f32 = 30.0;

/// Base penalty for current past the overload warning boundary.
pub const PENALTY_CURRENT_WARNING: f32 = 25.0;

/// Base penalty for current past the critical overcurrent boundary.
pub const PENALTY_CURRENT_CRITICAL: f32 = 50.0;

/// Extra penalty per ampere past the boundary, capped by
/// [`PENALTY_CURRENT_SLOPE_CAP`].
pub const PENALTY_CURRENT_SLOPE: f32 = 8.0;
pub const PENALTY_CURRENT_SLOPE_CAP: f32 = 20.0;

// ===== THERMAL PENALTIES =====

/// Base penalty for an elevated motor temperature.
pub const PENALTY_MOTOR_TEMP_ELEVATED: f32 = 15.0;

/// Base penalty for a high motor temperature.
pub const PENALTY_MOTOR_TEMP_WARNING: f32 = 30.0;

/// Base penalty for a critical motor temperature.
pub const PENALTY_MOTOR_TEMP_CRITICAL: f32 = 50.0;

/// Extra penalty per °C past the motor-temperature boundary, capped by
/// [`PENALTY_MOTOR_TEMP_SLOPE_CAP`].
pub const PENALTY_MOTOR_TEMP_SLOPE: f32 = 1.5;
pub const PENALTY_MOTOR_TEMP_SLOPE_CAP: f32 = 30.0;

/// Base penalty for a warm ambient.
pub const PENALTY_AMBIENT_WARNING: f32 = 15.0;

/// Base penalty for a hot ambient.
pub const PENALTY_AMBIENT_CRITICAL: f32 = 25.0;

/// Penalties for humidity outside the comfortable band.
pub const PENALTY_HUMIDITY_LOW: f32 = 5.0;
pub const PENALTY_HUMIDITY_WARNING: f32 = 10.0;
pub const PENALTY_HUMIDITY_CRITICAL: f32 = 20.0;

// ===== MECHANICAL PENALTIES =====

/// Penalty when the shaft is below [`RPM_STOPPED`](super::thresholds::RPM_STOPPED)
/// while the source claims the motor is running.
pub const PENALTY_RPM_STOPPED: f32 = 70.0;

/// Base penalty for speed past a warning boundary (either side).
pub const PENALTY_RPM_WARNING: f32 = 30.0;

/// Base penalty for speed past a critical boundary (either side).
pub const PENALTY_RPM_CRITICAL: f32 = 50.0;

/// Extra penalty per 100 rpm past the boundary, capped by
/// [`PENALTY_RPM_SLOPE_CAP`].
pub const PENALTY_RPM_SLOPE_PER_100: f32 = 5.0;
pub const PENALTY_RPM_SLOPE_CAP: f32 = 20.0;

/// Penalty for a current/rpm load imbalance.
pub const PENALTY_LOAD_IMBALANCE: f32 = 20.0;

// ===== COMPOSITE WEIGHTS =====

/// Weight of the electrical domain in the overall score.
pub const WEIGHT_ELECTRICAL: f32 = 0.30;

/// Weight of the thermal domain. Heat is the dominant failure driver for
/// motors, hence the largest share.
pub const WEIGHT_THERMAL: f32 = 0.35;

/// Weight of the mechanical domain.
pub const WEIGHT_MECHANICAL: f32 = 0.25;

/// Weight of the predictive (oracle) component when present.
pub const WEIGHT_PREDICTIVE: f32 = 0.10;

// ===== CONFIDENCE FACTORS =====

/// Confidence when both sources are live and fresh. Must be exactly 1.0:
/// confidence multiplies the composite and two fresh sources leave nothing
/// to discount.
pub const CONFIDENCE_BOTH_LIVE: f32 = 1.0;

/// Confidence when exactly one source is live.
pub const CONFIDENCE_SINGLE_LIVE: f32 = 0.8;

/// Confidence when neither source is live and the working dataset is
/// historical or defaulted throughout.
pub const CONFIDENCE_NONE_LIVE: f32 = 0.25;

// ===== STATUS BUCKETS =====

/// Overall score at or above which the status is Excellent.
pub const STATUS_EXCELLENT: f32 = 90.0;

/// Good status boundary.
pub const STATUS_GOOD: f32 = 80.0;

/// Fair status boundary.
pub const STATUS_FAIR: f32 = 70.0;

/// Warning status boundary.
pub const STATUS_WARNING: f32 = 60.0;

/// Poor status boundary; anything below is Critical.
pub const STATUS_POOR: f32 = 40.0;

// ===== EFFICIENCY =====

/// Share of the efficiency score contributed by rpm efficiency.
pub const EFFICIENCY_RPM_SHARE: f32 = 0.6;

/// Share contributed by power efficiency.
pub const EFFICIENCY_POWER_SHARE: f32 = 0.4;

/// Efficiency below which an optimization recommendation is raised.
pub const EFFICIENCY_ADVISORY: f32 = 75.0;

// ===== ALERT BANDS =====

/// Overall score below which health is considered critical.
pub const HEALTH_CRITICAL_BAND: f32 = 60.0;

/// Overall score below which health is considered degraded.
pub const HEALTH_DEGRADED_BAND: f32 = 75.0;

/// Per-domain score below which a domain warning is raised.
pub const DOMAIN_WARNING_BAND: f32 = 70.0;

/// Predictive score below which maintenance is recommended.
pub const PREDICTIVE_WARNING_BAND: f32 = 60.0;

/// Minimum confidence for a recommendation to be persisted as an alert.
pub const ALERT_CONFIDENCE_BAR: f32 = 0.8;

/// Maximum recommendations retained per cycle after ranking.
pub const RECOMMENDATION_TOP_K: usize = 10;
