//! Physical Tier Boundaries for Motor Telemetry
//!
//! Warning and critical boundaries per measured quantity. A measurement
//! inside the innermost band costs nothing; each boundary it crosses adds a
//! penalty tier in the scorers. Values are anchored to the optimal operating
//! point below (24 V ±10 %, 6.25 A nominal, 2750 rpm ±5 %).

// ===== OPTIMAL OPERATING POINT =====

/// Nominal supply voltage in volts.
pub const OPTIMAL_VOLTAGE_V: f32 = 24.0;

/// Nominal load current in amperes.
pub const OPTIMAL_CURRENT_A: f32 = 6.25;

/// Nominal shaft speed in rpm.
pub const OPTIMAL_RPM: f32 = 2750.0;

/// Nominal motor case temperature in °C.
pub const OPTIMAL_MOTOR_TEMP_C: f32 = 40.0;

/// Nominal ambient temperature in °C.
pub const OPTIMAL_AMBIENT_TEMP_C: f32 = 24.0;

/// Nominal relative humidity in percent.
pub const OPTIMAL_HUMIDITY_PCT: f32 = 40.0;

// ===== VOLTAGE (24 V ±10 %) =====

/// Below this the supply is critically low; contactors may drop out.
pub const VOLTAGE_MIN_CRITICAL_V: f32 = 20.0;

/// Low-voltage warning boundary.
pub const VOLTAGE_MIN_WARNING_V: f32 = 22.0;

/// High-voltage warning boundary.
pub const VOLTAGE_MAX_WARNING_V: f32 = 26.0;

/// Above this insulation stress becomes a concern.
pub const VOLTAGE_MAX_CRITICAL_V: f32 = 28.0;

// ===== CURRENT =====

/// Below this the motor is likely unloaded or decoupled from its load.
pub const CURRENT_MIN_WARNING_A: f32 = 4.0;

/// Overload warning boundary.
pub const CURRENT_MAX_WARNING_A: f32 = 9.0;

/// Sustained current above this risks winding damage.
pub const CURRENT_MAX_CRITICAL_A: f32 = 12.0;

// ===== SHAFT SPEED (2750 rpm ±5 %) =====

/// Below this the shaft is effectively not turning.
///
/// Distinct from the low-speed tiers: a reading under this floor means the
/// motor is stopped or stalled, not merely slow.
pub const RPM_STOPPED: f32 = 100.0;

/// Critically low speed boundary.
pub const RPM_MIN_CRITICAL: f32 = 2400.0;

/// Low-speed warning boundary.
pub const RPM_MIN_WARNING: f32 = 2600.0;

/// High-speed warning boundary.
pub const RPM_MAX_WARNING: f32 = 2900.0;

/// Critically high speed boundary.
pub const RPM_MAX_CRITICAL: f32 = 3100.0;

// ===== MOTOR TEMPERATURE =====

/// Elevated case temperature; first penalty tier.
pub const MOTOR_TEMP_ELEVATED_C: f32 = 40.0;

/// High case temperature; cooling is falling behind.
pub const MOTOR_TEMP_WARNING_C: f32 = 50.0;

/// Critical case temperature; insulation life degrades rapidly above this.
pub const MOTOR_TEMP_CRITICAL_C: f32 = 60.0;

// ===== AMBIENT ENVIRONMENT =====

/// Warm-ambient warning boundary in °C.
pub const AMBIENT_TEMP_WARNING_C: f32 = 30.0;

/// Hot-ambient boundary in °C; derating territory.
pub const AMBIENT_TEMP_CRITICAL_C: f32 = 35.0;

/// Below this static buildup becomes likely.
pub const HUMIDITY_MIN_WARNING_PCT: f32 = 30.0;

/// Above this condensation risk starts.
pub const HUMIDITY_MAX_WARNING_PCT: f32 = 70.0;

/// Condensation on windings is probable above this.
pub const HUMIDITY_MAX_CRITICAL_PCT: f32 = 80.0;

// ===== CROSS-CHECKS =====

/// Relative deviation of measured current from the rpm-proportional
/// expectation that counts as a load imbalance.
pub const LOAD_IMBALANCE_RATIO: f32 = 0.5;
