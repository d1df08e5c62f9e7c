/// Mathematical constant pi
pub const PI: f64 = std::f64::consts::PI;

/// Floor substituted for a squared pole distance of exactly zero.
///
/// The monopole model is singular at the pole itself; this floor keeps the
/// evaluation finite. It is a numerical guard, not a physical cutoff.
pub const MIN_R_SQUARED: f64 = 1e-12;

/// Electrical angle swept by the winding excitation over one normalized cycle.
pub const DEFAULT_ANGULAR_RATE: f64 = 4.0 * PI;

/// Phase separation of a balanced three-phase current set.
pub const DEFAULT_PHASE_OFFSET: f64 = 2.0 * PI / 3.0;

/// Tolerance used when checking the balanced three-phase invariant.
pub const PHASE_BALANCE_TOLERANCE: f64 = 1e-9;
