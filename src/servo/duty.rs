// Duty-cycle mapping for the LS-3006 continuous-rotation servo
// Converts a logical duty parameter (0-180, 180-degree servo convention)
// to the duty-cycle percentage the PWM driver expects.

/// Calibration limits for the logical duty parameter.
pub const DUTY_PARAM_MIN: f64 = 0.0;
pub const DUTY_PARAM_MAX: f64 = 180.0;

/// Duty-cycle band the mapping produces over the calibrated range.
/// Hobby-servo drivers expect roughly 2-12% at 50 Hz.
pub const DUTY_CYCLE_MIN: f64 = 2.0;
pub const DUTY_CYCLE_MAX: f64 = 12.0;

/// Convert a duty parameter (0-180) to a PWM duty-cycle percentage.
///
/// The closer the parameter sits to the neutral midpoint (~90), the slower
/// the servo rotates; the extremes rotate fast in either direction.
/// Parameters outside 0-180 still compute but land outside the driver's
/// usable band, so callers validate before mapping.
pub fn duty_cycle(duty_param: f64) -> f64 {
    duty_param / 18.0 + 2.0
}
