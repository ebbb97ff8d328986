// Gripper operation model and controller
//
// Resolves named operations to (duty cycle, duration) pairs and applies them
// through the PWM driver, blocking for each operation's duration. Stateless
// between calls; every call is a complete, independent transaction.

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{CLOSE_DURATION, CLOSE_DUTY, OPEN_DURATION, OPEN_DUTY};
use crate::servo::duty::{DUTY_PARAM_MAX, DUTY_PARAM_MIN, duty_cycle};
use crate::servo::pwm::{DriverError, PwmDriver};

/// Error types for gripper operations
#[derive(Debug, thiserror::Error)]
pub enum GripperError {
    #[error("unknown operation {name:?} (expected open, close, precise, or hold)")]
    UnknownOperation { name: String },

    #[error("missing {field} for {kind} operation")]
    MissingParameter {
        kind: &'static str,
        field: &'static str,
    },

    #[error("duty parameter {value} outside calibrated range 0-180")]
    DutyOutOfRange { value: f64 },

    #[error("invalid duration {value}s")]
    InvalidDuration { value: f64 },

    #[error("PWM driver error: {0}")]
    Driver(#[from] DriverError),
}

impl GripperError {
    /// Whether the dispatch boundary recovers from this error. Only an
    /// unrecognized operation name is fatal; a failed actuation must not
    /// take down a process that still needs to release the pin.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, GripperError::UnknownOperation { .. })
    }
}

/// A single gripper action.
///
/// `Open` and `Close` carry fixed calibrations; `PreciseMove` and `Hold`
/// take caller-supplied timing. The two parameterized variants share their
/// mechanics: `Hold` presses against the held object (higher duty presses
/// harder), `PreciseMove` executes a custom-timed motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    Open,
    Close,
    PreciseMove { duration_s: f64, duty: f64 },
    Hold { duration_s: f64, duty: f64 },
}

impl Operation {
    /// Parse a named operation with optional positional parameters.
    ///
    /// "open" and "close" use their fixed calibrations and ignore any
    /// supplied parameters. "precise" and "hold" require both duration and
    /// duty, so a missing parameter fails here before any driver call.
    pub fn parse(
        kind: &str,
        duration_s: Option<f64>,
        duty: Option<f64>,
    ) -> Result<Self, GripperError> {
        match kind {
            "open" => Ok(Operation::Open),
            "close" => Ok(Operation::Close),
            "precise" => Ok(Operation::PreciseMove {
                duration_s: duration_s.ok_or(GripperError::MissingParameter {
                    kind: "precise",
                    field: "duration",
                })?,
                duty: duty.ok_or(GripperError::MissingParameter {
                    kind: "precise",
                    field: "duty",
                })?,
            }),
            "hold" => Ok(Operation::Hold {
                duration_s: duration_s.ok_or(GripperError::MissingParameter {
                    kind: "hold",
                    field: "duration",
                })?,
                duty: duty.ok_or(GripperError::MissingParameter {
                    kind: "hold",
                    field: "duty",
                })?,
            }),
            _ => Err(GripperError::UnknownOperation {
                name: kind.to_string(),
            }),
        }
    }

    /// Resolve to a validated (duty parameter, duration) pair.
    pub fn resolve(self) -> Result<(f64, Duration), GripperError> {
        match self {
            Operation::Open => Ok((OPEN_DUTY, OPEN_DURATION)),
            Operation::Close => Ok((CLOSE_DUTY, CLOSE_DURATION)),
            Operation::PreciseMove { duration_s, duty } | Operation::Hold { duration_s, duty } => {
                if !(DUTY_PARAM_MIN..=DUTY_PARAM_MAX).contains(&duty) {
                    return Err(GripperError::DutyOutOfRange { value: duty });
                }
                let duration = Duration::try_from_secs_f64(duration_s)
                    .map_err(|_| GripperError::InvalidDuration { value: duration_s })?;
                Ok((duty, duration))
            }
        }
    }
}

/// Blocking-wait seam so tests can observe requested durations.
pub trait Sleep {
    fn sleep(&mut self, duration: Duration);
}

/// Production sleeper, blocks the calling thread.
pub struct ThreadSleep;

impl Sleep for ThreadSleep {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// High-level controller for the claw.
///
/// Every successful operation emits exactly one duty-cycle change and blocks
/// for exactly one sleep matching the operation's duration. The driver handle
/// is shared with the shutdown guard; the controller never releases it.
pub struct GripperController<D: PwmDriver, S: Sleep = ThreadSleep> {
    driver: Rc<RefCell<D>>,
    sleep: S,
}

impl<D: PwmDriver> GripperController<D> {
    pub fn new(driver: Rc<RefCell<D>>) -> Self {
        Self::with_sleep(driver, ThreadSleep)
    }
}

impl<D: PwmDriver, S: Sleep> GripperController<D, S> {
    pub fn with_sleep(driver: Rc<RefCell<D>>, sleep: S) -> Self {
        Self { driver, sleep }
    }

    /// Rotate clockwise in a relatively gentle manner to open the claw.
    pub fn open(&mut self) -> Result<(), GripperError> {
        self.apply(Operation::Open)
    }

    /// Rotate counter-clockwise in a relatively gentle manner to close it.
    pub fn close(&mut self) -> Result<(), GripperError> {
        self.apply(Operation::Close)
    }

    /// Move with caller-supplied speed and timing for fine positioning
    /// anywhere within the claw's grip range.
    pub fn precise_move(&mut self, duration_s: f64, duty: f64) -> Result<(), GripperError> {
        self.apply(Operation::PreciseMove { duration_s, duty })
    }

    /// Maintain grip pressure against the held object. The higher the duty,
    /// the more pressure the claw exhibits.
    pub fn hold(&mut self, duration_s: f64, duty: f64) -> Result<(), GripperError> {
        self.apply(Operation::Hold { duration_s, duty })
    }

    /// Dispatch an operation by name.
    ///
    /// Configuration and driver failures are logged and swallowed here, so a
    /// single failed actuation leaves the process free to continue to the
    /// shutdown guard. An unrecognized name is a usage error and propagates
    /// without touching the driver.
    pub fn start(
        &mut self,
        kind: &str,
        duration_s: Option<f64>,
        duty: Option<f64>,
    ) -> Result<(), GripperError> {
        let result = Operation::parse(kind, duration_s, duty).and_then(|op| self.apply(op));
        match result {
            Err(e) if e.is_recoverable() => {
                warn!("{} operation aborted: {}", kind, e);
                Ok(())
            }
            other => other,
        }
    }

    fn apply(&mut self, op: Operation) -> Result<(), GripperError> {
        let (duty, duration) = op.resolve()?;
        let cycle = duty_cycle(duty);
        println!("Current Duty Cycle: {}", cycle);
        debug!("Applying {:?}: duty cycle {:.4}% for {:?}", op, cycle, duration);
        self.driver.borrow_mut().set_duty_cycle(cycle)?;
        self.sleep.sleep(duration);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::servo::pwm::MockPwm;

    const EPSILON: f64 = 1e-9;

    struct RecordingSleep(Rc<RefCell<Vec<Duration>>>);

    impl Sleep for RecordingSleep {
        fn sleep(&mut self, duration: Duration) {
            self.0.borrow_mut().push(duration);
        }
    }

    fn test_controller() -> (
        GripperController<MockPwm, RecordingSleep>,
        Rc<RefCell<MockPwm>>,
        Rc<RefCell<Vec<Duration>>>,
    ) {
        let driver = Rc::new(RefCell::new(MockPwm::new()));
        let slept = Rc::new(RefCell::new(Vec::new()));
        let controller =
            GripperController::with_sleep(Rc::clone(&driver), RecordingSleep(Rc::clone(&slept)));
        (controller, driver, slept)
    }

    #[test]
    fn test_fixed_calibrations_resolve() {
        assert_eq!(
            Operation::Open.resolve().unwrap(),
            (82.0, Duration::from_millis(2500))
        );
        assert_eq!(
            Operation::Close.resolve().unwrap(),
            (100.0, Duration::from_millis(2000))
        );
    }

    #[test]
    fn test_open_uses_fixed_calibration() {
        let (mut gripper, driver, slept) = test_controller();
        gripper.open().unwrap();
        assert_eq!(driver.borrow().duty_log().len(), 1);
        assert!((driver.borrow().duty_log()[0] - 6.5555555556).abs() < EPSILON);
        assert_eq!(slept.borrow()[..], [Duration::from_millis(2500)]);
    }

    #[test]
    fn test_close_uses_fixed_calibration() {
        let (mut gripper, driver, slept) = test_controller();
        gripper.close().unwrap();
        assert_eq!(driver.borrow().duty_log().len(), 1);
        assert!((driver.borrow().duty_log()[0] - 7.5555555556).abs() < EPSILON);
        assert_eq!(slept.borrow()[..], [Duration::from_millis(2000)]);
    }

    #[test]
    fn test_start_ignores_parameters_for_fixed_operations() {
        let (mut gripper, driver, slept) = test_controller();
        gripper.start("open", Some(9.0), Some(179.0)).unwrap();
        assert!((driver.borrow().duty_log()[0] - 6.5555555556).abs() < EPSILON);
        assert_eq!(slept.borrow()[..], [Duration::from_millis(2500)]);
    }

    #[test]
    fn test_start_precise_matches_direct_call() {
        let (mut dispatched, driver_a, slept_a) = test_controller();
        let (mut direct, driver_b, slept_b) = test_controller();
        dispatched.start("precise", Some(0.3), Some(75.0)).unwrap();
        direct.precise_move(0.3, 75.0).unwrap();
        assert_eq!(driver_a.borrow().duty_log(), driver_b.borrow().duty_log());
        assert_eq!(slept_a.borrow()[..], slept_b.borrow()[..]);
    }

    #[test]
    fn test_unknown_operation_is_fatal_and_touches_nothing() {
        let (mut gripper, driver, slept) = test_controller();
        let err = gripper.start("bogus", None, None).unwrap_err();
        assert!(matches!(err, GripperError::UnknownOperation { .. }));
        assert!(!err.is_recoverable());
        assert!(driver.borrow().duty_log().is_empty());
        assert!(slept.borrow().is_empty());
    }

    #[test]
    fn test_missing_parameter_is_recovered_at_dispatch() {
        let (mut gripper, driver, slept) = test_controller();
        gripper.start("precise", Some(0.3), None).unwrap();
        assert!(driver.borrow().duty_log().is_empty());
        assert!(slept.borrow().is_empty());
    }

    #[test]
    fn test_out_of_range_duty_rejected_before_driver_call() {
        let (mut gripper, driver, _) = test_controller();
        let err = gripper.precise_move(1.0, 200.0).unwrap_err();
        assert!(matches!(err, GripperError::DutyOutOfRange { .. }));
        assert!(driver.borrow().duty_log().is_empty());
    }

    #[test]
    fn test_non_finite_duty_rejected() {
        let (mut gripper, driver, _) = test_controller();
        let err = gripper.precise_move(1.0, f64::NAN).unwrap_err();
        assert!(matches!(err, GripperError::DutyOutOfRange { .. }));
        assert!(driver.borrow().duty_log().is_empty());
    }

    #[test]
    fn test_negative_duration_rejected() {
        let (mut gripper, driver, slept) = test_controller();
        let err = gripper.hold(-1.0, 100.0).unwrap_err();
        assert!(matches!(err, GripperError::InvalidDuration { .. }));
        assert!(driver.borrow().duty_log().is_empty());
        assert!(slept.borrow().is_empty());
    }

    #[test]
    fn test_driver_failure_recovered_at_dispatch() {
        let (mut gripper, driver, slept) = test_controller();
        driver.borrow_mut().release().unwrap();
        gripper.start("hold", Some(1.0), Some(100.0)).unwrap();
        assert!(slept.borrow().is_empty());
    }

    #[test]
    fn test_driver_failure_surfaces_from_direct_call() {
        let (mut gripper, driver, _) = test_controller();
        driver.borrow_mut().release().unwrap();
        let err = gripper.hold(1.0, 100.0).unwrap_err();
        assert!(matches!(err, GripperError::Driver(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_demo_sequence_duty_cycles_and_timing() {
        let (mut gripper, driver, slept) = test_controller();
        gripper.close().unwrap();
        gripper.hold(5.0, 130.0).unwrap();
        gripper.precise_move(0.3, 75.0).unwrap();

        let log = driver.borrow();
        let cycles = log.duty_log();
        assert_eq!(cycles.len(), 3);
        assert!((cycles[0] - 7.5555555556).abs() < EPSILON);
        assert!((cycles[1] - 9.2222222222).abs() < EPSILON);
        assert!((cycles[2] - 6.1666666667).abs() < EPSILON);

        let total: Duration = slept.borrow().iter().sum();
        assert!((total.as_secs_f64() - 7.3).abs() < EPSILON);
    }

    #[test]
    fn test_parse_each_kind() {
        assert_eq!(
            Operation::parse("open", None, None).unwrap(),
            Operation::Open
        );
        assert_eq!(
            Operation::parse("close", None, None).unwrap(),
            Operation::Close
        );
        assert_eq!(
            Operation::parse("hold", Some(2.0), Some(120.0)).unwrap(),
            Operation::Hold {
                duration_s: 2.0,
                duty: 120.0
            }
        );
        assert_eq!(
            Operation::parse("precise", Some(0.5), Some(80.0)).unwrap(),
            Operation::PreciseMove {
                duration_s: 0.5,
                duty: 80.0
            }
        );
    }
}
