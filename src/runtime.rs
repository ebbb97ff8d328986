// Fixed gripper demo sequence with guaranteed pin release
//
// The runtime is the process-lifecycle collaborator: it claims the pin
// resource once, shares it between the controller and the shutdown guard,
// and engages the guard on every exit path so the output is never left
// asserted.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::config::{HARDWARE_ENABLED, PWM_FREQUENCY_HZ, SERVO_PIN};
use crate::servo::{GripperController, GripperError, HardwarePwm, MockPwm, PwmDriver, ShutdownGuard};

pub fn run() -> Result<(), GripperError> {
    if HARDWARE_ENABLED {
        let driver = Rc::new(RefCell::new(HardwarePwm::new()?));
        run_with(driver)
    } else {
        info!("Hardware disabled, using simulated PWM driver");
        let driver = Rc::new(RefCell::new(MockPwm::new()));
        run_with(driver)
    }
}

fn run_with<D: PwmDriver>(driver: Rc<RefCell<D>>) -> Result<(), GripperError> {
    let guard = ShutdownGuard::new(Rc::clone(&driver));
    let mut gripper = GripperController::new(driver);

    info!(
        "Gripper runtime started: GPIO {} at {} Hz",
        SERVO_PIN, PWM_FREQUENCY_HZ
    );

    let result = demo_sequence(&mut gripper);

    // Release the pin whether or not the sequence completed
    guard.engage();
    result
}

/// Close the claw, squeeze for five seconds, then ease off briefly.
fn demo_sequence<D: PwmDriver>(gripper: &mut GripperController<D>) -> Result<(), GripperError> {
    gripper.start("close", None, None)?;
    gripper.hold(5.0, 130.0)?;
    gripper.start("precise", Some(0.3), Some(75.0))?;
    Ok(())
}
