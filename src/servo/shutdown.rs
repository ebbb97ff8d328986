// Safe-shutdown path for the servo pin
//
// Forces the output low and releases the PWM channel regardless of what the
// controller last did. May be the final call before process exit, so it
// never propagates failures.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{info, warn};

use crate::servo::pwm::PwmDriver;

pub struct ShutdownGuard<D: PwmDriver> {
    driver: Rc<RefCell<D>>,
}

impl<D: PwmDriver> ShutdownGuard<D> {
    pub fn new(driver: Rc<RefCell<D>>) -> Self {
        Self { driver }
    }

    /// Force the output low and release the pin.
    ///
    /// Idempotent and independent of controller state. Failures, including a
    /// pin that is already released, are logged and swallowed.
    pub fn engage(&self) {
        let Ok(mut driver) = self.driver.try_borrow_mut() else {
            warn!("Pin resource busy, skipping release");
            return;
        };
        match driver.release() {
            Ok(()) => info!("Servo pin released"),
            Err(e) => warn!("Failed to release servo pin: {}", e),
        }
    }
}
