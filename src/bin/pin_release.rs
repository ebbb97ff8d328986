// Out-of-band pin kill: force the servo line low and free the PWM channel.
//
// Run this after a crash or abnormal exit left the pin driving the servo.
// Exits non-zero only if the channel cannot be claimed at all.

use std::cell::RefCell;
use std::rc::Rc;

use gripper_runtime::servo::{HardwarePwm, ShutdownGuard};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let driver = match HardwarePwm::new() {
        Ok(driver) => Rc::new(RefCell::new(driver)),
        Err(e) => {
            eprintln!("Failed to claim PWM channel: {}", e);
            std::process::exit(1);
        }
    };

    ShutdownGuard::new(driver).engage();
}
