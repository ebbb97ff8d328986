// Servo control module for the gripper claw
//
// Provides:
// - Duty parameter to duty-cycle mapping (0-180 scale to percent)
// - The PWM pin resource (hardware and simulated drivers)
// - High-level gripper controller and the safe-shutdown guard

mod controller;
pub mod duty;
pub mod pwm;
mod shutdown;

pub use controller::{GripperController, GripperError, Operation, Sleep, ThreadSleep};
pub use pwm::{DriverError, HardwarePwm, MockPwm, PwmDriver};
pub use shutdown::ShutdownGuard;
