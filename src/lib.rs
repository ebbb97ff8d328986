// Synchronous gripper runtime for an LS-3006 continuous-rotation servo
// driving a robotic claw from a Raspberry Pi GPIO pin.

pub mod config;
pub mod runtime;
pub mod servo;
