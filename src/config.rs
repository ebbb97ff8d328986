// Pin assignment, PWM settings, gripper calibration
use std::time::Duration;

use rppal::pwm::Channel;

// Servo signal pin (BCM numbering). GPIO 18 carries hardware PWM channel 0.
pub const SERVO_PIN: u8 = 18;
pub const PWM_CHANNEL: Channel = Channel::Pwm0;

// Standard hobby-servo PWM frequency
pub const PWM_FREQUENCY_HZ: f64 = 50.0;

// Fixed calibrations for the named gripper motions
pub const OPEN_DUTY: f64 = 82.0;
pub const OPEN_DURATION: Duration = Duration::from_millis(2500);
pub const CLOSE_DUTY: f64 = 100.0;
pub const CLOSE_DURATION: Duration = Duration::from_millis(2000);

// Enable hardware PWM output (set to false for simulation/testing)
pub const HARDWARE_ENABLED: bool = true;
