// PWM pin resource for the servo signal line
//
// The process claims exactly one pin (BCM 18, hardware PWM channel 0) for
// its lifetime. The channel is enabled at 0% duty on claim and must be
// released exactly once: duty zeroed, channel disabled, pin forced low.

use rppal::gpio::Gpio;
use rppal::pwm::{Polarity, Pwm};
use tracing::{debug, info};

use crate::config::{PWM_CHANNEL, PWM_FREQUENCY_HZ, SERVO_PIN};

/// Error types for the PWM pin resource
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("PWM channel error: {0}")]
    Pwm(#[from] rppal::pwm::Error),

    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    #[error("PWM channel already released")]
    ChannelReleased,
}

/// Driver contract for the single servo output pin.
pub trait PwmDriver {
    /// Set and hold the duty cycle (percent, 0-100) until the next call.
    fn set_duty_cycle(&mut self, percent: f64) -> Result<(), DriverError>;

    /// Force the output low and release the pin. Safe to call repeatedly.
    fn release(&mut self) -> Result<(), DriverError>;
}

/// Hardware PWM channel on the Pi.
pub struct HardwarePwm {
    pwm: Option<Pwm>,
    pin: u8,
}

impl HardwarePwm {
    /// Claim the PWM channel, enabled at 0% duty.
    pub fn new() -> Result<Self, DriverError> {
        info!(
            "Claiming PWM channel {:?} on GPIO {} at {} Hz",
            PWM_CHANNEL, SERVO_PIN, PWM_FREQUENCY_HZ
        );
        let pwm = Pwm::with_frequency(PWM_CHANNEL, PWM_FREQUENCY_HZ, 0.0, Polarity::Normal, true)?;
        Ok(Self {
            pwm: Some(pwm),
            pin: SERVO_PIN,
        })
    }
}

impl PwmDriver for HardwarePwm {
    fn set_duty_cycle(&mut self, percent: f64) -> Result<(), DriverError> {
        let pwm = self.pwm.as_ref().ok_or(DriverError::ChannelReleased)?;
        // rppal takes a 0.0-1.0 fraction
        pwm.set_duty_cycle((percent / 100.0).clamp(0.0, 1.0))?;
        Ok(())
    }

    fn release(&mut self) -> Result<(), DriverError> {
        let Some(pwm) = self.pwm.take() else {
            return Ok(());
        };
        pwm.set_duty_cycle(0.0)?;
        pwm.disable()?;
        drop(pwm);

        // Drive the freed pin low and leave it that way
        let mut pin = Gpio::new()?.get(self.pin)?.into_output_low();
        pin.set_reset_on_drop(false);
        debug!("GPIO {} released, output forced low", self.pin);
        Ok(())
    }
}

/// Simulated driver for tests and hardware-free runs. Records every write.
#[derive(Debug, Default)]
pub struct MockPwm {
    duty_log: Vec<f64>,
    released: bool,
}

impl MockPwm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Duty-cycle percentages in the order they were applied.
    pub fn duty_log(&self) -> &[f64] {
        &self.duty_log
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl PwmDriver for MockPwm {
    fn set_duty_cycle(&mut self, percent: f64) -> Result<(), DriverError> {
        if self.released {
            return Err(DriverError::ChannelReleased);
        }
        debug!("[sim] duty cycle set to {:.4}%", percent);
        self.duty_log.push(percent);
        Ok(())
    }

    fn release(&mut self) -> Result<(), DriverError> {
        if !self.released {
            debug!("[sim] channel released, output low");
            self.released = true;
        }
        Ok(())
    }
}
