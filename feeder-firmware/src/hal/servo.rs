// Servo-Treiber für die Futter-Schnecke (LEDC PWM, 50 Hz)
//
// Ein 360°-Servo dreht abhängig vom "Winkel": 0° = volle Fahrt vorwärts,
// 90° = Stillstand, 180° = volle Fahrt rückwärts.

use esp_hal::gpio::DriveMode;
use esp_hal::gpio::interconnect::PeripheralOutput;
use esp_hal::ledc::channel::{self, ChannelHW, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::time::Rate;
use feeder_core::{Actuator, servo_duty};
use static_cell::StaticCell;

use crate::config::{
    SERVO_BACK_ANGLE, SERVO_DUTY_BITS, SERVO_FORWARD_ANGLE, SERVO_MAX_PULSE_US,
    SERVO_MIN_PULSE_US, SERVO_PERIOD_US, SERVO_PWM_FREQ_HZ, SERVO_STOP_ANGLE,
};

/// Fehler bei der Servo-Initialisierung
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum ServoError {
    /// LEDC-Timer ließ sich nicht konfigurieren
    TimerConfig,
    /// LEDC-Kanal ließ sich nicht konfigurieren
    ChannelConfig,
}

// LEDC-Timer muss 'static sein, der Kanal hält eine Referenz darauf
static LEDC: StaticCell<Ledc<'static>> = StaticCell::new();
static SERVO_TIMER: StaticCell<timer::Timer<'static, LowSpeed>> = StaticCell::new();

/// Schnecken-Antrieb über einen LEDC-Kanal
pub struct ServoAuger {
    channel: channel::Channel<'static, LowSpeed>,
}

impl ServoAuger {
    /// Initialisiert LEDC Timer0 + Channel0 und hält das Servo an
    ///
    /// Darf nur einmal aufgerufen werden (StaticCell).
    pub fn new(
        ledc_peripheral: esp_hal::peripherals::LEDC<'static>,
        pin: impl PeripheralOutput<'static>,
    ) -> Result<Self, ServoError> {
        let ledc = LEDC.init(Ledc::new(ledc_peripheral));
        ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

        let servo_timer = SERVO_TIMER.init(ledc.timer::<LowSpeed>(timer::Number::Timer0));
        servo_timer
            .configure(timer::config::Config {
                duty: timer::config::Duty::Duty14Bit,
                clock_source: timer::LSClockSource::APBClk,
                frequency: Rate::from_hz(SERVO_PWM_FREQ_HZ),
            })
            .map_err(|_| ServoError::TimerConfig)?;

        let mut channel = ledc.channel(channel::Number::Channel0, pin);
        channel
            .configure(channel::config::Config {
                timer: &*servo_timer,
                duty_pct: 0,
                drive_mode: DriveMode::PushPull,
            })
            .map_err(|_| ServoError::ChannelConfig)?;

        let mut auger = Self { channel };
        auger.stop();
        Ok(auger)
    }

    fn set_angle(&mut self, angle: u8) {
        let duty = servo_duty(
            angle,
            SERVO_MIN_PULSE_US,
            SERVO_MAX_PULSE_US,
            SERVO_PERIOD_US,
            SERVO_DUTY_BITS,
        );
        self.channel.set_duty_hw(duty);
    }
}

impl Actuator for ServoAuger {
    fn drive_forward(&mut self) {
        self.set_angle(SERVO_FORWARD_ANGLE);
    }

    fn drive_backward(&mut self) {
        self.set_angle(SERVO_BACK_ANGLE);
    }

    fn stop(&mut self) {
        self.set_angle(SERVO_STOP_ANGLE);
    }
}
