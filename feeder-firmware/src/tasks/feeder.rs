// Feeder Task - pollt den Fütterungs-Zustandsautomaten
use defmt::{error, info};
use embassy_time::{Duration, Timer};
use esp_hal_smartled::smart_led_buffer;
use feeder_core::{Phase, StatusLedWriter, Transition, status_color};

use crate::config::{FEEDER_POLL_INTERVAL_MS, LED_BRIGHTNESS, LED_GPIO_PIN, RMT_CLOCK_MHZ};
use crate::hal::RmtLedWriter;
use crate::{SharedFeeder, with_feeder};

/// Feeder Logic - die kooperative Hauptschleife
///
/// Ruft alle `FEEDER_POLL_INTERVAL_MS` den Controller auf. Zwischen zwei
/// Polls laufen die HTTP-Tasks (start/cancel/update). Die Status-LED folgt
/// der Phase, auch wenn der Wechsel von einem HTTP-Request kam.
///
/// # Parameter
/// - `feeder`: geteilter Controller
/// - `led`: Status-LED (Hardware oder Mock), `None` wenn die LED nicht startete
pub async fn feeder_logic<L: StatusLedWriter>(feeder: &'static SharedFeeder, mut led: Option<L>) {
    let mut shown: Option<Phase> = None;

    loop {
        let (transition, phase) = with_feeder(feeder, |f| (f.poll(), f.phase()));

        if let Some(transition) = transition {
            log_transition(&transition);
        }

        if shown != Some(phase) {
            if let Some(led) = led.as_mut() {
                if led.write(status_color(phase, LED_BRIGHTNESS)).is_err() {
                    error!("Feeder: Failed to write status LED");
                }
            }
            shown = Some(phase);
        }

        // Async Delay: gibt CPU an andere Tasks zurück
        Timer::after(Duration::from_millis(FEEDER_POLL_INTERVAL_MS)).await;
    }
}

fn log_transition(transition: &Transition) {
    match transition.to {
        Phase::ForwardPause => info!("Feeder: Forward done"),
        Phase::Back => info!("Feeder: Pause done"),
        Phase::Rest => info!("Feeder: Back done, iteration {}", transition.completed),
        Phase::Forward => info!("Feeder: Rest done"),
        Phase::Idle => info!(
            "Feeder: Back done, feeding finished after {} iterations",
            transition.completed
        ),
    }
}

/// Feeder Task - Embassy Task für die Hauptschleife
///
/// Initialisiert die Status-LED und ruft dann `feeder_logic()` auf.
///
/// # Parameter
/// - `feeder`: geteilter Controller
/// - `gpio8`: GPIO8 Peripheral für LED-Datenleitung
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
#[embassy_executor::task]
pub async fn feeder_task(
    feeder: &'static SharedFeeder,
    gpio8: esp_hal::peripherals::GPIO8<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
) {
    // Buffer für SmartLED Daten erstellen (1 LED)
    let mut rmt_buffer = smart_led_buffer!(1);

    // Ohne LED weiterfüttern, die Schnecke ist wichtiger
    let led = match RmtLedWriter::new(gpio8, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer) {
        Ok(led) => {
            info!("Feeder: Status LED on GPIO{}", LED_GPIO_PIN);
            Some(led)
        }
        Err(_) => {
            error!("Feeder: Status LED init failed, continuing without LED");
            None
        }
    };

    info!("Feeder: Poll loop running every {}ms", FEEDER_POLL_INTERVAL_MS);
    feeder_logic(feeder, led).await;
}
