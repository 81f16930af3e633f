// Millisekunden-Uhr auf Basis von embassy-time

use embassy_time::Instant;
use feeder_core::Clock;

/// `Clock` für den Controller
///
/// Schneidet auf u32 ab, läuft also nach ~49,7 Tagen über. Der Timer im
/// Core rechnet überlauffest.
#[derive(Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}
