//! Nicht-blockierender Countdown-Timer
//!
//! Beantwortet "sind seit dem Scharfschalten D ms vergangen?" ohne zu
//! warten. Der Aufrufer pollt in seiner eigenen Schleife, mehrere Timer
//! können so im selben Durchlauf nebeneinander laufen.

/// Countdown mit Latch: `poll()` liefert pro `arm()` genau einmal `true`.
///
/// Die Dauer wird beim `arm()` übernommen. Ein späteres `set_duration()`
/// wirkt erst beim nächsten `arm()`.
///
/// # Beispiele
///
/// ```
/// # use feeder_core::NonBlockingTimer;
/// let mut timer = NonBlockingTimer::new(100);
/// timer.arm(1_000);
/// assert!(!timer.poll(1_099));
/// assert!(timer.poll(1_100));
/// assert!(!timer.poll(1_200)); // feuert nicht erneut
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NonBlockingTimer {
    duration_ms: u32,
    /// (Startzeit, Dauer) des laufenden Countdowns
    armed: Option<(u32, u32)>,
}

impl NonBlockingTimer {
    /// Erstellt einen nicht scharfen Timer
    ///
    /// Negative Dauern werden wie 0 behandelt (feuert beim ersten Poll).
    pub fn new(duration_ms: i32) -> Self {
        let mut timer = Self::default();
        timer.set_duration(duration_ms);
        timer
    }

    /// Setzt die Dauer für kommende `arm()`-Aufrufe
    pub fn set_duration(&mut self, duration_ms: i32) {
        self.duration_ms = duration_ms.max(0) as u32;
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Startet den Countdown bei `now_ms`, ein laufender wird verworfen
    pub fn arm(&mut self, now_ms: u32) {
        self.armed = Some((now_ms, self.duration_ms));
    }

    pub fn disarm(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Prüft ob der Countdown abgelaufen ist
    ///
    /// Überlauf-sicher: die Differenz wird mit `wrapping_sub` gebildet.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        match self.armed {
            Some((start, duration)) if now_ms.wrapping_sub(start) >= duration => {
                self.armed = None;
                true
            }
            _ => false,
        }
    }
}
