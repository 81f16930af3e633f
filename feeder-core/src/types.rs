//! Core Types für den Futterautomaten
//!
//! Datenstrukturen ohne Hardware-Dependencies

use crate::logic::params_checksum;

/// Default-Laufzeit vorwärts in ms
pub const DEFAULT_FORWARD_MS: i32 = 8500;
/// Default-Pause nach dem Vorwärtslauf in ms
pub const DEFAULT_PAUSE_MS: i32 = 500;
/// Default-Laufzeit rückwärts in ms
pub const DEFAULT_BACK_MS: i32 = 500;
/// Default-Ruhezeit zwischen zwei Iterationen in ms
pub const DEFAULT_REST_MS: i32 = 500;
/// Default-Anzahl Vorwärts/Rückwärts-Zyklen pro Fütterung
pub const DEFAULT_ITERATIONS: i32 = 5;

/// Phase des Fütterungs-Zyklus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Idle,
    Forward,
    ForwardPause,
    Back,
    Rest,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Forward => "Forward",
            Phase::ForwardPause => "ForwardPause",
            Phase::Back => "Back",
            Phase::Rest => "Rest",
        }
    }
}

/// Befehl an den Aktor bei einem Phasenwechsel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorCommand {
    Forward,
    Backward,
    Stop,
}

/// Persistierte Fütterungs-Parameter
///
/// `checksum` ist die Summe der fünf anderen Felder. Sie dient nur als
/// schwaches Gültigkeits-Signal für den gespeicherten Blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FeedParameters {
    pub forward_ms: i32,
    pub back_ms: i32,
    pub pause_ms: i32,
    pub rest_ms: i32,
    pub iterations: i32,
    pub checksum: i32,
}

impl Default for FeedParameters {
    fn default() -> Self {
        Self::new(
            DEFAULT_FORWARD_MS,
            DEFAULT_BACK_MS,
            DEFAULT_PAUSE_MS,
            DEFAULT_REST_MS,
            DEFAULT_ITERATIONS,
        )
    }
}

impl FeedParameters {
    /// Größe des Speicher-Blobs: 6x i32 little-endian
    pub const ENCODED_LEN: usize = 24;

    /// Erstellt Parameter mit korrekt berechneter Checksumme
    pub fn new(forward_ms: i32, back_ms: i32, pause_ms: i32, rest_ms: i32, iterations: i32) -> Self {
        let mut params = Self {
            forward_ms,
            back_ms,
            pause_ms,
            rest_ms,
            iterations,
            checksum: 0,
        };
        params.refresh_checksum();
        params
    }

    pub fn refresh_checksum(&mut self) {
        self.checksum = params_checksum(self);
    }

    /// Prüft ob ein geladener Blob plausibel ist
    ///
    /// Gültig heißt: Checksumme passt zur Summe UND ist größer als 0.
    /// Ein gelöschter Flash-Sektor (alles 0xFF) oder ein genullter Blob fällt
    /// damit durch.
    pub fn is_valid(&self) -> bool {
        self.checksum == params_checksum(self) && self.checksum > 0
    }

    /// Serialisiert in das Speicher-Format
    ///
    /// Reihenfolge: forward, back, pause, rest, iterations, checksum
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let fields = [
            self.forward_ms,
            self.back_ms,
            self.pause_ms,
            self.rest_ms,
            self.iterations,
            self.checksum,
        ];
        let mut bytes = [0u8; Self::ENCODED_LEN];
        for (chunk, value) in bytes.chunks_exact_mut(4).zip(fields) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    /// Deserialisiert aus dem Speicher-Format (ohne Gültigkeitsprüfung)
    pub fn from_bytes(bytes: &[u8; Self::ENCODED_LEN]) -> Self {
        let mut fields = [0i32; 6];
        for (value, chunk) in fields.iter_mut().zip(bytes.chunks_exact(4)) {
            *value = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        let [forward_ms, back_ms, pause_ms, rest_ms, iterations, checksum] = fields;
        Self {
            forward_ms,
            back_ms,
            pause_ms,
            rest_ms,
            iterations,
            checksum,
        }
    }

    /// Vergleicht die fünf Nutzfelder (Checksumme wird ignoriert)
    pub fn same_settings(&self, other: &Self) -> bool {
        self.forward_ms == other.forward_ms
            && self.back_ms == other.back_ms
            && self.pause_ms == other.pause_ms
            && self.rest_ms == other.rest_ms
            && self.iterations == other.iterations
    }
}

/// Teil-Update der Parameter (z.B. aus dem HTTP-Formular)
///
/// Fehlende Felder behalten ihren aktuellen Wert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ParameterUpdate {
    #[cfg_attr(feature = "serde", serde(default, rename = "forward"))]
    pub forward_ms: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default, rename = "back"))]
    pub back_ms: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default, rename = "pause"))]
    pub pause_ms: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default, rename = "rest"))]
    pub rest_ms: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub iterations: Option<i32>,
}

impl ParameterUpdate {
    /// Wendet das Update auf `current` an und liefert den vollständigen Kandidaten
    pub fn apply_to(&self, current: &FeedParameters) -> FeedParameters {
        FeedParameters::new(
            self.forward_ms.unwrap_or(current.forward_ms),
            self.back_ms.unwrap_or(current.back_ms),
            self.pause_ms.unwrap_or(current.pause_ms),
            self.rest_ms.unwrap_or(current.rest_ms),
            self.iterations.unwrap_or(current.iterations),
        )
    }
}

/// Flüchtiger Zustand eines Fütterungs-Zyklus
///
/// `completed` ist nur gültig solange `phase != Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedCycleState {
    pub phase: Phase,
    pub completed: i32,
}

impl Default for FeedCycleState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            completed: 0,
        }
    }
}

/// Ein Phasenwechsel, geliefert von `FeedController::poll()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    /// Abgeschlossene Iterationen nach dem Wechsel
    pub completed: i32,
}

/// Herkunft der Parameter beim Start des Controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsOrigin {
    /// Gültige Parameter aus dem Speicher geladen
    Stored,
    /// Defaults eingesetzt, `persisted` = Schreiben hat geklappt
    Defaults { persisted: bool },
}

/// Ergebnis von `FeedController::update_parameters()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Kandidat war identisch, nichts geschrieben
    Unchanged,
    /// Neue Parameter gespeichert und aktiv
    Applied,
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for FeedParameters {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "FeedParameters {{ forward: {}ms, back: {}ms, pause: {}ms, rest: {}ms, iterations: {}, check: {} }}",
            self.forward_ms,
            self.back_ms,
            self.pause_ms,
            self.rest_ms,
            self.iterations,
            self.checksum
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Transition {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "{} -> {} (iteration {})",
            self.from.as_str(),
            self.to.as_str(),
            self.completed
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ParamsOrigin {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ParamsOrigin::Stored => defmt::write!(fmt, "Stored"),
            ParamsOrigin::Defaults { persisted } => {
                defmt::write!(fmt, "Defaults {{ persisted: {} }}", persisted)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for UpdateOutcome {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            UpdateOutcome::Unchanged => defmt::write!(fmt, "Unchanged"),
            UpdateOutcome::Applied => defmt::write!(fmt, "Applied"),
        }
    }
}
