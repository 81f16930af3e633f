//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung. Der `FeedController` bekommt sie
//! injiziert, dadurch laufen die Tests mit Mocks auf dem Host.

use rgb::RGB8;

use crate::types::FeedParameters;

/// Fehler-Typ für Speicher-Operationen (Flash/EEPROM)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Lesen vom Speicher fehlgeschlagen
    ReadFailed,
    /// Schreiben (inkl. Erase) fehlgeschlagen
    WriteFailed,
    /// Zurückgelesene Daten stimmen nicht mit den geschriebenen überein
    VerifyFailed,
}

/// Trait für den Schnecken-Antrieb (Servo)
///
/// Alle Befehle gelten als sofort wirksam, es gibt keine Rückmeldung
/// über Position oder Drehzahl.
///
/// # Implementierungen
/// - **Production:** ServoAuger (ESP32 LEDC PWM)
/// - **Testing:** MockAuger (zeichnet Befehle auf)
pub trait Actuator {
    /// Schnecke vorwärts drehen (Futter fördern)
    fn drive_forward(&mut self);

    /// Schnecke rückwärts drehen (Verstopfung lösen)
    fn drive_backward(&mut self);

    /// Schnecke anhalten
    fn stop(&mut self);
}

/// Trait für persistenten Parameter-Speicher
///
/// `save()` muss erst zurückkehren, wenn die Daten committed sind.
pub trait ParameterStore {
    /// Liest den gespeicherten Parameter-Blob
    ///
    /// `None` wenn nichts gelesen werden konnte. Ob der Inhalt gültig ist,
    /// entscheidet der Aufrufer über die Checksumme.
    fn load(&mut self) -> Option<[u8; FeedParameters::ENCODED_LEN]>;

    /// Schreibt und committed den Parameter-Blob
    fn save(&mut self, bytes: &[u8; FeedParameters::ENCODED_LEN]) -> Result<(), StorageError>;
}

/// Monotone Millisekunden-Uhr
///
/// Der Zähler darf überlaufen, alle Vergleiche laufen über `wrapping_sub`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedError {
    WriteFailed,
}

/// Trait für die Status-LED (WS2812/Neopixel)
///
/// # Implementierungen
/// - **Production:** RmtLedWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockLedWriter (in-memory Mock)
pub trait StatusLedWriter {
    /// Schreibt eine RGB-Farbe auf die LED
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, color: RGB8) -> Result<(), LedError>;
}

#[cfg(feature = "defmt")]
impl defmt::Format for StorageError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            StorageError::ReadFailed => defmt::write!(fmt, "read failed"),
            StorageError::WriteFailed => defmt::write!(fmt, "write failed"),
            StorageError::VerifyFailed => defmt::write!(fmt, "verify failed"),
        }
    }
}
