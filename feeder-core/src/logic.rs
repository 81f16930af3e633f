//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

use crate::types::{ActuatorCommand, FeedParameters, Phase};

/// Berechnet die Checksumme der Parameter
///
/// Summe der vier Zeiten plus Iterationen (wrapping, wie int-Überlauf auf
/// dem Controller). Kein Integritätsschutz, nur ein "da steht was"-Signal.
pub fn params_checksum(params: &FeedParameters) -> i32 {
    params
        .forward_ms
        .wrapping_add(params.back_ms)
        .wrapping_add(params.pause_ms)
        .wrapping_add(params.rest_ms)
        .wrapping_add(params.iterations)
}

/// Übergangstabelle des Fütterungs-Automaten
///
/// Wird aufgerufen, wenn der Timer der Phase `phase` abgelaufen ist.
/// `completed` ist die Anzahl abgeschlossener Iterationen NACH dem Wechsel
/// (der Aufrufer zählt beim Verlassen von `Back` hoch).
///
/// | Von          | Befehl   | Nach                    |
/// |--------------|----------|-------------------------|
/// | Forward      | Stop     | ForwardPause            |
/// | ForwardPause | Backward | Back                    |
/// | Back         | Stop     | Rest / Idle (letzte It.) |
/// | Rest         | Forward  | Forward                 |
///
/// `Idle` hat keinen Übergang.
pub fn next_step(phase: Phase, completed: i32, iterations: i32) -> Option<(Phase, ActuatorCommand)> {
    match phase {
        Phase::Idle => None,
        Phase::Forward => Some((Phase::ForwardPause, ActuatorCommand::Stop)),
        Phase::ForwardPause => Some((Phase::Back, ActuatorCommand::Backward)),
        Phase::Back if completed < iterations => Some((Phase::Rest, ActuatorCommand::Stop)),
        Phase::Back => Some((Phase::Idle, ActuatorCommand::Stop)),
        Phase::Rest => Some((Phase::Forward, ActuatorCommand::Forward)),
    }
}

/// Farbe der Status-LED für eine Phase
///
/// - Idle: Grün (bereit)
/// - Forward: Blau (fördert)
/// - Back: Rot (Rückwärtslauf)
/// - ForwardPause / Rest: gedimmtes Blau
pub fn status_color(phase: Phase, brightness: u8) -> RGB8 {
    match phase {
        Phase::Idle => RGB8 {
            r: 0,
            g: brightness,
            b: 0,
        },
        Phase::Forward => RGB8 {
            r: 0,
            g: 0,
            b: brightness,
        },
        Phase::Back => RGB8 {
            r: brightness,
            g: 0,
            b: 0,
        },
        Phase::ForwardPause | Phase::Rest => RGB8 {
            r: 0,
            g: 0,
            b: brightness / 4,
        },
    }
}

/// Rechnet einen Servo-Winkel in einen PWM-Duty-Wert um
///
/// # Parameter
/// - `angle`: 0..=180 Grad (größere Werte werden auf 180 begrenzt)
/// - `min_pulse_us` / `max_pulse_us`: Pulsbreite bei 0° bzw. 180°
/// - `period_us`: PWM-Periode (20 000 µs bei 50 Hz)
/// - `resolution_bits`: Auflösung des Duty-Registers
///
/// # Beispiele
///
/// ```
/// # use feeder_core::servo_duty;
/// // 1500 µs von 20 ms bei 14 Bit
/// assert_eq!(servo_duty(90, 500, 2500, 20_000, 14), 1228);
/// ```
pub fn servo_duty(
    angle: u8,
    min_pulse_us: u32,
    max_pulse_us: u32,
    period_us: u32,
    resolution_bits: u8,
) -> u32 {
    let angle = u32::from(angle.min(180));
    let pulse_us = min_pulse_us + angle * (max_pulse_us - min_pulse_us) / 180;
    let full_scale = 1u64 << resolution_bits;
    (u64::from(pulse_us) * full_scale / u64::from(period_us)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_field_sum() {
        let params = FeedParameters::new(100, 50, 10, 10, 3);
        assert_eq!(params_checksum(&params), 173);
    }

    #[test]
    fn test_checksum_wraps_instead_of_panicking() {
        let params = FeedParameters::new(i32::MAX, 1, 0, 0, 0);
        assert_eq!(params.checksum, i32::MIN);
        assert!(!params.is_valid());
    }

    #[test]
    fn test_next_step_closed_cycle() {
        assert_eq!(
            next_step(Phase::Forward, 0, 3),
            Some((Phase::ForwardPause, ActuatorCommand::Stop))
        );
        assert_eq!(
            next_step(Phase::ForwardPause, 0, 3),
            Some((Phase::Back, ActuatorCommand::Backward))
        );
        assert_eq!(
            next_step(Phase::Rest, 1, 3),
            Some((Phase::Forward, ActuatorCommand::Forward))
        );
        assert_eq!(next_step(Phase::Idle, 0, 3), None);
    }

    #[test]
    fn test_next_step_back_fork() {
        assert_eq!(
            next_step(Phase::Back, 2, 3),
            Some((Phase::Rest, ActuatorCommand::Stop))
        );
        assert_eq!(
            next_step(Phase::Back, 3, 3),
            Some((Phase::Idle, ActuatorCommand::Stop))
        );
    }

    #[test]
    fn test_next_step_zero_iterations_ends_after_first_back() {
        assert_eq!(
            next_step(Phase::Back, 1, 0),
            Some((Phase::Idle, ActuatorCommand::Stop))
        );
    }

    #[test]
    fn test_status_color_idle_is_green() {
        assert_eq!(status_color(Phase::Idle, 10), RGB8 { r: 0, g: 10, b: 0 });
    }

    #[test]
    fn test_status_color_back_is_red() {
        assert_eq!(status_color(Phase::Back, 10), RGB8 { r: 10, g: 0, b: 0 });
    }

    #[test]
    fn test_servo_duty_end_points() {
        // 500 µs / 20 ms * 16384 = 409.6
        assert_eq!(servo_duty(0, 500, 2500, 20_000, 14), 409);
        // 2500 µs / 20 ms * 16384 = 2048
        assert_eq!(servo_duty(180, 500, 2500, 20_000, 14), 2048);
        assert_eq!(servo_duty(255, 500, 2500, 20_000, 14), 2048);
    }
}
