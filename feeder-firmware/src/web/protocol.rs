// JSON-Protokoll für GET /status
//
// Das Formular von POST /updateparams wird direkt in
// feeder_core::ParameterUpdate deserialisiert (Feldnamen forward, back,
// pause, rest, iterations).

use feeder_core::{FeedController, FeedParameters, Phase};
use serde::Serialize;

/// Status-Antwort
///
/// {"feeding":true,"phase":"back","iteration":2,"params":{"forward_ms":8500,...}}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub feeding: bool,
    pub phase: Phase,
    /// Abgeschlossene Iterationen (0 wenn Idle)
    pub iteration: i32,
    pub params: FeedParameters,
}

impl StatusMessage {
    /// Momentaufnahme eines Controllers
    pub fn from_controller<A, S, C>(feeder: &FeedController<A, S, C>) -> Self
    where
        A: feeder_core::Actuator,
        S: feeder_core::ParameterStore,
        C: feeder_core::Clock,
    {
        Self {
            feeding: feeder.is_feeding(),
            phase: feeder.phase(),
            iteration: feeder.completed_iterations(),
            params: feeder.parameters(),
        }
    }
}
