//! Feeder Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert den Fütterungs-Zustandsautomaten, den nicht-blockierenden
//! Timer, die persistierten Parameter und die Traits für Aktor, Speicher und Uhr.

#![no_std]

pub mod controller;
pub mod logic;
pub mod timer;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use controller::FeedController;
pub use logic::{next_step, params_checksum, servo_duty, status_color};
pub use timer::NonBlockingTimer;
pub use traits::{Actuator, Clock, LedError, ParameterStore, StatusLedWriter, StorageError};
pub use types::{
    ActuatorCommand, FeedCycleState, FeedParameters, ParameterUpdate, ParamsOrigin, Phase,
    Transition, UpdateOutcome,
};
