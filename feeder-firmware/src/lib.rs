// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

extern crate alloc;

// Module
pub mod config;
pub mod hal;
pub mod tasks;
pub mod web;

// Re-exports von feeder-core
pub use feeder_core::{
    Actuator, Clock, FeedController, FeedParameters, ParameterStore, ParameterUpdate, Phase,
    StatusLedWriter, StorageError, Transition, UpdateOutcome,
};

use core::cell::RefCell;

// Embassy Mutex-Typen
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;

use crate::hal::{EmbassyClock, FlashParameterStore, ServoAuger};

// ============================================================================
// Type-Aliase für den geteilten Controller
// ============================================================================
//
// Feeder-Task (pollt) und HTTP-Tasks (start/cancel/update) greifen auf
// denselben Controller zu. Alle Tasks laufen auf einem Executor, ein
// Zugriff ist immer eine kurze synchrone Critical Section: es gibt nie
// echte Parallelität, nur Verschachtelung zwischen zwei Polls.

/// Controller mit den echten Hardware-Implementierungen
pub type Feeder = FeedController<ServoAuger, FlashParameterStore, EmbassyClock>;

/// Geteilter Controller für alle Tasks
pub type SharedFeeder = Mutex<NoopRawMutex, RefCell<Feeder>>;

/// Kurzer synchroner Zugriff auf den geteilten Controller
pub fn with_feeder<R>(feeder: &SharedFeeder, f: impl FnOnce(&mut Feeder) -> R) -> R {
    feeder.lock(|cell| f(&mut cell.borrow_mut()))
}
