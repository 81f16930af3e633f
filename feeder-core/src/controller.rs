//! Fütterungs-Controller
//!
//! Treibt die Schnecke durch den Zyklus
//! Forward → ForwardPause → Back → Rest → Forward ... für
//! `iterations` Durchläufe. Jede Phase hat ihren eigenen
//! `NonBlockingTimer`, der Zustand wechselt ausschließlich in `poll()`
//! sowie durch `start_feeding()` / `cancel_feeding()`.

use crate::logic::next_step;
use crate::timer::NonBlockingTimer;
use crate::traits::{Actuator, Clock, ParameterStore, StorageError};
use crate::types::{
    ActuatorCommand, FeedCycleState, FeedParameters, ParameterUpdate, ParamsOrigin, Phase,
    Transition, UpdateOutcome,
};

/// Zustandsautomat für genau einen Schnecken-Antrieb
///
/// Besitzt Aktor, Speicher und Uhr exklusiv. Mehrere Instanzen sind
/// unabhängig voneinander.
///
/// # Generische Parameter
/// - `A: Actuator` - Servo (Hardware oder Mock)
/// - `S: ParameterStore` - Flash/EEPROM (Hardware oder Mock)
/// - `C: Clock` - Millisekunden-Uhr
pub struct FeedController<A, S, C> {
    actuator: A,
    store: S,
    clock: C,
    params: FeedParameters,
    origin: ParamsOrigin,
    state: FeedCycleState,
    forward_timer: NonBlockingTimer,
    pause_timer: NonBlockingTimer,
    back_timer: NonBlockingTimer,
    rest_timer: NonBlockingTimer,
}

impl<A: Actuator, S: ParameterStore, C: Clock> FeedController<A, S, C> {
    /// Erstellt den Controller und lädt die Parameter
    ///
    /// Der Aktor wird sofort angehalten. Ist der gespeicherte Blob nicht
    /// vorhanden oder ungültig, werden die Defaults eingesetzt und direkt
    /// geschrieben. Ob das geklappt hat, steht in `params_origin()`.
    pub fn new(mut actuator: A, mut store: S, clock: C) -> Self {
        actuator.stop();

        let loaded = store
            .load()
            .map(|bytes| FeedParameters::from_bytes(&bytes))
            .filter(FeedParameters::is_valid);

        let (params, origin) = match loaded {
            Some(params) => (params, ParamsOrigin::Stored),
            None => {
                let params = FeedParameters::default();
                let persisted = store.save(&params.to_bytes()).is_ok();
                (params, ParamsOrigin::Defaults { persisted })
            }
        };

        let mut controller = Self {
            actuator,
            store,
            clock,
            params,
            origin,
            state: FeedCycleState::default(),
            forward_timer: NonBlockingTimer::default(),
            pause_timer: NonBlockingTimer::default(),
            back_timer: NonBlockingTimer::default(),
            rest_timer: NonBlockingTimer::default(),
        };
        controller.load_timer_durations();
        controller
    }

    /// Startet einen Fütterungs-Zyklus
    ///
    /// Läuft bereits ein Zyklus, beginnt er von vorne bei Iteration 0.
    /// Es gibt bewusst keine Sperre gegen wiederholtes Starten.
    pub fn start_feeding(&mut self) {
        self.disarm_all();
        self.state = FeedCycleState {
            phase: Phase::Forward,
            completed: 0,
        };
        self.actuator.drive_forward();
        self.forward_timer.arm(self.clock.now_ms());
    }

    /// Bricht einen laufenden Zyklus ab (idempotent)
    pub fn cancel_feeding(&mut self) {
        self.actuator.stop();
        self.disarm_all();
        self.state = FeedCycleState::default();
    }

    /// Treibt den Zustandsautomaten weiter
    ///
    /// Muss regelmäßig aufgerufen werden, mindestens so oft wie die kürzeste
    /// Phase dauert. Seltenere Aufrufe verzögern Übergänge, führen aber nie
    /// zu falschen Übergängen.
    ///
    /// Liefert den Phasenwechsel, falls einer stattgefunden hat.
    pub fn poll(&mut self) -> Option<Transition> {
        let now = self.clock.now_ms();
        let from = self.state.phase;

        let fired = match from {
            Phase::Idle => return None,
            Phase::Forward => self.forward_timer.poll(now),
            Phase::ForwardPause => self.pause_timer.poll(now),
            Phase::Back => self.back_timer.poll(now),
            Phase::Rest => self.rest_timer.poll(now),
        };
        if !fired {
            return None;
        }

        if from == Phase::Back {
            self.state.completed = self.state.completed.saturating_add(1);
        }

        let (to, command) = next_step(from, self.state.completed, self.params.iterations)?;
        self.apply(command);

        // Idle: der Stop-Befehl aus `next_step` hat den Antrieb schon angehalten
        match to {
            Phase::Idle => {}
            Phase::Forward => self.forward_timer.arm(now),
            Phase::ForwardPause => self.pause_timer.arm(now),
            Phase::Back => self.back_timer.arm(now),
            Phase::Rest => self.rest_timer.arm(now),
        }
        self.state.phase = to;

        let completed = self.state.completed;
        if to == Phase::Idle {
            self.state.completed = 0;
        }

        Some(Transition {
            from,
            to,
            completed,
        })
    }

    pub fn is_feeding(&self) -> bool {
        self.state.phase != Phase::Idle
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn completed_iterations(&self) -> i32 {
        self.state.completed
    }

    pub fn cycle_state(&self) -> FeedCycleState {
        self.state
    }

    pub fn parameters(&self) -> FeedParameters {
        self.params
    }

    pub fn params_origin(&self) -> ParamsOrigin {
        self.origin
    }

    /// Übernimmt neue Parameter
    ///
    /// - Identischer Kandidat: `Ok(Unchanged)`, der Speicher wird nicht angefasst.
    /// - Sonst: Checksumme neu, speichern, Timer-Dauern neu laden, `Ok(Applied)`.
    /// - Speichern fehlgeschlagen: `Err(..)`. Die Parameter im RAM enthalten
    ///   dann bereits die neuen Werte, die Timer laufen noch mit den alten.
    ///
    /// Bereits scharfe Timer laufen mit ihrer alten Dauer zu Ende.
    pub fn update_parameters(
        &mut self,
        candidate: FeedParameters,
    ) -> Result<UpdateOutcome, StorageError> {
        if candidate.same_settings(&self.params) {
            return Ok(UpdateOutcome::Unchanged);
        }

        let mut params = candidate;
        params.refresh_checksum();
        self.params = params;

        self.store.save(&params.to_bytes())?;
        self.load_timer_durations();
        Ok(UpdateOutcome::Applied)
    }

    /// Wie `update_parameters()`, aber mit einem Teil-Update
    pub fn apply_update(&mut self, update: &ParameterUpdate) -> Result<UpdateOutcome, StorageError> {
        let candidate = update.apply_to(&self.params);
        self.update_parameters(candidate)
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn apply(&mut self, command: ActuatorCommand) {
        match command {
            ActuatorCommand::Forward => self.actuator.drive_forward(),
            ActuatorCommand::Backward => self.actuator.drive_backward(),
            ActuatorCommand::Stop => self.actuator.stop(),
        }
    }

    fn load_timer_durations(&mut self) {
        self.forward_timer.set_duration(self.params.forward_ms);
        self.pause_timer.set_duration(self.params.pause_ms);
        self.back_timer.set_duration(self.params.back_ms);
        self.rest_timer.set_duration(self.params.rest_ms);
    }

    fn disarm_all(&mut self) {
        self.forward_timer.disarm();
        self.pause_timer.disarm();
        self.back_timer.disarm();
        self.rest_timer.disarm();
    }
}
