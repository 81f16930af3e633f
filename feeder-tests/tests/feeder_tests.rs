//! Integration Tests für den Fütterungs-Controller
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen Mock-Aktor,
//! Mock-Speicher und eine manuell weitergestellte Uhr.

use std::cell::Cell;
use std::rc::Rc;

use feeder_core::types::{
    DEFAULT_BACK_MS, DEFAULT_FORWARD_MS, DEFAULT_ITERATIONS, DEFAULT_PAUSE_MS, DEFAULT_REST_MS,
};
use feeder_core::{
    Actuator, ActuatorCommand, Clock, FeedController, FeedParameters, LedError, ParameterStore,
    ParameterUpdate, ParamsOrigin, Phase, StatusLedWriter, StorageError, UpdateOutcome,
    status_color,
};
use rgb::RGB8;

// ============================================================================
// Mocks
// ============================================================================

#[derive(Default)]
pub struct MockAuger {
    pub commands: Vec<ActuatorCommand>,
}

impl MockAuger {
    pub fn last(&self) -> Option<ActuatorCommand> {
        self.commands.last().copied()
    }
}

impl Actuator for MockAuger {
    fn drive_forward(&mut self) {
        self.commands.push(ActuatorCommand::Forward);
    }

    fn drive_backward(&mut self) {
        self.commands.push(ActuatorCommand::Backward);
    }

    fn stop(&mut self) {
        self.commands.push(ActuatorCommand::Stop);
    }
}

#[derive(Default)]
pub struct MockStore {
    pub data: Option<[u8; FeedParameters::ENCODED_LEN]>,
    pub save_count: usize,
    pub fail_saves: bool,
}

impl MockStore {
    pub fn with_params(params: FeedParameters) -> Self {
        Self {
            data: Some(params.to_bytes()),
            ..Default::default()
        }
    }
}

impl ParameterStore for MockStore {
    fn load(&mut self) -> Option<[u8; FeedParameters::ENCODED_LEN]> {
        self.data
    }

    fn save(&mut self, bytes: &[u8; FeedParameters::ENCODED_LEN]) -> Result<(), StorageError> {
        self.save_count += 1;
        if self.fail_saves {
            return Err(StorageError::WriteFailed);
        }
        self.data = Some(*bytes);
        Ok(())
    }
}

/// Uhr die der Test selbst weiterstellt (geteilt über Rc)
#[derive(Clone, Default)]
pub struct MockClock {
    now: Rc<Cell<u32>>,
}

impl MockClock {
    pub fn starting_at(ms: u32) -> Self {
        let clock = Self::default();
        clock.now.set(ms);
        clock
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

#[derive(Default)]
pub struct MockLedWriter {
    pub last_color: Option<RGB8>,
    pub write_count: usize,
    pub fail_next_write: bool,
}

impl StatusLedWriter for MockLedWriter {
    fn write(&mut self, color: RGB8) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }

        self.last_color = Some(color);
        self.write_count += 1;
        Ok(())
    }
}

type TestFeeder = FeedController<MockAuger, MockStore, MockClock>;

fn test_params() -> FeedParameters {
    FeedParameters::new(100, 50, 10, 10, 3)
}

fn feeder_with(params: FeedParameters) -> (TestFeeder, MockClock) {
    let clock = MockClock::starting_at(1_000);
    let feeder = FeedController::new(
        MockAuger::default(),
        MockStore::with_params(params),
        clock.clone(),
    );
    (feeder, clock)
}

/// Pollt in 1-ms-Schritten und sammelt die Zielphasen aller Übergänge
fn run_until_idle(feeder: &mut TestFeeder, clock: &MockClock, max_ms: u32) -> Vec<Phase> {
    let mut phases = Vec::new();
    for _ in 0..max_ms {
        clock.advance(1);
        if let Some(transition) = feeder.poll() {
            phases.push(transition.to);
        }
        if !feeder.is_feeding() {
            break;
        }
    }
    phases
}

// ============================================================================
// Tests: Parameter laden
// ============================================================================

#[test]
fn test_absent_store_installs_defaults_and_persists_once() {
    let feeder = FeedController::new(
        MockAuger::default(),
        MockStore::default(),
        MockClock::default(),
    );

    let params = feeder.parameters();
    assert_eq!(params.forward_ms, DEFAULT_FORWARD_MS);
    assert_eq!(params.back_ms, DEFAULT_BACK_MS);
    assert_eq!(params.pause_ms, DEFAULT_PAUSE_MS);
    assert_eq!(params.rest_ms, DEFAULT_REST_MS);
    assert_eq!(params.iterations, DEFAULT_ITERATIONS);
    assert_eq!(feeder.store().save_count, 1);
    assert_eq!(feeder.store().data, Some(FeedParameters::default().to_bytes()));
    assert_eq!(
        feeder.params_origin(),
        ParamsOrigin::Defaults { persisted: true }
    );
}

#[test]
fn test_valid_store_is_used_without_writing() {
    let (feeder, _clock) = feeder_with(test_params());
    assert_eq!(feeder.parameters(), test_params());
    assert_eq!(feeder.store().save_count, 0);
    assert_eq!(feeder.params_origin(), ParamsOrigin::Stored);
}

#[test]
fn test_corrupt_checksum_falls_back_to_defaults() {
    let mut corrupt = test_params();
    corrupt.checksum += 1;
    let (feeder, _clock) = feeder_with(corrupt);

    assert_eq!(feeder.parameters(), FeedParameters::default());
    assert_eq!(feeder.store().save_count, 1);
}

#[test]
fn test_failed_default_write_is_reported_in_origin() {
    let store = MockStore {
        fail_saves: true,
        ..Default::default()
    };
    let feeder = FeedController::new(MockAuger::default(), store, MockClock::default());

    assert_eq!(feeder.parameters(), FeedParameters::default());
    assert_eq!(
        feeder.params_origin(),
        ParamsOrigin::Defaults { persisted: false }
    );
}

#[test]
fn test_new_controller_is_idle_and_stopped() {
    let (feeder, _clock) = feeder_with(test_params());
    assert!(!feeder.is_feeding());
    assert_eq!(feeder.phase(), Phase::Idle);
    assert_eq!(feeder.actuator().last(), Some(ActuatorCommand::Stop));
}

// ============================================================================
// Tests: Zustandsautomat
// ============================================================================

#[test]
fn test_full_cycle_phase_order() {
    let (mut feeder, clock) = feeder_with(test_params());

    feeder.start_feeding();
    let mut phases = vec![feeder.phase()];
    phases.extend(run_until_idle(&mut feeder, &clock, 10_000));

    assert_eq!(
        phases,
        vec![
            Phase::Forward,
            Phase::ForwardPause,
            Phase::Back,
            Phase::Rest,
            Phase::Forward,
            Phase::ForwardPause,
            Phase::Back,
            Phase::Rest,
            Phase::Forward,
            Phase::ForwardPause,
            Phase::Back,
            Phase::Idle,
        ]
    );
    assert!(!feeder.is_feeding());
    assert_eq!(feeder.actuator().last(), Some(ActuatorCommand::Stop));
}

#[test]
fn test_full_cycle_timing() {
    let (mut feeder, clock) = feeder_with(test_params());
    feeder.start_feeding();

    // 3x (100 + 10 + 50) + 2x 10 Rest = 500 ms
    let mut elapsed = 0;
    while feeder.is_feeding() && elapsed < 10_000 {
        clock.advance(1);
        elapsed += 1;
        feeder.poll();
    }
    assert_eq!(elapsed, 500);
}

#[test]
fn test_actuator_commands_for_one_iteration() {
    let (mut feeder, clock) = feeder_with(FeedParameters::new(100, 50, 10, 10, 1));
    feeder.start_feeding();
    run_until_idle(&mut feeder, &clock, 10_000);

    // Stop (Konstruktor), Forward, Stop, Backward, Stop (Idle)
    assert_eq!(
        feeder.actuator().commands,
        vec![
            ActuatorCommand::Stop,
            ActuatorCommand::Forward,
            ActuatorCommand::Stop,
            ActuatorCommand::Backward,
            ActuatorCommand::Stop,
        ]
    );
}

#[test]
fn test_transition_reports_completed_iterations() {
    let (mut feeder, clock) = feeder_with(test_params());
    feeder.start_feeding();

    let mut last = None;
    for _ in 0..10_000 {
        clock.advance(1);
        if let Some(transition) = feeder.poll() {
            last = Some(transition);
        }
        if !feeder.is_feeding() {
            break;
        }
    }

    let last = last.unwrap();
    assert_eq!(last.from, Phase::Back);
    assert_eq!(last.to, Phase::Idle);
    assert_eq!(last.completed, 3);
    assert_eq!(feeder.completed_iterations(), 0);
}

#[test]
fn test_poll_while_idle_is_noop() {
    let (mut feeder, clock) = feeder_with(test_params());
    clock.advance(100_000);
    assert_eq!(feeder.poll(), None);
    assert_eq!(feeder.actuator().commands.len(), 1);
}

#[test]
fn test_coarse_polling_never_skips_a_phase() {
    let (mut feeder, clock) = feeder_with(test_params());
    feeder.start_feeding();

    // Ein Poll pro Sekunde: jeder Poll macht genau einen Übergang
    let mut phases = Vec::new();
    while feeder.is_feeding() {
        clock.advance(1_000);
        phases.push(feeder.poll().unwrap().to);
    }
    assert_eq!(phases.len(), 11);
    assert_eq!(phases.last(), Some(&Phase::Idle));
}

#[test]
fn test_cancel_from_every_phase() {
    for steps in 0..4 {
        let (mut feeder, clock) = feeder_with(test_params());
        feeder.start_feeding();

        let mut transitions = 0;
        while transitions < steps {
            clock.advance(1);
            if feeder.poll().is_some() {
                transitions += 1;
            }
        }

        feeder.cancel_feeding();
        assert!(!feeder.is_feeding());
        assert_eq!(feeder.completed_iterations(), 0);
        assert_eq!(feeder.actuator().last(), Some(ActuatorCommand::Stop));

        // Abgebrochene Timer dürfen nicht nachfeuern
        clock.advance(10_000);
        assert_eq!(feeder.poll(), None);
    }
}

#[test]
fn test_cancel_is_idempotent() {
    let (mut feeder, _clock) = feeder_with(test_params());
    feeder.cancel_feeding();
    feeder.cancel_feeding();
    assert!(!feeder.is_feeding());
    assert_eq!(feeder.actuator().last(), Some(ActuatorCommand::Stop));
}

#[test]
fn test_restart_mid_cycle_resets_iterations() {
    let (mut feeder, clock) = feeder_with(test_params());
    feeder.start_feeding();

    // Bis in die zweite Iteration laufen
    while feeder.completed_iterations() < 1 {
        clock.advance(1);
        feeder.poll();
    }
    assert_eq!(feeder.phase(), Phase::Rest);

    feeder.start_feeding();
    assert_eq!(feeder.phase(), Phase::Forward);
    assert_eq!(feeder.completed_iterations(), 0);
    assert_eq!(feeder.actuator().last(), Some(ActuatorCommand::Forward));

    // Neuer Zyklus läuft wieder alle 3 Iterationen
    let phases = run_until_idle(&mut feeder, &clock, 10_000);
    assert_eq!(phases.iter().filter(|p| **p == Phase::Back).count(), 3);
}

#[test]
fn test_zero_durations_advance_one_phase_per_poll() {
    let (mut feeder, _clock) = feeder_with(test_params());
    // Ungültige Checksumme (-3) interessiert nur beim Laden, nicht beim Update
    feeder
        .update_parameters(FeedParameters::new(0, -5, 0, 0, 2))
        .unwrap();
    feeder.start_feeding();

    let mut polls = 0;
    while feeder.is_feeding() {
        assert!(feeder.poll().is_some());
        polls += 1;
    }
    assert_eq!(polls, 7);
}

#[test]
fn test_cycle_across_clock_wraparound() {
    let clock = MockClock::starting_at(u32::MAX - 200);
    let mut feeder = FeedController::new(
        MockAuger::default(),
        MockStore::with_params(test_params()),
        clock.clone(),
    );
    feeder.start_feeding();
    let phases = run_until_idle(&mut feeder, &clock, 10_000);
    assert_eq!(phases.len(), 11);
    assert_eq!(phases.last(), Some(&Phase::Idle));
}

// ============================================================================
// Tests: Parameter-Update
// ============================================================================

#[test]
fn test_update_identical_is_unchanged_and_not_persisted() {
    let (mut feeder, _clock) = feeder_with(test_params());
    let result = feeder.update_parameters(test_params());
    assert_eq!(result, Ok(UpdateOutcome::Unchanged));
    assert_eq!(feeder.store().save_count, 0);
}

#[test]
fn test_update_one_field_persists_valid_blob() {
    let (mut feeder, _clock) = feeder_with(test_params());
    let mut candidate = test_params();
    candidate.rest_ms = 25;
    candidate.checksum = 0;

    let result = feeder.update_parameters(candidate);
    assert_eq!(result, Ok(UpdateOutcome::Applied));
    assert_eq!(feeder.store().save_count, 1);

    let stored = FeedParameters::from_bytes(&feeder.store().data.unwrap());
    assert_eq!(stored.rest_ms, 25);
    assert_eq!(
        stored.checksum,
        stored.forward_ms + stored.back_ms + stored.pause_ms + stored.rest_ms + stored.iterations
    );
    assert!(stored.is_valid());
    assert_eq!(feeder.parameters(), stored);
}

#[test]
fn test_updated_blob_reloads_in_new_controller() {
    let (mut feeder, _clock) = feeder_with(test_params());
    feeder
        .apply_update(&ParameterUpdate {
            iterations: Some(7),
            ..Default::default()
        })
        .unwrap();

    let bytes = feeder.store().data.unwrap();
    let reloaded = FeedController::new(
        MockAuger::default(),
        MockStore {
            data: Some(bytes),
            ..Default::default()
        },
        MockClock::default(),
    );
    assert_eq!(reloaded.params_origin(), ParamsOrigin::Stored);
    assert_eq!(reloaded.parameters().iterations, 7);
}

#[test]
fn test_update_storage_failure_is_distinct() {
    let mut feeder = FeedController::new(
        MockAuger::default(),
        MockStore {
            data: Some(test_params().to_bytes()),
            save_count: 0,
            fail_saves: true,
        },
        MockClock::default(),
    );

    let result = feeder.apply_update(&ParameterUpdate {
        forward_ms: Some(200),
        ..Default::default()
    });
    assert_eq!(result, Err(StorageError::WriteFailed));
    // RAM enthält die versuchten Werte
    assert_eq!(feeder.parameters().forward_ms, 200);
}

#[test]
fn test_update_mid_phase_keeps_running_timer() {
    let (mut feeder, clock) = feeder_with(test_params());
    feeder.start_feeding();

    // Forward läuft mit 100 ms, neue Dauer 1000 ms
    feeder
        .apply_update(&ParameterUpdate {
            forward_ms: Some(1_000),
            ..Default::default()
        })
        .unwrap();

    clock.advance(100);
    let transition = feeder.poll().unwrap();
    assert_eq!(transition.to, Phase::ForwardPause);

    // Nächste Forward-Phase nutzt die neue Dauer
    while feeder.phase() != Phase::Forward {
        clock.advance(1);
        feeder.poll();
    }
    clock.advance(999);
    assert_eq!(feeder.poll(), None);
    clock.advance(1);
    assert_eq!(feeder.poll().unwrap().to, Phase::ForwardPause);
}

#[test]
fn test_update_iterations_mid_cycle_applies_at_back_fork() {
    let (mut feeder, clock) = feeder_with(test_params());
    feeder.start_feeding();
    feeder
        .apply_update(&ParameterUpdate {
            iterations: Some(1),
            ..Default::default()
        })
        .unwrap();

    let phases = run_until_idle(&mut feeder, &clock, 10_000);
    assert_eq!(
        phases,
        vec![Phase::ForwardPause, Phase::Back, Phase::Idle]
    );
}

// ============================================================================
// Tests: Status-LED
// ============================================================================

#[test]
fn test_status_led_follows_phase() {
    let (mut feeder, clock) = feeder_with(test_params());
    let mut led = MockLedWriter::default();

    led.write(status_color(feeder.phase(), 10)).unwrap();
    assert_eq!(led.last_color, Some(RGB8 { r: 0, g: 10, b: 0 }));

    feeder.start_feeding();
    led.write(status_color(feeder.phase(), 10)).unwrap();
    assert_eq!(led.last_color, Some(RGB8 { r: 0, g: 0, b: 10 }));

    run_until_idle(&mut feeder, &clock, 10_000);
    led.write(status_color(feeder.phase(), 10)).unwrap();
    assert_eq!(led.write_count, 3);
    assert_eq!(led.last_color, Some(RGB8 { r: 0, g: 10, b: 0 }));
}

#[test]
fn test_mock_led_writer_recovers_after_fail() {
    let mut led = MockLedWriter {
        fail_next_write: true,
        ..Default::default()
    };

    assert_eq!(
        led.write(RGB8 { r: 10, g: 0, b: 0 }),
        Err(LedError::WriteFailed)
    );
    assert!(led.write(RGB8 { r: 0, g: 10, b: 0 }).is_ok());
    assert_eq!(led.write_count, 1);
}
