//! Integration tests for the CycleController → FSM → ports pipeline.
//!
//! These run on the host (x86_64) and drive whole cycles against the
//! recording mocks in `mock_hw`, asserting on the exact hardware call
//! sequence.

use super::mock_hw::{
    HwCall, Motion, RecordingSink, actuation, after_sample, mock_board, motion, screens, sleeps,
};

use plantcycle::app::controller::CycleController;
use plantcycle::app::events::AppEvent;
use plantcycle::app::ports::StepDirection::{Forward, Reverse};
use plantcycle::config::{SystemConfig, Target};
use plantcycle::error::Error;
use plantcycle::fsm::Phase;
use plantcycle::sensors::Reading;

const DRY_AND_WARM: Reading = Reading {
    temperature_c: 25.0,
    humidity_pct: 45.0,
};
const HUMID: Reading = Reading {
    temperature_c: 25.0,
    humidity_pct: 60.0,
};

fn run_one(config: SystemConfig, readings: &[Reading]) -> (Vec<HwCall>, RecordingSink) {
    let (board, log) = mock_board(readings);
    let mut ctl = CycleController::new(config, board).expect("valid config");
    let mut sink = RecordingSink::new();
    ctl.run_cycle(&mut sink);
    let calls = log.borrow().clone();
    (calls, sink)
}

// ── Boot and self-test ────────────────────────────────────────

#[test]
fn start_forces_pump_off_then_arms_watchdog() {
    let (board, log) = mock_board(&[HUMID]);
    let mut ctl = CycleController::new(SystemConfig::default(), board).unwrap();
    let mut sink = RecordingSink::new();
    ctl.start(&mut sink);

    let calls = log.borrow();
    assert_eq!(calls[0], HwCall::Pump(false));
    assert_eq!(screens(&calls), vec!["System Init", "Ready"]);
    assert_eq!(calls.last(), Some(&HwCall::WdtArm(10_000)));
    assert_eq!(sink.events, vec![AppEvent::Started]);
    assert_eq!(ctl.phase(), Phase::Testing);
}

#[test]
fn start_is_idempotent() {
    let (board, log) = mock_board(&[HUMID]);
    let mut ctl = CycleController::new(SystemConfig::default(), board).unwrap();
    let mut sink = RecordingSink::new();
    ctl.start(&mut sink);
    let n = log.borrow().len();
    ctl.start(&mut sink);
    assert_eq!(log.borrow().len(), n);
}

#[test]
fn self_test_sweeps_selector_and_pulses_pump() {
    let (calls, _) = run_one(SystemConfig::default(), &[HUMID]);
    let before_sample: Vec<HwCall> = calls
        .iter()
        .take_while(|c| **c != HwCall::Sample)
        .cloned()
        .collect();

    let shown = screens(&before_sample);
    assert_eq!(
        shown,
        vec![
            "System Init",
            "Ready",
            "Testing LCD",
            "Testing Stepper",
            "Testing Pump",
            "Tests Complete"
        ]
    );

    assert_eq!(
        motion(&before_sample),
        vec![
            Motion::Pump(false),
            Motion::Delay(2000),
            Motion::Delay(1000),
            // self-test
            Motion::Delay(2000),
            Motion::Steps(Forward, 50),
            Motion::Delay(1000),
            Motion::Steps(Reverse, 50),
            Motion::Delay(1000),
            Motion::Pump(true),
            Motion::Delay(2000),
            Motion::Pump(false),
            Motion::Delay(1000),
            Motion::Delay(2000),
        ]
    );
}

// ── Decision paths ────────────────────────────────────────────

#[test]
fn humid_reading_sleeps_without_actuation() {
    let (calls, sink) = run_one(SystemConfig::default(), &[HUMID]);
    let after = after_sample(&calls, 0);

    assert!(actuation(&after).is_empty(), "unexpected: {:?}", actuation(&after));
    assert_eq!(sleeps(&after), vec![8_000; 75]);
    assert!(sink.watered().is_empty());
    assert!(sink.events.contains(&AppEvent::ReadingTaken(HUMID)));
}

#[test]
fn cold_dry_reading_does_not_water() {
    let cold = Reading::new(15.0, 30.0);
    let (calls, _) = run_one(SystemConfig::default(), &[cold]);
    assert!(actuation(&after_sample(&calls, 0)).is_empty());
}

#[test]
fn dry_warm_reading_waters_each_target_in_order() {
    let (calls, sink) = run_one(SystemConfig::default(), &[DRY_AND_WARM]);
    let after = after_sample(&calls, 0);

    assert_eq!(
        motion(&after),
        vec![
            // Plant A at position 0: already there after self-test.
            Motion::Pump(true),
            Motion::Delay(5000),
            Motion::Pump(false),
            // pause between targets
            Motion::Delay(2000),
            // Plant B at position 100.
            Motion::Steps(Forward, 100),
            Motion::Pump(true),
            Motion::Delay(5000),
            Motion::Pump(false),
        ]
    );
    assert_eq!(
        sink.watered(),
        vec![
            ("Plant A".to_string(), 0, 5000),
            ("Plant B".to_string(), 100, 5000),
        ]
    );
    assert_eq!(sleeps(&after), vec![8_000; 75]);

    let shown = screens(&after);
    assert_eq!(shown[0], "Temp: 25.00 C");
    assert!(shown.contains(&"Watering Plant A".to_string()));
    assert!(shown.contains(&"Watering Plant B".to_string()));
}

#[test]
fn reading_is_shown_on_two_rows() {
    let (calls, _) = run_one(SystemConfig::default(), &[DRY_AND_WARM]);
    let after = after_sample(&calls, 0);
    assert_eq!(
        after[0],
        HwCall::Show(vec!["Temp: 25.00 C".into(), "Humidity: 45.00 %".into()])
    );
}

#[test]
fn invalid_reading_takes_error_path() {
    let (calls, sink) = run_one(SystemConfig::default(), &[Reading::invalid()]);
    let after = after_sample(&calls, 0);

    assert!(actuation(&after).is_empty());
    assert_eq!(screens(&after), vec!["Sensor error!"]);
    assert_eq!(sleeps(&after), vec![8_000; 75]);
    assert!(sink.events.contains(&AppEvent::SensorFault));
    assert!(sink.events.contains(&AppEvent::PhaseChanged {
        from: Phase::Sampling,
        to: Phase::Error,
    }));
    assert!(sink.events.contains(&AppEvent::Slept {
        requested_ms: 600_000,
        sub_cycles: 75,
    }));
}

#[test]
fn sensor_fault_uses_its_own_sleep_duration() {
    let config = SystemConfig {
        sensor_fault_sleep_ms: 80_000,
        ..SystemConfig::default()
    };
    let (calls, _) = run_one(config, &[Reading::invalid()]);
    assert_eq!(sleeps(&after_sample(&calls, 0)).len(), 10);
}

#[test]
fn sleep_remainder_is_dropped() {
    let config = SystemConfig {
        cycle_interval_ms: 8_500,
        ..SystemConfig::default()
    };
    let (calls, _) = run_one(config, &[HUMID]);
    assert_eq!(sleeps(&calls), vec![8_000]);
}

// ── Report and multi-cycle behaviour ──────────────────────────

#[test]
fn report_matches_cycle_outcome() {
    let (board, _log) = mock_board(&[DRY_AND_WARM, Reading::invalid(), HUMID]);
    let mut ctl = CycleController::new(SystemConfig::default(), board).unwrap();
    let mut sink = RecordingSink::new();

    let r1 = ctl.run_cycle(&mut sink);
    assert_eq!(r1.cycle, 1);
    assert!(r1.watered);
    assert!(!r1.sensor_fault);
    assert_eq!(r1.sleep.sub_cycles, 75);

    let r2 = ctl.run_cycle(&mut sink);
    assert_eq!(r2.cycle, 2);
    assert!(!r2.watered);
    assert!(r2.sensor_fault);

    let r3 = ctl.run_cycle(&mut sink);
    assert_eq!(r3.cycle, 3);
    assert!(!r3.watered);
    assert!(!r3.sensor_fault);
    assert_eq!(r3.reading, Some(HUMID));

    let stats = ctl.stats();
    assert_eq!(stats.cycles, 3);
    assert_eq!(stats.waterings, 1);
    assert_eq!(stats.sensor_faults, 1);
    assert_eq!(stats.sub_cycles_slept, 3 * 75);
    // 5 (watered) + 4 (error) + 4 (no water)
    assert_eq!(stats.phase_transitions, 13);
    assert_eq!(ctl.config(), &SystemConfig::default());
    assert_eq!(ctl.phase(), Phase::Testing);
}

#[test]
fn selector_returns_home_during_next_self_test() {
    let (board, log) = mock_board(&[DRY_AND_WARM, HUMID]);
    let mut ctl = CycleController::new(SystemConfig::default(), board).unwrap();
    let mut sink = RecordingSink::new();

    ctl.run_cycle(&mut sink);
    assert_eq!(ctl.position(), 100);

    log.borrow_mut().clear();
    ctl.run_cycle(&mut sink);
    let calls = log.borrow();
    let self_test: Vec<HwCall> = calls
        .iter()
        .take_while(|c| **c != HwCall::Sample)
        .cloned()
        .collect();
    let m = motion(&self_test);
    assert!(m.contains(&Motion::Steps(Reverse, 50)), "100 -> 50: {m:?}");
    assert_eq!(ctl.position(), 0);
}

#[test]
fn every_cycle_ends_with_completion_event() {
    let (board, _log) = mock_board(&[HUMID, DRY_AND_WARM]);
    let mut ctl = CycleController::new(SystemConfig::default(), board).unwrap();
    let mut sink = RecordingSink::new();
    ctl.run_cycle(&mut sink);
    ctl.run_cycle(&mut sink);

    let completed: Vec<&AppEvent> = sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::CycleCompleted { .. }))
        .collect();
    assert_eq!(
        completed,
        vec![
            &AppEvent::CycleCompleted {
                cycle: 1,
                watered: false
            },
            &AppEvent::CycleCompleted {
                cycle: 2,
                watered: true
            },
        ]
    );
}

// ── Pump safety ───────────────────────────────────────────────

#[test]
fn pump_is_never_on_while_selector_moves() {
    let (board, log) = mock_board(&[DRY_AND_WARM, HUMID, Reading::invalid()]);
    let mut ctl = CycleController::new(SystemConfig::default(), board).unwrap();
    let mut sink = RecordingSink::new();
    for _ in 0..3 {
        ctl.run_cycle(&mut sink);
    }

    let mut pump_on = false;
    for c in log.borrow().iter() {
        match c {
            HwCall::Pump(on) => pump_on = *on,
            HwCall::Step(_) | HwCall::Sleep(_) | HwCall::Sample => {
                assert!(!pump_on, "pump on during {c:?}")
            }
            _ => {}
        }
    }
    assert!(!pump_on);
}

#[test]
fn into_board_disarms_and_stops_pump() {
    let (board, log) = mock_board(&[HUMID]);
    let mut ctl = CycleController::new(SystemConfig::default(), board).unwrap();
    ctl.run_cycle(&mut RecordingSink::new());
    let _board = ctl.into_board();

    let calls = log.borrow();
    let n = calls.len();
    assert_eq!(&calls[n - 2..], &[HwCall::Pump(false), HwCall::WdtDisarm]);
}

// ── Watchdog liveness ─────────────────────────────────────────

#[test]
fn watchdog_is_reset_before_every_sub_cycle() {
    let (calls, _) = run_one(SystemConfig::default(), &[DRY_AND_WARM]);
    for (i, c) in calls.iter().enumerate() {
        if matches!(c, HwCall::Sleep(_)) {
            assert_eq!(calls[i - 1], HwCall::WdtReset, "call {i}");
        }
    }
}

/// Longest stretch, in ms, the recorded run went without a watchdog reset
/// once the watchdog was armed.
fn longest_unfed_gap(config: SystemConfig, readings: &[Reading], cycles: usize) -> u32 {
    let step_ms = config.step_interval_us() / 1000;
    let (board, log) = mock_board(readings);
    let mut ctl = CycleController::new(config, board).unwrap();
    let mut sink = RecordingSink::new();
    for _ in 0..cycles {
        ctl.run_cycle(&mut sink);
    }

    let calls = log.borrow();
    let armed_at = calls
        .iter()
        .position(|c| matches!(c, HwCall::WdtArm(_)))
        .unwrap();
    let mut since_reset = 0u32;
    let mut longest = 0u32;
    for c in &calls[armed_at..] {
        match c {
            HwCall::WdtReset => since_reset = 0,
            HwCall::Delay(ms) | HwCall::Sleep(ms) => since_reset += ms,
            HwCall::Step(_) => since_reset += step_ms,
            _ => {}
        }
        longest = longest.max(since_reset);
    }
    longest
}

#[test]
fn watchdog_is_fed_at_least_once_per_quantum() {
    let config = SystemConfig::default();
    let quantum = config.sleep_quantum_ms;
    let gap = longest_unfed_gap(config, &[DRY_AND_WARM, Reading::invalid(), HUMID], 3);
    assert!(gap <= quantum, "{gap}ms without a reset");
}

#[test]
fn quantum_long_waits_still_feed_the_watchdog_in_time() {
    let mut config = SystemConfig::default();
    let quantum = config.sleep_quantum_ms;
    for t in config.targets.iter_mut() {
        t.dispense_ms = quantum;
    }
    config.inter_target_pause_ms = quantum;
    config.sensor_error_hold_ms = quantum;

    let gap = longest_unfed_gap(config, &[DRY_AND_WARM, Reading::invalid()], 2);
    assert_eq!(gap, quantum);
}

// ── Display is best-effort ────────────────────────────────────

#[test]
fn display_failure_does_not_change_control_flow() {
    let strip = |calls: &[HwCall]| -> Vec<HwCall> {
        calls
            .iter()
            .filter(|c| !matches!(c, HwCall::Show(_)))
            .cloned()
            .collect()
    };

    let (board, log_ok) = mock_board(&[DRY_AND_WARM]);
    let mut ok = CycleController::new(SystemConfig::default(), board).unwrap();
    ok.run_cycle(&mut RecordingSink::new());

    let (mut board, log_bad) = mock_board(&[DRY_AND_WARM]);
    board.display.fail = true;
    let mut bad = CycleController::new(SystemConfig::default(), board).unwrap();
    bad.run_cycle(&mut RecordingSink::new());

    assert_eq!(strip(&log_ok.borrow()), strip(&log_bad.borrow()));
}

// ── Configuration ─────────────────────────────────────────────

#[test]
fn invalid_config_is_rejected_before_touching_hardware() {
    let config = SystemConfig {
        watchdog_timeout_ms: 8_000,
        ..SystemConfig::default()
    };
    let (board, log) = mock_board(&[HUMID]);
    let result = CycleController::new(config, board);
    assert!(matches!(result, Err(Error::Config(_))));
    assert!(log.borrow().is_empty());
}

#[test]
fn custom_targets_are_visited_in_configured_order() {
    let mut config = SystemConfig::default();
    config.targets.clear();
    for t in [
        Target::new("Fern", 150, 1000),
        Target::new("Basil", 20, 3000),
        Target::new("Mint", 20, 500),
    ] {
        config.targets.push(t).unwrap();
    }

    let (calls, sink) = run_one(config, &[DRY_AND_WARM]);
    assert_eq!(
        motion(&after_sample(&calls, 0)),
        vec![
            Motion::Steps(Forward, 150),
            Motion::Pump(true),
            Motion::Delay(1000),
            Motion::Pump(false),
            Motion::Delay(2000),
            Motion::Steps(Reverse, 130),
            Motion::Pump(true),
            Motion::Delay(3000),
            Motion::Pump(false),
            Motion::Delay(2000),
            // Mint shares Basil's position: no steps.
            Motion::Pump(true),
            Motion::Delay(500),
            Motion::Pump(false),
        ]
    );
    assert_eq!(sink.watered().len(), 3);
}
