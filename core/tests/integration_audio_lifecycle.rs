//! Audio session lifecycle against the simulated device
//!
//! Verifies exclusivity of the alert resource, idempotent stop and cleanup
//! after partial failures.
//!
//! Run with: cargo test --test integration_audio_lifecycle

use callbridge_core::sim::{SimFaults, SimulatedDevice};
use callbridge_core::{BridgeConfig, Channel, Command, CommandDispatcher, CommandResult, EventSink};

fn dispatcher_for(device: &SimulatedDevice) -> CommandDispatcher {
    let (sink, _events) = EventSink::channel();
    CommandDispatcher::new(
        &BridgeConfig::default(),
        device.audio_host(),
        device.window_host(),
        sink,
    )
}

fn audio(method: &str) -> Command {
    Command::new(Channel::Audio, method)
}

#[test]
fn test_stop_without_session_is_idempotent() {
    let device = SimulatedDevice::new(31);
    let mut dispatcher = dispatcher_for(&device);

    assert_eq!(dispatcher.dispatch(&audio("stop")), CommandResult::success(true));
    assert_eq!(dispatcher.dispatch(&audio("stop")), CommandResult::success(true));
    assert!(!dispatcher.is_playing());
    assert_eq!(device.stats().players_acquired, 0);
}

#[test]
fn test_double_play_keeps_one_live_handle() {
    let device = SimulatedDevice::new(31);
    let mut dispatcher = dispatcher_for(&device);

    assert_eq!(dispatcher.dispatch(&audio("play")), CommandResult::success(true));
    assert_eq!(dispatcher.dispatch(&audio("play")), CommandResult::success(true));

    let stats = device.stats();
    assert_eq!(stats.players_acquired, 2);
    assert_eq!(stats.players_released, 1);
    assert_eq!(stats.live_players, 1);
    // first handle released before the second was acquired
    assert_eq!(stats.peak_live_players, 1);
    assert!(stats.playing);
}

#[test]
fn test_play_stop_stop_scenario() {
    let device = SimulatedDevice::new(31);
    let mut dispatcher = dispatcher_for(&device);

    assert!(dispatcher.dispatch(&audio("play")).is_success());
    assert!(dispatcher.dispatch(&audio("play")).is_success());
    assert_eq!(dispatcher.dispatch(&audio("stop")), CommandResult::success(true));
    assert_eq!(dispatcher.dispatch(&audio("stop")), CommandResult::success(true));

    let stats = device.stats();
    assert_eq!(stats.live_players, 0);
    assert_eq!(stats.players_released, 2);
    assert!(!stats.playing);
}

#[test]
fn test_teardown_faults_never_leak_or_surface() {
    let device = SimulatedDevice::new(31);
    let mut dispatcher = dispatcher_for(&device);

    assert!(dispatcher.dispatch(&audio("play")).is_success());
    device.set_faults(SimFaults {
        fail_teardown: true,
        ..SimFaults::default()
    });

    assert_eq!(dispatcher.dispatch(&audio("stop")), CommandResult::success(true));
    assert!(!dispatcher.is_playing());
    assert_eq!(device.stats().live_players, 0);

    // restart over a faulty teardown still ends with exactly one live handle
    device.set_faults(SimFaults::default());
    assert!(dispatcher.dispatch(&audio("play")).is_success());
    device.set_faults(SimFaults {
        fail_teardown: true,
        ..SimFaults::default()
    });
    assert!(dispatcher.dispatch(&audio("play")).is_success());
    assert_eq!(device.stats().live_players, 1);
}

#[test]
fn test_acquire_failure_reports_err_play() {
    let device = SimulatedDevice::new(31);
    device.set_faults(SimFaults {
        fail_acquire: true,
        ..SimFaults::default()
    });
    let mut dispatcher = dispatcher_for(&device);

    let result = dispatcher.dispatch(&audio("play"));
    assert_eq!(result.code(), Some("ERR_PLAY"));
    assert!(!dispatcher.is_playing());
    assert_eq!(device.stats().live_players, 0);
}

#[test]
fn test_start_failure_releases_partial_handle() {
    let device = SimulatedDevice::new(31);
    let mut dispatcher = dispatcher_for(&device);
    assert!(dispatcher.dispatch(&audio("play")).is_success());

    device.set_faults(SimFaults {
        fail_start: true,
        ..SimFaults::default()
    });
    let result = dispatcher.dispatch(&audio("play"));
    assert_eq!(result.code(), Some("ERR_PLAY"));

    let stats = device.stats();
    assert_eq!(stats.players_acquired, 2);
    assert_eq!(stats.players_released, 2);
    assert_eq!(stats.live_players, 0);
    assert!(!dispatcher.is_playing());
}

#[test]
fn test_dropping_dispatcher_releases_audio() {
    let device = SimulatedDevice::new(31);
    {
        let mut dispatcher = dispatcher_for(&device);
        assert!(dispatcher.dispatch(&audio("play")).is_success());
        assert_eq!(device.stats().live_players, 1);
    }
    assert_eq!(device.stats().live_players, 0);
}

#[test]
fn test_unknown_audio_method() {
    let device = SimulatedDevice::new(31);
    let mut dispatcher = dispatcher_for(&device);
    assert_eq!(
        dispatcher.dispatch(&audio("pause")),
        CommandResult::NotImplemented
    );
}
