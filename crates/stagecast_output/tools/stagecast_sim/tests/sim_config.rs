use std::env;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use stagecast_core::config::WindowMode;
use stagecast_sim::config::{Scenario, SimConfig, DEFAULT_DEVICE, DEFAULT_HOLD_MS};

const VARS: [&str; 5] = [
    "STAGECAST_DEVICE",
    "STAGECAST_MODE",
    "STAGECAST_HOLD_MS",
    "STAGECAST_ANIMATE_MS",
    "STAGECAST_TRANSITIONS",
];

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().expect("lock")
}

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn defaults_without_args_or_env() {
    let _guard = env_lock();
    clear_env();

    let config = SimConfig::from_args_iter(["bin"]);
    assert_eq!(config.device, DEFAULT_DEVICE);
    assert_eq!(config.mode, WindowMode::Floating);
    assert_eq!(config.scenario, Scenario::Accelerate);
    assert_eq!(config.hold, Duration::from_millis(DEFAULT_HOLD_MS));
    assert!(config.transitions);
    assert!(config.wait_for_in_flight);
}

#[test]
fn flags_override_env() {
    let _guard = env_lock();
    clear_env();
    env::set_var("STAGECAST_DEVICE", "from-env");
    env::set_var("STAGECAST_MODE", "floating");

    let config = SimConfig::from_args_iter([
        "bin",
        "--device",
        "hall",
        "--mode=fullscreen",
        "--scenario",
        "burst",
        "--hold-ms",
        "40",
        "--no-wait",
    ]);
    assert_eq!(config.device, "hall");
    assert_eq!(config.mode, WindowMode::FullScreen);
    assert_eq!(config.scenario, Scenario::Burst);
    assert_eq!(config.hold, Duration::from_millis(40));
    assert!(!config.wait_for_in_flight);

    clear_env();
}

#[test]
fn transitions_env_and_flag_disable_animation() {
    let _guard = env_lock();
    clear_env();

    env::set_var("STAGECAST_TRANSITIONS", "off");
    assert!(!SimConfig::from_args_iter(["bin"]).transitions);

    env::set_var("STAGECAST_TRANSITIONS", "maybe");
    assert!(SimConfig::from_args_iter(["bin"]).transitions);
    assert!(!SimConfig::from_args_iter(["bin", "--no-transitions"]).transitions);

    clear_env();
}

#[test]
fn malformed_values_keep_previous_setting() {
    let _guard = env_lock();
    clear_env();
    env::set_var("STAGECAST_ANIMATE_MS", "fast");

    let config = SimConfig::from_args_iter(["bin", "--mode", "sideways", "--scenario", "nope"]);
    assert_eq!(config.mode, WindowMode::Floating);
    assert_eq!(config.scenario, Scenario::Accelerate);
    assert_eq!(config.animate, Duration::from_millis(250));

    clear_env();
}

#[test]
fn timing_flags_accept_both_forms() {
    let _guard = env_lock();
    clear_env();

    let config = SimConfig::from_args_iter(["bin", "--hold-ms=500", "--animate-ms=75"]);
    assert_eq!(config.hold, Duration::from_millis(500));
    assert_eq!(config.animate, Duration::from_millis(75));

    let config = SimConfig::from_args_iter(["bin", "--hold-ms", "20", "--animate-ms", "0"]);
    assert_eq!(config.hold, Duration::from_millis(20));
    assert_eq!(config.animate, Duration::ZERO);
}
