use std::env;
use std::time::Duration;

use stagecast_core::config::WindowMode;

pub const DEFAULT_DEVICE: &str = "beamer";
pub const DEFAULT_HOLD_MS: u64 = 1500;
pub const DEFAULT_ANIMATE_MS: u64 = 250;

/// What the simulator submits to the window.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Scenario {
    /// One send-wait-clear, run to the end of its hold.
    Hold,
    /// A resize request lands while a send-wait-clear is entering.
    Accelerate,
    /// Several differently sized sends in a row; the last one wins.
    Burst,
}

impl Scenario {
    pub fn label(self) -> &'static str {
        match self {
            Scenario::Hold => "hold",
            Scenario::Accelerate => "accelerate",
            Scenario::Burst => "burst",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hold" => Some(Scenario::Hold),
            "accelerate" => Some(Scenario::Accelerate),
            "burst" => Some(Scenario::Burst),
            _ => None,
        }
    }
}

pub struct SimConfig {
    pub device: String,
    pub mode: WindowMode,
    pub scenario: Scenario,
    pub hold: Duration,
    pub animate: Duration,
    pub transitions: bool,
    pub wait_for_in_flight: bool,
}

impl SimConfig {
    pub fn from_args() -> Self {
        Self::from_args_iter(env::args())
    }

    pub fn from_args_iter<I, S>(iter: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut device =
            env::var("STAGECAST_DEVICE").unwrap_or_else(|_| DEFAULT_DEVICE.to_string());
        let mut mode = env::var("STAGECAST_MODE")
            .ok()
            .and_then(|v| parse_mode(&v))
            .unwrap_or(WindowMode::Floating);
        let mut scenario = Scenario::Accelerate;
        let mut hold_ms = env::var("STAGECAST_HOLD_MS")
            .ok()
            .and_then(|v| parse_ms(&v))
            .unwrap_or(DEFAULT_HOLD_MS);
        let mut animate_ms = env::var("STAGECAST_ANIMATE_MS")
            .ok()
            .and_then(|v| parse_ms(&v))
            .unwrap_or(DEFAULT_ANIMATE_MS);
        let mut transitions = env::var("STAGECAST_TRANSITIONS")
            .ok()
            .and_then(parse_bool)
            .unwrap_or(true);
        let mut wait_for_in_flight = true;

        let mut args = iter.into_iter();
        let _ = args.next();
        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            match arg {
                "-h" | "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                "--device" => {
                    if let Some(value) = args.next() {
                        device = value.as_ref().to_string();
                    }
                }
                "--mode" => {
                    if let Some(m) = args.next().and_then(|v| parse_mode(v.as_ref())) {
                        mode = m;
                    }
                }
                "--scenario" => {
                    if let Some(s) = args.next().and_then(|v| Scenario::parse(v.as_ref())) {
                        scenario = s;
                    }
                }
                "--hold-ms" => {
                    if let Some(ms) = args.next().and_then(|v| parse_ms(v.as_ref())) {
                        hold_ms = ms;
                    }
                }
                "--animate-ms" => {
                    if let Some(ms) = args.next().and_then(|v| parse_ms(v.as_ref())) {
                        animate_ms = ms;
                    }
                }
                "--no-transitions" => {
                    transitions = false;
                }
                "--no-wait" => {
                    wait_for_in_flight = false;
                }
                _ if arg.starts_with("--device=") => {
                    device = arg["--device=".len()..].to_string();
                }
                _ if arg.starts_with("--mode=") => {
                    if let Some(m) = parse_mode(&arg["--mode=".len()..]) {
                        mode = m;
                    }
                }
                _ if arg.starts_with("--scenario=") => {
                    if let Some(s) = Scenario::parse(&arg["--scenario=".len()..]) {
                        scenario = s;
                    }
                }
                _ if arg.starts_with("--hold-ms=") => {
                    if let Some(ms) = parse_ms(&arg["--hold-ms=".len()..]) {
                        hold_ms = ms;
                    }
                }
                _ if arg.starts_with("--animate-ms=") => {
                    if let Some(ms) = parse_ms(&arg["--animate-ms=".len()..]) {
                        animate_ms = ms;
                    }
                }
                _ => {}
            }
        }

        Self {
            device,
            mode,
            scenario,
            hold: Duration::from_millis(hold_ms),
            animate: Duration::from_millis(animate_ms),
            transitions,
            wait_for_in_flight,
        }
    }
}

fn print_usage() {
    println!(
        "stagecast_sim [--device <id>] [--mode fullscreen|floating] \
         [--scenario hold|accelerate|burst] [--hold-ms <ms>] [--animate-ms <ms>] \
         [--no-transitions] [--no-wait]"
    );
}

fn parse_mode(value: &str) -> Option<WindowMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "fullscreen" | "full-screen" => Some(WindowMode::FullScreen),
        "floating" => Some(WindowMode::Floating),
        _ => None,
    }
}

fn parse_ms(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}

fn parse_bool(value: String) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
