//! `telegrip-cli` – headless driver for the telegrip teleoperator.
//!
//! Connects a [`TelegripTeleoperator`] to the in-process simulated control
//! system and runs the recording framework's poll loop against it:
//!
//! 1. Loads `~/.telegrip/config.toml` (writing defaults on first run).
//! 2. Connects, then polls actions and episode events at `TELEGRIP_POLL_HZ`
//!    (default 30 Hz), printing one JSON action record per line on stdout.
//! 3. Reads `a` / `b` lines on stdin as VR A / B button presses.
//! 4. Stops on a terminate-episode event or Ctrl-C and disconnects.

mod telemetry;

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use colored::Colorize;
use telegrip_teleop::config::{self, TelegripConfig};
use telegrip_teleop::{SimSubsystem, TelegripTeleoperator, Teleoperator};
use telegrip_types::{ArmSide, VrEvent};
use tracing::{info, warn};

const DEFAULT_POLL_HZ: f64 = 30.0;

fn main() {
    let cfg = load_config();
    let _guard = telemetry::init_tracing("telegrip", cfg.log_level);

    print_banner(&cfg);

    // ── Shutdown flag ────────────────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!();
        eprintln!("{}", "⚠  Ctrl-C received – disconnecting …".yellow().bold());
        shutdown_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; stop with a B button press instead");
    }

    // ── Simulated control system ─────────────────────────────────────────
    let sim = SimSubsystem::builder()
        .with_angles(ArmSide::Left, vec![0.0, 90.0, 90.0, 0.0, 0.0, 10.0])
        .with_angles(ArmSide::Right, vec![0.0, 90.0, 90.0, 0.0, 0.0, 10.0])
        .animated()
        .build();
    let mut teleop = TelegripTeleoperator::new(cfg, sim.factory());

    eprint!("  Connecting {} … ", teleop.name().bold());
    if let Err(e) = teleop.connect(true) {
        eprintln!("{}", "failed".red());
        eprintln!("  {}: {e}", "Connect error".red());
        std::process::exit(1);
    }
    eprintln!("{}", "connected".green());
    eprintln!(
        "  Press {} + Enter for success, {} + Enter to re-record, Ctrl-C to quit.\n",
        "a".bold().cyan(),
        "b".bold().cyan()
    );

    spawn_button_reader(Arc::clone(&sim));
    run_poll_loop(&mut teleop, &shutdown, poll_period());

    match teleop.disconnect() {
        Ok(()) => eprintln!("  {} Disconnected.", "✓".green().bold()),
        Err(e) => eprintln!("  {}: {e}", "Disconnect error".red()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Poll loop
// ─────────────────────────────────────────────────────────────────────────────

fn run_poll_loop(teleop: &mut TelegripTeleoperator, shutdown: &AtomicBool, period: Duration) {
    info!(period_ms = period.as_millis() as u64, "poll loop started");
    while !shutdown.load(Ordering::SeqCst) {
        let tick = Instant::now();

        match teleop.get_action() {
            Ok(action) => match serde_json::to_string(&action) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(error = %e, "failed to serialise action"),
            },
            Err(e) => {
                eprintln!("  {}: {e}", "Action error".red());
                break;
            }
        }

        let events = teleop.get_teleop_events();
        if events.any() {
            let summary = serde_json::to_string(&events).unwrap_or_default();
            eprintln!("  {} {}", "events".yellow().bold(), summary);
        }
        if events.terminate_episode {
            let outcome = if events.rerecord_episode { "re-record" } else { "success" };
            eprintln!("  {} Episode terminated ({outcome}).", "■".cyan().bold());
            break;
        }

        thread::sleep(period.saturating_sub(tick.elapsed()));
    }
}

/// Turn `a` / `b` lines on stdin into VR button events.
fn spawn_button_reader(sim: Arc<SimSubsystem>) {
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match line.trim() {
                "a" | "A" => sim.push_vr_event(VrEvent::new("button_a")),
                "b" | "B" => sim.push_vr_event(VrEvent::new("button_b")),
                "" => {}
                other => eprintln!("  {} '{other}'", "unknown button".dimmed()),
            }
        }
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

fn load_config() -> TelegripConfig {
    match config::load() {
        Ok(Some(cfg)) => {
            eprintln!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            let path = config::config_path();
            match config::save_to(&TelegripConfig::default(), &path) {
                Ok(()) => eprintln!(
                    "  {} No configuration found; defaults written to {}",
                    "✓".green().bold(),
                    path.display().to_string().bold()
                ),
                Err(e) => eprintln!("  {}: {e}", "Error saving config".red()),
            }
            let mut cfg = TelegripConfig::default();
            config::apply_env_overrides(&mut cfg);
            cfg
        }
        Err(e) => {
            eprintln!("  {}: {e}", "Config error".red());
            eprintln!("  Using default configuration.");
            let mut cfg = TelegripConfig::default();
            config::apply_env_overrides(&mut cfg);
            cfg
        }
    }
}

fn poll_period() -> Duration {
    let hz = parse_poll_hz(std::env::var("TELEGRIP_POLL_HZ").ok().as_deref());
    Duration::from_secs_f64(1.0 / hz)
}

/// Poll rate from `TELEGRIP_POLL_HZ`; non-positive or unparseable values fall
/// back to the default.
fn parse_poll_hz(raw: Option<&str>) -> f64 {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|hz| hz.is_finite() && *hz > 0.0)
        .unwrap_or(DEFAULT_POLL_HZ)
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner(cfg: &TelegripConfig) {
    eprintln!();
    eprintln!(
        "  {} {}",
        "telegrip".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    eprintln!("  VR / keyboard teleoperator for SO100 arms (simulated control system)");
    eprintln!(
        "  mode: {}   vr: {}:{}   web: https://{}:{}",
        (if cfg.bimanual { "bimanual" } else { "single arm" }).bold(),
        cfg.host_ip,
        cfg.websocket_port,
        cfg.host_ip,
        cfg.https_port
    );
    eprintln!();
}
