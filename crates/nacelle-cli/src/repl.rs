//! REPL – Read-Eval-Print Loop for the simulated nacelle rig.
//!
//! Supported slash-commands:
//!   /help         – show this list
//!   /status       – print the status panel
//!   /joints       – table of every joint
//!   /snapshot     – joint table as JSON
//!   /tick [n]     – run `n` idle ticks (default 1)
//!   /quit | /exit – stop every movement and exit
//!
//! Anything else (`update`, `clearLog`, an angle) is passed to the driver as
//! the host argument; the rig then ticks until it is idle.

use colored::Colorize;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use nacelle_hal::angle::{normalize_deg, rad_to_deg};
use nacelle_hal::sim::SimStator;
use nacelle_hal::stator::Stator;
use nacelle_runtime::NacelleDriver;
use nacelle_types::ActuatorRole;
use tracing::{error, warn};

use crate::config::RigConfig;

/// Entry point for the interactive REPL.
///
/// `shutdown` is polled each iteration and between ticks; when set the
/// driver is stopped and the REPL exits.
pub fn run(driver: &mut NacelleDriver<SimStator>, cfg: &RigConfig, shutdown: Arc<AtomicBool>) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        print!("{} ", "nacelle>".bold().cyan());
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: {}", "Read error".red(), e);
                break;
            }
        }

        let cmd = line.trim();
        if cmd.is_empty() {
            continue;
        }

        match cmd.split_once(' ').map_or((cmd, ""), |(head, rest)| (head, rest.trim())) {
            ("/help", _) => cmd_help(),
            ("/status", _) => println!("{}", driver.status_text()),
            ("/joints", _) => cmd_joints(driver),
            ("/snapshot", _) => cmd_snapshot(driver),
            ("/tick", n) => {
                let ticks = n.parse::<usize>().unwrap_or(1);
                run_ticks(driver, "", ticks, realtime(cfg), &shutdown);
            }
            ("/quit" | "/exit", _) => {
                println!("{}", "Goodbye.".green());
                shutdown.store(true, Ordering::SeqCst);
                break;
            }
            (other, _) if other.starts_with('/') => {
                println!(
                    "{} '{}'. Type {} for available commands.",
                    "Unknown command:".red(),
                    other.yellow(),
                    "/help".bold()
                );
            }
            _ => cmd_argument(driver, cfg, cmd, &shutdown),
        }
    }

    driver.shutdown();
}

// ─────────────────────────────────────────────────────────────────────────────
// Command handlers
// ─────────────────────────────────────────────────────────────────────────────

fn cmd_help() {
    println!();
    println!("{}", "Nacelle Commands".bold().underline());
    println!("  {}      – target an angle in degrees", "<angle>".bold().cyan());
    println!("  {}       – rediscover the rig",        "update".bold().cyan());
    println!("  {}     – clear the scrolling log",    "clearLog".bold().cyan());
    println!("  {}      – print the status panel",    "/status".bold().cyan());
    println!("  {}      – joint table",               "/joints".bold().cyan());
    println!("  {}    – joint table as JSON",         "/snapshot".bold().cyan());
    println!("  {}    – run idle ticks",              "/tick [n]".bold().cyan());
    println!("  {}  – stop and exit",                 "/quit  /exit".bold().cyan());
    println!();
}

/// Forward `argument` to the driver, then tick until the rig settles.
fn cmd_argument(
    driver: &mut NacelleDriver<SimStator>,
    cfg: &RigConfig,
    argument: &str,
    shutdown: &AtomicBool,
) {
    let settled = run_ticks(
        driver,
        argument,
        cfg.max_ticks_per_command,
        realtime(cfg),
        shutdown,
    );
    println!("{}", driver.status_text());
    if settled {
        println!("{}", "✓ Rig settled.".green());
    } else if !shutdown.load(Ordering::SeqCst) {
        warn!(
            max_ticks = cfg.max_ticks_per_command,
            "rig still moving after tick budget"
        );
        println!(
            "{} {} tick(s); use {} to continue.",
            "Rig still moving after".yellow(),
            cfg.max_ticks_per_command,
            "/tick".bold()
        );
    }
}

/// Run `argument` once, then up to `ticks - 1` idle ticks.
///
/// The simulation advances by `dt` between ticks and the loop sleeps for
/// `pause`.  Returns `true` once the scheduler is idle.
fn run_ticks(
    driver: &mut NacelleDriver<SimStator>,
    argument: &str,
    ticks: usize,
    (dt, pause): (Duration, Duration),
    shutdown: &AtomicBool,
) -> bool {
    let mut argument = argument;

    for _ in 0..ticks.max(1) {
        if shutdown.load(Ordering::SeqCst) {
            return false;
        }
        if let Err(e) = driver.run(argument, dt) {
            error!(error = %e, "tick failed");
            println!("{}: {}", "Error".red(), e);
            return false;
        }
        argument = "";
        if driver.is_idle() {
            return true;
        }

        for stator in driver.stators_mut() {
            stator.advance(dt);
        }
        if !pause.is_zero() {
            thread::sleep(pause);
        }
    }
    driver.is_idle()
}

fn realtime(cfg: &RigConfig) -> (Duration, Duration) {
    let dt = Duration::from_millis(cfg.tick_interval_ms);
    (dt, dt)
}

/// One row of `/joints` and `/snapshot`.
#[derive(Debug, Serialize)]
struct JointRow {
    name: String,
    role: Option<ActuatorRole>,
    angle_deg: f32,
    target_deg: Option<f32>,
    lower_limit_deg: f32,
    upper_limit_deg: f32,
    locked: bool,
    enabled: bool,
}

fn joint_rows(driver: &NacelleDriver<SimStator>) -> Vec<JointRow> {
    let row = |stator: &SimStator, role, target_deg| JointRow {
        name: stator.name().to_string(),
        role,
        angle_deg: normalize_deg(rad_to_deg(stator.angle())),
        target_deg,
        lower_limit_deg: stator.lower_limit_deg(),
        upper_limit_deg: stator.upper_limit_deg(),
        locked: stator.safety_lock(),
        enabled: stator.is_enabled(),
    };

    let set = driver.controllers();
    let managed = set.ids().filter_map(|id| set.get(id)).map(|c| {
        row(
            c.stator(),
            Some(c.role()),
            c.properties().target_angle_deg(),
        )
    });
    let unmanaged = set.unmanaged().iter().map(|s| row(s, None, None));
    managed.chain(unmanaged).collect()
}

fn cmd_joints(driver: &NacelleDriver<SimStator>) {
    println!("{}", "Joints".bold().underline());
    for row in joint_rows(driver) {
        let role = match row.role {
            Some(ActuatorRole::Reference) => "reference".cyan(),
            Some(ActuatorRole::MirroredSlave) => "mirrored".normal(),
            Some(ActuatorRole::CopiedSlave) => "copied".normal(),
            None => "unmanaged".dimmed(),
        };
        let target = row
            .target_deg
            .map_or_else(|| "-".to_string(), |t| format!("{t:.2}°"));
        let lock = if row.locked { "locked".green() } else { "released".yellow() };
        println!(
            "  {:<16} {:<10} {:>8.2}° → {:>8}  [{:.1}°, {:.1}°]  {}",
            row.name.bold(),
            role,
            row.angle_deg,
            target,
            row.lower_limit_deg,
            row.upper_limit_deg,
            lock
        );
    }
}

fn cmd_snapshot(driver: &NacelleDriver<SimStator>) {
    match serde_json::to_string_pretty(&joint_rows(driver)) {
        Ok(json) => println!("{json}"),
        Err(e) => println!("{}: {}", "Snapshot error".red(), e),
    }
}
