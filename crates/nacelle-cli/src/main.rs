//! `nacelle-cli` – interactive host for a simulated nacelle rig
//!
//! This binary stands in for the vehicle's programmable block.  It:
//!
//! 1. Loads the rig from `~/.nacelle/rig.toml` (or the path given as the first
//!    argument); on first run the built-in demo rig is written there.
//! 2. Initialises tracing (`RUST_LOG`, `NACELLE_LOG_FORMAT`, optional OTLP).
//! 3. Discovers the rig and drops the user into an **interactive REPL** that
//!    forwards host arguments (`update`, `clearLog`, angles) to the driver.
//! 4. Intercepts **Ctrl-C** to stop every movement and re-lock the joints.

mod config;
mod repl;

use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

use nacelle_runtime::{LogFormat, NacelleDriver, init_tracing};

fn main() {
    let explicit = std::env::args().nth(1).map(PathBuf::from);
    let path = explicit.clone().unwrap_or_else(config::config_path);

    let loaded = config::load_from(&path);
    let format = match &loaded {
        Ok(Some(cfg)) => cfg.log_format,
        _ => LogFormat::default(),
    };

    // ── Structured logging ────────────────────────────────────────────────
    // The REPL's user-facing output still uses println! for UX consistency.
    let _guard = init_tracing("nacelle", format);

    print_banner();

    let cfg = match loaded {
        Ok(Some(cfg)) => {
            println!("  Rig loaded from {}", path.display().to_string().bold());
            cfg
        }
        Ok(None) if explicit.is_some() => {
            println!("{}: {} not found", "Rig error".red(), path.display());
            println!("  Using the demo rig.");
            demo_rig()
        }
        Ok(None) => {
            let cfg = demo_rig();
            match config::save_to(&cfg, &path) {
                Ok(()) => println!(
                    "  {} Demo rig written to {}",
                    "✓".green().bold(),
                    path.display().to_string().bold()
                ),
                Err(e) => println!("{}: {}", "Error saving rig".red(), e),
            }
            cfg
        }
        Err(e) => {
            println!("{}: {}", "Rig error".red(), e);
            println!("  Using the demo rig.");
            demo_rig()
        }
    };

    // ── Shared shutdown flag ──────────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    // ── Ctrl-C handler ────────────────────────────────────────────────────
    // The REPL checks the flag between ticks and stops the driver, which
    // disables and re-locks every joint.
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!(
            "{}",
            "⚠  Ctrl-C received – stopping every movement …".yellow().bold()
        );
        shutdown_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; safe stop on Ctrl-C will not be available");
    }

    // ── Discovery ─────────────────────────────────────────────────────────
    let mut driver = NacelleDriver::new(cfg.build_stators());
    println!();
    println!("{}", driver.status_text());
    println!(
        "  Type an angle to move the rig, or {} for a list of commands.\n",
        "/help".bold().cyan()
    );

    // ── Interactive REPL ──────────────────────────────────────────────────
    repl::run(&mut driver, &cfg, shutdown);

    println!("{}", "  ✓ Joints locked. Exiting.".green());
}

fn demo_rig() -> config::RigConfig {
    let mut cfg = config::RigConfig::default();
    config::apply_env_overrides(&mut cfg);
    cfg
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("  {} {}",
        "VTOL Nacelle Controller".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Simulated rig host");
    println!();
}
