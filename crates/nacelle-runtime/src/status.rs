//! Status panel text.
//!
//! ```text
//! VTOL Nacelle Controller
//! Running: --
//!
//! Reference Rotor: Nacelle Hinge
//! Mirrored Rotors: 1
//! Copied Rotors:   1
//!
//! <scrolling log lines>
//!
//! <persistent log lines>
//! ```
//!
//! The rig block is only shown while a reference joint is managed.

use std::fmt::Write as _;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const TITLE: &str = "VTOL Nacelle Controller";

/// Spinner frames, advanced once per [`SPINNER_PERIOD`] of elapsed host time.
pub const SPINNER_FRAMES: [&str; 4] = ["--", "\\", "|", "/"];
pub const SPINNER_PERIOD: Duration = Duration::from_millis(50);

/// What the panel shows about the managed rig.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RigSummary {
    pub reference: String,
    pub mirrored: usize,
    pub copied: usize,
}

#[derive(Debug, Clone, Default)]
pub struct StatusPanel {
    frame: usize,
    accumulated: Duration,
}

impl StatusPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }

    /// Accumulate host-reported elapsed time; one frame per full period.
    pub fn advance(&mut self, elapsed: Duration) {
        self.accumulated += elapsed;
        if self.accumulated >= SPINNER_PERIOD {
            self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
            self.accumulated = Duration::ZERO;
        }
    }

    pub fn render(&self, rig: Option<&RigSummary>, log_lines: &[String]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{TITLE}");
        let _ = writeln!(out, "Running: {}", self.spinner());
        out.push('\n');

        if let Some(rig) = rig {
            let _ = writeln!(out, "Reference Rotor: {}", rig.reference);
            let _ = writeln!(out, "Mirrored Rotors: {}", rig.mirrored);
            let _ = writeln!(out, "Copied Rotors:   {}", rig.copied);
            out.push('\n');
        }

        for line in log_lines {
            let _ = writeln!(out, "{line}");
        }
        out
    }
}
