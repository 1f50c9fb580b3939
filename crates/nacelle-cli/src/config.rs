//! Rig configuration – reads/writes `~/.nacelle/rig.toml`.
//!
//! ```toml
//! tick_interval_ms = 16
//! max_ticks_per_command = 20000
//! log_format = "compact"
//!
//! [[joint]]
//! name = "Nacelle Hinge"
//! custom_data = "~NC_Reference\n~NC_LowerLimit=-10\n~NC_UpperLimit=100"
//! angle_deg = 0.0
//! velocity_rpm = 6.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use nacelle_hal::sim::SimStator;
use nacelle_runtime::LogFormat;
use serde::{Deserialize, Serialize};

/// One simulated joint of the rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointConfig {
    pub name: String,

    /// Directive text, e.g. `~NC_Mirror`.
    #[serde(default)]
    pub custom_data: String,

    #[serde(default)]
    pub angle_deg: f32,

    #[serde(default = "default_velocity_rpm")]
    pub velocity_rpm: f32,
}

impl JointConfig {
    pub fn to_stator(&self) -> SimStator {
        SimStator::new(self.name.clone())
            .with_custom_data(self.custom_data.clone())
            .with_angle_deg(self.angle_deg)
            .with_velocity_rpm(self.velocity_rpm)
    }
}

/// Persisted rig description stored in `~/.nacelle/rig.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigConfig {
    /// Simulated time between ticks, and the real-time pause between them.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Upper bound on ticks run after one command before giving up.
    #[serde(default = "default_max_ticks")]
    pub max_ticks_per_command: usize,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default, rename = "joint")]
    pub joints: Vec<JointConfig>,
}

fn default_tick_interval_ms() -> u64 {
    16
}
fn default_max_ticks() -> usize {
    20_000
}
fn default_velocity_rpm() -> f32 {
    5.0
}

impl Default for RigConfig {
    /// Demo rig: one reference hinge with a mirrored and a copied nacelle.
    fn default() -> Self {
        let joint = |name: &str, custom_data: &str| JointConfig {
            name: name.to_string(),
            custom_data: custom_data.to_string(),
            angle_deg: 0.0,
            velocity_rpm: 6.0,
        };
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks_per_command: default_max_ticks(),
            log_format: LogFormat::default(),
            joints: vec![
                joint(
                    "Nacelle Hinge",
                    "~NC_Reference\n~NC_LowerLimit=-10\n~NC_UpperLimit=100",
                ),
                joint(
                    "Nacelle Left",
                    "~NC_Mirror\n~NC_LowerLimit=-10\n~NC_UpperLimit=100",
                ),
                joint(
                    "Nacelle Right",
                    "~NC_Copy\n~NC_Offset=2\n~NC_LowerLimit=-10\n~NC_UpperLimit=100",
                ),
            ],
        }
    }
}

impl RigConfig {
    pub fn build_stators(&self) -> Vec<SimStator> {
        self.joints.iter().map(JointConfig::to_stator).collect()
    }
}

/// Return the path to `~/.nacelle/rig.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".nacelle").join("rig.toml")
}

/// Load the rig from `path`.  Returns `None` if the file does not exist.
pub fn load_from(path: &Path) -> Result<Option<RigConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read rig at {}: {}", path.display(), e))?;
    let mut cfg: RigConfig =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse rig: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `NACELLE_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `NACELLE_TICK_MS` | `tick_interval_ms` |
/// | `NACELLE_MAX_TICKS` | `max_ticks_per_command` |
///
/// Values that do not parse are ignored.
pub fn apply_env_overrides(cfg: &mut RigConfig) {
    if let Ok(v) = std::env::var("NACELLE_TICK_MS")
        && let Ok(ms) = v.parse::<u64>()
    {
        cfg.tick_interval_ms = ms;
    }
    if let Ok(v) = std::env::var("NACELLE_MAX_TICKS")
        && let Ok(ticks) = v.parse::<usize>()
    {
        cfg.max_ticks_per_command = ticks;
    }
}

/// Save the rig to `path`, creating the parent directory if necessary.
pub fn save_to(cfg: &RigConfig, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create rig directory: {}", e))?;
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize rig: {}", e))?;
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write rig at {}: {}", path.display(), e))
}
