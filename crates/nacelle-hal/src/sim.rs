//! In-process simulated stator for tests and the interactive CLI.
//!
//! [`SimStator`] records every setpoint it receives and integrates its
//! velocity when [`SimStator::advance`] is called, so the full controller
//! stack can run headless without a host environment.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use nacelle_hal::sim::SimStator;
//! use nacelle_hal::stator::Stator;
//!
//! let mut rotor = SimStator::new("Rotor Left").with_angle_deg(10.0);
//! rotor.set_target_velocity(1.0);
//! rotor.set_safety_lock(false);
//! rotor.set_enabled(true);
//! rotor.advance(Duration::from_millis(100));
//!
//! assert!(rotor.angle_deg() > 10.0);
//! ```

use std::time::Duration;

use tracing::trace;

use crate::angle::{INFINITE_ANGLE_DEG, rpm_to_rads};
use crate::stator::Stator;

/// One limit setpoint write, in the order it reached the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimitWrite {
    Upper(f32),
    Lower(f32),
}

/// A simulated rotor/stator joint.
///
/// # Device behaviour
///
/// | Aspect | Behaviour |
/// |---|---|
/// | Limits | Clamped to ±361°.  A written bound is clamped against the opposite bound, so upper never drops below lower. |
/// | Motion | Only while enabled with the safety lock released.  Stops exactly on a limit it reaches in its direction of travel. |
/// | Angle | Kept in `[0°, 360°)`. |
#[derive(Debug, Clone)]
pub struct SimStator {
    name: String,
    custom_data: String,
    // Degrees in f64 so that stopping on a limit is exact.
    angle_deg: f64,
    target_velocity: f32,
    enabled: bool,
    safety_lock: bool,
    upper_limit_deg: f32,
    lower_limit_deg: f32,
    limit_writes: Vec<LimitWrite>,
}

impl SimStator {
    /// Create a locked, disabled, unlimited joint at 0° with zero velocity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            custom_data: String::new(),
            angle_deg: 0.0,
            target_velocity: 0.0,
            enabled: false,
            safety_lock: true,
            upper_limit_deg: INFINITE_ANGLE_DEG,
            lower_limit_deg: -INFINITE_ANGLE_DEG,
            limit_writes: Vec::new(),
        }
    }

    /// Attach directive text.
    pub fn with_custom_data(mut self, custom_data: impl Into<String>) -> Self {
        self.custom_data = custom_data.into();
        self
    }

    /// Start at `degrees`, wrapped into `[0°, 360°)`.
    pub fn with_angle_deg(mut self, degrees: f32) -> Self {
        self.set_angle_deg(degrees);
        self
    }

    /// Start with a target velocity magnitude of `rpm`.
    pub fn with_velocity_rpm(mut self, rpm: f32) -> Self {
        self.target_velocity = rpm_to_rads(rpm);
        self
    }

    /// Replace the directive text, e.g. before an `update`.
    pub fn set_custom_data(&mut self, custom_data: impl Into<String>) {
        self.custom_data = custom_data.into();
    }

    /// Teleport the joint, e.g. to model external feedback in a test.
    pub fn set_angle_deg(&mut self, degrees: f32) {
        self.angle_deg = f64::from(degrees).rem_euclid(360.0);
    }

    /// Current angle in degrees, `[0°, 360°)`.
    pub fn angle_deg(&self) -> f32 {
        self.angle_deg as f32
    }

    /// Every limit write received so far, oldest first.
    pub fn limit_writes(&self) -> &[LimitWrite] {
        &self.limit_writes
    }

    /// Forget the recorded limit writes.
    pub fn clear_limit_writes(&mut self) {
        self.limit_writes.clear();
    }

    /// `true` when the joint would move on the next [`advance`][Self::advance].
    pub fn is_moving(&self) -> bool {
        self.enabled && !self.safety_lock && self.target_velocity != 0.0
    }

    /// Integrate the target velocity over `dt`.
    pub fn advance(&mut self, dt: Duration) {
        if !self.is_moving() {
            return;
        }

        let step = f64::from(self.target_velocity).to_degrees() * dt.as_secs_f64();
        let mut next = self.angle_deg + step;

        if step > 0.0 && self.upper_limit_deg < INFINITE_ANGLE_DEG {
            let ahead = (f64::from(self.upper_limit_deg) - self.angle_deg).rem_euclid(360.0);
            if ahead <= step {
                next = f64::from(self.upper_limit_deg);
            }
        } else if step < 0.0 && self.lower_limit_deg > -INFINITE_ANGLE_DEG {
            let behind = (self.angle_deg - f64::from(self.lower_limit_deg)).rem_euclid(360.0);
            if behind <= -step {
                next = f64::from(self.lower_limit_deg);
            }
        }

        self.angle_deg = next.rem_euclid(360.0);
        trace!(stator = %self.name, angle_deg = self.angle_deg, "sim stator advanced");
    }
}

impl Stator for SimStator {
    fn name(&self) -> &str {
        &self.name
    }

    fn custom_data(&self) -> &str {
        &self.custom_data
    }

    fn angle(&self) -> f32 {
        self.angle_deg.to_radians() as f32
    }

    fn target_velocity(&self) -> f32 {
        self.target_velocity
    }

    fn set_target_velocity(&mut self, radians_per_second: f32) {
        self.target_velocity = radians_per_second;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn safety_lock(&self) -> bool {
        self.safety_lock
    }

    fn set_safety_lock(&mut self, locked: bool) {
        self.safety_lock = locked;
    }

    fn upper_limit_deg(&self) -> f32 {
        self.upper_limit_deg
    }

    fn set_upper_limit_deg(&mut self, degrees: f32) {
        self.limit_writes.push(LimitWrite::Upper(degrees));
        self.upper_limit_deg = degrees
            .clamp(-INFINITE_ANGLE_DEG, INFINITE_ANGLE_DEG)
            .max(self.lower_limit_deg);
    }

    fn lower_limit_deg(&self) -> f32 {
        self.lower_limit_deg
    }

    fn set_lower_limit_deg(&mut self, degrees: f32) {
        self.limit_writes.push(LimitWrite::Lower(degrees));
        self.lower_limit_deg = degrees
            .clamp(-INFINITE_ANGLE_DEG, INFINITE_ANGLE_DEG)
            .min(self.upper_limit_deg);
    }
}
