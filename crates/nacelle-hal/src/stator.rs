//! Generic `Stator` trait for rotor/stator joints.
//!
//! The controller only ever talks to this trait, so a simulated joint and a
//! host-provided joint are interchangeable.  The device is opaque: it exposes
//! angle feedback plus velocity, enable, safety-lock and limit setpoints, and
//! nothing about its physics.

/// A rotational joint owned by the host environment.
///
/// Feedback is in radians (device-native range), velocity in radians per
/// second, limit setpoints in degrees.  A limit of ±361° means "unlimited".
pub trait Stator: Send {
    /// Display name of the joint, e.g. `"Nacelle Rotor Left"`.
    fn name(&self) -> &str;

    /// Free-form directive text attached to the joint by the operator.
    fn custom_data(&self) -> &str;

    /// Current angle in radians.
    fn angle(&self) -> f32;

    /// Signed target velocity in radians per second.
    fn target_velocity(&self) -> f32;

    /// Write the signed target velocity; the sign selects the direction.
    fn set_target_velocity(&mut self, radians_per_second: f32);

    /// `true` while the joint is powered.
    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// `true` while the joint is held in place.
    fn safety_lock(&self) -> bool;

    /// Engage (`true`) or release (`false`) the safety lock.  The lock must be
    /// released before the joint can move.
    fn set_safety_lock(&mut self, locked: bool);

    /// Upper limit setpoint in degrees.
    fn upper_limit_deg(&self) -> f32;

    /// Write the upper limit.
    ///
    /// Devices may clamp the written value against the current lower limit,
    /// which is why callers write `upper → lower → upper`.
    fn set_upper_limit_deg(&mut self, degrees: f32);

    /// Lower limit setpoint in degrees.
    fn lower_limit_deg(&self) -> f32;

    /// Write the lower limit.  See [`Stator::set_upper_limit_deg`].
    fn set_lower_limit_deg(&mut self, degrees: f32);
}
