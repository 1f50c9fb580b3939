//! [`ActuatorController`] – one stator plus its [`PropertyTransaction`].
//!
//! The controller is the only code that writes to its stator.  It turns the
//! committed [`PropertySet`] into device setpoints and decides how a managed
//! movement is started: which way to turn, and which temporary limits keep
//! the joint from coasting past its target.

use nacelle_hal::angle::{INFINITE_ANGLE_DEG, intersects, normalize_deg, normalize_rad, rad_to_deg};
use nacelle_hal::stator::Stator;
use nacelle_types::{
    ActuatorRole, AngleUnit, JointSettings, TransactionStateError, VelocityUnit,
};
use tracing::{debug, instrument};

use crate::transaction::{PropertySet, PropertyTransaction};

/// A movement is complete when the angle is within this many degrees of the
/// target.
pub const COMPLETION_TOLERANCE_DEG: f32 = 0.0035;

/// Radian counterpart of [`COMPLETION_TOLERANCE_DEG`].  Either test passing is
/// sufficient.
pub const COMPLETION_TOLERANCE_RAD: f32 = 0.00008;

/// Distance past which the starting angle is forced back into a tighter
/// window before the overshoot guard applies.
const RENORMALIZE_DISTANCE_DEG: f32 = 360.0;
const RENORMALIZE_MARGIN_DEG: f32 = 181.0;

// ────────────────────────────────────────────────────────────────────────────
// Direction planning
// ────────────────────────────────────────────────────────────────────────────

/// Sense of rotation for a managed movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// `1.0` or `-1.0`, applied to the velocity magnitude.
    pub fn sign(self) -> f32 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }

    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }
}

/// Pick the travel direction from `current_deg` to `target_deg`.
///
/// The short way around the circle is preferred.  When `limits`
/// (`(upper_deg, lower_deg)`, unset sides as ±361°) is given, the excluded
/// arc runs positive from the upper limit to the lower limit.  The direction
/// is flipped when the current angle or the target lies on that arc, or when
/// either limit lies on the path the short way would travel.
pub fn choose_direction(current_deg: f32, target_deg: f32, limits: Option<(f32, f32)>) -> Direction {
    let mut direction = if (target_deg - current_deg + 360.0).rem_euclid(360.0) > 180.0 {
        Direction::Negative
    } else {
        Direction::Positive
    };

    if let Some((upper, lower)) = limits {
        let on_path = |point: f32| match direction {
            Direction::Positive => intersects(point, current_deg, target_deg),
            Direction::Negative => intersects(point, target_deg, current_deg),
        };
        if intersects(current_deg, upper, lower)
            || intersects(target_deg, upper, lower)
            || on_path(upper)
            || on_path(lower)
        {
            direction = direction.reversed();
        }
    }

    direction
}

/// What [`ActuatorController::begin_managed_movement`] wrote to the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementPlan {
    pub direction: Direction,
    /// Signed velocity written to the device, rad/s.
    pub velocity: f32,
    /// Temporary limit placed exactly on the target, degrees.
    pub guard_limit_deg: f32,
    /// Opposite limit pushed to `current ± 181°` when the distance to travel
    /// exceeds a full turn.
    pub renormalize_limit_deg: Option<f32>,
}

// ────────────────────────────────────────────────────────────────────────────
// ActuatorController
// ────────────────────────────────────────────────────────────────────────────

/// Owns one stator and the transaction guarding its commanded properties.
#[derive(Debug)]
pub struct ActuatorController<S: Stator> {
    stator: S,
    transaction: PropertyTransaction,
    reference: Option<String>,
}

impl<S: Stator> ActuatorController<S> {
    /// Wrap `stator` with a closed transaction and unset properties.
    pub fn new(stator: S, role: ActuatorRole) -> Self {
        let transaction = PropertyTransaction::new(stator.name(), role);
        Self {
            stator,
            transaction,
            reference: None,
        }
    }

    /// Name of the wrapped stator.
    pub fn name(&self) -> &str {
        self.stator.name()
    }

    pub fn role(&self) -> ActuatorRole {
        self.transaction.role()
    }

    /// Read-only view of the device.
    pub fn stator(&self) -> &S {
        &self.stator
    }

    /// Direct device access, bypassing the transaction.
    pub fn stator_mut(&mut self) -> &mut S {
        &mut self.stator
    }

    /// Release the device, e.g. for re-discovery.
    pub fn into_stator(self) -> S {
        self.stator
    }

    /// Committed properties.
    pub fn properties(&self) -> &PropertySet {
        self.transaction.committed()
    }

    pub fn transaction(&self) -> &PropertyTransaction {
        &self.transaction
    }

    /// Name of the reference joint this slave follows.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn set_reference(&mut self, reference: impl Into<String>) {
        self.reference = Some(reference.into());
    }

    /// Begin updating the properties.
    ///
    /// # Errors
    ///
    /// [`TransactionStateError::AlreadyOpen`] when a transaction is pending.
    pub fn update(&mut self) -> Result<StagedProperties<'_, S>, TransactionStateError> {
        self.transaction.open()?;
        Ok(StagedProperties { controller: self })
    }

    /// Commit the pending transaction and write the result to the device.
    pub fn commit(&mut self) -> Result<(), TransactionStateError> {
        self.transaction.commit()?;
        self.apply_committed_properties();
        Ok(())
    }

    /// Drop the pending transaction's edits.
    pub fn cancel(&mut self) -> Result<(), TransactionStateError> {
        self.transaction.cancel()
    }

    /// Stage and commit every value present in `settings`.
    ///
    /// Absent values keep their defaults.
    pub fn configure(&mut self, settings: &JointSettings) -> Result<(), TransactionStateError> {
        let mut staged = self.update()?;
        if let Some(offset) = settings.offset_deg {
            staged = staged.offset(offset, AngleUnit::Degrees)?;
        }
        if let Some(lower) = settings.lower_limit_deg {
            staged = staged.lower_limit(lower, AngleUnit::Degrees)?;
        }
        if let Some(upper) = settings.upper_limit_deg {
            staged = staged.upper_limit(upper, AngleUnit::Degrees)?;
        }
        if let Some(velocity) = settings.velocity_rpm {
            staged = staged.velocity(velocity, VelocityUnit::Rpm)?;
        }
        staged.commit()
    }

    /// Write the committed band and velocity to the device.
    ///
    /// Limits go out upper → lower → upper: the device clamps a written bound
    /// against the opposite one, so the final write is what guarantees the
    /// intended upper bound.
    pub fn apply_committed_properties(&mut self) {
        let props = *self.transaction.committed();
        let offset = props.offset_deg();
        let (lower, upper) = props.band_rad();
        let upper = upper.map_or(INFINITE_ANGLE_DEG, |u| rad_to_deg(u) + offset);
        let lower = lower.map_or(-INFINITE_ANGLE_DEG, |l| rad_to_deg(l) + offset);

        self.stator.set_upper_limit_deg(upper);
        self.stator.set_lower_limit_deg(lower);
        self.stator.set_upper_limit_deg(upper);

        if props.velocity_rads() != 0.0 {
            self.stator.set_target_velocity(props.velocity_rads());
        }
    }

    /// Point the stator at its committed target and release it.
    ///
    /// Returns `None` without touching the device when no target is set.
    #[instrument(skip(self), fields(stator = %self.stator.name()))]
    pub fn begin_managed_movement(&mut self) -> Option<MovementPlan> {
        let props = *self.transaction.committed();
        let target_deg = props.target_angle_deg()?;
        let raw_current_deg = rad_to_deg(self.stator.angle());
        let current_deg = normalize_deg(raw_current_deg);

        let limits = props
            .has_limits()
            .then(|| (props.upper_bound_deg(), props.lower_bound_deg()));
        let direction = choose_direction(current_deg, target_deg, limits);

        let velocity = self.stator.target_velocity().abs() * direction.sign();
        self.stator.set_target_velocity(velocity);

        let distance = (raw_current_deg - target_deg).abs();
        let renormalize_limit_deg = match direction {
            Direction::Positive => {
                self.stator.set_upper_limit_deg(target_deg);
                (distance > RENORMALIZE_DISTANCE_DEG).then(|| {
                    let limit = raw_current_deg + RENORMALIZE_MARGIN_DEG;
                    self.stator.set_lower_limit_deg(limit);
                    limit
                })
            }
            Direction::Negative => {
                self.stator.set_lower_limit_deg(target_deg);
                (distance > RENORMALIZE_DISTANCE_DEG).then(|| {
                    let limit = raw_current_deg - RENORMALIZE_MARGIN_DEG;
                    self.stator.set_upper_limit_deg(limit);
                    limit
                })
            }
        };

        self.stator.set_safety_lock(false);
        self.stator.set_enabled(true);

        debug!(
            current_deg,
            target_deg,
            ?direction,
            velocity,
            reference = self.reference.as_deref(),
            "managed movement started"
        );

        Some(MovementPlan {
            direction,
            velocity,
            guard_limit_deg: target_deg,
            renormalize_limit_deg,
        })
    }

    /// `true` when no target is set, or the current angle matches the target
    /// within tolerance in either degrees or radians.
    pub fn compare_target_angle(&self) -> bool {
        let Some(target_rad) = self.transaction.committed().target_angle_rad() else {
            return true;
        };
        let current_rad = self.stator.angle();

        let diff_deg = normalize_deg(rad_to_deg(current_rad) - rad_to_deg(target_rad)).abs();
        let diff_rad = normalize_rad(current_rad - target_rad).abs();

        diff_rad < COMPLETION_TOLERANCE_RAD || diff_deg < COMPLETION_TOLERANCE_DEG
    }

    /// Stop the stator, re-engage the safety lock and restore the committed
    /// limits over any temporary guard.
    pub fn finish_movement(&mut self) {
        self.stator.set_enabled(false);
        self.stator.set_safety_lock(true);
        self.apply_committed_properties();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// StagedProperties
// ────────────────────────────────────────────────────────────────────────────

/// Mutable view onto a controller's open transaction.
///
/// Obtained from [`ActuatorController::update`]; consumed by
/// [`commit`][Self::commit] or [`cancel`][Self::cancel].  Dropping it leaves
/// the transaction open.
pub struct StagedProperties<'a, S: Stator> {
    controller: &'a mut ActuatorController<S>,
}

impl<S: Stator> StagedProperties<'_, S> {
    pub fn upper_limit(self, value: f32, unit: AngleUnit) -> Result<Self, TransactionStateError> {
        self.controller.transaction.set_upper_limit(value, unit)?;
        Ok(self)
    }

    pub fn lower_limit(self, value: f32, unit: AngleUnit) -> Result<Self, TransactionStateError> {
        self.controller.transaction.set_lower_limit(value, unit)?;
        Ok(self)
    }

    pub fn target_angle(self, value: f32, unit: AngleUnit) -> Result<Self, TransactionStateError> {
        self.controller.transaction.set_target_angle(value, unit)?;
        Ok(self)
    }

    pub fn offset(self, value: f32, unit: AngleUnit) -> Result<Self, TransactionStateError> {
        self.controller.transaction.set_offset(value, unit)?;
        Ok(self)
    }

    pub fn velocity(self, value: f32, unit: VelocityUnit) -> Result<Self, TransactionStateError> {
        self.controller.transaction.set_velocity(value, unit)?;
        Ok(self)
    }

    pub fn reset_target_angle(self) -> Result<Self, TransactionStateError> {
        self.controller.transaction.reset_target_angle()?;
        Ok(self)
    }

    pub fn commit(self) -> Result<(), TransactionStateError> {
        self.controller.commit()
    }

    pub fn cancel(self) -> Result<(), TransactionStateError> {
        self.controller.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nacelle_hal::sim::{LimitWrite, SimStator};

    fn controller(stator: SimStator, role: ActuatorRole) -> ActuatorController<SimStator> {
        ActuatorController::new(stator, role)
    }

    #[test]
    fn shortest_direction_without_limits() {
        assert_eq!(choose_direction(0.0, 90.0, None), Direction::Positive);
        assert_eq!(choose_direction(0.0, -90.0, None), Direction::Negative);
        assert_eq!(choose_direction(170.0, -170.0, None), Direction::Positive);
        assert_eq!(choose_direction(-170.0, 170.0, None), Direction::Negative);
    }

    #[test]
    fn excluded_arc_flips_shortest_direction() {
        // Limits (-30°, 30°); 170° lies on the arc from 30° round to -30°.
        assert_eq!(choose_direction(20.0, 170.0, None), Direction::Positive);
        assert_eq!(
            choose_direction(20.0, 170.0, Some((30.0, -30.0))),
            Direction::Negative
        );
    }

    #[test]
    fn move_inside_band_keeps_shortest_direction() {
        assert_eq!(
            choose_direction(20.0, 30.0, Some((30.0, -30.0))),
            Direction::Positive
        );
        assert_eq!(
            choose_direction(10.0, -20.0, Some((30.0, -30.0))),
            Direction::Negative
        );
    }

    #[test]
    fn band_straddling_boundary_routes_the_long_way() {
        // Permitted band is -170°..170° through 0°; the short way from 160°
        // to -160° would cross 170°.
        assert_eq!(choose_direction(160.0, -160.0, None), Direction::Positive);
        assert_eq!(
            choose_direction(160.0, -160.0, Some((170.0, -170.0))),
            Direction::Negative
        );
    }

    #[test]
    fn commit_writes_limits_upper_lower_upper() {
        let mut c = controller(SimStator::new("rotor"), ActuatorRole::Reference);
        c.update()
            .unwrap()
            .lower_limit(-30.0, AngleUnit::Degrees)
            .unwrap()
            .upper_limit(30.0, AngleUnit::Degrees)
            .unwrap()
            .commit()
            .unwrap();

        let writes = c.stator().limit_writes();
        assert_eq!(writes.len(), 3);
        assert!(matches!(writes[0], LimitWrite::Upper(u) if (u - 30.0).abs() < 1e-3));
        assert!(matches!(writes[1], LimitWrite::Lower(l) if (l + 30.0).abs() < 1e-3));
        assert!(matches!(writes[2], LimitWrite::Upper(u) if (u - 30.0).abs() < 1e-3));
    }

    #[test]
    fn third_limit_write_restores_upper_bound_below_old_band() {
        let mut c = controller(SimStator::new("rotor"), ActuatorRole::Reference);
        c.update()
            .unwrap()
            .lower_limit(40.0, AngleUnit::Degrees)
            .unwrap()
            .upper_limit(50.0, AngleUnit::Degrees)
            .unwrap()
            .commit()
            .unwrap();
        c.update()
            .unwrap()
            .lower_limit(-30.0, AngleUnit::Degrees)
            .unwrap()
            .upper_limit(-20.0, AngleUnit::Degrees)
            .unwrap()
            .commit()
            .unwrap();

        assert!((c.stator().upper_limit_deg() + 20.0).abs() < 1e-3);
        assert!((c.stator().lower_limit_deg() + 30.0).abs() < 1e-3);
    }

    #[test]
    fn offset_is_added_to_set_limits_only() {
        let mut c = controller(SimStator::new("rotor"), ActuatorRole::Reference);
        c.update()
            .unwrap()
            .offset(10.0, AngleUnit::Degrees)
            .unwrap()
            .upper_limit(30.0, AngleUnit::Degrees)
            .unwrap()
            .commit()
            .unwrap();

        assert!((c.stator().upper_limit_deg() - 40.0).abs() < 1e-3);
        assert_eq!(c.stator().lower_limit_deg(), -INFINITE_ANGLE_DEG);
    }

    #[test]
    fn mirrored_limits_are_written_as_an_ordered_band() {
        let mut c = controller(SimStator::new("rotor"), ActuatorRole::MirroredSlave);
        c.update()
            .unwrap()
            .offset(5.0, AngleUnit::Degrees)
            .unwrap()
            .lower_limit(-30.0, AngleUnit::Degrees)
            .unwrap()
            .upper_limit(10.0, AngleUnit::Degrees)
            .unwrap()
            .commit()
            .unwrap();

        // A reference with these settings is written [-25°, 15°].
        assert!((c.stator().lower_limit_deg() + 15.0).abs() < 1e-3);
        assert!((c.stator().upper_limit_deg() - 25.0).abs() < 1e-3);
    }

    #[test]
    fn mirrored_band_keeps_shortest_direction() {
        let mut c = controller(
            SimStator::new("rotor").with_velocity_rpm(6.0),
            ActuatorRole::MirroredSlave,
        );
        c.update()
            .unwrap()
            .lower_limit(-30.0, AngleUnit::Degrees)
            .unwrap()
            .upper_limit(30.0, AngleUnit::Degrees)
            .unwrap()
            .target_angle(10.0, AngleUnit::Degrees)
            .unwrap()
            .commit()
            .unwrap();

        let plan = c.begin_managed_movement().unwrap();
        assert_eq!(plan.direction, Direction::Negative);
        assert!((plan.guard_limit_deg + 10.0).abs() < 1e-3);
    }

    #[test]
    fn zero_velocity_leaves_device_velocity_alone() {
        let mut c = controller(
            SimStator::new("rotor").with_velocity_rpm(6.0),
            ActuatorRole::Reference,
        );
        c.apply_committed_properties();
        assert!((c.stator().target_velocity() - 0.6283185).abs() < 1e-5);
    }

    #[test]
    fn update_on_pending_transaction_fails() {
        let mut c = controller(SimStator::new("rotor"), ActuatorRole::Reference);
        let staged = c.update().unwrap();
        drop(staged);
        assert!(matches!(
            c.update(),
            Err(TransactionStateError::AlreadyOpen { .. })
        ));
        c.cancel().unwrap();
        assert!(c.update().is_ok());
    }

    #[test]
    fn commit_without_transaction_fails() {
        let mut c = controller(SimStator::new("rotor"), ActuatorRole::Reference);
        assert!(matches!(c.commit(), Err(TransactionStateError::NotOpen { .. })));
        assert!(c.stator().limit_writes().is_empty());
    }

    #[test]
    fn configure_stages_only_present_values() {
        let mut c = controller(SimStator::new("rotor"), ActuatorRole::MirroredSlave);
        let settings = JointSettings {
            upper_limit_deg: Some(45.0),
            velocity_rpm: Some(3.0),
            ..JointSettings::new(ActuatorRole::MirroredSlave)
        };
        c.configure(&settings).unwrap();

        let props = c.properties();
        assert!((props.upper_limit_deg().unwrap() + 45.0).abs() < 1e-3);
        assert!(props.lower_limit_deg().is_none());
        assert!((props.velocity_rpm() - 3.0).abs() < 1e-4);
        assert!(!c.transaction().is_open());
    }

    #[test]
    fn begin_without_target_touches_nothing() {
        let mut c = controller(SimStator::new("rotor"), ActuatorRole::Reference);
        assert!(c.begin_managed_movement().is_none());
        assert!(c.stator().safety_lock());
        assert!(!c.stator().is_enabled());
        assert!(c.compare_target_angle());
    }

    #[test]
    fn begin_sets_direction_guard_and_releases_lock() {
        let mut c = controller(
            SimStator::new("rotor").with_velocity_rpm(6.0),
            ActuatorRole::Reference,
        );
        c.update()
            .unwrap()
            .target_angle(90.0, AngleUnit::Degrees)
            .unwrap()
            .commit()
            .unwrap();

        let plan = c.begin_managed_movement().unwrap();
        assert_eq!(plan.direction, Direction::Positive);
        assert!(plan.velocity > 0.0);
        assert!(plan.renormalize_limit_deg.is_none());
        assert!((c.stator().upper_limit_deg() - 90.0).abs() < 1e-3);
        assert!(!c.stator().safety_lock());
        assert!(c.stator().is_enabled());
    }

    #[test]
    fn negative_move_guards_lower_limit() {
        let mut c = controller(
            SimStator::new("rotor").with_velocity_rpm(6.0),
            ActuatorRole::MirroredSlave,
        );
        c.update()
            .unwrap()
            .target_angle(90.0, AngleUnit::Degrees)
            .unwrap()
            .commit()
            .unwrap();

        let plan = c.begin_managed_movement().unwrap();
        assert_eq!(plan.direction, Direction::Negative);
        assert!(c.stator().target_velocity() < 0.0);
        assert!((c.stator().lower_limit_deg() + 90.0).abs() < 1e-3);
    }

    #[test]
    fn compare_target_angle_uses_tolerance() {
        let mut c = controller(SimStator::new("rotor"), ActuatorRole::Reference);
        c.update()
            .unwrap()
            .target_angle(90.0, AngleUnit::Degrees)
            .unwrap()
            .commit()
            .unwrap();

        c.stator_mut().set_angle_deg(89.99);
        assert!(!c.compare_target_angle());
        c.stator_mut().set_angle_deg(90.001);
        assert!(c.compare_target_angle());
    }

    #[test]
    fn compare_target_angle_accepts_radian_tolerance_alone() {
        let mut c = controller(SimStator::new("rotor"), ActuatorRole::Reference);
        c.update()
            .unwrap()
            .target_angle(90.0, AngleUnit::Degrees)
            .unwrap()
            .commit()
            .unwrap();

        // 0.004° is outside the degree tolerance but ~7.0e-5 rad is inside
        // the radian one.
        c.stator_mut().set_angle_deg(90.004);
        assert!(c.compare_target_angle());
        // 0.006° (~1.05e-4 rad) fails both.
        c.stator_mut().set_angle_deg(90.006);
        assert!(!c.compare_target_angle());
    }

    #[test]
    fn compare_target_angle_handles_wrapped_feedback() {
        let mut c = controller(SimStator::new("rotor"), ActuatorRole::Reference);
        c.update()
            .unwrap()
            .target_angle(-90.0, AngleUnit::Degrees)
            .unwrap()
            .commit()
            .unwrap();

        // Device reports [0°, 360°); 270° is -90°.
        c.stator_mut().set_angle_deg(270.0);
        assert!(c.compare_target_angle());
    }

    #[test]
    fn finish_movement_relocks_and_restores_limits() {
        let mut c = controller(
            SimStator::new("rotor").with_velocity_rpm(6.0),
            ActuatorRole::Reference,
        );
        c.update()
            .unwrap()
            .target_angle(90.0, AngleUnit::Degrees)
            .unwrap()
            .commit()
            .unwrap();
        c.begin_managed_movement().unwrap();

        c.finish_movement();
        assert!(!c.stator().is_enabled());
        assert!(c.stator().safety_lock());
        assert_eq!(c.stator().upper_limit_deg(), INFINITE_ANGLE_DEG);
        assert_eq!(c.stator().lower_limit_deg(), -INFINITE_ANGLE_DEG);
    }

    // Device whose native angle runs past a full turn.
    struct WoundStator {
        inner: SimStator,
        angle_rad: f32,
    }

    impl Stator for WoundStator {
        fn name(&self) -> &str {
            self.inner.name()
        }
        fn custom_data(&self) -> &str {
            self.inner.custom_data()
        }
        fn angle(&self) -> f32 {
            self.angle_rad
        }
        fn target_velocity(&self) -> f32 {
            self.inner.target_velocity()
        }
        fn set_target_velocity(&mut self, radians_per_second: f32) {
            self.inner.set_target_velocity(radians_per_second);
        }
        fn is_enabled(&self) -> bool {
            self.inner.is_enabled()
        }
        fn set_enabled(&mut self, enabled: bool) {
            self.inner.set_enabled(enabled);
        }
        fn safety_lock(&self) -> bool {
            self.inner.safety_lock()
        }
        fn set_safety_lock(&mut self, locked: bool) {
            self.inner.set_safety_lock(locked);
        }
        fn upper_limit_deg(&self) -> f32 {
            self.inner.upper_limit_deg()
        }
        fn set_upper_limit_deg(&mut self, degrees: f32) {
            self.inner.set_upper_limit_deg(degrees);
        }
        fn lower_limit_deg(&self) -> f32 {
            self.inner.lower_limit_deg()
        }
        fn set_lower_limit_deg(&mut self, degrees: f32) {
            self.inner.set_lower_limit_deg(degrees);
        }
    }

    #[test]
    fn distance_beyond_full_turn_pushes_opposite_limit() {
        // 400° native is 40° normalized; -90° is reached the negative way.
        let stator = WoundStator {
            inner: SimStator::new("rotor").with_velocity_rpm(6.0),
            angle_rad: 400.0f32.to_radians(),
        };
        let mut c = ActuatorController::new(stator, ActuatorRole::Reference);
        c.update()
            .unwrap()
            .target_angle(-90.0, AngleUnit::Degrees)
            .unwrap()
            .commit()
            .unwrap();

        let plan = c.begin_managed_movement().unwrap();
        assert_eq!(plan.direction, Direction::Negative);
        let limit = plan.renormalize_limit_deg.unwrap();
        assert!((limit - (400.0 - 181.0)).abs() < 1e-2);
        assert!(matches!(
            c.stator().inner.limit_writes().last(),
            Some(LimitWrite::Upper(u)) if (u - limit).abs() < 1e-3
        ));
    }
}
