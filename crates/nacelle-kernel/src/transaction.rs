//! [`PropertyTransaction`] – single-writer staging buffer for one actuator.
//!
//! The committed [`PropertySet`] is what the device is driven from.  Edits go
//! to a staged copy and only become visible through [`PropertyTransaction::commit`].
//!
//! ```text
//!            open()
//!   Closed ─────────► Open ──┐ set_*()
//!     ▲                │ ◄───┘
//!     └── commit() ────┤
//!     └── cancel() ────┘
//! ```
//!
//! Every staged setter and both closing operations fail with
//! [`TransactionStateError::NotOpen`] while the transaction is closed, and
//! leave all values untouched.
//!
//! # Example
//!
//! ```
//! use nacelle_kernel::transaction::PropertyTransaction;
//! use nacelle_types::{ActuatorRole, AngleUnit};
//!
//! let mut tx = PropertyTransaction::new("Rotor Right", ActuatorRole::MirroredSlave);
//! tx.open()?.set_upper_limit(45.0, AngleUnit::Degrees)?;
//! let committed = tx.commit()?;
//!
//! assert!((committed.upper_limit_deg().unwrap() + 45.0).abs() < 1e-3);
//! # Ok::<(), nacelle_types::TransactionStateError>(())
//! ```

use nacelle_hal::angle::{
    INFINITE_ANGLE_DEG, deg_to_rad, normalize_rad, rad_to_deg, rads_to_rpm, rpm_to_rads,
};
use nacelle_types::{ActuatorRole, AngleUnit, TransactionStateError, VelocityUnit};

// ────────────────────────────────────────────────────────────────────────────
// PropertySet
// ────────────────────────────────────────────────────────────────────────────

/// Commanded state of one actuator.
///
/// Angles are stored in radians normalized to `[-π, π)`.  `None` marks an
/// unset limit or "no active target".
///
/// Each stored field follows the role's sign law on its own, so on a
/// mirrored joint the staged upper limit holds the *lower* edge of the
/// travel band.  [`band_rad`][Self::band_rad] and the `*_bound_deg` readers
/// give the band in device order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PropertySet {
    upper_limit: Option<f32>,
    lower_limit: Option<f32>,
    target_angle: Option<f32>,
    offset: f32,
    /// Radians per second; `0.0` means no velocity is commanded.
    velocity: f32,
    inverted: bool,
}

impl PropertySet {
    /// Staged upper limit in radians, sign law applied.
    pub fn upper_limit_rad(&self) -> Option<f32> {
        self.upper_limit
    }

    /// Staged upper limit in degrees, sign law applied.
    pub fn upper_limit_deg(&self) -> Option<f32> {
        self.upper_limit.map(rad_to_deg)
    }

    /// Staged lower limit in radians, sign law applied.
    pub fn lower_limit_rad(&self) -> Option<f32> {
        self.lower_limit
    }

    /// Staged lower limit in degrees, sign law applied.
    pub fn lower_limit_deg(&self) -> Option<f32> {
        self.lower_limit.map(rad_to_deg)
    }

    /// Active target in radians, `None` when no movement is commanded.
    pub fn target_angle_rad(&self) -> Option<f32> {
        self.target_angle
    }

    /// Active target in degrees.
    pub fn target_angle_deg(&self) -> Option<f32> {
        self.target_angle.map(rad_to_deg)
    }

    /// Limit bias in radians.
    pub fn offset_rad(&self) -> f32 {
        self.offset
    }

    /// Limit bias in degrees.
    pub fn offset_deg(&self) -> f32 {
        rad_to_deg(self.offset)
    }

    /// Velocity magnitude in radians per second.
    pub fn velocity_rads(&self) -> f32 {
        self.velocity
    }

    /// Velocity magnitude in RPM.
    pub fn velocity_rpm(&self) -> f32 {
        rads_to_rpm(self.velocity)
    }

    /// `true` when at least one limit is set.
    pub fn has_limits(&self) -> bool {
        self.upper_limit.is_some() || self.lower_limit.is_some()
    }

    /// Permitted travel band `(lower, upper)` in radians.
    ///
    /// Swaps the stored limits of a mirrored joint, so `lower ≤ upper`
    /// whenever the configured limits were ordered.
    pub fn band_rad(&self) -> (Option<f32>, Option<f32>) {
        if self.inverted {
            (self.upper_limit, self.lower_limit)
        } else {
            (self.lower_limit, self.upper_limit)
        }
    }

    /// Upper edge of the band in degrees, or `361°` when unset.
    pub fn upper_bound_deg(&self) -> f32 {
        self.band_rad().1.map_or(INFINITE_ANGLE_DEG, rad_to_deg)
    }

    /// Lower edge of the band in degrees, or `-361°` when unset.
    pub fn lower_bound_deg(&self) -> f32 {
        self.band_rad().0.map_or(-INFINITE_ANGLE_DEG, rad_to_deg)
    }

    // Clamp the target into the band.  No-op when both limits are unset.
    fn clamp_target(&mut self) {
        if !self.has_limits() {
            return;
        }
        let (lower, upper) = self.band_rad();
        if let Some(mut target) = self.target_angle {
            if let Some(lower) = lower
                && target <= lower
            {
                target = lower;
            }
            if let Some(upper) = upper
                && target >= upper
            {
                target = upper;
            }
            self.target_angle = Some(target);
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PropertyTransaction
// ────────────────────────────────────────────────────────────────────────────

/// Whether staged edits are currently accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Closed,
    Open,
}

/// Guarded staging buffer for one actuator's [`PropertySet`].
///
/// Created closed.  Only [`open`][Self::open] moves it to open; only
/// [`commit`][Self::commit] and [`cancel`][Self::cancel] close it again.
#[derive(Debug, Clone)]
pub struct PropertyTransaction {
    actuator: String,
    role: ActuatorRole,
    state: TransactionState,
    committed: PropertySet,
    staged: PropertySet,
}

impl PropertyTransaction {
    /// Closed transaction with every property unset, for `actuator`.
    pub fn new(actuator: impl Into<String>, role: ActuatorRole) -> Self {
        let initial = PropertySet {
            inverted: role == ActuatorRole::MirroredSlave,
            ..PropertySet::default()
        };
        Self {
            actuator: actuator.into(),
            role,
            state: TransactionState::Closed,
            committed: initial,
            staged: initial,
        }
    }

    /// Role fixed at construction.
    pub fn role(&self) -> ActuatorRole {
        self.role
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// `true` between [`open`][Self::open] and a commit or cancel.
    pub fn is_open(&self) -> bool {
        self.state == TransactionState::Open
    }

    /// The last committed values.
    pub fn committed(&self) -> &PropertySet {
        &self.committed
    }

    /// The values a commit would publish (before clamping).
    pub fn staged(&self) -> &PropertySet {
        &self.staged
    }

    /// Open a transaction.
    ///
    /// # Errors
    ///
    /// [`TransactionStateError::AlreadyOpen`] when a transaction is pending.
    pub fn open(&mut self) -> Result<&mut Self, TransactionStateError> {
        if self.is_open() {
            return Err(TransactionStateError::AlreadyOpen {
                actuator: self.actuator.clone(),
            });
        }
        self.state = TransactionState::Open;
        Ok(self)
    }

    /// Stage the upper limit.
    pub fn set_upper_limit(
        &mut self,
        value: f32,
        unit: AngleUnit,
    ) -> Result<&mut Self, TransactionStateError> {
        self.ensure_open("update upper limit")?;
        self.staged.upper_limit = Some(self.stage_angle(value, unit));
        Ok(self)
    }

    /// Stage the lower limit.
    pub fn set_lower_limit(
        &mut self,
        value: f32,
        unit: AngleUnit,
    ) -> Result<&mut Self, TransactionStateError> {
        self.ensure_open("update lower limit")?;
        self.staged.lower_limit = Some(self.stage_angle(value, unit));
        Ok(self)
    }

    /// Stage the target angle.
    pub fn set_target_angle(
        &mut self,
        value: f32,
        unit: AngleUnit,
    ) -> Result<&mut Self, TransactionStateError> {
        self.ensure_open("update target angle")?;
        self.staged.target_angle = Some(self.stage_angle(value, unit));
        Ok(self)
    }

    /// Stage the constant limit bias.
    pub fn set_offset(
        &mut self,
        value: f32,
        unit: AngleUnit,
    ) -> Result<&mut Self, TransactionStateError> {
        self.ensure_open("update offset")?;
        self.staged.offset = self.stage_angle(value, unit);
        Ok(self)
    }

    /// Stage a velocity.  Only the magnitude is kept; direction is chosen per
    /// movement.
    pub fn set_velocity(
        &mut self,
        value: f32,
        unit: VelocityUnit,
    ) -> Result<&mut Self, TransactionStateError> {
        self.ensure_open("update velocity")?;
        let rads = match unit {
            VelocityUnit::Rpm => rpm_to_rads(value),
            VelocityUnit::RadiansPerSecond => value,
        };
        self.staged.velocity = rads.abs();
        Ok(self)
    }

    /// Stage "no active target".
    pub fn reset_target_angle(&mut self) -> Result<&mut Self, TransactionStateError> {
        self.ensure_open("reset target angle")?;
        self.staged.target_angle = None;
        Ok(self)
    }

    /// Clamp the staged target into the staged limits, publish the staged
    /// values and close the transaction.
    ///
    /// # Errors
    ///
    /// [`TransactionStateError::NotOpen`] when no transaction is pending.
    pub fn commit(&mut self) -> Result<&PropertySet, TransactionStateError> {
        self.ensure_open("commit")?;
        self.staged.clamp_target();
        self.committed = self.staged;
        self.state = TransactionState::Closed;
        Ok(&self.committed)
    }

    /// Discard staged edits and close the transaction.
    ///
    /// # Errors
    ///
    /// [`TransactionStateError::NotOpen`] when no transaction is pending.
    pub fn cancel(&mut self) -> Result<(), TransactionStateError> {
        self.ensure_open("cancel")?;
        self.staged = self.committed;
        self.state = TransactionState::Closed;
        Ok(())
    }

    fn ensure_open(&self, operation: &str) -> Result<(), TransactionStateError> {
        match self.state {
            TransactionState::Open => Ok(()),
            TransactionState::Closed => Err(TransactionStateError::NotOpen {
                actuator: self.actuator.clone(),
                operation: operation.to_string(),
            }),
        }
    }

    // Invert for a mirrored slave, then normalize.
    fn stage_angle(&self, value: f32, unit: AngleUnit) -> f32 {
        let radians = match unit {
            AngleUnit::Degrees => deg_to_rad(value),
            AngleUnit::Radians => value,
        };
        normalize_rad(radians * self.role.sign())
    }
}
