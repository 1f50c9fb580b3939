//! `nacelle-kernel` – Property Transactions & Managed Movement
//!
//! The core of the nacelle controller.  It owns every managed stator, guards
//! what may be commanded to it, and drives movements to completion one
//! external tick at a time.
//!
//! # Modules
//!
//! - [`transaction`] – [`PropertyTransaction`][transaction::PropertyTransaction]:
//!   a single-writer staging buffer for one joint's limits, target, offset and
//!   velocity.  Staged writes are only accepted while the transaction is open;
//!   [`commit`][transaction::PropertyTransaction::commit] clamps the target to
//!   the limits before publishing it.
//! - [`controller`] – [`ActuatorController`][controller::ActuatorController]:
//!   one stator plus its transaction.  Writes committed setpoints to the
//!   device and plans a managed movement (direction, overshoot guard).
//! - [`movement`] – [`MovementTask`][movement::MovementTask]:
//!   the `Running → Completed` state machine that polls one controller until
//!   its target is reached, then re-locks the joint.
//! - [`scheduler`] – [`Scheduler`][scheduler::Scheduler]:
//!   advances running tasks oldest first and admits queued movements up to a
//!   capacity equal to the number of managed joints.
//! - [`controller_set`] – [`ControllerSet`][controller_set::ControllerSet]:
//!   the reference controller, its slaves and the unmanaged stators, owned by
//!   the top-level driver.
//!
//! # Tick discipline
//!
//! Nothing in this crate runs in the background.  The host calls
//! [`Scheduler::tick`] with the current [`ControllerSet`]; within one tick
//! every running task is stepped before any queued movement is admitted.

pub mod controller;
pub mod controller_set;
pub mod movement;
pub mod scheduler;
pub mod transaction;

pub use controller::{
    ActuatorController, COMPLETION_TOLERANCE_DEG, COMPLETION_TOLERANCE_RAD, Direction,
    MovementPlan, StagedProperties, choose_direction,
};
pub use controller_set::{ControllerId, ControllerSet};
pub use movement::{MovementTask, TaskState};
pub use scheduler::{Scheduler, TaskProvider, TickReport};
pub use transaction::{PropertySet, PropertyTransaction, TransactionState};
