//! [`MovementTask`] – a resumable poll of one controller's managed movement.
//!
//! A task does no work of its own between steps.  Each
//! [`step`][MovementTask::step] asks its controller whether the target has
//! been reached and, once it has, runs the cleanup path exactly once.

use nacelle_hal::stator::Stator;
use tracing::debug;

use crate::controller_set::{ControllerId, ControllerSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Running,
    Completed,
}

/// Polls one controller until its target angle is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementTask {
    controller: ControllerId,
    state: TaskState,
}

impl MovementTask {
    /// Running task polling `controller`.
    pub fn new(controller: ControllerId) -> Self {
        Self {
            controller,
            state: TaskState::Running,
        }
    }

    /// The controller this task polls.
    pub fn controller(&self) -> ControllerId {
        self.controller
    }

    /// Current state.
    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == TaskState::Completed
    }

    /// Advance by one poll.
    ///
    /// A completed task stays completed and never touches the device again.
    /// A controller that no longer exists completes the task immediately.
    pub fn step<S: Stator>(&mut self, set: &mut ControllerSet<S>) -> TaskState {
        if self.is_completed() {
            return self.state;
        }
        let Some(controller) = set.get_mut(self.controller) else {
            self.state = TaskState::Completed;
            return self.state;
        };

        if controller.compare_target_angle() {
            controller.finish_movement();
            debug!(stator = %controller.name(), "managed movement reached target");
            self.state = TaskState::Completed;
        }
        self.state
    }

    /// Stop the movement early through the cleanup path.
    ///
    /// Has no effect on a task that has already completed.
    pub fn abort<S: Stator>(&mut self, set: &mut ControllerSet<S>) {
        if self.is_completed() {
            return;
        }
        if let Some(controller) = set.get_mut(self.controller) {
            controller.finish_movement();
            debug!(stator = %controller.name(), "managed movement aborted");
        }
        self.state = TaskState::Completed;
    }
}
