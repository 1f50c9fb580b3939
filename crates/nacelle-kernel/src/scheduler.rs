//! Cooperative scheduler for managed movements.
//!
//! The scheduler never runs on its own: the host calls [`Scheduler::tick`]
//! once per external tick.  Each tick
//!
//! 1. steps every running task, oldest first, and drops the completed ones;
//! 2. returns early when nothing is pending;
//! 3. evicts the oldest running tasks while `running + pending > capacity`,
//!    running the same cleanup a completed movement gets;
//! 4. drops the oldest pending providers that still do not fit;
//! 5. instantiates every remaining provider into a running task.
//!
//! A provider starts its movement when it is instantiated, but the resulting
//! task is first polled on the following tick, so the direction and guard
//! setpoints are on the device before completion is checked.

use std::collections::VecDeque;
use std::fmt;

use nacelle_hal::stator::Stator;
use tracing::{debug, warn};

use crate::controller_set::{ControllerId, ControllerSet};
use crate::movement::{MovementTask, TaskState};

/// Factory that starts a movement and returns the task polling it.
pub type TaskProvider<S> = Box<dyn FnOnce(&mut ControllerSet<S>) -> Option<MovementTask>>;

struct PendingMovement<S: Stator> {
    controller: ControllerId,
    provider: TaskProvider<S>,
}

/// What one [`Scheduler::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tasks stepped this tick.
    pub advanced: usize,
    /// Tasks that reached their target this tick.
    pub completed: usize,
    /// Running tasks aborted to make room.
    pub evicted: usize,
    /// Pending providers discarded without being started.
    pub dropped: usize,
    /// Providers turned into running tasks.
    pub admitted: usize,
}

pub struct Scheduler<S: Stator> {
    running: VecDeque<MovementTask>,
    pending: Vec<PendingMovement<S>>,
    capacity: usize,
}

impl<S: Stator> fmt::Debug for Scheduler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("running", &self.running)
            .field("pending", &self.pending.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<S: Stator + 'static> Default for Scheduler<S> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<S: Stator + 'static> Scheduler<S> {
    /// Idle scheduler admitting at most `capacity` running tasks.
    pub fn new(capacity: usize) -> Self {
        Self {
            running: VecDeque::new(),
            pending: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Takes effect on the next tick; nothing is evicted here.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// Number of running tasks.
    pub fn running_len(&self) -> usize {
        self.running.len()
    }

    /// Number of providers waiting for the next tick.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// `true` when nothing is running or pending.
    pub fn is_idle(&self) -> bool {
        self.running.is_empty() && self.pending.is_empty()
    }

    /// Controllers with a running task, oldest first.
    pub fn running_controllers(&self) -> Vec<ControllerId> {
        self.running.iter().map(MovementTask::controller).collect()
    }

    /// Queue a provider for `controller`.  It is admitted on the next tick.
    pub fn enqueue(&mut self, controller: ControllerId, provider: TaskProvider<S>) {
        self.pending.push(PendingMovement {
            controller,
            provider,
        });
    }

    /// Queue the managed movement of `controller`.
    pub fn enqueue_movement(&mut self, controller: ControllerId) {
        self.enqueue(
            controller,
            Box::new(move |set: &mut ControllerSet<S>| set.begin_managed_movement(controller)),
        );
    }

    /// Run one tick; see the module docs for the order of steps.
    pub fn tick(&mut self, set: &mut ControllerSet<S>) -> TickReport {
        let mut report = TickReport {
            advanced: self.running.len(),
            ..TickReport::default()
        };

        self.running.retain_mut(|task| {
            let done = task.step(set) == TaskState::Completed;
            if done {
                report.completed += 1;
            }
            !done
        });

        if self.pending.is_empty() {
            return report;
        }

        while self.running.len() + self.pending.len() > self.capacity {
            let Some(mut oldest) = self.running.pop_front() else {
                break;
            };
            warn!(controller = oldest.controller().0, "evicting running movement");
            oldest.abort(set);
            report.evicted += 1;
        }

        let overflow = self.pending.len().saturating_sub(self.capacity);
        if overflow > 0 {
            for dropped in self.pending.drain(..overflow) {
                warn!(
                    controller = dropped.controller.0,
                    "dropping queued movement over capacity"
                );
            }
            report.dropped = overflow;
        }

        for pending in self.pending.drain(..) {
            if let Some(task) = (pending.provider)(set) {
                self.running.push_back(task);
                report.admitted += 1;
            }
        }

        debug!(?report, running = self.running.len(), "scheduler tick");
        report
    }

    /// Abort every running task through the cleanup path and forget every
    /// pending provider.
    pub fn stop_all(&mut self, set: &mut ControllerSet<S>) {
        for mut task in self.running.drain(..) {
            task.abort(set);
        }
        self.pending.clear();
    }
}
