//! [`NacelleDriver`] – the per-tick entry point the host calls.
//!
//! Each [`run`][NacelleDriver::run] processes the host's argument, ticks the
//! scheduler once and refreshes the status panel.
//!
//! # Commands
//!
//! | Argument | Effect |
//! |---|---|
//! | `update` | Stop every movement, then classify the stators again. |
//! | `clearLog` | Forget the scrolling log lines. |
//! | any number | Target that angle (degrees) on every managed joint and queue their movements. |
//! | anything else | Ignored. |
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use nacelle_hal::sim::SimStator;
//! use nacelle_runtime::NacelleDriver;
//!
//! let rig = vec![
//!     SimStator::new("Hinge").with_custom_data("~NC_Reference").with_velocity_rpm(5.0),
//!     SimStator::new("Left").with_custom_data("~NC_Mirror").with_velocity_rpm(5.0),
//! ];
//! let mut driver = NacelleDriver::new(rig);
//!
//! driver.run("45", Duration::from_millis(16)).unwrap();
//! assert_eq!(driver.scheduler().running_len(), 2);
//! assert!(driver.status_text().contains("Reference Rotor: Hinge"));
//! ```

use std::time::Duration;

use nacelle_hal::angle::{normalize_deg, rad_to_deg};
use nacelle_hal::stator::Stator;
use nacelle_kernel::{ControllerId, ControllerSet, Scheduler, TickReport};
use nacelle_types::{AngleUnit, NacelleError};
use tracing::{debug, info, instrument, warn};

use crate::discovery::{self, require_reference};
use crate::log_buffer::LogBuffer;
use crate::status::{RigSummary, StatusPanel};

/// A parsed host argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Update,
    ClearLog,
    MoveTo(f32),
}

impl Command {
    /// `None` for an empty or unrecognised argument.
    pub fn parse(argument: &str) -> Option<Command> {
        match argument.trim() {
            "update" => Some(Command::Update),
            "clearLog" => Some(Command::ClearLog),
            other => other
                .parse::<f32>()
                .ok()
                .filter(|angle| angle.is_finite())
                .map(Command::MoveTo),
        }
    }
}

/// Owns the controller set, the scheduler and the host-visible log.
#[derive(Debug)]
pub struct NacelleDriver<S: Stator + 'static> {
    set: ControllerSet<S>,
    scheduler: Scheduler<S>,
    log: LogBuffer,
    status: StatusPanel,
    status_text: String,
}

impl<S: Stator + 'static> NacelleDriver<S> {
    /// Discover the rig among `stators`.
    pub fn new(stators: Vec<S>) -> Self {
        let mut log = LogBuffer::new();
        let set = discovery::discover(stators, &mut log);
        let scheduler = Scheduler::new(set.capacity());
        let mut driver = Self {
            set,
            scheduler,
            log,
            status: StatusPanel::new(),
            status_text: String::new(),
        };
        driver.refresh_status();
        driver
    }

    /// One host tick.
    ///
    /// A movement command without a reference joint is logged and ignored.
    ///
    /// # Errors
    ///
    /// [`NacelleError::TransactionState`] when a controller's transaction was
    /// left open; the command is abandoned and the scheduler is not ticked.
    #[instrument(skip(self))]
    pub fn run(&mut self, argument: &str, elapsed: Duration) -> Result<TickReport, NacelleError> {
        match Command::parse(argument) {
            Some(Command::Update) => self.rediscover(),
            Some(Command::ClearLog) => self.log.clear(),
            Some(Command::MoveTo(angle)) => match self.move_to(angle) {
                Ok(()) => {}
                Err(NacelleError::Configuration(reason)) => {
                    warn!(angle, %reason, "movement command ignored");
                }
                Err(e) => return Err(e),
            },
            None if argument.trim().is_empty() => {}
            None => debug!(argument, "unrecognised argument ignored"),
        }

        let report = self.scheduler.tick(&mut self.set);
        self.log_positions();
        self.refresh_status();
        self.status.advance(elapsed);
        Ok(report)
    }

    /// Target `angle_deg` on the reference and every slave, then queue their
    /// managed movements.  Mirrored slaves receive the sign-inverted target.
    ///
    /// Every transaction is opened before any is committed, so either all
    /// joints take the new target or none do.
    ///
    /// # Errors
    ///
    /// [`NacelleError::Configuration`] without a reference joint.
    /// [`NacelleError::TransactionState`] when a transaction is already open;
    /// nothing is committed or queued.
    pub fn move_to(&mut self, angle_deg: f32) -> Result<(), NacelleError> {
        require_reference(&self.set)?;

        let ids: Vec<ControllerId> = self.set.ids().collect();
        self.stage_target(&ids, angle_deg)?;

        for &id in &ids {
            if let Some(controller) = self.set.get_mut(id) {
                controller.commit()?;
            }
        }
        for &id in &ids {
            self.scheduler.enqueue_movement(id);
        }
        info!(angle_deg, queued = self.scheduler.pending_len(), "managed movement queued");
        Ok(())
    }

    // Open a transaction on every controller and stage the target.  On
    // failure the transactions opened here are cancelled again.
    fn stage_target(&mut self, ids: &[ControllerId], angle_deg: f32) -> Result<(), NacelleError> {
        for (opened, &id) in ids.iter().enumerate() {
            let staged = match self.set.get_mut(id) {
                Some(controller) => controller
                    .update()
                    .and_then(|staged| staged.target_angle(angle_deg, AngleUnit::Degrees))
                    .map(drop),
                None => Ok(()),
            };
            if let Err(e) = staged {
                for &id in &ids[..opened] {
                    if let Some(controller) = self.set.get_mut(id)
                        && let Err(cancel) = controller.cancel()
                    {
                        warn!(controller = id.0, error = %cancel, "cancel failed");
                    }
                }
                return Err(e.into());
            }
        }
        Ok(())
    }

    /// Stop every movement through the cleanup path and classify the
    /// stators again.
    pub fn rediscover(&mut self) {
        self.scheduler.stop_all(&mut self.set);
        let stators = std::mem::take(&mut self.set).into_stators();
        self.set = discovery::discover(stators, &mut self.log);
        self.scheduler.set_capacity(self.set.capacity());
        self.log.scrolling(format!(
            "Discovered {} managed stator(s).",
            self.set.capacity()
        ));
    }

    /// Abort every running and queued movement, re-locking the joints.
    pub fn shutdown(&mut self) {
        let running = self.scheduler.running_len();
        self.scheduler.stop_all(&mut self.set);
        info!(running, "nacelle driver stopped");
    }

    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    pub fn controllers(&self) -> &ControllerSet<S> {
        &self.set
    }

    pub fn scheduler(&self) -> &Scheduler<S> {
        &self.scheduler
    }

    /// Every stator, managed or not, e.g. to advance a simulation.
    pub fn stators_mut(&mut self) -> impl Iterator<Item = &mut S> {
        self.set.stators_mut()
    }

    pub fn log(&self) -> &LogBuffer {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut LogBuffer {
        &mut self.log
    }

    pub fn summary(&self) -> Option<RigSummary> {
        require_reference(&self.set).ok().map(|reference| RigSummary {
            reference: reference.to_string(),
            mirrored: self.set.mirrored_count(),
            copied: self.set.copied_count(),
        })
    }

    /// Panel text as of the last [`run`][Self::run].
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn into_stators(self) -> Vec<S> {
        self.set.into_stators()
    }

    fn log_positions(&mut self) {
        for id in self.scheduler.running_controllers() {
            let Some(controller) = self.set.get(id) else {
                continue;
            };
            let current = normalize_deg(rad_to_deg(controller.stator().angle()));
            let line = match controller.properties().target_angle_deg() {
                Some(target) => format!("{}: {current:.2}° → {target:.2}°", controller.name()),
                None => format!("{}: {current:.2}°", controller.name()),
            };
            self.log.persistent(line);
        }
    }

    fn refresh_status(&mut self) {
        let summary = self.summary();
        let lines = self.log.drain();
        self.status_text = self.status.render(summary.as_ref(), &lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nacelle_hal::sim::SimStator;

    const TICK: Duration = Duration::from_millis(16);

    fn rig() -> Vec<SimStator> {
        vec![
            SimStator::new("hinge")
                .with_custom_data("~NC_Reference")
                .with_velocity_rpm(10.0),
            SimStator::new("left")
                .with_custom_data("~NC_Mirror")
                .with_velocity_rpm(10.0),
        ]
    }

    #[test]
    fn command_parsing() {
        assert_eq!(Command::parse("update"), Some(Command::Update));
        assert_eq!(Command::parse("clearLog"), Some(Command::ClearLog));
        assert_eq!(Command::parse(" -12.5 "), Some(Command::MoveTo(-12.5)));
        assert_eq!(Command::parse("NaN"), None);
        assert_eq!(Command::parse("hover"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn angle_command_targets_every_joint() {
        let mut driver = NacelleDriver::new(rig());
        driver.run("30", TICK).unwrap();

        let reference = driver.controllers().get(ControllerId(0)).unwrap();
        let mirrored = driver.controllers().get(ControllerId(1)).unwrap();
        assert!((reference.properties().target_angle_deg().unwrap() - 30.0).abs() < 1e-3);
        assert!((mirrored.properties().target_angle_deg().unwrap() + 30.0).abs() < 1e-3);
        assert_eq!(driver.scheduler().running_len(), 2);
    }

    #[test]
    fn movement_command_without_reference_is_ignored() {
        let mut driver = NacelleDriver::new(vec![
            SimStator::new("left").with_custom_data("~NC_Mirror"),
        ]);
        assert!(driver.status_text().contains("ERROR: No reference stator."));

        let report = driver.run("30", TICK).unwrap();
        assert_eq!(report, TickReport::default());
        assert!(driver.is_idle());
        assert!(matches!(
            driver.move_to(30.0),
            Err(NacelleError::Configuration(_))
        ));
    }

    #[test]
    fn open_transaction_aborts_command() {
        let mut driver = NacelleDriver::new(rig());
        let reference = driver.set.get_mut(ControllerId(0)).unwrap();
        drop(reference.update().unwrap());

        assert!(matches!(
            driver.run("30", TICK),
            Err(NacelleError::TransactionState(_))
        ));
        assert!(driver.is_idle());
    }

    #[test]
    fn open_slave_transaction_leaves_every_joint_untouched() {
        let mut driver = NacelleDriver::new(rig());
        let slave = driver.set.get_mut(ControllerId(1)).unwrap();
        drop(slave.update().unwrap());

        assert!(matches!(
            driver.run("30", TICK),
            Err(NacelleError::TransactionState(_))
        ));
        assert_eq!(driver.scheduler().pending_len(), 0);

        let reference = driver.controllers().get(ControllerId(0)).unwrap();
        assert!(reference.properties().target_angle_rad().is_none());
        assert!(!reference.transaction().is_open());
        // The slave's own pending edit is not ours to cancel.
        assert!(driver.controllers().get(ControllerId(1)).unwrap().transaction().is_open());

        driver.run("", TICK).unwrap();
        assert!(driver.is_idle());
        let reference = driver.controllers().get(ControllerId(0)).unwrap().stator();
        assert!(reference.safety_lock());
        assert!(!reference.is_enabled());
    }

    #[test]
    fn clear_log_forgets_scrolling_lines() {
        let mut driver = NacelleDriver::new(vec![SimStator::new("gear")]);
        driver.run("", TICK).unwrap();
        assert!(driver.log().scrolling_events().count() > 0);

        driver.run("clearLog", TICK).unwrap();
        assert_eq!(driver.log().scrolling_events().count(), 0);
    }

    #[test]
    fn update_stops_movements_and_reclassifies() {
        let mut driver = NacelleDriver::new(rig());
        driver.run("60", TICK).unwrap();
        assert_eq!(driver.scheduler().running_len(), 2);

        for stator in driver.stators_mut() {
            if stator.name() == "left" {
                stator.set_custom_data("~NC_Copy");
            }
        }
        driver.run("update", TICK).unwrap();

        assert!(driver.is_idle());
        assert_eq!(driver.summary().unwrap().copied, 1);
        assert_eq!(driver.summary().unwrap().mirrored, 0);
        for stator in driver.stators_mut() {
            assert!(stator.safety_lock());
            assert!(!stator.is_enabled());
        }
    }

    #[test]
    fn shutdown_relocks_running_joints() {
        let mut driver = NacelleDriver::new(rig());
        driver.run("90", TICK).unwrap();
        driver.shutdown();

        assert!(driver.is_idle());
        for stator in driver.into_stators() {
            assert!(stator.safety_lock());
            assert!(!stator.is_moving());
        }
    }

    #[test]
    fn running_movements_are_shown_on_the_panel() {
        let mut driver = NacelleDriver::new(rig());
        driver.run("45", TICK).unwrap();
        assert!(driver.status_text().contains("hinge: 0.00° → 45.00°"));
        assert!(driver.status_text().contains("Mirrored Rotors: 1"));
    }
}
