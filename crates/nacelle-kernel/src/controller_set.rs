//! [`ControllerSet`] – every managed controller, owned by the top-level driver.
//!
//! A set is built once per discovery.  The reference controller (if any)
//! always has [`ControllerId`] 0 and slaves follow in insertion order.
//! Stators that were not classified as managed are kept so that a later
//! re-discovery can reclassify them.

use nacelle_hal::stator::Stator;
use nacelle_types::ActuatorRole;

use crate::controller::ActuatorController;
use crate::movement::MovementTask;

/// Index of a controller within its [`ControllerSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(pub usize);

/// The reference controller, its slaves, and the unmanaged stators.
#[derive(Debug)]
pub struct ControllerSet<S: Stator> {
    controllers: Vec<ActuatorController<S>>,
    has_reference: bool,
    unmanaged: Vec<S>,
}

impl<S: Stator> Default for ControllerSet<S> {
    fn default() -> Self {
        Self {
            controllers: Vec::new(),
            has_reference: false,
            unmanaged: Vec::new(),
        }
    }
}

impl<S: Stator> ControllerSet<S> {
    /// Assemble a set and bind every slave to the reference.
    ///
    /// Without a reference nothing is managed: the slaves' stators are moved
    /// to the unmanaged list.
    pub fn new(
        reference: Option<ActuatorController<S>>,
        slaves: Vec<ActuatorController<S>>,
        unmanaged: Vec<S>,
    ) -> Self {
        let mut set = Self {
            unmanaged,
            ..Self::default()
        };

        let Some(reference) = reference else {
            set.unmanaged
                .extend(slaves.into_iter().map(ActuatorController::into_stator));
            return set;
        };

        let reference_name = reference.name().to_string();
        set.controllers.push(reference);
        set.has_reference = true;
        set.controllers.extend(slaves.into_iter().map(|mut slave| {
            slave.set_reference(reference_name.clone());
            slave
        }));
        set
    }

    /// Number of managed controllers; also the scheduler's capacity.
    pub fn capacity(&self) -> usize {
        self.controllers.len()
    }

    /// `true` when a reference joint is managed.
    pub fn has_reference(&self) -> bool {
        self.has_reference
    }

    /// The reference controller, if any.
    pub fn reference(&self) -> Option<&ActuatorController<S>> {
        if self.has_reference {
            self.controllers.first()
        } else {
            None
        }
    }

    /// Mirrored and copied controllers, in discovery order.
    pub fn slaves(&self) -> impl Iterator<Item = &ActuatorController<S>> {
        self.controllers.iter().skip(usize::from(self.has_reference))
    }

    /// Number of mirrored slaves.
    pub fn mirrored_count(&self) -> usize {
        self.count_role(ActuatorRole::MirroredSlave)
    }

    /// Number of copied slaves.
    pub fn copied_count(&self) -> usize {
        self.count_role(ActuatorRole::CopiedSlave)
    }

    /// Ids of every managed controller, reference first.
    pub fn ids(&self) -> impl Iterator<Item = ControllerId> + use<S> {
        (0..self.controllers.len()).map(ControllerId)
    }

    /// Controller at `id`, `None` when out of range.
    pub fn get(&self, id: ControllerId) -> Option<&ActuatorController<S>> {
        self.controllers.get(id.0)
    }

    /// Mutable controller at `id`.
    pub fn get_mut(&mut self, id: ControllerId) -> Option<&mut ActuatorController<S>> {
        self.controllers.get_mut(id.0)
    }

    /// Stators without a usable directive.
    pub fn unmanaged(&self) -> &[S] {
        &self.unmanaged
    }

    /// Every stator, managed or not.
    pub fn stators_mut(&mut self) -> impl Iterator<Item = &mut S> {
        self.controllers
            .iter_mut()
            .map(ActuatorController::stator_mut)
            .chain(self.unmanaged.iter_mut())
    }

    /// Release every stator, managed ones first.
    pub fn into_stators(self) -> Vec<S> {
        self.controllers
            .into_iter()
            .map(ActuatorController::into_stator)
            .chain(self.unmanaged)
            .collect()
    }

    /// Start the managed movement of controller `id` and return the task that
    /// polls it to completion.
    pub fn begin_managed_movement(&mut self, id: ControllerId) -> Option<MovementTask> {
        let controller = self.get_mut(id)?;
        controller.begin_managed_movement();
        Some(MovementTask::new(id))
    }

    fn count_role(&self, role: ActuatorRole) -> usize {
        self.controllers.iter().filter(|c| c.role() == role).count()
    }
}
