//! Discovery – classify host stators by their directive and build the
//! [`ControllerSet`].
//!
//! | Directive | Result |
//! |---|---|
//! | `~NC_Reference` (first one) | reference controller |
//! | `~NC_Reference` (any later one) | unmanaged, with a warning |
//! | `~NC_Mirror` | mirrored slave |
//! | `~NC_Copy` | copied slave |
//! | none | unmanaged |
//!
//! Each managed joint gets one transaction staging every value present in its
//! directive.  Without a reference nothing is managed and the
//! "no reference" error is logged.

use nacelle_hal::stator::Stator;
use nacelle_kernel::{ActuatorController, ControllerSet};
use nacelle_types::{ActuatorRole, NacelleError};
use tracing::{debug, info, instrument};

use crate::directive;
use crate::log_buffer::LogBuffer;

/// Host-visible message for a rig without a reference joint.
pub const NO_REFERENCE_MESSAGE: &str = "ERROR: No reference stator.";

/// Classify `stators` and configure every managed joint.
#[instrument(skip_all, fields(stators = stators.len()))]
pub fn discover<S: Stator>(stators: Vec<S>, log: &mut LogBuffer) -> ControllerSet<S> {
    let mut reference: Option<ActuatorController<S>> = None;
    let mut slaves = Vec::new();
    let mut unmanaged = Vec::new();

    for stator in stators {
        let Some(settings) = directive::parse(stator.custom_data()) else {
            unmanaged.push(stator);
            continue;
        };

        if settings.role == ActuatorRole::Reference
            && let Some(existing) = &reference
        {
            log.warning(format!(
                "WARNING: Second reference stator {} ignored; {} is the reference.",
                stator.name(),
                existing.name()
            ));
            unmanaged.push(stator);
            continue;
        }

        let mut controller = ActuatorController::new(stator, settings.role);
        if let Err(e) = controller.configure(&settings) {
            log.error(format!("ERROR: {e}"));
            unmanaged.push(controller.into_stator());
            continue;
        }
        debug!(stator = %controller.name(), role = ?settings.role, "stator configured");

        match settings.role {
            ActuatorRole::Reference => reference = Some(controller),
            ActuatorRole::MirroredSlave | ActuatorRole::CopiedSlave => slaves.push(controller),
        }
    }

    let set = ControllerSet::new(reference, slaves, unmanaged);
    match require_reference(&set) {
        Ok(name) => info!(
            reference = name,
            mirrored = set.mirrored_count(),
            copied = set.copied_count(),
            unmanaged = set.unmanaged().len(),
            "discovery complete"
        ),
        Err(_) => log.error(NO_REFERENCE_MESSAGE),
    }
    set
}

/// Name of the reference joint.
///
/// # Errors
///
/// [`NacelleError::Configuration`] when the set has no reference.
pub fn require_reference<S: Stator>(set: &ControllerSet<S>) -> Result<&str, NacelleError> {
    set.reference()
        .map(ActuatorController::name)
        .ok_or_else(|| NacelleError::Configuration("no reference stator".to_string()))
}
