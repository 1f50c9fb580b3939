//! `nacelle-runtime` – Directives, Discovery & the Host Tick
//!
//! Everything around the kernel that a host needs to drive a nacelle rig.
//!
//! # Modules
//!
//! - [`directive`] – parses the `~NC_*` custom-data directive attached to each
//!   joint into [`JointSettings`][nacelle_types::JointSettings].  Values that
//!   do not parse are treated as not specified.
//! - [`discovery`] – [`discover`][discovery::discover]: classifies stators
//!   into a reference, mirrored and copied slaves, and unmanaged joints, and
//!   commits each directive's settings.
//! - [`driver`] – [`NacelleDriver`][driver::NacelleDriver]: the per-tick entry
//!   point.  Handles `update`, `clearLog` and angle commands, ticks the
//!   [`Scheduler`][nacelle_kernel::Scheduler] and refreshes the status panel.
//! - [`log_buffer`] – [`LogBuffer`][log_buffer::LogBuffer]: the scrolling and
//!   persistent host-visible log, mirrored to `tracing`.
//! - [`status`] – [`StatusPanel`][status::StatusPanel]: the text panel with
//!   its running spinner.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]:
//!   initialises the global `tracing` subscriber with an optional OTLP span
//!   exporter.  Set `OTEL_EXPORTER_OTLP_ENDPOINT` to enable live trace export.

pub mod directive;
pub mod discovery;
pub mod driver;
pub mod log_buffer;
pub mod status;
pub mod telemetry;

pub use discovery::{NO_REFERENCE_MESSAGE, discover, require_reference};
pub use driver::{Command, NacelleDriver};
pub use log_buffer::{LogBuffer, SCROLLING_LINE_COUNT};
pub use status::{RigSummary, StatusPanel};
pub use telemetry::{LogFormat, TracerProviderGuard, init_tracing};
