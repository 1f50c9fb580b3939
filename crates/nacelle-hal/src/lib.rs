//! `nacelle-hal` – device boundary and angle math.
//!
//! # Modules
//!
//! - [`angle`] – normalization, unit conversions, and the arc intersection
//!   test used for forbidden-arc avoidance.
//! - [`stator`] – [`Stator`][stator::Stator]: the opaque rotor/stator device
//!   the controller commands.
//! - [`sim`] – [`SimStator`][sim::SimStator]: a simulated joint for tests and
//!   the CLI.

pub mod angle;
pub mod sim;
pub mod stator;

pub use sim::{LimitWrite, SimStator};
pub use stator::Stator;
