use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a managed joint relates to the reference joint.
///
/// The role is fixed when a controller is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActuatorRole {
    /// The single joint whose commanded angle drives all others.
    Reference,
    /// Tracks the reference with every angular quantity sign-inverted.
    MirroredSlave,
    /// Tracks the reference with angular quantities unchanged.
    CopiedSlave,
}

impl ActuatorRole {
    /// Multiplier applied to every staged angular value (`-1.0` when mirrored).
    pub fn sign(self) -> f32 {
        match self {
            ActuatorRole::MirroredSlave => -1.0,
            ActuatorRole::Reference | ActuatorRole::CopiedSlave => 1.0,
        }
    }

    pub fn is_slave(self) -> bool {
        !matches!(self, ActuatorRole::Reference)
    }
}

/// Unit of an angular value handed to a staged setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleUnit {
    Degrees,
    Radians,
}

/// Unit of a velocity magnitude handed to a staged setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VelocityUnit {
    Rpm,
    RadiansPerSecond,
}

/// Typed per-joint configuration, as produced by the directive parser.
///
/// Every numeric field is optional: an absent or unparseable value leaves the
/// corresponding property at its default instead of failing construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSettings {
    pub role: ActuatorRole,
    /// Constant bias (degrees) added to the limits written to the device.
    pub offset_deg: Option<f32>,
    pub lower_limit_deg: Option<f32>,
    pub upper_limit_deg: Option<f32>,
    pub velocity_rpm: Option<f32>,
}

impl JointSettings {
    /// Settings for `role` with every numeric property left unset.
    pub fn new(role: ActuatorRole) -> Self {
        Self {
            role,
            offset_deg: None,
            lower_limit_deg: None,
            upper_limit_deg: None,
            velocity_rpm: None,
        }
    }
}

/// A property mutation or transaction boundary was invoked in the wrong
/// transaction state.  Always a caller-logic bug.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStateError {
    #[error("Update on pending transaction for {actuator}")]
    AlreadyOpen { actuator: String },

    #[error("Attempt to {operation} on {actuator} without transaction")]
    NotOpen { actuator: String, operation: String },
}

/// Error type spanning transaction misuse and controller configuration faults.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NacelleError {
    #[error("Transaction State Error: {0}")]
    TransactionState(#[from] TransactionStateError),

    #[error("Configuration Error: {0}")]
    Configuration(String),
}

/// Where a host-visible log event is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogKind {
    /// Kept in a bounded ring; the oldest line is dropped past capacity.
    Scrolling,
    /// Kept until the next read of the log, then cleared.
    Persistent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A structured, host-visible log message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: LogKind,
    pub severity: Severity,
    pub message: String,
}

impl LogEvent {
    pub fn new(kind: LogKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            severity,
            message: message.into(),
        }
    }
}
