//! Directive parser – reads the custom-data text attached to each joint.
//!
//! A directive marks a joint's role and may carry numeric settings, one per
//! line:
//!
//! ```text
//! ~NC_Mirror
//! ~NC_Offset = 5
//! ~NC_LowerLimit: -90
//! ~NC_UpperLimit 90
//! ~NC_Velocity=4.5
//! ```
//!
//! | Key | Unit | Field |
//! |---|---|---|
//! | `~NC_Offset` | degrees | [`JointSettings::offset_deg`] |
//! | `~NC_LowerLimit` | degrees | [`JointSettings::lower_limit_deg`] |
//! | `~NC_UpperLimit` | degrees | [`JointSettings::upper_limit_deg`] |
//! | `~NC_Velocity` | RPM | [`JointSettings::velocity_rpm`] |
//!
//! Markers and keys are matched case-insensitively.  A value that is missing
//! or does not parse as a finite number is treated as not specified.

use nacelle_types::{ActuatorRole, JointSettings};

pub const REFERENCE_MARKER: &str = "~NC_Reference";
pub const MIRROR_MARKER: &str = "~NC_Mirror";
pub const COPY_MARKER: &str = "~NC_Copy";

pub const OFFSET_KEY: &str = "~NC_Offset";
pub const LOWER_LIMIT_KEY: &str = "~NC_LowerLimit";
pub const UPPER_LIMIT_KEY: &str = "~NC_UpperLimit";
pub const VELOCITY_KEY: &str = "~NC_Velocity";

/// Role markers in precedence order.
const ROLE_MARKERS: [(&str, ActuatorRole); 3] = [
    (REFERENCE_MARKER, ActuatorRole::Reference),
    (MIRROR_MARKER, ActuatorRole::MirroredSlave),
    (COPY_MARKER, ActuatorRole::CopiedSlave),
];

/// Role named by `custom_data`, if any.
pub fn parse_role(custom_data: &str) -> Option<ActuatorRole> {
    let text = custom_data.to_lowercase();
    ROLE_MARKERS
        .iter()
        .find(|(marker, _)| text.contains(&marker.to_lowercase()))
        .map(|&(_, role)| role)
}

/// Parse a full directive.  Returns `None` for joints without a role marker.
pub fn parse(custom_data: &str) -> Option<JointSettings> {
    let role = parse_role(custom_data)?;
    Some(JointSettings {
        role,
        offset_deg: value_of(custom_data, OFFSET_KEY),
        lower_limit_deg: value_of(custom_data, LOWER_LIMIT_KEY),
        upper_limit_deg: value_of(custom_data, UPPER_LIMIT_KEY),
        velocity_rpm: value_of(custom_data, VELOCITY_KEY),
    })
}

/// Value of the first line starting with `key`.
///
/// The key may be followed by `=`, `:` or plain whitespace.
pub fn value_of(custom_data: &str, key: &str) -> Option<f32> {
    let key = key.to_lowercase();
    let line = custom_data
        .lines()
        .map(|line| line.trim().to_lowercase())
        .find(|line| line.starts_with(&key))?;

    let rest = line[key.len()..].trim_start();
    let rest = rest
        .strip_prefix('=')
        .or_else(|| rest.strip_prefix(':'))
        .unwrap_or(rest);

    rest.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}
