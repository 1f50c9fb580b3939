//! Angle math shared by the controller and the device boundary.
//!
//! Everything here is a pure function on `f32` angles.  Wrapping is computed
//! in `f64` so that values far beyond ±360° still land in the canonical range.

use std::f64::consts::{PI, TAU};

/// Sentinel radian value meaning "this bound or target is unset" (361°).
pub const INFINITE_ANGLE_RAD: f32 = 6.30064;

/// Sentinel degree value meaning "this bound is unset".
pub const INFINITE_ANGLE_DEG: f32 = 361.0;

/// Wrap `degrees` into `[-180, 180)`.
pub fn normalize_deg(degrees: f32) -> f32 {
    let wrapped = ((f64::from(degrees) + 180.0).rem_euclid(360.0) - 180.0) as f32;
    // rem_euclid may round up to the modulus itself.
    if wrapped >= 180.0 { -180.0 } else { wrapped }
}

/// Wrap `radians` into `[-π, π)`.
pub fn normalize_rad(radians: f32) -> f32 {
    let wrapped = ((f64::from(radians) + PI).rem_euclid(TAU) - PI) as f32;
    if wrapped >= std::f32::consts::PI {
        -std::f32::consts::PI
    } else {
        wrapped
    }
}

/// Degrees to radians.
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Radians to degrees.
pub fn rad_to_deg(radians: f32) -> f32 {
    radians.to_degrees()
}

/// Revolutions per minute to radians per second.
pub fn rpm_to_rads(rpm: f32) -> f32 {
    rpm * std::f32::consts::TAU / 60.0
}

/// Radians per second to revolutions per minute.
pub fn rads_to_rpm(rads: f32) -> f32 {
    rads * 60.0 / std::f32::consts::TAU
}

/// Return `true` when `point` lies strictly inside the arc that starts at
/// `segment_end1` and runs in the positive direction to `segment_end2`.
///
/// When `segment_end1 > segment_end2` the arc wraps through the ±180°
/// boundary; otherwise it is the plain interval between the two ends.
pub fn intersects(point: f32, segment_end1: f32, segment_end2: f32) -> bool {
    if segment_end1 > segment_end2 {
        point > segment_end1 || point < segment_end2
    } else {
        point > segment_end1 && point < segment_end2
    }
}
