use std::f32::consts::{PI, TAU};

/// Wrap an angle (radians) into `[0, 2π)`.
#[inline]
pub fn wrap_two_pi(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Compute the absolute difference between two angles (radians),
/// normalized into `[0, π]`.
#[inline]
pub fn angle_diff_abs(a: f32, b: f32) -> f32 {
    // Normalize angle difference to [-π, π).
    let mut diff = (b - a).rem_euclid(TAU);
    if diff >= PI {
        diff -= TAU;
    }
    diff.abs()
}

/// Bearing of the vector `(dx, dy)` in radians, in `[0, 2π)`.
///
/// Measured from the +y axis towards +x: `(0, 1)` is 0, `(1, 0)` is π/2,
/// `(0, -1)` is π and `(-1, 0)` is 3π/2. A zero vector has bearing 0.
#[inline]
pub fn bearing(dx: f32, dy: f32) -> f32 {
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    wrap_two_pi(dx.atan2(dy))
}
