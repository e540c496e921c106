//! Angle helpers shared by the model and the controller

use std::f64::consts::PI;

/// Wrap an angle into (-pi, pi].
///
/// Uses `atan2(sin, cos)` so any multiple of 2*pi maps onto the same value.
/// `atan2` can return exactly `-pi`, which is folded onto `pi` to keep the
/// interval half-open.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.sin().atan2(angle.cos());
    if wrapped <= -PI {
        PI
    } else {
        wrapped
    }
}
