pub mod autopilot;
pub mod pid;
pub mod refmodel;

pub use autopilot::HeadingAutopilot;
pub use pid::Pid;
pub use refmodel::RefModel;

use std::f64::consts::{PI, TAU};

// ---------------------------------------------------------------------------
// Angle wrapping
// ---------------------------------------------------------------------------

/// Smallest signed angle: maps any angle (rad) into (-pi, pi].
///
/// Heading errors must pass through this before feedback; an unwrapped
/// error commands the wrong turn direction whenever heading crosses
/// +-180 deg.
pub fn ssa(angle: f64) -> f64 {
    PI - (PI - angle).rem_euclid(TAU)
}
