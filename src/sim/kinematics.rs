use nalgebra::{Matrix3, Vector3, Vector6};

use crate::error::SimError;

// ---------------------------------------------------------------------------
// 6DOF kinematic transformation (body rates -> earth-fixed rates)
// ---------------------------------------------------------------------------

/// Rotation matrix from body to earth-fixed axes, zyx convention.
pub fn rzyx(phi: f64, theta: f64, psi: f64) -> Matrix3<f64> {
    let (sphi, cphi) = phi.sin_cos();
    let (sth, cth) = theta.sin_cos();
    let (spsi, cpsi) = psi.sin_cos();

    Matrix3::new(
        cpsi * cth,
        -spsi * cphi + cpsi * sth * sphi,
        spsi * sphi + cpsi * cphi * sth,
        spsi * cth,
        cpsi * cphi + sphi * sth * spsi,
        -cpsi * sphi + sth * spsi * cphi,
        -sth,
        cth * sphi,
        cth * cphi,
    )
}

/// Transformation from body angular rates to Euler angle rates, zyx
/// convention. Singular at theta = +-90 deg; a surface craft never
/// operates there, so consumers accept degraded accuracy instead of an
/// error.
pub fn tzyx(phi: f64, theta: f64) -> Matrix3<f64> {
    let (sphi, cphi) = phi.sin_cos();
    let cth = theta.cos();
    let tth = theta.tan();

    Matrix3::new(
        1.0,
        sphi * tth,
        cphi * tth,
        0.0,
        cphi,
        -sphi,
        0.0,
        sphi / cth,
        cphi / cth,
    )
}

/// One explicit-Euler kinematic step: `eta' = eta + dt * J(eta) * nu`.
///
/// The yaw component of the result is left unwrapped; wrapping is the
/// consumer's responsibility.
pub fn attitude_euler(eta: &Vector6<f64>, nu: &Vector6<f64>, dt: f64) -> Result<Vector6<f64>, SimError> {
    if dt <= 0.0 {
        return Err(SimError::domain(format!("sample time must be positive, got {dt}")));
    }

    let nu1: Vector3<f64> = nu.fixed_rows::<3>(0).into();
    let nu2: Vector3<f64> = nu.fixed_rows::<3>(3).into();

    let p_dot = rzyx(eta[3], eta[4], eta[5]) * nu1;
    let a_dot = tzyx(eta[3], eta[4]) * nu2;

    let mut next = *eta;
    for i in 0..3 {
        next[i] += dt * p_dot[i];
        next[i + 3] += dt * a_dot[i];
    }
    Ok(next)
}
