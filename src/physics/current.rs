// ---------------------------------------------------------------------------
// Ambient current
// ---------------------------------------------------------------------------

/// Ambient current resolved in body axes for a craft at yaw angle `psi`.
///
/// `v_c` is the current speed (m/s) and `beta_c` the direction the current
/// flows toward (rad, earth-fixed). Returns the (surge, sway) components of
/// the current velocity seen by the hull.
pub fn current_body(v_c: f64, beta_c: f64, psi: f64) -> (f64, f64) {
    ((beta_c - psi).cos() * v_c, (beta_c - psi).sin() * v_c)
}
