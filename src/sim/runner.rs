use nalgebra::Vector6;

use crate::error::SimError;
use crate::sim::kinematics::attitude_euler;
use crate::sim::recorder::History;
use crate::vehicle::Vehicle;

// ---------------------------------------------------------------------------
// Fixed-step simulation driver
// ---------------------------------------------------------------------------

/// Degrees of freedom of a rigid body.
pub const DOF: usize = 6;

/// Any eta/nu component beyond this magnitude (or any non-finite value)
/// stops the run and flags divergence.
const DIVERGENCE_LIMIT: f64 = 1e9;

/// Non-fatal marker for a run that blew up numerically: the driver stops
/// integrating but keeps every completed row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Divergence {
    /// Step index at which the state first left the sanity envelope.
    pub step: usize,
    /// The offending component magnitude.
    pub value: f64,
}

/// Result of a completed run: time vector and state-history table, plus a
/// divergence marker if the run stopped early.
#[derive(Debug, Clone)]
pub struct SimOutput {
    pub time: Vec<f64>,
    pub history: History,
    pub divergence: Option<Divergence>,
}

fn check_divergence(eta: &Vector6<f64>, nu: &Vector6<f64>) -> Option<f64> {
    eta.iter()
        .chain(nu.iter())
        .find(|v| !v.is_finite() || v.abs() > DIVERGENCE_LIMIT)
        .map(|v| v.abs())
}

/// Run `n` fixed steps of `sample_time` seconds each, recording `n + 1`
/// samples (the initial state included).
///
/// Per step, in order: the control law reads the current state, the
/// pre-update state is recorded together with the fresh command and the
/// prior realized actuator state, the dynamics advance (nu, u_actual), and
/// the kinematics advance eta. Any component failure aborts the run with
/// the step index attached; a numerical blow-up instead returns the partial
/// table with a [`Divergence`] marker.
pub fn simulate(
    n: usize,
    sample_time: f64,
    vehicle: &mut dyn Vehicle,
    eta_init: Vector6<f64>,
) -> Result<SimOutput, SimError> {
    if n == 0 {
        return Err(SimError::domain("step count must be positive"));
    }
    if sample_time <= 0.0 {
        return Err(SimError::domain(format!(
            "sample time must be positive, got {sample_time}"
        )));
    }
    if !eta_init.iter().all(|v| v.is_finite()) {
        return Err(SimError::domain("initial position/attitude must be finite"));
    }

    vehicle.reset();

    let mut history = History::new(n + 1, vehicle.dim_u());
    let mut time = Vec::with_capacity(n + 1);

    let mut eta = eta_init;
    let mut nu = vehicle.initial_nu();
    let mut u_actual = vehicle.initial_u();
    let mut divergence = None;

    for i in 0..=n {
        if let Some(value) = check_divergence(&eta, &nu) {
            divergence = Some(Divergence { step: i, value });
            break;
        }

        let u_control = vehicle
            .control(&eta, &nu, sample_time)
            .map_err(|e| e.at_step(i))?;

        history.record(i, &eta, &nu, &u_control, &u_actual);
        time.push(i as f64 * sample_time);

        let (nu_next, u_next) = vehicle
            .dynamics(&eta, &nu, &u_actual, &u_control, sample_time)
            .map_err(|e| e.at_step(i))?;
        nu = nu_next;
        u_actual = u_next;
        eta = attitude_euler(&eta, &nu, sample_time).map_err(|e| e.at_step(i))?;
    }

    if divergence.is_some() {
        history.truncate_rows(time.len());
    }

    Ok(SimOutput {
        time,
        history,
        divergence,
    })
}
