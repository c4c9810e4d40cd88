use nalgebra::Vector6;

use crate::error::SimError;
use crate::gnc::pid::Pid;
use crate::gnc::refmodel::RefModel;
use crate::gnc::ssa;

// ---------------------------------------------------------------------------
// Heading autopilot: reference model + pole-placement PID
// ---------------------------------------------------------------------------

/// Closed-loop heading controller.
///
/// The raw heading setpoint feeds a third-order reference model; the PID
/// regulates the wrapped error between current yaw and the smoothed
/// desired heading. Output is a rudder command clipped to the actuator's
/// position limit. All controller memory lives here and is cleared by
/// [`HeadingAutopilot::reset`].
#[derive(Debug, Clone)]
pub struct HeadingAutopilot {
    pid: Pid,
    refmodel: RefModel,
    psi_ref: f64,   // commanded heading (rad)
    delta_max: f64, // rudder position limit (rad)
}

impl HeadingAutopilot {
    /// Gains from pole placement on the linearized rudder-to-yaw loop:
    /// `m` is the yaw inertia (incl. added mass), `d` the yaw damping and
    /// `g` the rudder moment gain, all evaluated at service speed.
    pub fn pole_placement(
        m: f64,
        d: f64,
        g: f64,
        wn: f64,
        zeta: f64,
        psi_ref: f64,
        r_max: f64,
        delta_max: f64,
    ) -> Self {
        let kp = m * wn * wn / g;
        let kd = (2.0 * zeta * wn * m - d) / g;
        let ki = kp * wn / 10.0;
        let int_limit = if ki > 0.0 {
            delta_max / ki
        } else {
            f64::INFINITY
        };
        Self {
            pid: Pid::new(kp, ki, kd, int_limit),
            refmodel: RefModel::new(wn / 5.0, zeta, r_max),
            psi_ref,
            delta_max,
        }
    }

    /// Compute the rudder command from current attitude and velocity.
    pub fn control(&mut self, eta: &Vector6<f64>, nu: &Vector6<f64>, dt: f64) -> Result<f64, SimError> {
        if dt <= 0.0 {
            return Err(SimError::domain(format!("sample time must be positive, got {dt}")));
        }

        let psi = eta[5];
        let r = nu[5];

        let e_psi = ssa(psi - self.refmodel.position());
        let e_r = r - self.refmodel.velocity();

        let delta = self.pid.update(e_psi, e_r, dt);
        self.refmodel.step(self.psi_ref, dt);

        Ok(delta.clamp(-self.delta_max, self.delta_max))
    }

    /// Clear all controller memory. Call between runs; without this,
    /// successive runs in the same process leak integrator state.
    pub fn reset(&mut self) {
        self.pid.reset();
        self.refmodel.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn autopilot(psi_ref: f64) -> HeadingAutopilot {
        HeadingAutopilot::pole_placement(
            1.0e9,
            5.0e8,
            8.0e8,
            0.5,
            1.0,
            psi_ref,
            0.04,
            30.0_f64.to_radians(),
        )
    }

    #[test]
    fn zero_error_zero_command() {
        let mut ap = autopilot(0.0);
        let delta = ap
            .control(&Vector6::zeros(), &Vector6::zeros(), 0.1)
            .unwrap();
        assert_relative_eq!(delta, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn positive_error_commands_negative_rudder() {
        // Yaw ahead of the desired heading: the rudder must pull it back.
        let mut ap = autopilot(0.0);
        let mut eta = Vector6::zeros();
        eta[5] = 0.2;
        let delta = ap.control(&eta, &Vector6::zeros(), 0.1).unwrap();
        assert!(delta < 0.0, "expected negative rudder, got {delta}");
    }

    #[test]
    fn command_clips_to_position_limit() {
        let mut ap = autopilot(0.0);
        let mut eta = Vector6::zeros();
        eta[5] = 3.0; // huge error
        let delta = ap.control(&eta, &Vector6::zeros(), 0.1).unwrap();
        assert!(delta.abs() <= 30.0_f64.to_radians() + 1e-12);
    }

    #[test]
    fn error_wraps_across_180() {
        // Yaw -170 deg, smoothed setpoint still ~0: wrapped error keeps the
        // command finite and on the short side of the circle.
        let mut ap_a = autopilot(0.0);
        let mut ap_b = autopilot(0.0);
        let mut eta_a = Vector6::zeros();
        let mut eta_b = Vector6::zeros();
        eta_a[5] = 170.0_f64.to_radians();
        eta_b[5] = 170.0_f64.to_radians() - std::f64::consts::TAU;
        let da = ap_a.control(&eta_a, &Vector6::zeros(), 0.1).unwrap();
        let db = ap_b.control(&eta_b, &Vector6::zeros(), 0.1).unwrap();
        assert_relative_eq!(da, db, max_relative = 1e-12);
    }

    #[test]
    fn non_positive_dt_is_domain_error() {
        let mut ap = autopilot(0.0);
        let err = ap.control(&Vector6::zeros(), &Vector6::zeros(), 0.0);
        assert!(matches!(err, Err(SimError::Domain { .. })));
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut ap = autopilot(-1.0);
        let mut eta = Vector6::zeros();
        eta[5] = 0.3;
        for _ in 0..50 {
            ap.control(&eta, &Vector6::zeros(), 0.1).unwrap();
        }
        ap.reset();
        let mut fresh = autopilot(-1.0);
        let a = ap.control(&eta, &Vector6::zeros(), 0.1).unwrap();
        let b = fresh.control(&eta, &Vector6::zeros(), 0.1).unwrap();
        assert_relative_eq!(a, b, max_relative = 1e-12);
    }
}
