use nalgebra::{DVector, Matrix3, Vector3, Vector6};

use crate::error::SimError;
use crate::gnc::HeadingAutopilot;
use crate::physics::clarke::{ClarkeModel, RHO_SEAWATER};
use crate::physics::current::current_body;
use crate::vehicle::{ControlMode, Vehicle};

// ---------------------------------------------------------------------------
// Ship configuration
// ---------------------------------------------------------------------------

/// Immutable construction parameters for a [`ClarkeShip`].
///
/// All values are validated by [`ClarkeShip::new`]; invalid parameters are
/// a [`SimError::Configuration`] and the ship is never built.
#[derive(Debug, Clone)]
pub struct ShipConfig {
    pub control_mode: ControlMode,
    /// Commanded heading (deg).
    pub psi_ref_deg: f64,
    /// Hull length (m).
    pub length: f64,
    /// Beam (m).
    pub beam: f64,
    /// Draft (m).
    pub draft: f64,
    /// Block coefficient.
    pub cb: f64,
    /// Ambient current speed (m/s).
    pub current_speed: f64,
    /// Direction the current flows toward (deg, earth-fixed).
    pub current_dir_deg: f64,
    /// Enables the ambient-current terms in the dynamics.
    pub current_enabled: bool,
    /// Service speed the propulsion is sized for (m/s).
    pub service_speed: f64,
    /// Rudder position limit (deg).
    pub delta_max_deg: f64,
    /// Rudder rate limit (deg/s).
    pub delta_rate_max_deg: f64,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            control_mode: ControlMode::HeadingAutopilot,
            psi_ref_deg: 0.0,
            length: 70.0,
            beam: 8.0,
            draft: 6.0,
            cb: 0.7,
            current_speed: 0.0,
            current_dir_deg: 0.0,
            current_enabled: false,
            service_speed: 8.0,
            delta_max_deg: 30.0,
            delta_rate_max_deg: 5.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Clarke-model surface craft
// ---------------------------------------------------------------------------

const T_DEDUCTION: f64 = 0.1; // thrust deduction number
const RUDDER_LAMBDA: f64 = 0.7; // rudder aspect ratio
const T_DELTA: f64 = 1.0; // steering gear time constant (s)
const ZETA: f64 = 1.0; // closed-loop relative damping

/// Surface craft with a linear Clarke (1983) maneuvering model, a
/// quadratic rudder force model (Fossen 2021, ch. 9.5.1) and a
/// first-order steering gear with rate and position limits.
pub struct ClarkeShip {
    cfg: ShipConfig,
    model: ClarkeModel,
    minv: Matrix3<f64>,
    tau_x: f64, // propeller thrust (N), sized for the service speed

    // Rudder force coefficients, multiplied by U_r^2 at runtime
    xdd_coef: f64, // surge drag (negative)
    yd_coef: f64,  // sway force (negative)
    nd_coef: f64,  // yaw moment (positive)

    delta_max: f64,  // rad
    ddelta_max: f64, // rad/s
    v_c: f64,        // current speed (m/s), zero when disabled
    beta_c: f64,     // current direction (rad)

    autopilot: HeadingAutopilot,
    step_clock: f64,
}

impl ClarkeShip {
    pub fn new(cfg: ShipConfig) -> Result<Self, SimError> {
        if !(cfg.length > 0.0) {
            return Err(SimError::config(format!(
                "hull length must be positive, got {}",
                cfg.length
            )));
        }
        if !(cfg.beam > 0.0) {
            return Err(SimError::config(format!("beam must be positive, got {}", cfg.beam)));
        }
        if !(cfg.draft > 0.0) {
            return Err(SimError::config(format!("draft must be positive, got {}", cfg.draft)));
        }
        if !(cfg.cb > 0.0 && cfg.cb <= 1.0) {
            return Err(SimError::config(format!(
                "block coefficient must be in (0, 1], got {}",
                cfg.cb
            )));
        }
        if !(cfg.service_speed > 0.0) {
            return Err(SimError::config(format!(
                "service speed must be positive, got {}",
                cfg.service_speed
            )));
        }
        if !(cfg.current_speed >= 0.0) {
            return Err(SimError::config(format!(
                "current speed must be non-negative, got {}",
                cfg.current_speed
            )));
        }
        if !cfg.psi_ref_deg.is_finite() || !cfg.current_dir_deg.is_finite() {
            return Err(SimError::config("angle parameters must be finite"));
        }
        if !(cfg.delta_max_deg > 0.0) || !(cfg.delta_rate_max_deg > 0.0) {
            return Err(SimError::config("rudder limits must be positive"));
        }

        let l = cfg.length;
        let model = ClarkeModel::new(l, cfg.beam, cfg.draft, cfg.cb, 0.25 * l, 0.0, l);
        let minv = model
            .mass()
            .try_inverse()
            .ok_or_else(|| SimError::config("singular mass matrix"))?;

        // Rudder geometry and force coefficients (Fossen 2021, ch. 9.5.1)
        let b_r = 0.7 * cfg.draft; // rudder height
        let a_r = b_r * b_r / RUDDER_LAMBDA; // rudder area
        let c_n = 6.13 * RUDDER_LAMBDA / (RUDDER_LAMBDA + 2.25);
        let t_r = 1.0 - 0.28 * cfg.cb - 0.55; // flow straightening
        let a_h = 0.4; // hull interaction
        let x_r = -0.45 * l;
        let x_h = -1.0 * l;

        let xdd_coef = -0.5 * (1.0 - t_r) * RHO_SEAWATER * a_r * c_n;
        let yd_coef = -0.25 * (1.0 + a_h) * RHO_SEAWATER * a_r * c_n;
        let nd_coef = -0.25 * (x_r + a_h * x_h) * RHO_SEAWATER * a_r * c_n;

        // Thrust that holds the service speed against linear surge damping
        let u_d = cfg.service_speed;
        let d_surge = model.damping(0.0)[(0, 0)];
        let tau_x = d_surge * u_d / (1.0 - T_DEDUCTION);

        // Heading-loop gains by pole placement at service speed. The
        // bandwidth sits just above the hull's own yaw pole so the rate
        // gain stays non-negative.
        let m33 = model.mass()[(2, 2)];
        let n33 = model.damping(u_d)[(2, 2)];
        let g = 2.0 * nd_coef * u_d * u_d; // rudder moment per rad
        let wn = 1.2 * n33 / (2.0 * ZETA * m33);
        let r_max = u_d / (10.0 * l); // turn radius of ten ship lengths

        let delta_max = cfg.delta_max_deg.to_radians();
        let autopilot = HeadingAutopilot::pole_placement(
            m33,
            n33,
            g,
            wn,
            ZETA,
            cfg.psi_ref_deg.to_radians(),
            r_max,
            delta_max,
        );

        let v_c = if cfg.current_enabled { cfg.current_speed } else { 0.0 };
        let beta_c = cfg.current_dir_deg.to_radians();
        let ddelta_max = cfg.delta_rate_max_deg.to_radians();

        Ok(Self {
            cfg,
            model,
            minv,
            tau_x,
            xdd_coef,
            yd_coef,
            nd_coef,
            delta_max,
            ddelta_max,
            v_c,
            beta_c,
            autopilot,
            step_clock: 0.0,
        })
    }

    pub fn config(&self) -> &ShipConfig {
        &self.cfg
    }

    /// Displacement mass (kg).
    pub fn displacement(&self) -> f64 {
        self.model.displacement()
    }

    /// Propeller thrust (N).
    pub fn thrust(&self) -> f64 {
        self.tau_x
    }
}

impl Vehicle for ClarkeShip {
    fn dim_u(&self) -> usize {
        1
    }

    fn initial_nu(&self) -> Vector6<f64> {
        Vector6::zeros()
    }

    fn initial_u(&self) -> DVector<f64> {
        DVector::zeros(1)
    }

    fn control(
        &mut self,
        eta: &Vector6<f64>,
        nu: &Vector6<f64>,
        dt: f64,
    ) -> Result<DVector<f64>, SimError> {
        if dt <= 0.0 {
            return Err(SimError::domain(format!("sample time must be positive, got {dt}")));
        }
        let delta_c = match self.cfg.control_mode {
            ControlMode::HeadingAutopilot => self.autopilot.control(eta, nu, dt)?,
            ControlMode::StepInput => {
                // Rudder step: hard over for the first 400 s, then released
                self.step_clock += dt;
                let delta = if self.step_clock <= 400.0 {
                    10.0_f64.to_radians()
                } else {
                    0.0
                };
                delta.clamp(-self.delta_max, self.delta_max)
            }
        };
        Ok(DVector::from_element(1, delta_c))
    }

    fn dynamics(
        &self,
        eta: &Vector6<f64>,
        nu: &Vector6<f64>,
        u_actual: &DVector<f64>,
        u_control: &DVector<f64>,
        dt: f64,
    ) -> Result<(Vector6<f64>, DVector<f64>), SimError> {
        if dt <= 0.0 {
            return Err(SimError::domain(format!("sample time must be positive, got {dt}")));
        }
        debug_assert_eq!(u_actual.len(), 1);
        debug_assert_eq!(u_control.len(), 1);
        let finite = eta.iter().all(|v| v.is_finite())
            && nu.iter().all(|v| v.is_finite())
            && u_actual[0].is_finite()
            && u_control[0].is_finite();
        if !finite {
            return Err(SimError::domain("non-finite state or actuator input"));
        }

        let psi = eta[5];
        let delta = u_actual[0];
        let delta_c = u_control[0];

        // Velocity relative to the water
        let (u_c, v_c) = if self.cfg.current_enabled {
            current_body(self.v_c, self.beta_c, psi)
        } else {
            (0.0, 0.0)
        };
        let nu_r = Vector3::new(nu[0] - u_c, nu[1] - v_c, nu[5]);
        let u_r = nu_r.x.hypot(nu_r.y);

        // Rudder forces, quadratic in relative speed. delta_r is the
        // physical rudder angle; ship sign convention flips it.
        let delta_r = -delta;
        let uu = u_r * u_r;
        let x_dd = self.xdd_coef * uu;
        let y_d = self.yd_coef * uu;
        let n_d = self.nd_coef * uu;

        let tau = Vector3::new(
            (1.0 - T_DEDUCTION) * self.tau_x + x_dd * delta_r.sin().powi(2),
            -y_d * (2.0 * delta_r).sin(),
            -n_d * (2.0 * delta_r).sin(),
        );

        // nu' = nu + dt * M^-1 (tau - N(U_r) nu_r), lifted back to 6 DOF
        let n_mtx = self.model.damping(u_r);
        let nu3_dot = self.minv * (tau - n_mtx * nu_r);
        let mut nu_next = *nu;
        nu_next[0] += dt * nu3_dot.x;
        nu_next[1] += dt * nu3_dot.y;
        nu_next[5] += dt * nu3_dot.z;

        // Steering gear: first-order response, rate-limited, then the
        // position limit so every recorded sample honors both bounds
        let mut delta_dot = (delta_c - delta) / T_DELTA;
        delta_dot = delta_dot.clamp(-self.ddelta_max, self.ddelta_max);
        let delta_next = (delta + dt * delta_dot).clamp(-self.delta_max, self.delta_max);

        Ok((nu_next, DVector::from_element(1, delta_next)))
    }

    fn reset(&mut self) {
        self.autopilot.reset();
        self.step_clock = 0.0;
    }

    fn name(&self) -> &str {
        "ClarkeShip"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ship() -> ClarkeShip {
        ClarkeShip::new(ShipConfig::default()).unwrap()
    }

    fn at_speed(u: f64) -> Vector6<f64> {
        let mut nu = Vector6::zeros();
        nu[0] = u;
        nu
    }

    #[test]
    fn rejects_nonpositive_length() {
        let cfg = ShipConfig {
            length: 0.0,
            ..ShipConfig::default()
        };
        assert!(matches!(
            ClarkeShip::new(cfg),
            Err(SimError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_bad_block_coefficient() {
        let cfg = ShipConfig {
            cb: -0.1,
            ..ShipConfig::default()
        };
        assert!(matches!(
            ClarkeShip::new(cfg),
            Err(SimError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_nonfinite_heading() {
        let cfg = ShipConfig {
            psi_ref_deg: f64::NAN,
            ..ShipConfig::default()
        };
        assert!(matches!(
            ClarkeShip::new(cfg),
            Err(SimError::Configuration(_))
        ));
    }

    #[test]
    fn dynamics_rejects_nonpositive_dt() {
        let s = ship();
        let u = DVector::zeros(1);
        let err = s.dynamics(&Vector6::zeros(), &Vector6::zeros(), &u, &u, -0.1);
        assert!(matches!(err, Err(SimError::Domain { .. })));
    }

    #[test]
    fn dynamics_rejects_nonfinite_state() {
        let s = ship();
        let u = DVector::zeros(1);
        let mut nu = Vector6::zeros();
        nu[1] = f64::NAN;
        let err = s.dynamics(&Vector6::zeros(), &nu, &u, &u, 0.1);
        assert!(matches!(err, Err(SimError::Domain { .. })));
    }

    #[test]
    fn control_rejects_nonpositive_dt() {
        let mut s = ship();
        let err = s.control(&Vector6::zeros(), &Vector6::zeros(), 0.0);
        assert!(matches!(err, Err(SimError::Domain { .. })));
    }

    #[test]
    fn thrust_holds_service_speed() {
        let s = ship();
        let u_d = s.config().service_speed;
        let nu = at_speed(u_d);
        let zero = DVector::zeros(1);
        let (nu_next, _) = s.dynamics(&Vector6::zeros(), &nu, &zero, &zero, 0.1).unwrap();
        assert_relative_eq!(nu_next[0], u_d, epsilon = 1e-9);
    }

    #[test]
    fn ship_accelerates_from_rest() {
        let s = ship();
        let zero = DVector::zeros(1);
        let (nu_next, _) = s
            .dynamics(&Vector6::zeros(), &Vector6::zeros(), &zero, &zero, 0.1)
            .unwrap();
        assert!(nu_next[0] > 0.0, "thrust should accelerate the hull");
    }

    #[test]
    fn rudder_turns_the_bow() {
        let s = ship();
        let nu = at_speed(8.0);
        let delta = DVector::from_element(1, 0.1);
        let (nu_next, _) = s.dynamics(&Vector6::zeros(), &nu, &delta, &delta, 0.1).unwrap();
        assert!(
            nu_next[5] > 0.0,
            "positive rudder should yield positive yaw rate, got {}",
            nu_next[5]
        );
    }

    #[test]
    fn heave_roll_pitch_stay_zero() {
        let s = ship();
        let nu = at_speed(8.0);
        let delta = DVector::from_element(1, 0.2);
        let (nu_next, _) = s.dynamics(&Vector6::zeros(), &nu, &delta, &delta, 0.1).unwrap();
        for i in [2usize, 3, 4] {
            assert_relative_eq!(nu_next[i], 0.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn rudder_rate_and_position_limits_hold() {
        let s = ship();
        let nu = at_speed(8.0);
        let rate = s.config().delta_rate_max_deg.to_radians();
        let pos = s.config().delta_max_deg.to_radians();
        let dt = 0.1;
        // Command hard over, far beyond the position limit
        let cmd = DVector::from_element(1, 10.0);
        let mut u_actual = DVector::zeros(1);
        for _ in 0..1000 {
            let (_, u_next) = s.dynamics(&Vector6::zeros(), &nu, &u_actual, &cmd, dt).unwrap();
            assert!((u_next[0] - u_actual[0]).abs() <= rate * dt + 1e-12);
            assert!(u_next[0].abs() <= pos + 1e-12);
            u_actual = u_next;
        }
        // Saturated at the position limit, not the raw command
        assert_relative_eq!(u_actual[0], pos, max_relative = 1e-9);
    }

    #[test]
    fn current_flag_gates_current_terms() {
        let with = ClarkeShip::new(ShipConfig {
            current_speed: 2.0,
            current_enabled: true,
            ..ShipConfig::default()
        })
        .unwrap();
        let without = ClarkeShip::new(ShipConfig {
            current_speed: 2.0,
            current_enabled: false,
            ..ShipConfig::default()
        })
        .unwrap();
        let nu = at_speed(8.0);
        let zero = DVector::zeros(1);
        let (nu_with, _) = with.dynamics(&Vector6::zeros(), &nu, &zero, &zero, 0.1).unwrap();
        let (nu_without, _) = without.dynamics(&Vector6::zeros(), &nu, &zero, &zero, 0.1).unwrap();
        assert!(
            (nu_with[0] - nu_without[0]).abs() > 1e-9,
            "enabled current must change the surge balance"
        );
    }

    #[test]
    fn step_input_mode_commands_step() {
        let mut s = ClarkeShip::new(ShipConfig {
            control_mode: ControlMode::StepInput,
            ..ShipConfig::default()
        })
        .unwrap();
        let cmd = s.control(&Vector6::zeros(), &Vector6::zeros(), 0.1).unwrap();
        assert_relative_eq!(cmd[0], 10.0_f64.to_radians(), max_relative = 1e-12);
    }

    #[test]
    fn reset_clears_step_clock() {
        let mut s = ClarkeShip::new(ShipConfig {
            control_mode: ControlMode::StepInput,
            ..ShipConfig::default()
        })
        .unwrap();
        for _ in 0..5000 {
            s.control(&Vector6::zeros(), &Vector6::zeros(), 0.1).unwrap();
        }
        s.reset();
        let cmd = s.control(&Vector6::zeros(), &Vector6::zeros(), 0.1).unwrap();
        assert_relative_eq!(cmd[0], 10.0_f64.to_radians(), max_relative = 1e-12);
    }
}
