// ---------------------------------------------------------------------------
// Third-order reference model
// ---------------------------------------------------------------------------

/// Shapes a raw heading setpoint into smooth desired position, velocity
/// and acceleration so the craft is never asked for an instantaneous
/// heading jump. Poles at `(s + wn)(s^2 + 2*zeta*wn*s + wn^2)`; the
/// desired rate saturates at `r_max`.
#[derive(Debug, Clone)]
pub struct RefModel {
    wn: f64,
    zeta: f64,
    r_max: f64,
    x_d: f64, // desired position (rad)
    v_d: f64, // desired velocity (rad/s)
    a_d: f64, // desired acceleration (rad/s^2)
}

impl RefModel {
    pub fn new(wn: f64, zeta: f64, r_max: f64) -> Self {
        Self {
            wn,
            zeta,
            r_max,
            x_d: 0.0,
            v_d: 0.0,
            a_d: 0.0,
        }
    }

    /// Advance the model one sample toward `x_ref`.
    pub fn step(&mut self, x_ref: f64, dt: f64) {
        let j_d = self.wn.powi(3) * (x_ref - self.x_d)
            - (2.0 * self.zeta + 1.0) * self.wn.powi(2) * self.v_d
            - (2.0 * self.zeta + 1.0) * self.wn * self.a_d;

        self.x_d += dt * self.v_d;
        self.v_d += dt * self.a_d;
        self.a_d += dt * j_d;

        if self.v_d.abs() > self.r_max {
            self.v_d = self.v_d.signum() * self.r_max;
        }
    }

    pub fn position(&self) -> f64 {
        self.x_d
    }

    pub fn velocity(&self) -> f64 {
        self.v_d
    }

    pub fn reset(&mut self) {
        self.x_d = 0.0;
        self.v_d = 0.0;
        self.a_d = 0.0;
    }
}
