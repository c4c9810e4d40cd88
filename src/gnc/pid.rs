// ---------------------------------------------------------------------------
// PID regulator (single axis)
// ---------------------------------------------------------------------------

/// PID regulator in error form: `u = -(Kp*e + Kd*e_dot + Ki*int(e))`.
///
/// The rate term takes the measured error rate rather than differencing,
/// so the controller stays clean under saturation. The integral state is
/// the only memory and is clamped for anti-windup.
#[derive(Debug, Clone)]
pub struct Pid {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    integral: f64,
    int_limit: f64,
}

impl Pid {
    pub fn new(kp: f64, ki: f64, kd: f64, int_limit: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            integral: 0.0,
            int_limit,
        }
    }

    /// One controller update. `e` is the tracking error, `e_dot` its
    /// measured rate, `dt` the sample interval (s).
    pub fn update(&mut self, e: f64, e_dot: f64, dt: f64) -> f64 {
        let u = -(self.kp * e + self.kd * e_dot + self.ki * self.integral);
        self.integral = (self.integral + e * dt).clamp(-self.int_limit, self.int_limit);
        u
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
    }
}
