use nalgebra::Matrix3;

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const RHO_SEAWATER: f64 = 1025.0; // kg/m^3

// ---------------------------------------------------------------------------
// Clarke (1983) linear maneuvering model
// ---------------------------------------------------------------------------

/// Linear 3-DOF (surge, sway, yaw) maneuvering matrices built from the
/// Clarke et al. (1983) regression formulas for the hydrodynamic
/// derivatives of a single-screw hull.
///
/// The mass matrix (rigid body + added mass) is speed-independent and is
/// assembled once. The damping matrix scales linearly with the relative
/// speed in sway/yaw, while the surge term is a constant derived from the
/// configured surge time constant.
#[derive(Debug, Clone)]
pub struct ClarkeModel {
    mass: Matrix3<f64>,
    n_uv: Matrix3<f64>, // sway/yaw damping block per unit relative speed
    d_surge: f64,       // linear surge damping, (m - Xudot) / T_surge
    displacement: f64,  // kg
}

impl ClarkeModel {
    /// `l` hull length, `b` beam, `t` draft (m), `cb` block coefficient,
    /// `r66` yaw radius of gyration (m), `xg` CG x-coordinate (m),
    /// `t_surge` surge time constant (s).
    pub fn new(l: f64, b: f64, t: f64, cb: f64, r66: f64, xg: f64, t_surge: f64) -> Self {
        let rho = RHO_SEAWATER;
        let volume = cb * l * b * t;
        let m = rho * volume;
        let iz = m * r66 * r66 + m * xg * xg;

        // Added mass in surge: 10% of the displacement
        let xudot = -0.1 * m;

        // Nondimensional sway/yaw derivatives, Clarke et al. (1983)
        let s = std::f64::consts::PI * (t / l).powi(2);
        let yvdot = -s * (1.0 + 0.16 * cb * b / t - 5.1 * (b / l).powi(2));
        let yrdot = -s * (0.67 * b / l - 0.0033 * (b / t).powi(2));
        let nvdot = -s * (1.1 * b / l - 0.041 * b / t);
        let nrdot = -s * (1.0 / 12.0 + 0.017 * cb * b / t - 0.33 * b / l);
        let yv = -s * (1.0 + 0.40 * cb * b / t);
        let yr = -s * (-0.5 + 2.2 * b / l - 0.080 * b / t);
        let nv = -s * (0.5 + 2.4 * t / l);
        let nr = -s * (0.25 + 0.039 * b / t - 0.56 * b / l);

        // Dimensional factors of the prime system
        let l2 = 0.5 * rho * l * l;
        let l3 = l2 * l;
        let l4 = l3 * l;
        let l5 = l4 * l;

        let mass = Matrix3::new(
            m - xudot,
            0.0,
            0.0,
            0.0,
            m - yvdot * l3,
            m * xg - yrdot * l4,
            0.0,
            m * xg - nvdot * l4,
            iz - nrdot * l5,
        );

        // N(U) = U * n_uv for sway and yaw; the dimensional factors come
        // out one power of L lower than the mass terms
        let n_uv = Matrix3::new(
            0.0,
            0.0,
            0.0,
            0.0,
            -yv * l2,
            m - yr * l3,
            0.0,
            -nv * l3,
            m * xg - nr * l4,
        );

        let d_surge = (m - xudot) / t_surge;

        ClarkeModel {
            mass,
            n_uv,
            d_surge,
            displacement: m,
        }
    }

    /// Mass matrix including added mass (surge, sway, yaw).
    pub fn mass(&self) -> &Matrix3<f64> {
        &self.mass
    }

    /// Damping matrix at relative speed `u` (m/s).
    pub fn damping(&self, u: f64) -> Matrix3<f64> {
        let mut n = self.n_uv * u;
        n[(0, 0)] = self.d_surge;
        n
    }

    /// Displacement mass (kg).
    pub fn displacement(&self) -> f64 {
        self.displacement
    }
}
