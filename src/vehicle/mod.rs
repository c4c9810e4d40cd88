pub mod clarke_ship;

use nalgebra::{DVector, Vector6};

use crate::error::SimError;

pub use clarke_ship::{ClarkeShip, ShipConfig};

// ---------------------------------------------------------------------------
// Vehicle interface
// ---------------------------------------------------------------------------

/// Control-law selector for a craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// Closed-loop heading control toward the configured reference.
    HeadingAutopilot,
    /// Open-loop rudder step, for turning-circle style runs.
    StepInput,
}

/// Capability set every simulated craft exposes to the driver.
///
/// The driver depends only on this trait, never on a concrete craft type.
/// `control` may carry memory across calls (integrators, reference model
/// state); `dynamics` is a pure function of its inputs.
pub trait Vehicle {
    /// Number of actuator channels.
    fn dim_u(&self) -> usize;

    /// Body velocity at the start of a run.
    fn initial_nu(&self) -> Vector6<f64>;

    /// Realized actuator state at the start of a run.
    fn initial_u(&self) -> DVector<f64>;

    /// Compute the commanded actuator input for the current state.
    fn control(
        &mut self,
        eta: &Vector6<f64>,
        nu: &Vector6<f64>,
        dt: f64,
    ) -> Result<DVector<f64>, SimError>;

    /// Advance body velocity and realized actuator state by one sample.
    fn dynamics(
        &self,
        eta: &Vector6<f64>,
        nu: &Vector6<f64>,
        u_actual: &DVector<f64>,
        u_control: &DVector<f64>,
        dt: f64,
    ) -> Result<(Vector6<f64>, DVector<f64>), SimError>;

    /// Clear controller memory so a fresh run starts clean.
    fn reset(&mut self);

    /// Human-readable name for reporting.
    fn name(&self) -> &str {
        "unnamed"
    }
}
