use thiserror::Error;

// ---------------------------------------------------------------------------
// Simulation error taxonomy
// ---------------------------------------------------------------------------

/// Errors raised by the simulation core.
///
/// `Configuration` is raised once at vehicle construction and is always
/// fatal; the core never repairs invalid parameters. `Domain` aborts the
/// current run and carries the step index at which the offending argument
/// was seen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("domain error at step {step}: {reason}")]
    Domain { step: usize, reason: String },
}

impl SimError {
    pub fn config(reason: impl Into<String>) -> Self {
        SimError::Configuration(reason.into())
    }

    /// Domain error with no step context yet (components use step 0;
    /// the driver rewrites it with the loop index).
    pub fn domain(reason: impl Into<String>) -> Self {
        SimError::Domain {
            step: 0,
            reason: reason.into(),
        }
    }

    pub(crate) fn at_step(self, step: usize) -> Self {
        match self {
            SimError::Domain { reason, .. } => SimError::Domain { step, reason },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_carries_step() {
        let err = SimError::domain("dt must be positive").at_step(42);
        match err {
            SimError::Domain { step, .. } => assert_eq!(step, 42),
            _ => panic!("expected Domain"),
        }
    }

    #[test]
    fn configuration_error_unchanged_by_step() {
        let err = SimError::config("length must be positive").at_step(7);
        assert!(matches!(err, SimError::Configuration(_)));
    }
}
