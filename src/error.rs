//! Error taxonomy for the dynamics solvers.
//!
//! All three outcomes are deterministic consequences of the inputs. None of
//! them is retried internally; the caller decides what to do next.

use thiserror::Error;

/// Result alias used by every fallible numerical operation in the crate
pub type DynamicsResult<T> = Result<T, DynamicsError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DynamicsError {
    /// A parameter lies outside its valid range (e.g. braking fraction > 0.56
    /// under the default front-only policy)
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The rear wheel would skid, or the net resistance turned negative
    #[error("infeasible at {velocity_m_per_s:.3} m/s: {reason}")]
    Infeasible {
        velocity_m_per_s: f64,
        reason: String,
    },

    /// An iterative loop hit its cap without meeting its tolerance
    #[error("diverged after {iterations} iterations (last value {last_value:.4})")]
    Diverged { iterations: usize, last_value: f64 },
}

impl DynamicsError {
    pub fn invalid(message: impl Into<String>) -> Self {
        DynamicsError::InvalidParameter(message.into())
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, DynamicsError::Infeasible { .. })
    }

    pub fn is_diverged(&self) -> bool {
        matches!(self, DynamicsError::Diverged { .. })
    }
}
