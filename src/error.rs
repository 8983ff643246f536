//! Typed error taxonomy layered over the boolean step/interpolate contract.
//!
//! The low-level `step`/`interpolate` primitives stay boolean (see
//! [`crate::method::IntegratorMethod`]) so methods stay cheap to call in a
//! tight loop; the driver (`crate::driver`) and configuration loader
//! (`crate::config`) are what turn a `false` or a bad setting into one of
//! these variants.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntegrationError {
    #[error("right-hand side rejected the point at step {step}")]
    RhsFailed { step: usize },

    #[error("Everhart correction failed to converge at step {step} after {iterations} iterations")]
    NotConverged { step: usize, iterations: usize },

    #[error("state vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("configuration error: {0}")]
    Configuration(String),
}
