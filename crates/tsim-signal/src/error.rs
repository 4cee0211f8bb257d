//! Signal-controller error type.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SignalError {
    #[error("duty cycle must be in (0, 1], got {0}")]
    InvalidDutyCycle(f64),

    #[error("period must be finite and > 0, got {0}")]
    InvalidPeriod(f64),
}

pub type SignalResult<T> = Result<T, SignalError>;
