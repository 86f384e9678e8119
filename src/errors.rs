use std::fmt;
use std::error::Error;

/// Represents errors that can occur while configuring or running the force engine.
#[derive(Debug, Clone)]
pub enum MagneticsError {
    /// Indicates an unsupported spatial dimension (only 1, 2 and 3 are valid).
    InvalidDimension(usize),
    /// Indicates an invalid Barnes-Hut approximation threshold (must be finite and positive).
    InvalidTheta,
    /// Indicates an invalid maximum interaction distance (must be positive).
    InvalidMaxDistance,
}

impl fmt::Display for MagneticsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MagneticsError::InvalidDimension(d) => write!(f, "Invalid spatial dimension: {}", d),
            MagneticsError::InvalidTheta => write!(f, "Invalid approximation threshold"),
            MagneticsError::InvalidMaxDistance => write!(f, "Invalid maximum interaction distance"),
        }
    }
}

impl Error for MagneticsError {}
