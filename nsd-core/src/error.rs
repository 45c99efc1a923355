/// Error types for the snow drift model
use thiserror::Error;

/// Main error type for estimator operations
#[derive(Error, Debug, PartialEq)]
pub enum SnowDriftError {
    /// Wind speed and wind direction series are not aligned hour by hour
    #[error("Misaligned input: {speeds} wind speeds but {directions} wind directions")]
    MisalignedInput { speeds: usize, directions: usize },

    /// A user-facing parameter was not recognised
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A season label could not be parsed
    #[error("Invalid season label: {0}")]
    InvalidSeason(String),
}

/// Type alias for Results using SnowDriftError
pub type Result<T> = std::result::Result<T, SnowDriftError>;
