use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReactorError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Snapshot does not fit the formed structure: {0}")]
    SnapshotMismatch(String),

    #[error("Unknown substance '{0}'")]
    UnknownSubstance(String),

    #[error("Reactor is not formed")]
    NotFormed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ReactorResult<T> = Result<T, ReactorError>;

/// Operator commands the reactor refused. Returned to the caller, never raised inside a tick.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Reactor is already active")]
    AlreadyActive,

    #[error("Scram requires the reactor to be active")]
    NotActive,

    #[error("Reactor is force disabled until damage and temperature are safe")]
    ForceDisabled,

    #[error("Burn rate '{requested:.2}' is out of range, must be between 0 and {max:.2}")]
    BurnRateOutOfRange { requested: f64, max: f64 },

    #[error("Burn rate must be a finite number")]
    InvalidBurnRate,
}
