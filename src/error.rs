use thiserror::Error;

/// Top-level error type for the granulis packing engine.
#[derive(Debug, Error)]
pub enum GranulisError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Packing(#[from] PackingError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Malformed aggregate or container descriptions, rejected at setup.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("aggregate {id}: {reason}")]
    InvalidAggregate { id: String, reason: String },

    #[error("duplicate aggregate id: {0}")]
    DuplicateAggregate(String),

    #[error("aggregate population is empty")]
    EmptyPopulation,

    #[error("invalid container: {0}")]
    InvalidContainer(String),

    #[error("invalid notch: {0}")]
    InvalidNotch(String),

    #[error("draw count for aggregate {0} was already assigned")]
    DrawCountAssigned(String),

    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Errors related to hull construction and volume integration.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("too few points: need at least 4, got {0}")]
    TooFewPoints(usize),

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors raised while driving a packing run.
#[derive(Debug, Error)]
pub enum PackingError {
    #[error("physics world rejected request: {0}")]
    World(String),
}

/// Errors related to loading a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Convenience type alias for results using [`GranulisError`].
pub type Result<T> = std::result::Result<T, GranulisError>;
