/// Convenience result type used across Plotline.
pub type PlotlineResult<T> = Result<T, PlotlineError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum PlotlineError {
    /// Structurally invalid storyline data (empty group, duplicated member).
    #[error("structural error: {0}")]
    Structural(String),

    /// Malformed optimization model (programming error, not recoverable).
    #[error("model error: {0}")]
    Model(String),

    /// Solver returned a non-optimal status or the solver protocol failed.
    #[error("solver error: {0}")]
    Solver(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlotlineError {
    /// Build a [`PlotlineError::Structural`] value.
    pub fn structural(msg: impl Into<String>) -> Self {
        Self::Structural(msg.into())
    }

    /// Build a [`PlotlineError::Model`] value.
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Build a [`PlotlineError::Solver`] value.
    pub fn solver(msg: impl Into<String>) -> Self {
        Self::Solver(msg.into())
    }

    /// Build a [`PlotlineError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
