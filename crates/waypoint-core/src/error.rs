use thiserror::Error;

#[derive(Debug, Error)]
pub enum WaypointError {
    /// Bootstrap-time failure. The only variant that should stop a session
    /// from starting; everything else is contained per call.
    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Handler error: {0}")]
    Handler(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, WaypointError>;
