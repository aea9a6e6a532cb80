// Error types for the node boundary (params, transport, terminal)
// The translator itself is total and never errors.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("Failed to read params file {}: {source}", path.display())]
    ParamsIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse params: {0}")]
    ParamsParse(#[from] serde_yaml::Error),

    #[error("Invalid param {name}: {reason}")]
    InvalidParam { name: &'static str, reason: String },

    // zenoh::Error is a boxed trait object, so it can't be a #[source]
    #[error("Zenoh error: {0}")]
    Zenoh(zenoh::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zenoh::Error> for NodeError {
    fn from(e: zenoh::Error) -> Self {
        NodeError::Zenoh(e)
    }
}

pub type Result<T> = std::result::Result<T, NodeError>;
