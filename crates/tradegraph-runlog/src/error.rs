use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run has no final decision: subject={0}")]
    Incomplete(String),
}
