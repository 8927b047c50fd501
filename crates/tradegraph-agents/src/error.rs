use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Claude CLI error: {0}")]
    Cli(String),

    #[error("Worker timed out after {0} seconds")]
    Timeout(u64),

    #[error("No worker registered for role: {0}")]
    MissingWorker(String),

    #[error("Worker task panicked: {0}")]
    TaskPanicked(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Step budget of {limit} exhausted before running {node}")]
    StepBudgetExhausted { limit: u32, node: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
