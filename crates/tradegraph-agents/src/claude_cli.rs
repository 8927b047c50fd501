use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::AgentError;

/// Longest stderr excerpt carried into an error message.
const STDERR_EXCERPT: usize = 500;

/// Settings for one `claude -p` invocation.
#[derive(Debug, Clone)]
pub struct ClaudeCliConfig {
    pub model: String,
    pub timeout: Duration,
    /// Cap on the agent's own turns within one invocation.
    pub max_turns: u32,
}

impl Default for ClaudeCliConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-5-haiku-latest".to_string(),
            timeout: Duration::from_secs(120),
            max_turns: 10,
        }
    }
}

impl ClaudeCliConfig {
    /// Arguments for a one-shot, plain-text invocation.
    pub fn args(&self, system_prompt: &str, user_prompt: &str) -> Vec<String> {
        vec![
            "-p".to_string(),
            user_prompt.to_string(),
            "--system-prompt".to_string(),
            system_prompt.to_string(),
            "--model".to_string(),
            self.model.clone(),
            "--max-turns".to_string(),
            self.max_turns.to_string(),
            "--output-format".to_string(),
            "text".to_string(),
        ]
    }
}

/// Run the CLI on behalf of `worker` and return its trimmed stdout.
///
/// The child is killed if the timeout fires first.
pub async fn invoke_claude(
    worker: &str,
    system_prompt: &str,
    user_prompt: &str,
    config: &ClaudeCliConfig,
) -> Result<String, AgentError> {
    let started = Instant::now();
    debug!(worker, model = %config.model, max_turns = config.max_turns, "Invoking claude CLI");

    let output = tokio::time::timeout(
        config.timeout,
        Command::new("claude")
            .args(config.args(system_prompt, user_prompt))
            .kill_on_drop(true)
            .output(),
    )
    .await
    .map_err(|_| AgentError::Timeout(config.timeout.as_secs()))?
    .map_err(|e| AgentError::Cli(format!("Failed to spawn claude for {worker}: {e}")))?;

    let elapsed_ms = started.elapsed().as_millis();
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let excerpt = excerpt(stderr.trim(), STDERR_EXCERPT);
        warn!(worker, status = %output.status, elapsed_ms, stderr = %excerpt, "Claude CLI failed");
        return Err(AgentError::Cli(format!(
            "{worker}: claude exited {}: {excerpt}",
            output.status
        )));
    }

    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if text.is_empty() {
        return Err(AgentError::Cli(format!("{worker}: claude returned an empty response")));
    }
    debug!(worker, elapsed_ms, chars = text.len(), "Claude CLI answered");
    Ok(text)
}

/// Check if the `claude` CLI is available on the system.
pub async fn check_cli_available() -> bool {
    match Command::new("claude").arg("--version").output().await {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}

fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
