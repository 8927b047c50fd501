//! Integration tests that invoke the real Claude CLI.
//!
//! These tests are `#[ignore]` by default; they need the `claude` CLI on PATH
//! and valid credentials. Run explicitly with:
//! ```bash
//! cargo test -p tradegraph-agents --test cli_integration -- --ignored
//! ```

use std::time::Duration;

use tradegraph_agents::claude_cli::{check_cli_available, invoke_claude, ClaudeCliConfig};
use tradegraph_agents::{CliWorker, Role, Worker};
use tradegraph_models::SharedState;

#[tokio::test]
#[ignore]
async fn cli_is_available() {
    assert!(
        check_cli_available().await,
        "claude CLI not found on PATH"
    );
}

#[tokio::test]
#[ignore]
async fn cli_reports_errors_for_invalid_model() {
    if !check_cli_available().await {
        eprintln!("Skipping: claude CLI not available");
        return;
    }

    let config = ClaudeCliConfig {
        model: "nonexistent-model-12345".to_string(),
        timeout: Duration::from_secs(15),
        max_turns: 1,
    };

    let result = invoke_claude("test", "You are a test.", "hello", &config).await;
    assert!(result.is_err(), "Expected error for invalid model, got: {result:?}");
}

/// A real trader turn should come back as a non-empty plan ending in a
/// transaction proposal.
#[tokio::test]
#[ignore]
async fn cli_worker_fills_trader_plan() {
    if !check_cli_available().await {
        eprintln!("Skipping: claude CLI not available");
        return;
    }

    let worker = CliWorker::new(
        Role::Trader,
        ClaudeCliConfig {
            timeout: Duration::from_secs(90),
            max_turns: 2,
            ..ClaudeCliConfig::default()
        },
    );
    let mut state = SharedState::new("AAPL", "2024-01-02");
    state.investment_plan = "Accumulate on weakness; services growth offsets hardware.".to_string();

    let update = worker.invoke(&state).await.expect("Claude CLI invocation failed");
    state.apply(update);

    assert!(!state.trader_plan.is_empty());
    assert!(state.trader_plan.to_uppercase().contains("FINAL TRANSACTION PROPOSAL"));
}
