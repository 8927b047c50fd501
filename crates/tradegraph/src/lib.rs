//! TradeGraph - multi-stage trading decision pipeline
//!
//! Analysts report, researchers debate, a trader plans, and a risk panel
//! debates the plan before a judge issues the final BUY/SELL/HOLD call.
//! Every stage is a Claude CLI worker routed by deterministic supervisors.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use tradegraph::models::GraphConfig;
//! use tradegraph::agents::{TradingGraph, WorkerRegistry};
//! use tradegraph::runlog::RunLogWriter;
//! ```

pub use tradegraph_agents as agents;
pub use tradegraph_models as models;
pub use tradegraph_runlog as runlog;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tradegraph_agents::claude_cli::ClaudeCliConfig;
use tradegraph_agents::{AgentError, CliWorker, Role, TradingGraph, Worker, WorkerRegistry};
use tradegraph_models::{GraphConfig, SharedState, Signal};
use tradegraph_runlog::{RunLogWriter, RunRecord};

/// Load a TOML config. A missing file yields the defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<GraphConfig, anyhow::Error> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "Config not found, using defaults");
        return Ok(GraphConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// CLI settings for one role. Judges and the neutral risk analyst get the
/// deep model.
pub fn cli_config_for(config: &GraphConfig, role: Role) -> ClaudeCliConfig {
    let model = if role.uses_deep_model() {
        &config.agents.deep_model
    } else {
        &config.agents.quick_model
    };
    ClaudeCliConfig {
        model: model.clone(),
        timeout: Duration::from_secs(config.agents.worker_timeout_seconds),
        max_turns: config.run.max_worker_iterations,
    }
}

/// One Claude CLI worker per role.
pub fn build_registry(config: &GraphConfig) -> WorkerRegistry {
    Role::ALL.iter().fold(WorkerRegistry::new(), |registry, role| {
        let worker = CliWorker::new(*role, cli_config_for(config, *role));
        registry.with(*role, Arc::new(worker) as Arc<dyn Worker>)
    })
}

/// Build the CLI-backed graph from configuration.
pub fn build_graph(config: &GraphConfig) -> Result<TradingGraph, anyhow::Error> {
    TradingGraph::new(config, build_registry(config)).context("Failed to build trading graph")
}

/// Result of one run.
#[derive(Debug)]
pub struct RunOutcome {
    pub state: SharedState,
    pub signal: Signal,
    /// Where the run was archived, if logging was on.
    pub log_path: Option<PathBuf>,
}

impl RunOutcome {
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "subject": self.state.subject,
            "date": self.state.as_of_date,
            "signal": self.signal,
            "final_decision": self.state.final_decision,
        })
    }
}

/// Propagate one subject/date and archive the result when `log` is set.
pub async fn run(
    graph: &TradingGraph,
    subject: &str,
    as_of_date: &str,
    log: Option<&RunLogWriter>,
) -> Result<RunOutcome, anyhow::Error> {
    let (state, signal) = graph
        .propagate(subject, as_of_date)
        .await
        .map_err(|e: AgentError| anyhow::anyhow!("Run failed: {e}"))?;

    let log_path = match log {
        Some(writer) => {
            let path = writer
                .write(RunRecord::from_state(&state, signal))
                .context("Failed to write run log")?;
            Some(path)
        }
        None => None,
    };

    info!(subject, as_of_date, %signal, "Decision ready");
    Ok(RunOutcome {
        state,
        signal,
        log_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tradegraph_agents::test_support::scripted_registry;
    use tradegraph_runlog::load;

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, GraphConfig::default());
    }

    #[test]
    fn config_file_overrides_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tradegraph.toml");
        std::fs::write(
            &path,
            "[analysts]\nmode = \"parallel\"\n\n[debate]\nmax_debate_rounds = 3\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.analysts.mode, models::DispatchMode::Parallel);
        assert_eq!(config.debate.max_debate_rounds, 3);
        assert_eq!(config.run.max_steps, 100);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[run]\nmax_steps = \"lots\"\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn cli_registry_covers_every_role() {
        let registry = build_registry(&GraphConfig::default());
        assert_eq!(registry.len(), Role::ALL.len());
        assert!(build_graph(&GraphConfig::default()).is_ok());

        let mut config = GraphConfig::default();
        config.agents.quick_model = "quick".to_string();
        config.agents.deep_model = "deep".to_string();
        config.run.max_worker_iterations = 4;
        for role in Role::ALL {
            let cli = cli_config_for(&config, role);
            let expected = match role {
                Role::ResearchManager | Role::RiskManager | Role::Neutral => "deep",
                _ => "quick",
            };
            assert_eq!(cli.model, expected, "{role} model");
            assert_eq!(cli.max_turns, 4);
        }
    }

    #[tokio::test]
    async fn run_logs_and_summarizes() {
        let dir = TempDir::new().unwrap();
        let writer = RunLogWriter::new(dir.path());
        let (registry, _) = scripted_registry("FINAL TRANSACTION PROPOSAL: SELL");
        let graph = TradingGraph::new(&GraphConfig::default(), registry).unwrap();

        let outcome = run(&graph, "AAPL", "2024-01-02", Some(&writer)).await.unwrap();

        assert_eq!(outcome.signal, Signal::Sell);
        let summary = outcome.summary();
        assert_eq!(summary["subject"], "AAPL");
        assert_eq!(summary["date"], "2024-01-02");
        assert_eq!(summary["signal"], "SELL");

        let path = outcome.log_path.unwrap();
        assert_eq!(load(&path).unwrap()["2024-01-02"].signal, Signal::Sell);
    }

    #[tokio::test]
    async fn run_without_log_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let (registry, _) = scripted_registry("HOLD");
        let graph = TradingGraph::new(&GraphConfig::default(), registry).unwrap();

        let outcome = run(&graph, "AAPL", "2024-01-02", None).await.unwrap();
        assert!(outcome.log_path.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
