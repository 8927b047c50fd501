use serde::{Deserialize, Serialize};

use crate::state::AnalystKind;

/// Top-level configuration for a trading graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphConfig {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub analysts: AnalystsConfig,
    #[serde(default)]
    pub debate: DebateConfig,
    #[serde(default)]
    pub agents: AgentsConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Safety bounds for a single run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Routing decisions plus worker invocations allowed per run, across all
    /// nesting levels. Exceeding it aborts the run.
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
    /// Turn cap handed to each worker for its own inner loop.
    #[serde(default = "default_max_worker_iterations")]
    pub max_worker_iterations: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            max_worker_iterations: default_max_worker_iterations(),
        }
    }
}

/// How the analyst dispatcher runs its workers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    #[default]
    Serial,
    Parallel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalystsConfig {
    #[serde(default)]
    pub mode: DispatchMode,
    /// Analysts to run, in dispatch order.
    #[serde(default = "default_analysts")]
    pub enabled: Vec<AnalystKind>,
}

impl Default for AnalystsConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::default(),
            enabled: default_analysts(),
        }
    }
}

/// Turn bounds for the two debates. A debate escalates to its judge after
/// `rounds * number_of_debaters` debater turns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebateConfig {
    #[serde(default = "default_rounds")]
    pub max_debate_rounds: u32,
    #[serde(default = "default_rounds")]
    pub max_risk_discuss_rounds: u32,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            max_debate_rounds: default_rounds(),
            max_risk_discuss_rounds: default_rounds(),
        }
    }
}

/// Configuration for CLI-backed workers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentsConfig {
    /// Model for analysts, the trader, and every debater except the neutral one.
    #[serde(default = "default_quick_model")]
    pub quick_model: String,
    /// Model for the judges and the neutral risk analyst.
    #[serde(default = "default_deep_model")]
    pub deep_model: String,
    /// Per-invocation timeout. A worker that exceeds it is degraded.
    #[serde(default = "default_worker_timeout")]
    pub worker_timeout_seconds: u64,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            quick_model: default_quick_model(),
            deep_model: default_deep_model(),
            worker_timeout_seconds: default_worker_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Root directory for per-subject run logs.
    #[serde(default = "default_results_dir")]
    pub results_dir: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            results_dir: default_results_dir(),
        }
    }
}

fn default_max_steps() -> u32 {
    100
}
fn default_max_worker_iterations() -> u32 {
    10
}
fn default_analysts() -> Vec<AnalystKind> {
    AnalystKind::ALL.to_vec()
}
fn default_rounds() -> u32 {
    1
}
fn default_quick_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}
fn default_deep_model() -> String {
    "claude-sonnet-4-5-20250929".to_string()
}
fn default_worker_timeout() -> u64 {
    120
}
fn default_true() -> bool {
    true
}
fn default_results_dir() -> String {
    "eval_results".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: GraphConfig = toml::from_str("").unwrap();
        assert_eq!(config, GraphConfig::default());
        assert_eq!(config.run.max_steps, 100);
        assert_eq!(config.run.max_worker_iterations, 10);
        assert_eq!(config.analysts.mode, DispatchMode::Serial);
        assert_eq!(config.analysts.enabled.len(), 4);
        assert!(config.log.enabled);
    }

    #[test]
    fn config_from_toml() {
        let toml_str = r#"
[run]
max_steps = 250

[analysts]
mode = "parallel"
enabled = ["market", "fundamentals"]

[debate]
max_debate_rounds = 2
max_risk_discuss_rounds = 3

[agents]
quick_model = "claude-3-5-haiku-latest"
worker_timeout_seconds = 30

[log]
enabled = false
results_dir = "/tmp/runs"
"#;

        let config: GraphConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.run.max_steps, 250);
        assert_eq!(config.run.max_worker_iterations, 10);
        assert_eq!(config.analysts.mode, DispatchMode::Parallel);
        assert_eq!(
            config.analysts.enabled,
            vec![AnalystKind::Market, AnalystKind::Fundamentals]
        );
        assert_eq!(config.debate.max_debate_rounds, 2);
        assert_eq!(config.debate.max_risk_discuss_rounds, 3);
        assert_eq!(config.agents.worker_timeout_seconds, 30);
        assert_eq!(config.agents.deep_model, "claude-sonnet-4-5-20250929");
        assert!(!config.log.enabled);
        assert_eq!(config.log.results_dir, "/tmp/runs");
    }

    #[test]
    fn roundtrip_graph_config() {
        let config = GraphConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: GraphConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
