use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tradegraph_models::{SharedState, StateUpdate};

use crate::claude_cli::{invoke_claude, ClaudeCliConfig};
use crate::error::AgentError;
use crate::prompts::{context, system_prompt};
use crate::role::Role;

/// An opaque pipeline worker: reads the shared state, returns a partial
/// update. Mockable for testing.
#[async_trait]
pub trait Worker: Send + Sync {
    fn name(&self) -> &str;

    async fn invoke(&self, state: &SharedState) -> Result<StateUpdate, AgentError>;
}

/// A worker that plays one role by invoking the Claude CLI.
pub struct CliWorker {
    pub role: Role,
    pub cli_config: ClaudeCliConfig,
}

impl CliWorker {
    pub fn new(role: Role, cli_config: ClaudeCliConfig) -> Self {
        Self { role, cli_config }
    }
}

#[async_trait]
impl Worker for CliWorker {
    fn name(&self) -> &str {
        self.role.name()
    }

    async fn invoke(&self, state: &SharedState) -> Result<StateUpdate, AgentError> {
        let system_prompt = system_prompt(self.role);
        let user_prompt = serde_json::to_string_pretty(&context(self.role, state))?;
        let text = invoke_claude(self.role.name(), &system_prompt, &user_prompt, &self.cli_config)
            .await?;
        Ok(self.role.into_update(text))
    }
}

/// One worker per role, injected into the graph by the caller.
#[derive(Clone, Default)]
pub struct WorkerRegistry {
    workers: HashMap<Role, Arc<dyn Worker>>,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: Role, worker: Arc<dyn Worker>) -> Self {
        self.insert(role, worker);
        self
    }

    pub fn insert(&mut self, role: Role, worker: Arc<dyn Worker>) {
        self.workers.insert(role, worker);
    }

    pub fn contains(&self, role: Role) -> bool {
        self.workers.contains_key(&role)
    }

    pub fn get(&self, role: Role) -> Result<Arc<dyn Worker>, AgentError> {
        self.workers
            .get(&role)
            .cloned()
            .ok_or_else(|| AgentError::MissingWorker(role.to_string()))
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingWorker, ScriptedWorker};

    #[tokio::test]
    async fn scripted_worker_writes_its_role_slot() {
        let worker = ScriptedWorker::new(Role::Fundamentals);
        let state = SharedState::new("AAPL", "2024-01-02");

        let update = worker.invoke(&state).await.unwrap();
        let mut next = state.clone();
        next.apply(update);

        assert!(next.reports.fundamentals.contains("Fundamentals Analyst"));
        assert!(next.reports.fundamentals.contains("AAPL"));
        assert_eq!(worker.calls(), 1);
    }

    #[tokio::test]
    async fn failing_worker_returns_error() {
        let worker = FailingWorker::new(Role::Bear);
        let state = SharedState::new("AAPL", "2024-01-02");
        assert!(worker.invoke(&state).await.is_err());
    }

    #[test]
    fn registry_reports_missing_role() {
        let registry = WorkerRegistry::new().with(
            Role::Trader,
            Arc::new(ScriptedWorker::new(Role::Trader)) as Arc<dyn Worker>,
        );
        assert!(registry.contains(Role::Trader));
        assert_eq!(registry.len(), 1);

        let err = registry.get(Role::Bull).err().unwrap();
        assert!(matches!(err, AgentError::MissingWorker(ref role) if role == "bull"));
    }

    #[test]
    fn cli_worker_is_named_after_role() {
        let worker = CliWorker::new(Role::RiskManager, ClaudeCliConfig::default());
        assert_eq!(worker.name(), "risk_manager");
    }
}
