//! Test support: deterministic workers for exercising the routing core
//! without the Claude CLI.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tradegraph_models::{SharedState, StateUpdate};

use crate::error::AgentError;
use crate::role::Role;
use crate::worker::{Worker, WorkerRegistry};

/// A worker that answers with canned text for its role and counts calls.
pub struct ScriptedWorker {
    pub role: Role,
    /// Fixed output text. `None` produces `"<label> take #<n> on <subject>"`.
    pub script: Option<String>,
    /// Artificial latency, used to shuffle parallel completion order.
    pub delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedWorker {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            script: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_script(mut self, text: impl Into<String>) -> Self {
        self.script = Some(text.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Worker for ScriptedWorker {
    fn name(&self) -> &str {
        self.role.name()
    }

    async fn invoke(&self, state: &SharedState) -> Result<StateUpdate, AgentError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let text = match &self.script {
            Some(script) => script.clone(),
            None => format!("{} take #{n} on {}", self.role.label(), state.subject),
        };
        Ok(self.role.into_update(text))
    }
}

/// A worker that always fails, for degradation tests.
pub struct FailingWorker {
    pub role: Role,
}

impl FailingWorker {
    pub fn new(role: Role) -> Self {
        Self { role }
    }
}

#[async_trait]
impl Worker for FailingWorker {
    fn name(&self) -> &str {
        self.role.name()
    }

    async fn invoke(&self, _state: &SharedState) -> Result<StateUpdate, AgentError> {
        Err(AgentError::Cli(format!("Mock failure in {}", self.role)))
    }
}

/// A worker whose task panics mid-invocation.
pub struct PanickingWorker {
    pub role: Role,
}

#[async_trait]
impl Worker for PanickingWorker {
    fn name(&self) -> &str {
        self.role.name()
    }

    async fn invoke(&self, _state: &SharedState) -> Result<StateUpdate, AgentError> {
        panic!("{} worker crashed", self.role)
    }
}

/// A worker that returns nothing at all. Its slot never fills.
pub struct SilentWorker {
    pub role: Role,
}

#[async_trait]
impl Worker for SilentWorker {
    fn name(&self) -> &str {
        self.role.name()
    }

    async fn invoke(&self, _state: &SharedState) -> Result<StateUpdate, AgentError> {
        Ok(StateUpdate::default())
    }
}

/// Scripted workers for every role. The risk manager closes with `verdict`.
pub fn scripted_workers(verdict: &str) -> Vec<Arc<ScriptedWorker>> {
    Role::ALL
        .iter()
        .map(|role| {
            let worker = ScriptedWorker::new(*role);
            let worker = if *role == Role::RiskManager {
                worker.with_script(verdict)
            } else {
                worker
            };
            Arc::new(worker)
        })
        .collect()
}

/// A registry of scripted workers for every role, plus handles to them so
/// tests can inspect call counts.
pub fn scripted_registry(verdict: &str) -> (WorkerRegistry, Vec<Arc<ScriptedWorker>>) {
    let workers = scripted_workers(verdict);
    let registry = workers.iter().fold(WorkerRegistry::new(), |registry, worker| {
        registry.with(worker.role, Arc::clone(worker) as Arc<dyn Worker>)
    });
    (registry, workers)
}

/// Call count for `role` among `workers`.
pub fn calls_for(workers: &[Arc<ScriptedWorker>], role: Role) -> usize {
    workers
        .iter()
        .find(|w| w.role == role)
        .map(|w| w.calls())
        .unwrap_or(0)
}
