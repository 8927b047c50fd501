use tradegraph_models::{RunConfig, SharedState};

/// Seeds a run and carries its execution limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Propagator {
    /// Global step budget for one run.
    pub max_steps: u32,
    /// Turn cap handed to CLI-backed workers per invocation.
    pub max_worker_iterations: u32,
}

impl Propagator {
    pub fn new(max_steps: u32, max_worker_iterations: u32) -> Self {
        Self {
            max_steps,
            max_worker_iterations,
        }
    }

    pub fn create_initial_state(&self, subject: &str, as_of_date: &str) -> SharedState {
        SharedState::new(subject, as_of_date)
    }
}

impl Default for Propagator {
    fn default() -> Self {
        Self::from(&RunConfig::default())
    }
}

impl From<&RunConfig> for Propagator {
    fn from(config: &RunConfig) -> Self {
        Self::new(config.max_steps, config.max_worker_iterations)
    }
}
