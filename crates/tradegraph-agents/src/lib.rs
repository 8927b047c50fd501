pub mod budget;
pub mod claude_cli;
pub mod error;
pub mod graph;
pub mod prompts;
pub mod propagation;
pub mod role;
pub mod signal;
pub mod supervisor;
pub mod worker;

pub mod test_support;

pub use budget::StepBudget;
pub use error::AgentError;
pub use graph::TradingGraph;
pub use propagation::Propagator;
pub use role::Role;
pub use signal::{KeywordSignalExtractor, SignalExtractor};
pub use supervisor::{
    AnalystDispatcher, DebateCoordinator, DebateKind, Decision, Node, Phase, PhaseSequencer, Route,
    Supervisor,
};
pub use worker::{CliWorker, Worker, WorkerRegistry};
