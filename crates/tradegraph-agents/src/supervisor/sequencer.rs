use std::fmt;

use tradegraph_models::{SharedState, StateUpdate, SEQUENCER_SENDER};

use super::{advance, Decision, Node, Supervisor};

/// Top-level pipeline phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Analyst,
    Researcher,
    Trader,
    Risk,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Analyst, Phase::Researcher, Phase::Trader, Phase::Risk];

    pub fn name(self) -> &'static str {
        match self {
            Self::Analyst => "analyst",
            Self::Researcher => "researcher",
            Self::Trader => "trader",
            Self::Risk => "risk",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Node for Phase {
    fn node_name(&self) -> &'static str {
        self.name()
    }
}

/// Runs phases strictly in order, keyed only on who wrote last.
///
/// Every decision stamps `sender` with the sequencer marker, so the phase it
/// dispatches must overwrite it with its own name on completion.
pub struct PhaseSequencer<T: Node = Phase> {
    phases: Vec<T>,
}

impl<T: Node> PhaseSequencer<T> {
    pub fn new(phases: Vec<T>) -> Self {
        Self { phases }
    }

    pub fn phases(&self) -> &[T] {
        &self.phases
    }
}

impl Default for PhaseSequencer<Phase> {
    fn default() -> Self {
        Self::new(Phase::ALL.to_vec())
    }
}

impl<T: Node> Supervisor for PhaseSequencer<T> {
    type Target = T;

    fn name(&self) -> &str {
        SEQUENCER_SENDER
    }

    fn decide(&self, state: &SharedState) -> Decision<T> {
        Decision::new(advance(&self.phases, &state.sender))
            .with_patch(StateUpdate::default().with_sender(SEQUENCER_SENDER))
    }
}
