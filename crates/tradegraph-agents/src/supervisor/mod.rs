//! Routing state machines.
//!
//! Every supervisor is a pure function of the shared state: it reads the
//! state and returns a [`Decision`] naming the next target(s) plus a patch.
//! Executing that decision is the graph runtime's job.

pub mod debate;
pub mod dispatcher;
pub mod sequencer;

pub use debate::{DebateCoordinator, DebateKind};
pub use dispatcher::AnalystDispatcher;
pub use sequencer::{Phase, PhaseSequencer};

use std::fmt;

use tradegraph_models::{AnalystKind, StateUpdate, SharedState, SYSTEM_SENDER};

/// Something a supervisor can route to.
pub trait Node: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    fn node_name(&self) -> &'static str;
}

impl Node for AnalystKind {
    fn node_name(&self) -> &'static str {
        self.name()
    }
}

/// Where control goes next.
#[derive(Debug, Clone, PartialEq)]
pub enum Route<T> {
    Goto(T),
    /// Run all targets concurrently against the same snapshot.
    FanOut(Vec<T>),
    /// Branches are still outstanding; take no action.
    Wait,
    Terminate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision<T> {
    pub route: Route<T>,
    pub patch: StateUpdate,
}

impl<T> Decision<T> {
    pub fn new(route: Route<T>) -> Self {
        Self {
            route,
            patch: StateUpdate::default(),
        }
    }

    pub fn with_patch(mut self, patch: StateUpdate) -> Self {
        self.patch = patch;
        self
    }
}

pub trait Supervisor: Send + Sync {
    type Target: Node;

    fn name(&self) -> &str;

    fn decide(&self, state: &SharedState) -> Decision<Self::Target>;
}

/// Position of `sender` in `members`, comparing trimmed and case-folded.
/// `None` for an empty sender, the system marker, or an unknown name.
pub(crate) fn position_of<T: Node>(members: &[T], sender: &str) -> Option<usize> {
    let sender = sender.trim().to_lowercase();
    if sender.is_empty() || sender == SYSTEM_SENDER {
        return None;
    }
    members
        .iter()
        .position(|m| m.node_name().to_lowercase() == sender)
}

/// Strict sequential cursor: unknown sender starts at the head, the last
/// member's completion terminates.
pub(crate) fn advance<T: Node>(members: &[T], sender: &str) -> Route<T> {
    let Some(first) = members.first() else {
        return Route::Terminate;
    };
    match position_of(members, sender) {
        None => Route::Goto(*first),
        Some(i) => match members.get(i + 1) {
            Some(next) => Route::Goto(*next),
            None => Route::Terminate,
        },
    }
}
