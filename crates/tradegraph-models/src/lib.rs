pub mod config;
pub mod debate;
pub mod signal;
pub mod state;
pub mod update;

pub use config::{AgentsConfig, AnalystsConfig, DebateConfig, DispatchMode, GraphConfig, LogConfig, RunConfig};
pub use debate::{DebateRecord, DebateTurn, Participant, ResearchSpeaker, RiskSpeaker, Seat};
pub use signal::Signal;
pub use state::{
    AnalystKind, Message, MessageRole, ReportSlot, Reports, SharedState, SEQUENCER_SENDER,
    SYSTEM_SENDER,
};
pub use update::StateUpdate;
