use serde::{Deserialize, Serialize};

use crate::debate::{DebateRecord, ResearchSpeaker, RiskSpeaker};
use crate::update::StateUpdate;

/// `sender` value before any node has run.
pub const SYSTEM_SENDER: &str = "system";

/// `sender` value written by the phase sequencer when it dispatches a phase.
pub const SEQUENCER_SENDER: &str = "supervisor";

/// One report slot per analyst kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReportSlot {
    Market,
    Sentiment,
    News,
    Fundamentals,
}

impl ReportSlot {
    pub const ALL: [ReportSlot; 4] = [
        ReportSlot::Market,
        ReportSlot::Sentiment,
        ReportSlot::News,
        ReportSlot::Fundamentals,
    ];
}

/// The analysts fanned out to during the analysis phase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnalystKind {
    Market,
    News,
    Social,
    Fundamentals,
}

impl AnalystKind {
    /// Default dispatch order.
    pub const ALL: [AnalystKind; 4] = [
        AnalystKind::Market,
        AnalystKind::News,
        AnalystKind::Social,
        AnalystKind::Fundamentals,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::News => "news",
            Self::Social => "social",
            Self::Fundamentals => "fundamentals",
        }
    }

    /// The slot this analyst owns. Analysts never write each other's slots.
    pub fn report_slot(self) -> ReportSlot {
        match self {
            Self::Market => ReportSlot::Market,
            Self::News => ReportSlot::News,
            Self::Social => ReportSlot::Sentiment,
            Self::Fundamentals => ReportSlot::Fundamentals,
        }
    }
}

/// Analyst reports, one string per slot. Empty means "not yet written".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reports {
    pub market: String,
    pub sentiment: String,
    pub news: String,
    pub fundamentals: String,
}

impl Reports {
    pub fn get(&self, slot: ReportSlot) -> &str {
        match slot {
            ReportSlot::Market => &self.market,
            ReportSlot::Sentiment => &self.sentiment,
            ReportSlot::News => &self.news,
            ReportSlot::Fundamentals => &self.fundamentals,
        }
    }

    pub fn set(&mut self, slot: ReportSlot, text: String) {
        let target = match slot {
            ReportSlot::Market => &mut self.market,
            ReportSlot::Sentiment => &mut self.sentiment,
            ReportSlot::News => &mut self.news,
            ReportSlot::Fundamentals => &mut self.fundamentals,
        };
        *target = text;
    }

    pub fn is_filled(&self, slot: ReportSlot) -> bool {
        !self.get(slot).is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    Human,
    Ai,
}

/// An entry of the append-only message list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Human,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Ai,
            content: content.into(),
        }
    }
}

/// The single record threaded through every routing decision and worker
/// invocation of one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SharedState {
    /// Ticker or other subject under analysis (e.g., "AAPL").
    pub subject: String,
    /// As-of date of the run, kept exactly as supplied.
    pub as_of_date: String,
    pub messages: Vec<Message>,
    /// Most recent writer; the only input the sequencers route on.
    pub sender: String,
    pub reports: Reports,
    pub research_debate: DebateRecord<ResearchSpeaker>,
    pub investment_plan: String,
    pub trader_plan: String,
    pub risk_debate: DebateRecord<RiskSpeaker>,
    pub final_decision: String,
}

impl SharedState {
    /// A fresh state for one run: empty reports, zeroed debates, and the
    /// system marker as sender.
    pub fn new(subject: impl Into<String>, as_of_date: impl Into<String>) -> Self {
        let subject = subject.into();
        Self {
            messages: vec![Message::human(subject.clone())],
            subject,
            as_of_date: as_of_date.into(),
            sender: SYSTEM_SENDER.to_string(),
            reports: Reports::default(),
            research_debate: DebateRecord::new(),
            investment_plan: String::new(),
            trader_plan: String::new(),
            risk_debate: DebateRecord::new(),
            final_decision: String::new(),
        }
    }

    /// Merge a partial update: scalar fields are last-write-wins, messages are
    /// appended, and debate turns go through the debate record.
    pub fn apply(&mut self, update: StateUpdate) {
        let StateUpdate {
            sender,
            messages,
            reports,
            research_turn,
            investment_plan,
            trader_plan,
            risk_turn,
            final_decision,
        } = update;

        if let Some(sender) = sender {
            self.sender = sender;
        }
        self.messages.extend(messages);
        for (slot, text) in reports {
            self.reports.set(slot, text);
        }
        if let Some(turn) = research_turn {
            self.research_debate.apply(turn);
        }
        if let Some(plan) = investment_plan {
            self.investment_plan = plan;
        }
        if let Some(plan) = trader_plan {
            self.trader_plan = plan;
        }
        if let Some(turn) = risk_turn {
            self.risk_debate.apply(turn);
        }
        if let Some(decision) = final_decision {
            self.final_decision = decision;
        }
    }
}
