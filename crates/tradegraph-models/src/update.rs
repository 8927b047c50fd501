use std::collections::BTreeMap;

use crate::debate::{DebateTurn, ResearchSpeaker, RiskSpeaker};
use crate::state::{Message, ReportSlot};

/// A partial update to [`SharedState`](crate::state::SharedState), returned by
/// workers and by routing decisions. `None` / empty fields leave the state
/// untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub sender: Option<String>,
    /// Appended, never replaced.
    pub messages: Vec<Message>,
    pub reports: BTreeMap<ReportSlot, String>,
    pub research_turn: Option<DebateTurn<ResearchSpeaker>>,
    pub investment_plan: Option<String>,
    pub trader_plan: Option<String>,
    pub risk_turn: Option<DebateTurn<RiskSpeaker>>,
    pub final_decision: Option<String>,
}

impl StateUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_report(mut self, slot: ReportSlot, text: impl Into<String>) -> Self {
        self.reports.insert(slot, text.into());
        self
    }

    pub fn with_research_turn(mut self, turn: DebateTurn<ResearchSpeaker>) -> Self {
        self.research_turn = Some(turn);
        self
    }

    pub fn with_investment_plan(mut self, plan: impl Into<String>) -> Self {
        self.investment_plan = Some(plan.into());
        self
    }

    pub fn with_trader_plan(mut self, plan: impl Into<String>) -> Self {
        self.trader_plan = Some(plan.into());
        self
    }

    pub fn with_risk_turn(mut self, turn: DebateTurn<RiskSpeaker>) -> Self {
        self.risk_turn = Some(turn);
        self
    }

    pub fn with_final_decision(mut self, decision: impl Into<String>) -> Self {
        self.final_decision = Some(decision.into());
        self
    }
}
