use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tradegraph_models::{DebateRecord, Participant, SharedState, Signal};
use uuid::Uuid;

/// Archived view of one debate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DebateLog {
    /// Participant name → everything they said.
    pub histories: BTreeMap<String, String>,
    /// Full transcript in speaking order.
    pub history: String,
    pub judge_decision: String,
    pub turn_count: u32,
}

impl<P: Participant> From<&DebateRecord<P>> for DebateLog {
    fn from(record: &DebateRecord<P>) -> Self {
        let histories = P::ALL
            .iter()
            .map(|p| (p.name().to_string(), record.history_of(*p).to_string()))
            .collect();
        Self {
            histories,
            history: record.joint_history().to_string(),
            judge_decision: record.judge_decision().to_string(),
            turn_count: record.turn_count(),
        }
    }
}

/// Everything worth keeping from one finished run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    pub run_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub subject: String,
    pub as_of_date: String,
    pub market_report: String,
    pub sentiment_report: String,
    pub news_report: String,
    pub fundamentals_report: String,
    pub investment_debate: DebateLog,
    pub investment_plan: String,
    pub trader_plan: String,
    pub risk_debate: DebateLog,
    pub final_decision: String,
    pub signal: Signal,
}

impl RunRecord {
    pub fn from_state(state: &SharedState, signal: Signal) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            subject: state.subject.clone(),
            as_of_date: state.as_of_date.clone(),
            market_report: state.reports.market.clone(),
            sentiment_report: state.reports.sentiment.clone(),
            news_report: state.reports.news.clone(),
            fundamentals_report: state.reports.fundamentals.clone(),
            investment_debate: DebateLog::from(&state.research_debate),
            investment_plan: state.investment_plan.clone(),
            trader_plan: state.trader_plan.clone(),
            risk_debate: DebateLog::from(&state.risk_debate),
            final_decision: state.final_decision.clone(),
            signal,
        }
    }
}
