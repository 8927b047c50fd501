use std::fmt;

use tradegraph_models::{
    AnalystKind, DebateTurn, Message, ResearchSpeaker, RiskSpeaker, Seat, StateUpdate,
};

/// Every worker position in the pipeline. A role knows which part of the
/// shared state its output lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Market,
    News,
    Social,
    Fundamentals,
    Bull,
    Bear,
    ResearchManager,
    Trader,
    Risky,
    Safe,
    Neutral,
    RiskManager,
}

impl Role {
    pub const ALL: [Role; 12] = [
        Role::Market,
        Role::News,
        Role::Social,
        Role::Fundamentals,
        Role::Bull,
        Role::Bear,
        Role::ResearchManager,
        Role::Trader,
        Role::Risky,
        Role::Safe,
        Role::Neutral,
        Role::RiskManager,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::News => "news",
            Self::Social => "social",
            Self::Fundamentals => "fundamentals",
            Self::Bull => "bull",
            Self::Bear => "bear",
            Self::ResearchManager => "research_manager",
            Self::Trader => "trader",
            Self::Risky => "risky",
            Self::Safe => "safe",
            Self::Neutral => "neutral",
            Self::RiskManager => "risk_manager",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Market => "Market Analyst",
            Self::News => "News Analyst",
            Self::Social => "Social Media Analyst",
            Self::Fundamentals => "Fundamentals Analyst",
            Self::Bull => "Bull Analyst",
            Self::Bear => "Bear Analyst",
            Self::ResearchManager => "Research Manager",
            Self::Trader => "Trader",
            Self::Risky => "Risky Analyst",
            Self::Safe => "Safe Analyst",
            Self::Neutral => "Neutral Analyst",
            Self::RiskManager => "Risk Manager",
        }
    }

    /// Judges render verdicts; everyone else contributes reports or turns.
    pub fn is_judge(self) -> bool {
        matches!(self, Self::ResearchManager | Self::RiskManager)
    }

    /// Judges and the neutral risk analyst, who has to weigh both extremes,
    /// run on the deep model.
    pub fn uses_deep_model(self) -> bool {
        self.is_judge() || self == Self::Neutral
    }

    /// Turn a worker's output text into the update this role owns.
    pub fn into_update(self, text: impl Into<String>) -> StateUpdate {
        let text = text.into();
        let update = StateUpdate::default();
        match self {
            Self::Market | Self::News | Self::Social | Self::Fundamentals => {
                let kind = match self {
                    Self::Market => AnalystKind::Market,
                    Self::News => AnalystKind::News,
                    Self::Social => AnalystKind::Social,
                    _ => AnalystKind::Fundamentals,
                };
                update
                    .with_message(Message::ai(format!("{}: {text}", self.label())))
                    .with_report(kind.report_slot(), text)
            }
            Self::Bull => update.with_research_turn(DebateTurn::Argument {
                speaker: ResearchSpeaker::Bull,
                text,
            }),
            Self::Bear => update.with_research_turn(DebateTurn::Argument {
                speaker: ResearchSpeaker::Bear,
                text,
            }),
            Self::ResearchManager => update
                .with_investment_plan(text.clone())
                .with_research_turn(DebateTurn::Verdict(text)),
            Self::Trader => update
                .with_message(Message::ai(format!("{}: {text}", self.label())))
                .with_trader_plan(text),
            Self::Risky | Self::Safe | Self::Neutral => {
                let speaker = match self {
                    Self::Risky => RiskSpeaker::Risky,
                    Self::Safe => RiskSpeaker::Safe,
                    _ => RiskSpeaker::Neutral,
                };
                update.with_risk_turn(DebateTurn::Argument { speaker, text })
            }
            Self::RiskManager => update
                .with_final_decision(text.clone())
                .with_risk_turn(DebateTurn::Verdict(text)),
        }
    }

    /// Placeholder update for a worker that failed or timed out. Routing
    /// treats it like any other completed turn.
    pub fn degraded(self, reason: &str) -> StateUpdate {
        self.into_update(format!("[{} unavailable: {reason}]", self.label()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<AnalystKind> for Role {
    fn from(kind: AnalystKind) -> Self {
        match kind {
            AnalystKind::Market => Self::Market,
            AnalystKind::News => Self::News,
            AnalystKind::Social => Self::Social,
            AnalystKind::Fundamentals => Self::Fundamentals,
        }
    }
}

impl From<Seat<ResearchSpeaker>> for Role {
    fn from(seat: Seat<ResearchSpeaker>) -> Self {
        match seat {
            Seat::Debater(ResearchSpeaker::Bull) => Self::Bull,
            Seat::Debater(ResearchSpeaker::Bear) => Self::Bear,
            Seat::Judge => Self::ResearchManager,
        }
    }
}

impl From<Seat<RiskSpeaker>> for Role {
    fn from(seat: Seat<RiskSpeaker>) -> Self {
        match seat {
            Seat::Debater(RiskSpeaker::Risky) => Self::Risky,
            Seat::Debater(RiskSpeaker::Safe) => Self::Safe,
            Seat::Debater(RiskSpeaker::Neutral) => Self::Neutral,
            Seat::Judge => Self::RiskManager,
        }
    }
}
