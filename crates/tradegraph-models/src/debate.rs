use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A named debater. Implemented by the closed enums of each debate type so
/// routing works on explicit identities instead of text conventions.
pub trait Participant:
    Copy + Eq + Ord + Hash + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Every participant, in canonical speaking order.
    const ALL: &'static [Self];

    /// Node name used as `sender` and for logging (e.g. `bull`).
    fn name(self) -> &'static str;

    /// Display label prefixed to transcript entries (e.g. `Bull Analyst`).
    fn label(self) -> &'static str;
}

/// Participants of the two-party research debate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResearchSpeaker {
    Bull,
    Bear,
}

impl Participant for ResearchSpeaker {
    const ALL: &'static [Self] = &[Self::Bull, Self::Bear];

    fn name(self) -> &'static str {
        match self {
            Self::Bull => "bull",
            Self::Bear => "bear",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Bull => "Bull Analyst",
            Self::Bear => "Bear Analyst",
        }
    }
}

/// Participants of the three-party risk debate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskSpeaker {
    Risky,
    Safe,
    Neutral,
}

impl Participant for RiskSpeaker {
    const ALL: &'static [Self] = &[Self::Risky, Self::Safe, Self::Neutral];

    fn name(self) -> &'static str {
        match self {
            Self::Risky => "risky",
            Self::Safe => "safe",
            Self::Neutral => "neutral",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Risky => "Risky Analyst",
            Self::Safe => "Safe Analyst",
            Self::Neutral => "Neutral Analyst",
        }
    }
}

/// Who holds the floor in a debate: one of the debaters, or the judge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Seat<P> {
    Debater(P),
    Judge,
}

/// A single contribution to a debate, as returned by a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebateTurn<P> {
    Argument { speaker: P, text: String },
    Verdict(String),
}

/// Transcript and bookkeeping for one debate within a run.
///
/// Fields are private: every mutation goes through [`DebateRecord::record_turn`]
/// or [`DebateRecord::record_verdict`], which keep `turn_count` and the
/// judge decision consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "P: Participant", deserialize = "P: Participant"))]
pub struct DebateRecord<P: Participant> {
    history_by_participant: BTreeMap<P, String>,
    joint_history: String,
    last_speaker: Option<Seat<P>>,
    current_response_by_participant: BTreeMap<P, String>,
    judge_decision: String,
    turn_count: u32,
}

impl<P: Participant> Default for DebateRecord<P> {
    fn default() -> Self {
        Self {
            history_by_participant: P::ALL.iter().map(|p| (*p, String::new())).collect(),
            joint_history: String::new(),
            last_speaker: None,
            current_response_by_participant: P::ALL
                .iter()
                .map(|p| (*p, String::new()))
                .collect(),
            judge_decision: String::new(),
            turn_count: 0,
        }
    }
}

impl<P: Participant> DebateRecord<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything `participant` has said so far.
    pub fn history_of(&self, participant: P) -> &str {
        self.history_by_participant
            .get(&participant)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// `participant`'s most recent turn only.
    pub fn current_response_of(&self, participant: P) -> &str {
        self.current_response_by_participant
            .get(&participant)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn joint_history(&self) -> &str {
        &self.joint_history
    }

    pub fn last_speaker(&self) -> Option<Seat<P>> {
        self.last_speaker
    }

    pub fn judge_decision(&self) -> &str {
        &self.judge_decision
    }

    /// Debater turns taken so far. Judge turns are not counted.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// The debate is over once the judge has spoken.
    pub fn is_concluded(&self) -> bool {
        !self.judge_decision.is_empty() || self.last_speaker == Some(Seat::Judge)
    }

    /// Record a debater turn. Returns `false` (and changes nothing) if the
    /// judge has already concluded the debate.
    pub fn record_turn(&mut self, speaker: P, text: &str) -> bool {
        if self.is_concluded() {
            return false;
        }

        let entry = format!("{}: {}", speaker.label(), text.trim());
        append_line(
            self.history_by_participant.entry(speaker).or_default(),
            &entry,
        );
        append_line(&mut self.joint_history, &entry);
        self.current_response_by_participant.insert(speaker, entry);
        self.last_speaker = Some(Seat::Debater(speaker));
        self.turn_count += 1;
        true
    }

    /// Record the judge's verdict. Only the first verdict is kept.
    pub fn record_verdict(&mut self, text: &str) -> bool {
        if self.is_concluded() {
            return false;
        }

        self.judge_decision = text.trim().to_string();
        self.last_speaker = Some(Seat::Judge);
        true
    }

    pub fn apply(&mut self, turn: DebateTurn<P>) -> bool {
        match turn {
            DebateTurn::Argument { speaker, text } => self.record_turn(speaker, &text),
            DebateTurn::Verdict(text) => self.record_verdict(&text),
        }
    }
}

fn append_line(buf: &mut String, line: &str) {
    if !buf.is_empty() {
        buf.push('\n');
    }
    buf.push_str(line);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_zeroed() {
        let record: DebateRecord<RiskSpeaker> = DebateRecord::new();
        assert_eq!(record.turn_count(), 0);
        assert!(record.last_speaker().is_none());
        assert!(record.judge_decision().is_empty());
        assert!(record.joint_history().is_empty());
        for p in RiskSpeaker::ALL {
            assert!(record.history_of(*p).is_empty());
            assert!(record.current_response_of(*p).is_empty());
        }
    }

    #[test]
    fn turns_accumulate_per_participant_and_jointly() {
        let mut record = DebateRecord::new();
        assert!(record.record_turn(ResearchSpeaker::Bull, "Revenue is growing."));
        assert!(record.record_turn(ResearchSpeaker::Bear, "Margins are shrinking."));
        assert!(record.record_turn(ResearchSpeaker::Bull, "Buybacks support the price."));

        assert_eq!(record.turn_count(), 3);
        assert_eq!(
            record.history_of(ResearchSpeaker::Bull),
            "Bull Analyst: Revenue is growing.\nBull Analyst: Buybacks support the price."
        );
        assert_eq!(
            record.current_response_of(ResearchSpeaker::Bull),
            "Bull Analyst: Buybacks support the price."
        );
        assert_eq!(
            record.joint_history(),
            "Bull Analyst: Revenue is growing.\n\
             Bear Analyst: Margins are shrinking.\n\
             Bull Analyst: Buybacks support the price."
        );
        assert_eq!(
            record.last_speaker(),
            Some(Seat::Debater(ResearchSpeaker::Bull))
        );
    }

    #[test]
    fn verdict_is_not_counted_and_set_once() {
        let mut record = DebateRecord::new();
        record.record_turn(RiskSpeaker::Risky, "Go all in.");
        assert!(record.record_verdict("Hold with a trailing stop."));
        assert_eq!(record.turn_count(), 1);
        assert!(record.is_concluded());

        assert!(!record.record_verdict("Sell everything."));
        assert_eq!(record.judge_decision(), "Hold with a trailing stop.");
    }

    #[test]
    fn turns_after_verdict_are_ignored() {
        let mut record = DebateRecord::new();
        record.record_verdict("Buy.");
        assert!(!record.record_turn(RiskSpeaker::Safe, "Too late"));
        assert_eq!(record.turn_count(), 0);
        assert!(record.history_of(RiskSpeaker::Safe).is_empty());
    }

    #[test]
    fn empty_verdict_still_concludes() {
        let mut record: DebateRecord<ResearchSpeaker> = DebateRecord::new();
        record.record_verdict("   ");
        assert!(record.judge_decision().is_empty());
        assert!(record.is_concluded());
    }

    #[test]
    fn record_serializes_with_named_keys() {
        let mut record = DebateRecord::new();
        record.record_turn(ResearchSpeaker::Bear, "Overvalued.");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json["history_by_participant"]["bear"],
            "Bear Analyst: Overvalued."
        );
        assert_eq!(json["last_speaker"]["debater"], "bear");

        let parsed: DebateRecord<ResearchSpeaker> = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }
}
