use tradegraph_models::{
    DebateRecord, Participant, ResearchSpeaker, RiskSpeaker, Seat, SharedState,
};

use super::{Decision, Node, Route, Supervisor};
use crate::role::Role;

/// A debate type: its participants, where its record lives in the shared
/// state, and who judges it.
pub trait DebateKind: Participant {
    /// Node name of the judge.
    const JUDGE: &'static str;

    /// Name of the coordinator driving this debate.
    const SUPERVISOR: &'static str;

    fn record(state: &SharedState) -> &DebateRecord<Self>;

    fn role(seat: Seat<Self>) -> Role;
}

impl DebateKind for ResearchSpeaker {
    const JUDGE: &'static str = "research_manager";
    const SUPERVISOR: &'static str = "research_supervisor";

    fn record(state: &SharedState) -> &DebateRecord<Self> {
        &state.research_debate
    }

    fn role(seat: Seat<Self>) -> Role {
        Role::from(seat)
    }
}

impl DebateKind for RiskSpeaker {
    const JUDGE: &'static str = "risk_manager";
    const SUPERVISOR: &'static str = "risk_supervisor";

    fn record(state: &SharedState) -> &DebateRecord<Self> {
        &state.risk_debate
    }

    fn role(seat: Seat<Self>) -> Role {
        Role::from(seat)
    }
}

impl<P: DebateKind> Node for Seat<P> {
    fn node_name(&self) -> &'static str {
        match self {
            Seat::Debater(p) => p.name(),
            Seat::Judge => P::JUDGE,
        }
    }
}

/// Round-robin driver for N debaters and one judge.
///
/// Ending the debate (judge spoke, or the turn bound was hit) is decided
/// before whose turn it is, so a debate terminates in bounded turns no
/// matter what the turn-taking table says.
#[derive(Debug, Clone)]
pub struct DebateCoordinator<P: DebateKind> {
    debaters: Vec<P>,
    opening: P,
    max_turns_per_debater: u32,
    successors: Vec<(P, P)>,
}

impl<P: DebateKind> DebateCoordinator<P> {
    /// Debaters speak in the given order, cycling back to the first.
    pub fn new(debaters: Vec<P>, opening: P, max_turns_per_debater: u32) -> Self {
        let successors = debaters
            .iter()
            .zip(debaters.iter().cycle().skip(1))
            .map(|(from, to)| (*from, *to))
            .collect();
        Self {
            debaters,
            opening,
            max_turns_per_debater,
            successors,
        }
    }

    /// Override who speaks after `from`.
    pub fn with_successor(mut self, from: P, to: P) -> Self {
        self.successors.retain(|(f, _)| *f != from);
        self.successors.push((from, to));
        self
    }

    pub fn debaters(&self) -> &[P] {
        &self.debaters
    }

    /// Debater turns after which the judge is called.
    pub fn turn_bound(&self) -> u32 {
        self.max_turns_per_debater
            .saturating_mul(self.debaters.len() as u32)
    }

    pub fn successor_of(&self, speaker: P) -> Option<P> {
        self.successors
            .iter()
            .find(|(from, _)| *from == speaker)
            .map(|(_, to)| *to)
    }

    fn first_debater(&self) -> Seat<P> {
        self.debaters
            .first()
            .map(|p| Seat::Debater(*p))
            .unwrap_or(Seat::Judge)
    }

    fn next_seat(&self, record: &DebateRecord<P>) -> Seat<P> {
        let candidate = match record.last_speaker() {
            None => Some(self.opening),
            Some(Seat::Debater(speaker)) => self.successor_of(speaker),
            Some(Seat::Judge) => None,
        };
        match candidate {
            Some(next) if self.debaters.contains(&next) => Seat::Debater(next),
            _ => self.first_debater(),
        }
    }
}

impl DebateCoordinator<ResearchSpeaker> {
    /// Bull opens; bull and bear alternate.
    pub fn research(max_rounds: u32) -> Self {
        Self::new(
            vec![ResearchSpeaker::Bull, ResearchSpeaker::Bear],
            ResearchSpeaker::Bull,
            max_rounds,
        )
    }
}

impl DebateCoordinator<RiskSpeaker> {
    /// Risky opens; risky → safe → neutral → risky.
    pub fn risk(max_rounds: u32) -> Self {
        Self::new(
            vec![RiskSpeaker::Risky, RiskSpeaker::Safe, RiskSpeaker::Neutral],
            RiskSpeaker::Risky,
            max_rounds,
        )
    }
}

impl<P: DebateKind> Supervisor for DebateCoordinator<P> {
    type Target = Seat<P>;

    fn name(&self) -> &str {
        P::SUPERVISOR
    }

    fn decide(&self, state: &SharedState) -> Decision<Seat<P>> {
        let record = P::record(state);

        if record.is_concluded() {
            return Decision::new(Route::Terminate);
        }
        if record.turn_count() >= self.turn_bound() {
            return Decision::new(Route::Goto(Seat::Judge));
        }
        Decision::new(Route::Goto(self.next_seat(record)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn research_state() -> SharedState {
        SharedState::new("AAPL", "2024-01-02")
    }

    fn goto<P: DebateKind>(decision: Decision<Seat<P>>) -> Seat<P> {
        match decision.route {
            Route::Goto(seat) => seat,
            other => panic!("expected goto, got {other:?}"),
        }
    }

    #[test]
    fn research_with_one_round_escalates_after_bear() {
        let coordinator = DebateCoordinator::research(1);
        let mut state = research_state();

        assert_eq!(
            goto(coordinator.decide(&state)),
            Seat::Debater(ResearchSpeaker::Bull)
        );
        state.research_debate.record_turn(ResearchSpeaker::Bull, "Growth");

        assert_eq!(
            goto(coordinator.decide(&state)),
            Seat::Debater(ResearchSpeaker::Bear)
        );
        state.research_debate.record_turn(ResearchSpeaker::Bear, "Valuation");

        assert_eq!(state.research_debate.turn_count(), 2);
        assert_eq!(goto(coordinator.decide(&state)), Seat::Judge);
    }

    #[test]
    fn escalation_ignores_whose_turn_it_would_be() {
        let coordinator = DebateCoordinator::research(1);
        let mut state = research_state();
        state.research_debate.record_turn(ResearchSpeaker::Bull, "One");
        state.research_debate.record_turn(ResearchSpeaker::Bull, "Two");
        assert_eq!(goto(coordinator.decide(&state)), Seat::Judge);
    }

    #[test]
    fn risk_cycle_repeats_for_three_rounds_then_escalates() {
        let coordinator = DebateCoordinator::risk(3);
        let mut state = research_state();
        let mut spoken = Vec::new();

        loop {
            match goto(coordinator.decide(&state)) {
                Seat::Debater(speaker) => {
                    spoken.push(speaker);
                    state.risk_debate.record_turn(speaker, "argument");
                }
                Seat::Judge => break,
            }
            assert!(spoken.len() <= 9, "debate did not escalate");
        }

        let round = [RiskSpeaker::Risky, RiskSpeaker::Safe, RiskSpeaker::Neutral];
        let expected: Vec<RiskSpeaker> = round.iter().cycle().take(9).copied().collect();
        assert_eq!(spoken, expected);
        assert_eq!(state.risk_debate.turn_count(), 9);
    }

    #[test]
    fn concluded_debate_always_terminates() {
        let coordinator = DebateCoordinator::risk(1);
        let mut state = research_state();
        state.risk_debate.record_turn(RiskSpeaker::Risky, "Lever up");
        state.risk_debate.record_verdict("Hold");

        for _ in 0..5 {
            assert_eq!(coordinator.decide(&state).route, Route::Terminate);
        }
    }

    #[test]
    fn judge_with_empty_verdict_still_terminates() {
        let coordinator = DebateCoordinator::research(1);
        let mut state = research_state();
        state.research_debate.record_verdict("");
        assert_eq!(coordinator.decide(&state).route, Route::Terminate);
    }

    #[test]
    fn unknown_speaker_falls_back_to_first_debater() {
        // Only bear is seated; bull's turn has no configured successor.
        let coordinator = DebateCoordinator::new(vec![ResearchSpeaker::Bear], ResearchSpeaker::Bull, 3);
        let mut state = research_state();
        assert_eq!(
            goto(coordinator.decide(&state)),
            Seat::Debater(ResearchSpeaker::Bear)
        );

        state.research_debate.record_turn(ResearchSpeaker::Bull, "Uninvited");
        assert_eq!(
            goto(coordinator.decide(&state)),
            Seat::Debater(ResearchSpeaker::Bear)
        );
    }

    #[test]
    fn successor_override_changes_cycle() {
        let coordinator = DebateCoordinator::risk(2).with_successor(RiskSpeaker::Risky, RiskSpeaker::Neutral);
        let mut state = research_state();
        state.risk_debate.record_turn(RiskSpeaker::Risky, "Aggressive");
        assert_eq!(
            goto(coordinator.decide(&state)),
            Seat::Debater(RiskSpeaker::Neutral)
        );
        assert_eq!(coordinator.successor_of(RiskSpeaker::Neutral), Some(RiskSpeaker::Risky));
    }

    #[test]
    fn zero_rounds_goes_straight_to_judge() {
        let coordinator = DebateCoordinator::research(0);
        assert_eq!(goto(coordinator.decide(&research_state())), Seat::Judge);
    }

    #[test]
    fn seats_are_named_for_routing() {
        assert_eq!(Seat::Debater(RiskSpeaker::Safe).node_name(), "safe");
        assert_eq!(Seat::<RiskSpeaker>::Judge.node_name(), "risk_manager");
        assert_eq!(Seat::<ResearchSpeaker>::Judge.node_name(), "research_manager");
    }
}
