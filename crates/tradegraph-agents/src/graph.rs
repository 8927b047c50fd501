use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use tradegraph_models::{
    AnalystKind, GraphConfig, ResearchSpeaker, RiskSpeaker, Seat, SharedState, Signal, StateUpdate,
};

use crate::budget::StepBudget;
use crate::error::AgentError;
use crate::propagation::Propagator;
use crate::role::Role;
use crate::signal::{KeywordSignalExtractor, SignalExtractor};
use crate::supervisor::{
    AnalystDispatcher, DebateCoordinator, DebateKind, Phase, PhaseSequencer, Route, Supervisor,
};
use crate::worker::{Worker, WorkerRegistry};

/// The full decision pipeline: supervisors wired to injected workers.
pub struct TradingGraph {
    workers: WorkerRegistry,
    sequencer: PhaseSequencer,
    dispatcher: AnalystDispatcher,
    research: DebateCoordinator<ResearchSpeaker>,
    risk: DebateCoordinator<RiskSpeaker>,
    propagator: Propagator,
    worker_timeout: Duration,
    extractor: Box<dyn SignalExtractor>,
}

impl TradingGraph {
    /// Wire the pipeline for `config`. Fails if any role the configuration
    /// can reach has no worker.
    pub fn new(config: &GraphConfig, workers: WorkerRegistry) -> Result<Self, AgentError> {
        let mut seen = BTreeSet::new();
        if let Some(dup) = config.analysts.enabled.iter().find(|kind| !seen.insert(**kind)) {
            return Err(AgentError::Config(format!(
                "analyst '{}' is enabled more than once",
                dup.name()
            )));
        }

        let graph = Self {
            workers,
            sequencer: PhaseSequencer::default(),
            dispatcher: AnalystDispatcher::new(config.analysts.enabled.clone(), config.analysts.mode),
            research: DebateCoordinator::research(config.debate.max_debate_rounds),
            risk: DebateCoordinator::risk(config.debate.max_risk_discuss_rounds),
            propagator: Propagator::from(&config.run),
            worker_timeout: Duration::from_secs(config.agents.worker_timeout_seconds),
            extractor: Box::new(KeywordSignalExtractor),
        };

        for role in graph.required_roles() {
            if !graph.workers.contains(role) {
                return Err(AgentError::MissingWorker(role.to_string()));
            }
        }
        Ok(graph)
    }

    pub fn with_signal_extractor(mut self, extractor: impl SignalExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn propagator(&self) -> &Propagator {
        &self.propagator
    }

    pub fn dispatcher(&self) -> &AnalystDispatcher {
        &self.dispatcher
    }

    /// Roles the configured supervisors can route to.
    pub fn required_roles(&self) -> BTreeSet<Role> {
        let mut roles: BTreeSet<Role> = self
            .dispatcher
            .analysts()
            .iter()
            .map(|kind| Role::from(*kind))
            .collect();
        roles.insert(Role::Trader);
        collect_debate_roles(&self.research, &mut roles);
        collect_debate_roles(&self.risk, &mut roles);
        roles
    }

    /// Run one subject/date through every phase and reduce the outcome to a
    /// signal.
    pub async fn propagate(
        &self,
        subject: &str,
        as_of_date: &str,
    ) -> Result<(SharedState, Signal), AgentError> {
        let start = Instant::now();
        let mut state = self.propagator.create_initial_state(subject, as_of_date);
        let mut budget = StepBudget::new(self.propagator.max_steps);
        info!(subject, as_of_date, max_steps = budget.limit(), "Starting run");

        loop {
            budget.spend(self.sequencer.name())?;
            let decision = self.sequencer.decide(&state);
            debug!(supervisor = self.sequencer.name(), route = ?decision.route, "Routing decision");
            state.apply(decision.patch);

            match decision.route {
                Route::Goto(phase) => {
                    let phase_start = Instant::now();
                    self.run_phase(phase, &mut state, &mut budget).await?;
                    state.sender = phase.name().to_string();
                    info!(
                        %phase,
                        steps_used = budget.used(),
                        elapsed_ms = phase_start.elapsed().as_millis(),
                        "Phase complete"
                    );
                }
                Route::Terminate => break,
                Route::FanOut(_) | Route::Wait => {
                    warn!(route = ?decision.route, "Sequencer returned a non-sequential route");
                    break;
                }
            }
        }

        let signal = self.extractor.extract(&state.final_decision);
        info!(
            subject,
            as_of_date,
            %signal,
            steps_used = budget.used(),
            elapsed_ms = start.elapsed().as_millis(),
            "Run complete"
        );
        Ok((state, signal))
    }

    async fn run_phase(
        &self,
        phase: Phase,
        state: &mut SharedState,
        budget: &mut StepBudget,
    ) -> Result<(), AgentError> {
        match phase {
            Phase::Analyst => self.run_analysts(state, budget).await,
            Phase::Researcher => self.run_debate(&self.research, state, budget).await,
            Phase::Trader => self.invoke(Role::Trader, state, budget).await,
            Phase::Risk => self.run_debate(&self.risk, state, budget).await,
        }
    }

    async fn run_analysts(
        &self,
        state: &mut SharedState,
        budget: &mut StepBudget,
    ) -> Result<(), AgentError> {
        loop {
            budget.spend(self.dispatcher.name())?;
            let decision = self.dispatcher.decide(state);
            debug!(supervisor = self.dispatcher.name(), route = ?decision.route, "Routing decision");
            state.apply(decision.patch);

            match decision.route {
                Route::Goto(kind) => self.invoke(Role::from(kind), state, budget).await?,
                Route::FanOut(kinds) => return self.fan_out(kinds, state, budget).await,
                Route::Terminate => return Ok(()),
                Route::Wait => {
                    warn!("Analyst dispatcher waiting with nothing outstanding");
                    return Ok(());
                }
            }
        }
    }

    /// Run `kinds` concurrently against one snapshot, merging each result as
    /// it lands and re-entering the dispatcher after every merge.
    async fn fan_out(
        &self,
        kinds: Vec<AnalystKind>,
        state: &mut SharedState,
        budget: &mut StepBudget,
    ) -> Result<(), AgentError> {
        let mut set = JoinSet::new();
        let mut pending: BTreeSet<AnalystKind> = BTreeSet::new();

        for kind in kinds {
            let role = Role::from(kind);
            budget.spend(role.name())?;
            let worker = self.workers.get(role)?;
            let snapshot = state.clone();
            let timeout = self.worker_timeout;
            pending.insert(kind);

            set.spawn(async move {
                let started = Instant::now();
                let result = call_worker(worker.as_ref(), &snapshot, timeout).await;
                (kind, result, started.elapsed())
            });
        }
        info!(branches = pending.len(), "Fanned out analysts");

        let mut terminated = false;
        let mut panic_reason = None;
        while let Some(joined) = set.join_next().await {
            let (kind, result, elapsed) = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(error = %e, "Analyst task panicked");
                    panic_reason = Some(e.to_string());
                    continue;
                }
            };
            pending.remove(&kind);
            self.merge(Role::from(kind), result, elapsed, state);

            // Branches still running after the round ends are drained below
            // without further routing.
            if terminated {
                continue;
            }
            budget.spend(self.dispatcher.name())?;
            let decision = self.dispatcher.decide(state);
            debug!(supervisor = self.dispatcher.name(), route = ?decision.route, "Routing decision");
            state.apply(decision.patch);
            match decision.route {
                Route::Terminate => terminated = true,
                Route::Wait => {}
                other => warn!(route = ?other, "Ignoring re-dispatch while branches are outstanding"),
            }
        }

        // A panicked task cannot report which analyst it was running.
        let reason = panic_reason.unwrap_or_else(|| "task did not complete".to_string());
        for kind in pending {
            self.merge(
                Role::from(kind),
                Err(AgentError::TaskPanicked(reason.clone())),
                Duration::ZERO,
                state,
            );
        }

        if !terminated && !self.dispatcher.is_complete(state) {
            warn!("Analyst round ended with unfilled report slots");
        }
        Ok(())
    }

    async fn run_debate<P: DebateKind>(
        &self,
        coordinator: &DebateCoordinator<P>,
        state: &mut SharedState,
        budget: &mut StepBudget,
    ) -> Result<(), AgentError> {
        loop {
            budget.spend(coordinator.name())?;
            let decision = coordinator.decide(state);
            debug!(supervisor = coordinator.name(), route = ?decision.route, "Routing decision");
            state.apply(decision.patch);

            match decision.route {
                Route::Goto(seat) => self.invoke(P::role(seat), state, budget).await?,
                Route::Terminate => return Ok(()),
                Route::FanOut(_) | Route::Wait => {
                    warn!(supervisor = coordinator.name(), "Debate returned a non-sequential route");
                    return Ok(());
                }
            }
        }
    }

    async fn invoke(
        &self,
        role: Role,
        state: &mut SharedState,
        budget: &mut StepBudget,
    ) -> Result<(), AgentError> {
        budget.spend(role.name())?;
        let worker = self.workers.get(role)?;
        let started = Instant::now();
        let result = call_worker(worker.as_ref(), state, self.worker_timeout).await;
        self.merge(role, result, started.elapsed(), state);
        Ok(())
    }

    /// Apply a worker's result, degrading failures, then stamp the sender.
    fn merge(
        &self,
        role: Role,
        result: Result<StateUpdate, AgentError>,
        elapsed: Duration,
        state: &mut SharedState,
    ) {
        let update = match result {
            Ok(update) => {
                debug!(worker = %role, elapsed_ms = elapsed.as_millis(), "Worker succeeded");
                update
            }
            Err(e) => {
                warn!(worker = %role, error = %e, elapsed_ms = elapsed.as_millis(), "Worker failed");
                role.degraded(&e.to_string())
            }
        };
        state.apply(update);
        state.sender = role.name().to_string();
    }
}

async fn call_worker(
    worker: &dyn Worker,
    state: &SharedState,
    timeout: Duration,
) -> Result<StateUpdate, AgentError> {
    match tokio::time::timeout(timeout, worker.invoke(state)).await {
        Ok(result) => result,
        Err(_) => Err(AgentError::Timeout(timeout.as_secs())),
    }
}

fn collect_debate_roles<P: DebateKind>(
    coordinator: &DebateCoordinator<P>,
    roles: &mut BTreeSet<Role>,
) {
    if coordinator.turn_bound() > 0 {
        roles.extend(coordinator.debaters().iter().map(|p| P::role(Seat::Debater(*p))));
    }
    roles.insert(P::role(Seat::Judge));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scripted_registry;

    #[test]
    fn missing_worker_fails_construction() {
        let registry = WorkerRegistry::new();
        let err = TradingGraph::new(&GraphConfig::default(), registry).err().unwrap();
        assert!(matches!(err, AgentError::MissingWorker(_)));
    }

    #[test]
    fn duplicate_analysts_are_rejected() {
        let mut config = GraphConfig::default();
        config.analysts.enabled = vec![AnalystKind::Market, AnalystKind::Market, AnalystKind::News];

        let (registry, _) = scripted_registry("HOLD");
        let err = TradingGraph::new(&config, registry).err().unwrap();
        assert!(matches!(err, AgentError::Config(ref msg) if msg.contains("market")));
    }

    #[test]
    fn default_config_reaches_every_role() {
        let (registry, _) = scripted_registry("HOLD");
        let graph = TradingGraph::new(&GraphConfig::default(), registry).unwrap();
        assert_eq!(graph.required_roles().len(), Role::ALL.len());
    }

    #[test]
    fn disabled_analysts_and_zero_rounds_shrink_requirements() {
        let mut config = GraphConfig::default();
        config.analysts.enabled = vec![AnalystKind::Market];
        config.debate.max_debate_rounds = 0;

        let (registry, _) = scripted_registry("HOLD");
        let graph = TradingGraph::new(&config, registry).unwrap();
        let roles = graph.required_roles();

        assert!(roles.contains(&Role::Market));
        assert!(!roles.contains(&Role::News));
        assert!(!roles.contains(&Role::Bull));
        assert!(roles.contains(&Role::ResearchManager));
        assert!(roles.contains(&Role::Neutral));
    }

    #[tokio::test]
    async fn timeout_degrades_worker() {
        use crate::test_support::ScriptedWorker;

        let worker = ScriptedWorker::new(Role::Market).with_delay(Duration::from_millis(200));
        let state = SharedState::new("AAPL", "2024-01-02");
        let err = call_worker(&worker, &state, Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Timeout(_)));
    }
}
