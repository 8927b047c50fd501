use tradegraph_models::{AnalystKind, DispatchMode, SharedState};

use super::{advance, position_of, Decision, Route, Supervisor};

/// Fans the analysis phase out to a fixed set of analysts.
///
/// Serial mode walks the set one analyst at a time. Parallel mode fans out to
/// all of them on first entry, then acts as a join barrier: it keeps
/// answering [`Route::Wait`] until every analyst's report slot is filled.
pub struct AnalystDispatcher {
    analysts: Vec<AnalystKind>,
    mode: DispatchMode,
}

impl AnalystDispatcher {
    pub fn new(analysts: Vec<AnalystKind>, mode: DispatchMode) -> Self {
        Self { analysts, mode }
    }

    pub fn analysts(&self) -> &[AnalystKind] {
        &self.analysts
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Join condition: every dispatched analyst has written its slot.
    pub fn is_complete(&self, state: &SharedState) -> bool {
        self.analysts
            .iter()
            .all(|a| state.reports.is_filled(a.report_slot()))
    }
}

impl Default for AnalystDispatcher {
    fn default() -> Self {
        Self::new(AnalystKind::ALL.to_vec(), DispatchMode::Serial)
    }
}

impl Supervisor for AnalystDispatcher {
    type Target = AnalystKind;

    fn name(&self) -> &str {
        "analyst_supervisor"
    }

    fn decide(&self, state: &SharedState) -> Decision<AnalystKind> {
        let route = match self.mode {
            DispatchMode::Serial => advance(&self.analysts, &state.sender),
            DispatchMode::Parallel => {
                if self.analysts.is_empty() {
                    Route::Terminate
                } else if position_of(&self.analysts, &state.sender).is_none() {
                    Route::FanOut(self.analysts.clone())
                } else if self.is_complete(state) {
                    Route::Terminate
                } else {
                    Route::Wait
                }
            }
        };
        Decision::new(route)
    }
}
