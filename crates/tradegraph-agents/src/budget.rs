use crate::error::AgentError;

/// One step counter for the whole run, shared by every nesting level.
#[derive(Debug, Clone)]
pub struct StepBudget {
    limit: u32,
    used: u32,
}

impl StepBudget {
    pub fn new(limit: u32) -> Self {
        Self { limit, used: 0 }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }

    /// Charge one step for `node`.
    pub fn spend(&mut self, node: &str) -> Result<(), AgentError> {
        if self.used >= self.limit {
            return Err(AgentError::StepBudgetExhausted {
                limit: self.limit,
                node: node.to_string(),
            });
        }
        self.used += 1;
        Ok(())
    }
}
