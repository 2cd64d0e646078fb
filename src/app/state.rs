use super::{LifecyclePhase, Orchestrator, ResourceState};

impl Orchestrator {
    /// Current orchestrator phase
    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    /// Get resource state
    pub fn resource_state(&self, name: &str) -> Option<ResourceState> {
        self.handles
            .iter()
            .find(|handle| handle.name() == name)
            .map(|handle| handle.state())
    }

    /// Get all resource states in startup order
    pub fn resource_states(&self) -> Vec<(String, ResourceState)> {
        self.handles
            .iter()
            .map(|handle| (handle.name().to_string(), handle.state()))
            .collect()
    }
}
