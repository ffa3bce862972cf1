use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use super::Agent;

/// Name-to-capability map resolved once at startup
///
/// The registry is built before the system starts and never mutated
/// afterwards, so lookups need no locking. Unknown names surface as a
/// typed error at dispatch time rather than a generic lookup failure.
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self {
            agents: HashMap::new(),
        }
    }

    /// Register an agent under its own name; replaces any previous
    /// registration for that name
    pub fn register(&mut self, agent: Arc<dyn Agent>) {
        let name = agent.name().to_string();
        info!("Agent registered: {}", name);
        self.agents.insert(name, agent);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Agent>> {
        self.agents.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    /// Sorted list of registered agent names
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.agents.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
