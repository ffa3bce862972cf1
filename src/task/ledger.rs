use dashmap::DashMap;
use tracing::debug;

use crate::task::types::{Task, TaskStatus};

/// Record of terminal task outcomes, keyed by task id
///
/// A task is written here exactly when it reaches a terminal status
/// (Completed or NeedsHumanIntervention); the ledger is the task's final
/// resting place for the lifetime of the process. At most one record per
/// id, last writer wins. Entries lock independently, so dependency checks
/// and status scans do not contend with unrelated writes.
pub struct TaskLedger {
    entries: DashMap<String, Task>,
}

/// Aggregate counts over ledger entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerCounts {
    pub completed: usize,
    pub failed: usize,
    pub needs_intervention: usize,
}

impl TaskLedger {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Record a terminal outcome
    pub fn record(&self, task: Task) {
        debug!("Ledger updated: {} -> {}", task.id, task.status);
        self.entries.insert(task.id.clone(), task);
    }

    /// Look up the recorded status of a task id
    pub fn status_of(&self, id: &str) -> Option<TaskStatus> {
        self.entries.get(id).map(|entry| entry.status)
    }

    /// Check whether an id completed successfully
    pub fn is_completed(&self, id: &str) -> bool {
        self.status_of(id) == Some(TaskStatus::Completed)
    }

    /// Clone the full record for a task id
    pub fn get(&self, id: &str) -> Option<Task> {
        self.entries.get(id).map(|entry| entry.clone())
    }

    /// Count entries by terminal status
    pub fn counts(&self) -> LedgerCounts {
        let mut counts = LedgerCounts::default();
        for entry in self.entries.iter() {
            match entry.status {
                TaskStatus::Completed => counts.completed += 1,
                TaskStatus::Failed => counts.failed += 1,
                TaskStatus::NeedsHumanIntervention => counts.needs_intervention += 1,
                _ => {}
            }
        }
        counts
    }

    /// Clone all entries recorded for a given agent
    pub fn tasks_for_agent(&self, agent_name: &str) -> Vec<Task> {
        self.entries
            .iter()
            .filter(|entry| entry.agent_name == agent_name)
            .map(|entry| entry.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TaskLedger {
    fn default() -> Self {
        Self::new()
    }
}
