//! System orchestration
//!
//! [`AgentSystem`] is the explicitly constructed service object that owns
//! the task queue, the completed-task ledger, the agent registry, the
//! worker pool, and the running flag. All background loops and status
//! callers reach shared state through one `Arc`; there are no module-level
//! singletons.

mod dispatch;

#[cfg(test)]
mod tests;

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::agent::AgentRegistry;
use crate::config::SystemConfig;
use crate::routine::{RoutineScheduler, business_routines};
use crate::task::{Task, TaskLedger, TaskQueue, TaskSpec, TaskStatus};

/// System-level errors surfaced to callers
#[derive(Debug, Clone, Error)]
pub enum SystemError {
    #[error("no agent registered with name: {name}")]
    UnknownAgent { name: String },
}

/// Atomic execution counters, aggregated into [`SystemStatus`]
#[derive(Debug, Default)]
pub struct SystemStats {
    pub dispatched: AtomicU64,
    pub completed: AtomicU64,
    pub failed_attempts: AtomicU64,
    pub escalated: AtomicU64,
    pub deferrals: AtomicU64,
}

/// Snapshot of system health returned by [`AgentSystem::system_status`]
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SystemStatus {
    pub running: bool,
    pub pending_tasks: usize,
    pub in_progress_tasks: usize,
    pub completed_tasks: usize,
    pub failed_attempts: u64,
    pub needs_intervention: usize,
    pub registered_agents: Vec<String>,
}

/// Per-agent performance metrics over ledgered outcomes
#[derive(Debug, Clone, Serialize)]
pub struct AgentPerformance {
    pub agent_name: String,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub failed_tasks: usize,
    pub success_rate: f64,
    pub average_completion_seconds: f64,
}

/// Shared state reachable from the dispatch loop, workers, the routine
/// generator, and status queries
pub(crate) struct SystemInner {
    pub(crate) config: SystemConfig,
    pub(crate) queue: Arc<TaskQueue>,
    pub(crate) ledger: TaskLedger,
    pub(crate) registry: AgentRegistry,
    pub(crate) running: Arc<AtomicBool>,
    pub(crate) slots: Arc<Semaphore>,
    pub(crate) stats: SystemStats,
}

/// Main controller for agent task orchestration
pub struct AgentSystem {
    inner: Arc<SystemInner>,
    handles: std::sync::Mutex<Vec<JoinHandle<()>>>,
}

impl AgentSystem {
    /// Create a stopped system with the given configuration and a registry
    /// resolved by the caller at startup
    pub fn new(config: SystemConfig, registry: AgentRegistry) -> Self {
        let slots = Arc::new(Semaphore::new(config.max_workers));
        Self {
            inner: Arc::new(SystemInner {
                config,
                queue: Arc::new(TaskQueue::new()),
                ledger: TaskLedger::new(),
                registry,
                running: Arc::new(AtomicBool::new(false)),
                slots,
                stats: SystemStats::default(),
            }),
            handles: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Submit an external task record; returns the task id
    pub async fn submit(&self, spec: TaskSpec) -> String {
        let task = Task::from_spec(spec, self.inner.config.default_max_retries);
        let id = task.id.clone();
        self.submit_task(task).await;
        id
    }

    /// Enqueue an already-built task
    pub async fn submit_task(&self, task: Task) {
        info!(
            "Task added: {} - {} (Priority: {})",
            task.id, task.description, task.priority
        );
        self.inner.queue.push(task).await;
    }

    /// Start the dispatch loop and, when enabled, the routine generator
    ///
    /// Must be called from within a tokio runtime. Calling `start` on a
    /// running system is a no-op.
    pub fn start(&self) {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            warn!("Agent system is already running");
            return;
        }

        info!(
            "Agent system started ({} workers, {} agents)",
            self.inner.config.max_workers,
            self.inner.registry.len()
        );

        let mut handles = self.handles.lock().expect("handle registry poisoned");
        handles.push(tokio::spawn(dispatch::run_dispatch_loop(
            self.inner.clone(),
        )));

        if self.inner.config.routines.enabled {
            match business_routines(&self.inner.config.routines) {
                Ok(jobs) => {
                    let scheduler = RoutineScheduler::new(jobs);
                    handles.push(tokio::spawn(scheduler.run(
                        self.inner.queue.clone(),
                        self.inner.running.clone(),
                    )));
                }
                Err(e) => {
                    warn!("Routine generator disabled, invalid trigger config: {}", e);
                }
            }
        }
    }

    /// Stop dispatching new tasks
    ///
    /// Abrupt: the dispatch and routine loops exit at their next flag
    /// check, while in-flight executions run to completion unobserved.
    /// Callers that need quiescence follow up with [`AgentSystem::drain`].
    pub fn stop(&self) {
        info!("Stopping agent system");
        self.inner.running.store(false, Ordering::SeqCst);
    }

    /// Wait until every worker slot is idle
    ///
    /// Graceful-drain extension to the abrupt [`AgentSystem::stop`]; call
    /// after `stop` so the dispatch loop is no longer competing for slots.
    pub async fn drain(&self) {
        let total = self.inner.config.max_workers as u32;
        if let Ok(permits) = self.inner.slots.acquire_many(total).await {
            drop(permits);
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Current counts across queue, pool, and ledger
    ///
    /// Idempotent: repeated calls without intervening task activity return
    /// identical snapshots. Individual task errors never fail this query.
    pub async fn system_status(&self) -> SystemStatus {
        let counts = self.inner.ledger.counts();
        SystemStatus {
            running: self.is_running(),
            pending_tasks: self.inner.queue.len().await,
            in_progress_tasks: self.inner.config.max_workers
                - self.inner.slots.available_permits(),
            completed_tasks: counts.completed,
            failed_attempts: self.inner.stats.failed_attempts.load(Ordering::Relaxed),
            needs_intervention: counts.needs_intervention,
            registered_agents: self.inner.registry.names(),
        }
    }

    /// Performance metrics for one registered agent
    pub async fn agent_performance(&self, agent_name: &str) -> Result<AgentPerformance, SystemError> {
        if !self.inner.registry.contains(agent_name) {
            return Err(SystemError::UnknownAgent {
                name: agent_name.to_string(),
            });
        }

        let tasks = self.inner.ledger.tasks_for_agent(agent_name);
        let completed: Vec<_> = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .collect();
        let failed = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::NeedsHumanIntervention)
            .count();

        let average_completion_seconds = if completed.is_empty() {
            0.0
        } else {
            let total_ms: i64 = completed
                .iter()
                .map(|t| (t.updated_at - t.created_at).num_milliseconds())
                .sum();
            total_ms as f64 / 1000.0 / completed.len() as f64
        };

        let success_rate = if tasks.is_empty() {
            0.0
        } else {
            completed.len() as f64 / tasks.len() as f64
        };

        Ok(AgentPerformance {
            agent_name: agent_name.to_string(),
            total_tasks: tasks.len(),
            completed_tasks: completed.len(),
            failed_tasks: failed,
            success_rate,
            average_completion_seconds,
        })
    }

    /// Clone the ledger record for a task id, if it reached a terminal state
    pub fn ledger_entry(&self, task_id: &str) -> Option<Task> {
        self.inner.ledger.get(task_id)
    }
}
