//! Dispatch loop, dependency gate, and worker execution
//!
//! A single loop pops tasks from the priority queue, gates them on their
//! dependencies' ledger entries, and hands ready tasks to semaphore-bounded
//! worker tasks. Workers apply the retry/escalation policy after every
//! attempt. Nothing in this path can take down the loop or the pool: agent
//! errors and panics are converted into task failures.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::OwnedSemaphorePermit;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::{SystemError, SystemInner};
use crate::task::{Task, TaskLedger, TaskStatus};

/// Outcome of checking a task's prerequisites against the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DependencyState {
    /// All dependencies completed; dispatch now
    Ready,
    /// At least one dependency has not completed yet; re-enqueue
    Waiting,
    /// A dependency reached a terminal non-completed state; this task can
    /// never become ready
    Dead { dependency: String },
}

/// Dependency gate: a task is ready iff every dependency id is in the
/// ledger with status Completed
pub(crate) fn dependency_state(task: &Task, ledger: &TaskLedger) -> DependencyState {
    for dependency in &task.dependencies {
        match ledger.status_of(dependency) {
            Some(TaskStatus::Completed) => continue,
            Some(TaskStatus::Failed) | Some(TaskStatus::NeedsHumanIntervention) => {
                return DependencyState::Dead {
                    dependency: dependency.clone(),
                };
            }
            _ => return DependencyState::Waiting,
        }
    }
    DependencyState::Ready
}

/// Main dispatch loop; runs until the system's running flag is cleared
pub(crate) async fn run_dispatch_loop(inner: Arc<SystemInner>) {
    info!("Dispatch loop started");
    let idle_wait = Duration::from_millis(inner.config.idle_wait_ms);

    while inner.running.load(Ordering::SeqCst) {
        // Take a pool slot before dequeuing so a full pool backs the loop
        // off without holding a dequeued task. The timeout bounds how long
        // a shutdown request waits for the next flag check.
        let permit = match timeout(idle_wait, inner.slots.clone().acquire_owned()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => break,
            Err(_) => continue,
        };

        match next_ready_task(&inner).await {
            Some(task) => {
                inner.stats.dispatched.fetch_add(1, Ordering::Relaxed);
                let worker_inner = inner.clone();
                tokio::spawn(execute_task(worker_inner, task, permit));
            }
            None => {
                drop(permit);
                tokio::select! {
                    _ = inner.queue.wait_for_task() => {}
                    _ = tokio::time::sleep(idle_wait) => {}
                }
            }
        }
    }

    info!("Dispatch loop stopped");
}

/// Pop until a ready task is found, re-enqueueing gated tasks
///
/// Gated entries are set aside so the sweep can reach ready tasks behind
/// them; they return to the back of their priority tier with a fresh
/// sequence number.
async fn next_ready_task(inner: &Arc<SystemInner>) -> Option<Task> {
    let mut deferred: Vec<Task> = Vec::new();
    let mut ready = None;

    while let Some(mut task) = inner.queue.try_pop().await {
        match dependency_state(&task, &inner.ledger) {
            DependencyState::Ready => {
                ready = Some(task);
                break;
            }
            DependencyState::Waiting => {
                task.deferrals += 1;
                inner.stats.deferrals.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "Task {} waiting for dependencies, re-enqueued (deferral {})",
                    task.id, task.deferrals
                );
                deferred.push(task);
            }
            DependencyState::Dead { dependency } => {
                warn!(
                    "Task {} depends on terminally failed task {}, escalating",
                    task.id, dependency
                );
                escalate(
                    inner,
                    task,
                    format!("dependency '{}' failed and will never complete", dependency),
                );
            }
        }
    }

    for task in deferred {
        inner.queue.push(task).await;
    }
    ready
}

/// Worker body: run one attempt and apply the retry/escalation policy
async fn execute_task(inner: Arc<SystemInner>, mut task: Task, _permit: OwnedSemaphorePermit) {
    task.transition(TaskStatus::InProgress);
    info!("Processing task: {} - {}", task.id, task.description);

    let Some(agent) = inner.registry.get(&task.agent_name) else {
        // Missing registration is a configuration failure, not a
        // transient one; escalate on first dispatch.
        let err = SystemError::UnknownAgent {
            name: task.agent_name.clone(),
        };
        task.transition(TaskStatus::Failed);
        escalate(&inner, task, err.to_string());
        return;
    };

    let attempt = AssertUnwindSafe(agent.invoke(&task.description))
        .catch_unwind()
        .await;

    match attempt {
        Ok(Ok(result)) => {
            task.result = Some(result);
            task.transition(TaskStatus::Completed);
            inner.stats.completed.fetch_add(1, Ordering::Relaxed);
            info!("Task completed: {}", task.id);
            inner.ledger.record(task);
        }
        Ok(Err(agent_error)) => {
            handle_failure(&inner, task, agent_error.to_string()).await;
        }
        Err(panic) => {
            handle_failure(&inner, task, panic_message(panic)).await;
        }
    }
}

/// Retry policy applied after a failed attempt
async fn handle_failure(inner: &Arc<SystemInner>, mut task: Task, error: String) {
    inner.stats.failed_attempts.fetch_add(1, Ordering::Relaxed);
    task.transition(TaskStatus::Failed);
    task.error = Some(error.clone());
    error!("Task failed: {} - {}", task.id, error);

    if task.can_retry() {
        task.retries += 1;
        task.transition(TaskStatus::Pending);
        info!(
            "Requeuing task: {} (attempt {}/{})",
            task.id, task.retries, task.max_retries
        );
        inner.queue.push(task).await;
    } else {
        escalate(inner, task, error);
    }
}

/// Terminal escalation: record the task as needing human intervention
fn escalate(inner: &Arc<SystemInner>, mut task: Task, reason: String) {
    warn!("Task {} requires human intervention: {}", task.id, reason);
    task.error = Some(reason);
    task.transition(TaskStatus::NeedsHumanIntervention);
    inner.stats.escalated.fetch_add(1, Ordering::Relaxed);
    inner.ledger.record(task);
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("agent panicked: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("agent panicked: {}", message)
    } else {
        "agent panicked".to_string()
    }
}
