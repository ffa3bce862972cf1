use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tokio::sync::{Mutex, Notify};
use tracing::debug;

use crate::task::types::{Task, TaskPriority};

/// A queued task with its insertion sequence number
///
/// Ordering: higher priority first; within a priority tier, lower sequence
/// number (earlier enqueue) first. Re-enqueued tasks receive a fresh
/// sequence number, so retries join the back of their tier.
#[derive(Debug)]
struct QueuedTask {
    priority: TaskPriority,
    seq: u64,
    task: Task,
}

impl Eq for QueuedTask {}

impl PartialEq for QueuedTask {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: higher priority wins, then earlier insertion
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct QueueInner {
    heap: BinaryHeap<QueuedTask>,
    next_seq: u64,
}

/// Thread-safe priority queue of pending tasks
///
/// Shared by the dispatch loop, the routine generator, retrying workers,
/// and external submitters. `try_pop` never blocks; consumers that want to
/// sleep on an empty queue combine [`TaskQueue::wait_for_task`] with a
/// bounded timeout.
pub struct TaskQueue {
    inner: Mutex<QueueInner>,
    notify: Notify,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                heap: BinaryHeap::new(),
                next_seq: 0,
            }),
            notify: Notify::new(),
        }
    }

    /// Insert a task, assigning the next sequence number
    pub async fn push(&self, task: Task) {
        let mut inner = self.inner.lock().await;
        let seq = inner.next_seq;
        inner.next_seq += 1;

        debug!(
            "Task enqueued: {} (priority {}, seq {})",
            task.id, task.priority, seq
        );

        inner.heap.push(QueuedTask {
            priority: task.priority,
            seq,
            task,
        });
        drop(inner);

        self.notify.notify_waiters();
    }

    /// Remove and return the highest-priority task, or `None` immediately
    /// if the queue is empty
    pub async fn try_pop(&self) -> Option<Task> {
        let mut inner = self.inner.lock().await;
        inner.heap.pop().map(|queued| queued.task)
    }

    /// Wait until a task is pushed
    ///
    /// A push between the caller's last `try_pop` and this call is not
    /// observed; callers must pair this with a timeout.
    pub async fn wait_for_task(&self) {
        self.notify.notified().await;
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.heap.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.heap.is_empty()
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}
