//! Periodic task generation
//!
//! A cooperative timer loop, independent of the dispatch loop, that checks
//! wall-clock triggers roughly once per second and enqueues the tasks a due
//! routine builds. Firing is deduplicated per period through deterministic
//! period keys, so re-checking the same minute does not duplicate tasks.
//! Missed periods (process down at the trigger minute) are not backfilled;
//! this is a best-effort wall-clock scheduler, not a durable cron.

pub mod defaults;


pub use defaults::{DEPARTMENTS, business_routines};

use chrono::{DateTime, Datelike, Local, NaiveTime, Timelike, Weekday};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::task::{Task, TaskQueue};

/// Wall-clock trigger for a routine job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Fires once per day at the given time
    Daily { at: NaiveTime },
    /// Fires once per hour at the given minute
    Hourly { minute: u32 },
    /// Fires once per week on the given day and time
    Weekly { weekday: Weekday, at: NaiveTime },
}

impl Trigger {
    /// Period key if the trigger is due at `now`, `None` otherwise
    ///
    /// The key identifies the period a firing belongs to (calendar day or
    /// day-hour), so a job fires at most once per period no matter how many
    /// ticks fall inside the trigger minute.
    pub fn due_key(&self, now: DateTime<Local>) -> Option<String> {
        match self {
            Trigger::Daily { at } => (now.hour() == at.hour() && now.minute() == at.minute())
                .then(|| now.format("%Y-%m-%d").to_string()),
            Trigger::Hourly { minute } => {
                (now.minute() == *minute).then(|| now.format("%Y%m%d-%H").to_string())
            }
            Trigger::Weekly { weekday, at } => (now.weekday() == *weekday
                && now.hour() == at.hour()
                && now.minute() == at.minute())
            .then(|| now.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Builds the tasks for one firing of a routine
pub type TaskBuilder = Box<dyn Fn(DateTime<Local>) -> Vec<Task> + Send + Sync>;

/// A named periodic job: trigger plus task builder
pub struct RoutineJob {
    pub name: String,
    pub trigger: Trigger,
    builder: TaskBuilder,
}

impl RoutineJob {
    pub fn new(
        name: impl Into<String>,
        trigger: Trigger,
        builder: impl Fn(DateTime<Local>) -> Vec<Task> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            trigger,
            builder: Box::new(builder),
        }
    }

    pub fn build(&self, now: DateTime<Local>) -> Vec<Task> {
        (self.builder)(now)
    }
}

/// Timer loop that feeds due routine tasks into the scheduler queue
pub struct RoutineScheduler {
    jobs: Vec<RoutineJob>,
    fired: HashMap<String, String>,
}

impl RoutineScheduler {
    pub fn new(jobs: Vec<RoutineJob>) -> Self {
        Self {
            jobs,
            fired: HashMap::new(),
        }
    }

    /// Collect tasks from every job due at `now` that has not fired for
    /// the current period yet
    pub fn poll(&mut self, now: DateTime<Local>) -> Vec<Task> {
        let mut due = Vec::new();
        for job in &self.jobs {
            let Some(key) = job.trigger.due_key(now) else {
                continue;
            };
            if self.fired.get(&job.name).is_some_and(|fired| *fired == key) {
                continue;
            }
            let tasks = job.build(now);
            info!(
                "Routine '{}' fired for period {} ({} tasks)",
                job.name,
                key,
                tasks.len()
            );
            due.extend(tasks);
            self.fired.insert(job.name.clone(), key);
        }
        due
    }

    /// Tick once per second until the running flag clears
    pub async fn run(mut self, queue: Arc<TaskQueue>, running: Arc<AtomicBool>) {
        info!("Routine generator started with {} jobs", self.jobs.len());

        let mut tick = tokio::time::interval(Duration::from_secs(1));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while running.load(Ordering::SeqCst) {
            tick.tick().await;
            for task in self.poll(Local::now()) {
                queue.push(task).await;
            }
        }

        info!("Routine generator stopped");
    }
}
