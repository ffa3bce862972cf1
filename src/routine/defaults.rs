//! Default business routine catalogue
//!
//! The recurring operational jobs: daily morning and evening routines,
//! hourly checks, weekly planning, and weekly review. Task ids embed the
//! firing period so a re-run inside the same period cannot duplicate work.

use anyhow::Result;
use chrono::{DateTime, Local};

use super::{RoutineJob, Trigger};
use crate::config::RoutineConfig;
use crate::task::{Task, TaskPriority};

/// Department agent names the default routines dispatch to
pub const DEPARTMENTS: [&str; 8] = [
    "customer_support",
    "sales",
    "development",
    "marketing",
    "admin",
    "design",
    "finance",
    "orchestrator",
];

/// Build the default routine jobs from configured trigger times
pub fn business_routines(config: &RoutineConfig) -> Result<Vec<RoutineJob>> {
    let morning = config.morning_time()?;
    let evening = config.evening_time()?;
    let (planning_day, planning_time) = config.planning()?;
    let (review_day, review_time) = config.review()?;
    let hourly_minute = config.hourly_minute;

    Ok(vec![
        RoutineJob::new("morning", Trigger::Daily { at: morning }, morning_tasks),
        RoutineJob::new("evening", Trigger::Daily { at: evening }, evening_tasks),
        RoutineJob::new(
            "hourly",
            Trigger::Hourly {
                minute: hourly_minute,
            },
            hourly_tasks,
        ),
        RoutineJob::new(
            "weekly-planning",
            Trigger::Weekly {
                weekday: planning_day,
                at: planning_time,
            },
            planning_tasks,
        ),
        RoutineJob::new(
            "weekly-review",
            Trigger::Weekly {
                weekday: review_day,
                at: review_time,
            },
            review_tasks,
        ),
    ])
}

fn date_key(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d").to_string()
}

fn hour_key(now: DateTime<Local>) -> String {
    now.format("%Y%m%d-%H").to_string()
}

fn morning_tasks(now: DateTime<Local>) -> Vec<Task> {
    let date = date_key(now);
    vec![
        Task::new(
            format!("morning-review-{}", date),
            "Review overnight customer support tickets and prioritize responses",
            "customer_support",
            TaskPriority::High,
        ),
        Task::new(
            format!("daily-standup-{}", date),
            "Prepare daily standup agenda and project status updates",
            "admin",
            TaskPriority::Medium,
        ),
        Task::new(
            format!("social-content-{}", date),
            "Schedule today's social media posts based on content calendar",
            "marketing",
            TaskPriority::Medium,
        ),
    ]
}

fn evening_tasks(now: DateTime<Local>) -> Vec<Task> {
    let date = date_key(now);
    vec![
        Task::new(
            format!("daily-summary-{}", date),
            "Generate end-of-day summary report for all departments",
            "orchestrator",
            TaskPriority::Medium,
        ),
        Task::new(
            format!("cash-position-{}", date),
            "Update daily cash position and next-day forecast",
            "finance",
            TaskPriority::Medium,
        ),
    ]
}

fn hourly_tasks(now: DateTime<Local>) -> Vec<Task> {
    let hour = hour_key(now);
    vec![
        Task::new(
            format!("support-check-{}", hour),
            "Check for new high-priority support tickets",
            "customer_support",
            TaskPriority::High,
        ),
        Task::new(
            format!("dev-check-{}", hour),
            "Check for blocked development tasks and PR status",
            "development",
            TaskPriority::Medium,
        ),
    ]
}

fn planning_tasks(now: DateTime<Local>) -> Vec<Task> {
    let date = date_key(now);
    vec![
        Task::new(
            format!("sprint-planning-{}", date),
            "Prepare sprint planning materials and resource allocations",
            "development",
            TaskPriority::High,
        ),
        Task::new(
            format!("content-planning-{}", date),
            "Plan next week's content calendar and marketing activities",
            "marketing",
            TaskPriority::Medium,
        ),
        Task::new(
            format!("cash-forecast-{}", date),
            "Generate weekly cash flow forecast and payment schedule",
            "finance",
            TaskPriority::High,
        ),
    ]
}

fn review_tasks(now: DateTime<Local>) -> Vec<Task> {
    let date = date_key(now);
    vec![
        Task::new(
            format!("week-review-{}", date),
            "Generate weekly performance report across all departments",
            "orchestrator",
            TaskPriority::High,
        ),
        Task::new(
            format!("marketing-metrics-{}", date),
            "Analyze weekly marketing metrics and campaign performance",
            "marketing",
            TaskPriority::Medium,
        ),
    ]
}
