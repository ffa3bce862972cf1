use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Core task structure: one unit of work routed to a named agent
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub agent_name: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub dependencies: Vec<String>,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
    pub retries: u32,
    pub max_retries: u32,
    /// Times this task was re-enqueued because a dependency had not
    /// completed yet. Tracked separately from `retries` so a slow
    /// dependency can never exhaust the retry budget.
    #[serde(default)]
    pub deferrals: u32,
}

/// Task priority levels; higher numeric value dequeues first
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

/// Task lifecycle status
///
/// Valid transitions: Pending -> InProgress -> Completed | Failed;
/// Failed -> Pending (retry) or Failed -> NeedsHumanIntervention
/// (escalation). Completed and NeedsHumanIntervention are terminal.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    #[serde(rename = "needs_human")]
    NeedsHumanIntervention,
}

/// Task submission record accepted from external producers (task files,
/// API layers) and from the routine generator
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TaskSpec {
    /// Caller-assigned id; generated when absent
    #[serde(default)]
    pub id: Option<String>,
    pub description: String,
    #[serde(alias = "target")]
    pub agent_name: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub max_retries: Option<u32>,
}

/// Default retry budget before a failing task is escalated
pub const DEFAULT_MAX_RETRIES: u32 = 3;

impl Task {
    /// Create a new pending task
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        agent_name: impl Into<String>,
        priority: TaskPriority,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            description: description.into(),
            agent_name: agent_name.into(),
            priority,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
            dependencies: Vec::new(),
            result: None,
            error: None,
            retries: 0,
            max_retries: DEFAULT_MAX_RETRIES,
            deferrals: 0,
        }
    }

    /// Build a task from a submission record, filling in generated fields
    pub fn from_spec(spec: TaskSpec, default_max_retries: u32) -> Self {
        let now = Utc::now();
        let created_at = spec.created_at.unwrap_or(now);
        Self {
            id: spec.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            description: spec.description,
            agent_name: spec.agent_name,
            priority: spec.priority,
            status: TaskStatus::Pending,
            created_at,
            updated_at: created_at,
            dependencies: spec.dependencies,
            result: None,
            error: None,
            retries: 0,
            max_retries: spec.max_retries.unwrap_or(default_max_retries),
            deferrals: 0,
        }
    }

    /// Add dependency ids that must complete before this task dispatches
    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Override the retry budget
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Move to a new status, refreshing `updated_at`
    pub fn transition(&mut self, status: TaskStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Check if task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            TaskStatus::Completed | TaskStatus::NeedsHumanIntervention
        )
    }

    /// Check if the retry budget still allows another attempt
    pub fn can_retry(&self) -> bool {
        self.retries < self.max_retries
    }
}

impl TaskPriority {
    /// Get numeric value for ordering and display
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Critical => "critical",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "critical" => Ok(TaskPriority::Critical),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::NeedsHumanIntervention => "needs_human",
        };
        write!(f, "{}", name)
    }
}
