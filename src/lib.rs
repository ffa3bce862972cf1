//! # Agent Orchestration System
//!
//! A Rust-based multi-agent orchestration system for business operations.
//! A priority-ordered work queue dispatches tasks to a bounded pool of
//! concurrent agents, enforces inter-task dependency ordering, retries
//! transient failures with a bounded budget, and escalates exhausted
//! failures for human intervention.
//!
//! ## Architecture Overview
//!
//! The system consists of several key components organized into modules:
//!
//! - **[`task`]**: Task data model, priority queue, and terminal-outcome ledger
//! - **[`agent`]**: Pluggable agent capability trait and startup-resolved registry
//! - **[`system`]**: Dispatch loop, worker pool, retry/escalation policy, status queries
//! - **[`routine`]**: Wall-clock generator that synthesizes recurring business tasks
//! - **[`config`]**: TOML configuration with compiled defaults
//!
//! ## Features
//!
//! ### 🎯 Task Orchestration
//! - **Priority Scheduling**: Four priority tiers with FIFO ordering inside each tier
//! - **Dependency Gating**: Tasks dispatch only after their prerequisites complete
//! - **Bounded Concurrency**: Semaphore-limited worker pool, panic-isolated execution
//! - **Retry and Escalation**: Bounded retry budget, terminal human-intervention state
//!
//! ### ⏰ Periodic Routines
//! - **Wall-Clock Triggers**: Daily, hourly, and weekly business routines
//! - **Deterministic Ids**: Date-derived task ids prevent same-period duplicates
//!
//! ### 📊 Observability
//! - **System Status**: Queue depth, in-flight count, and ledger totals on demand
//! - **Agent Performance**: Per-agent completion counts and average latency
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aos::{AgentRegistry, AgentSystem, StaticAgent, SystemConfig, TaskSpec};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut registry = AgentRegistry::new();
//!     registry.register(Arc::new(StaticAgent::new("finance")));
//!
//!     let system = AgentSystem::new(SystemConfig::default(), registry);
//!     system.start();
//!
//!     let task_id = system
//!         .submit(TaskSpec {
//!             id: None,
//!             description: "Update daily cash position".to_string(),
//!             agent_name: "finance".to_string(),
//!             priority: Default::default(),
//!             created_at: None,
//!             dependencies: Vec::new(),
//!             max_retries: None,
//!         })
//!         .await;
//!
//!     println!("Submitted task: {}", task_id);
//!     Ok(())
//! }
//! ```

/// Task data model and runtime structures.
///
/// Defines the task record with its priority and status lifecycle, the
/// thread-safe priority queue, and the ledger of terminal outcomes.
pub mod task;

/// Agent capability boundary.
///
/// The `Agent` trait every executor implements, the registry that resolves
/// task targets to implementations, and a trivial built-in agent.
pub mod agent;

/// System orchestration.
///
/// The `AgentSystem` service object: dispatch loop, dependency gate,
/// bounded worker pool, retry/escalation policy, and status queries.
pub mod system;

/// Periodic task generation.
///
/// Wall-clock triggers and the routine catalogue that feeds recurring
/// business tasks into the scheduler.
pub mod routine;

/// System configuration loading.
pub mod config;

// Re-export main task types
pub use task::{Task, TaskLedger, TaskPriority, TaskQueue, TaskSpec, TaskStatus};

// Re-export agent types
pub use agent::{Agent, AgentError, AgentRegistry, StaticAgent};

// Re-export system types
pub use system::{AgentPerformance, AgentSystem, SystemError, SystemStatus};

// Re-export routine types
pub use routine::{DEPARTMENTS, RoutineJob, RoutineScheduler, Trigger, business_routines};

// Re-export configuration
pub use config::{RoutineConfig, SystemConfig};

// CLI module for command-line interface
pub mod cli;
