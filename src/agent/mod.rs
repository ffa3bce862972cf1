//! Agent capability boundary
//!
//! An agent turns a task description into a result payload. The core makes
//! no assumption about what happens inside `invoke` (LLM call, remote API,
//! pure computation); it requires only that the call completes in bounded
//! time and signals success or failure deterministically.

pub mod registry;


pub use registry::*;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors raised by agent capabilities during task execution
///
/// All agent errors are treated as transient by the retry policy; an agent
/// that cannot ever succeed should not be registered.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error("agent execution failed: {message}")]
    Execution { message: String },

    #[error("agent rejected task description: {reason}")]
    InvalidDescription { reason: String },
}

impl AgentError {
    /// Convenience constructor for the common execution-failure case
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }
}

/// Pluggable executor capability named by a task's `agent_name`
#[async_trait]
pub trait Agent: Send + Sync {
    /// Registry name this agent is resolved under
    fn name(&self) -> &str;

    /// Perform the work described by the opaque task description
    async fn invoke(&self, description: &str) -> Result<Value, AgentError>;
}

/// Trivial agent returning a fixed acknowledgment payload
///
/// Used by the demo binary and tests; real deployments register agents
/// that talk to actual business systems.
pub struct StaticAgent {
    name: String,
    latency: Option<std::time::Duration>,
}

impl StaticAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latency: None,
        }
    }

    /// Simulate work by sleeping before responding
    pub fn with_latency(mut self, latency: std::time::Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[async_trait]
impl Agent for StaticAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, description: &str) -> Result<Value, AgentError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(serde_json::json!({
            "agent": self.name,
            "handled": description,
        }))
    }
}
