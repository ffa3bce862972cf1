#[cfg(test)]
mod tests {
    use crate::agent::{AgentRegistry, StaticAgent};
    use crate::config::SystemConfig;
    use crate::system::dispatch::{DependencyState, dependency_state};
    use crate::system::{AgentSystem, SystemError};
    use crate::task::{Task, TaskLedger, TaskPriority, TaskStatus};
    use std::sync::Arc;

    fn ledgered(id: &str, status: TaskStatus) -> Task {
        let mut task = Task::new(id, "done work", "admin", TaskPriority::Medium);
        task.transition(status);
        task
    }

    #[test]
    fn test_gate_ready_without_dependencies() {
        let ledger = TaskLedger::new();
        let task = Task::new("t1", "standalone", "admin", TaskPriority::Medium);

        assert_eq!(dependency_state(&task, &ledger), DependencyState::Ready);
    }

    #[test]
    fn test_gate_waits_for_absent_dependency() {
        let ledger = TaskLedger::new();
        let task = Task::new("t2", "dependent", "admin", TaskPriority::High)
            .with_dependencies(vec!["t1".to_string()]);

        assert_eq!(dependency_state(&task, &ledger), DependencyState::Waiting);
    }

    #[test]
    fn test_gate_ready_when_dependency_completed() {
        let ledger = TaskLedger::new();
        ledger.record(ledgered("t1", TaskStatus::Completed));
        let task = Task::new("t2", "dependent", "admin", TaskPriority::High)
            .with_dependencies(vec!["t1".to_string()]);

        assert_eq!(dependency_state(&task, &ledger), DependencyState::Ready);
    }

    #[test]
    fn test_gate_dead_when_dependency_escalated() {
        let ledger = TaskLedger::new();
        ledger.record(ledgered("t1", TaskStatus::NeedsHumanIntervention));
        let task = Task::new("t2", "dependent", "admin", TaskPriority::Critical)
            .with_dependencies(vec!["t1".to_string()]);

        assert_eq!(
            dependency_state(&task, &ledger),
            DependencyState::Dead {
                dependency: "t1".to_string()
            }
        );
    }

    #[test]
    fn test_gate_requires_all_dependencies() {
        let ledger = TaskLedger::new();
        ledger.record(ledgered("t1", TaskStatus::Completed));
        let task = Task::new("t3", "dependent", "admin", TaskPriority::Medium)
            .with_dependencies(vec!["t1".to_string(), "t2".to_string()]);

        assert_eq!(dependency_state(&task, &ledger), DependencyState::Waiting);
    }

    #[tokio::test]
    async fn test_status_on_fresh_system() {
        let mut registry = AgentRegistry::new();
        registry.register(Arc::new(StaticAgent::new("admin")));
        let system = AgentSystem::new(SystemConfig::default(), registry);

        let status = system.system_status().await;
        assert!(!status.running);
        assert_eq!(status.pending_tasks, 0);
        assert_eq!(status.in_progress_tasks, 0);
        assert_eq!(status.completed_tasks, 0);
        assert_eq!(status.needs_intervention, 0);
        assert_eq!(status.registered_agents, vec!["admin"]);
    }

    #[tokio::test]
    async fn test_agent_performance_unknown_agent() {
        let system = AgentSystem::new(SystemConfig::default(), AgentRegistry::new());

        let err = system.agent_performance("ghost").await.unwrap_err();
        assert!(matches!(err, SystemError::UnknownAgent { name } if name == "ghost"));
    }

    #[tokio::test]
    async fn test_agent_performance_empty_history() {
        let mut registry = AgentRegistry::new();
        registry.register(Arc::new(StaticAgent::new("finance")));
        let system = AgentSystem::new(SystemConfig::default(), registry);

        let perf = system.agent_performance("finance").await.unwrap();
        assert_eq!(perf.total_tasks, 0);
        assert_eq!(perf.completed_tasks, 0);
        assert_eq!(perf.success_rate, 0.0);
        assert_eq!(perf.average_completion_seconds, 0.0);
    }
}
