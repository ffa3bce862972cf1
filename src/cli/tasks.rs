//! Task file loading
//!
//! External producers hand the system work as JSON files containing an
//! array of task submission records. This is a thin persistence surface;
//! the scheduler queue and ledger remain the authoritative runtime
//! structures.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::task::TaskSpec;

#[derive(Debug, Error)]
pub enum TaskFileError {
    #[error("Task file '{path}' not found")]
    NotFound { path: PathBuf },

    #[error("IO error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Task parsing error in '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Load a JSON array of task records from a file
pub fn load_task_specs<P: AsRef<Path>>(path: P) -> Result<Vec<TaskSpec>, TaskFileError> {
    let path = path.as_ref().to_path_buf();
    debug!("Loading task file: {:?}", path);

    let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => TaskFileError::NotFound { path: path.clone() },
        _ => TaskFileError::Io {
            path: path.clone(),
            source: e,
        },
    })?;

    let specs: Vec<TaskSpec> =
        serde_json::from_str(&content).map_err(|e| TaskFileError::Parse {
            path: path.clone(),
            source: e,
        })?;

    debug!("Parsed {} task records from {:?}", specs.len(), path);
    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskPriority;
    use std::io::Write;

    #[test]
    fn test_load_task_specs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": "t1", "description": "first", "agent_name": "admin"}},
                {{"description": "second", "target": "finance", "priority": "high"}}
            ]"#
        )
        .unwrap();

        let specs = load_task_specs(file.path()).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].id.as_deref(), Some("t1"));
        assert_eq!(specs[1].agent_name, "finance");
        assert_eq!(specs[1].priority, TaskPriority::High);
    }

    #[test]
    fn test_missing_file() {
        let err = load_task_specs("/nonexistent/tasks.json").unwrap_err();
        assert!(matches!(err, TaskFileError::NotFound { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_task_specs(file.path()).unwrap_err();
        assert!(matches!(err, TaskFileError::Parse { .. }));
    }
}
