//! Append-only audit log of admitted tasks.
//!
//! One line per admitted task, `{task_id}::::{raw_text}`, written before the
//! task enters the queue so synthesis failures stay traceable.

use crate::error::{CheerError, CheerResult};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one admitted task. The caller logs a failure and continues;
    /// admission is not rolled back on a bad write.
    pub fn append(&self, task_id: Uuid, raw_text: &str) -> CheerResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| CheerError::Audit(format!("open {}: {}", self.path.display(), e)))?;
        writeln!(file, "{}::::{}", task_id, raw_text)
            .map_err(|e| CheerError::Audit(format!("write {}: {}", self.path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_one_line_per_task() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        let log = AuditLog::new(&path);

        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        log.append(a, "11io dwight: first").unwrap();
        log.append(b, "11io dwight: second").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("{}::::11io dwight: first", a));
        assert_eq!(lines[1], format!("{}::::11io dwight: second", b));
    }
}
