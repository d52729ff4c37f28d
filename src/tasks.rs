use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::error::TrackerError;
use crate::types::{EntityKind, TaskStatus};

/// Task name → status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskBoard {
    tasks: IndexMap<String, TaskStatus>,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board that owns a copy of `snapshot`.
    pub fn from_snapshot<I, K>(snapshot: I) -> Self
    where
        I: IntoIterator<Item = (K, TaskStatus)>,
        K: Into<String>,
    {
        Self {
            tasks: snapshot
                .into_iter()
                .map(|(name, status)| (name.into(), status))
                .collect(),
        }
    }

    /// Add a task with the given status literal.
    ///
    /// A duplicate name is reported before the status is checked.
    pub fn add(&mut self, name: &str, status: &str) -> Result<TaskStatus, TrackerError> {
        if self.tasks.contains_key(name) {
            debug!(task = name, "rejected duplicate task");
            return Err(TrackerError::already_exists(EntityKind::Task, name));
        }
        let status: TaskStatus = status.parse()?;
        self.tasks.insert(name.to_string(), status);
        debug!(task = name, %status, "task added");
        Ok(status)
    }

    /// Add a task in the default `pending` status.
    pub fn add_pending(&mut self, name: &str) -> Result<TaskStatus, TrackerError> {
        self.add(name, TaskStatus::default().as_str())
    }

    /// Remove a task, returning the status it had.
    pub fn remove(&mut self, name: &str) -> Result<TaskStatus, TrackerError> {
        let status = self
            .tasks
            .shift_remove(name)
            .ok_or_else(|| TrackerError::not_found(EntityKind::Task, name))?;
        debug!(task = name, "task removed");
        Ok(status)
    }

    /// Overwrite a task's status. Returns the previous status.
    pub fn change_status(&mut self, name: &str, status: &str) -> Result<TaskStatus, TrackerError> {
        let current = self
            .tasks
            .get_mut(name)
            .ok_or_else(|| TrackerError::not_found(EntityKind::Task, name))?;
        let status: TaskStatus = status.parse()?;
        let previous = std::mem::replace(current, status);
        debug!(task = name, from = %previous, to = %status, "status changed");
        Ok(previous)
    }

    /// Names of tasks still pending, in insertion order.
    pub fn pending(&self) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|(_, status)| **status == TaskStatus::Pending)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn status(&self, name: &str) -> Option<TaskStatus> {
        self.tasks.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TaskStatus)> {
        self.tasks.iter().map(|(name, status)| (name.as_str(), *status))
    }
}

impl fmt::Display for TaskBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tasks.is_empty() {
            return writeln!(f, "No tasks.");
        }
        for (name, status) in &self.tasks {
            writeln!(f, "- {name}: {status}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> TaskBoard {
        TaskBoard::from_snapshot([
            ("Clean room", TaskStatus::Done),
            ("Write report", TaskStatus::InProgress),
        ])
    }

    #[test]
    fn test_add_defaults_to_pending() {
        let mut board = TaskBoard::new();
        assert_eq!(board.add_pending("T"), Ok(TaskStatus::Pending));
        assert_eq!(board.status("T"), Some(TaskStatus::Pending));
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let mut board = TaskBoard::new();
        board.add_pending("T").unwrap();
        let err = board.add("T", "done").unwrap_err();
        assert_eq!(err, TrackerError::already_exists(EntityKind::Task, "T"));
        assert_eq!(board.status("T"), Some(TaskStatus::Pending));
    }

    #[test]
    fn test_duplicate_checked_before_status() {
        let mut board = seeded();
        let err = board.add("Clean room", "bogus").unwrap_err();
        assert!(matches!(err, TrackerError::AlreadyExists { .. }));
    }

    #[test]
    fn test_add_invalid_status_rejected() {
        let mut board = seeded();
        let err = board.add("Read a book", "new").unwrap_err();
        assert_eq!(err, TrackerError::InvalidStatus("new".to_string()));
        assert_eq!(board.status("Read a book"), None);
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut board = seeded();
        assert_eq!(board.remove("Clean room"), Ok(TaskStatus::Done));
        assert_eq!(board.len(), 1);
        let err = board.remove("Clean room").unwrap_err();
        assert_eq!(err, TrackerError::not_found(EntityKind::Task, "Clean room"));
    }

    #[test]
    fn test_change_status() {
        let mut board = seeded();
        assert_eq!(
            board.change_status("Write report", "done"),
            Ok(TaskStatus::InProgress)
        );
        assert_eq!(board.status("Write report"), Some(TaskStatus::Done));

        // Any status is reachable from any other.
        board.change_status("Write report", "pending").unwrap();
        board.change_status("Write report", "in-progress").unwrap();
        assert_eq!(board.status("Write report"), Some(TaskStatus::InProgress));
    }

    #[test]
    fn test_change_status_invalid_keeps_previous() {
        let mut board = seeded();
        let err = board.change_status("Clean room", "finished").unwrap_err();
        assert_eq!(err, TrackerError::InvalidStatus("finished".to_string()));
        assert_eq!(board.status("Clean room"), Some(TaskStatus::Done));
    }

    #[test]
    fn test_change_status_missing_task() {
        let mut board = seeded();
        let err = board.change_status("Water plants", "done").unwrap_err();
        assert_eq!(err, TrackerError::not_found(EntityKind::Task, "Water plants"));
        // Missing task is reported even when the status is invalid too.
        let err = board.change_status("Water plants", "bogus").unwrap_err();
        assert!(matches!(err, TrackerError::NotFound { .. }));
    }

    #[test]
    fn test_pending_in_insertion_order() {
        let mut board = seeded();
        board.add_pending("Buy groceries").unwrap();
        board.add("Call client", "in-progress").unwrap();
        board.add("Prepare slides", "pending").unwrap();
        assert_eq!(board.pending(), vec!["Buy groceries", "Prepare slides"]);

        board.remove("Buy groceries").unwrap();
        board.change_status("Prepare slides", "in-progress").unwrap();
        assert!(board.pending().is_empty());
    }

    #[test]
    fn test_display() {
        let board = seeded();
        assert_eq!(
            board.to_string(),
            "- Clean room: done\n- Write report: in-progress\n"
        );
        assert_eq!(TaskBoard::new().to_string(), "No tasks.\n");
    }
}
