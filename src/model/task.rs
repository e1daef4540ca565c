use std::fmt;

use serde::{Deserialize, Serialize};

/// A single to-do item.
///
/// The serialized form is exactly `{"id", "text", "completed"}`; it is the
/// persisted layout of the durable store and must not grow extra fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identity, assigned once at creation
    pub id: u64,
    /// Display text, always trimmed and non-empty
    pub text: String,
    /// Completion flag
    pub completed: bool,
}

impl Task {
    /// A fresh, not-yet-completed task
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Task {
            id,
            text: text.into(),
            completed: false,
        }
    }

    /// Checkbox glyph for this task
    pub fn checkbox(&self) -> &'static str {
        if self.completed { "[x]" } else { "[ ]" }
    }
}

/// Counts shown alongside the list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl Summary {
    pub fn of(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        Summary {
            total,
            completed,
            pending: total - completed,
        }
    }

    /// Whether the empty-state placeholder should replace the list
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// "3 total  1 done  2 pending"
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} total  {} done  {} pending",
            self.total, self.completed, self.pending
        )
    }
}
