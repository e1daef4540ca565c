use std::collections::HashSet;

use regex::Regex;
use tracing::warn;

use crate::io::store::StoreError;
use crate::model::task::Task;

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task text is empty")]
    EmptyInput,
    #[error("task not found: {0}")]
    NotFound(u64),
    #[error("no task ids left above {0}")]
    IdsExhausted(u64),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("stored task list is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Hands out task ids: time-based like `Date.now()`, but strictly increasing,
/// so two creations in the same millisecond still get distinct ids.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    /// Never hand out anything at or below `id`
    pub fn observe(&mut self, id: u64) {
        self.last = self.last.max(id);
    }

    pub fn next(&mut self, now_millis: u64) -> Result<u64, TaskError> {
        let floor = self.last.checked_add(1).ok_or(TaskError::IdsExhausted(self.last))?;
        let id = now_millis.max(floor);
        self.last = id;
        Ok(id)
    }
}

/// Current wall-clock time in milliseconds since the epoch
pub fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Trim user input; empty after trimming is rejected.
pub fn normalize_text(raw: &str) -> Result<String, TaskError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(TaskError::EmptyInput);
    }
    Ok(text.to_string())
}

/// Drop entries that would break the list invariants: repeated ids (first
/// one wins) and blank text. Surviving text is trimmed.
pub fn sanitize_loaded(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(tasks.len());
    for mut task in tasks {
        if !seen.insert(task.id) {
            warn!(id = task.id, "dropping stored task with duplicate id");
            continue;
        }
        match normalize_text(&task.text) {
            Ok(text) => task.text = text,
            Err(_) => {
                warn!(id = task.id, "dropping stored task with empty text");
                continue;
            }
        }
        out.push(task);
    }
    out
}

// ---------------------------------------------------------------------------
// Lookup and mutation
// ---------------------------------------------------------------------------

pub fn find_task(tasks: &[Task], id: u64) -> Option<&Task> {
    tasks.iter().find(|t| t.id == id)
}

pub fn find_task_mut(tasks: &mut [Task], id: u64) -> Option<&mut Task> {
    tasks.iter_mut().find(|t| t.id == id)
}

/// Flip the completion flag; returns the updated task
pub fn toggle_task(tasks: &mut [Task], id: u64) -> Result<&Task, TaskError> {
    let task = find_task_mut(tasks, id).ok_or(TaskError::NotFound(id))?;
    task.completed = !task.completed;
    Ok(task)
}

/// Replace a task's text (already normalized)
pub fn retitle_task(tasks: &mut [Task], id: u64, text: String) -> Result<&Task, TaskError> {
    let task = find_task_mut(tasks, id).ok_or(TaskError::NotFound(id))?;
    task.text = text;
    Ok(task)
}

/// Remove every task with this id; returns the first one removed
pub fn remove_task(tasks: &mut Vec<Task>, id: u64) -> Result<Task, TaskError> {
    let removed = find_task(tasks, id).cloned().ok_or(TaskError::NotFound(id))?;
    tasks.retain(|t| t.id != id);
    Ok(removed)
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Which tasks a listing shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Done,
}

/// Tasks matching a status filter and an optional case-insensitive pattern
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    status: StatusFilter,
    pattern: Option<&Regex>,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| match status {
            StatusFilter::All => true,
            StatusFilter::Pending => !t.completed,
            StatusFilter::Done => t.completed,
        })
        .filter(|t| pattern.is_none_or(|re| re.is_match(&t.text)))
        .collect()
}

/// Compile a user pattern case-insensitively, falling back to a literal match
/// when it is not a valid regex.
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("(?i){}", pattern))
        .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Task> {
        let mut done = Task::new(2, "Walk dog");
        done.completed = true;
        vec![Task::new(1, "Buy milk"), done, Task::new(3, "Buy bread")]
    }

    #[test]
    fn normalize_trims_and_rejects_blank() {
        assert_eq!(normalize_text("  Buy milk \n").unwrap(), "Buy milk");
        assert!(matches!(normalize_text(" \t "), Err(TaskError::EmptyInput)));
        assert!(matches!(normalize_text(""), Err(TaskError::EmptyInput)));
    }

    #[test]
    fn ids_are_unique_within_one_tick() {
        let mut ids = IdAllocator::default();
        let a = ids.next(1_000).unwrap();
        let b = ids.next(1_000).unwrap();
        let c = ids.next(999).unwrap();
        assert_eq!((a, b, c), (1_000, 1_001, 1_002));
        assert_eq!(ids.next(5_000).unwrap(), 5_000);
    }

    #[test]
    fn observed_ids_are_never_reissued() {
        let mut ids = IdAllocator::default();
        ids.observe(10_000);
        assert_eq!(ids.next(50).unwrap(), 10_001);
        ids.observe(3);
        assert_eq!(ids.next(50).unwrap(), 10_002);
    }

    #[test]
    fn largest_id_exhausts_allocator() {
        let mut ids = IdAllocator::default();
        ids.observe(u64::MAX - 1);
        assert_eq!(ids.next(50).unwrap(), u64::MAX);
        assert!(matches!(ids.next(50), Err(TaskError::IdsExhausted(u64::MAX))));
    }

    #[test]
    fn toggle_twice_restores_flag() {
        let mut tasks = sample();
        assert!(toggle_task(&mut tasks, 1).unwrap().completed);
        assert!(!toggle_task(&mut tasks, 1).unwrap().completed);
    }

    #[test]
    fn toggle_missing_is_not_found() {
        let mut tasks = sample();
        assert!(matches!(toggle_task(&mut tasks, 99), Err(TaskError::NotFound(99))));
        assert_eq!(tasks, sample());
    }

    #[test]
    fn remove_filters_every_match() {
        let mut tasks = sample();
        tasks.push(Task::new(2, "stray duplicate"));
        let removed = remove_task(&mut tasks, 2).unwrap();
        assert_eq!(removed.text, "Walk dog");
        assert_eq!(tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn retitle_replaces_text_only() {
        let mut tasks = sample();
        let task = retitle_task(&mut tasks, 2, "Walk cat".into()).unwrap();
        assert_eq!(task.text, "Walk cat");
        assert!(task.completed);
    }

    #[test]
    fn sanitize_drops_duplicates_and_blanks() {
        let loaded = vec![
            Task::new(1, " first "),
            Task::new(1, "again"),
            Task::new(2, "   "),
            Task::new(3, "third"),
        ];
        let clean = sanitize_loaded(loaded);
        assert_eq!(clean, vec![Task::new(1, "first"), Task::new(3, "third")]);
    }

    #[test]
    fn filter_by_status_and_pattern() {
        let tasks = sample();
        let ids = |v: Vec<&Task>| v.iter().map(|t| t.id).collect::<Vec<_>>();

        assert_eq!(ids(filter_tasks(&tasks, StatusFilter::Pending, None)), vec![1, 3]);
        assert_eq!(ids(filter_tasks(&tasks, StatusFilter::Done, None)), vec![2]);

        let re = compile_pattern("buy").unwrap();
        assert_eq!(ids(filter_tasks(&tasks, StatusFilter::All, Some(&re))), vec![1, 3]);
    }

    #[test]
    fn invalid_regex_falls_back_to_literal() {
        let re = compile_pattern("milk (").unwrap();
        assert!(re.is_match("MILK ("));
        assert!(!re.is_match("milk"));
    }
}
