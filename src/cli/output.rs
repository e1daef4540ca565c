use serde::Serialize;

use crate::model::task::{Summary, Task};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskListJson<'a> {
    pub tasks: Vec<&'a Task>,
    pub summary: Summary,
}

#[derive(Serialize)]
pub struct ConfigValueJson<'a> {
    pub key: &'a str,
    pub value: Option<String>,
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// "1718000000000  [x] Buy milk"
pub fn format_task_line(task: &Task) -> String {
    format!("{}  {} {}", task.id, task.checkbox(), task.text)
}

/// Every task line, with ids right-aligned to a common width
pub fn format_task_list(tasks: &[&Task]) -> Vec<String> {
    let id_w = tasks
        .iter()
        .map(|t| t.id.to_string().len())
        .max()
        .unwrap_or(0);
    tasks
        .iter()
        .map(|t| format!("{:>id_w$}  {} {}", t.id, t.checkbox(), t.text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn task_line() {
        let mut task = Task::new(42, "Buy milk");
        assert_eq!(format_task_line(&task), "42  [ ] Buy milk");
        task.completed = true;
        assert_eq!(format_task_line(&task), "42  [x] Buy milk");
    }

    #[test]
    fn list_aligns_ids() {
        let a = Task::new(7, "short id");
        let b = Task::new(1234, "long id");
        assert_eq!(
            format_task_list(&[&a, &b]),
            vec!["   7  [ ] short id", "1234  [ ] long id"]
        );
    }

    #[test]
    fn list_json_shape() {
        let task = Task::new(1, "Wash car");
        let out = TaskListJson {
            tasks: vec![&task],
            summary: Summary::of(std::slice::from_ref(&task)),
        };
        let v: serde_json::Value = serde_json::to_value(&out).unwrap();
        assert_eq!(v["tasks"][0]["text"], "Wash car");
        assert_eq!(v["summary"]["pending"], 1);
    }
}
