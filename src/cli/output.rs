use serde::Serialize;

use crate::model::{Filter, Progress, Task};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskListJson<'a> {
    pub filter: &'static str,
    pub tasks: Vec<&'a Task>,
    pub progress: Progress,
}

impl<'a> TaskListJson<'a> {
    pub fn new(filter: Filter, tasks: Vec<&'a Task>, progress: Progress) -> Self {
        TaskListJson {
            filter: filter.name(),
            tasks,
            progress,
        }
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `[x] <id> <title>`
pub fn format_task_line(task: &Task) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    format!("[{}] {} {}", mark, task.id, task.title)
}

/// `2/3 completed (67%)`
pub fn format_progress(progress: &Progress) -> String {
    format!(
        "{}/{} completed ({}%)",
        progress.completed, progress.total, progress.percentage
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn task_lines() {
        let mut task = Task::new("17".into(), "Buy milk".into());
        assert_eq!(format_task_line(&task), "[ ] 17 Buy milk");
        task.completed = true;
        assert_eq!(format_task_line(&task), "[x] 17 Buy milk");
    }

    #[test]
    fn list_json_shape() {
        let task = Task::new("1".into(), "A".into());
        let json = TaskListJson::new(
            Filter::Active,
            vec![&task],
            Progress {
                total: 1,
                completed: 0,
                percentage: 0,
            },
        );
        let value = serde_json::to_value(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "filter": "active",
                "tasks": [{"id": "1", "title": "A", "completed": false}],
                "progress": {"total": 1, "completed": 0, "percentage": 0},
            })
        );
    }
}
