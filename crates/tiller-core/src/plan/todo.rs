//! Task list validation and rendering

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Maximum number of items in a task list
pub const MAX_TASKS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Self::Pending => "[ ]",
            Self::InProgress => "[>]",
            Self::Completed => "[x]",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub content: String,
    pub status: TaskStatus,
    #[serde(rename = "activeForm")]
    pub active_form: String,
}

/// Rejected task list update; stored state is untouched
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("Item {index}: {reason}")]
    InvalidItem { index: usize, reason: String },

    #[error("Max {} todos allowed (got {count})", MAX_TASKS)]
    TooManyItems { count: usize },

    #[error("Only one task can be in_progress at a time (got {count})")]
    MultipleInProgress { count: usize },
}

/// Owns one agent's task list
#[derive(Debug, Default)]
pub struct TaskPlanner {
    items: Vec<TaskItem>,
}

impl TaskPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[TaskItem] {
        &self.items
    }

    /// Replace the whole list with `candidate` if every item and the list as
    /// a whole are valid. Returns the rendered list on success.
    pub fn update(&mut self, candidate: &[Value]) -> Result<String, PlanError> {
        let validated = validate(candidate)?;
        self.items = validated;
        Ok(self.render())
    }

    pub fn render(&self) -> String {
        if self.items.is_empty() {
            return "No todos.".to_string();
        }

        let mut lines: Vec<String> = self
            .items
            .iter()
            .map(|item| match item.status {
                TaskStatus::InProgress => format!(
                    "{} {} <- {}",
                    item.status.marker(),
                    item.content,
                    item.active_form
                ),
                _ => format!("{} {}", item.status.marker(), item.content),
            })
            .collect();

        let done = self
            .items
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count();
        lines.push(format!("\n({}/{} completed)", done, self.items.len()));
        lines.join("\n")
    }
}

fn validate(candidate: &[Value]) -> Result<Vec<TaskItem>, PlanError> {
    let items = candidate
        .iter()
        .enumerate()
        .map(|(index, raw)| validate_item(index, raw))
        .collect::<Result<Vec<_>, _>>()?;

    if items.len() > MAX_TASKS {
        return Err(PlanError::TooManyItems { count: items.len() });
    }

    let in_progress = items
        .iter()
        .filter(|t| t.status == TaskStatus::InProgress)
        .count();
    if in_progress > 1 {
        return Err(PlanError::MultipleInProgress { count: in_progress });
    }

    Ok(items)
}

fn validate_item(index: usize, raw: &Value) -> Result<TaskItem, PlanError> {
    let invalid = |reason: &str| PlanError::InvalidItem {
        index,
        reason: reason.to_string(),
    };

    let Some(obj) = raw.as_object() else {
        return Err(invalid("must be an object"));
    };

    let field = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    };

    let content = field("content");
    if content.is_empty() {
        return Err(invalid("content required"));
    }

    // Missing status means a freshly added task.
    let status = match obj.get("status") {
        None | Some(Value::Null) => TaskStatus::Pending,
        Some(value) => value
            .as_str()
            .and_then(TaskStatus::parse)
            .ok_or_else(|| invalid("invalid status, expected pending, in_progress or completed"))?,
    };

    let active_form = field("activeForm");
    if active_form.is_empty() {
        return Err(invalid("activeForm required"));
    }

    Ok(TaskItem {
        content,
        status,
        active_form,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(content: &str, status: &str) -> Value {
        json!({"content": content, "status": status, "activeForm": format!("Doing {content}")})
    }

    #[test]
    fn empty_list_renders_placeholder() {
        assert_eq!(TaskPlanner::new().render(), "No todos.");
    }

    #[test]
    fn render_marks_each_status() {
        let mut planner = TaskPlanner::new();
        let rendered = planner
            .update(&[
                item("write parser", "completed"),
                item("add tests", "in_progress"),
                item("update docs", "pending"),
            ])
            .unwrap();

        assert_eq!(
            rendered,
            "[x] write parser\n[>] add tests <- Doing add tests\n[ ] update docs\n\n(1/3 completed)"
        );
    }

    #[test]
    fn all_completed_footer() {
        let mut planner = TaskPlanner::new();
        let rendered = planner
            .update(&[item("a", "completed"), item("b", "completed")])
            .unwrap();
        assert!(rendered.ends_with("(2/2 completed)"));
    }

    #[test]
    fn two_in_progress_rejected_and_state_kept() {
        let mut planner = TaskPlanner::new();
        planner.update(&[item("first", "pending")]).unwrap();
        let before = planner.items().to_vec();

        let err = planner
            .update(&[item("a", "in_progress"), item("b", "in_progress")])
            .unwrap_err();

        assert_eq!(err, PlanError::MultipleInProgress { count: 2 });
        assert!(err.to_string().contains("Only one task can be in_progress"));
        assert_eq!(planner.items(), before.as_slice());
    }

    #[test]
    fn oversized_list_rejected() {
        let mut planner = TaskPlanner::new();
        let items: Vec<Value> = (0..21).map(|i| item(&format!("t{i}"), "pending")).collect();
        let err = planner.update(&items).unwrap_err();
        assert_eq!(err, PlanError::TooManyItems { count: 21 });
        assert!(planner.items().is_empty());
    }

    #[test]
    fn exactly_max_items_accepted() {
        let mut planner = TaskPlanner::new();
        let items: Vec<Value> = (0..MAX_TASKS)
            .map(|i| item(&format!("t{i}"), "pending"))
            .collect();
        assert!(planner.update(&items).is_ok());
        assert_eq!(planner.items().len(), MAX_TASKS);
    }

    #[test]
    fn per_item_errors_report_position_and_fail_fast() {
        let mut planner = TaskPlanner::new();

        let err = planner
            .update(&[
                item("ok", "pending"),
                json!({"content": "", "status": "pending", "activeForm": "x"}),
                json!({"content": "y", "status": "bogus", "activeForm": "y"}),
            ])
            .unwrap_err();
        assert_eq!(err.to_string(), "Item 1: content required");

        let err = planner
            .update(&[json!({"content": "y", "status": "bogus", "activeForm": "y"})])
            .unwrap_err();
        assert!(err.to_string().starts_with("Item 0: invalid status"));

        let err = planner
            .update(&[json!({"content": "y", "status": "pending", "activeForm": "  "})])
            .unwrap_err();
        assert_eq!(err.to_string(), "Item 0: activeForm required");
    }

    #[test]
    fn item_errors_take_precedence_over_list_errors() {
        let mut planner = TaskPlanner::new();
        let mut items: Vec<Value> = (0..25).map(|i| item(&format!("t{i}"), "pending")).collect();
        items[3] = json!({"content": "bad", "status": "pending"});
        let err = planner.update(&items).unwrap_err();
        assert!(matches!(err, PlanError::InvalidItem { index: 3, .. }));
    }

    #[test]
    fn missing_status_defaults_to_pending() {
        let mut planner = TaskPlanner::new();
        planner
            .update(&[json!({"content": "a", "activeForm": "Doing a"})])
            .unwrap();
        assert_eq!(planner.items()[0].status, TaskStatus::Pending);
    }

    #[test]
    fn update_may_shrink_the_list() {
        let mut planner = TaskPlanner::new();
        planner
            .update(&[item("a", "pending"), item("b", "pending")])
            .unwrap();
        planner.update(&[item("b", "completed")]).unwrap();
        assert_eq!(planner.items().len(), 1);
        assert_eq!(planner.items()[0].content, "b");
    }
}
