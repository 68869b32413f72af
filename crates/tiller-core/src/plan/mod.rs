//! Task planning
//!
//! A bounded, single-focus task list the model rewrites wholesale through
//! the `TodoWrite` tool.

pub mod todo;

pub use todo::{PlanError, TaskItem, TaskPlanner, TaskStatus, MAX_TASKS};
