//! Per-call interaction context
//!
//! Constructed by the caller immediately before a gateway call and
//! discarded after. Identifies the rate-limit subject and the task
//! category the request claims to belong to.

use serde::{Deserialize, Serialize};

/// Closed set of task categories the gateway serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    /// Creating a new project or resource definition
    Creation,

    /// Generating source code
    Codegen,

    /// Writing documentation
    Documentation,

    /// Producing test cases
    Testing,
}

impl TaskCategory {
    /// Label used in framed prompts and audit entries
    pub fn label(&self) -> &'static str {
        match self {
            TaskCategory::Creation => "creation",
            TaskCategory::Codegen => "codegen",
            TaskCategory::Documentation => "documentation",
            TaskCategory::Testing => "testing",
        }
    }

    /// Operations permitted for this category. Derived, never settable.
    pub fn allowed_operations(&self) -> &'static [&'static str] {
        match self {
            TaskCategory::Creation => &["create project", "define model", "define endpoint"],
            TaskCategory::Codegen => &["generate code", "scaffold module", "write function"],
            TaskCategory::Documentation => &["write documentation", "describe api", "summarize"],
            TaskCategory::Testing => &["write tests", "generate test data", "review coverage"],
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "creation" => Some(TaskCategory::Creation),
            "codegen" => Some(TaskCategory::Codegen),
            "documentation" => Some(TaskCategory::Documentation),
            "testing" => Some(TaskCategory::Testing),
            _ => None,
        }
    }
}

/// Context for a single gateway call
#[derive(Debug, Clone)]
pub struct InteractionContext {
    /// Rate-limit bucket identity (a user or session)
    pub subject_id: String,

    /// Task category claimed by the caller
    pub task_category: TaskCategory,
}

impl InteractionContext {
    pub fn new(subject_id: impl Into<String>, task_category: TaskCategory) -> Self {
        Self {
            subject_id: subject_id.into(),
            task_category,
        }
    }

    /// Operations permitted under this context's category
    pub fn allowed_operations(&self) -> &'static [&'static str] {
        self.task_category.allowed_operations()
    }
}
