//! The task-tracking service that assignments are pushed to.

use chrono::NaiveDate;

use crate::error::TodologyResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub content: String,
    pub description: String,
    pub project_id: String,
    /// Label names, the way the backend addresses them on tasks.
    pub labels: Vec<String>,
    pub due_date: Option<NaiveDate>,
    /// Human-readable due date shown by the backend.
    pub due_string: Option<String>,
}

/// Operations todology needs from a task backend.
///
/// A value implementing this is an authenticated session; how it logs in is up
/// to the implementation.
#[allow(async_fn_in_trait)]
pub trait TaskBackend {
    async fn find_project(&self, name: &str) -> TodologyResult<Option<Project>>;

    async fn add_project(&self, name: &str) -> TodologyResult<Project>;

    async fn find_label(&self, name: &str) -> TodologyResult<Option<Label>>;

    async fn add_label(&self, name: &str) -> TodologyResult<Label>;

    /// Create a task in `project`. The returned task reflects what the
    /// backend stored, including any labels it attached on its own.
    async fn add_task(
        &self,
        project: &Project,
        content: &str,
        description: &str,
    ) -> TodologyResult<Task>;

    /// Save due date and labels of an existing task.
    async fn update_task(&self, task: &Task) -> TodologyResult<()>;
}
