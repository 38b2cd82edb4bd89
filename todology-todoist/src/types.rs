//! Todoist REST request and response bodies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use todology_core::backend::{Label, Project, Task};

#[derive(Debug, Deserialize)]
pub struct TodoistProject {
    pub id: String,
    pub name: String,
}

impl From<TodoistProject> for Project {
    fn from(p: TodoistProject) -> Self {
        Project {
            id: p.id,
            name: p.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TodoistLabel {
    pub id: String,
    pub name: String,
}

impl From<TodoistLabel> for Label {
    fn from(l: TodoistLabel) -> Self {
        Label {
            id: l.id,
            name: l.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TodoistDue {
    /// `YYYY-MM-DD`, or a full date-time for tasks with a time
    pub date: String,
    pub string: String,
}

#[derive(Debug, Deserialize)]
pub struct TodoistTask {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub description: String,
    pub project_id: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub due: Option<TodoistDue>,
}

impl From<TodoistTask> for Task {
    fn from(t: TodoistTask) -> Self {
        let due_date = t
            .due
            .as_ref()
            .and_then(|due| due.date.get(..10))
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        Task {
            id: t.id,
            content: t.content,
            description: t.description,
            project_id: t.project_id,
            labels: t.labels,
            due_date,
            due_string: t.due.map(|due| due.string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NewNamed<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct NewTask<'a> {
    pub content: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub description: &'a str,
    pub project_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TaskUpdate<'a> {
    pub labels: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_string: Option<&'a str>,
}

impl<'a> From<&'a Task> for TaskUpdate<'a> {
    fn from(task: &'a Task) -> Self {
        TaskUpdate {
            labels: &task.labels,
            due_date: task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
            due_string: task.due_string.as_deref(),
        }
    }
}
