//! In-memory task backend for tests.

use std::sync::{Mutex, MutexGuard};

use tokio::time::Instant;

use crate::backend::{Label, Project, Task, TaskBackend};
use crate::error::{TodologyError, TodologyResult};

#[derive(Default)]
pub(crate) struct MemoryState {
    pub projects: Vec<Project>,
    pub labels: Vec<Label>,
    pub tasks: Vec<Task>,
    /// Time of every backend call, in order.
    pub calls: Vec<Instant>,
    /// Labels the backend puts on every new task by itself.
    pub implicit_task_labels: Vec<String>,
    /// Number of `add_task` calls that succeed before every later one fails.
    pub fail_add_task_after: Option<usize>,
    next_id: usize,
}

impl MemoryState {
    fn next_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }
}

#[derive(Default)]
pub(crate) struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(self, id: &str, name: &str) -> Self {
        self.state().projects.push(Project {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    pub fn with_label(self, id: &str, name: &str) -> Self {
        self.state().labels.push(Label {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    pub fn failing_after(self, successful_tasks: usize) -> Self {
        self.state().fail_add_task_after = Some(successful_tasks);
        self
    }

    pub fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }

    fn record_call(&self) -> MutexGuard<'_, MemoryState> {
        let mut state = self.state();
        state.calls.push(Instant::now());
        state
    }
}

impl TaskBackend for MemoryBackend {
    async fn find_project(&self, name: &str) -> TodologyResult<Option<Project>> {
        let state = self.record_call();
        Ok(state.projects.iter().find(|p| p.name == name).cloned())
    }

    async fn add_project(&self, name: &str) -> TodologyResult<Project> {
        let mut state = self.record_call();
        let project = Project {
            id: state.next_id(),
            name: name.into(),
        };
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn find_label(&self, name: &str) -> TodologyResult<Option<Label>> {
        let state = self.record_call();
        Ok(state.labels.iter().find(|l| l.name == name).cloned())
    }

    async fn add_label(&self, name: &str) -> TodologyResult<Label> {
        let mut state = self.record_call();
        let label = Label {
            id: state.next_id(),
            name: name.into(),
        };
        state.labels.push(label.clone());
        Ok(label)
    }

    async fn add_task(
        &self,
        project: &Project,
        content: &str,
        description: &str,
    ) -> TodologyResult<Task> {
        let mut state = self.record_call();
        if state.fail_add_task_after == Some(state.tasks.len()) {
            return Err(TodologyError::Backend("task quota exceeded".into()));
        }
        let task = Task {
            id: state.next_id(),
            content: content.into(),
            description: description.into(),
            project_id: project.id.clone(),
            labels: state.implicit_task_labels.clone(),
            due_date: None,
            due_string: None,
        };
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, task: &Task) -> TodologyResult<()> {
        let mut state = self.record_call();
        let stored = state
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| TodologyError::Backend(format!("no task {}", task.id)))?;
        *stored = task.clone();
        Ok(())
    }
}
