//! Pushing assignments to the task backend.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::assignment::Assignment;
use crate::backend::{Label, Project, TaskBackend};
use crate::error::TodologyResult;
use crate::ledger::ImportLedger;
use crate::rate_limit::RateLimiter;

/// Minimum time between two push invocations, leaving room for other clients
/// of the same account.
pub const PUSH_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PushStats {
    pub created: usize,
    pub project_created: bool,
    pub labels_created: usize,
}

/// Rate-limited wrapper around a [`TaskBackend`].
pub struct TaskPusher<B> {
    backend: B,
    limiter: RateLimiter,
}

impl<B: TaskBackend> TaskPusher<B> {
    pub fn new(backend: B) -> Self {
        Self::with_interval(backend, PUSH_INTERVAL)
    }

    pub fn with_interval(backend: B, interval: Duration) -> Self {
        TaskPusher {
            backend,
            limiter: RateLimiter::new(interval),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Create one task per assignment in `project_name`, tagged with `labels`.
    ///
    /// The project and labels are created if missing. Each assignment's id is
    /// added to `ledger` as soon as its task is saved, so a failure halfway
    /// through keeps credit for the tasks that were created.
    pub async fn push(
        &mut self,
        project_name: &str,
        labels: &BTreeSet<String>,
        assignments: &[Assignment],
        ledger: &mut ImportLedger,
    ) -> TodologyResult<PushStats> {
        self.limiter.wait().await;
        let result =
            push_assignments(&self.backend, project_name, labels, assignments, ledger).await;
        self.limiter.mark();
        result
    }
}

async fn push_assignments<B: TaskBackend>(
    backend: &B,
    project_name: &str,
    label_names: &BTreeSet<String>,
    assignments: &[Assignment],
    ledger: &mut ImportLedger,
) -> TodologyResult<PushStats> {
    let mut stats = PushStats::default();

    let project = match backend.find_project(project_name).await? {
        Some(project) => project,
        None => {
            log::info!("Creating project '{project_name}'");
            stats.project_created = true;
            backend.add_project(project_name).await?
        }
    };

    let mut labels: Vec<Label> = Vec::with_capacity(label_names.len());
    for name in label_names {
        let label = match backend.find_label(name).await? {
            Some(label) => label,
            None => {
                log::info!("Creating label '{name}'");
                stats.labels_created += 1;
                backend.add_label(name).await?
            }
        };
        labels.push(label);
    }

    for assignment in assignments {
        push_one(backend, &project, &labels, assignment).await?;
        ledger.insert(assignment.id.clone());
        stats.created += 1;
    }

    Ok(stats)
}

async fn push_one<B: TaskBackend>(
    backend: &B,
    project: &Project,
    labels: &[Label],
    assignment: &Assignment,
) -> TodologyResult<()> {
    let mut task = backend
        .add_task(project, &assignment.task_content(), &assignment.description)
        .await?;

    let due = assignment.due_date.to_string();
    task.due_date = Some(assignment.due_date);
    task.due_string = Some(due);
    for label in labels {
        if !task.labels.contains(&label.name) {
            task.labels.push(label.name.clone());
        }
    }

    backend.update_task(&task).await?;
    log::info!("Added '{}' (due {})", assignment.title, assignment.due_date);
    Ok(())
}
