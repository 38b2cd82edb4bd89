//! Todoist REST client.

use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use todology_core::backend::{Label, Project, Task, TaskBackend};
use todology_core::{TodologyError, TodologyResult};

use crate::types::{NewNamed, NewTask, TaskUpdate, TodoistLabel, TodoistProject, TodoistTask};

pub const DEFAULT_API_URL: &str = "https://api.todoist.com/rest/v2";

/// An authenticated Todoist session.
pub struct TodoistClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl TodoistClient {
    /// Log in to the public Todoist API.
    pub async fn login(token: &str) -> TodologyResult<Self> {
        Self::login_at(DEFAULT_API_URL, token).await
    }

    /// Log in against `base_url`, checking the token with a project listing.
    ///
    /// Server errors, rate limiting and garbled responses are reported as
    /// [`TodologyError::TransientAuth`] so the caller can retry them.
    pub async fn login_at(base_url: &str, token: &str) -> TodologyResult<Self> {
        let client = TodoistClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        };

        let resp = client.get("/projects").await?;
        let status = resp.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TodologyError::TransientAuth(format!("Todoist answered {status}")));
        }
        let resp = check_status(resp).await?;
        resp.json::<Vec<TodoistProject>>().await.map_err(|e| {
            TodologyError::TransientAuth(format!("Unexpected login response: {e}"))
        })?;

        log::debug!("Logged in to Todoist at {}", client.base_url);
        Ok(client)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> TodologyResult<Response> {
        Ok(self
            .http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> TodologyResult<T> {
        let resp = check_status(self.get(path).await?).await?;
        Ok(resp.json().await?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> TodologyResult<T> {
        Ok(self.post(path, body).await?.json().await?)
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> TodologyResult<Response> {
        let resp = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        check_status(resp).await
    }
}

async fn check_status(resp: Response) -> TodologyResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let error_text = resp.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(TodologyError::Unauthorized(
            "Todoist rejected the API token".into(),
        )),
        _ => Err(TodologyError::Backend(format!(
            "Todoist request failed ({status}): {error_text}"
        ))),
    }
}

impl TaskBackend for TodoistClient {
    async fn find_project(&self, name: &str) -> TodologyResult<Option<Project>> {
        let projects: Vec<TodoistProject> = self.get_json("/projects").await?;
        Ok(projects
            .into_iter()
            .find(|p| p.name == name)
            .map(Project::from))
    }

    async fn add_project(&self, name: &str) -> TodologyResult<Project> {
        let project: TodoistProject = self.post_json("/projects", &NewNamed { name }).await?;
        Ok(project.into())
    }

    async fn find_label(&self, name: &str) -> TodologyResult<Option<Label>> {
        let labels: Vec<TodoistLabel> = self.get_json("/labels").await?;
        Ok(labels.into_iter().find(|l| l.name == name).map(Label::from))
    }

    async fn add_label(&self, name: &str) -> TodologyResult<Label> {
        let label: TodoistLabel = self.post_json("/labels", &NewNamed { name }).await?;
        Ok(label.into())
    }

    async fn add_task(
        &self,
        project: &Project,
        content: &str,
        description: &str,
    ) -> TodologyResult<Task> {
        let body = NewTask {
            content,
            description,
            project_id: &project.id,
        };
        let task: TodoistTask = self.post_json("/tasks", &body).await?;
        Ok(task.into())
    }

    async fn update_task(&self, task: &Task) -> TodologyResult<()> {
        self.post(&format!("/tasks/{}", task.id), &TaskUpdate::from(task))
            .await?;
        Ok(())
    }
}
