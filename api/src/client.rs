//! `reqwest` implementation of [`TaskApi`]

use crate::{
    config::ApiConfig,
    error::ApiError,
    service::{ApiResult, TaskApi},
    types::{
        ApiTaskModel, Empty, ItemData, ResponseEnvelope, Task, TaskId, TasksPage, TodolistDto,
        TodolistId,
    },
};
use reqwest::{
    Client, RequestBuilder, Url,
    header::{HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use serde_json::json;

/// HTTP client for the todo-list service
#[derive(Clone, Debug)]
pub struct HttpTaskApi {
    client: Client,
    base_url: Url,
    config: ApiConfig,
}

impl HttpTaskApi {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] if the base URL cannot carry a
    /// path, the API key is not a valid header value, or the HTTP client
    /// cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidConfig(format!("base URL {}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidConfig(format!(
                "base URL {} cannot carry a path",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let value = HeaderValue::from_str(api_key)
                .map_err(|e| ApiError::InvalidConfig(format!("API key: {e}")))?;
            headers.insert("API-KEY", value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Create a client from `TODOSYNC_*` environment variables
    ///
    /// # Errors
    ///
    /// See [`ApiConfig::from_env`] and [`HttpTaskApi::new`].
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ApiConfig::from_env()?)
    }

    /// The configuration this client was built with
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Base URL with `segments` appended, each one percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL can carry a path
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn lists_url(&self) -> Url {
        self.endpoint(&["todo-lists"])
    }

    fn list_url(&self, id: &TodolistId) -> Url {
        self.endpoint(&["todo-lists", id.as_str()])
    }

    fn tasks_url(&self, list_id: &TodolistId) -> Url {
        self.endpoint(&["todo-lists", list_id.as_str(), "tasks"])
    }

    fn task_url(&self, list_id: &TodolistId, task_id: &TaskId) -> Url {
        self.endpoint(&["todo-lists", list_id.as_str(), "tasks", task_id.as_str()])
    }
}

/// Send a request and decode a 2xx JSON body
async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "todo-list service returned error status");
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

impl TaskApi for HttpTaskApi {
    async fn get_todolists(&self) -> Result<Vec<TodolistDto>, ApiError> {
        execute(self.client.get(self.lists_url())).await
    }

    async fn create_todolist(&self, title: &str) -> ApiResult<ItemData<TodolistDto>> {
        let request = self.client.post(self.lists_url()).json(&json!({ "title": title }));
        execute::<ResponseEnvelope<ItemData<TodolistDto>>>(request).await
    }

    async fn delete_todolist(&self, id: &TodolistId) -> ApiResult<Empty> {
        execute(self.client.delete(self.list_url(id))).await
    }

    async fn update_todolist_title(&self, id: &TodolistId, title: &str) -> ApiResult<Empty> {
        let request = self.client.put(self.list_url(id)).json(&json!({ "title": title }));
        execute(request).await
    }

    async fn get_tasks(&self, list_id: &TodolistId) -> Result<TasksPage, ApiError> {
        execute(self.client.get(self.tasks_url(list_id))).await
    }

    async fn create_task(&self, list_id: &TodolistId, title: &str) -> ApiResult<ItemData<Task>> {
        let request = self.client.post(self.tasks_url(list_id)).json(&json!({ "title": title }));
        execute(request).await
    }

    async fn update_task(
        &self,
        list_id: &TodolistId,
        task_id: &TaskId,
        model: &ApiTaskModel,
    ) -> ApiResult<Empty> {
        execute(self.client.put(self.task_url(list_id, task_id)).json(model)).await
    }

    async fn delete_task(&self, list_id: &TodolistId, task_id: &TaskId) -> ApiResult<Empty> {
        execute(self.client.delete(self.task_url(list_id, task_id))).await
    }
}
