//! HTTP transport for the task API.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::json;
use uuid::Uuid;

use crate::api::types::ErrorResponse;
use crate::store::{Task, TaskPatch};

use super::{ClientError, TaskApi};

/// Task API client over HTTP.
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into a typed error, preferring the
    /// server's `{"error": ...}` body when it parses.
    async fn error_for(response: Response) -> ClientError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        ClientError::Api { status, message }
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list(&self) -> Result<Vec<Task>, ClientError> {
        let response = self.client.get(self.url("/api/tasks")).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        Ok(response.json().await?)
    }

    async fn create(&self, title: &str) -> Result<Task, ClientError> {
        let response = self
            .client
            .post(self.url("/api/tasks"))
            .json(&json!({ "title": title }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        Ok(response.json().await?)
    }

    async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Task, ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/api/tasks/{}", id)))
            .json(&patch)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        Ok(response.json().await?)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/tasks/{}", id)))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        Ok(())
    }
}
