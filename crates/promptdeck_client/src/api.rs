//! API transport: the [`PromptApi`] seam and its reqwest implementation.

use promptdeck_core::models::{
    CreateFolderRequest, CreatePromptRequest, CreateTagRequest, Folder, Prompt, Snapshot, Tag,
    UpdateFolderRequest, UpdatePromptRequest, UpdateTagRequest,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Transport-level failures surfaced to the cache as messages.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message} (HTTP {status})")]
    Server { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid server URL: {0}")]
    InvalidUrl(String),
}

/// CRUD operations against the prompt server.
///
/// The cache is generic over this trait so tests can script failures without
/// a network.
#[allow(async_fn_in_trait)]
pub trait PromptApi {
    async fn fetch_all(&self) -> Result<Snapshot, ApiError>;

    async fn create_prompt(&self, req: &CreatePromptRequest) -> Result<Prompt, ApiError>;
    async fn update_prompt(&self, id: &str, req: &UpdatePromptRequest)
        -> Result<Prompt, ApiError>;
    async fn delete_prompt(&self, id: &str) -> Result<(), ApiError>;

    async fn create_folder(&self, req: &CreateFolderRequest) -> Result<Folder, ApiError>;
    async fn update_folder(&self, id: &str, req: &UpdateFolderRequest)
        -> Result<Folder, ApiError>;
    async fn delete_folder(&self, id: &str) -> Result<(), ApiError>;

    async fn create_tag(&self, req: &CreateTagRequest) -> Result<Tag, ApiError>;
    async fn update_tag(&self, id: &str, req: &UpdateTagRequest) -> Result<Tag, ApiError>;
    async fn delete_tag(&self, id: &str) -> Result<(), ApiError>;
}

/// Pull a human-readable message out of an error response body.
///
/// The server answers with `{"error": "..."}`; anything else falls back to
/// the raw body or the status reason.
fn error_message_for_response(status: reqwest::StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return value
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or(body)
            .to_string();
    }

    body.to_string()
}

/// Normalize a server URL: strip trailing slashes and pin `localhost` to
/// `127.0.0.1` to avoid slow IPv6 fallback on some systems.
pub fn normalize_server(server: String) -> String {
    if let Ok(mut url) = reqwest::Url::parse(&server) {
        let should_normalize_localhost =
            url.scheme().eq_ignore_ascii_case("http") && url.host_str() == Some("localhost");
        if should_normalize_localhost && url.set_host(Some("127.0.0.1")).is_err() {
            return server;
        }
        let mut normalized = url.to_string();
        while normalized.ends_with('/') {
            normalized.pop();
        }
        return normalized;
    }
    server
}

/// HTTP implementation of [`PromptApi`].
pub struct HttpApi {
    http: reqwest::Client,
    server: String,
}

impl HttpApi {
    pub fn new(server: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            server: normalize_server(server.to_string()),
        }
    }

    fn url(&self, segments: &[&str]) -> Result<reqwest::Url, ApiError> {
        let mut url = reqwest::Url::parse(&self.server)
            .map_err(|err| ApiError::InvalidUrl(format!("'{}': {}", self.server, err)))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(format!("'{}' cannot be a base", self.server)))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, ApiError> {
        let res = Self::check_status(res).await?;
        res.json()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))
    }

    async fn expect_empty(res: reqwest::Response) -> Result<(), ApiError> {
        Self::check_status(res).await.map(|_| ())
    }

    async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        Err(ApiError::Server {
            status: status.as_u16(),
            message: error_message_for_response(status, &body),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.url(segments)?;
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Self::decode(res).await
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(segments)?;
        let res = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Self::decode(res).await
    }

    async fn put_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(segments)?;
        let res = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Self::decode(res).await
    }

    async fn delete_empty(&self, segments: &[&str]) -> Result<(), ApiError> {
        let url = self.url(segments)?;
        let res = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Self::expect_empty(res).await
    }
}

impl PromptApi for HttpApi {
    async fn fetch_all(&self) -> Result<Snapshot, ApiError> {
        self.get_json(&["api", "prompts"]).await
    }

    async fn create_prompt(&self, req: &CreatePromptRequest) -> Result<Prompt, ApiError> {
        self.post_json(&["api", "prompts"], req).await
    }

    async fn update_prompt(
        &self,
        id: &str,
        req: &UpdatePromptRequest,
    ) -> Result<Prompt, ApiError> {
        self.put_json(&["api", "prompts", id], req).await
    }

    async fn delete_prompt(&self, id: &str) -> Result<(), ApiError> {
        self.delete_empty(&["api", "prompts", id]).await
    }

    async fn create_folder(&self, req: &CreateFolderRequest) -> Result<Folder, ApiError> {
        self.post_json(&["api", "folders"], req).await
    }

    async fn update_folder(
        &self,
        id: &str,
        req: &UpdateFolderRequest,
    ) -> Result<Folder, ApiError> {
        self.put_json(&["api", "folders", id], req).await
    }

    async fn delete_folder(&self, id: &str) -> Result<(), ApiError> {
        self.delete_empty(&["api", "folders", id]).await
    }

    async fn create_tag(&self, req: &CreateTagRequest) -> Result<Tag, ApiError> {
        self.post_json(&["api", "tags"], req).await
    }

    async fn update_tag(&self, id: &str, req: &UpdateTagRequest) -> Result<Tag, ApiError> {
        self.put_json(&["api", "tags", id], req).await
    }

    async fn delete_tag(&self, id: &str) -> Result<(), ApiError> {
        self.delete_empty(&["api", "tags", id]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_server_pins_localhost_and_strips_trailing_slashes() {
        assert_eq!(
            normalize_server("http://localhost:4620/".to_string()),
            "http://127.0.0.1:4620"
        );
        assert_eq!(
            normalize_server("http://127.0.0.1:4620".to_string()),
            "http://127.0.0.1:4620"
        );
        assert_eq!(normalize_server("not a url".to_string()), "not a url");
    }

    #[test]
    fn url_joins_segments_onto_the_base() {
        let api = HttpApi::new("http://127.0.0.1:4620");
        let url = api.url(&["api", "prompts", "abc"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:4620/api/prompts/abc");
    }

    #[test]
    fn error_message_prefers_the_error_field() {
        let status = reqwest::StatusCode::NOT_FOUND;
        assert_eq!(
            error_message_for_response(status, r#"{"error":"Not found"}"#),
            "Not found"
        );
        assert_eq!(error_message_for_response(status, "plain text"), "plain text");
        assert_eq!(error_message_for_response(status, "  "), "Not Found");
    }
}
