pub mod endpoints;
pub mod error;
pub mod http;

pub use error::ApiError;
pub use http::HttpTransport;

use async_trait::async_trait;
use log::debug;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{ Deserialize, Serialize };
use serde_json::Value as JsonValue;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::models::pagination::Pagination;

/// A file picked in a form, sent as one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = content_type_for(path).to_string();
        Ok(Self { file_name, content_type, bytes })
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, Attachment)>,
}

impl MultipartForm {
    pub fn has_part(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name) || self.files.iter().any(|(n, _)| n == name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(JsonValue),
    Multipart(MultipartForm),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn json(mut self, value: JsonValue) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status plus the parsed JSON body (`Null` when empty).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: JsonValue,
}

impl ApiResponse {
    pub fn ok(body: JsonValue) -> Self {
        Self { status: 200, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves one request over the wire. Only transport failures are errors here;
/// status handling happens in [`ApiClient`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Success envelope shared by every endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Sends the request unless `cancel` fires first. A response that lands
    /// after cancellation is dropped and reported as [`ApiError::Cancelled`].
    pub async fn execute(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken
    ) -> Result<ApiResponse, ApiError> {
        let label = format!("{} {}", request.method, request.path);
        if cancel.is_cancelled() {
            debug!("Skipping {}: owner already closed", label);
            return Err(ApiError::Cancelled);
        }
        debug!("-> {}", label);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Cancelled in flight: {}", label);
                return Err(ApiError::Cancelled);
            }
            result = self.transport.send(request) => result?,
        };

        if cancel.is_cancelled() {
            debug!("Discarding late response for {}", label);
            return Err(ApiError::Cancelled);
        }

        debug!("<- {} {}", response.status, label);
        if !response.is_success() {
            return Err(ApiError::from_response(response.status, &response.body));
        }
        Ok(response)
    }

    pub async fn fetch<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken
    ) -> Result<Envelope<T>, ApiError> {
        let response = self.execute(request, cancel).await?;
        serde_json::from_value(response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
