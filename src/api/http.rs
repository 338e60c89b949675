use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::header::{ HeaderMap, HeaderValue, ACCEPT };
use reqwest::multipart::{ Form, Part };
use reqwest::Client as HttpClient;
use serde_json::Value as JsonValue;
use std::time::Duration;

use super::{ ApiError, ApiRequest, ApiResponse, MultipartForm, RequestBody, Transport };
use crate::session::Session;

/// reqwest-backed transport. Reads the bearer token from the session on every
/// request so a login or logout takes effect immediately.
pub struct HttpTransport {
    http: HttpClient,
    base_url: String,
    session: Session,
}

impl HttpTransport {
    pub fn new(base_url: &str, session: Session, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn build_multipart(form: MultipartForm) -> Result<Form, ApiError> {
    let mut multipart = Form::new();
    for (name, value) in form.fields {
        multipart = multipart.text(name, value);
    }
    for (name, file) in form.files {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| ApiError::Transport(format!("Invalid attachment type: {}", e)))?;
        multipart = multipart.part(name, part);
    }
    Ok(multipart)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url(&request.path);
        let mut builder = self.http.request(request.method.clone(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.session.token()? {
            builder = builder.bearer_auth(token);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(build_multipart(form)?),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let body = if text.trim().is_empty() {
            JsonValue::Null
        } else {
            match serde_json::from_str::<JsonValue>(&text) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Non-JSON body from {} {}: {}", request.method, url, e);
                    JsonValue::String(text)
                }
            }
        };
        debug!("{} {} answered {}", request.method, url, status);

        Ok(ApiResponse { status, body })
    }
}
