use serde_json::Value as JsonValue;
use thiserror::Error;

/// Everything that can go wrong between a controller and the REST API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Field-level messages, either from local form validation or the server's `errors[]`.
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("{message} (status {status})")]
    Status { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The owning controller was torn down before the response arrived.
    #[error("request cancelled")]
    Cancelled,

    #[error("session store error: {0}")]
    Session(String),
}

impl ApiError {
    /// Builds the error for a non-2xx response, preferring `errors[].msg` over `message`.
    pub fn from_response(status: u16, body: &JsonValue) -> Self {
        if let Some(errors) = body.get("errors").and_then(|e| e.as_array()) {
            let messages: Vec<String> = errors
                .iter()
                .filter_map(|entry| {
                    entry
                        .get("msg")
                        .or_else(|| entry.get("message"))
                        .and_then(|m| m.as_str())
                        .or_else(|| entry.as_str())
                        .map(|m| m.to_string())
                })
                .collect();
            if !messages.is_empty() {
                return ApiError::Validation(messages);
            }
        }

        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| body.get("error").and_then(|m| m.as_str()))
            .or_else(|| body.as_str().filter(|s| !s.trim().is_empty()))
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        ApiError::Status { status, message }
    }

    /// Text suitable for a notification, or `None` when only a generic
    /// "Failed to ..." notice makes sense.
    pub fn user_message(&self) -> Option<String> {
        match self {
            ApiError::Validation(messages) => Some(messages.join(", ")),
            ApiError::Status { message, .. } => Some(message.clone()),
            ApiError::Session(msg) => Some(msg.clone()),
            ApiError::Transport(_) | ApiError::Decode(_) | ApiError::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_errors_are_collected_in_order() {
        let body = json!({
            "errors": [
                { "msg": "Name is required", "param": "name" },
                { "msg": "Email is invalid", "param": "email" }
            ]
        });
        let err = ApiError::from_response(400, &body);
        assert_eq!(
            err,
            ApiError::Validation(vec!["Name is required".into(), "Email is invalid".into()])
        );
        assert_eq!(err.to_string(), "Name is required, Email is invalid");
    }

    #[test]
    fn message_is_used_when_no_field_errors() {
        let err = ApiError::from_response(404, &json!({ "message": "Leader not found" }));
        assert_eq!(err.user_message().as_deref(), Some("Leader not found"));
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
    }

    #[test]
    fn empty_body_falls_back_to_status_text() {
        let err = ApiError::from_response(502, &JsonValue::Null);
        assert_eq!(err.user_message().as_deref(), Some("Request failed with status 502"));
    }

    #[test]
    fn transport_errors_have_no_user_message() {
        assert!(ApiError::Transport("connection refused".into()).user_message().is_none());
    }
}
