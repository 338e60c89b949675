//! In-memory transport for controller tests: canned responses per route,
//! every request recorded.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value as JsonValue;
use std::collections::{ HashMap, VecDeque };
use std::sync::Mutex;
use std::time::Duration;

use crate::api::{ ApiError, ApiRequest, ApiResponse, Transport };

type Route = (Method, String);

#[derive(Default)]
struct Replies {
    queue: VecDeque<Result<ApiResponse, ApiError>>,
    /// The only remaining reply has been served at least once.
    sticky_served: bool,
}

#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<Route, Replies>>,
    log: Mutex<Vec<ApiRequest>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queues a reply. The last reply of a route keeps being served until a
    /// new one is queued, which then replaces it.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: JsonValue) {
        self.push(method, path, Ok(ApiResponse { status, body }));
    }

    pub fn fail(&self, method: Method, path: &str, error: ApiError) {
        self.push(method, path, Err(error));
    }

    fn push(&self, method: Method, path: &str, reply: Result<ApiResponse, ApiError>) {
        let mut routes = self.routes.lock().unwrap();
        let replies = routes.entry((method, path.to_string())).or_default();
        if replies.sticky_served {
            replies.queue.clear();
            replies.sticky_served = false;
        }
        replies.queue.push_back(reply);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.log.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut routes = self.routes.lock().unwrap();
        let replies = match routes.get_mut(&(request.method.clone(), request.path.clone())) {
            Some(replies) if !replies.queue.is_empty() => replies,
            _ => {
                return Ok(ApiResponse {
                    status: 404,
                    body: serde_json::json!({ "message": format!("No route for {}", request.path) }),
                });
            }
        };
        if replies.queue.len() > 1 {
            replies.queue.pop_front().unwrap()
        } else {
            replies.sticky_served = true;
            replies.queue.front().cloned().unwrap()
        }
    }
}
