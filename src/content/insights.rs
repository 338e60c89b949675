use log::{ error, info };
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::api::{ endpoints, ApiClient, ApiError, ApiRequest };
use crate::models::insight::Insight;
use crate::notify::Notifier;

pub const EMPTY_LIST: &str = "No insights published yet.";
pub const NOT_FOUND: &str = "Insight not found.";
pub const MISSING_ID: &str = "No insight selected.";

/// Result of resolving the detail page's `?id=` against the loaded list.
#[derive(Debug, Clone, PartialEq)]
pub enum InsightDetail {
    Found(Insight),
    NotFound(String),
    MissingId,
}

impl InsightDetail {
    /// Message for the empty state, `None` when there is something to show.
    pub fn empty_state(&self) -> Option<&'static str> {
        match self {
            InsightDetail::Found(_) => None,
            InsightDetail::NotFound(_) => Some(NOT_FOUND),
            InsightDetail::MissingId => Some(MISSING_ID),
        }
    }
}

/// Pulls `id` out of a query string such as `?id=abc&ref=home`.
pub fn id_from_query(query: &str) -> Option<String> {
    let query = query.trim_start_matches('?');
    url::form_urlencoded
        ::parse(query.as_bytes())
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn detail_from_query(items: &[Insight], query: &str) -> InsightDetail {
    let Some(id) = id_from_query(query) else {
        return InsightDetail::MissingId;
    };
    match items.iter().find(|insight| insight.id == id) {
        Some(insight) => InsightDetail::Found(insight.clone()),
        None => InsightDetail::NotFound(id),
    }
}

/// Public insights listing.
pub struct InsightsPage {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    lifetime: CancellationToken,
}

impl InsightsPage {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            lifetime: CancellationToken::new(),
        }
    }

    pub async fn load(&self) -> Result<Vec<Insight>, ApiError> {
        let request = ApiRequest::get(endpoints::INSIGHTS);
        match self.api.fetch::<Vec<Insight>>(request, &self.lifetime).await {
            Ok(envelope) => {
                info!("Loaded {} insights", envelope.data.len());
                Ok(envelope.data)
            }
            Err(ApiError::Cancelled) => Err(ApiError::Cancelled),
            Err(e) => {
                error!("Failed to fetch insights: {}", e);
                self.notifier.error("Failed to fetch insights");
                Err(e)
            }
        }
    }

    pub async fn detail(&self, query: &str) -> Result<InsightDetail, ApiError> {
        if id_from_query(query).is_none() {
            return Ok(InsightDetail::MissingId);
        }
        let items = self.load().await?;
        Ok(detail_from_query(&items, query))
    }
}

impl Drop for InsightsPage {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::LogNotifier;
    use crate::testing::ScriptedTransport;
    use reqwest::Method;
    use serde_json::json;

    fn insights() -> serde_json::Value {
        json!({
            "success": true,
            "data": [
                { "_id": "i1", "title": "Forecasting demand in retail", "body": "<p>Seasonality matters.</p>" },
                { "_id": "i2", "title": "Governance that scales" }
            ]
        })
    }

    #[test]
    fn query_id_is_decoded() {
        assert_eq!(id_from_query("?id=i%201&ref=home"), Some("i 1".to_string()));
        assert_eq!(id_from_query("ref=home"), None);
        assert_eq!(id_from_query("?id="), None);
    }

    #[tokio::test]
    async fn detail_finds_matching_insight() {
        let transport = std::sync::Arc::new(ScriptedTransport::new());
        transport.respond(Method::GET, "/insights", 200, insights());
        let page = InsightsPage::new(ApiClient::new(transport), Arc::new(LogNotifier::new()));

        match page.detail("?id=i2").await.unwrap() {
            InsightDetail::Found(insight) => assert_eq!(insight.title, "Governance that scales"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_or_missing_id_is_an_empty_state() {
        let transport = std::sync::Arc::new(ScriptedTransport::new());
        transport.respond(Method::GET, "/insights", 200, insights());
        let page = InsightsPage::new(ApiClient::new(transport.clone()), Arc::new(LogNotifier::new()));

        let detail = page.detail("?id=nope").await.unwrap();
        assert_eq!(detail, InsightDetail::NotFound("nope".into()));
        assert_eq!(detail.empty_state(), Some(NOT_FOUND));

        let detail = page.detail("").await.unwrap();
        assert_eq!(detail.empty_state(), Some(MISSING_ID));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn failed_load_notifies() {
        let transport = std::sync::Arc::new(ScriptedTransport::new());
        transport.respond(Method::GET, "/insights", 503, json!({ "message": "Service unavailable" }));
        let notifier = Arc::new(LogNotifier::new());
        let page = InsightsPage::new(ApiClient::new(transport), notifier.clone());

        assert!(page.load().await.is_err());
        assert_eq!(notifier.notices()[0].message, "Failed to fetch insights");
    }
}
