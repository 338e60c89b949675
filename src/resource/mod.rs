//! Admin list pages: one generic controller drives fetch, filters, the
//! create/edit modal, confirmed deletes and drag reordering for any resource.
//!
//! The server owns every list. Mutations never patch `items` locally; they
//! re-fetch. The one optimistic write is the drag reorder, which is rolled
//! back by re-fetching if the server refuses it.

pub mod leaders;
pub mod sub_services;

pub use leaders::Leaders;
pub use sub_services::SubServices;

use log::{ error, info, warn };
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{ Map, Value as JsonValue };
use std::marker::PhantomData;
use std::sync::{ Arc, Mutex, MutexGuard };
use tokio_util::sync::CancellationToken;

use crate::api::{ ApiClient, ApiError, ApiRequest };
use crate::forms::FormPayload;
use crate::models::pagination::Pagination;
use crate::notify::Notifier;
use crate::reorder::{ self, DropEvent };

pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub trait Record: DeserializeOwned + Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

/// Endpoint layout and wording for one admin resource.
pub trait Resource: Send + Sync + 'static {
    type Item: Record;
    type Form: FormPayload;

    /// Capitalised singular, used in notices ("Leader created successfully").
    const LABEL: &'static str;
    /// Lower-case plural, used in failure notices ("Failed to fetch leaders").
    const PLURAL: &'static str;
    /// Key of the id list in the reorder body.
    const REORDER_KEY: &'static str;

    fn list_path() -> &'static str;
    fn create_path() -> &'static str;
    fn item_path(id: &str) -> String;
    fn reorder_path() -> &'static str;
    fn update_method() -> Method;
    fn list_query(filters: &ListFilters) -> Vec<(String, String)>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn as_query(&self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Active => Some("active"),
            StatusFilter::Inactive => Some("inactive"),
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "inactive" => Ok(StatusFilter::Inactive),
            _ => Err(format!("Invalid status filter: '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilters {
    pub search: String,
    pub status: StatusFilter,
    pub category: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for ListFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            category: None,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormModal {
    #[default]
    Closed,
    Creating,
    Editing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Completed,
    /// Another submission is still in flight; nothing was sent.
    Busy,
    /// Nothing to do, nothing was sent.
    NoChange,
}

#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub submitting: bool,
    pub filters: ListFilters,
    pub pagination: Option<Pagination>,
    pub modal: FormModal,
    pub pending_delete: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            submitting: false,
            filters: ListFilters::default(),
            pagination: None,
            modal: FormModal::Closed,
            pending_delete: None,
        }
    }
}

pub struct ListController<R: Resource> {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    state: Mutex<ListState<R::Item>>,
    lifetime: CancellationToken,
    _resource: PhantomData<R>,
}

impl<R: Resource> ListController<R> {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: Mutex::new(ListState::default()),
            lifetime: CancellationToken::new(),
            _resource: PhantomData,
        }
    }

    fn state(&self) -> MutexGuard<'_, ListState<R::Item>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> ListState<R::Item> {
        self.state().clone()
    }

    pub fn items(&self) -> Vec<R::Item> {
        self.state().items.clone()
    }

    pub fn ids(&self) -> Vec<String> {
        self.state()
            .items.iter()
            .map(|item| item.id().to_string())
            .collect()
    }

    pub(crate) fn api(&self) -> &ApiClient {
        &self.api
    }

    pub(crate) fn lifetime(&self) -> &CancellationToken {
        &self.lifetime
    }

    pub(crate) fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Cancels everything in flight; late responses are dropped.
    pub fn close(&self) {
        self.lifetime.cancel();
    }

    pub async fn mount(&self) -> Result<(), ApiError> {
        self.fetch().await
    }

    pub async fn fetch(&self) -> Result<(), ApiError> {
        let filters = {
            let mut state = self.state();
            state.loading = true;
            state.filters.clone()
        };
        let request = ApiRequest::get(R::list_path()).with_query(R::list_query(&filters));
        let result = self.api.fetch::<Vec<R::Item>>(request, &self.lifetime).await;

        let mut state = self.state();
        match result {
            Ok(envelope) => {
                state.loading = false;
                state.items = envelope.data;
                state.pagination = envelope.pagination;
                info!("Loaded {} {}", state.items.len(), R::PLURAL);
                Ok(())
            }
            Err(ApiError::Cancelled) => {
                state.loading = false;
                Err(ApiError::Cancelled)
            }
            Err(e) => {
                state.loading = false;
                drop(state);
                error!("Failed to fetch {}: {}", R::PLURAL, e);
                self.notifier.error(&format!("Failed to fetch {}", R::PLURAL));
                Err(e)
            }
        }
    }

    pub async fn set_search(&self, term: &str) -> Result<(), ApiError> {
        {
            let mut state = self.state();
            state.filters.search = term.trim().to_string();
            state.filters.page = 1;
        }
        self.fetch().await
    }

    pub async fn set_status(&self, status: StatusFilter) -> Result<(), ApiError> {
        {
            let mut state = self.state();
            state.filters.status = status;
            state.filters.page = 1;
        }
        self.fetch().await
    }

    pub async fn set_category(&self, category: Option<String>) -> Result<(), ApiError> {
        {
            let mut state = self.state();
            state.filters.category = category.filter(|c| !c.trim().is_empty());
            state.filters.page = 1;
        }
        self.fetch().await
    }

    pub async fn set_page(&self, page: u32) -> Result<(), ApiError> {
        self.state().filters.page = page.max(1);
        self.fetch().await
    }

    pub async fn clear_filters(&self) -> Result<(), ApiError> {
        {
            let mut state = self.state();
            let limit = state.filters.limit;
            state.filters = ListFilters { limit, ..ListFilters::default() };
        }
        self.fetch().await
    }

    /// Replaces every filter at once, keeping the caller's page.
    pub async fn apply_filters(&self, filters: ListFilters) -> Result<(), ApiError> {
        self.state().filters = ListFilters { page: filters.page.max(1), ..filters };
        self.fetch().await
    }

    pub fn open_create(&self) {
        self.state().modal = FormModal::Creating;
    }

    pub fn open_edit(&self, id: &str) {
        self.state().modal = FormModal::Editing(id.to_string());
    }

    pub fn close_form(&self) {
        self.state().modal = FormModal::Closed;
    }

    pub async fn create(&self, form: &R::Form) -> Result<MutationOutcome, ApiError> {
        let request = ApiRequest::post(R::create_path());
        self.submit(request, form, "create", "created").await
    }

    pub async fn update(&self, id: &str, form: &R::Form) -> Result<MutationOutcome, ApiError> {
        let request = ApiRequest::new(R::update_method(), R::item_path(id));
        self.submit(request, form, "update", "updated").await
    }

    async fn submit(
        &self,
        request: ApiRequest,
        form: &R::Form,
        action: &str,
        done: &str
    ) -> Result<MutationOutcome, ApiError> {
        let body = match form.to_body() {
            Ok(body) => body,
            Err(e) => {
                self.report(action, &e);
                return Err(e);
            }
        };
        if !self.begin_submit() {
            return Ok(MutationOutcome::Busy);
        }

        let result = self.api.execute(request.body(body), &self.lifetime).await;
        self.end_submit();

        match result {
            Ok(_) => {
                self.close_form();
                self.notifier.success(&format!("{} {} successfully", R::LABEL, done));
                self.refresh_after_mutation().await;
                Ok(MutationOutcome::Completed)
            }
            Err(e) => {
                self.report(action, &e);
                Err(e)
            }
        }
    }

    /// Opens the confirmation step; nothing is sent yet.
    pub fn request_delete(&self, id: &str) {
        self.state().pending_delete = Some(id.to_string());
    }

    pub fn cancel_delete(&self) {
        self.state().pending_delete = None;
    }

    pub async fn confirm_delete(&self) -> Result<MutationOutcome, ApiError> {
        let id = match self.state().pending_delete.clone() {
            Some(id) => id,
            None => return Ok(MutationOutcome::NoChange),
        };
        if !self.begin_submit() {
            return Ok(MutationOutcome::Busy);
        }

        let request = ApiRequest::delete(R::item_path(&id));
        let result = self.api.execute(request, &self.lifetime).await;
        {
            let mut state = self.state();
            state.submitting = false;
            state.pending_delete = None;
        }

        match result {
            Ok(_) => {
                self.notifier.success(&format!("{} deleted successfully", R::LABEL));
                self.refresh_after_mutation().await;
                Ok(MutationOutcome::Completed)
            }
            Err(e) => {
                self.report("delete", &e);
                Err(e)
            }
        }
    }

    /// Applies a drop optimistically and persists the new order.
    pub async fn handle_drop(&self, event: DropEvent) -> Result<MutationOutcome, ApiError> {
        let ids = {
            let mut state = self.state();
            match reorder::apply_drop(&state.items, &event) {
                Some(reordered) => {
                    state.items = reordered;
                    state.items
                        .iter()
                        .map(|item| item.id().to_string())
                        .collect::<Vec<_>>()
                }
                None => {
                    return Ok(MutationOutcome::NoChange);
                }
            }
        };
        self.reorder(ids).await
    }

    /// Sends the full id sequence in one request. On failure the list is
    /// re-fetched so it shows the last order the server confirmed.
    pub async fn reorder(&self, ids: Vec<String>) -> Result<MutationOutcome, ApiError> {
        let mut body = Map::new();
        body.insert(
            R::REORDER_KEY.to_string(),
            JsonValue::Array(ids.into_iter().map(JsonValue::String).collect())
        );
        let request = ApiRequest::patch(R::reorder_path()).json(JsonValue::Object(body));

        match self.api.execute(request, &self.lifetime).await {
            Ok(_) => {
                self.notifier.success(&format!("{} order updated", R::LABEL));
                Ok(MutationOutcome::Completed)
            }
            Err(ApiError::Cancelled) => Err(ApiError::Cancelled),
            Err(e) => {
                self.report("reorder", &e);
                warn!("Reorder of {} rejected, restoring server order", R::PLURAL);
                if let Err(refetch) = self.fetch().await {
                    warn!("Could not restore {} order: {}", R::PLURAL, refetch);
                }
                Err(e)
            }
        }
    }

    fn begin_submit(&self) -> bool {
        let mut state = self.state();
        if state.submitting {
            warn!("Ignoring {} submission while another is in flight", R::PLURAL);
            return false;
        }
        state.submitting = true;
        true
    }

    fn end_submit(&self) {
        self.state().submitting = false;
    }

    pub(crate) async fn refresh_after_mutation(&self) {
        if let Err(e) = self.fetch().await {
            warn!("Refresh of {} after mutation failed: {}", R::PLURAL, e);
        }
    }

    pub(crate) fn report(&self, action: &str, err: &ApiError) {
        if err.is_cancelled() {
            return;
        }
        error!("Failed to {} {}: {}", action, R::PLURAL, err);
        let message = err
            .user_message()
            .unwrap_or_else(|| format!("Failed to {} {}", action, R::LABEL.to_lowercase()));
        self.notifier.error(&message);
    }
}

impl<R: Resource> Drop for ListController<R> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

pub(crate) fn push_common_query(query: &mut Vec<(String, String)>, filters: &ListFilters) {
    if !filters.search.is_empty() {
        query.push(("search".to_string(), filters.search.clone()));
    }
    if let Some(status) = filters.status.as_query() {
        query.push(("status".to_string(), status.to_string()));
    }
}
