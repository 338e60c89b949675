use log::info;
use reqwest::Method;

use super::{ push_common_query, ListController, ListFilters, MutationOutcome, Record, Resource };
use crate::api::{ endpoints, ApiError, ApiRequest };
use crate::forms::SubServiceForm;
use crate::models::service::{ Service, ServiceCategory, SubService };

impl Record for SubService {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Sub-services, paginated server-side and filterable by parent service.
pub struct SubServices;

impl Resource for SubServices {
    type Item = SubService;
    type Form = SubServiceForm;

    const LABEL: &'static str = "Sub-service";
    const PLURAL: &'static str = "sub-services";
    const REORDER_KEY: &'static str = "subServiceIds";

    fn list_path() -> &'static str {
        endpoints::SUB_SERVICES_ALL
    }

    fn create_path() -> &'static str {
        endpoints::SUB_SERVICES
    }

    fn item_path(id: &str) -> String {
        endpoints::sub_service(id)
    }

    fn reorder_path() -> &'static str {
        endpoints::SUB_SERVICES_REORDER
    }

    fn update_method() -> Method {
        Method::PUT
    }

    fn list_query(filters: &ListFilters) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), filters.page.to_string()),
            ("limit".to_string(), filters.limit.to_string())
        ];
        push_common_query(&mut query, filters);
        if let Some(category) = &filters.category {
            query.push(("mainServiceId".to_string(), category.clone()));
        }
        query
    }
}

/// Sub-services are listed a page at a time, so `handle_drop` reorders and
/// submits only the ids of the loaded page. Items on other pages keep their
/// server-side positions.
impl ListController<SubServices> {
    /// Flips `isActive` server-side, then re-fetches.
    pub async fn toggle_status(&self, id: &str) -> Result<MutationOutcome, ApiError> {
        let request = ApiRequest::patch(endpoints::sub_service_toggle(id));
        match self.api().execute(request, self.lifetime()).await {
            Ok(_) => {
                info!("Toggled status of sub-service {}", id);
                self.notifier().success("Sub-service status updated");
                self.refresh_after_mutation().await;
                Ok(MutationOutcome::Completed)
            }
            Err(e) => {
                self.report("update status of", &e);
                Err(e)
            }
        }
    }

    /// Parent categories for the filter dropdown.
    pub async fn categories(&self) -> Result<Vec<ServiceCategory>, ApiError> {
        let request = ApiRequest::get(endpoints::SERVICE_CATEGORIES);
        match self.api().fetch::<Vec<ServiceCategory>>(request, self.lifetime()).await {
            Ok(envelope) => Ok(envelope.data),
            Err(e) => {
                self.report("load categories for", &e);
                Err(e)
            }
        }
    }

    /// Main services for the form's parent select.
    pub async fn main_services(&self) -> Result<Vec<Service>, ApiError> {
        let request = ApiRequest::get(endpoints::SERVICES);
        match self.api().fetch::<Vec<Service>>(request, self.lifetime()).await {
            Ok(envelope) => Ok(envelope.data),
            Err(e) => {
                self.report("load services for", &e);
                Err(e)
            }
        }
    }

    /// Loads the list and the filter categories together, as the page does on mount.
    pub async fn mount_with_categories(&self) -> Result<Vec<ServiceCategory>, ApiError> {
        let (_, categories) = futures::future::try_join(self.fetch(), self.categories()).await?;
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ ApiClient, RequestBody };
    use crate::notify::LogNotifier;
    use crate::resource::StatusFilter;
    use crate::testing::ScriptedTransport;
    use serde_json::json;
    use std::sync::Arc;

    const LIST: &str = "/services/sub-services/all";

    fn page(ids: &[&str], current: u32) -> serde_json::Value {
        let data: Vec<_> = ids
            .iter()
            .map(|id| json!({ "_id": id, "name": id, "mainServiceId": "m1" }))
            .collect();
        json!({
            "success": true,
            "data": data,
            "pagination": { "currentPage": current, "totalPages": 3, "totalItems": 25, "itemsPerPage": 10 }
        })
    }

    fn setup() -> (Arc<ScriptedTransport>, ListController<SubServices>) {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(Method::GET, LIST, 200, page(&["s1", "s2"], 1));
        let controller = ListController::<SubServices>::new(
            ApiClient::new(transport.clone()),
            Arc::new(LogNotifier::new())
        );
        (transport, controller)
    }

    fn last_list_query(transport: &ScriptedTransport) -> crate::api::ApiRequest {
        transport.requests_to(Method::GET, LIST).pop().unwrap()
    }

    #[tokio::test]
    async fn filter_changes_reset_to_first_page() {
        let (transport, controller) = setup();
        controller.mount().await.unwrap();

        controller.set_page(3).await.unwrap();
        assert_eq!(last_list_query(&transport).query_value("page"), Some("3"));

        controller.set_search("forecast").await.unwrap();
        let sent = last_list_query(&transport);
        assert_eq!(sent.query_value("page"), Some("1"));
        assert_eq!(sent.query_value("search"), Some("forecast"));

        controller.set_page(2).await.unwrap();
        controller.set_status(StatusFilter::Inactive).await.unwrap();
        let sent = last_list_query(&transport);
        assert_eq!(sent.query_value("page"), Some("1"));
        assert_eq!(sent.query_value("status"), Some("inactive"));
        assert_eq!(sent.query_value("search"), Some("forecast"));

        controller.set_page(2).await.unwrap();
        controller.set_category(Some("m7".into())).await.unwrap();
        let sent = last_list_query(&transport);
        assert_eq!(sent.query_value("page"), Some("1"));
        assert_eq!(sent.query_value("mainServiceId"), Some("m7"));
    }

    #[tokio::test]
    async fn pagination_is_kept_from_the_response() {
        let (_, controller) = setup();
        controller.mount().await.unwrap();
        let pagination = controller.snapshot().pagination.unwrap();
        assert_eq!(pagination.total_pages, 3);
        assert!(pagination.has_next());
        assert!(!pagination.has_previous());
    }

    #[tokio::test]
    async fn toggle_status_patches_then_refetches() {
        let (transport, controller) = setup();
        transport.respond(
            Method::PATCH,
            "/services/sub-services/s1/toggle-status",
            200,
            json!({ "success": true })
        );

        controller.toggle_status("s1").await.unwrap();

        assert_eq!(transport.requests_to(Method::PATCH, "/services/sub-services/s1/toggle-status").len(), 1);
        assert_eq!(transport.requests_to(Method::GET, LIST).len(), 1);
    }

    #[tokio::test]
    async fn update_uses_put_and_reorder_uses_sub_service_key() {
        let (transport, controller) = setup();
        transport.respond(Method::PUT, "/services/sub-services/s2", 200, json!({ "success": true }));
        transport.respond(Method::PATCH, "/services/sub-services/reorder", 200, json!({ "success": true }));
        controller.mount().await.unwrap();

        controller.update("s2", &SubServiceForm::new("Renamed", "m1")).await.unwrap();
        controller.handle_drop(crate::reorder::DropEvent::new(1, 0)).await.unwrap();

        let reorder = transport.requests_to(Method::PATCH, "/services/sub-services/reorder");
        assert_eq!(reorder[0].body, RequestBody::Json(json!({ "subServiceIds": ["s2", "s1"] })));
    }

    #[tokio::test]
    async fn drop_on_a_later_page_submits_that_page_only() {
        let (transport, controller) = setup();
        transport.respond(Method::PATCH, "/services/sub-services/reorder", 200, json!({ "success": true }));
        controller.mount().await.unwrap();
        transport.respond(Method::GET, LIST, 200, page(&["s11", "s12", "s13"], 2));
        controller.set_page(2).await.unwrap();

        controller.handle_drop(crate::reorder::DropEvent::new(2, 0)).await.unwrap();

        let reorder = transport.requests_to(Method::PATCH, "/services/sub-services/reorder");
        assert_eq!(reorder[0].body, RequestBody::Json(json!({ "subServiceIds": ["s13", "s11", "s12"] })));
    }

    #[tokio::test]
    async fn mount_loads_list_and_categories() {
        let (transport, controller) = setup();
        transport.respond(
            Method::GET,
            "/services/categories",
            200,
            json!({ "data": [{ "_id": "m1", "name": "Data Strategy" }] })
        );

        let categories = controller.mount_with_categories().await.unwrap();

        assert_eq!(categories[0].name, "Data Strategy");
        assert_eq!(controller.items().len(), 2);
    }
}
