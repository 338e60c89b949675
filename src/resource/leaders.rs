use reqwest::Method;

use super::{ push_common_query, ListFilters, Record, Resource };
use crate::api::endpoints;
use crate::forms::LeaderForm;
use crate::models::leader::Leader;

impl Record for Leader {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Leadership team. Unpaginated; the server returns it in `sortOrder`.
pub struct Leaders;

impl Resource for Leaders {
    type Item = Leader;
    type Form = LeaderForm;

    const LABEL: &'static str = "Leader";
    const PLURAL: &'static str = "leaders";
    const REORDER_KEY: &'static str = "leaderIds";

    fn list_path() -> &'static str {
        endpoints::LEADERS
    }

    fn create_path() -> &'static str {
        endpoints::LEADERS
    }

    fn item_path(id: &str) -> String {
        endpoints::leader(id)
    }

    fn reorder_path() -> &'static str {
        endpoints::LEADERS_REORDER
    }

    fn update_method() -> Method {
        Method::PATCH
    }

    fn list_query(filters: &ListFilters) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_common_query(&mut query, filters);
        query
    }
}
