use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };

use super::rich_text::RichText;

/// A top-level service offering ("main service").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<RichText>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCategory {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
}

/// The parent reference comes back either as a bare id or populated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceRef {
    Id(String),
    Populated(ServiceCategory),
}

impl ServiceRef {
    pub fn id(&self) -> &str {
        match self {
            ServiceRef::Id(id) => id,
            ServiceRef::Populated(category) => &category.id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ServiceRef::Id(_) => None,
            ServiceRef::Populated(category) => Some(&category.name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubService {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: RichText,
    pub main_service_id: ServiceRef,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}
