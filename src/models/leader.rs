use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };

use super::rich_text::RichText;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leader {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: RichText,
    #[serde(default)]
    pub bio: RichText,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Years of experience.
    #[serde(default)]
    pub experience: Option<u32>,
    #[serde(default)]
    pub projects_led: Option<u32>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub professional_membership: Vec<String>,
    #[serde(default)]
    pub realised_projects: RichText,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}
