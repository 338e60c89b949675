use serde::Serialize;
use validator::Validate;

use super::FormPayload;
use crate::models::service::SubService;

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubServiceForm {
    #[validate(length(min = 1, max = 120, message = "Name is required (max 120 characters)"))]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[validate(length(min = 1, message = "Main service is required"))]
    pub main_service_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl SubServiceForm {
    pub fn new(name: impl Into<String>, main_service_id: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            main_service_id: main_service_id.into().trim().to_string(),
            ..Self::default()
        }
    }
}

impl From<&SubService> for SubServiceForm {
    fn from(sub: &SubService) -> Self {
        Self {
            name: sub.name.clone(),
            description: Some(sub.description.as_html().to_string()).filter(|d| !d.is_empty()),
            main_service_id: sub.main_service_id.id().to_string(),
            is_active: Some(sub.is_active),
            order: Some(sub.order),
        }
    }
}

impl FormPayload for SubServiceForm {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ ApiError, RequestBody };

    #[test]
    fn requires_parent_service() {
        let err = SubServiceForm::new("Churn modelling", " ").to_body().unwrap_err();
        assert_eq!(err, ApiError::Validation(vec!["Main service is required".into()]));
    }

    #[test]
    fn serializes_camel_case() {
        let mut form = SubServiceForm::new("Churn modelling", "m1");
        form.is_active = Some(false);
        match form.to_body().unwrap() {
            RequestBody::Json(json) => {
                assert_eq!(json["mainServiceId"], "m1");
                assert_eq!(json["isActive"], false);
                assert!(json.get("order").is_none());
            }
            other => panic!("expected json, got {:?}", other),
        }
    }
}
