use serde::Serialize;
use validator::Validate;

use super::FormPayload;

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[validate(length(min = 10, max = 5000, message = "Message must be between 10 and 5000 characters"))]
    pub message: String,
}

impl FormPayload for ContactForm {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    #[test]
    fn empty_form_lists_every_problem() {
        let err = ContactForm::default().check().unwrap_err();
        assert_eq!(
            err,
            ApiError::Validation(vec![
                "Please enter a valid email address".into(),
                "Message must be between 10 and 5000 characters".into(),
                "Name is required".into(),
            ])
        );
    }
}
