use serde::Serialize;
use validator::Validate;

use super::FormPayload;
use crate::models::profile::Profile;

#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl FormPayload for LoginForm {}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

impl From<&Profile> for ProfileForm {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
        }
    }
}

impl FormPayload for ProfileForm {}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordForm {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl FormPayload for PasswordForm {
    fn extra_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.new_password != self.confirm_password {
            errors.push("Passwords do not match".to_string());
        }
        if !self.new_password.is_empty() && self.new_password == self.current_password {
            errors.push("New password must differ from the current one".to_string());
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ ApiError, RequestBody };

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let form = PasswordForm {
            current_password: "old-secret".into(),
            new_password: "short".into(),
            confirm_password: "shorter".into(),
        };
        assert_eq!(
            form.to_body().unwrap_err(),
            ApiError::Validation(vec![
                "New password must be at least 8 characters".into(),
                "Passwords do not match".into(),
            ])
        );
    }

    #[test]
    fn confirmation_is_not_sent() {
        let form = PasswordForm {
            current_password: "old-secret".into(),
            new_password: "new-secret-1".into(),
            confirm_password: "new-secret-1".into(),
        };
        match form.to_body().unwrap() {
            RequestBody::Json(json) => {
                assert_eq!(json["newPassword"], "new-secret-1");
                assert!(json.get("confirmPassword").is_none());
            }
            other => panic!("expected json, got {:?}", other),
        }
    }
}
