use serde::Serialize;
use validator::Validate;

use super::FormPayload;
use crate::api::Attachment;
use crate::models::leader::Leader;

/// Create/edit form for a leader. `None` fields are left out of the payload,
/// which is what makes an edit a partial patch.
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeaderForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[validate(range(max = 80, message = "Experience must be between 0 and 80 years"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects_led: Option<u32>,

    #[validate(email(message = "Please enter a valid email address"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[validate(url(message = "LinkedIn must be a valid URL"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub education: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub professional_membership: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub realised_projects: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    #[serde(skip)]
    pub image: Option<Attachment>,
}

impl LeaderForm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, image: Attachment) -> Self {
        self.image = Some(image);
        self
    }
}

/// Pre-fills the edit modal from the current record.
impl From<&Leader> for LeaderForm {
    fn from(leader: &Leader) -> Self {
        fn non_empty(s: &str) -> Option<String> {
            Some(s.to_string()).filter(|s| !s.trim().is_empty())
        }
        Self {
            name: leader.name.clone(),
            title: non_empty(leader.title.as_html()),
            bio: non_empty(leader.bio.as_html()),
            location: leader.location.clone(),
            experience: leader.experience,
            projects_led: leader.projects_led,
            email: leader.email.clone(),
            phone: leader.phone.clone(),
            linkedin: leader.linkedin.clone(),
            education: leader.education.clone(),
            professional_membership: leader.professional_membership.clone(),
            realised_projects: non_empty(leader.realised_projects.as_html()),
            is_active: Some(leader.is_active),
            image: None,
        }
    }
}

impl FormPayload for LeaderForm {
    fn attachment(&self) -> Option<&Attachment> {
        self.image.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ ApiError, RequestBody };

    fn sample() -> LeaderForm {
        LeaderForm {
            title: Some("<p>Managing Partner</p>".into()),
            experience: Some(18),
            education: vec!["MSc Statistics".into(), "BSc Mathematics".into()],
            ..LeaderForm::new("Amal Haddad")
        }
    }

    #[test]
    fn with_image_is_multipart_with_image_part() {
        let form = sample().with_image(Attachment::new("amal.jpg", "image/jpeg", vec![1, 2, 3]));
        match form.to_body().unwrap() {
            RequestBody::Multipart(multipart) => {
                assert!(multipart.has_part("image"));
                assert_eq!(multipart.text("name"), Some("Amal Haddad"));
                assert_eq!(multipart.text("experience"), Some("18"));
                assert_eq!(
                    multipart.text("education"),
                    Some(r#"["MSc Statistics","BSc Mathematics"]"#)
                );
            }
            other => panic!("expected multipart, got {:?}", other),
        }
    }

    #[test]
    fn without_image_is_json_without_image_field() {
        match sample().to_body().unwrap() {
            RequestBody::Json(json) => {
                assert!(json.get("image").is_none());
                assert_eq!(json["name"], "Amal Haddad");
                assert!(json.get("bio").is_none());
            }
            other => panic!("expected json, got {:?}", other),
        }
    }

    #[test]
    fn all_validation_messages_are_reported() {
        let form = LeaderForm {
            email: Some("not-an-email".into()),
            experience: Some(120),
            ..LeaderForm::new("  ")
        };
        let err = form.to_body().unwrap_err();
        assert_eq!(
            err,
            ApiError::Validation(vec![
                "Please enter a valid email address".into(),
                "Experience must be between 0 and 80 years".into(),
                "Name is required".into(),
            ])
        );
    }
}
