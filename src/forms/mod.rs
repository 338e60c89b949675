//! Typed form payloads. Each admin/public form is a struct validated before
//! anything is sent; the same struct decides between a JSON body and a
//! multipart body depending on whether a file is attached.

pub mod contact;
pub mod leader;
pub mod profile;
pub mod sub_service;

pub use contact::ContactForm;
pub use leader::LeaderForm;
pub use profile::{ LoginForm, PasswordForm, ProfileForm };
pub use sub_service::SubServiceForm;

use serde::Serialize;
use serde_json::Value as JsonValue;
use validator::{ Validate, ValidationErrors };

use crate::api::{ ApiError, Attachment, MultipartForm, RequestBody };

pub trait FormPayload: Serialize + Validate + Send + Sync {
    fn attachment(&self) -> Option<&Attachment> {
        None
    }

    /// Multipart part name the attachment travels under.
    fn attachment_field(&self) -> &'static str {
        "image"
    }

    /// Cross-field rules the derive can't express.
    fn extra_errors(&self) -> Vec<String> {
        Vec::new()
    }

    fn check(&self) -> Result<(), ApiError> {
        let mut messages = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => validation_messages(&errors),
        };
        messages.extend(self.extra_errors());
        if messages.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(messages))
        }
    }

    fn to_body(&self) -> Result<RequestBody, ApiError> {
        self.check()?;
        let json = serde_json::to_value(self)?;
        match self.attachment() {
            Some(file) => {
                Ok(RequestBody::Multipart(multipart_from_json(&json, self.attachment_field(), file)))
            }
            None => Ok(RequestBody::Json(json)),
        }
    }
}

/// Flattens field errors into display strings, ordered by field name so the
/// joined notice is stable.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut messages = Vec::new();
    for (field, field_errors) in fields {
        for error in field_errors.iter() {
            let message = match &error.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            };
            messages.push(message);
        }
    }
    messages
}

/// Scalars become text parts; lists and objects are JSON-encoded strings.
fn multipart_from_json(json: &JsonValue, file_field: &str, file: &Attachment) -> MultipartForm {
    let mut form = MultipartForm::default();
    if let JsonValue::Object(map) = json {
        for (key, value) in map {
            let text = match value {
                JsonValue::Null => continue,
                JsonValue::String(s) => s.clone(),
                JsonValue::Bool(_) | JsonValue::Number(_) => value.to_string(),
                JsonValue::Array(_) | JsonValue::Object(_) => value.to_string(),
            };
            form.fields.push((key.clone(), text));
        }
    }
    form.files.push((file_field.to_string(), file.clone()));
    form
}
