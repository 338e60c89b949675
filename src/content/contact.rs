use log::{ error, info };
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::api::{ endpoints, ApiClient, ApiError, ApiRequest };
use crate::forms::{ ContactForm, FormPayload };
use crate::notify::Notifier;

pub const SENT: &str = "Thank you! Your message has been sent.";
const FAILED: &str = "Failed to send message. Please try again.";

pub struct ContactPage {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    lifetime: CancellationToken,
}

impl ContactPage {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            lifetime: CancellationToken::new(),
        }
    }

    pub async fn submit(&self, form: &ContactForm) -> Result<(), ApiError> {
        let result = async {
            let body = form.to_body()?;
            let request = ApiRequest::post(endpoints::CONTACT).body(body);
            self.api.execute(request, &self.lifetime).await
        }.await;

        match result {
            Ok(_) => {
                info!("Contact message sent for {}", form.email);
                self.notifier.success(SENT);
                Ok(())
            }
            Err(ApiError::Cancelled) => Err(ApiError::Cancelled),
            Err(e) => {
                error!("Contact submission failed: {}", e);
                let message = match &e {
                    ApiError::Validation(_) => e.to_string(),
                    _ => FAILED.to_string(),
                };
                self.notifier.error(&message);
                Err(e)
            }
        }
    }
}

impl Drop for ContactPage {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
