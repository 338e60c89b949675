use log::{ error, info, warn };
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::api::{ endpoints, ApiClient, ApiError, ApiRequest };
use crate::forms::{ FormPayload, LoginForm, PasswordForm, ProfileForm };
use crate::models::profile::{ LoginResponse, Profile };
use crate::notify::Notifier;
use crate::session::{ CachedUser, Session };

/// Signed-in admin account: login/logout, profile details, password.
pub struct ProfileController {
    api: ApiClient,
    session: Session,
    notifier: Arc<dyn Notifier>,
    lifetime: CancellationToken,
}

impl ProfileController {
    pub fn new(api: ApiClient, session: Session, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            session,
            notifier,
            lifetime: CancellationToken::new(),
        }
    }

    /// Cached user when it is usable, `/auth/me` otherwise.
    pub async fn load(&self) -> Result<Profile, ApiError> {
        match self.session.user()? {
            CachedUser::Present(profile) => Ok(profile),
            CachedUser::Missing | CachedUser::Corrupt => self.refresh().await,
        }
    }

    /// Re-fetches `/auth/me` and re-caches it.
    pub async fn refresh(&self) -> Result<Profile, ApiError> {
        let request = ApiRequest::get(endpoints::AUTH_ME);
        match self.api.fetch::<Profile>(request, &self.lifetime).await {
            Ok(envelope) => {
                self.session.set_user(&envelope.data)?;
                Ok(envelope.data)
            }
            Err(e) => {
                self.report("load profile", &e);
                Err(e)
            }
        }
    }

    pub async fn login(&self, form: &LoginForm) -> Result<Profile, ApiError> {
        let result = async {
            let request = ApiRequest::post(endpoints::AUTH_LOGIN).body(form.to_body()?);
            let response = self.api.execute(request, &self.lifetime).await?;
            parse_login(response.body)
        }.await;

        match result {
            Ok(login) => {
                self.session.set_token(&login.token)?;
                self.session.set_user(&login.user)?;
                info!("Signed in as {}", login.user.email);
                self.notifier.success("Logged in successfully");
                Ok(login.user)
            }
            Err(e) => {
                self.report("log in", &e);
                Err(e)
            }
        }
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.session.clear()?;
        info!("Signed out");
        self.notifier.info("Logged out");
        Ok(())
    }

    /// Saves name/email, then re-fetches so the cache matches the server.
    pub async fn update(&self, form: &ProfileForm) -> Result<Profile, ApiError> {
        let result = async {
            let request = ApiRequest::put(endpoints::AUTH_PROFILE).body(form.to_body()?);
            self.api.execute(request, &self.lifetime).await
        }.await;

        match result {
            Ok(_) => {
                self.notifier.success("Profile updated successfully");
                self.refresh().await
            }
            Err(e) => {
                self.report("update profile", &e);
                Err(e)
            }
        }
    }

    pub async fn change_password(&self, form: &PasswordForm) -> Result<(), ApiError> {
        let result = async {
            let request = ApiRequest::put(endpoints::AUTH_CHANGE_PASSWORD).body(form.to_body()?);
            self.api.execute(request, &self.lifetime).await
        }.await;

        match result {
            Ok(_) => {
                self.notifier.success("Password changed successfully");
                Ok(())
            }
            Err(e) => {
                self.report("change password", &e);
                Err(e)
            }
        }
    }

    fn report(&self, action: &str, e: &ApiError) {
        if e.is_cancelled() {
            return;
        }
        error!("Failed to {}: {}", action, e);
        let message = e.user_message().unwrap_or_else(|| format!("Failed to {}", action));
        self.notifier.error(&message);
    }
}

impl Drop for ProfileController {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

/// Accepts both `{ token, user }` and the same wrapped in `data`.
fn parse_login(mut body: JsonValue) -> Result<LoginResponse, ApiError> {
    if body.get("token").is_none() {
        if let Some(data) = body.get_mut("data") {
            warn!("Login response wrapped in envelope");
            body = data.take();
        }
    }
    Ok(serde_json::from_value(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::LogNotifier;
    use crate::session::{ MemorySessionStore, SessionKey, SessionStore };
    use crate::testing::ScriptedTransport;
    use reqwest::Method;
    use serde_json::json;

    fn me() -> JsonValue {
        json!({ "success": true, "data": { "_id": "u1", "name": "Admin", "email": "admin@example.com", "role": "admin" } })
    }

    fn setup(store: Arc<MemorySessionStore>) -> (Arc<ScriptedTransport>, Arc<LogNotifier>, ProfileController) {
        let transport = Arc::new(ScriptedTransport::new());
        let notifier = Arc::new(LogNotifier::new());
        let controller = ProfileController::new(
            ApiClient::new(transport.clone()),
            Session::new(store),
            notifier.clone()
        );
        (transport, notifier, controller)
    }

    #[tokio::test]
    async fn corrupt_cached_user_falls_back_to_me() {
        let store = Arc::new(MemorySessionStore::default());
        store.set(SessionKey::User, "{\"name\": ").unwrap();
        let (transport, _, controller) = setup(store.clone());
        transport.respond(Method::GET, "/auth/me", 200, me());

        let profile = controller.load().await.unwrap();

        assert_eq!(profile.email, "admin@example.com");
        assert_eq!(transport.requests_to(Method::GET, "/auth/me").len(), 1);
        assert!(matches!(Session::new(store).user().unwrap(), CachedUser::Present(_)));
    }

    #[tokio::test]
    async fn cached_user_needs_no_request() {
        let store = Arc::new(MemorySessionStore::default());
        let (transport, _, controller) = setup(store.clone());
        transport.respond(Method::GET, "/auth/me", 200, me());
        controller.load().await.unwrap();

        controller.load().await.unwrap();
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn login_stores_token_and_user() {
        let store = Arc::new(MemorySessionStore::default());
        let (transport, _, controller) = setup(store.clone());
        transport.respond(
            Method::POST,
            "/auth/login",
            200,
            json!({ "token": "jwt-123", "user": { "id": "u1", "name": "Admin", "email": "admin@example.com" } })
        );

        let form = LoginForm { email: "admin@example.com".into(), password: "pw".into() };
        controller.login(&form).await.unwrap();

        let session = Session::new(store);
        assert_eq!(session.token().unwrap().as_deref(), Some("jwt-123"));
        controller.logout().unwrap();
        assert!(!session.is_authenticated().unwrap());
        assert_eq!(session.user().unwrap(), CachedUser::Missing);
    }

    #[tokio::test]
    async fn wrong_credentials_surface_server_message() {
        let (transport, notifier, controller) = setup(Arc::new(MemorySessionStore::default()));
        transport.respond(Method::POST, "/auth/login", 401, json!({ "message": "Invalid credentials" }));

        let form = LoginForm { email: "admin@example.com".into(), password: "bad".into() };
        assert!(controller.login(&form).await.is_err());
        assert_eq!(notifier.notices()[0].message, "Invalid credentials");
    }

    #[tokio::test]
    async fn update_puts_then_recaches() {
        let (transport, _, controller) = setup(Arc::new(MemorySessionStore::default()));
        transport.respond(Method::PUT, "/auth/profile", 200, json!({ "success": true }));
        transport.respond(Method::GET, "/auth/me", 200, me());

        let form = ProfileForm { name: "Admin".into(), email: "admin@example.com".into() };
        controller.update(&form).await.unwrap();

        let sent = transport.requests_to(Method::PUT, "/auth/profile");
        assert_eq!(sent[0].body, crate::api::RequestBody::Json(json!({ "name": "Admin", "email": "admin@example.com" })));
        assert_eq!(transport.requests_to(Method::GET, "/auth/me").len(), 1);
    }

    #[tokio::test]
    async fn mismatched_passwords_never_leave_the_client() {
        let (transport, notifier, controller) = setup(Arc::new(MemorySessionStore::default()));
        let form = PasswordForm {
            current_password: "old-password".into(),
            new_password: "new-password".into(),
            confirm_password: "new-passw0rd".into(),
        };

        assert!(controller.change_password(&form).await.is_err());
        assert!(transport.requests().is_empty());
        assert_eq!(notifier.notices()[0].message, "Passwords do not match");
    }
}
