//! REST API client
//!
//! Thin typed wrapper over the backend contract. Authentication rides in
//! a custom header carrying the raw host assertion, plus an optional
//! bearer token. Non-2xx responses are mapped to [`ClientError::Api`]
//! with the backend's `detail` message when one is present.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use volhub_core::profile::{Role, UserProfile};
use volhub_core::registration::RegistrationPayload;
use volhub_core::{Event, EventRegistration};

use crate::error::{ClientError, Result};

/// Header carrying the raw host identity assertion
pub const INIT_DATA_HEADER: &str = "X-Telegram-Init-Data";

/// Response from the verification endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub user: UserProfile,
    #[serde(default)]
    pub is_new_user: bool,
    #[serde(default)]
    pub requires_registration: bool,
}

#[derive(Debug, Deserialize)]
struct RoleChangeResponse {
    #[allow(dead_code)]
    success: bool,
    user: UserProfile,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    init_data: Option<String>,
    auth_token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.into(),
            init_data: None,
            auth_token: None,
        }
    }

    /// Attach the raw assertion to all subsequent requests
    pub fn set_init_data(&mut self, init_data: Option<String>) {
        self.init_data = init_data;
    }

    pub fn set_auth_token(&mut self, token: Option<String>) {
        self.auth_token = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.http.request(method, self.url(path));
        if let Some(init_data) = &self.init_data {
            req = req.header(INIT_DATA_HEADER, init_data);
        }
        if let Some(token) = &self.auth_token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T> {
        let resp = Self::check(req.send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn send_empty(req: RequestBuilder) -> Result<()> {
        Self::check(req.send().await?).await?;
        Ok(())
    }

    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        // Backend errors carry a `detail` field in the body
        let message = resp
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("detail")
                    .and_then(|d| d.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                format!(
                    "HTTP {}",
                    status.canonical_reason().unwrap_or(status.as_str())
                )
            });
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    // ---- Auth ----

    /// Exchange the host assertion for a verified user. An absent
    /// assertion is signaled to the backend as an empty payload.
    pub async fn verify(&self, init_data: Option<&str>) -> Result<VerifyResponse> {
        let req = self
            .http
            .post(self.url("/auth/verify"))
            .header(INIT_DATA_HEADER, init_data.unwrap_or(""));
        Self::send(req).await
    }

    pub async fn me(&self) -> Result<UserProfile> {
        Self::send(self.request(Method::GET, "/auth/me")).await
    }

    pub async fn complete_registration(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<UserProfile> {
        let req = self
            .request(Method::POST, "/auth/complete-registration")
            .json(payload);
        Self::send(req).await
    }

    /// Partial profile update; only the provided fields change
    pub async fn update_profile<T: Serialize>(&self, update: &T) -> Result<UserProfile> {
        let req = self.request(Method::PUT, "/auth/profile").json(update);
        Self::send(req).await
    }

    pub async fn delete_profile(&self) -> Result<()> {
        Self::send_empty(self.request(Method::DELETE, "/auth/delete-profile")).await
    }

    pub async fn change_user_role(&self, user_id: i64, role: Role) -> Result<UserProfile> {
        let req = self
            .request(Method::POST, &format!("/auth/change-role/{user_id}"))
            .json(&serde_json::json!({ "role": role }));
        let resp: RoleChangeResponse = Self::send(req).await?;
        Ok(resp.user)
    }

    // ---- Events ----

    pub async fn list_events(&self, query: &[(&str, &str)]) -> Result<Vec<Event>> {
        Self::send(self.request(Method::GET, "/events").query(query)).await
    }

    pub async fn get_event(&self, id: i64) -> Result<Event> {
        Self::send(self.request(Method::GET, &format!("/events/{id}"))).await
    }

    pub async fn create_event<T: Serialize>(&self, event: &T) -> Result<Event> {
        Self::send(self.request(Method::POST, "/events").json(event)).await
    }

    pub async fn update_event<T: Serialize>(&self, id: i64, event: &T) -> Result<Event> {
        Self::send(self.request(Method::PUT, &format!("/events/{id}")).json(event)).await
    }

    pub async fn delete_event(&self, id: i64) -> Result<()> {
        Self::send_empty(self.request(Method::DELETE, &format!("/events/{id}"))).await
    }

    /// Events created by the current user (organizer view)
    pub async fn my_events(&self) -> Result<Vec<Event>> {
        Self::send(self.request(Method::GET, "/events/my/created")).await
    }

    // ---- Registrations ----

    pub async fn my_registrations(&self) -> Result<Vec<EventRegistration>> {
        Self::send(self.request(Method::GET, "/registrations/my")).await
    }

    pub async fn register_for_event<T: Serialize>(
        &self,
        registration: &T,
    ) -> Result<EventRegistration> {
        Self::send(self.request(Method::POST, "/registrations").json(registration)).await
    }

    pub async fn update_registration<T: Serialize>(
        &self,
        id: i64,
        update: &T,
    ) -> Result<EventRegistration> {
        Self::send(
            self.request(Method::PUT, &format!("/registrations/{id}"))
                .json(update),
        )
        .await
    }

    pub async fn cancel_registration(&self, id: i64) -> Result<()> {
        Self::send_empty(self.request(Method::DELETE, &format!("/registrations/{id}"))).await
    }

    pub async fn event_registrations(&self, event_id: i64) -> Result<Vec<EventRegistration>> {
        Self::send(self.request(Method::GET, &format!("/registrations/event/{event_id}"))).await
    }

    // ---- Admin (arrays/objects passed through as-is) ----

    pub async fn admin_users(&self) -> Result<serde_json::Value> {
        Self::send(self.request(Method::GET, "/admin/users")).await
    }

    pub async fn admin_organizations(&self) -> Result<serde_json::Value> {
        Self::send(self.request(Method::GET, "/admin/organizations")).await
    }

    pub async fn admin_events(&self) -> Result<serde_json::Value> {
        Self::send(self.request(Method::GET, "/admin/events")).await
    }

    pub async fn admin_stats(&self) -> Result<serde_json::Value> {
        Self::send(self.request(Method::GET, "/admin/stats")).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("init_data", &self.init_data.is_some())
            .field("auth_token", &self.auth_token.is_some())
            .finish()
    }
}
