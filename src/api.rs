// 🌐 Backend REST Client
// JSON over HTTP against the FinWise backend. The session cookie rides
// in the client's cookie store; there is no signing, token refresh, or
// retry - a failed call surfaces an error and prior state stands.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::entities::{Child, EducationPlan, FamilyProfile};
use crate::session::AuthUser;
use crate::summary::{family_summary, FamilySummary};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const API_URL_ENV: &str = "FINWISE_API_URL";

// ============================================================================
// ERROR TAXONOMY
// ============================================================================

/// What went wrong talking to the backend.
///
/// Validation errors never reach this module - forms are validated
/// client-side before a request is built.
#[derive(Debug)]
pub enum ApiError {
    /// No usable response (connection refused, timeout, unreadable body)
    Network(String),

    /// The backend answered with a 4xx/5xx and a best-effort message
    Server { status: u16, message: String },
}

impl ApiError {
    /// True for responses that mean the session cookie is no longer
    /// accepted; callers clear the session store on these.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Server {
                status: 401 | 403,
                ..
            }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Server { status: 404, .. })
    }

    /// Message suitable for the inline error banner
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(detail) => {
                format!("Could not reach the server: {}", detail)
            }
            ApiError::Server { status: 401 | 403, .. } => {
                "Session expired. Please log in again.".to_string()
            }
            ApiError::Server { status: 400, message } => {
                if message.is_empty() {
                    "Invalid data provided. Please check your inputs.".to_string()
                } else {
                    message.clone()
                }
            }
            ApiError::Server { status: 500, .. } => {
                "Server error. Please try again later.".to_string()
            }
            ApiError::Server { status, message } => {
                format!("Request failed ({}): {}", status, message)
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(detail) => write!(f, "network error: {}", detail),
            ApiError::Server { status, message } => {
                write!(f, "server error {}: {}", status, message)
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Pull a human message out of an error body. The backend sends
/// `{"message": "..."}` on handled errors and plain text otherwise.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    body.trim().to_string()
}

// ============================================================================
// AUTH STATUS
// ============================================================================

/// Body of GET /api/auth/user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    #[serde(default)]
    pub is_authenticated: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUser>,
}

// ============================================================================
// API CLIENT
// ============================================================================

pub struct ApiClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(ApiClient { base_url, http })
    }

    /// Base URL from FINWISE_API_URL, falling back to the local backend
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url =
            std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // REQUEST PLUMBING
    // ========================================================================

    fn decode<T: DeserializeOwned>(
        response: reqwest::blocking::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: extract_message(&body),
            });
        }

        response
            .json::<T>()
            .map_err(|e| ApiError::Network(format!("invalid response body: {}", e)))
    }

    fn check(response: reqwest::blocking::Response) -> Result<(), ApiError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: extract_message(&body),
            });
        }

        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response)
    }

    fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .put(self.url(path))
            .json(body)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response)
    }

    fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(path))
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::check(response)
    }

    // ========================================================================
    // AUTH
    // ========================================================================

    /// GET /api/auth/user - session status after the OAuth callback
    pub fn fetch_auth_user(&self) -> Result<AuthStatus, ApiError> {
        self.get_json("/api/auth/user")
    }

    // ========================================================================
    // FAMILY PROFILE
    // ========================================================================

    pub fn get_family_profile(&self, id: i64) -> Result<FamilyProfile, ApiError> {
        self.get_json(&format!("/api/familyProfile/{}", id))
    }

    pub fn create_family_profile(
        &self,
        profile: &FamilyProfile,
    ) -> Result<FamilyProfile, ApiError> {
        self.post_json("/api/familyProfile", profile)
    }

    pub fn update_family_profile(
        &self,
        id: i64,
        profile: &FamilyProfile,
    ) -> Result<FamilyProfile, ApiError> {
        self.put_json(&format!("/api/familyProfile/{}", id), profile)
    }

    // ========================================================================
    // CHILDREN
    // ========================================================================

    /// GET /api/children returns every child; callers filter by family
    pub fn list_children(&self) -> Result<Vec<Child>, ApiError> {
        self.get_json("/api/children")
    }

    pub fn create_child(&self, child: &Child) -> Result<Child, ApiError> {
        self.post_json("/api/children", child)
    }

    pub fn update_child(&self, id: i64, child: &Child) -> Result<Child, ApiError> {
        self.put_json(&format!("/api/children/{}", id), child)
    }

    pub fn delete_child(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/children/{}", id))
    }

    // ========================================================================
    // EDUCATION PLANS
    // ========================================================================

    pub fn plans_for_child(&self, child_id: i64) -> Result<Vec<EducationPlan>, ApiError> {
        self.get_json(&format!("/api/education-plans/child/{}", child_id))
    }

    pub fn create_plan(
        &self,
        family_profile_id: i64,
        plan: &EducationPlan,
    ) -> Result<EducationPlan, ApiError> {
        self.post_json(&format!("/api/education-plans/{}", family_profile_id), plan)
    }

    pub fn update_plan(
        &self,
        plan_id: i64,
        plan: &EducationPlan,
    ) -> Result<EducationPlan, ApiError> {
        self.put_json(&format!("/api/education-plans/{}", plan_id), plan)
    }

    pub fn delete_plan(&self, plan_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/education-plans/{}", plan_id))
    }

    // ========================================================================
    // PREDICTIONS
    // ========================================================================

    /// Fire the server-side prediction run for a family. Asynchronous on
    /// the backend; callers treat failures as non-fatal.
    pub fn generate_predictions(&self, family_profile_id: i64) -> Result<(), ApiError> {
        let response = self
            .http
            .get(self.url(&format!(
                "/api/predictions/generate/{}",
                family_profile_id
            )))
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::check(response)
    }
}

// ============================================================================
// AGGREGATE LOADER
// ============================================================================

/// Everything the dashboard needs for one family
#[derive(Debug, Clone)]
pub struct FamilyEducationData {
    pub family_profile: FamilyProfile,
    pub children: Vec<Child>,
    pub education_plans: Vec<EducationPlan>,
    pub summary: FamilySummary,
}

/// Load profile, children, and plans for one family.
///
/// A failing per-child plan fetch is reported and skipped so one broken
/// record does not take the whole dashboard down; profile or children
/// failures are fatal.
pub fn load_family_education_data(
    client: &ApiClient,
    family_profile_id: i64,
) -> Result<FamilyEducationData, ApiError> {
    let family_profile = client.get_family_profile(family_profile_id)?;

    let children: Vec<Child> = client
        .list_children()?
        .into_iter()
        .filter(|child| child.family_profile_id == family_profile_id)
        .collect();

    let mut education_plans = Vec::new();
    for child in &children {
        let Some(child_id) = child.id else { continue };

        match client.plans_for_child(child_id) {
            Ok(plans) => education_plans.extend(plans),
            Err(e) => {
                eprintln!("⚠ Failed to load plans for child {}: {}", child_id, e);
            }
        }
    }

    let summary = family_summary(&children, &education_plans);

    Ok(FamilyEducationData {
        family_profile,
        children,
        education_plans,
        summary,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let client = ApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/api/children"), "http://localhost:8080/api/children");
    }

    #[test]
    fn test_auth_failure_detection() {
        let unauthorized = ApiError::Server {
            status: 401,
            message: String::new(),
        };
        let forbidden = ApiError::Server {
            status: 403,
            message: String::new(),
        };
        let server = ApiError::Server {
            status: 500,
            message: String::new(),
        };
        let network = ApiError::Network("connection refused".to_string());

        assert!(unauthorized.is_auth_failure());
        assert!(forbidden.is_auth_failure());
        assert!(!server.is_auth_failure());
        assert!(!network.is_auth_failure());
    }

    #[test]
    fn test_user_messages_follow_status() {
        let expired = ApiError::Server {
            status: 403,
            message: "whatever".to_string(),
        };
        assert_eq!(expired.user_message(), "Session expired. Please log in again.");

        let bad_request = ApiError::Server {
            status: 400,
            message: "End year must be after start year".to_string(),
        };
        assert_eq!(bad_request.user_message(), "End year must be after start year");

        let crash = ApiError::Server {
            status: 500,
            message: "stack trace".to_string(),
        };
        assert_eq!(crash.user_message(), "Server error. Please try again later.");
    }

    #[test]
    fn test_extract_message_prefers_json_body() {
        assert_eq!(
            extract_message(r#"{"message": "Profile not found"}"#),
            "Profile not found"
        );
        assert_eq!(extract_message("plain text error\n"), "plain text error");
    }

    #[test]
    fn test_auth_status_parses_unauthenticated_body() {
        let status: AuthStatus = serde_json::from_str("{}").unwrap();
        assert!(!status.is_authenticated);
        assert!(status.user.is_none());
    }

    #[test]
    fn test_auth_status_parses_full_body() {
        let body = r#"{
            "isAuthenticated": true,
            "user": {
                "id": 42,
                "email": "family@example.com",
                "isNewUser": true
            }
        }"#;

        let status: AuthStatus = serde_json::from_str(body).unwrap();
        assert!(status.is_authenticated);

        let user = status.user.unwrap();
        assert_eq!(user.id, 42);
        assert!(user.is_new_user);
        assert!(user.family_profile_id.is_none());
    }
}
