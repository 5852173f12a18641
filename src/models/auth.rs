use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::services::error::ApiError;

/// Role assigned at signup. Admin unlocks the admin-only record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// Profile returned by the backend. Replaced wholesale on re-fetch,
/// never patched field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u32,
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// The backend has shipped three different success shapes for signin/signup
/// over time. Each one gets an explicit variant, matched in fixed priority
/// order (most explicit first); anything else is rejected rather than
/// guessed at.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthPayload {
    /// `{"token": "...", "user": {...}}`
    TokenAndUser { token: String, user: UserProfile },
    /// A user object at the top level (has `id` directly), no token issued.
    BareUser(UserProfile),
    /// `{"user": {...}}`, possibly with a token alongside.
    UserMaybeToken {
        user: UserProfile,
        token: Option<String>,
    },
}

impl AuthPayload {
    /// Match a signin/signup success payload against the accepted shapes.
    pub fn from_value(payload: &Value) -> Result<Self, ApiError> {
        // Case A: { token, user } with both present
        if let (Some(token), Some(user)) = (payload.get("token"), payload.get("user")) {
            if let (Some(token), Ok(user)) = (
                token.as_str(),
                serde_json::from_value::<UserProfile>(user.clone()),
            ) {
                return Ok(AuthPayload::TokenAndUser {
                    token: token.to_string(),
                    user,
                });
            }
        }

        // Case B: top-level user object (no wrapper, no token)
        if payload.get("id").is_some() {
            if let Ok(user) = serde_json::from_value::<UserProfile>(payload.clone()) {
                return Ok(AuthPayload::BareUser(user));
            }
        }

        // Case C: { user: {...} }, token optional
        if let Some(user) = payload.get("user") {
            if user.get("id").is_some() {
                if let Ok(user) = serde_json::from_value::<UserProfile>(user.clone()) {
                    let token = payload
                        .get("token")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    return Ok(AuthPayload::UserMaybeToken { user, token });
                }
            }
        }

        Err(ApiError::UnexpectedShape)
    }

    /// Split into the token (if one was issued) and the profile.
    pub fn into_parts(self) -> (Option<String>, UserProfile) {
        match self {
            AuthPayload::TokenAndUser { token, user } => (Some(token), user),
            AuthPayload::BareUser(user) => (None, user),
            AuthPayload::UserMaybeToken { user, token } => (token, user),
        }
    }
}
