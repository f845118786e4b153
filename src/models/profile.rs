use serde::Deserialize;
use serde_aux::field_attributes::deserialize_string_from_number;

/// The error string the backend uses for a bad or expired token.
pub const UNAUTHORIZED: &str = "Unauthorized";

/// Body of `GET /v1/user/profile`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProfileResponse {
    Failure { error: String },
    Profile(UserProfile),
}

/// The part of a profile the guards need; other fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "deserialize_string_from_number")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
}
