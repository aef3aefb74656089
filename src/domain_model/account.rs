use crate::domain_model::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of supported external authentication providers.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Discord,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Discord => "discord",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider-issued account attached to a local user.
/// `provider_account_id` is unique within a provider, not globally.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LinkedAccount {
    pub provider: Provider,
    pub provider_account_id: String,
    pub user_id: UserId,
}
