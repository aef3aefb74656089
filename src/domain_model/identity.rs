use crate::domain_model::{Provider, User};
use serde::{Deserialize, Serialize};

/// How a canonical identity authenticates: the local account store, or one
/// of the external providers.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    Local,
    Google,
    Discord,
}

impl AuthMethod {
    pub fn provider(&self) -> Option<Provider> {
        match self {
            AuthMethod::Local => None,
            AuthMethod::Google => Some(Provider::Google),
            AuthMethod::Discord => Some(Provider::Discord),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::Local => "local",
            AuthMethod::Google => "google",
            AuthMethod::Discord => "discord",
        }
    }
}

impl From<Provider> for AuthMethod {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Google => AuthMethod::Google,
            Provider::Discord => AuthMethod::Discord,
        }
    }
}

/// The single identity presented to downstream consumers.
///
/// Invariant: with no linked accounts, `id` is the internal user id and the
/// auth method is `Local`; otherwise `id` is the provider account id of the
/// FIRST linked account and the auth method is that account's provider.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CanonicalIdentity {
    pub id: String,
    pub display_name: String,
    pub auth_method: AuthMethod,
}

impl CanonicalIdentity {
    /// Projects a user record onto its canonical identity. Pure; computed on
    /// demand and never persisted.
    pub fn project(user: &User) -> CanonicalIdentity {
        match user.linked_accounts.first() {
            Some(account) => CanonicalIdentity {
                id: account.provider_account_id.clone(),
                display_name: user.display_name.clone(),
                auth_method: account.provider.into(),
            },
            None => CanonicalIdentity {
                id: user.user_id.to_string(),
                display_name: user.display_name.clone(),
                auth_method: AuthMethod::Local,
            },
        }
    }
}
