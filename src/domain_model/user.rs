use crate::domain_model::LinkedAccount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;

#[derive(
    Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(UserId(s.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    /// Ordered by link position. The first element is the account used at
    /// signup and is authoritative for the canonical identity.
    pub linked_accounts: Vec<LinkedAccount>,
}
