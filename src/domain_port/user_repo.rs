use crate::application_port::IdentityError;
use crate::domain_model::{User, UserId};

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    /// Fetches a user together with its linked accounts, ordered by link
    /// position. Returns `IdentityError::UserNotFound` when the id does not
    /// exist in the store.
    async fn get_with_accounts(&self, user_id: &UserId) -> Result<User, IdentityError>;
}
