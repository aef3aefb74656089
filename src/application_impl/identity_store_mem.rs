use crate::application_port::IdentityError;
use crate::domain_model::{LinkedAccount, Provider, User, UserId};
use crate::domain_port::{AccountFilter, LinkedAccountRepo, UserRepo};
use chrono::Utc;
use dashmap::DashMap;

/// In-memory backing store for the `memory` backend, demos and tests.
/// Serves both lookup ports; account order is insertion order, so the first
/// linked account stays authoritative.
pub struct MemIdentityStore {
    users: DashMap<UserId, User>,
}

impl MemIdentityStore {
    pub fn new() -> MemIdentityStore {
        MemIdentityStore {
            users: DashMap::new(),
        }
    }

    pub fn add_user(&self, display_name: &str) -> UserId {
        let user_id = UserId(uuid::Uuid::new_v4().to_string());
        self.users.insert(
            user_id.clone(),
            User {
                user_id: user_id.clone(),
                display_name: display_name.to_string(),
                created_at: Utc::now(),
                linked_accounts: Vec::new(),
            },
        );
        user_id
    }

    pub fn link_account(
        &self,
        user_id: &UserId,
        provider: Provider,
        provider_account_id: &str,
    ) -> Result<(), IdentityError> {
        let taken = self.users.iter().any(|u| {
            u.linked_accounts
                .iter()
                .any(|a| a.provider == provider && a.provider_account_id == provider_account_id)
        });
        if taken {
            return Err(IdentityError::InternalError(format!(
                "account {provider}/{provider_account_id} already linked"
            )));
        }

        let mut user = self
            .users
            .get_mut(user_id)
            .ok_or(IdentityError::UserNotFound)?;
        user.linked_accounts.push(LinkedAccount {
            provider,
            provider_account_id: provider_account_id.to_string(),
            user_id: user_id.clone(),
        });
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserRepo for MemIdentityStore {
    async fn get_with_accounts(&self, user_id: &UserId) -> Result<User, IdentityError> {
        self.users
            .get(user_id)
            .map(|u| u.clone())
            .ok_or(IdentityError::UserNotFound)
    }
}

#[async_trait::async_trait]
impl LinkedAccountRepo for MemIdentityStore {
    async fn find_matching(
        &self,
        filter: &AccountFilter,
    ) -> Result<Vec<LinkedAccount>, IdentityError> {
        let matches = self
            .users
            .iter()
            .flat_map(|u| u.linked_accounts.clone())
            .filter(|a| {
                filter.providers.contains(&a.provider)
                    && filter.provider_account_ids.contains(&a.provider_account_id)
            })
            .collect();
        Ok(matches)
    }
}
