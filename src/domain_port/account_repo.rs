use crate::application_port::IdentityError;
use crate::domain_model::{LinkedAccount, Provider};
use std::collections::HashSet;

/// Filter for one batched linked-account lookup: an account matches when its
/// provider is in `providers` AND its provider account id is in
/// `provider_account_ids`.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub providers: HashSet<Provider>,
    pub provider_account_ids: HashSet<String>,
}

#[async_trait::async_trait]
pub trait LinkedAccountRepo: Send + Sync {
    /// Returns all linked accounts matching the filter, in unspecified
    /// order. Callers re-associate results by (provider, account id).
    async fn find_matching(
        &self,
        filter: &AccountFilter,
    ) -> Result<Vec<LinkedAccount>, IdentityError>;
}
