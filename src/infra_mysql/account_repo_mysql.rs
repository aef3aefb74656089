use crate::application_port::IdentityError;
use crate::domain_model::LinkedAccount;
use crate::domain_port::{AccountFilter, LinkedAccountRepo};
use sqlx::{MySql, MySqlPool, QueryBuilder, Row};

pub struct MySqlLinkedAccountRepo {
    pool: MySqlPool,
}

impl MySqlLinkedAccountRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlLinkedAccountRepo { pool }
    }
}

#[async_trait::async_trait]
impl LinkedAccountRepo for MySqlLinkedAccountRepo {
    async fn find_matching(
        &self,
        filter: &AccountFilter,
    ) -> Result<Vec<LinkedAccount>, IdentityError> {
        // An empty IN list is invalid SQL; an empty filter matches nothing.
        if filter.providers.is_empty() || filter.provider_account_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<MySql>::new(
            r#"
SELECT provider, provider_account_id, user_id
FROM linked_account
WHERE provider IN ("#,
        );
        {
            let mut providers = query.separated(", ");
            for provider in &filter.providers {
                providers.push_bind(provider.as_str());
            }
        }
        query.push(") AND provider_account_id IN (");
        {
            let mut account_ids = query.separated(", ");
            for account_id in &filter.provider_account_ids {
                account_ids.push_bind(account_id.as_str());
            }
        }
        query.push(")");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| IdentityError::Store(format!("find accounts: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|r| LinkedAccount {
                provider: r.get("provider"),
                provider_account_id: r.get("provider_account_id"),
                user_id: r.get("user_id"),
            })
            .collect())
    }
}
