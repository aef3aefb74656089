use crate::application_port::IdentityError;
use crate::domain_model::{LinkedAccount, User, UserId};
use crate::domain_port::UserRepo;
use sqlx::{MySqlPool, Row};

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepo { pool }
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn get_with_accounts(&self, user_id: &UserId) -> Result<User, IdentityError> {
        let row = sqlx::query(
            r#"
SELECT user_id, display_name, created_at
FROM user
WHERE user_id = ?
"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::Store(format!("query user: {e}")))?;

        let Some(row) = row else {
            return Err(IdentityError::UserNotFound);
        };

        let account_rows = sqlx::query(
            r#"
SELECT provider, provider_account_id, user_id
FROM linked_account
WHERE user_id = ?
ORDER BY position
"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| IdentityError::Store(format!("query linked accounts: {e}")))?;

        let linked_accounts = account_rows
            .into_iter()
            .map(|r| LinkedAccount {
                provider: r.get("provider"),
                provider_account_id: r.get("provider_account_id"),
                user_id: r.get("user_id"),
            })
            .collect();

        Ok(User {
            user_id: row.get("user_id"),
            display_name: row.get("display_name"),
            created_at: row.get("created_at"),
            linked_accounts,
        })
    }
}
