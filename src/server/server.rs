use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_mysql::*;
use crate::logger::*;
use crate::settings::Settings;
use sqlx::{MySql, Pool};
use std::sync::Arc;

pub struct Server {
    pub identity_service: Arc<dyn IdentityService>,
    pool: Option<Pool<MySql>>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let (identity_service, pool): (Arc<dyn IdentityService>, Option<Pool<MySql>>) =
            match settings.identity.backend.as_str() {
                "memory" => {
                    let store = Arc::new(MemIdentityStore::new());
                    let service = RealIdentityService::new(store.clone(), store);
                    (Arc::new(service), None)
                }
                "mysql" => {
                    let pool = Pool::<MySql>::connect(&settings.database.dsn).await?;
                    let user_repo: Arc<dyn UserRepo> = Arc::new(MySqlUserRepo::new(pool.clone()));
                    let account_repo: Arc<dyn LinkedAccountRepo> =
                        Arc::new(MySqlLinkedAccountRepo::new(pool.clone()));
                    let service = RealIdentityService::new(user_repo, account_repo);
                    (Arc::new(service), Some(pool))
                }
                other => return Err(anyhow::anyhow!("Unknown identity backend: {}", other)),
            };

        info!("server started");

        Ok(Self {
            identity_service,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
