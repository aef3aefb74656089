use crate::application_port::{IdentityError, IdentityService};
use crate::domain_model::{
    BatchResolution, CanonicalIdentity, DiagnosticReason, EntryClass, ResolveEntry, Resolution,
    UnresolvedEntryDiagnostic, UserId,
};
use crate::domain_port::{AccountFilter, LinkedAccountRepo, UserRepo};
use std::sync::Arc;

pub struct RealIdentityService {
    user_repo: Arc<dyn UserRepo>,
    account_repo: Arc<dyn LinkedAccountRepo>,
}

impl RealIdentityService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        account_repo: Arc<dyn LinkedAccountRepo>,
    ) -> RealIdentityService {
        RealIdentityService {
            user_repo,
            account_repo,
        }
    }
}

#[async_trait::async_trait]
impl IdentityService for RealIdentityService {
    async fn canonical_identity(
        &self,
        user_id: &UserId,
    ) -> Result<CanonicalIdentity, IdentityError> {
        let user = self.user_repo.get_with_accounts(user_id).await?;
        Ok(CanonicalIdentity::project(&user))
    }

    async fn resolve_batch(
        &self,
        entries: Vec<ResolveEntry>,
    ) -> Result<BatchResolution, IdentityError> {
        let classes: Vec<EntryClass> = entries.iter().map(EntryClass::of).collect();

        let mut results: Vec<Resolution> = Vec::with_capacity(entries.len());
        let mut diagnostics: Vec<UnresolvedEntryDiagnostic> = Vec::new();
        let mut pending: Vec<usize> = Vec::new();

        // Optimistic pass: local entries resolve in place, external ones keep
        // their external id as placeholder until the lookup lands.
        for (index, class) in classes.iter().enumerate() {
            match class {
                EntryClass::Local { internal_id } => {
                    results.push(Resolution::Resolved(internal_id.clone()));
                }
                EntryClass::External { account_id, .. } => {
                    results.push(Resolution::Unresolved {
                        placeholder: account_id.clone(),
                    });
                    pending.push(index);
                }
                EntryClass::Malformed => {
                    results.push(Resolution::Unresolved {
                        placeholder: entries[index].external_id.clone().unwrap_or_default(),
                    });
                    diagnostics.push(UnresolvedEntryDiagnostic::describe(
                        &entries,
                        index,
                        DiagnosticReason::MissingField,
                    ));
                }
            }
        }

        // All-local batches never touch the store.
        if pending.is_empty() {
            return Ok(BatchResolution {
                results,
                diagnostics,
            });
        }

        let mut filter = AccountFilter::default();
        for &index in &pending {
            if let EntryClass::External {
                provider,
                account_id,
            } = &classes[index]
            {
                filter.providers.insert(*provider);
                filter.provider_account_ids.insert(account_id.clone());
            }
        }

        let accounts = self.account_repo.find_matching(&filter).await?;

        for &index in &pending {
            let EntryClass::External {
                provider,
                account_id,
            } = &classes[index]
            else {
                continue;
            };

            // Exact match on both fields; first hit in lookup-result order
            // wins should the store ever hold duplicates.
            let matched = accounts
                .iter()
                .find(|a| a.provider == *provider && a.provider_account_id == *account_id);

            match matched {
                Some(account) => results[index] = Resolution::Resolved(account.user_id.clone()),
                None => diagnostics.push(UnresolvedEntryDiagnostic::describe(
                    &entries,
                    index,
                    DiagnosticReason::UnresolvedMapping,
                )),
            }
        }

        Ok(BatchResolution {
            results,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::{AuthMethod, LinkedAccount, Provider, User};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeStore {
        users: Vec<User>,
        accounts: Vec<LinkedAccount>,
        lookups: AtomicUsize,
        fail_lookup: bool,
    }

    impl FakeStore {
        fn new(users: Vec<User>, accounts: Vec<LinkedAccount>) -> Arc<FakeStore> {
            Arc::new(FakeStore {
                users,
                accounts,
                lookups: AtomicUsize::new(0),
                fail_lookup: false,
            })
        }

        fn failing() -> Arc<FakeStore> {
            Arc::new(FakeStore {
                users: vec![],
                accounts: vec![],
                lookups: AtomicUsize::new(0),
                fail_lookup: true,
            })
        }

        fn lookup_count(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl UserRepo for FakeStore {
        async fn get_with_accounts(&self, user_id: &UserId) -> Result<User, IdentityError> {
            self.users
                .iter()
                .find(|u| u.user_id == *user_id)
                .cloned()
                .ok_or(IdentityError::UserNotFound)
        }
    }

    #[async_trait::async_trait]
    impl LinkedAccountRepo for FakeStore {
        async fn find_matching(
            &self,
            filter: &AccountFilter,
        ) -> Result<Vec<LinkedAccount>, IdentityError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.fail_lookup {
                return Err(IdentityError::Store("connection refused".to_string()));
            }
            Ok(self
                .accounts
                .iter()
                .filter(|a| {
                    filter.providers.contains(&a.provider)
                        && filter.provider_account_ids.contains(&a.provider_account_id)
                })
                .cloned()
                .collect())
        }
    }

    fn service(store: &Arc<FakeStore>) -> RealIdentityService {
        RealIdentityService::new(store.clone(), store.clone())
    }

    fn discord_account(account_id: &str, owner: &str) -> LinkedAccount {
        LinkedAccount {
            provider: Provider::Discord,
            provider_account_id: account_id.to_string(),
            user_id: UserId(owner.to_string()),
        }
    }

    fn user_with_accounts(id: &str, accounts: Vec<LinkedAccount>) -> User {
        User {
            user_id: UserId(id.to_string()),
            display_name: "Ada".to_string(),
            created_at: Utc::now(),
            linked_accounts: accounts,
        }
    }

    #[tokio::test]
    async fn canonical_identity_projects_fetched_user() {
        let store = FakeStore::new(
            vec![user_with_accounts(
                "u99",
                vec![discord_account("acc42", "u99")],
            )],
            vec![],
        );

        let identity = service(&store)
            .canonical_identity(&UserId("u99".to_string()))
            .await
            .unwrap();

        assert_eq!(identity.id, "acc42");
        assert_eq!(identity.auth_method, AuthMethod::Discord);
    }

    #[tokio::test]
    async fn canonical_identity_missing_user_is_not_found() {
        let store = FakeStore::new(vec![], vec![]);

        let err = service(&store)
            .canonical_identity(&UserId("nobody".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, IdentityError::UserNotFound));
    }

    #[tokio::test]
    async fn local_only_batch_skips_lookup() {
        let store = FakeStore::new(vec![], vec![]);
        let entries = vec![
            ResolveEntry::new("u1", AuthMethod::Local),
            ResolveEntry::new("u2", AuthMethod::Local),
        ];

        let batch = service(&store).resolve_batch(entries).await.unwrap();

        assert_eq!(store.lookup_count(), 0);
        assert_eq!(
            batch.results,
            vec![
                Resolution::Resolved(UserId("u1".to_string())),
                Resolution::Resolved(UserId("u2".to_string())),
            ]
        );
        assert!(batch.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn mixed_batch_resolves_matching_account() {
        let store = FakeStore::new(vec![], vec![discord_account("acc42", "u99")]);
        let entries = vec![
            ResolveEntry::new("u1", AuthMethod::Local),
            ResolveEntry::new("acc42", AuthMethod::Discord),
        ];

        let batch = service(&store).resolve_batch(entries).await.unwrap();

        assert_eq!(store.lookup_count(), 1);
        assert_eq!(
            batch.results,
            vec![
                Resolution::Resolved(UserId("u1".to_string())),
                Resolution::Resolved(UserId("u99".to_string())),
            ]
        );
        assert!(batch.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn unmatched_entry_keeps_placeholder_and_is_diagnosed() {
        let store = FakeStore::new(vec![], vec![]);
        let entries = vec![
            ResolveEntry::new("u1", AuthMethod::Local),
            ResolveEntry::new("acc42", AuthMethod::Discord),
        ];

        let batch = service(&store).resolve_batch(entries).await.unwrap();

        assert_eq!(batch.results.len(), 2);
        assert_eq!(
            batch.results[1],
            Resolution::Unresolved {
                placeholder: "acc42".to_string()
            }
        );
        assert_eq!(batch.diagnostics.len(), 1);
        assert_eq!(batch.diagnostics[0].index, 1);
        assert_eq!(
            batch.diagnostics[0].reason,
            DiagnosticReason::UnresolvedMapping
        );
        assert_eq!(batch.diagnostics[0].external_id.as_deref(), Some("acc42"));
    }

    #[tokio::test]
    async fn provider_must_match_exactly() {
        // Same account id under a different provider must not re-associate.
        let store = FakeStore::new(
            vec![],
            vec![LinkedAccount {
                provider: Provider::Google,
                provider_account_id: "acc42".to_string(),
                user_id: UserId("u7".to_string()),
            }],
        );
        let entries = vec![ResolveEntry::new("acc42", AuthMethod::Discord)];

        let batch = service(&store).resolve_batch(entries).await.unwrap();

        assert_eq!(
            batch.results[0],
            Resolution::Unresolved {
                placeholder: "acc42".to_string()
            }
        );
        assert_eq!(batch.diagnostics.len(), 1);
    }

    #[tokio::test]
    async fn malformed_entry_is_diagnosed_without_blocking_the_batch() {
        let store = FakeStore::new(vec![], vec![discord_account("acc42", "u99")]);
        let entries = vec![
            ResolveEntry {
                external_id: Some("acc9".to_string()),
                auth_method: None,
            },
            ResolveEntry::new("acc42", AuthMethod::Discord),
        ];

        let batch = service(&store).resolve_batch(entries).await.unwrap();

        assert_eq!(store.lookup_count(), 1);
        assert_eq!(
            batch.results[0],
            Resolution::Unresolved {
                placeholder: "acc9".to_string()
            }
        );
        assert_eq!(
            batch.results[1],
            Resolution::Resolved(UserId("u99".to_string()))
        );
        assert_eq!(batch.diagnostics.len(), 1);
        assert_eq!(batch.diagnostics[0].reason, DiagnosticReason::MissingField);
        assert_eq!(batch.diagnostics[0].index, 0);
    }

    #[tokio::test]
    async fn empty_batch_resolves_to_nothing() {
        let store = FakeStore::new(vec![], vec![]);

        let batch = service(&store).resolve_batch(vec![]).await.unwrap();

        assert_eq!(store.lookup_count(), 0);
        assert!(batch.results.is_empty());
        assert!(batch.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn resolve_batch_is_idempotent() {
        let store = FakeStore::new(vec![], vec![discord_account("acc42", "u99")]);
        let entries = vec![
            ResolveEntry::new("u1", AuthMethod::Local),
            ResolveEntry::new("acc42", AuthMethod::Discord),
            ResolveEntry::new("ghost", AuthMethod::Google),
        ];

        let svc = service(&store);
        let first = svc.resolve_batch(entries.clone()).await.unwrap();
        let second = svc.resolve_batch(entries).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn store_failure_propagates_unmodified() {
        let store = FakeStore::failing();
        let entries = vec![ResolveEntry::new("acc42", AuthMethod::Discord)];

        let err = service(&store).resolve_batch(entries).await.unwrap_err();

        assert!(matches!(err, IdentityError::Store(msg) if msg == "connection refused"));
        assert_eq!(store.lookup_count(), 1);
    }
}
