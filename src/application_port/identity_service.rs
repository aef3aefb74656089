use crate::domain_model::{BatchResolution, CanonicalIdentity, ResolveEntry, UserId};

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("user not found")]
    UserNotFound,
    /// The lookup store failed (timeout, connectivity). Fatal for the whole
    /// call; propagated unmodified and never retried here.
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

#[async_trait::async_trait]
pub trait IdentityService: Send + Sync {
    /// Fetches a user by internal id and projects its canonical identity.
    async fn canonical_identity(&self, user_id: &UserId)
    -> Result<CanonicalIdentity, IdentityError>;

    /// Resolves a batch of externally-scoped identities back to internal
    /// ids. Issues at most one store lookup per call. The returned results
    /// are positionally aligned with `entries`; unresolvable positions keep
    /// a placeholder and are reported in the diagnostics.
    async fn resolve_batch(
        &self,
        entries: Vec<ResolveEntry>,
    ) -> Result<BatchResolution, IdentityError>;
}
