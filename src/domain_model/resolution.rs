use crate::domain_model::{AuthMethod, Provider, UserId};
use serde::{Deserialize, Serialize};

/// One position in a reverse-resolution batch, as declared by the caller.
/// Fields are optional because diagnostics must report whichever of them
/// were actually present on a failing entry.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub struct ResolveEntry {
    pub external_id: Option<String>,
    pub auth_method: Option<AuthMethod>,
}

impl ResolveEntry {
    pub fn new(external_id: impl Into<String>, auth_method: AuthMethod) -> ResolveEntry {
        ResolveEntry {
            external_id: Some(external_id.into()),
            auth_method: Some(auth_method),
        }
    }
}

/// Up-front classification of a batch entry. Every entry is classified once
/// before any resolution work starts.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum EntryClass {
    /// For local accounts the external id already is the internal id.
    Local { internal_id: UserId },
    /// Needs the batched store lookup.
    External {
        provider: Provider,
        account_id: String,
    },
    /// Required fields missing; excluded from the lookup.
    Malformed,
}

impl EntryClass {
    pub fn of(entry: &ResolveEntry) -> EntryClass {
        let (Some(external_id), Some(auth_method)) = (&entry.external_id, entry.auth_method)
        else {
            return EntryClass::Malformed;
        };

        match auth_method.provider() {
            None => EntryClass::Local {
                internal_id: UserId(external_id.clone()),
            },
            Some(provider) => EntryClass::External {
                provider,
                account_id: external_id.clone(),
            },
        }
    }
}

/// Outcome for one batch position. `Unresolved` keeps the external-facing id
/// as a best-effort placeholder so the batch always stays positionally
/// aligned; callers that need certainty consult the diagnostics.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Resolution {
    Resolved(UserId),
    Unresolved { placeholder: String },
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// The value exposed on the wire: the internal id, or the placeholder.
    pub fn as_id(&self) -> &str {
        match self {
            Resolution::Resolved(user_id) => user_id.as_str(),
            Resolution::Unresolved { placeholder } => placeholder,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticReason {
    /// No linked account matched the entry: the store and the caller's view
    /// have diverged (e.g. the account was unlinked in between).
    UnresolvedMapping,
    /// Entry present but missing external_id and/or auth_method.
    MissingField,
    /// Diagnosed index belongs to an empty batch.
    EmptyBatch,
    /// Diagnosed index lies outside the declared batch.
    IndexOutOfBounds,
}

/// Signaled data inconsistency for one batch position. Not an error: the
/// batch still completes and the affected position carries its placeholder.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct UnresolvedEntryDiagnostic {
    pub index: usize,
    pub reason: DiagnosticReason,
    pub external_id: Option<String>,
    pub auth_method: Option<AuthMethod>,
}

impl UnresolvedEntryDiagnostic {
    /// Builds the diagnostic for a failing index. The entry context is
    /// classified here, once: an empty batch and an out-of-bounds index are
    /// reported as their own reasons since there is no entry to reconstruct;
    /// otherwise the entry's present fields are carried alongside `reason`.
    pub fn describe(
        entries: &[ResolveEntry],
        index: usize,
        reason: DiagnosticReason,
    ) -> UnresolvedEntryDiagnostic {
        if entries.is_empty() {
            return UnresolvedEntryDiagnostic {
                index,
                reason: DiagnosticReason::EmptyBatch,
                external_id: None,
                auth_method: None,
            };
        }
        if index >= entries.len() {
            return UnresolvedEntryDiagnostic {
                index,
                reason: DiagnosticReason::IndexOutOfBounds,
                external_id: None,
                auth_method: None,
            };
        }

        let entry = &entries[index];
        UnresolvedEntryDiagnostic {
            index,
            reason,
            external_id: entry.external_id.clone(),
            auth_method: entry.auth_method,
        }
    }
}

/// Result of one reverse-resolution batch: `results` is positionally aligned
/// with the input entries.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BatchResolution {
    pub results: Vec<Resolution>,
    pub diagnostics: Vec<UnresolvedEntryDiagnostic>,
}
