use std::collections::{BTreeSet, HashSet};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use docgate_core_types::{DocumentId, UserId};
use tracing::debug;

/// Approvals cast per document.
///
/// Each document keeps a set of approvers, updated under the map's shard lock,
/// so a repeated cast by the same approver never counts twice.
#[derive(Default)]
pub struct ApprovalLedger {
    casts: DashMap<DocumentId, BTreeSet<UserId>>,
}

impl ApprovalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an approval. Returns false when the approver had already approved.
    pub fn cast(&self, document: &DocumentId, approver: &UserId) -> bool {
        let inserted = self
            .casts
            .entry(document.clone())
            .or_default()
            .insert(approver.clone());
        debug!(%document, %approver, inserted, "approval cast");
        inserted
    }

    /// Drop an approval. A document left without approvers is forgotten.
    pub fn withdraw(&self, document: &DocumentId, approver: &UserId) -> bool {
        match self.casts.entry(document.clone()) {
            Entry::Occupied(mut entry) => {
                let removed = entry.get_mut().remove(approver);
                if entry.get().is_empty() {
                    entry.remove();
                }
                removed
            }
            Entry::Vacant(_) => false,
        }
    }

    pub fn approvals(&self, document: &DocumentId) -> HashSet<UserId> {
        self.casts
            .get(document)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Approvers in sorted order, for display.
    pub fn approvers(&self, document: &DocumentId) -> Vec<UserId> {
        self.casts
            .get(document)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Documents currently holding at least one approval.
    pub fn len(&self) -> usize {
        self.casts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.casts.is_empty()
    }

    pub fn clear(&self, document: &DocumentId) -> usize {
        self.casts
            .remove(document)
            .map(|(_, set)| set.len())
            .unwrap_or(0)
    }
}
