use dashmap::DashMap;
use docgate_core_types::{FieldKey, FieldSlot, Scope, SystemField};
use tracing::info;

use crate::errors::FieldError;
use crate::model::{FieldDefinition, FieldScope};

/// Field lookup consumed by the allocation engine when validating field lists.
pub trait FieldDirectory: Send + Sync {
    /// System fields always qualify; slots only when active as seen from `scope`.
    fn is_allocatable(&self, scope: Scope, key: &FieldKey) -> bool;
}

/// Catalog of system fields plus ten text and ten date slots per scope.
///
/// Each (scope, slot) pair holds at most one definition; `set_field` replaces it.
#[derive(Default)]
pub struct FieldCatalog {
    definitions: DashMap<(FieldScope, FieldSlot), FieldDefinition>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(
        &self,
        scope: FieldScope,
        slot: FieldSlot,
        label: &str,
        active: bool,
    ) -> Result<FieldDefinition, FieldError> {
        if !slot.is_valid() {
            return Err(FieldError::InvalidSlot(slot));
        }
        let label = label.trim();
        if label.is_empty() {
            return Err(FieldError::EmptyLabel);
        }
        let definition = FieldDefinition {
            key: FieldKey::Slot(slot),
            scope,
            kind: slot.kind,
            label: label.to_string(),
            active,
            system: false,
        };
        self.definitions.insert((scope, slot), definition.clone());
        info!(%scope, field = %definition.key, active, "field definition set");
        Ok(definition)
    }

    /// Drop the override for `slot` at exactly `scope`, exposing the broader definition again.
    pub fn reset_field(
        &self,
        scope: FieldScope,
        slot: FieldSlot,
    ) -> Result<FieldDefinition, FieldError> {
        self.definitions
            .remove(&(scope, slot))
            .map(|(_, definition)| definition)
            .ok_or(FieldError::NotFound { scope, slot })
    }

    /// Remove every override defined at exactly `scope`. Returns how many were dropped.
    pub fn purge_scope(&self, scope: FieldScope) -> usize {
        let before = self.definitions.len();
        self.definitions.retain(|(defined_at, _), _| *defined_at != scope);
        let purged = before.saturating_sub(self.definitions.len());
        if purged > 0 {
            info!(%scope, purged, "field overrides purged");
        }
        purged
    }

    /// Effective definition of one slot, resolving sub-department → department → global.
    pub fn effective(&self, scope: FieldScope, slot: FieldSlot) -> FieldDefinition {
        scope
            .lineage()
            .into_iter()
            .find_map(|candidate| {
                self.definitions
                    .get(&(candidate, slot))
                    .map(|entry| entry.value().clone())
            })
            .unwrap_or_else(|| FieldDefinition {
                key: FieldKey::Slot(slot),
                scope: FieldScope::Global,
                kind: slot.kind,
                label: slot.default_label(),
                active: false,
                system: false,
            })
    }

    /// System fields, then text slots 1..=10, then date slots 1..=10.
    pub fn list_fields(&self, scope: FieldScope) -> Vec<FieldDefinition> {
        SystemField::ALL
            .into_iter()
            .map(system_definition)
            .chain(FieldSlot::all().map(|slot| self.effective(scope, slot)))
            .collect()
    }

    pub fn active_fields(&self, scope: FieldScope) -> Vec<FieldDefinition> {
        self.list_fields(scope)
            .into_iter()
            .filter(|definition| definition.active)
            .collect()
    }
}

impl FieldDirectory for FieldCatalog {
    fn is_allocatable(&self, scope: Scope, key: &FieldKey) -> bool {
        match key {
            FieldKey::System(_) => true,
            FieldKey::Slot(slot) => {
                slot.is_valid() && self.effective(FieldScope::from(scope), *slot).active
            }
        }
    }
}

fn system_definition(field: SystemField) -> FieldDefinition {
    FieldDefinition {
        key: FieldKey::System(field),
        scope: FieldScope::Global,
        kind: field.kind(),
        label: field.label().to_string(),
        active: true,
        system: true,
    }
}
