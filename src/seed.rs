//! Seed files bootstrap a core from YAML or JSON.
//!
//! Entities reference each other by code, never by id, so a seed can be written
//! before ids exist. Departments and sub-departments that already exist (same
//! code) are reused, which lets several seed files build on each other.

use std::path::Path;

use anyhow::{Context, Result};
use docgate_allocation_engine::AllocationRequest;
use docgate_approval_matrix::ApprovalRule;
use docgate_core_types::{Capabilities, Capability, FieldKey, UserId};
use docgate_field_catalog::FieldScope;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::access::AccessCore;
use crate::errors::CoreError;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Seed {
    pub users: Vec<SeedUser>,
    pub departments: Vec<SeedDepartment>,
    pub fields: Vec<SeedField>,
    pub allocations: Vec<SeedAllocation>,
    pub approval_rules: Vec<SeedRule>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeedUser {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeedDepartment {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub sub_departments: Vec<SeedSubDepartment>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeedSubDepartment {
    pub code: String,
    pub name: String,
}

/// A slot definition. Without codes the definition is global; with only a
/// department code it applies to that department.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeedField {
    pub key: FieldKey,
    pub label: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub sub_department: Option<String>,
}

fn default_active() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeedAllocation {
    pub user: String,
    pub department: String,
    pub sub_department: String,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
    #[serde(default)]
    pub fields: Vec<FieldKey>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeedRule {
    pub department: String,
    pub sub_department: String,
    pub rule: ApprovalRule,
    #[serde(default)]
    pub required_approvers: Option<i64>,
}

/// How many entries of each section a seed applied.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub departments: usize,
    pub sub_departments: usize,
    pub fields: usize,
    pub allocations: usize,
    pub approval_rules: usize,
}

impl Seed {
    /// Parse seed text, trying JSON before YAML.
    pub fn parse(content: &str) -> Result<Seed> {
        match serde_json::from_str(content) {
            Ok(seed) => Ok(seed),
            Err(json_err) => {
                debug!(error = %json_err, "seed is not JSON; trying YAML");
                serde_yaml::from_str(content).context("Failed to parse seed as JSON or YAML")
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Seed> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid seed file {}", path.display()))
    }
}

impl AccessCore {
    /// Apply `seed` as the administrator: users, hierarchy, fields, allocations, rules.
    pub fn apply_seed(&self, seed: &Seed) -> Result<SeedReport, CoreError> {
        let admin = self.administrator().clone();
        let mut report = SeedReport::default();

        for user in &seed.users {
            let id = UserId::new(user.id.as_str());
            self.register_user(&admin, id, user.display_name.clone())?;
            report.users += 1;
        }

        for dept in &seed.departments {
            let department = match self.hierarchy().department_by_code(&dept.code) {
                Some(existing) => existing,
                None => {
                    report.departments += 1;
                    self.create_department(&admin, &dept.code, &dept.name)?
                }
            };
            for sub in &dept.sub_departments {
                match self.hierarchy().sub_department_by_code(&sub.code) {
                    Some(existing) if existing.department == department.id => {}
                    Some(existing) => {
                        return Err(CoreError::Conflict(format!(
                            "sub-department code '{}' already belongs to department {}",
                            existing.code, existing.department
                        )))
                    }
                    None => {
                        self.create_sub_department(&admin, department.id, &sub.code, &sub.name)?;
                        report.sub_departments += 1;
                    }
                }
            }
        }

        for field in &seed.fields {
            let FieldKey::Slot(slot) = field.key else {
                return Err(CoreError::InvalidInput(format!(
                    "system field {} cannot be configured",
                    field.key
                )));
            };
            let scope = self.seed_field_scope(field)?;
            self.set_field(&admin, scope, slot, &field.label, field.active)?;
            report.fields += 1;
        }

        for row in &seed.allocations {
            let scope = self.scope_by_codes(&row.department, &row.sub_department)?;
            let request = AllocationRequest {
                user: UserId::new(row.user.as_str()),
                scope,
                capabilities: Capabilities::from_list(&row.capabilities),
                fields: row.fields.clone(),
            };
            self.allocate(&admin, request)?;
            report.allocations += 1;
        }

        for rule in &seed.approval_rules {
            let scope = self.scope_by_codes(&rule.department, &rule.sub_department)?;
            self.define_rule(&admin, scope, rule.rule, rule.required_approvers)?;
            report.approval_rules += 1;
        }

        info!(?report, "seed applied");
        Ok(report)
    }

    fn seed_field_scope(&self, field: &SeedField) -> Result<FieldScope, CoreError> {
        match (&field.department, &field.sub_department) {
            (None, None) => Ok(FieldScope::Global),
            (Some(dept), None) => Ok(FieldScope::Department {
                department: self.department_by_code(dept)?.id,
            }),
            (Some(dept), Some(sub)) => Ok(self.scope_by_codes(dept, sub)?.into()),
            (None, Some(sub)) => Err(CoreError::InvalidInput(format!(
                "field override for sub-department '{sub}' needs its department code"
            ))),
        }
    }
}
