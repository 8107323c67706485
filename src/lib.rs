//! docgate: scoped document permissions and approval quorums.
//!
//! The component crates hold the stores; this crate combines them behind
//! [`AccessCore`] and adds configuration, seed files, metrics and the HTTP API.

pub mod access;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod seed;
pub mod server;

pub use access::AccessCore;
pub use config::{load_config, Config, LoadedConfig, ServerConfig};
pub use errors::CoreError;
pub use seed::{Seed, SeedReport};

pub use docgate_allocation_engine::{Allocation, AllocationRequest, CapabilityPolicy};
pub use docgate_approval_matrix::{ApprovalRule, ApprovalStatus, Resolution};
pub use docgate_core_types::{
    Action, AdministratorPolicy, Capabilities, Capability, DepartmentId, DocumentId,
    DocumentScope, ErrorKind, FieldKey, FieldSlot, Scope, SubDepartmentId, UserId,
};
pub use docgate_field_catalog::FieldScope;
pub use docgate_permission_evaluator::{AccessRequest, Decision, DecisionReason};
