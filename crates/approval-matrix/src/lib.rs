pub mod errors;
pub mod ledger;
pub mod matrix;
pub mod model;

pub use errors::ApprovalError;
pub use ledger::ApprovalLedger;
pub use matrix::ApprovalMatrix;
pub use model::{ApprovalMatrixEntry, ApprovalRule, ApprovalStatus, Resolution};
