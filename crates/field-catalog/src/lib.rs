pub mod catalog;
pub mod errors;
pub mod model;

pub use catalog::{FieldCatalog, FieldDirectory};
pub use errors::FieldError;
pub use model::{FieldDefinition, FieldScope};
