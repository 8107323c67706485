pub mod engine;
pub mod errors;
pub mod model;
pub mod users;

pub use engine::{AllocationEngine, AllocationSource};
pub use errors::AllocationError;
pub use model::{Allocation, AllocationKey, AllocationRequest, CapabilityPolicy};
pub use users::{InMemoryUserDirectory, UserDirectory, UserRecord};

#[cfg(test)]
mod tests;
