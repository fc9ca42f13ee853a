// # Built-in Backends
//
// In-process implementations of the collaborator traits. The remote
// implementations live in the `intake-http` crate.

pub mod disabled;
pub mod memory;

pub use disabled::{DisabledIntegration, DisabledIntegrationFactory};
pub use memory::{MemoryRecordStore, MemoryStoreFactory};
