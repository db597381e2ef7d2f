//! Account directory implementations.

mod memory;

pub use memory::InMemoryAccountDirectory;
