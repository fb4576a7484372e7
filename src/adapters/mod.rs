// Adapters layer: concrete implementations of the record store port.

pub mod file_store;
pub mod memory;

pub use file_store::FileStore;
pub use memory::InMemoryStore;
