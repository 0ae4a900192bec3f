//! Template stores other than the on-disk loader.

mod memory;

pub use memory::InMemoryStore;
