pub mod http_store;
pub mod mappings;
pub mod memory_store;

pub use http_store::HttpSearchStore;
pub use memory_store::MemorySearchStore;
