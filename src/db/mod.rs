pub mod appwrite;
pub mod document;
pub mod memory;

pub use appwrite::AppwriteStore;
pub use document::{natural_key_id, Collection, Document, DocumentStore, Query};
pub use memory::MemoryStore;
