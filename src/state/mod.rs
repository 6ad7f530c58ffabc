pub mod context;
mod persistence;
mod store;

pub use context::{EditorContext, SharedEditor};
pub use persistence::{
    PersistenceError, PersistenceResult, StatePersistence, StoredImageState, StoredPixels,
};
pub use store::{DocumentStore, FileStore, KeyValueStore, MemoryStore};
