mod collection_store;
mod local_store;

pub use collection_store::{CollectionStore, DisplayMode, StoreEvent, LIKED_RECORD_KEY};
pub use local_store::{JsonFileStorage, KeyValueStorage, MemoryStorage};
