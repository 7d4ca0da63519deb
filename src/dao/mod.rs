/// Game snapshot storage and retrieval.
pub mod snapshot_store;
/// Storage error types shared by snapshot backends.
pub mod storage;
