// Data structures and types

pub mod payload;
pub mod storage;
pub mod summary;

pub use payload::{MongoConfig, StorageConfig, StoragePayload};
pub use storage::{
    Credential, DEFAULT_MONGO_HOST, DEFAULT_MONGO_PORT, MONGODB_CR, Server, StorageKind,
    StorageResource,
};
pub use summary::{Application, ApplicationCollection, StorageCollection, StorageRow};
