//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod memory;
mod file;
mod http;
mod timeout;

pub use traits::{
    paginate, record_id, record_revision, CollectionClient, Page, PageRequest, Record,
    TypedCollections, ID_FIELD, REVISION_FIELD,
};
pub use memory::MemoryCollectionClient;
pub use file::JsonFileCollectionClient;
pub use http::{HttpClientConfig, HttpCollectionClient};
pub use timeout::TimeoutClient;
