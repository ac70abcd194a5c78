pub mod client;
mod record;
pub mod source;

pub use client::{ApiClient, ClientBuildError, Collection, FetchError};
pub use source::CollectionSource;
