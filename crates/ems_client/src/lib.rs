//! Access to the employee records service.
//!
//! The export pipeline only depends on the [`RecordSource`] trait. Two
//! implementations ship here: [`ApiClient`] talks to the REST API over
//! blocking HTTP, [`InMemorySource`] serves fixed data.

pub mod api;
pub mod credential;
pub mod error;
pub mod memory;
pub mod source;

pub use api::ApiClient;
pub use credential::Credential;
pub use error::SourceError;
pub use memory::InMemorySource;
pub use source::RecordSource;
