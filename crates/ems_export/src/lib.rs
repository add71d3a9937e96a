//! Employee record exports.
//!
//! An [`Exporter`] pulls records from a [`RecordSource`](ems_client::RecordSource)
//! and writes spreadsheets, PDFs, Word documents and ZIP archives of PDFs
//! into an [`ExportDirectory`].

mod archive;
mod bulk;
pub mod directory;
pub mod error;
mod exporter;
pub mod layout;
pub mod naming;
mod single;

pub use directory::ExportDirectory;
pub use ems_core::{ArtifactKind, ExportArtifact};
pub use error::{ExportError, FAILURE_NOTICE};
pub use exporter::Exporter;
pub use naming::ExportPurpose;
