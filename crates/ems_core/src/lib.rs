//! Shared types for the employee export tooling: the record model,
//! configuration and logging setup.

pub mod config;
pub mod logging;
pub mod models;

pub use config::ExportConfig;
pub use models::{
    ArtifactKind, EmployeeRecord, EmployeeStatus, EmploymentHistoryEntry, ExportArtifact,
};
