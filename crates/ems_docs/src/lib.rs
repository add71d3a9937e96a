// Document generation (XLSX, DOCX, PDF)

pub mod document;
pub mod docx;
pub mod pdf;
pub mod xlsx;

pub use document::{Block, Document};
