//! Core utilities for gqltag.
//!
//! This crate provides foundational types shared by the parser and the cache:
//! - `span`: Byte-offset source spans
//! - `line_index`: Byte offset to line/column resolution
//! - `diagnostics`: Error reporting

pub mod diagnostics;
pub mod line_index;
pub mod span;

pub use diagnostics::{Diagnostic, DiagnosticBag, DiagnosticSeverity, Label};
pub use line_index::{LineCol, LineIndex};
pub use span::Span;
