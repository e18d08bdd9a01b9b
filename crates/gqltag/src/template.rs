//! Template assembly.
//!
//! A template is a list of literal segments with one interpolated value between
//! each pair. Previously parsed documents are spliced back in as their original
//! source text, everything else as plain text.

use crate::error::{Error, Result};
use gqltag_syntax::ast::Document;
use std::fmt;
use std::sync::Arc;

/// A value interpolated between two literal segments.
#[derive(Debug, Clone, PartialEq)]
pub enum Interpolation {
    /// Spliced in verbatim.
    Text(String),
    /// Spliced in as the source text the document was parsed from.
    Document(Arc<Document>),
}

impl Interpolation {
    /// Interpolates any displayable value as text.
    pub fn display(value: impl fmt::Display) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<&str> for Interpolation {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Interpolation {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Arc<Document>> for Interpolation {
    fn from(document: Arc<Document>) -> Self {
        Self::Document(document)
    }
}

impl From<&Arc<Document>> for Interpolation {
    fn from(document: &Arc<Document>) -> Self {
        Self::Document(Arc::clone(document))
    }
}

impl From<Document> for Interpolation {
    fn from(document: Document) -> Self {
        Self::Document(Arc::new(document))
    }
}

/// Concatenates `literals` with `values` interleaved.
///
/// # Errors
///
/// [`Error::TemplateArity`] unless there is exactly one more literal than
/// values, and [`Error::MissingSource`] when an interpolated document has no
/// retained source.
pub fn assemble(literals: &[&str], values: &[Interpolation]) -> Result<String> {
    if literals.len() != values.len() + 1 {
        return Err(Error::TemplateArity {
            literals: literals.len(),
            values: values.len(),
        });
    }

    let capacity = literals.iter().map(|s| s.len()).sum::<usize>();
    let mut out = String::with_capacity(capacity);
    out.push_str(literals[0]);

    for (index, (value, literal)) in values.iter().zip(&literals[1..]).enumerate() {
        match value {
            Interpolation::Text(text) => out.push_str(text),
            Interpolation::Document(document) => {
                let source = document.source().ok_or(Error::MissingSource { index })?;
                out.push_str(source);
            }
        }
        out.push_str(literal);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqltag_syntax::{parse, ParseOptions};

    #[test]
    fn test_single_literal() {
        assert_eq!(assemble(&["{ a }"], &[]).unwrap(), "{ a }");
    }

    #[test]
    fn test_interleaves_values() {
        let fragment = parse("fragment F on T { x }", ParseOptions::default())
            .into_result()
            .unwrap();
        let assembled = assemble(
            &["query { ...F ", " }\n", ""],
            &[Interpolation::display(42), Interpolation::from(fragment)],
        )
        .unwrap();
        assert_eq!(assembled, "query { ...F 42 }\nfragment F on T { x }");
    }

    #[test]
    fn test_arity_mismatch() {
        let error = assemble(&["a", "b"], &[]).unwrap_err();
        assert!(matches!(
            error,
            Error::TemplateArity {
                literals: 2,
                values: 0
            }
        ));
        assert!(matches!(
            assemble(&[], &[]),
            Err(Error::TemplateArity { literals: 0, .. })
        ));
    }

    #[test]
    fn test_document_without_source() {
        let document = Document {
            definitions: Vec::new(),
            loc: None,
        };
        let error = assemble(&["", ""], &[Interpolation::from(document)]).unwrap_err();
        assert!(matches!(error, Error::MissingSource { index: 0 }));
    }
}
