//! Error types for gqltag.

use gqltag_core::{Diagnostic as SyntaxDiagnostic, LineCol, LineIndex};
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// A source text that could not be turned into a document.
///
/// Parse errors are never cached: parsing the same text again fails again in
/// the same way.
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("Syntax Error: {message}")]
#[diagnostic(code(gqltag::syntax_error))]
pub struct ParseError {
    /// Human-readable description, e.g. `Expected Name, found <EOF>.`
    pub message: String,
    /// Diagnostic code reported by the parser.
    pub code: &'static str,
    /// One-based position of the error, when known.
    pub position: Option<LineCol>,
    #[source_code]
    source_text: String,
    #[label("{label}")]
    span: Option<SourceSpan>,
    label: String,
}

impl ParseError {
    /// Builds an error from a parser diagnostic.
    pub(crate) fn from_diagnostic(diagnostic: &SyntaxDiagnostic, source: &str) -> Self {
        let primary = diagnostic.labels.first();
        let position = primary.map(|label| LineIndex::new(source).line_col(label.span.start));

        Self {
            message: diagnostic.title.clone(),
            code: diagnostic.code,
            position,
            source_text: source.to_string(),
            span: primary.map(|label| label.span.into()),
            label: primary.map(|label| label.message.clone()).unwrap_or_default(),
        }
    }

    /// Error for parser output that breaks the parser's own guarantees.
    pub(crate) fn contract_violation(message: impl Into<String>, source: &str) -> Self {
        Self {
            message: message.into(),
            code: gqltag_core::diagnostics::codes::INVALID_SYNTAX,
            position: None,
            source_text: source.to_string(),
            span: None,
            label: String::new(),
        }
    }

    /// Returns the source text that failed to parse.
    #[must_use]
    pub fn source_text(&self) -> &str {
        &self.source_text
    }
}

/// Errors returned by document assembly.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(
        "template has {literals} literal segment(s) and {values} value(s); \
         expected exactly one more segment than values"
    )]
    #[diagnostic(code(gqltag::template_arity))]
    TemplateArity { literals: usize, values: usize },

    #[error("interpolated document at position {index} has no retained source text")]
    #[diagnostic(code(gqltag::missing_source))]
    MissingSource { index: usize },
}

/// Result type for document assembly.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use gqltag_core::{diagnostics::codes, Span};

    #[test]
    fn test_from_diagnostic_resolves_position() {
        let source = "query {\n  a(\n}";
        let diagnostic = SyntaxDiagnostic::error(codes::UNEXPECTED_TOKEN, "Expected Name, found \"}\".")
            .with_span(Span::new(13, 14), "expected Name");
        let error = ParseError::from_diagnostic(&diagnostic, source);

        assert_eq!(error.to_string(), "Syntax Error: Expected Name, found \"}\".");
        assert_eq!(error.position, Some(LineCol { line: 3, column: 1 }));
        assert_eq!(error.code, codes::UNEXPECTED_TOKEN);
        assert_eq!(error.source_text(), source);
    }

    #[test]
    fn test_template_arity_message() {
        let error = Error::TemplateArity {
            literals: 1,
            values: 1,
        };
        assert!(error.to_string().starts_with("template has 1 literal segment(s)"));
    }
}
