//! The process-wide default cache.
//!
//! Free functions here operate on one lazily created [`DocumentCache`]. Code
//! that wants isolation (tests, multi-tenant hosts) should own a cache instead.

use crate::cache::DocumentCache;
use crate::error::{ParseError, Result};
use crate::template::Interpolation;
use gqltag_syntax::ast::Document;
use std::sync::{Arc, OnceLock};

/// Returns the process-wide cache.
pub fn default_cache() -> &'static DocumentCache {
    static DEFAULT_CACHE: OnceLock<DocumentCache> = OnceLock::new();
    DEFAULT_CACHE.get_or_init(DocumentCache::new)
}

/// Parses `source` through the process-wide cache.
///
/// # Errors
///
/// Returns a [`ParseError`] when `source` is not a valid GraphQL document.
pub fn parse_document(source: &str) -> Result<Arc<Document>, ParseError> {
    default_cache().parse_document(source)
}

/// Assembles a template and parses it through the process-wide cache.
///
/// # Errors
///
/// Fails on a malformed template or when the assembled text does not parse.
pub fn gql(literals: &[&str], values: &[Interpolation]) -> Result<Arc<Document>> {
    default_cache().gql(literals, values)
}

/// Clears the process-wide document cache and fragment registry.
///
/// Meant for test isolation. Parses running concurrently on other threads may
/// repopulate the cache right after it is cleared.
pub fn reset_caches() {
    default_cache().reset();
}

pub fn disable_fragment_warnings() {
    default_cache().disable_fragment_warnings();
}

pub fn enable_experimental_fragment_variables() {
    default_cache().enable_legacy_fragment_variables();
}

pub fn disable_experimental_fragment_variables() {
    default_cache().disable_legacy_fragment_variables();
}
