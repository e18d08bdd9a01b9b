//! Parse-once GraphQL documents with application-wide fragment checking.
//!
//! This crate provides:
//! - `normalize`: Cache keys from source text
//! - `cache`: The document cache
//! - `registry`: Fragment name to body tracking
//! - `strip`: Location stripping for cached documents
//! - `template`: Assembly of documents from literal segments and values
//! - `global`: A process-wide default cache and the `gql!` macro
//!
//! ```
//! use gqltag::DocumentCache;
//!
//! let cache = DocumentCache::new();
//! let first = cache.parse_document("{ user { id } }")?;
//! let second = cache.parse_document("{user{id}}")?;
//! assert!(std::sync::Arc::ptr_eq(&first, &second));
//! # Ok::<(), gqltag::ParseError>(())
//! ```

pub mod cache;
pub mod error;
pub mod global;
pub mod normalize;
pub mod options;
pub mod registry;
pub mod strip;
pub mod template;

pub use cache::{CacheStats, DocumentCache};
pub use error::{Error, ParseError, Result};
pub use global::{
    default_cache, disable_experimental_fragment_variables, disable_fragment_warnings,
    enable_experimental_fragment_variables, gql, parse_document, reset_caches,
};
pub use gqltag_syntax::ast::Document;
pub use normalize::normalize;
pub use options::CacheOptions;
pub use registry::{FragmentConflict, FragmentRegistry, Registration};
pub use strip::{strip_locations, VisitSpans};
pub use template::{assemble, Interpolation};

/// Parses a document template through the process-wide cache.
///
/// Literal segments alternate with interpolated values. Values convert with
/// [`Interpolation::from`]; wrap other displayable values with
/// [`Interpolation::display`].
///
/// ```
/// let fragment = gqltag::gql!("fragment UserFields on User { id name }")?;
/// let query = gqltag::gql!("query { me { ...UserFields } }\n", fragment, "")?;
/// assert_eq!(query.fragments().count(), 1);
/// # Ok::<(), gqltag::Error>(())
/// ```
#[macro_export]
macro_rules! gql {
    ($literal:literal $(,)?) => {
        $crate::gql(&[$literal], &[])
    };
    ($first:literal $(, $value:expr, $literal:literal)+ $(,)?) => {
        $crate::gql(
            &[$first $(, $literal)+],
            &[$($crate::Interpolation::from($value)),+],
        )
    };
}
