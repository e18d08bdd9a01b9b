//! Fragment name registry.
//!
//! Tracks every distinct body ever registered under a fragment name. A name
//! that picks up a second body is a conflict: it is reported, never rejected,
//! and both bodies stay registered.

use crate::error::ParseError;
use crate::normalize::normalize;
use gqltag_syntax::ast::{Definition, Document};
use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

/// Outcome of registering one fragment body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// First body seen for this name.
    New,
    /// This body was already registered under this name.
    Known,
    /// The name already had a different body.
    Conflict,
}

/// Map from fragment name to the normalized bodies registered under it.
#[derive(Debug, Default, Clone)]
pub struct FragmentRegistry {
    fragments: FxHashMap<String, IndexSet<String>>,
}

impl FragmentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `fingerprint` under `name`.
    pub fn register(&mut self, name: &str, fingerprint: &str) -> Registration {
        match self.fragments.get_mut(name) {
            None => {
                let mut bodies = IndexSet::new();
                bodies.insert(fingerprint.to_string());
                self.fragments.insert(name.to_string(), bodies);
                Registration::New
            }
            Some(bodies) if bodies.contains(fingerprint) => Registration::Known,
            Some(bodies) => {
                bodies.insert(fingerprint.to_string());
                Registration::Conflict
            }
        }
    }

    /// Returns every body registered under `name`, in registration order.
    pub fn bodies(&self, name: &str) -> impl Iterator<Item = &str> {
        self.fragments
            .get(name)
            .into_iter()
            .flat_map(|bodies| bodies.iter().map(String::as_str))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    /// Number of distinct fragment names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }
}

/// A fragment name registered with a body that differs from earlier ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentConflict {
    pub name: String,
    /// The normalized body that caused the conflict.
    pub body: String,
    /// Bodies registered under the name before this one.
    pub previous: Vec<String>,
}

impl fmt::Display for FragmentConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fragment `{}` is defined with {} different bodies across the application",
            self.name,
            self.previous.len() + 1
        )
    }
}

/// Drops repeated fragment definitions from a freshly parsed document and
/// registers every fragment body in `registry`.
///
/// Duplicates are detected by normalized body within this document only.
/// Registration happens for every fragment definition, kept or not.
pub(crate) fn process_fragments(
    document: Document,
    source: &str,
    registry: &mut FragmentRegistry,
) -> Result<(Document, Vec<FragmentConflict>), ParseError> {
    // Fingerprints are read from spans, so compute them all before anything
    // else touches the tree.
    let mut fingerprints = Vec::with_capacity(document.definitions.len());
    for definition in &document.definitions {
        let fingerprint = match definition {
            Definition::Fragment(fragment) => {
                let body = fragment
                    .span
                    .and_then(|span| span.slice(source))
                    .ok_or_else(|| {
                        ParseError::contract_violation(
                            format!(
                                "fragment `{}` has no source location",
                                fragment.name.as_str()
                            ),
                            source,
                        )
                    })?;
                Some((fragment.name.as_str().to_string(), normalize(body)))
            }
            _ => None,
        };
        fingerprints.push(fingerprint);
    }

    let Document { definitions, loc } = document;
    let mut seen = FxHashSet::default();
    let mut conflicts = Vec::new();
    let mut kept = Vec::with_capacity(definitions.len());

    for (definition, fingerprint) in definitions.into_iter().zip(fingerprints) {
        let Some((name, fingerprint)) = fingerprint else {
            kept.push(definition);
            continue;
        };

        if registry.register(&name, &fingerprint) == Registration::Conflict {
            let previous = registry
                .bodies(&name)
                .filter(|body| *body != fingerprint)
                .map(str::to_string)
                .collect();
            conflicts.push(FragmentConflict {
                name,
                body: fingerprint.clone(),
                previous,
            });
        }

        if seen.insert(fingerprint) {
            kept.push(definition);
        }
    }

    Ok((
        Document {
            definitions: kept,
            loc,
        },
        conflicts,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqltag_syntax::{parse, ParseOptions};

    fn process(source: &str, registry: &mut FragmentRegistry) -> (Document, Vec<FragmentConflict>) {
        let document = parse(source, ParseOptions::default())
            .into_result()
            .expect("valid document");
        process_fragments(document, source, registry).expect("fragments have spans")
    }

    #[test]
    fn test_register_outcomes() {
        let mut registry = FragmentRegistry::new();
        assert_eq!(registry.register("F", "fragment F on T { x }"), Registration::New);
        assert_eq!(registry.register("F", "fragment F on T { x }"), Registration::Known);
        assert_eq!(registry.register("F", "fragment F on T { y }"), Registration::Conflict);
        assert_eq!(registry.register("F", "fragment F on T { y }"), Registration::Known);
        assert_eq!(
            registry.bodies("F").collect::<Vec<_>>(),
            ["fragment F on T { x }", "fragment F on T { y }"]
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.bodies("missing").count(), 0);
    }

    #[test]
    fn test_duplicate_fragments_in_one_document() {
        let mut registry = FragmentRegistry::new();
        let (document, conflicts) = process(
            "query { ...F }\nfragment F on T { x }\nfragment F on T {x}",
            &mut registry,
        );

        assert!(conflicts.is_empty());
        assert_eq!(document.definitions.len(), 2);
        assert_eq!(document.fragments().count(), 1);
        assert_eq!(registry.bodies("F").count(), 1);
    }

    #[test]
    fn test_same_name_different_body_in_one_document() {
        let mut registry = FragmentRegistry::new();
        let (document, conflicts) = process(
            "fragment F on T { x }\nfragment F on T { y }",
            &mut registry,
        );

        assert_eq!(document.fragments().count(), 2);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].name, "F");
        assert_eq!(conflicts[0].body, "fragment F on T { y }");
        assert_eq!(conflicts[0].previous, ["fragment F on T { x }"]);
    }

    #[test]
    fn test_conflict_across_documents() {
        let mut registry = FragmentRegistry::new();
        let (_, first) = process("fragment F on T { x }", &mut registry);
        let (_, again) = process("fragment F on T {\n  x\n}", &mut registry);
        let (_, second) = process("fragment F on T { y }", &mut registry);

        assert!(first.is_empty());
        assert!(again.is_empty());
        assert_eq!(second.len(), 1);
        insta::assert_snapshot!(
            second[0].to_string(),
            @"fragment `F` is defined with 2 different bodies across the application"
        );
    }

    #[test]
    fn test_preserves_definition_order() {
        let mut registry = FragmentRegistry::new();
        let (document, _) = process(
            "fragment A on T { a }\nquery Q { ...A }\nfragment A on T { a }\nfragment B on T { b }\nmutation M { m }",
            &mut registry,
        );
        let kinds: Vec<_> = document
            .definitions
            .iter()
            .map(|definition| match definition {
                Definition::Operation(op) => op.name.as_ref().map_or("", |n| n.as_str()).to_string(),
                Definition::Fragment(fragment) => fragment.name.as_str().to_string(),
                _ => String::new(),
            })
            .collect();
        assert_eq!(kinds, ["A", "Q", "B", "M"]);
    }

    #[test]
    fn test_missing_span_is_contract_violation() {
        let source = "fragment F on T { x }";
        let mut document = parse(source, ParseOptions::default())
            .into_result()
            .expect("valid document");
        if let Definition::Fragment(fragment) = &mut document.definitions[0] {
            fragment.span = None;
        }

        let error = process_fragments(document, source, &mut FragmentRegistry::new())
            .expect_err("span is required");
        assert!(error.message.contains("has no source location"));
    }
}
