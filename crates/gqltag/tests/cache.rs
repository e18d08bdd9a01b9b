//! Behaviour of an owned `DocumentCache`.

use gqltag::{
    strip::location_count, CacheOptions, DocumentCache, Error, FragmentConflict, Interpolation,
};
use gqltag_syntax::ast::Definition;
use parking_lot::Mutex;
use std::sync::Arc;

fn collecting_cache(options: CacheOptions) -> (DocumentCache, Arc<Mutex<Vec<FragmentConflict>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let cache = DocumentCache::with_options(options)
        .with_conflict_handler(move |conflict| sink.lock().push(conflict.clone()));
    (cache, seen)
}

#[test]
fn test_same_source_is_parsed_once() {
    let cache = DocumentCache::new();
    let first = cache.parse_document("query Me { me { id } }").unwrap();
    let second = cache.parse_document("query Me { me { id } }").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.stats().misses, 1);
    assert_eq!(cache.stats().hits, 1);
}

#[test]
fn test_whitespace_and_commas_share_an_entry() {
    let cache = DocumentCache::new();
    let spaced = cache.parse_document("{ a }").unwrap();
    let tight = cache.parse_document("{a}").unwrap();
    let commas = cache.parse_document("{,a,}").unwrap();

    assert!(Arc::ptr_eq(&spaced, &tight));
    assert!(Arc::ptr_eq(&spaced, &commas));
    assert_eq!(cache.stats().misses, 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_comments_do_not_merge_with_following_code() {
    let cache = DocumentCache::new();
    let two = cache.parse_document("{ a } # note\n{ b }").unwrap();
    let one = cache.parse_document("{ a } # note { b }").unwrap();

    assert_eq!(two.definitions.len(), 2);
    assert_eq!(one.definitions.len(), 1);
    assert!(!Arc::ptr_eq(&one, &two));
    assert_eq!(cache.stats().misses, 2);
}

#[test]
fn test_source_hidden_in_a_comment_still_fails() {
    let cache = DocumentCache::new();
    cache.parse_document("# c\n{ a }").unwrap();

    let error = cache.parse_document("# c { a }").unwrap_err();
    assert_eq!(error.message, "Unexpected <EOF>.");
    assert!(cache.parse_document("# c { a }").is_err());
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_comment_only_differences_share_an_entry() {
    let cache = DocumentCache::new();
    let plain = cache.parse_document("{ a }").unwrap();
    let commented = cache.parse_document("# the a field\n{ a } # trailing").unwrap();
    assert!(Arc::ptr_eq(&plain, &commented));
}

#[test]
fn test_identical_fragments_in_one_document_are_deduplicated() {
    let (cache, conflicts) = collecting_cache(CacheOptions::default());
    let document = cache
        .parse_document(
            "query { ...F }
             fragment F on User { id }
             fragment F on User {
               id
             }",
        )
        .unwrap();

    assert_eq!(document.fragments().count(), 1);
    assert_eq!(document.operations().count(), 1);
    assert!(conflicts.lock().is_empty());
}

#[test]
fn test_conflicting_fragment_bodies_are_reported() {
    let (cache, conflicts) = collecting_cache(CacheOptions::default());
    cache.parse_document("fragment F on T { x }").unwrap();
    let second = cache.parse_document("fragment F on T { y }").unwrap();

    {
        let conflicts = conflicts.lock();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].name, "F");
        assert_eq!(conflicts[0].previous, ["fragment F on T { x }"]);
    }
    assert_eq!(second.fragments().count(), 1);
    assert_eq!(
        cache.fragment_bodies("F"),
        ["fragment F on T { x }", "fragment F on T { y }"]
    );
    assert_eq!(cache.stats().conflicts, 1);
}

#[test]
fn test_disabled_warnings_still_register_bodies() {
    let (cache, conflicts) = collecting_cache(CacheOptions::new().with_fragment_warnings(false));
    cache.parse_document("fragment F on T { x }").unwrap();
    cache.parse_document("fragment F on T { y }").unwrap();

    assert!(conflicts.lock().is_empty());
    assert_eq!(cache.fragment_bodies("F").len(), 2);
    assert_eq!(cache.stats().conflicts, 1);

    cache.enable_fragment_warnings();
    cache.parse_document("fragment F on T { z }").unwrap();
    assert_eq!(conflicts.lock().len(), 1);
}

#[test]
fn test_consistent_reregistration_is_not_a_conflict() {
    let (cache, conflicts) = collecting_cache(CacheOptions::default());
    cache.parse_document("fragment F on T { x }").unwrap();
    cache
        .parse_document("query { ...F }\nfragment F on T { x }")
        .unwrap();

    assert!(conflicts.lock().is_empty());
    assert_eq!(cache.fragment_bodies("F").len(), 1);
}

#[test]
fn test_cached_documents_have_no_locations() {
    let cache = DocumentCache::new();
    let document = cache
        .parse_document(
            r#"query Q($id: ID!) { user(id: $id) { ...F @include(if: true) } }
               fragment F on User { name(format: "full") }"#,
        )
        .unwrap();

    assert_eq!(location_count(&*document), 0);
    assert!(document.definitions.iter().all(|def| def.span().is_none()));
    assert!(document.source().is_some_and(|source| source.starts_with("query Q")));
}

#[test]
fn test_reset_clears_documents_and_fragments() {
    let (cache, conflicts) = collecting_cache(CacheOptions::default());
    let before = cache.parse_document("fragment F on T { x }").unwrap();

    cache.reset();
    assert!(cache.is_empty());
    assert_eq!(cache.stats().fragment_names, 0);

    let after = cache.parse_document("fragment F on T { x }").unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(cache.stats().misses, 1);

    cache.reset();
    cache.parse_document("fragment F on T { y }").unwrap();
    assert!(conflicts.lock().is_empty());
}

#[test]
fn test_interpolated_document_splices_source() {
    let cache = DocumentCache::new();
    let fragment = cache
        .parse_document("fragment UserFields on User { id name }")
        .unwrap();
    let composed = cache
        .gql(
            &["query { me { ...UserFields } }\n", ""],
            &[Interpolation::from(&fragment)],
        )
        .unwrap();
    let concatenated = cache
        .parse_document("query { me { ...UserFields } }\nfragment UserFields on User { id name }")
        .unwrap();

    assert!(Arc::ptr_eq(&composed, &concatenated));
    assert!(matches!(composed.definitions[1], Definition::Fragment(_)));
}

#[test]
fn test_parse_errors_are_not_cached() {
    let cache = DocumentCache::new();
    let first = cache.parse_document("query {").unwrap_err();
    let second = cache.parse_document("query {").unwrap_err();

    insta::assert_snapshot!(first.to_string(), @"Syntax Error: Expected Name, found <EOF>.");
    assert_eq!(first.message, second.message);
    assert_eq!(first.position, second.position);
    assert!(cache.is_empty());
    assert_eq!(cache.stats().misses, 2);
}

#[test]
fn test_empty_source_is_a_parse_error() {
    let cache = DocumentCache::new();
    let error = cache.parse_document("  ,\n ").unwrap_err();
    assert_eq!(error.message, "Unexpected <EOF>.");
}

#[test]
fn test_legacy_fragment_variables_toggle() {
    let cache = DocumentCache::new();
    let source = "fragment F($size: Int = 10) on User { avatar(size: $size) }";
    assert!(cache.parse_document(source).is_err());

    cache.enable_legacy_fragment_variables();
    let document = cache.parse_document(source).unwrap();
    let fragment = document.fragments().next().unwrap();
    assert_eq!(fragment.variables.as_ref().map(Vec::len), Some(1));

    // Already cached entries survive the toggle.
    cache.disable_legacy_fragment_variables();
    assert!(cache.parse_document(source).is_ok());
    assert!(cache
        .parse_document("fragment G($v: Int) on User { id }")
        .is_err());
}

#[test]
fn test_template_arity_error() {
    let cache = DocumentCache::new();
    let error = cache.gql(&["{ a }", "{ b }"], &[]).unwrap_err();
    assert!(matches!(
        error,
        Error::TemplateArity {
            literals: 2,
            values: 0
        }
    ));
}

#[test]
fn test_concurrent_parses_share_one_entry() {
    let (cache, conflicts) = collecting_cache(CacheOptions::default());
    let documents: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = &cache;
                scope.spawn(move || {
                    let source = if i % 2 == 0 {
                        "query { ...F }\nfragment F on T { x }"
                    } else {
                        "query {...F}\n\nfragment F on T {x}"
                    };
                    cache.parse_document(source).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(documents.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(cache.stats().misses, 1);
    assert_eq!(cache.stats().hits, 7);
    assert!(conflicts.lock().is_empty());
}
