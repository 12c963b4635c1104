//! Property-based tests for names and scope stacks.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use namescope::core::names::{NameError, NameParts};
use namescope::core::naming::{declare, declare_transformed};
use namescope::core::scope::{Scope, ScopeStack, NAME_ATTRIBUTE};

/// Strategy for path segments and leaves that the grammar accepts.
fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}"
}

/// Leaves without underscores parse back unambiguously under a transform.
fn plain_leaf() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,6}"
}

fn transform() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,5}"
}

/// Scope names, including empty ones that count as unset.
fn scope_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{0,4}", 0..6)
}

fn qualified(path: &[String], leaf: &str) -> String {
    path.iter()
        .map(String::as_str)
        .chain(std::iter::once(leaf))
        .collect::<Vec<_>>()
        .join("/")
}

proptest! {
    /// Parsing and reassembling a name gives back the input.
    #[test]
    fn full_original_name_roundtrip(
        path in prop::collection::vec(segment(), 0..4),
        transform in prop::option::of(transform()),
        leaf in segment(),
    ) {
        let last = match &transform {
            Some(t) => format!("__{}_{}", t, leaf),
            None => leaf.clone(),
        };
        let name = qualified(&path, &last);

        let parts = NameParts::from_name(&name).unwrap();
        prop_assert_eq!(parts.full_original_name(), name);
        prop_assert_eq!(parts.path(), path.as_slice());
        prop_assert_eq!(parts.original_name(), last);
    }

    /// A transform is recovered exactly when the leaf has no underscore.
    #[test]
    fn transform_recovered_for_plain_leaf(transform in transform(), leaf in plain_leaf()) {
        let parts = NameParts::from_name(&format!("__{}_{}", transform, leaf)).unwrap();
        prop_assert_eq!(parts.transform_name(), Some(transform.as_str()));
        prop_assert_eq!(parts.untransformed_name(), leaf.as_str());
    }

    /// Removing the transform leaves the full untransformed name.
    #[test]
    fn removing_transform_gives_untransformed_name(
        path in prop::collection::vec(segment(), 0..4),
        transform in transform(),
        leaf in plain_leaf(),
    ) {
        let parts = NameParts::from_name(&qualified(&path, &format!("__{}_{}", transform, leaf))).unwrap();
        let stripped = parts.replace_transform(None);

        prop_assert!(!stripped.is_transformed());
        prop_assert_eq!(stripped.full_original_name(), parts.full_untransformed_name());
        prop_assert_eq!(stripped.full_original_name(), qualified(&path, &leaf));
    }

    /// For a single segment the validity check and the parser agree.
    #[test]
    fn validity_agrees_with_parser(name in "[_a-z0-9]{0,10}") {
        prop_assert_eq!(NameParts::is_valid_name(&name), NameParts::from_name(&name).is_ok());
    }

    /// Qualified names join the non-empty scope names and the leaf.
    #[test]
    fn qualified_name_skips_unset_names(names in scope_names(), leaf in "[a-z]{0,4}") {
        let stack = ScopeStack::new();
        let _guards = stack.enter_all(names.iter().map(|name| Scope::named(name.as_str())));

        let expected: Vec<&str> = names
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(leaf.as_str()))
            .filter(|segment| !segment.is_empty())
            .collect();
        let expected = if expected.is_empty() { None } else { Some(expected.join("/")) };

        prop_assert_eq!(stack.qualified_name(Some(&leaf)), expected);
    }

    /// Without dropping, the chain has one entry per scope plus the leaf.
    #[test]
    fn chain_length_tracks_depth(names in scope_names()) {
        let stack = ScopeStack::new();
        let guards = stack.enter_all(names.iter().map(|name| Scope::named(name.as_str())));

        prop_assert_eq!(stack.depth(), names.len());
        prop_assert_eq!(stack.current_chain(NAME_ATTRIBUTE, None, false).len(), names.len() + 1);
        prop_assert!(stack
            .current_chain(NAME_ATTRIBUTE, None, true)
            .iter()
            .all(Option::is_some));

        drop(guards);
        prop_assert!(stack.is_empty());
    }

    /// Declared names reparse to the same parts; a transformed leaf that
    /// would not is rejected instead.
    #[test]
    fn declared_names_reparse(
        scopes in prop::collection::vec(segment(), 0..4),
        transform in prop::option::of(transform()),
        leaf in segment(),
    ) {
        let stack = ScopeStack::new();
        let _guards = stack.enter_all(scopes.iter().map(|name| Scope::named(name.as_str())));

        let declared = match &transform {
            Some(t) => declare_transformed(&stack, t, &leaf),
            None => declare(&stack, &leaf),
        };
        match declared {
            Ok(parts) => {
                let reparsed = NameParts::from_name(&parts.full_original_name()).unwrap();
                prop_assert_eq!(reparsed, parts);
            }
            Err(NameError::AmbiguousTransform { .. }) => {
                prop_assert!(transform.is_some());
                prop_assert!(leaf.contains('_'));
            }
            Err(err) => prop_assert!(false, "unexpected error: {}", err),
        }
    }
}
