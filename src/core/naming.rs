//! core::naming
//!
//! Naming variables under the active scopes.
//!
//! # Features
//!
//! - Qualify a leaf name with the active scope names
//! - Qualify a transformed leaf (`__transform_leaf`)
//! - Declare a leaf: validate it, qualify it and parse the result
//!
//! Every function takes the stack explicitly; combine with
//! [`scope::with_current`](crate::core::scope::with_current) to use the
//! ambient stack.

use super::names::{NameError, NameParts};
use super::scope::ScopeStack;

/// Qualified name of `leaf` under the active scopes.
///
/// # Example
///
/// ```
/// use namescope::core::naming::variable_name;
/// use namescope::core::scope::{Scope, ScopeStack};
///
/// let stack = ScopeStack::new();
/// let _model = stack.enter(Scope::named("model"));
/// assert_eq!(variable_name(&stack, "mu").as_deref(), Some("model/mu"));
/// ```
pub fn variable_name(stack: &ScopeStack, leaf: &str) -> Option<String> {
    stack.qualified_name(Some(leaf))
}

/// Qualified name of `leaf` with a transform prefix.
pub fn transformed_variable_name(
    stack: &ScopeStack,
    transform: &str,
    leaf: &str,
) -> Option<String> {
    stack.qualified_name(Some(&transformed_leaf(transform, leaf)))
}

/// `__{transform}_{leaf}`.
pub fn transformed_leaf(transform: &str, leaf: &str) -> String {
    format!("__{}_{}", transform, leaf)
}

/// Validate `leaf`, qualify it under the active scopes and parse the result.
///
/// # Errors
///
/// - `NameError::InvalidUntransformedName` if `leaf` is empty, starts with `_`
///   or carries a transform prefix
/// - any error of [`NameParts::from_name`] for the qualified name, e.g. an
///   active scope named `_private` makes the whole name invalid
pub fn declare(stack: &ScopeStack, leaf: &str) -> Result<NameParts, NameError> {
    NameParts::validate_untransformed_name(leaf)?;
    let qualified = variable_name(stack, leaf)
        .ok_or_else(|| NameError::InvalidUntransformedName(leaf.to_string()))?;
    NameParts::from_name(&qualified)
}

/// Like [`declare`], with a transform applied to the declared name.
///
/// # Errors
///
/// As [`declare`], plus:
///
/// - `NameError::InvalidTransform` for an empty transform or one with `/`
/// - `NameError::AmbiguousTransform` if the declared name would parse back
///   into a different transform, e.g. `log` with the leaf `my_var`
pub fn declare_transformed(
    stack: &ScopeStack,
    transform: &str,
    leaf: &str,
) -> Result<NameParts, NameError> {
    if !NameParts::is_valid_transform(transform) {
        return Err(NameError::InvalidTransform(transform.to_string()));
    }

    let parts = declare(stack, leaf)?.replace_transform(Some(transform));
    if !parts.round_trips() {
        return Err(NameError::AmbiguousTransform {
            name: parts.full_original_name(),
            transform: transform.to_string(),
            untransformed: leaf.to_string(),
        });
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scope::Scope;

    #[test]
    fn variable_name_joins_scopes() {
        let stack = ScopeStack::new();
        assert_eq!(variable_name(&stack, "x").as_deref(), Some("x"));

        let _a = stack.enter(Scope::named("a"));
        let _b = stack.enter(Scope::named("b"));
        assert_eq!(variable_name(&stack, "x").as_deref(), Some("a/b/x"));
        assert_eq!(variable_name(&stack, "").as_deref(), Some("a/b"));
    }

    #[test]
    fn transformed_variable_name_prefixes_leaf() {
        let stack = ScopeStack::new();
        let _m = stack.enter(Scope::named("model"));
        assert_eq!(
            transformed_variable_name(&stack, "log", "sigma").as_deref(),
            Some("model/__log_sigma")
        );
    }

    #[test]
    fn declare_parses_qualified_name() {
        let stack = ScopeStack::new();
        let _m = stack.enter(Scope::named("model"));
        let _anon = stack.enter(Scope::anonymous());

        let parts = declare(&stack, "mu").unwrap();
        assert_eq!(parts.path(), ["model"]);
        assert_eq!(parts.untransformed_name(), "mu");
        assert!(!parts.is_transformed());
    }

    #[test]
    fn declare_rejects_transformed_leaf() {
        let stack = ScopeStack::new();
        assert_eq!(
            declare(&stack, "__log_mu"),
            Err(NameError::InvalidUntransformedName("__log_mu".to_string()))
        );
        assert_eq!(
            declare(&stack, ""),
            Err(NameError::InvalidUntransformedName(String::new()))
        );
    }

    #[test]
    fn declare_under_private_scope_fails_whole_name_check() {
        let stack = ScopeStack::new();
        let _p = stack.enter(Scope::named("_private"));
        assert_eq!(
            declare(&stack, "x"),
            Err(NameError::InvalidName("_private/x".to_string()))
        );
    }

    #[test]
    fn declare_transformed_round_trips() {
        let stack = ScopeStack::new();
        let _m = stack.enter(Scope::named("model"));

        let parts = declare_transformed(&stack, "log", "sigma").unwrap();
        assert_eq!(parts.full_original_name(), "model/__log_sigma");
        assert_eq!(NameParts::from_name(&parts.full_original_name()).unwrap(), parts);

        assert_eq!(
            declare_transformed(&stack, "", "sigma"),
            Err(NameError::InvalidTransform(String::new()))
        );
    }

    #[test]
    fn declare_transformed_rejects_ambiguous_leaf() {
        let stack = ScopeStack::new();
        let _m = stack.enter(Scope::named("model"));

        assert_eq!(
            declare_transformed(&stack, "log", "my_var"),
            Err(NameError::AmbiguousTransform {
                name: "model/__log_my_var".to_string(),
                transform: "log".to_string(),
                untransformed: "my_var".to_string(),
            })
        );
        // Without a transform the same leaf is fine.
        assert_eq!(declare(&stack, "my_var").unwrap().untransformed_name(), "my_var");
    }
}
