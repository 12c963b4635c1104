//! core::names
//!
//! Parsing and formatting of transform-aware hierarchical names.
//!
//! # Grammar
//!
//! A name is a `/`-delimited path whose final segment may carry a transform
//! prefix:
//!
//! ```text
//! model/scale/__log_sigma
//! ^^^^^^^^^^^   ^^^ ^^^^^
//!    path       |   untransformed name
//!               transform
//! ```
//!
//! The final segment must match [`NAME_PATTERN`]. The transform group is
//! greedy, so `__going__to_the_market` splits into the transform
//! `going__to_the` and the name `market`.
//!
//! # Validation
//!
//! [`NameParts::from_name`] checks the grammar twice: once against the whole
//! input and once against the trailing segment it decomposes. The pattern has
//! no notion of `/`, so the two checks can disagree (`outer/_x` passes the
//! first and fails the second). Disagreement is reported as
//! [`NameError::SegmentMismatch`] instead of being resolved either way.
//!
//! # Example
//!
//! ```
//! use namescope::core::names::NameParts;
//!
//! let parts = NameParts::from_name("model/__log_sigma").unwrap();
//! assert_eq!(parts.path(), ["model"]);
//! assert_eq!(parts.transform_name(), Some("log"));
//! assert_eq!(parts.untransformed_name(), "sigma");
//! assert_eq!(parts.full_untransformed_name(), "model/sigma");
//!
//! let untransformed = parts.replace_transform(None);
//! assert_eq!(untransformed.full_original_name(), "model/sigma");
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between path segments.
pub const SEPARATOR: char = '/';

/// Grammar of a single name segment.
pub const NAME_PATTERN: &str = r"^(?:__(?P<transform>[^/]+)_)?(?P<name>[^_].*)$";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NAME_PATTERN).expect("name grammar is a valid pattern"));

/// Errors from name validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error(
        "Invalid name: `{0}`, the correct one should look like: `__transform_name` or `name`, \
         note only one underscore between the transform and actual name"
    )]
    InvalidName(String),

    #[error(
        "Invalid name: `{0}`, the correct one should look like: `name` without leading underscore"
    )]
    InvalidUntransformedName(String),

    #[error(
        "Invalid name: `{name}` matches as a whole but its last segment `{segment}` does not; \
         the correct one should look like: `path/__transform_name` or `path/name`"
    )]
    SegmentMismatch { name: String, segment: String },

    #[error("Invalid transform: `{0}`, a transform must be non-empty and must not contain `/`")]
    InvalidTransform(String),

    #[error(
        "Ambiguous name: `{name}` does not parse back into transform `{transform}` and name \
         `{untransformed}`; the transform is read up to the last `_` followed by a name"
    )]
    AmbiguousTransform {
        name: String,
        transform: String,
        untransformed: String,
    },
}

impl NameError {
    /// The offending input.
    pub fn input(&self) -> &str {
        match self {
            NameError::InvalidName(name)
            | NameError::InvalidUntransformedName(name)
            | NameError::InvalidTransform(name) => name,
            NameError::SegmentMismatch { name, .. } | NameError::AmbiguousTransform { name, .. } => {
                name
            }
        }
    }
}

/// A name decomposed into path, optional transform and untransformed name.
///
/// Serializes as its full original name; deserialization goes through
/// [`NameParts::from_name`], so invalid names cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NameParts {
    path: Vec<String>,
    transform_name: Option<String>,
    untransformed_name: String,
}

impl NameParts {
    /// Build from components.
    ///
    /// # Errors
    ///
    /// Returns `NameError::InvalidUntransformedName` if `untransformed_name`
    /// is empty or starts with `_`, and `NameError::InvalidTransform` if the
    /// transform is empty or contains `/`.
    pub fn new<P, S>(
        path: P,
        transform_name: Option<&str>,
        untransformed_name: impl Into<String>,
    ) -> Result<Self, NameError>
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let untransformed_name = untransformed_name.into();
        Self::validate_untransformed_name(&untransformed_name)?;
        if let Some(transform) = transform_name {
            if !Self::is_valid_transform(transform) {
                return Err(NameError::InvalidTransform(transform.to_string()));
            }
        }

        Ok(Self {
            path: path.into_iter().map(Into::into).collect(),
            transform_name: transform_name.map(str::to_string),
            untransformed_name,
        })
    }

    /// Parse a possibly qualified name.
    ///
    /// # Errors
    ///
    /// - `NameError::InvalidName` if `name` as a whole does not match the grammar
    /// - `NameError::SegmentMismatch` if it does, but its last segment does not
    ///
    /// # Example
    ///
    /// ```
    /// use namescope::core::names::{NameError, NameParts};
    ///
    /// assert!(NameParts::from_name("outer/__log_x").is_ok());
    /// assert!(matches!(
    ///     NameParts::from_name("_outer/x"),
    ///     Err(NameError::InvalidName(_))
    /// ));
    /// assert!(matches!(
    ///     NameParts::from_name("outer/_x"),
    ///     Err(NameError::SegmentMismatch { .. })
    /// ));
    /// ```
    pub fn from_name(name: &str) -> Result<Self, NameError> {
        if !Self::is_valid_name(name) {
            tracing::debug!(name, "name does not match the name grammar");
            return Err(NameError::InvalidName(name.to_string()));
        }

        let (path, segment) = match name.rsplit_once(SEPARATOR) {
            Some((path, segment)) => (path.split(SEPARATOR).map(str::to_string).collect(), segment),
            None => (Vec::new(), name),
        };

        let captures = NAME_RE.captures(segment).ok_or_else(|| {
            tracing::debug!(name, segment, "last segment does not match the name grammar");
            NameError::SegmentMismatch {
                name: name.to_string(),
                segment: segment.to_string(),
            }
        })?;

        Ok(Self::from_captures(path, &captures))
    }

    fn from_captures(path: Vec<String>, captures: &Captures<'_>) -> Self {
        Self {
            path,
            transform_name: captures.name("transform").map(|m| m.as_str().to_string()),
            untransformed_name: captures
                .name("name")
                .map_or_else(String::new, |m| m.as_str().to_string()),
        }
    }

    /// Whether `name` matches the grammar, with or without a transform.
    pub fn is_valid_name(name: &str) -> bool {
        NAME_RE.is_match(name)
    }

    /// Whether `name` matches the grammar without a transform prefix.
    pub fn is_valid_untransformed_name(name: &str) -> bool {
        NAME_RE
            .captures(name)
            .is_some_and(|captures| captures.name("transform").is_none())
    }

    /// Whether `transform` can be used as a transform tag.
    pub fn is_valid_transform(transform: &str) -> bool {
        !transform.is_empty() && !transform.contains(SEPARATOR)
    }

    /// Require a plain name without transform prefix.
    ///
    /// # Errors
    ///
    /// Returns `NameError::InvalidUntransformedName` carrying `name`.
    pub fn validate_untransformed_name(name: &str) -> Result<(), NameError> {
        if Self::is_valid_untransformed_name(name) {
            Ok(())
        } else {
            Err(NameError::InvalidUntransformedName(name.to_string()))
        }
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn transform_name(&self) -> Option<&str> {
        self.transform_name.as_deref()
    }

    pub fn untransformed_name(&self) -> &str {
        &self.untransformed_name
    }

    pub fn is_transformed(&self) -> bool {
        self.transform_name.is_some()
    }

    /// The last segment as originally written, transform prefix included.
    pub fn original_name(&self) -> String {
        match &self.transform_name {
            Some(transform) => format!("__{}_{}", transform, self.untransformed_name),
            None => self.untransformed_name.clone(),
        }
    }

    /// Path and original name joined by `/`.
    pub fn full_original_name(&self) -> String {
        self.join_path(&self.original_name())
    }

    /// Path and untransformed name joined by `/`.
    pub fn full_untransformed_name(&self) -> String {
        self.join_path(&self.untransformed_name)
    }

    fn join_path(&self, leaf: &str) -> String {
        self.path
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(leaf))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Copy with the transform replaced (or removed with `None`).
    ///
    /// The transform is taken verbatim. A transform whose rendering re-parses
    /// differently (an untransformed name containing `_`, for instance) is not
    /// rejected here.
    pub fn replace_transform(&self, transform_name: Option<&str>) -> Self {
        Self {
            path: self.path.clone(),
            transform_name: transform_name.map(str::to_string),
            untransformed_name: self.untransformed_name.clone(),
        }
    }

    /// Whether the full original name parses back into these parts.
    ///
    /// Fails for a transformed name whose untransformed part contains `_`
    /// followed by another character: `__log_my_var` reads as transform
    /// `log_my` and name `var`.
    pub fn round_trips(&self) -> bool {
        Self::from_name(&self.full_original_name()).is_ok_and(|reparsed| reparsed == *self)
    }
}

impl fmt::Display for NameParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_original_name())
    }
}

impl FromStr for NameParts {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl TryFrom<String> for NameParts {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_name(&value)
    }
}

impl From<NameParts> for String {
    fn from(value: NameParts) -> Self {
        value.full_original_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decompose(name: &str) -> Option<(Option<String>, String)> {
        NameParts::from_name(name)
            .ok()
            .map(|p| (p.transform_name().map(str::to_string), p.untransformed_name().to_string()))
    }

    #[test]
    fn plain_name_is_untransformed() {
        assert!(NameParts::is_valid_untransformed_name("sayam"));
        assert!(NameParts::is_valid_name("sayam"));
        assert_eq!(decompose("sayam"), Some((None, "sayam".to_string())));
    }

    #[test]
    fn transformed_name_is_not_untransformed() {
        assert!(!NameParts::is_valid_untransformed_name("__tiger_inzoo"));
        assert!(NameParts::is_valid_name("__tiger_inzoo"));
        assert_eq!(
            decompose("__tiger_inzoo"),
            Some((Some("tiger".to_string()), "inzoo".to_string()))
        );
    }

    #[test]
    fn leading_single_underscore_rejected() {
        assert!(!NameParts::is_valid_name("_tiger"));
        assert!(!NameParts::is_valid_untransformed_name("_tiger"));
    }

    #[test]
    fn transform_group_is_greedy() {
        assert_eq!(
            decompose("__tiger_in_zoo"),
            Some((Some("tiger_in".to_string()), "zoo".to_string()))
        );
        assert_eq!(
            decompose("__going_to_the_market"),
            Some((Some("going_to_the".to_string()), "market".to_string()))
        );
    }

    #[test]
    fn double_underscore_inside_transform() {
        assert_eq!(
            decompose("__going__to_the_market"),
            Some((Some("going__to_the".to_string()), "market".to_string()))
        );
    }

    #[test]
    fn degenerate_names_rejected() {
        for name in ["", "_", "__", "___", "____", "__x", "__t_", "__t__"] {
            assert!(!NameParts::is_valid_name(name), "{name:?} should be invalid");
        }
    }

    #[test]
    fn newline_not_part_of_name() {
        assert!(!NameParts::is_valid_name("a\nb"));
    }

    #[test]
    fn from_name_splits_path() {
        let parts = NameParts::from_name("outer/inner/__log_scale").unwrap();
        assert_eq!(parts.path(), ["outer", "inner"]);
        assert_eq!(parts.transform_name(), Some("log"));
        assert_eq!(parts.untransformed_name(), "scale");
        assert_eq!(parts.original_name(), "__log_scale");
        assert_eq!(parts.full_original_name(), "outer/inner/__log_scale");
        assert_eq!(parts.full_untransformed_name(), "outer/inner/scale");
    }

    #[test]
    fn from_name_whole_string_checked_first() {
        assert_eq!(
            NameParts::from_name("_outer/x"),
            Err(NameError::InvalidName("_outer/x".to_string()))
        );
    }

    #[test]
    fn from_name_reports_segment_mismatch() {
        assert_eq!(
            NameParts::from_name("outer/_x"),
            Err(NameError::SegmentMismatch {
                name: "outer/_x".to_string(),
                segment: "_x".to_string(),
            })
        );
        assert!(matches!(
            NameParts::from_name("outer/"),
            Err(NameError::SegmentMismatch { .. })
        ));
    }

    #[test]
    fn transform_in_first_segment_is_path() {
        // The transform group cannot cross `/`, so the prefix stays in the path.
        let parts = NameParts::from_name("__t_a/b").unwrap();
        assert_eq!(parts.path(), ["__t_a"]);
        assert_eq!(parts.transform_name(), None);
        assert_eq!(parts.untransformed_name(), "b");
    }

    #[test]
    fn empty_path_segments_kept() {
        let parts = NameParts::from_name("a//b").unwrap();
        assert_eq!(parts.path(), ["a", ""]);
        assert_eq!(parts.full_original_name(), "a//b");
    }

    #[test]
    fn replace_transform_keeps_path_and_name() {
        let parts = NameParts::from_name("model/__log_sigma").unwrap();

        let exp = parts.replace_transform(Some("exp"));
        assert_eq!(exp.full_original_name(), "model/__exp_sigma");
        assert_eq!(exp.path(), parts.path());
        assert_eq!(exp.untransformed_name(), "sigma");

        let plain = parts.replace_transform(None);
        assert!(!plain.is_transformed());
        assert_eq!(plain.to_string(), "model/sigma");
    }

    #[test]
    fn round_trips_detects_greedy_transform() {
        let parts = NameParts::from_name("model/__log_sigma").unwrap();
        assert!(parts.round_trips());
        assert!(parts.replace_transform(None).round_trips());

        let plain = NameParts::from_name("model/my_var").unwrap();
        assert!(plain.round_trips());
        assert!(!plain.replace_transform(Some("log")).round_trips());

        // A trailing underscore leaves nothing for the transform to absorb.
        let trailing = NameParts::from_name("a_").unwrap();
        assert!(trailing.replace_transform(Some("t")).round_trips());
    }

    #[test]
    fn new_validates_components() {
        let parts = NameParts::new(["a", "b"], Some("log"), "x").unwrap();
        assert_eq!(parts.full_original_name(), "a/b/__log_x");

        assert_eq!(
            NameParts::new(Vec::<String>::new(), None, "_x"),
            Err(NameError::InvalidUntransformedName("_x".to_string()))
        );
        assert_eq!(
            NameParts::new(Vec::<String>::new(), Some(""), "x"),
            Err(NameError::InvalidTransform(String::new()))
        );
        assert_eq!(
            NameParts::new(Vec::<String>::new(), Some("a/b"), "x"),
            Err(NameError::InvalidTransform("a/b".to_string()))
        );
    }

    #[test]
    fn error_messages_are_distinct() {
        let general = NameError::InvalidName("_x".to_string()).to_string();
        let untransformed = NameError::InvalidUntransformedName("_x".to_string()).to_string();
        assert_ne!(general, untransformed);
        assert!(general.contains("`__transform_name` or `name`"));
        assert!(untransformed.contains("without leading underscore"));
        assert!(untransformed.contains("`_x`"));
    }

    #[test]
    fn error_input_is_offending_name() {
        let err = NameParts::from_name("outer/_x").unwrap_err();
        assert_eq!(err.input(), "outer/_x");
    }

    #[test]
    fn serde_uses_full_name() {
        let parts = NameParts::from_name("m/__log_s").unwrap();
        let json = serde_json::to_string(&parts).unwrap();
        assert_eq!(json, "\"m/__log_s\"");

        let back: NameParts = serde_json::from_str(&json).unwrap();
        assert_eq!(back, parts);

        assert!(serde_json::from_str::<NameParts>("\"_bad\"").is_err());
    }

    #[test]
    fn from_str_parses() {
        let parts: NameParts = "x".parse().unwrap();
        assert_eq!(parts.untransformed_name(), "x");
    }
}
