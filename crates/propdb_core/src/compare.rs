//! Comparator library for index scans.
//!
//! Queries walk the distinct indexed values of one property and keep those
//! accepted by a [`Predicate`]. The fixed comparators live in [`Comparison`];
//! arbitrary caller-supplied tests go through [`FnPredicate`].

use crate::error::{CoreError, CoreResult};
use propdb_codec::Value;
use regex::RegexBuilder;
use std::cmp::Ordering;

/// A binary test applied to `(stored value, query target)` pairs.
pub trait Predicate {
    /// Tests a stored index value against the query target.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Query`] for invalid comparator input, e.g. a
    /// malformed pattern or an unorderable operand pair.
    fn test(&self, stored: &Value, target: &Value) -> CoreResult<bool>;
}

/// The fixed, stateless comparator table.
///
/// Six ordering/equality predicates plus a case-insensitive pattern match.
/// Equality comparators are total; ordering comparators are defined only for
/// two scalars of the same kind and fail with a query error otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Equality test.
    Eq,
    /// Inequality test.
    Ne,
    /// Greater-than test.
    Gt,
    /// Greater-than-or-equal test.
    Ge,
    /// Less-than test.
    Lt,
    /// Less-than-or-equal test.
    Le,
    /// Case-insensitive pattern match, anchored at the start of the stored
    /// text. The query target supplies the pattern.
    Matches,
}

impl Comparison {
    /// Looks up a comparator by its short name.
    ///
    /// Recognized names: `eq`, `ne`, `gt`, `ge`, `lt`, `le`, `rx`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "gt" => Some(Self::Gt),
            "ge" => Some(Self::Ge),
            "lt" => Some(Self::Lt),
            "le" => Some(Self::Le),
            "rx" => Some(Self::Matches),
            _ => None,
        }
    }

    /// Returns the short name of this comparator.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Matches => "rx",
        }
    }

    fn order(stored: &Value, target: &Value) -> CoreResult<Ordering> {
        stored.partial_cmp_value(target).ok_or_else(|| {
            CoreError::query(format!(
                "values {stored:?} and {target:?} have no defined order"
            ))
        })
    }

    fn matches(stored: &Value, target: &Value) -> CoreResult<bool> {
        let Some(pattern) = target.as_text() else {
            return Err(CoreError::query(format!(
                "pattern must be text, got {target:?}"
            )));
        };
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| CoreError::query(format!("invalid pattern {pattern:?}: {e}")))?;

        // Non-text stored values simply never match.
        let Some(text) = stored.as_text() else {
            return Ok(false);
        };
        // Anchored at the start: a leftmost match not at offset 0 means no
        // match starts at 0.
        Ok(regex.find(text).is_some_and(|m| m.start() == 0))
    }
}

impl Predicate for Comparison {
    fn test(&self, stored: &Value, target: &Value) -> CoreResult<bool> {
        match self {
            Self::Eq => Ok(stored == target),
            Self::Ne => Ok(stored != target),
            Self::Gt => Ok(Self::order(stored, target)? == Ordering::Greater),
            Self::Ge => Ok(Self::order(stored, target)? != Ordering::Less),
            Self::Lt => Ok(Self::order(stored, target)? == Ordering::Less),
            Self::Le => Ok(Self::order(stored, target)? != Ordering::Greater),
            Self::Matches => Self::matches(stored, target),
        }
    }
}

/// Adapts a caller-supplied comparison closure into a [`Predicate`].
///
/// ```
/// use propdb_core::{CoreResult, FnPredicate, Value};
///
/// let near = FnPredicate(|stored: &Value, target: &Value| -> CoreResult<bool> {
///     Ok(stored
///         .as_integer()
///         .zip(target.as_integer())
///         .is_some_and(|(a, b)| (a - b).abs() <= 1))
/// });
/// ```
pub struct FnPredicate<F>(pub F);

impl<F> Predicate for FnPredicate<F>
where
    F: Fn(&Value, &Value) -> CoreResult<bool>,
{
    fn test(&self, stored: &Value, target: &Value) -> CoreResult<bool> {
        (self.0)(stored, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_total_across_types() {
        let a = Value::Integer(1);
        let b = Value::Text("1".into());

        assert!(!Comparison::Eq.test(&a, &b).unwrap());
        assert!(Comparison::Ne.test(&a, &b).unwrap());
        assert!(Comparison::Eq.test(&a, &Value::Integer(1)).unwrap());
    }

    #[test]
    fn integer_ordering() {
        let lo = Value::Integer(10);
        let hi = Value::Integer(20);

        assert!(Comparison::Lt.test(&lo, &hi).unwrap());
        assert!(Comparison::Le.test(&lo, &hi).unwrap());
        assert!(Comparison::Le.test(&lo, &lo).unwrap());
        assert!(Comparison::Gt.test(&hi, &lo).unwrap());
        assert!(Comparison::Ge.test(&hi, &hi).unwrap());
        assert!(!Comparison::Gt.test(&lo, &hi).unwrap());
    }

    #[test]
    fn text_ordering_is_lexicographic() {
        let a = Value::from("apple");
        let b = Value::from("banana");
        assert!(Comparison::Lt.test(&a, &b).unwrap());
    }

    #[test]
    fn cross_type_ordering_is_a_query_error() {
        let result = Comparison::Gt.test(&Value::Integer(1), &Value::from("1"));
        assert!(matches!(result, Err(CoreError::Query { .. })));
    }

    #[test]
    fn pattern_match_is_case_insensitive() {
        let stored = Value::from("Alice");
        assert!(Comparison::Matches.test(&stored, &Value::from("al")).unwrap());
        assert!(Comparison::Matches
            .test(&stored, &Value::from("a.*e"))
            .unwrap());
    }

    #[test]
    fn pattern_match_is_anchored_at_start() {
        let stored = Value::from("alice");
        assert!(!Comparison::Matches
            .test(&stored, &Value::from("lice"))
            .unwrap());
    }

    #[test]
    fn pattern_match_skips_non_text_values() {
        assert!(!Comparison::Matches
            .test(&Value::Integer(42), &Value::from("4"))
            .unwrap());
    }

    #[test]
    fn malformed_pattern_is_a_query_error() {
        let result = Comparison::Matches.test(&Value::from("x"), &Value::from("("));
        assert!(matches!(result, Err(CoreError::Query { .. })));
    }

    #[test]
    fn non_text_pattern_is_a_query_error() {
        let result = Comparison::Matches.test(&Value::from("x"), &Value::Integer(1));
        assert!(matches!(result, Err(CoreError::Query { .. })));
    }

    #[test]
    fn name_table_roundtrip() {
        for cmp in [
            Comparison::Eq,
            Comparison::Ne,
            Comparison::Gt,
            Comparison::Ge,
            Comparison::Lt,
            Comparison::Le,
            Comparison::Matches,
        ] {
            assert_eq!(Comparison::from_name(cmp.name()), Some(cmp));
        }
        assert_eq!(Comparison::from_name("between"), None);
    }

    #[test]
    fn custom_closure_predicate() {
        let near = FnPredicate(|stored: &Value, target: &Value| {
            Ok(stored
                .as_integer()
                .zip(target.as_integer())
                .is_some_and(|(a, b)| (a - b).abs() <= 1))
        });

        assert!(near.test(&Value::Integer(29), &Value::Integer(30)).unwrap());
        assert!(!near.test(&Value::Integer(28), &Value::Integer(30)).unwrap());
    }
}
