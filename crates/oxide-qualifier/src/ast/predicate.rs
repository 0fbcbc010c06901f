//! Comparison predicates.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::EvaluationError;
use crate::value::Value;

/// The comparison a predicate performs.
///
/// The set is closed: the lexer maps operator text to a kind through
/// [`PredicateKind::from_symbol`] and the SQL compilers render each kind
/// through [`PredicateKind::sql_operator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateKind {
    Equals,
    NotEqual,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
    Like,
}

impl PredicateKind {
    /// Every predicate kind, in operator-table order.
    pub const ALL: [Self; 7] = [
        Self::Equals,
        Self::NotEqual,
        Self::LessThan,
        Self::GreaterThan,
        Self::LessOrEqual,
        Self::GreaterOrEqual,
        Self::Like,
    ];

    /// Returns the qualifier-format operator text.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
            Self::Like => "like",
        }
    }

    /// Looks up the kind for an operator text (`like` in any case).
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.symbol().eq_ignore_ascii_case(symbol))
    }

    /// Returns the SQL operator.
    #[must_use]
    pub const fn sql_operator(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEqual => "<>",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
            Self::Like => "LIKE",
        }
    }

    /// Sign test applied to `subject.cmp(comparison_value)`.
    const fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Equals => matches!(ordering, Ordering::Equal),
            Self::NotEqual => !matches!(ordering, Ordering::Equal),
            Self::LessThan => matches!(ordering, Ordering::Less),
            Self::GreaterThan => matches!(ordering, Ordering::Greater),
            Self::LessOrEqual => !matches!(ordering, Ordering::Greater),
            Self::GreaterOrEqual => !matches!(ordering, Ordering::Less),
            Self::Like => false,
        }
    }
}

impl fmt::Display for PredicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A comparison paired with the value it compares against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    kind: PredicateKind,
    value: Value,
}

impl Predicate {
    /// Creates a predicate.
    #[must_use]
    pub const fn new(kind: PredicateKind, value: Value) -> Self {
        Self { kind, value }
    }

    /// `= value`
    #[must_use]
    pub fn equals(value: impl Into<Value>) -> Self {
        Self::new(PredicateKind::Equals, value.into())
    }

    /// `!= value`
    #[must_use]
    pub fn not_equal(value: impl Into<Value>) -> Self {
        Self::new(PredicateKind::NotEqual, value.into())
    }

    /// `< value`
    #[must_use]
    pub fn less_than(value: impl Into<Value>) -> Self {
        Self::new(PredicateKind::LessThan, value.into())
    }

    /// `> value`
    #[must_use]
    pub fn greater_than(value: impl Into<Value>) -> Self {
        Self::new(PredicateKind::GreaterThan, value.into())
    }

    /// `<= value`
    #[must_use]
    pub fn less_or_equal(value: impl Into<Value>) -> Self {
        Self::new(PredicateKind::LessOrEqual, value.into())
    }

    /// `>= value`
    #[must_use]
    pub fn greater_or_equal(value: impl Into<Value>) -> Self {
        Self::new(PredicateKind::GreaterOrEqual, value.into())
    }

    /// `like pattern`
    #[must_use]
    pub fn like(pattern: impl Into<Value>) -> Self {
        Self::new(PredicateKind::Like, pattern.into())
    }

    /// Returns the comparison kind.
    #[must_use]
    pub const fn kind(&self) -> PredicateKind {
        self.kind
    }

    /// Returns the stored comparison value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Tests `subject` against this predicate.
    ///
    /// Integers and floats compare numerically with each other. Otherwise,
    /// when the stored value's type differs from the subject's, the stored
    /// value is coerced to the subject's type for this call only.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::NotAString`] when `like` is applied to a
    /// non-string subject and [`EvaluationError::NotComparable`] when a
    /// relational predicate meets values without an ordering.
    pub fn is_true_for(&self, subject: &Value) -> Result<bool, EvaluationError> {
        match self.kind {
            PredicateKind::Equals => Ok(self.equals_value(subject)),
            PredicateKind::NotEqual => Ok(!self.equals_value(subject)),
            PredicateKind::Like => self.like_value(subject),
            kind => self.compare_value(kind, subject),
        }
    }

    fn equals_value(&self, subject: &Value) -> bool {
        match (&self.value, subject) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            (stored, subject) => match subject.numeric_cmp(stored) {
                Some(ordering) => ordering.is_eq(),
                None => stored
                    .coerce_to(subject)
                    .is_some_and(|stored| stored.as_ref() == subject),
            },
        }
    }

    fn compare_value(&self, kind: PredicateKind, subject: &Value) -> Result<bool, EvaluationError> {
        if subject.is_null() || self.value.is_null() {
            return Ok(false);
        }
        let not_comparable = || EvaluationError::NotComparable {
            left: subject.type_name(),
            right: self.value.type_name(),
        };
        let ordering = match subject.numeric_cmp(&self.value) {
            Some(ordering) => ordering,
            None => {
                let stored = self.value.coerce_to(subject).ok_or_else(not_comparable)?;
                subject.compare(&stored).ok_or_else(not_comparable)?
            }
        };
        Ok(kind.accepts(ordering))
    }

    fn like_value(&self, subject: &Value) -> Result<bool, EvaluationError> {
        let text = match subject {
            Value::Null => return Ok(false),
            Value::Text(text) => text,
            other => {
                return Err(EvaluationError::NotAString {
                    type_name: other.type_name(),
                });
            }
        };
        let pattern: Cow<'_, str> = match &self.value {
            Value::Null => return Ok(false),
            Value::Text(pattern) => Cow::Borrowed(pattern),
            other => Cow::Owned(other.to_string()),
        };
        Ok(like_regex(&pattern)?.is_match(text))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.symbol(), self.value.to_literal())
    }
}

/// Builds a case-insensitive, fully anchored regex where `%` matches any
/// run of characters and everything else matches literally.
fn like_regex(pattern: &str) -> Result<Regex, EvaluationError> {
    let body: Vec<String> = pattern.split('%').map(regex::escape).collect();
    Regex::new(&format!("(?is)^{}$", body.join(".*"))).map_err(|e| {
        EvaluationError::InvalidPattern {
            pattern: String::from(pattern),
            message: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_symbol_dispatch() {
        for kind in PredicateKind::ALL {
            assert_eq!(PredicateKind::from_symbol(kind.symbol()), Some(kind));
        }
        assert_eq!(PredicateKind::from_symbol("LIKE"), Some(PredicateKind::Like));
        assert_eq!(PredicateKind::from_symbol("=="), None);
    }

    #[test]
    fn test_equals_with_coercion() {
        let predicate = Predicate::equals("1977");
        assert!(predicate.is_true_for(&Value::Int(1977)).unwrap());
        assert!(!predicate.is_true_for(&Value::Int(1978)).unwrap());
        assert!(predicate.is_true_for(&Value::from("1977")).unwrap());
        // The stored value is untouched by the coercion above.
        assert_eq!(predicate.value(), &Value::from("1977"));
    }

    #[test]
    fn test_equals_uncoercible_is_false() {
        let predicate = Predicate::equals("Star Wars");
        assert!(!predicate.is_true_for(&Value::Int(3)).unwrap());
    }

    #[test]
    fn test_equals_null() {
        let predicate = Predicate::equals(Value::Null);
        assert!(predicate.is_true_for(&Value::Null).unwrap());
        assert!(!predicate.is_true_for(&Value::from("x")).unwrap());
        assert!(Predicate::not_equal(Value::Null)
            .is_true_for(&Value::from("x"))
            .unwrap());
    }

    #[test]
    fn test_relational_sign_tests() {
        let subject = Value::Int(1977);
        assert!(Predicate::greater_than(1970).is_true_for(&subject).unwrap());
        assert!(!Predicate::greater_than(1977).is_true_for(&subject).unwrap());
        assert!(Predicate::greater_or_equal(1977).is_true_for(&subject).unwrap());
        assert!(Predicate::less_than(1980).is_true_for(&subject).unwrap());
        assert!(Predicate::less_or_equal(1977).is_true_for(&subject).unwrap());
        assert!(!Predicate::less_or_equal(1976).is_true_for(&subject).unwrap());
    }

    #[test]
    fn test_relational_int_against_float() {
        assert!(Predicate::greater_than(7)
            .is_true_for(&Value::Float(7.5))
            .unwrap());
    }

    #[test]
    fn test_relational_int_against_fractional_float() {
        assert_eq!(Predicate::less_than(2.5).is_true_for(&Value::Int(2)), Ok(true));
        assert_eq!(Predicate::greater_than(1976.5).is_true_for(&Value::Int(1977)), Ok(true));
        assert_eq!(Predicate::less_or_equal(1976.5).is_true_for(&Value::Int(1977)), Ok(false));
        assert_eq!(Predicate::greater_than(-0.5).is_true_for(&Value::Int(0)), Ok(true));
    }

    #[test]
    fn test_equals_int_against_float() {
        assert_eq!(Predicate::equals(2.0).is_true_for(&Value::Int(2)), Ok(true));
        assert_eq!(Predicate::equals(2.5).is_true_for(&Value::Int(2)), Ok(false));
        assert_eq!(Predicate::not_equal(2.5).is_true_for(&Value::Int(2)), Ok(true));
        assert_eq!(Predicate::equals(2).is_true_for(&Value::Float(2.0)), Ok(true));
    }

    #[test]
    fn test_equals_float_beyond_i64_range() {
        let predicate = Predicate::equals(Value::Float(9_223_372_036_854_775_808.0));
        assert_eq!(predicate.is_true_for(&Value::Int(i64::MAX)), Ok(false));
        assert_eq!(
            Predicate::less_than(Value::Float(9_223_372_036_854_775_808.0))
                .is_true_for(&Value::Int(i64::MAX)),
            Ok(true)
        );
    }

    #[test]
    fn test_relational_with_null_is_false() {
        assert!(!Predicate::less_than(5).is_true_for(&Value::Null).unwrap());
        assert!(!Predicate::less_than(Value::Null)
            .is_true_for(&Value::Int(1))
            .unwrap());
    }

    #[test]
    fn test_relational_not_comparable() {
        let err = Predicate::less_than("abc")
            .is_true_for(&Value::Int(3))
            .unwrap_err();
        assert_eq!(
            err,
            EvaluationError::NotComparable {
                left: "integer",
                right: "text"
            }
        );
    }

    #[test]
    fn test_like_wildcards_and_case() {
        let predicate = Predicate::like("george%");
        assert!(predicate.is_true_for(&Value::from("George Lucas")).unwrap());
        assert!(!predicate.is_true_for(&Value::from("Mr George")).unwrap());
        assert!(Predicate::like("%wars%")
            .is_true_for(&Value::from("Star Wars: A New Hope"))
            .unwrap());
        assert!(!Predicate::like("Star")
            .is_true_for(&Value::from("Star Wars"))
            .unwrap());
    }

    #[test]
    fn test_like_escapes_regex_metacharacters() {
        assert!(Predicate::like("a.c")
            .is_true_for(&Value::from("a.c"))
            .unwrap());
        assert!(!Predicate::like("a.c")
            .is_true_for(&Value::from("abc"))
            .unwrap());
    }

    #[test]
    fn test_like_rejects_non_strings() {
        assert_eq!(
            Predicate::like("1%").is_true_for(&Value::Int(10)),
            Err(EvaluationError::NotAString {
                type_name: "integer"
            })
        );
        assert!(!Predicate::like("x%").is_true_for(&Value::Null).unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(Predicate::equals("Star Wars").to_string(), "= 'Star Wars'");
        assert_eq!(Predicate::like("George%").to_string(), "like 'George%'");
        assert_eq!(Predicate::greater_or_equal(3).to_string(), ">= 3");
    }
}
