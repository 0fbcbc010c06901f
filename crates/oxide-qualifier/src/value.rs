//! Dynamic values compared by predicates and bound as SQL parameters.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::schema::LogicalType;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// A value held by a predicate, read from an object, or bound to SQL.
///
/// `Null` doubles as the null sentinel: a missing relationship, a JSON
/// `null` and a SQL NULL all become `Value::Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Date and time without a zone.
    DateTime(NaiveDateTime),
    /// Binary value.
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns true for `Value::Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns a short name of the variant, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::DateTime(_) => "datetime",
            Self::Bytes(_) => "bytes",
        }
    }

    /// Returns the logical type a value of this variant binds as.
    #[must_use]
    pub const fn logical_type(&self) -> Option<LogicalType> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(LogicalType::Boolean),
            Self::Int(_) => Some(LogicalType::Int64),
            Self::Float(_) => Some(LogicalType::Double),
            Self::Text(_) => Some(LogicalType::String),
            Self::DateTime(_) => Some(LogicalType::DateTime),
            Self::Bytes(_) => Some(LogicalType::Bytes),
        }
    }

    /// Converts `self` to the variant of `target`.
    ///
    /// Returns `self` borrowed when the variants already agree, an owned
    /// converted value when a conversion exists, and `None` otherwise. Null
    /// never converts and nothing converts to null. The receiver is never
    /// modified, so a predicate can be evaluated concurrently against
    /// differently typed values.
    #[must_use]
    pub fn coerce_to(&self, target: &Self) -> Option<Cow<'_, Self>> {
        if std::mem::discriminant(self) == std::mem::discriminant(target) {
            return Some(Cow::Borrowed(self));
        }
        let converted = match (self, target) {
            (Self::Null, _) | (_, Self::Null) => None,
            (Self::Float(f), Self::Int(_)) => float_to_int(*f).map(Self::Int),
            (Self::Text(s), Self::Int(_)) => s.trim().parse().ok().map(Self::Int),
            (Self::Bool(b), Self::Int(_)) => Some(Self::Int(i64::from(*b))),
            #[allow(clippy::cast_precision_loss)]
            (Self::Int(i), Self::Float(_)) => Some(Self::Float(*i as f64)),
            (Self::Text(s), Self::Float(_)) => s.trim().parse().ok().map(Self::Float),
            (Self::Text(s), Self::Bool(_)) => parse_bool(s).map(Self::Bool),
            (Self::Int(0), Self::Bool(_)) => Some(Self::Bool(false)),
            (Self::Int(1), Self::Bool(_)) => Some(Self::Bool(true)),
            (Self::Text(s), Self::DateTime(_)) => parse_date_time(s).map(Self::DateTime),
            (Self::Text(s), Self::Bytes(_)) => Some(Self::Bytes(s.as_bytes().to_vec())),
            (Self::Bool(_) | Self::Int(_) | Self::Float(_) | Self::DateTime(_), Self::Text(_)) => {
                Some(Self::Text(self.to_string()))
            }
            _ => None,
        };
        converted.map(Cow::Owned)
    }

    /// Three-way comparison between values of the same variant.
    ///
    /// Returns `None` for mismatched variants, nulls and NaN.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::Bytes(a), Self::Bytes(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Numeric comparison across integers and floats.
    ///
    /// Mixed pairs compare exactly, without rounding the integer to a float.
    /// Returns `None` when either side is not a number, and for NaN.
    #[must_use]
    pub fn numeric_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => int_float_cmp(*a, *b),
            (Self::Float(a), Self::Int(b)) => int_float_cmp(*b, *a).map(Ordering::reverse),
            _ => None,
        }
    }

    /// Total order used for in-memory sorting: nulls first, numbers compared
    /// across integer and float, and otherwise variants grouped by kind.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Float(b)) => {
                int_float_cmp(*a, *b).unwrap_or_else(|| (*a as f64).total_cmp(b))
            }
            (Self::Float(a), Self::Int(b)) => int_float_cmp(*b, *a)
                .map_or_else(|| a.total_cmp(&(*b as f64)), Ordering::reverse),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            _ => self
                .compare(other)
                .unwrap_or_else(|| self.rank().cmp(&other.rank())),
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Float(_) => 2,
            Self::Text(_) => 3,
            Self::DateTime(_) => 4,
            Self::Bytes(_) => 5,
        }
    }

    /// Converts a JSON scalar. Arrays and objects are rendered as text.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| n.as_f64().map_or(Self::Null, Self::Float), Self::Int),
            serde_json::Value::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }

    /// Converts quoted text to the variant a column of `logical_type`
    /// holds, so `'8.5'` binds as a float against a double column.
    ///
    /// Values that are not text, text that does not parse, and columns of
    /// textual or unknown type are returned unchanged.
    #[must_use]
    pub fn into_column_type(self, logical_type: &LogicalType) -> Self {
        if !matches!(self, Self::Text(_)) {
            return self;
        }
        let target = match logical_type {
            LogicalType::Boolean => Self::Bool(false),
            LogicalType::Int16 | LogicalType::Int32 | LogicalType::Int64 => Self::Int(0),
            LogicalType::Double | LogicalType::Decimal => Self::Float(0.0),
            LogicalType::DateTime => Self::DateTime(NaiveDateTime::default()),
            _ => return self,
        };
        let converted = self.coerce_to(&target).map(Cow::into_owned);
        converted.unwrap_or(self)
    }

    /// Renders the value as a qualifier-format literal.
    ///
    /// Values with no literal syntax of their own (floats, negative
    /// integers, dates, bytes) are written as quoted text, so parsing the
    /// output yields a text value. Predicates coerce it back when evaluated,
    /// and the SQL compilers convert it to the column's type when the table
    /// metadata has one; against an undescribed column it binds as text.
    #[must_use]
    pub fn to_literal(&self) -> String {
        match self {
            Self::Null => String::from("null"),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) if *i >= 0 => i.to_string(),
            Self::Text(s) => quote_literal(s),
            other => quote_literal(&other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Self::Bytes(bytes) => {
                for byte in bytes {
                    write!(f, "{byte:02X}")?;
                }
                Ok(())
            }
        }
    }
}

fn quote_literal(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// 2^63, the first float past `i64::MAX`. `i64::MAX as f64` rounds up to it.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

#[allow(clippy::cast_possible_truncation)]
fn float_to_int(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f)).then_some(f as i64)
}

#[allow(clippy::cast_possible_truncation)]
fn int_float_cmp(i: i64, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    if f >= I64_BOUND {
        return Some(Ordering::Less);
    }
    if f < -I64_BOUND {
        return Some(Ordering::Greater);
    }
    let whole = f.trunc() as i64;
    Some(i.cmp(&whole).then_with(|| {
        0.0_f64
            .partial_cmp(&f.fract())
            .unwrap_or(Ordering::Equal)
    }))
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim() {
        t if t.eq_ignore_ascii_case("true") => Some(true),
        t if t.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Trait for types that can be read as a [`Value`].
///
/// Implemented for the scalar field types `#[derive(Members)]` exposes.
pub trait ToValue {
    /// Converts the value to a `Value`.
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! int_to_value {
    ($($t:ty),*) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value {
                    Value::Int(i64::from(*self))
                }
            }
        )*
    };
}

int_to_value!(i8, i16, i32, i64, u8, u16, u32);

impl ToValue for u64 {
    #[allow(clippy::cast_precision_loss)]
    fn to_value(&self) -> Value {
        i64::try_from(*self).map_or(Value::Float(*self as f64), Value::Int)
    }
}

impl ToValue for usize {
    #[allow(clippy::cast_precision_loss)]
    fn to_value(&self) -> Value {
        i64::try_from(*self).map_or(Value::Float(*self as f64), Value::Int)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Text(String::from(self))
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl ToValue for NaiveDateTime {
    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }
}

impl ToValue for NaiveDate {
    fn to_value(&self) -> Value {
        self.and_hms_opt(0, 0, 0).map_or(Value::Null, Value::DateTime)
    }
}

impl ToValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, ToValue::to_value)
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(String::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_coerce_same_variant_borrows() {
        let value = Value::from("abc");
        assert!(matches!(
            value.coerce_to(&Value::from("x")),
            Some(Cow::Borrowed(_))
        ));
    }

    #[test]
    fn test_coerce_numbers() {
        assert_eq!(
            Value::Int(3).coerce_to(&Value::Float(0.0)).unwrap().into_owned(),
            Value::Float(3.0)
        );
        assert_eq!(
            Value::Float(4.0).coerce_to(&Value::Int(0)).unwrap().into_owned(),
            Value::Int(4)
        );
        assert!(Value::Float(4.5).coerce_to(&Value::Int(0)).is_none());
        assert_eq!(
            Value::from(" 1977 ").coerce_to(&Value::Int(0)).unwrap().into_owned(),
            Value::Int(1977)
        );
    }

    #[test]
    fn test_coerce_float_outside_i64_range() {
        assert!(Value::Float(I64_BOUND).coerce_to(&Value::Int(0)).is_none());
        assert_eq!(
            Value::Float(-I64_BOUND).coerce_to(&Value::Int(0)).unwrap().into_owned(),
            Value::Int(i64::MIN)
        );
    }

    #[test]
    fn test_numeric_cmp_mixed() {
        assert_eq!(
            Value::Int(2).numeric_cmp(&Value::Float(2.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Float(-2.5).numeric_cmp(&Value::Int(-2)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Int(2).numeric_cmp(&Value::Float(2.0)),
            Some(Ordering::Equal)
        );
        assert_eq!(
            Value::Int(i64::MAX).numeric_cmp(&Value::Float(I64_BOUND)),
            Some(Ordering::Less)
        );
        assert_eq!(Value::Int(1).numeric_cmp(&Value::Float(f64::NAN)), None);
        assert_eq!(Value::Int(1).numeric_cmp(&Value::from("1")), None);
    }

    #[test]
    fn test_into_column_type() {
        assert_eq!(
            Value::from("8.5").into_column_type(&LogicalType::Double),
            Value::Float(8.5)
        );
        assert_eq!(
            Value::from("1977").into_column_type(&LogicalType::Int32),
            Value::Int(1977)
        );
        assert_eq!(
            Value::from("1977.5").into_column_type(&LogicalType::Int32),
            Value::from("1977.5")
        );
        assert_eq!(
            Value::from("8.5").into_column_type(&LogicalType::String),
            Value::from("8.5")
        );
        assert_eq!(
            Value::Int(3).into_column_type(&LogicalType::Double),
            Value::Int(3)
        );
    }

    #[test]
    fn test_coerce_text_to_date_time() {
        let target = Value::DateTime(date(2000, 1, 1));
        assert_eq!(
            Value::from("1977-05-25").coerce_to(&target).unwrap().into_owned(),
            Value::DateTime(date(1977, 5, 25))
        );
        assert!(Value::from("yesterday").coerce_to(&target).is_none());
    }

    #[test]
    fn test_coerce_null_never_converts() {
        assert!(Value::Null.coerce_to(&Value::Int(1)).is_none());
        assert!(Value::Int(1).coerce_to(&Value::Null).is_none());
    }

    #[test]
    fn test_compare_rejects_mixed_variants() {
        assert_eq!(Value::Int(1).compare(&Value::Int(2)), Some(Ordering::Less));
        assert_eq!(Value::Int(1).compare(&Value::from("1")), None);
        assert_eq!(Value::Null.compare(&Value::Null), None);
    }

    #[test]
    fn test_sort_cmp_nulls_first_and_mixed_numbers() {
        assert_eq!(Value::Null.sort_cmp(&Value::Int(0)), Ordering::Less);
        assert_eq!(Value::Int(2).sort_cmp(&Value::Float(1.5)), Ordering::Greater);
        assert_eq!(Value::from("b").sort_cmp(&Value::from("a")), Ordering::Greater);
    }

    #[test]
    fn test_to_literal() {
        assert_eq!(Value::Null.to_literal(), "null");
        assert_eq!(Value::Bool(true).to_literal(), "true");
        assert_eq!(Value::Int(42).to_literal(), "42");
        assert_eq!(Value::Int(-3).to_literal(), "'-3'");
        assert_eq!(Value::from("it's").to_literal(), "'it\\'s'");
        assert_eq!(Value::Float(2.5).to_literal(), "'2.5'");
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from_json(&serde_json::json!(7)), Value::Int(7));
        assert_eq!(Value::from_json(&serde_json::json!(1.5)), Value::Float(1.5));
        assert_eq!(Value::from_json(&serde_json::json!(null)), Value::Null);
        assert_eq!(Value::from_json(&serde_json::json!("x")), Value::from("x"));
    }

    #[test]
    fn test_to_value_conversions() {
        assert_eq!(true.to_value(), Value::Bool(true));
        assert_eq!(42_i32.to_value(), Value::Int(42));
        assert_eq!("hello".to_value(), Value::from("hello"));
        assert_eq!(None::<i32>.to_value(), Value::Null);
        assert_eq!(Some(String::from("x")).to_value(), Value::from("x"));
        assert_eq!(u64::MAX.to_value(), Value::Float(u64::MAX as f64));
    }
}
