//! Attribute values carried by features.

use std::{collections::BTreeMap, fmt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Property mapping of a feature, keyed by field name.
pub type Properties = BTreeMap<String, PropertyValue>;

/// Calendar date as stored in a dBASE `D` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalendarDate {
    /// Four-digit year.
    pub year: u32,
    /// Month in `1..=12`.
    pub month: u32,
    /// Day of month in `1..=31`.
    pub day: u32,
}

impl CalendarDate {
    /// Construct a date from its parts.
    #[must_use]
    pub const fn new(year: u32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A scalar attribute value.
///
/// # Examples
/// ```
/// use netshape_core::PropertyValue;
///
/// let stored = PropertyValue::Number(3.0);
/// assert!(stored.matches(&PropertyValue::Integer(3)));
/// assert!(!stored.matches(&PropertyValue::from("3")));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum PropertyValue {
    /// Absent value.
    Null,
    /// Logical value.
    Bool(bool),
    /// Whole number.
    Integer(i64),
    /// Floating-point number.
    Number(f64),
    /// Character data.
    Text(String),
    /// Calendar date.
    Date(CalendarDate),
}

impl PropertyValue {
    /// Compare two values under their semantic type.
    ///
    /// Numbers compare by value whether stored as [`Self::Integer`] or
    /// [`Self::Number`]. Every other variant only matches its own kind, and
    /// [`Self::Null`] only matches `Null`.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(left), Self::Integer(right)) => left == right,
            (Self::Integer(whole), Self::Number(number))
            | (Self::Number(number), Self::Integer(whole)) => integer_equals(*whole, *number),
            (Self::Number(left), Self::Number(right)) => left == right,
            (Self::Text(left), Self::Text(right)) => left == right,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Date(left), Self::Date(right)) => left == right,
            (Self::Null, Self::Null) => true,
            _ => false,
        }
    }

    /// Short name of the value's kind, used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
        }
    }

    /// Whether the value is [`Self::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

#[expect(
    clippy::cast_precision_loss,
    clippy::float_cmp,
    reason = "integers are compared in the float domain they were stored in"
)]
fn integer_equals(whole: i64, number: f64) -> bool {
    number.fract() == 0.0 && whole as f64 == number
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Date(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<CalendarDate> for PropertyValue {
    fn from(value: CalendarDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PropertyValue::Integer(4), PropertyValue::Number(4.0), true)]
    #[case(PropertyValue::Number(4.5), PropertyValue::Integer(4), false)]
    #[case(PropertyValue::from("red"), PropertyValue::from("red"), true)]
    #[case(PropertyValue::from("4"), PropertyValue::Integer(4), false)]
    #[case(PropertyValue::Null, PropertyValue::Null, true)]
    #[case(PropertyValue::Null, PropertyValue::from(""), false)]
    #[case(PropertyValue::Bool(true), PropertyValue::Integer(1), false)]
    fn semantic_equality(
        #[case] left: PropertyValue,
        #[case] right: PropertyValue,
        #[case] expected: bool,
    ) {
        assert_eq!(left.matches(&right), expected);
        assert_eq!(right.matches(&left), expected, "matching is symmetric");
    }

    #[rstest]
    fn nan_never_matches() {
        let nan = PropertyValue::Number(f64::NAN);
        assert!(!nan.matches(&nan));
    }

    #[rstest]
    fn dates_format_as_iso() {
        assert_eq!(CalendarDate::new(2018, 3, 7).to_string(), "2018-03-07");
    }

    #[rstest]
    fn optional_values_map_to_null() {
        let missing: Option<i64> = None;
        assert_eq!(PropertyValue::from(missing), PropertyValue::Null);
        assert_eq!(PropertyValue::from(Some(2_i64)), PropertyValue::Integer(2));
    }
}
