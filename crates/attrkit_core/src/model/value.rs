//! Native value representations stored in attribute slots.
//!
//! # Responsibility
//! - Define the closed set of representations an attribute can hold.
//! - Expose the representation kind used by type validation.
//! - Coerce 7-part component arrays into timestamps.
//!
//! # Invariants
//! - "Absent" is modeled as `Option::<Value>::None`, never as a variant.
//! - `Value::kind()` is total: every value maps to exactly one `ValueKind`.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Number of components accepted by timestamp coercion.
pub const TIMESTAMP_COMPONENTS: usize = 7;

/// One attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Timestamp(DateTime<FixedOffset>),
    Hash(BTreeMap<String, Value>),
    Array(Vec<Value>),
    Boolean(bool),
}

/// Representation discriminant of a `Value`.
///
/// Booleans split into `True` and `False` so a type tag can list both
/// representations explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Text,
    Integer,
    Float,
    Timestamp,
    Hash,
    Array,
    True,
    False,
}

impl ValueKind {
    /// Stable lowercase name used in error messages and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Timestamp => "timestamp",
            Self::Hash => "hash",
            Self::Array => "array",
            Self::True => "true",
            Self::False => "false",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Returns the representation kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::Timestamp(_) => ValueKind::Timestamp,
            Self::Hash(_) => ValueKind::Hash,
            Self::Array(_) => ValueKind::Array,
            Self::Boolean(true) => ValueKind::True,
            Self::Boolean(false) => ValueKind::False,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Self::Timestamp(value) => Some(value),
            _ => None,
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Float(_))
    }
}

/// Builds a timestamp from `[year, month, day, hour, minute, second, utc_offset]`.
///
/// Every component must be numeric. `second` may carry a fractional part,
/// which is kept as nanoseconds; the other components must be whole numbers.
/// `utc_offset` is expressed in seconds east of UTC.
///
/// Returns `None` when the slice is not 7 numbers or the numbers do not form
/// a valid local time at that offset.
pub fn timestamp_from_components(parts: &[Value]) -> Option<DateTime<FixedOffset>> {
    if parts.len() != TIMESTAMP_COMPONENTS || !parts.iter().all(Value::is_numeric) {
        return None;
    }

    let year = i32::try_from(whole_number(&parts[0])?).ok()?;
    let month = u32::try_from(whole_number(&parts[1])?).ok()?;
    let day = u32::try_from(whole_number(&parts[2])?).ok()?;
    let hour = u32::try_from(whole_number(&parts[3])?).ok()?;
    let minute = u32::try_from(whole_number(&parts[4])?).ok()?;
    let (second, nanos) = split_seconds(&parts[5])?;
    let offset_secs = i32::try_from(whole_number(&parts[6])?).ok()?;

    let offset = FixedOffset::east_opt(offset_secs)?;
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_nano_opt(
        hour, minute, second, nanos,
    )?;
    offset.from_local_datetime(&naive).single()
}

fn whole_number(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(number) => Some(*number),
        Value::Float(number) if number.is_finite() && number.fract() == 0.0 => {
            Some(*number as i64)
        }
        _ => None,
    }
}

fn split_seconds(value: &Value) -> Option<(u32, u32)> {
    match value {
        Value::Integer(number) => Some((u32::try_from(*number).ok()?, 0)),
        Value::Float(number) if number.is_finite() && *number >= 0.0 => {
            let whole = number.trunc();
            // Clamped so sub-nanosecond remainders never carry into the next second.
            let nanos = ((number - whole) * 1_000_000_000.0)
                .round()
                .min(999_999_999.0) as u32;
            Some((whole as u32, nanos))
        }
        _ => None,
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value.fixed_offset())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Self::Hash(value)
    }
}
