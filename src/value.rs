use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Dynamic cell value stored in a [`Series`](crate::Series) column.
///
/// [`Value::Null`] is the missing-value marker: it pads columns that received
/// no data and is passed through untouched by formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    Int(i64),
    Double(f64),
    Bool(bool),
    Str(String),
    Timestamp(NaiveDateTime),
    #[default]
    Null,
}

/// Enumerates the underlying type stored in a [`Value`].
///
/// Also used as the target type when re-typing a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Double,
    Bool,
    Str,
    Timestamp,
    Null,
}

impl Value {
    /// Returns the [`ValueKind`] describing the contained value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Double(_) => ValueKind::Double,
            Value::Bool(_) => ValueKind::Bool,
            Value::Str(_) => ValueKind::Str,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::Null => ValueKind::Null,
        }
    }

    /// Returns a human readable label for the contained value.
    pub fn type_name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Returns `true` for the missing-value marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view used when converting to doubles.
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            Value::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Orders two values, or returns `None` when they cannot be ordered
    /// against each other.
    ///
    /// Numbers compare by value regardless of variant, strings
    /// lexicographically and timestamps chronologically. `Null` sorts before
    /// everything else.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Null, _) => Some(Ordering::Less),
            (_, Value::Null) => Some(Ordering::Greater),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            (a, b) => match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => Some(x.compare(y)),
                _ => None,
            },
        }
    }

    fn as_number(&self) -> Option<Number> {
        match self {
            Value::Int(v) => Some(Number::Int(*v)),
            Value::Bool(v) => Some(Number::Int(i64::from(*v))),
            Value::Double(v) => Some(Number::Double(*v)),
            _ => None,
        }
    }
}

/// Exact numeric view of a value, so integers never lose precision against
/// doubles.
#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Double(f64),
}

impl Number {
    fn compare(self, other: Number) -> Ordering {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a.cmp(&b),
            (Number::Double(a), Number::Double(b)) => compare_doubles(a, b),
            (Number::Int(a), Number::Double(b)) => compare_int_double(a, b),
            (Number::Double(a), Number::Int(b)) => compare_int_double(b, a).reverse(),
        }
    }
}

/// Numeric order with `-0.0 == 0.0`; positive NaNs sort above every number and
/// negative NaNs below.
fn compare_doubles(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

/// 2^63 as a double, the first value above `i64::MAX`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn compare_int_double(a: i64, b: f64) -> Ordering {
    if b.is_nan() {
        return if b.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if b >= I64_BOUND {
        return Ordering::Less;
    }
    if b < -I64_BOUND {
        return Ordering::Greater;
    }
    // in range, so the truncated value converts exactly
    let whole = b.trunc();
    match a.cmp(&(whole as i64)) {
        Ordering::Equal => compare_doubles(0.0, b.fract()),
        ordering => ordering,
    }
}

impl ValueKind {
    /// Returns a lower-case name for the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Double => "double",
            ValueKind::Bool => "bool",
            ValueKind::Str => "str",
            ValueKind::Timestamp => "timestamp",
            ValueKind::Null => "null",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            // whole doubles keep a trailing ".0" so they read as floats
            Value::Double(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "{}", v),
            Value::Timestamp(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            Value::Null => write!(f, "null"),
        }
    }
}

macro_rules! impl_from {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value.into())
            }
        }
    };
}

impl_from!(Int, i64);
impl_from!(Int, i32);
impl_from!(Int, u32);
impl_from!(Int, u8);
impl_from!(Double, f64);
impl_from!(Double, f32);
impl_from!(Bool, bool);
impl_from!(Timestamp, NaiveDateTime);

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Timestamp(value.and_time(NaiveTime::MIN))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

macro_rules! impl_try_from_value {
    ($ty:ty, $variant:ident) => {
        impl TryFrom<Value> for $ty {
            type Error = Value;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                if let Value::$variant(inner) = value {
                    Ok(inner)
                } else {
                    Err(value)
                }
            }
        }
    };
}

impl_try_from_value!(i64, Int);
impl_try_from_value!(f64, Double);
impl_try_from_value!(bool, Bool);
impl_try_from_value!(String, Str);
impl_try_from_value!(NaiveDateTime, Timestamp);
