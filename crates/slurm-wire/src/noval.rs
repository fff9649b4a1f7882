//! The Slurm "no value" wrapper and helpers that collapse it into `Option`.
//!
//! Slurm reports many numeric fields as `{"set": bool, "infinite": bool,
//! "number": n}` so that "not set" and "zero" stay distinguishable. Some
//! versions send the same field as a bare number, and list fields arrive
//! either as JSON arrays or as one comma-separated string.
//!
//! Every helper in this module is total: absence is reported as `None`,
//! never as an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `{set, infinite, number}` wrapper used for optional numbers on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct NoVal<T> {
    /// Whether `number` carries a value.
    #[serde(default)]
    pub set: bool,
    /// Whether the value is "unlimited".
    #[serde(default)]
    pub infinite: bool,
    /// The payload. Meaningless unless `set` is true.
    #[serde(default)]
    pub number: T,
}

impl<T: Default> NoVal<T> {
    /// A wrapper carrying `number`.
    pub fn set(number: T) -> Self {
        Self {
            set: true,
            infinite: false,
            number,
        }
    }

    /// A wrapper with no value.
    pub fn unset() -> Self {
        Self::default()
    }

    /// A wrapper meaning "unlimited".
    pub fn infinite() -> Self {
        Self {
            set: false,
            infinite: true,
            number: T::default(),
        }
    }
}

impl<T: Default> From<Option<T>> for NoVal<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::unset, Self::set)
    }
}

/// A field that some versions wrap in [`NoVal`] and others send bare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub enum Flexible<T> {
    /// `{set, number}` form.
    Wrapped(NoVal<T>),
    /// Bare scalar form.
    Bare(T),
}

/// A list field sent either as a JSON array or a comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CsvList {
    /// `["a", "b"]`
    List(Vec<String>),
    /// `"a,b"`
    Csv(String),
}

impl Default for CsvList {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl CsvList {
    /// The entries, trimmed, with empty entries dropped.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Self::Csv(raw) => split_csv(raw),
        }
    }

    /// First non-empty entry.
    #[must_use]
    pub fn first(&self) -> Option<String> {
        self.to_vec().into_iter().next()
    }
}

impl From<Vec<String>> for CsvList {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// A wire field that may or may not carry a value.
pub trait OptionalValue {
    /// The carried value.
    type Value;

    /// The value if present.
    fn value(&self) -> Option<Self::Value>;
}

impl<T: Copy> OptionalValue for NoVal<T> {
    type Value = T;

    fn value(&self) -> Option<T> {
        // "Unlimited" has no finite number to report.
        (self.set && !self.infinite).then_some(self.number)
    }
}

impl<T: Copy> OptionalValue for Flexible<T> {
    type Value = T;

    fn value(&self) -> Option<T> {
        match self {
            Self::Wrapped(inner) => inner.value(),
            Self::Bare(value) => Some(*value),
        }
    }
}

impl<W: OptionalValue> OptionalValue for Option<W> {
    type Value = W::Value;

    fn value(&self) -> Option<W::Value> {
        self.as_ref().and_then(OptionalValue::value)
    }
}

impl<W: OptionalValue + ?Sized> OptionalValue for &W {
    type Value = W::Value;

    fn value(&self) -> Option<W::Value> {
        (**self).value()
    }
}

macro_rules! bare_optional_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl OptionalValue for $ty {
                type Value = $ty;

                fn value(&self) -> Option<$ty> {
                    Some(*self)
                }
            }
        )*
    };
}

bare_optional_value!(bool, u16, u32, u64, i32, i64, f64);

/// Unwrap any optional wire value.
pub fn unwrap<V: OptionalValue>(value: &V) -> Option<V::Value> {
    value.value()
}

/// Unwrap and convert to a narrower integer. Values that do not fit are
/// treated as absent.
pub fn unwrap_number<V, T>(value: &V) -> Option<T>
where
    V: OptionalValue,
    V::Value: TryInto<T>,
{
    value.value().and_then(|v| v.try_into().ok())
}

/// Unwrap a Unix-seconds timestamp. Zero and negative values mean "no value".
pub fn unwrap_timestamp<V>(value: &V) -> Option<DateTime<Utc>>
where
    V: OptionalValue,
    V::Value: Into<i64>,
{
    let seconds: i64 = value.value()?.into();
    if seconds <= 0 {
        return None;
    }
    DateTime::from_timestamp(seconds, 0)
}

/// Split a comma-separated field. `None` stays `None` rather than becoming
/// an empty list.
pub fn unwrap_csv(value: Option<&str>) -> Option<Vec<String>> {
    value.map(split_csv)
}

/// Unwrap a list-or-CSV field.
pub fn unwrap_list(value: Option<&CsvList>) -> Option<Vec<String>> {
    value.map(CsvList::to_vec)
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render a timestamp the way the wire expects it.
#[must_use]
pub fn timestamp_to_wire(value: Option<DateTime<Utc>>) -> NoVal<i64> {
    value.map(|t| t.timestamp()).into()
}
