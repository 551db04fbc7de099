//! Lenient projections of the Infinitude JSON documents.
//!
//! Infinitude serves its XML-derived state as JSON where nearly every scalar
//! is wrapped in a one-element array (`"oat": ["55.5"]`), and some slots hold
//! an empty object instead of a string when the value does not apply.
//!
//! Decoding here is deliberately schema-tolerant:
//! - every struct is `#[serde(default)]`, so missing fields become empty;
//! - unknown fields are ignored;
//! - a wrapped scalar accepts any element type, keeping non-strings as
//!   [`Slot::Placeholder`] instead of failing the whole document.
//!
//! Only a body that is not JSON at all (or whose envelope has the wrong
//! shape) is a decode error.

pub mod energy;
pub mod status;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::mapping::parse_or_zero;

pub use energy::{Energy, EnergyResponse, EnergySeries, LoadCategory, Period};
pub use status::{Status, StatusResponse, Zone};

/// One element of a wrapped scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// The usual case: a string value.
    Text(String),
    /// Anything that is not a string (`{}`, `null`, numbers, nested arrays).
    Placeholder,
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Other(IgnoredAny),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Text(s) => Slot::Text(s),
            Repr::Other(_) => Slot::Placeholder,
        })
    }
}

/// A wrapped controller scalar, e.g. `"rh": ["45"]`.
///
/// Only the first element is ever read. A bare (unwrapped) value is accepted
/// as a one-element field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field(Vec<Slot>);

impl Field {
    /// Build a field wrapping a single string.
    pub fn text(value: impl Into<String>) -> Self {
        Self(vec![Slot::Text(value.into())])
    }

    /// Build a field wrapping a single placeholder.
    pub fn placeholder() -> Self {
        Self(vec![Slot::Placeholder])
    }

    /// The first slot, if any.
    pub fn first(&self) -> Option<&Slot> {
        self.0.first()
    }

    /// The first slot's string, or `None` when empty or not a string.
    pub fn as_str(&self) -> Option<&str> {
        match self.first() {
            Some(Slot::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Numeric reading of the field; zero when absent, empty, a placeholder,
    /// or not a number.
    pub fn value(&self) -> f64 {
        self.as_str().map(parse_or_zero).unwrap_or(0.0)
    }

    /// Whether the first slot is exactly `expected`.
    pub fn is(&self, expected: &str) -> bool {
        self.as_str() == Some(expected)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Many(Vec<Slot>),
            One(Slot),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Many(slots) => Field(slots),
            Repr::One(slot) => Field(vec![slot]),
        })
    }
}

/// Deserialize a list that may be `null`; `null` reads as empty.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize an identifier that may be a string or a number.
///
/// Anything else decodes to an empty string rather than failing.
pub(crate) fn identifier<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Number(serde_json::Number),
        Other(IgnoredAny),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Text(s) => s,
        Repr::Number(n) => n.to_string(),
        Repr::Other(_) => String::new(),
    })
}
