use crate::error::{GraylogError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Graylog's wire format: RFC3339 in UTC with exactly three fractional digits.
const MILLIS_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

/// Unix timestamp of `0001-01-01T00:00:00Z`, the zero instant Graylog emits for unset times.
const ZERO_INSTANT_UNIX: i64 = -62_135_596_800;

/// An instant as Graylog exchanges it.
///
/// Parsing accepts any RFC3339 precision, but rendering always emits
/// milliseconds: sub-millisecond digits of a parsed value are dropped when it
/// is serialized again.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GraylogTimestamp(pub OffsetDateTime);

impl GraylogTimestamp {
    pub fn new(datetime: OffsetDateTime) -> Self {
        Self(datetime)
    }

    pub fn inner(&self) -> &OffsetDateTime {
        &self.0
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    /// Whether this is the zero instant, which stands for "unset".
    pub fn is_zero(&self) -> bool {
        self.0.unix_timestamp() == ZERO_INSTANT_UNIX && self.0.nanosecond() == 0
    }

    /// Parse a wire value, mapping empty strings and the zero instant to `None`.
    pub fn parse_optional(s: &str) -> Result<Option<Self>> {
        if s.is_empty() {
            return Ok(None);
        }
        let ts = Self::from_str(s)?;
        Ok((!ts.is_zero()).then_some(ts))
    }
}

impl fmt::Display for GraylogTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .0
            .to_offset(UtcOffset::UTC)
            .format(MILLIS_FORMAT)
            .map_err(|_| fmt::Error)?;
        write!(f, "{formatted}")
    }
}

impl FromStr for GraylogTimestamp {
    type Err = GraylogError;

    fn from_str(s: &str) -> Result<Self> {
        let datetime = OffsetDateTime::parse(s, &time::format_description::well_known::Rfc3339)
            .map_err(|e| GraylogError::transport(format!("invalid timestamp '{s}'"), e))?;
        Ok(GraylogTimestamp(datetime))
    }
}

impl Serialize for GraylogTimestamp {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self
            .0
            .to_offset(UtcOffset::UTC)
            .format(MILLIS_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for GraylogTimestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        GraylogTimestamp::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional timestamps.
///
/// Use with `#[serde(default, with = "graylog_core::time::optional", skip_serializing_if = "Option::is_none")]`.
/// Absent, `null`, empty and zero-instant values all deserialize to `None`.
pub mod optional {
    use super::GraylogTimestamp;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(
        value: &Option<GraylogTimestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) if !ts.is_zero() => serializer.serialize_some(ts),
            _ => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<GraylogTimestamp>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => GraylogTimestamp::parse_optional(&s).map_err(serde::de::Error::custom),
        }
    }
}
