use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{ClientError, ClientResult};

/// Canonical UTC instant exchanged with the admin API.
///
/// Input may be RFC3339 text or integer Unix seconds; output is always
/// RFC3339 in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wraps an existing UTC instant.
    #[must_use]
    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        Self(value)
    }

    /// Returns the current instant.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates an instant from whole Unix seconds.
    pub fn from_unix_seconds(seconds: i64) -> ClientResult<Self> {
        DateTime::from_timestamp(seconds, 0)
            .map(Self)
            .ok_or_else(|| {
                ClientError::MalformedTimestamp(format!("epoch seconds {seconds} out of range"))
            })
    }

    /// Parses RFC3339 text, converting any offset to UTC.
    pub fn parse_rfc3339(value: &str) -> ClientResult<Self> {
        DateTime::parse_from_rfc3339(value)
            .map(|parsed| Self(parsed.with_timezone(&Utc)))
            .map_err(|error| ClientError::MalformedTimestamp(format!("'{value}': {error}")))
    }

    /// Decodes a JSON string (RFC3339) or JSON integer (Unix seconds).
    pub fn decode(value: &Value) -> ClientResult<Self> {
        match value {
            Value::String(text) => Self::parse_rfc3339(text),
            Value::Number(number) => match number.as_i64() {
                Some(seconds) => Self::from_unix_seconds(seconds),
                None => Err(ClientError::MalformedTimestamp(format!(
                    "expected integer epoch seconds, got {number}"
                ))),
            },
            other => Err(ClientError::MalformedTimestamp(format!(
                "expected RFC3339 string or integer, got {other}"
            ))),
        }
    }

    /// Encodes the instant as RFC3339 UTC.
    #[must_use]
    pub fn encode(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// Returns whole Unix seconds.
    #[must_use]
    pub fn as_unix_seconds(&self) -> i64 {
        self.0.timestamp()
    }

    /// Returns the wrapped instant.
    #[must_use]
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl Display for Timestamp {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.encode().as_str())
    }
}

impl FromStr for Timestamp {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse_rfc3339(value)
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.encode().as_str())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::decode(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::Timestamp;
    use crate::ClientError;

    #[test]
    fn integer_seconds_encode_as_rfc3339() {
        let decoded = Timestamp::decode(&json!(1_700_000_000));
        assert!(decoded.is_ok());
        let decoded = decoded.unwrap_or_else(|_| unreachable!());
        assert_eq!(decoded.encode(), "2023-11-14T22:13:20Z");
        assert_eq!(decoded.as_unix_seconds(), 1_700_000_000);
    }

    #[test]
    fn offset_strings_normalize_to_utc() {
        let decoded = Timestamp::decode(&json!("2024-03-01T10:00:00+02:00"));
        assert!(decoded.is_ok());
        assert_eq!(
            decoded.unwrap_or_else(|_| unreachable!()).encode(),
            "2024-03-01T08:00:00Z"
        );
    }

    #[test]
    fn fractional_seconds_survive_roundtrip() {
        let decoded = Timestamp::decode(&json!("2024-03-01T10:00:00.250Z"));
        assert!(decoded.is_ok());
        let decoded = decoded.unwrap_or_else(|_| unreachable!());
        assert_eq!(decoded.encode(), "2024-03-01T10:00:00.250Z");

        let again = Timestamp::decode(&json!(decoded.encode()));
        assert!(again.is_ok());
        assert_eq!(again.unwrap_or_else(|_| unreachable!()), decoded);
    }

    #[test]
    fn rejects_non_rfc3339_and_non_integer_values() {
        for value in [
            json!("yesterday"),
            json!("2024-03-01 10:00:00"),
            json!(1.5),
            json!(true),
            json!(null),
        ] {
            let decoded = Timestamp::decode(&value);
            assert!(matches!(decoded, Err(ClientError::MalformedTimestamp(_))));
        }
    }

    #[test]
    fn serde_accepts_both_forms_and_emits_text() {
        let from_int = serde_json::from_value::<Timestamp>(json!(0));
        let from_text = serde_json::from_value::<Timestamp>(json!("1970-01-01T00:00:00Z"));
        assert!(from_int.is_ok());
        assert!(from_text.is_ok());
        let from_int = from_int.unwrap_or_else(|_| unreachable!());
        assert_eq!(from_int, from_text.unwrap_or_else(|_| unreachable!()));
        assert_eq!(
            serde_json::to_value(from_int).unwrap_or_default(),
            json!("1970-01-01T00:00:00Z")
        );
    }

    proptest! {
        #[test]
        fn encoded_instants_decode_to_themselves(
            seconds in -62_135_596_800_i64..253_402_300_799_i64,
            millis in 0_u32..1000,
        ) {
            let instant = chrono::DateTime::from_timestamp(seconds, millis * 1_000_000);
            prop_assert!(instant.is_some());
            let instant = Timestamp::from_datetime(instant.unwrap_or_default());

            let decoded = Timestamp::decode(&json!(instant.encode()));
            prop_assert!(decoded.is_ok());
            prop_assert_eq!(decoded.unwrap_or_else(|_| unreachable!()), instant);
        }
    }
}
