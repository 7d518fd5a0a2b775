//! Payload Records
//!
//! Everything the node sends is JSON. Structured payloads are serialised with
//! `serde_json`, never assembled by string concatenation, so tags or messages
//! containing quotes or braces still produce valid JSON.
//!
//! [`BufferRecord`] is the opaque single-line form stored in the buffer file.

use core::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::RecordError;

/// One undelivered payload, exactly one line of the buffer file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BufferRecord(String);

impl BufferRecord {
    /// Wrap an existing line
    ///
    /// Rejects embedded line terminators and blank lines; surrounding
    /// whitespace is trimmed the same way a replay pass trims it.
    pub fn new(line: impl Into<String>) -> Result<Self, RecordError> {
        let line = line.into();
        if line.contains(|c: char| c == '\n' || c == '\r') {
            return Err(RecordError::EmbeddedNewline);
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(RecordError::Empty);
        }
        if trimmed.len() == line.len() {
            Ok(Self(line))
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    /// Serialise a structured payload into a record
    pub fn from_payload<T: Serialize + ?Sized>(payload: &T) -> Result<Self, RecordError> {
        Self::new(serde_json::to_string(payload)?)
    }

    /// The line as stored
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Give back the owned line
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for BufferRecord {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BufferRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// DHT11 sample as accepted by the collecting server's `/sensor` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    /// Session identifier from the node configuration
    pub record_session: String,
    /// Which DHT11 on the node produced the sample
    pub dht11_number: i32,
    /// Temperature in °C
    pub temperature: f32,
    /// Relative humidity in %
    pub humidity: f32,
    /// Local date, absent when the clock is not synced
    pub date: Option<NaiveDate>,
    /// Local time of day, absent when the clock is not synced
    #[serde(default, with = "seconds_time")]
    pub time: Option<NaiveTime>,
}

impl SensorRecord {
    /// Encode as a buffer line
    pub fn to_record(&self) -> Result<BufferRecord, RecordError> {
        BufferRecord::from_payload(self)
    }
}

/// Human-readable event shipped to the log endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Component tag (`WIFI`, `SD`, `HTTP_CLIENT`, ...)
    pub tag: String,
    /// Free-form message
    #[serde(rename = "evento")]
    pub event: String,
}

impl LogRecord {
    /// Build from borrowed parts
    pub fn new(tag: &str, event: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            event: event.to_owned(),
        }
    }

    /// The line written to the SD event log
    pub fn log_line(&self) -> String {
        format!("{} | {}", self.tag, self.event)
    }
}

/// `HH:MM:SS` without fractional seconds, the format the server parses
mod seconds_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M:%S";

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => s.serialize_some(&t.format(FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|s| NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_record_rejects_newlines_and_blanks() {
        assert!(matches!(BufferRecord::new("a\nb"), Err(RecordError::EmbeddedNewline)));
        assert!(matches!(BufferRecord::new("a\r"), Err(RecordError::EmbeddedNewline)));
        assert!(matches!(BufferRecord::new("   "), Err(RecordError::Empty)));
        assert_eq!(BufferRecord::new("  {}  ").unwrap().as_str(), "{}");
    }

    #[test]
    fn log_record_escapes_quotes_and_braces() {
        let record = LogRecord::new("WIFI", r#"ssid "lab" {5GHz}"#);
        let line = BufferRecord::from_payload(&record).unwrap();
        assert_eq!(
            line.as_str(),
            r#"{"tag":"WIFI","evento":"ssid \"lab\" {5GHz}"}"#
        );
        let back: LogRecord = serde_json::from_str(line.as_str()).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn log_line_format() {
        assert_eq!(LogRecord::new("SD", "ready").log_line(), "SD | ready");
    }

    #[test]
    fn sensor_record_matches_server_shape() {
        let record = SensorRecord {
            record_session: "greenhouse-a".into(),
            dht11_number: 1,
            temperature: 21.5,
            humidity: 48.0,
            date: NaiveDate::from_ymd_opt(2024, 5, 17),
            time: NaiveTime::from_hms_opt(8, 30, 5),
        };
        let json = record.to_record().unwrap();
        assert_eq!(
            json.as_str(),
            r#"{"record_session":"greenhouse-a","dht11_number":1,"temperature":21.5,"humidity":48.0,"date":"2024-05-17","time":"08:30:05"}"#
        );
    }

    #[test]
    fn unsynced_clock_serialises_nulls() {
        let record = SensorRecord {
            record_session: "s".into(),
            dht11_number: 0,
            temperature: 20.0,
            humidity: 40.0,
            date: None,
            time: None,
        };
        let value: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert!(value["date"].is_null());
        assert!(value["time"].is_null());
    }
}
