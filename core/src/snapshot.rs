use crate::error::DecodeError;
use crate::{Reading, SourceZone};
use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;
use tracing::trace;

/// Wall-clock format of the `dateLocalTime` field
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

// `d` marks a digit, everything else must match literally
const TIMESTAMP_SHAPE: &[u8] = b"dddd/dd/dd dd:dd:dd";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    Timestamp,
    CloudWatcherInfo,
    SkyLightDetectorData,
    CloudTemperature,
    CloudsSafe,
    Temperature,
    Wind,
    WindSafe,
    Gust,
    Rain,
    RainSafe,
    Light,
    LightSafe,
    SwitchClosed,
    Safe,
    Humidity,
    HumiditySafe,
    DewPoint,
    AbsolutePressure,
    RelativePressure,
    PressureSafe,
    RawInfrared,
}

#[derive(Debug, Clone, Copy)]
enum Transform {
    /// Free text, empty when absent or null
    Text,
    Number,
    /// 32 bit integer
    Integer,
    /// `true` iff the string is "safe", ignoring case
    SafeWord,
    /// `true` iff the integer is exactly 1
    IntegerFlag,
    /// `YYYY/MM/DD HH:MM:SS` in the source zone
    LocalTimestamp,
}

/// Snapshot keys as the instrument software writes them.
/// Matching is case-insensitive.
const FIELD_TABLE: &[(&str, Field, Transform)] = &[
    ("dateLocalTime", Field::Timestamp, Transform::LocalTimestamp),
    ("cwInfo", Field::CloudWatcherInfo, Transform::Text),
    ("sldData", Field::SkyLightDetectorData, Transform::Text),
    ("clouds", Field::CloudTemperature, Transform::Number),
    ("cloudsSafe", Field::CloudsSafe, Transform::SafeWord),
    ("temp", Field::Temperature, Transform::Number),
    ("wind", Field::Wind, Transform::Number),
    ("windSafe", Field::WindSafe, Transform::SafeWord),
    ("gust", Field::Gust, Transform::Number),
    ("rain", Field::Rain, Transform::Integer),
    ("rainSafe", Field::RainSafe, Transform::SafeWord),
    ("light", Field::Light, Transform::Integer),
    ("lightSafe", Field::LightSafe, Transform::SafeWord),
    ("switch", Field::SwitchClosed, Transform::IntegerFlag),
    ("safe", Field::Safe, Transform::IntegerFlag),
    ("hum", Field::Humidity, Transform::Number),
    ("humSafe", Field::HumiditySafe, Transform::SafeWord),
    ("dewp", Field::DewPoint, Transform::Number),
    ("abspress", Field::AbsolutePressure, Transform::Number),
    ("relpress", Field::RelativePressure, Transform::Number),
    ("pressureSafe", Field::PressureSafe, Transform::SafeWord),
    ("rawir", Field::RawInfrared, Transform::Number),
];

static KEY_LOOKUP: Lazy<HashMap<String, (&'static str, Field, Transform)>> = Lazy::new(|| {
    FIELD_TABLE
        .iter()
        .map(|entry| (entry.0.to_ascii_lowercase(), *entry))
        .collect()
});

impl Field {
    fn source_key(self) -> &'static str {
        FIELD_TABLE
            .iter()
            .find(|(_, field, _)| *field == self)
            .map(|(key, _, _)| *key)
            .unwrap_or("unknown")
    }
}

#[derive(Debug)]
enum Decoded {
    Text(String),
    Number(f64),
    Integer(i32),
    Flag(bool),
    Instant(DateTime<Utc>),
}

impl Transform {
    fn apply(
        self,
        key: &'static str,
        value: &Value,
        zone: SourceZone,
    ) -> Result<Decoded, DecodeError> {
        let invalid = |expected| DecodeError::InvalidType {
            field: key,
            expected,
        };
        match self {
            Transform::Text => match value {
                Value::Null => Ok(Decoded::Text(String::new())),
                Value::String(text) => Ok(Decoded::Text(text.clone())),
                _ => Err(invalid("a string")),
            },
            Transform::Number => value
                .as_f64()
                .map(Decoded::Number)
                .ok_or_else(|| invalid("a number")),
            Transform::Integer => as_i32(value)
                .map(Decoded::Integer)
                .ok_or_else(|| invalid("a 32 bit integer")),
            Transform::SafeWord => value
                .as_str()
                .map(|word| Decoded::Flag(word.eq_ignore_ascii_case("safe")))
                .ok_or_else(|| invalid("a string")),
            Transform::IntegerFlag => as_i32(value)
                .map(|flag| Decoded::Flag(flag == 1))
                .ok_or_else(|| invalid("a 32 bit integer")),
            Transform::LocalTimestamp => {
                let raw = value.as_str().ok_or_else(|| invalid("a string"))?;
                let naive = parse_local_timestamp(raw)?;
                zone.to_utc(&naive).map(Decoded::Instant)
            }
        }
    }
}

fn as_i32(value: &Value) -> Option<i32> {
    value.as_i64().and_then(|int| i32::try_from(int).ok())
}

/// Parses the instrument's wall-clock timestamp.
///
/// chrono alone accepts unpadded components and signed years,
/// so the exact shape is checked first. Leap seconds and year 0
/// are rejected after parsing.
pub fn parse_local_timestamp(raw: &str) -> Result<NaiveDateTime, DecodeError> {
    let shaped = raw.len() == TIMESTAMP_SHAPE.len()
        && raw
            .bytes()
            .zip(TIMESTAMP_SHAPE.iter())
            .all(|(c, &shape)| match shape {
                b'd' => c.is_ascii_digit(),
                _ => c == shape,
            });
    if !shaped {
        return Err(DecodeError::InvalidTimestamp(raw.to_owned()));
    }
    let invalid = || DecodeError::InvalidTimestamp(raw.to_owned());
    let naive = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| invalid())?;
    if naive.year() < 1 || naive.second() >= 60 || naive.nanosecond() >= 1_000_000_000 {
        return Err(invalid());
    }
    Ok(naive)
}

#[derive(Default)]
struct Slots {
    values: HashMap<Field, Decoded>,
}

impl Slots {
    fn take(&mut self, field: Field) -> Result<Decoded, DecodeError> {
        self.values
            .remove(&field)
            .ok_or_else(|| DecodeError::MissingField(field.source_key()))
    }

    fn mismatch(field: Field, expected: &'static str) -> DecodeError {
        DecodeError::InvalidType {
            field: field.source_key(),
            expected,
        }
    }

    fn text(&mut self, field: Field) -> Result<String, DecodeError> {
        match self.values.remove(&field) {
            None => Ok(String::new()),
            Some(Decoded::Text(text)) => Ok(text),
            Some(_) => Err(Self::mismatch(field, "a string")),
        }
    }

    fn number(&mut self, field: Field) -> Result<f64, DecodeError> {
        match self.take(field)? {
            Decoded::Number(number) => Ok(number),
            _ => Err(Self::mismatch(field, "a number")),
        }
    }

    fn integer(&mut self, field: Field) -> Result<i32, DecodeError> {
        match self.take(field)? {
            Decoded::Integer(int) => Ok(int),
            _ => Err(Self::mismatch(field, "a 32 bit integer")),
        }
    }

    fn flag(&mut self, field: Field) -> Result<bool, DecodeError> {
        match self.take(field)? {
            Decoded::Flag(flag) => Ok(flag),
            _ => Err(Self::mismatch(field, "a flag")),
        }
    }

    fn instant(&mut self, field: Field) -> Result<DateTime<Utc>, DecodeError> {
        match self.take(field)? {
            Decoded::Instant(instant) => Ok(instant),
            _ => Err(Self::mismatch(field, "a timestamp")),
        }
    }

    fn into_reading(mut self) -> Result<Reading, DecodeError> {
        Ok(Reading {
            timestamp: self.instant(Field::Timestamp)?,
            cloud_watcher_info: self.text(Field::CloudWatcherInfo)?,
            sky_light_detector_data: self.text(Field::SkyLightDetectorData)?,
            cloud_temperature: self.number(Field::CloudTemperature)?,
            clouds_safe: self.flag(Field::CloudsSafe)?,
            temperature: self.number(Field::Temperature)?,
            wind: self.number(Field::Wind)?,
            wind_safe: self.flag(Field::WindSafe)?,
            gust: self.number(Field::Gust)?,
            rain: self.integer(Field::Rain)?,
            rain_safe: self.flag(Field::RainSafe)?,
            light: self.integer(Field::Light)?,
            light_safe: self.flag(Field::LightSafe)?,
            switch_closed: self.flag(Field::SwitchClosed)?,
            safe: self.flag(Field::Safe)?,
            humidity: self.number(Field::Humidity)?,
            humidity_safe: self.flag(Field::HumiditySafe)?,
            dew_point: self.number(Field::DewPoint)?,
            absolute_pressure: self.number(Field::AbsolutePressure)?,
            relative_pressure: self.number(Field::RelativePressure)?,
            pressure_safe: self.flag(Field::PressureSafe)?,
            raw_infrared: self.number(Field::RawInfrared)?,
        })
    }
}

/// Decodes the text of an `aag_json.dat` snapshot into a `Reading`.
///
/// Every key is run through its transform in a single pass, unknown
/// keys are skipped. Only the two free text fields may be absent.
pub fn decode_snapshot(text: &str, zone: SourceZone) -> Result<Reading, DecodeError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let object = match serde_json::from_str::<Value>(text)? {
        Value::Object(object) => object,
        _ => return Err(DecodeError::NotAnObject),
    };

    let mut slots = Slots::default();
    for (key, value) in object.iter() {
        match KEY_LOOKUP.get(&key.to_ascii_lowercase()) {
            Some(&(source_key, field, transform)) => {
                let decoded = transform.apply(source_key, value, zone)?;
                slots.values.insert(field, decoded);
            }
            None => trace!(key = key.as_str(), "Skipping unknown snapshot field"),
        }
    }
    slots.into_reading()
}
