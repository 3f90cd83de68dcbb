//! Serde adapter for naive timestamps as `YYYY-MM-DD HH:MM:SS`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn serialize<S>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&time.format(DISPLAY_FORMAT))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&s, DISPLAY_FORMAT).map_err(serde::de::Error::custom)
}
