// SPDX-License-Identifier: GPL-3.0-only

//! Parsing of `smartctl --json` reports
//!
//! Each counter is looked up first at its top-level location and then in the
//! ATA attribute table by row name.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use slots_types::{Freshness, FreshnessFn, Health, SmartInfo};

use crate::error::{Result, SysError};

const MISSING: i64 = -1;

// Every field is read leniently: a value of an unexpected type counts as
// absent instead of discarding the rest of the report.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SmartctlReport {
    #[serde(deserialize_with = "lenient")]
    model_family: Option<String>,
    #[serde(deserialize_with = "lenient")]
    temperature: Option<Temperature>,
    #[serde(deserialize_with = "lenient")]
    power_on_time: Option<PowerOnTime>,
    #[serde(deserialize_with = "lenient_integer")]
    power_cycle_count: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    ata_smart_attributes: Option<AtaSmartAttributes>,
    #[serde(deserialize_with = "lenient")]
    smart_status: Option<SmartStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Temperature {
    #[serde(deserialize_with = "lenient_integer")]
    current: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PowerOnTime {
    #[serde(deserialize_with = "lenient_integer")]
    hours: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AtaSmartAttributes {
    #[serde(deserialize_with = "lenient_rows")]
    table: Vec<AtaAttribute>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AtaAttribute {
    name: String,
    raw: RawAttribute,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAttribute {
    string: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SmartStatus {
    #[serde(deserialize_with = "lenient")]
    passed: Option<bool>,
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Integers, with fractional readings truncated.
fn lenient_integer<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .or_else(|| value.as_f64().map(|reading| reading.trunc() as i64)))
}

/// Attribute rows; rows that do not have the expected shape are skipped.
fn lenient_rows<'de, D>(deserializer: D) -> std::result::Result<Vec<AtaAttribute>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = match Value::deserialize(deserializer)? {
        Value::Array(rows) => rows,
        _ => return Ok(Vec::new()),
    };
    Ok(rows
        .into_iter()
        .filter_map(|row| AtaAttribute::deserialize(row).ok())
        .collect())
}

fn malformed(reason: impl Into<String>) -> SysError {
    SysError::MalformedOutput {
        command: "smartctl".to_string(),
        reason: reason.into(),
    }
}

/// Parse smartctl's JSON output into a health summary.
///
/// Anything but a JSON object is malformed output.
pub fn parse_report(stdout: &[u8], freshness: FreshnessFn) -> Result<SmartInfo> {
    let value: Value = serde_json::from_slice(stdout).map_err(|e| malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(malformed("expected a JSON object"));
    }
    let report = SmartctlReport::deserialize(value).map_err(|e| malformed(e.to_string()))?;

    let mut info = report.into_smart_info();
    info.freshness = freshness(&info);
    Ok(info)
}

impl SmartctlReport {
    fn into_smart_info(self) -> SmartInfo {
        let table = self.ata_smart_attributes.map(|attributes| attributes.table);
        // `None` when the report has no attribute table at all.
        let attribute = |name: &str| {
            table
                .as_ref()
                .map(|rows| attribute_value(rows, name).unwrap_or(MISSING))
        };

        SmartInfo {
            model_family: self.model_family.unwrap_or_else(|| "?".to_string()),
            temperature: self
                .temperature
                .and_then(|t| t.current)
                .or_else(|| attribute("Temperature_Celsius")),
            power_on_hours: self
                .power_on_time
                .and_then(|p| p.hours)
                .or_else(|| attribute("Power_On_Hours"))
                .unwrap_or(MISSING),
            power_cycle_count: self
                .power_cycle_count
                .or_else(|| attribute("Power_Cycle_Count"))
                .unwrap_or(MISSING),
            start_stop_count: attribute("Start_Stop_Count").unwrap_or(MISSING),
            health: Health::from_passed(self.smart_status.and_then(|s| s.passed)),
            freshness: Freshness::New,
        }
    }
}

fn attribute_value(table: &[AtaAttribute], name: &str) -> Option<i64> {
    table
        .iter()
        .find(|row| row.name == name)
        .and_then(|row| leading_integer(&row.raw.string))
}

/// Raw strings may carry trailing detail ("35 (Min/Max 21/44)", "1234h+05m").
fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let end = raw
        .char_indices()
        .find(|&(index, c)| !(c.is_ascii_digit() || (index == 0 && c == '-')))
        .map(|(index, _)| index)
        .unwrap_or(raw.len());
    raw[..end].parse().ok()
}
