use crate::classifier::{classify, Category};
use crate::resolver::{resolve_city_name, CITY_SENTINEL};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Where a measurement entered the history from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    BulkLoad,
    Manual,
    CityLookup,
}

/// Insertion directive handed to the render sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Front,
    Back,
}

impl Source {
    pub fn placement(&self) -> Placement {
        match self {
            Source::BulkLoad | Source::Manual => Placement::Back,
            Source::CityLookup => Placement::Front,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Measurement {
    pub id: uuid::Uuid,
    pub temperature: Option<f64>,
    pub category: Option<Category>,
    pub city_label: String,
    pub timestamp: DateTime<Local>,
    pub source: Source,
}

impl Measurement {
    /// Builds a measurement from a service record. The category is derived
    /// whenever the record lacks a usable one and carries a temperature.
    pub fn from_raw(raw: &Value, source: Source, city_fallback: Option<&str>) -> Self {
        let temperature = raw_temperature(raw);
        let category = raw_category(raw).or_else(|| temperature.map(classify));
        Self {
            id: uuid::Uuid::new_v4(),
            temperature,
            category,
            city_label: resolve_city_name(raw, city_fallback),
            timestamp: raw_timestamp(raw).unwrap_or_else(Local::now),
            source,
        }
    }

    pub fn manual(temperature: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            temperature: Some(temperature),
            category: Some(classify(temperature)),
            city_label: CITY_SENTINEL.to_owned(),
            timestamp: Local::now(),
            source: Source::Manual,
        }
    }
}

/// `temperatura`, or `temperature`, as a number or numeric string.
pub fn raw_temperature(raw: &Value) -> Option<f64> {
    let value = raw.get("temperatura").or_else(|| raw.get("temperature"))?;
    let temperature = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    temperature.is_finite().then_some(temperature)
}

/// `categoria` when it names a known category.
pub fn raw_category(raw: &Value) -> Option<Category> {
    raw.get("categoria")?.as_str()?.parse().ok()
}

/// `fecha_medicion`, then `fecha`.
pub fn raw_timestamp(raw: &Value) -> Option<DateTime<Local>> {
    ["fecha_medicion", "fecha"]
        .iter()
        .filter_map(|key| raw.get(*key)?.as_str())
        .find(|s| !s.is_empty())
        .and_then(parse_timestamp)
}

/// Accepts RFC 3339, RFC 2822, a naive local date-time, or a bare date
/// (taken as UTC midnight).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Local));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).with_timezone(&Local))
}

/// Labelled fields of a city lookup, in display order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasurementDetail {
    pub entries: Vec<(&'static str, String)>,
}

impl MeasurementDetail {
    pub fn from_lookup(raw: &Value, measurement: &Measurement, timestamp_text: &str) -> Self {
        let candidates: [(&'static str, Option<String>); 9] = [
            ("Ciudad", Some(measurement.city_label.clone())),
            (
                "Temperatura",
                measurement.temperature.map(|t| format!("{} °C", t)),
            ),
            ("Temp. mínima", first_present(raw, &["temp_min", "temp_minima"])),
            ("Temp. máxima", first_present(raw, &["temp_max", "temp_maxima"])),
            ("Humedad", first_present(raw, &["humedad"]).map(|h| format!("{} %", h))),
            ("Presión", first_present(raw, &["presion"])),
            ("Sensación térmica", first_present(raw, &["sensacion", "sensacion_termica"])),
            ("Descripción", first_present(raw, &["descripcion"])),
            ("Fecha medición", Some(timestamp_text.to_owned())),
        ];
        Self {
            entries: candidates
                .into_iter()
                .filter_map(|(label, value)| Some((label, value?)))
                .collect(),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries
            .iter()
            .map(|(label, value)| format!("{}: {}", label, value))
    }
}

fn first_present(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| display_value(raw.get(*key)?))
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
