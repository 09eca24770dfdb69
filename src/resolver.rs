//! City label resolution for measurement records whose shape is not fixed
//! by the service.

use serde_json::Value;

pub const CITY_SENTINEL: &str = "—";

type Strategy = fn(&Value) -> Option<String>;

/// Tried in order; the first hit wins.
const STRATEGIES: [Strategy; 4] = [city_string, city_object_name, city_name_field, name_city_field];

fn string_at(record: &Value, key: &str) -> Option<String> {
    record.get(key)?.as_str().map(str::to_owned)
}

fn city_string(record: &Value) -> Option<String> {
    string_at(record, "ciudad")
}

fn city_object_name(record: &Value) -> Option<String> {
    let city = record.get("ciudad").filter(|c| c.is_object())?;
    string_at(city, "nombre").or_else(|| string_at(city, "name"))
}

fn city_name_field(record: &Value) -> Option<String> {
    string_at(record, "ciudad_nombre")
}

fn name_city_field(record: &Value) -> Option<String> {
    string_at(record, "nombre_ciudad")
}

/// Resolves the display name of the city a record refers to.
///
/// Never fails: a record with no recognised shape (including `null` or a
/// non-object) yields `fallback`, or [`CITY_SENTINEL`] when the fallback is
/// missing or empty.
pub fn resolve_city_name(record: &Value, fallback: Option<&str>) -> String {
    STRATEGIES
        .iter()
        .find_map(|strategy| strategy(record))
        .unwrap_or_else(|| match fallback {
            Some(f) if !f.is_empty() => f.to_owned(),
            _ => CITY_SENTINEL.to_owned(),
        })
}
