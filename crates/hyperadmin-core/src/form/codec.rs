// ── Field codecs ──
//
// Per-field conversions between the flat text a form field holds and the
// shape the API uses on the wire. Structured fields (`address`) travel as a
// nested object; display-only fields (`registrationdate`) are rendered for
// humans on the read side.

use chrono::DateTime;
use serde_json::{Map, Value};

/// Country placeholder when an address has no comma-separated country part.
pub const UNKNOWN_COUNTRY: &str = "??";

/// Converts between a single text value and a nested wire object.
#[derive(Debug, Clone, Copy)]
pub struct StructuredCodec {
    pub decode: fn(&str) -> Map<String, Value>,
    pub encode: fn(&Map<String, Value>) -> Option<String>,
}

/// Fields that serialize as nested objects, keyed by field name.
const STRUCTURED: &[(&str, StructuredCodec)] = &[(
    "address",
    StructuredCodec {
        decode: decode_address,
        encode: encode_address,
    },
)];

/// Fields with a human rendering on the read side.
const DISPLAY: &[(&str, fn(&Value) -> Option<String>)] = &[("registrationdate", format_timestamp)];

pub fn structured(name: &str) -> Option<StructuredCodec> {
    STRUCTURED
        .iter()
        .find(|(field, _)| *field == name)
        .map(|(_, codec)| *codec)
}

/// Read-side text for an attribute value.
///
/// Applies the display formatter registered for `name`, renders nested
/// objects through their structured codec, and falls back to the plain
/// scalar text. Values with no text form yield `None`.
pub fn display_text(name: &str, value: &Value) -> Option<String> {
    if let Some((_, format)) = DISPLAY.iter().find(|(field, _)| *field == name) {
        if let Some(text) = format(value) {
            return Some(text);
        }
    }
    match value {
        Value::Object(object) => structured(name).and_then(|codec| (codec.encode)(object)),
        other => hyperadmin_api::media::template::scalar_text(other),
    }
}

// ── address ──────────────────────────────────────────────────────────

/// `"Oulu, Finland"` → `{addressLocality: "Oulu", addressCountry: "Finland"}`.
pub fn decode_address(text: &str) -> Map<String, Value> {
    let (locality, country) = match text.split_once(',') {
        Some((locality, country)) => (locality.trim(), country.trim()),
        None => (text.trim(), UNKNOWN_COUNTRY),
    };
    let mut object = Map::new();
    object.insert("addressLocality".into(), Value::String(locality.to_owned()));
    object.insert("addressCountry".into(), Value::String(country.to_owned()));
    object
}

/// Inverse of [`decode_address`]; an empty object has no text form.
pub fn encode_address(object: &Map<String, Value>) -> Option<String> {
    let part = |key: &str| object.get(key).and_then(Value::as_str).map(str::trim);
    match (part("addressLocality"), part("addressCountry")) {
        (Some(locality), Some(country)) => Some(format!("{locality}, {country}")),
        (Some(locality), None) => Some(locality.to_owned()),
        (None, Some(country)) => Some(format!(", {country}")),
        (None, None) => None,
    }
}

// ── registrationdate ─────────────────────────────────────────────────

/// Unix seconds → `d.m.yyyy at h:m:s` (UTC, no zero padding).
pub fn format_timestamp(value: &Value) -> Option<String> {
    let secs = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    let at = DateTime::from_timestamp(secs, 0)?;
    Some(at.format("%-d.%-m.%Y at %-H:%-M:%-S").to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn address_splits_and_trims() {
        let object = decode_address("Oulu, Finland");
        assert_eq!(Value::Object(object.clone()), json!({"addressLocality": "Oulu", "addressCountry": "Finland"}));
        assert_eq!(encode_address(&object).as_deref(), Some("Oulu, Finland"));
    }

    #[test]
    fn address_without_country_gets_placeholder() {
        assert_eq!(
            Value::Object(decode_address("Oulu")),
            json!({"addressLocality": "Oulu", "addressCountry": "??"})
        );
    }

    #[test]
    fn address_splits_at_first_comma_only() {
        assert_eq!(
            Value::Object(decode_address("Espoo ,Uusimaa, Finland")),
            json!({"addressLocality": "Espoo", "addressCountry": "Uusimaa, Finland"})
        );
    }

    #[test]
    fn empty_address_object_has_no_text() {
        assert_eq!(encode_address(&Map::new()), None);
        assert_eq!(display_text("address", &json!({})), None);
    }

    #[test]
    fn registration_date_is_rendered() {
        assert_eq!(
            display_text("registrationdate", &json!(1_362_015_937)).as_deref(),
            Some("28.2.2013 at 1:45:37")
        );
        assert_eq!(
            display_text("registrationdate", &json!("oops")).as_deref(),
            Some("oops")
        );
    }

    #[test]
    fn unregistered_fields_use_scalar_text() {
        assert_eq!(display_text("nickname", &json!("Mystery")).as_deref(), Some("Mystery"));
        assert_eq!(display_text("age", &json!(27)).as_deref(), Some("27"));
        assert_eq!(display_text("nickname", &Value::Null), None);
        assert_eq!(structured("nickname").map(|_| ()), None);
    }
}
