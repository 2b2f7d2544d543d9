//! JSON reply parsing.
//!
//! The object is located between the first `{` and the last `}` of the
//! reply, which strips surrounding prose and markdown fences.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::extraction::{FieldValue, Record};
use crate::schema::{FieldSpec, FieldType, Schema};

/// Extracts and parses the JSON object embedded in `raw`.
///
/// # Errors
///
/// Returns [`Error::MalformedReply`] if there is no brace-delimited span, it
/// is not valid JSON, or it is not an object.
pub fn extract_object(raw: &str) -> Result<Map<String, Value>> {
    let start = raw
        .find('{')
        .ok_or_else(|| Error::malformed_reply("no JSON object found in reply"))?;
    let end = raw
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| Error::malformed_reply("unterminated JSON object in reply"))?;

    match serde_json::from_str::<Value>(&raw[start..=end])? {
        Value::Object(map) => Ok(map),
        other => Err(Error::malformed_reply(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
    }
}

/// Type-checks `object` against `schema`, producing a record in schema order.
///
/// Keys not in the schema are ignored.
///
/// # Errors
///
/// Returns [`Error::SchemaValidation`] for the first missing or mistyped field.
pub fn decode_record(object: &Map<String, Value>, schema: &Schema) -> Result<Record> {
    let mut entries = Vec::with_capacity(schema.len());
    for field in schema.fields() {
        let value = object
            .get(&field.name)
            .ok_or_else(|| Error::schema_validation(&field.name, "missing"))?;
        entries.push((field.name.clone(), decode_value(field, value)?));
    }
    Ok(Record::from_entries(entries))
}

fn decode_value(field: &FieldSpec, value: &Value) -> Result<FieldValue> {
    let mismatch = || {
        Error::schema_validation(
            &field.name,
            format!("expected {}, got {}", field.kind, kind_of(value)),
        )
    };

    match (field.kind, value) {
        (FieldType::Text, Value::String(text)) => Ok(FieldValue::Text(text.clone())),
        (FieldType::Integer, Value::Number(n)) => {
            n.as_i64().map(FieldValue::Integer).ok_or_else(mismatch)
        }
        (FieldType::TextList, Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_owned))
            .collect::<Option<Vec<_>>>()
            .map(FieldValue::TextList)
            .ok_or_else(mismatch),
        _ => Err(mismatch()),
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::builder("resume")
            .field(FieldSpec::text("name", "Name"))
            .field(FieldSpec::integer("experience_years", "Years"))
            .field(FieldSpec::text_list("skills", "Skills"))
            .build()
            .unwrap()
    }

    #[test]
    fn strips_fences_and_prose() {
        let raw = "Sure! Here it is:\n```json\n{\"a\": 1}\n```\nHope that helps.";
        let object = extract_object(raw).unwrap();
        assert_eq!(object["a"], 1);
    }

    #[test]
    fn missing_or_broken_object_is_malformed() {
        for raw in ["no json here", "} backwards {", "{\"a\": }", "{ \"a\": 1"] {
            let err = extract_object(raw).unwrap_err();
            assert!(matches!(err, Error::MalformedReply(_)), "{raw}");
        }
    }

    #[test]
    fn decodes_in_schema_order_and_ignores_extra_keys() {
        let object = extract_object(
            r#"{"skills":["Rust"],"extra":true,"experience_years":5,"name":"John Doe"}"#,
        )
        .unwrap();
        let record = decode_record(&object, &schema()).unwrap();
        assert_eq!(
            record.field_names().collect::<Vec<_>>(),
            ["name", "experience_years", "skills"]
        );
        assert_eq!(record.integer("experience_years"), Some(5));
        assert!(record.get("extra").is_none());
    }

    #[test]
    fn type_mismatches() {
        let cases = [
            (r#"{"name":"x","experience_years":5,"skills":"Rust"}"#, "skills"),
            (r#"{"name":"x","experience_years":"5","skills":[]}"#, "experience_years"),
            (r#"{"name":"x","experience_years":5.5,"skills":[]}"#, "experience_years"),
            (r#"{"name":"x","experience_years":5,"skills":[1]}"#, "skills"),
            (r#"{"name":null,"experience_years":5,"skills":[]}"#, "name"),
            (r#"{"experience_years":5,"skills":[]}"#, "name"),
        ];
        for (raw, expected) in cases {
            let object = extract_object(raw).unwrap();
            let err = decode_record(&object, &schema()).unwrap_err();
            assert!(
                matches!(err, Error::SchemaValidation { ref field, .. } if field == expected),
                "{raw}: {err}"
            );
        }
    }
}
