//! Extraction results.
//!
//! An [`Extraction`] is what one pipeline invocation produces. Its record,
//! when present, always carries exactly the schema's field set in schema
//! order, even on fallback.

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Value of one extracted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Whole number.
    Integer(i64),
    /// Free text.
    Text(String),
    /// List of strings.
    TextList(Vec<String>),
}

impl FieldValue {
    /// Returns the text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the integer, if this is an integer value.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the items, if this is a list value.
    #[must_use]
    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            Self::TextList(items) => Some(items),
            _ => None,
        }
    }

    /// Converts to a JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Integer(n) => Value::from(*n),
            Self::Text(text) => Value::String(text.clone()),
            Self::TextList(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(text) => write!(f, "{text}"),
            Self::TextList(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

/// Field values keyed by field name, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    entries: Vec<(String, FieldValue)>,
}

impl Record {
    /// Builds a record from `(name, value)` pairs.
    #[must_use]
    pub fn from_entries(entries: Vec<(String, FieldValue)>) -> Self {
        Self { entries }
    }

    /// Looks up a field value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Text value of a field.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Integer value of a field.
    #[must_use]
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FieldValue::as_integer)
    }

    /// List value of a field.
    #[must_use]
    pub fn text_list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(FieldValue::as_text_list)
    }

    /// Field names in schema order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts to a JSON object with keys in schema order.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        Value::Object(map)
    }

    /// Deserializes the record into a typed struct.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaValidation`] if the record does not fit `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.to_json())
            .map_err(|e| Error::schema_validation("record", e.to_string()))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Outcome of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The reply produced a record that satisfies the schema.
    Complete(Record),
    /// Parsing or the model call failed; every field holds its default.
    Fallback {
        /// Default-valued record.
        record: Record,
        /// What went wrong.
        error: Error,
    },
    /// Nothing usable was produced.
    Unavailable {
        /// What went wrong.
        error: Error,
    },
}

impl Extraction {
    /// The record, for complete and fallback outcomes.
    #[must_use]
    pub const fn record(&self) -> Option<&Record> {
        match self {
            Self::Complete(record) | Self::Fallback { record, .. } => Some(record),
            Self::Unavailable { .. } => None,
        }
    }

    /// Consumes the outcome and returns its record, if any.
    #[must_use]
    pub fn into_record(self) -> Option<Record> {
        match self {
            Self::Complete(record) | Self::Fallback { record, .. } => Some(record),
            Self::Unavailable { .. } => None,
        }
    }

    /// The error descriptor, for fallback and unavailable outcomes.
    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        match self {
            Self::Complete(_) => None,
            Self::Fallback { error, .. } | Self::Unavailable { error } => Some(error),
        }
    }

    /// Returns `true` for [`Extraction::Complete`].
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// Returns `true` for [`Extraction::Fallback`].
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Returns `true` for [`Extraction::Unavailable`].
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Short outcome label for logs.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Complete(_) => "complete",
            Self::Fallback { .. } => "fallback",
            Self::Unavailable { .. } => "unavailable",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record::from_entries(vec![
            ("name".to_owned(), FieldValue::Text("Ada".to_owned())),
            ("years".to_owned(), FieldValue::Integer(6)),
            (
                "skills".to_owned(),
                FieldValue::TextList(vec!["Rust".to_owned(), "SQL".to_owned()]),
            ),
        ])
    }

    #[test]
    fn accessors() {
        let record = sample();
        assert_eq!(record.text("name"), Some("Ada"));
        assert_eq!(record.integer("years"), Some(6));
        assert_eq!(record.text_list("skills").map(<[String]>::len), Some(2));
        assert_eq!(record.text("years"), None);
        assert!(record.get("missing").is_none());
        assert_eq!(record.field_names().collect::<Vec<_>>(), ["name", "years", "skills"]);
    }

    #[test]
    fn json_keeps_schema_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"name":"Ada","years":6,"skills":["Rust","SQL"]}"#);
        assert_eq!(serde_json::to_string(&sample().to_json()).unwrap(), json);
    }

    #[test]
    fn deserialize_into_struct() {
        #[derive(Deserialize)]
        struct Person {
            name: String,
            years: u32,
            skills: Vec<String>,
        }

        let person: Person = sample().deserialize().unwrap();
        assert_eq!(person.name, "Ada");
        assert_eq!(person.years, 6);
        assert_eq!(person.skills, ["Rust", "SQL"]);
    }

    #[test]
    fn deserialize_mismatch_is_schema_error() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Wrong {
            name: i64,
        }

        let err = sample().deserialize::<Wrong>().unwrap_err();
        assert!(matches!(err, Error::SchemaValidation { .. }));
    }

    #[test]
    fn outcome_accessors() {
        let complete = Extraction::Complete(sample());
        assert!(complete.is_complete());
        assert!(complete.error().is_none());
        assert_eq!(complete.outcome(), "complete");

        let fallback = Extraction::Fallback {
            record: sample(),
            error: Error::malformed_reply("broken"),
        };
        assert!(fallback.is_fallback());
        assert!(fallback.record().is_some());
        assert!(fallback.error().is_some());

        let unavailable = Extraction::Unavailable {
            error: Error::malformed_reply("broken"),
        };
        assert!(unavailable.is_unavailable());
        assert!(unavailable.record().is_none());
        assert!(unavailable.into_record().is_none());
    }

    #[test]
    fn display_values() {
        assert_eq!(FieldValue::Integer(3).to_string(), "3");
        assert_eq!(
            FieldValue::TextList(vec!["a".to_owned(), "b".to_owned()]).to_string(),
            "a, b"
        );
    }
}
