//! Output schemas.
//!
//! A [`Schema`] lists the fields a model reply must yield, in order. It is
//! built once through [`SchemaBuilder`], which rejects inconsistent
//! definitions, and is immutable afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use shaper::schema::{FieldSpec, Schema};
//!
//! let schema = Schema::builder("review")
//!     .field(FieldSpec::text("sentiment", "Overall sentiment")
//!         .one_of(["Positive", "Negative", "Neutral"]))
//!     .field(FieldSpec::integer("rating", "Rating").range(1, 5))
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extraction::{FieldValue, Record};

/// Kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free text.
    Text,
    /// Whole number.
    Integer,
    /// List of strings.
    TextList,
}

impl FieldType {
    /// JSON schema type name.
    #[must_use]
    pub const fn json_type(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Integer => "integer",
            Self::TextList => "array",
        }
    }

    /// Value used when a field cannot be extracted.
    #[must_use]
    pub const fn default_value(self) -> FieldValue {
        match self {
            Self::Text => FieldValue::Text(String::new()),
            Self::Integer => FieldValue::Integer(0),
            Self::TextList => FieldValue::TextList(Vec::new()),
        }
    }

    /// Returns `true` if `value` has this type.
    #[must_use]
    pub const fn matches(self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (Self::Text, FieldValue::Text(_))
                | (Self::Integer, FieldValue::Integer(_))
                | (Self::TextList, FieldValue::TextList(_))
        )
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::TextList => "list of text",
        })
    }
}

/// Restriction on the values a field accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Inclusive integer range.
    Range {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
    /// The value (or every list item) must be one of these strings.
    OneOf(Vec<String>),
}

impl Constraint {
    /// Inclusive integer range.
    #[must_use]
    pub const fn range(min: i64, max: i64) -> Self {
        Self::Range { min, max }
    }

    /// Closed set of allowed strings.
    #[must_use]
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Checks a value, returning the reason it is rejected.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the value violates the constraint.
    pub fn check(&self, value: &FieldValue) -> std::result::Result<(), String> {
        match (self, value) {
            (Self::Range { min, max }, FieldValue::Integer(n)) => {
                if n < min {
                    Err(format!("{n} is below the minimum {min}"))
                } else if n > max {
                    Err(format!("{n} is above the maximum {max}"))
                } else {
                    Ok(())
                }
            }
            (Self::OneOf(allowed), FieldValue::Text(text)) => check_member(allowed, text),
            (Self::OneOf(allowed), FieldValue::TextList(items)) => {
                items.iter().try_for_each(|item| check_member(allowed, item))
            }
            (Self::Range { .. }, _) => Err("range applies to integers only".to_owned()),
            (Self::OneOf(_), FieldValue::Integer(_)) => {
                Err("allowed values apply to text only".to_owned())
            }
        }
    }

    /// Wording used in format instructions.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Range { min, max } => format!("between {min} and {max} inclusive"),
            Self::OneOf(allowed) => format!("one of: {}", allowed.join(", ")),
        }
    }

    const fn applies_to(&self, kind: FieldType) -> bool {
        match self {
            Self::Range { .. } => matches!(kind, FieldType::Integer),
            Self::OneOf(_) => matches!(kind, FieldType::Text | FieldType::TextList),
        }
    }
}

fn check_member(allowed: &[String], value: &str) -> std::result::Result<(), String> {
    if allowed.iter().any(|a| a == value) {
        Ok(())
    } else {
        Err(format!("'{value}' is not one of: {}", allowed.join(", ")))
    }
}

/// One named field of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name, also the JSON key.
    pub name: String,
    /// Value type.
    pub kind: FieldType,
    /// What the model should put here.
    pub description: String,
    /// Value restrictions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    /// Explicit section header; derived from the name when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

impl FieldSpec {
    /// Creates a field.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            constraints: Vec::new(),
            header: None,
        }
    }

    /// Creates a text field.
    #[must_use]
    pub fn text(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text, description)
    }

    /// Creates an integer field.
    #[must_use]
    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer, description)
    }

    /// Creates a list-of-text field.
    #[must_use]
    pub fn text_list(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, FieldType::TextList, description)
    }

    /// Adds a constraint.
    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Restricts an integer field to `min..=max`.
    #[must_use]
    pub fn range(self, min: i64, max: i64) -> Self {
        self.with_constraint(Constraint::range(min, max))
    }

    /// Restricts a text field to a closed set of values.
    #[must_use]
    pub fn one_of<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_constraint(Constraint::one_of(values))
    }

    /// Sets the section header.
    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Section header for this field.
    ///
    /// `improved_version` becomes `IMPROVED VERSION:` unless a header was set.
    #[must_use]
    pub fn header(&self) -> String {
        self.header
            .clone()
            .unwrap_or_else(|| format!("{}:", self.name.to_uppercase().replace('_', " ")))
    }

    /// Checks type and constraints of a value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaValidation`] naming this field.
    pub fn validate(&self, value: &FieldValue) -> Result<()> {
        if !self.kind.matches(value) {
            return Err(Error::schema_validation(
                &self.name,
                format!("expected {}", self.kind),
            ));
        }
        for constraint in &self.constraints {
            constraint
                .check(value)
                .map_err(|reason| Error::schema_validation(&self.name, reason))?;
        }
        Ok(())
    }
}

/// Ordered set of fields a reply must yield.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    name: String,
    description: String,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Starts building a schema.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            description: String::new(),
            fields: Vec::new(),
        }
    }

    /// Schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Fields in order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always `false`; a built schema has at least one field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Record with every field set to its type's default.
    #[must_use]
    pub fn default_record(&self) -> Record {
        Record::from_entries(
            self.fields
                .iter()
                .map(|f| (f.name.clone(), f.kind.default_value()))
                .collect(),
        )
    }

    /// Validates every field of `record` against this schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaValidation`] for the first missing or invalid field.
    pub fn validate(&self, record: &Record) -> Result<()> {
        for field in &self.fields {
            let value = record
                .get(&field.name)
                .ok_or_else(|| Error::schema_validation(&field.name, "missing"))?;
            field.validate(value)?;
        }
        Ok(())
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    description: String,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Finishes the schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the schema has no fields, a field
    /// name is empty or repeated, a header is empty or contains another
    /// field's header, or a constraint does not fit its field.
    pub fn build(self) -> Result<Schema> {
        if self.name.trim().is_empty() {
            return Err(Error::configuration("schema name cannot be empty"));
        }
        if self.fields.is_empty() {
            return Err(Error::configuration(format!(
                "schema '{}' has no fields",
                self.name
            )));
        }

        for (i, field) in self.fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(Error::configuration(format!(
                    "schema '{}' has a field with an empty name",
                    self.name
                )));
            }
            let earlier = &self.fields[..i];
            if earlier.iter().any(|f| f.name == field.name) {
                return Err(Error::configuration(format!(
                    "schema '{}' repeats field '{}'",
                    self.name, field.name
                )));
            }
            let header = field.header();
            if header.trim().is_empty() {
                return Err(Error::configuration(format!(
                    "schema '{}' has an empty header for '{}'",
                    self.name, field.name
                )));
            }
            // Overlapping headers cannot be told apart in a reply.
            if let Some(other) = earlier
                .iter()
                .map(FieldSpec::header)
                .find(|h| h.contains(&header) || header.contains(h.as_str()))
            {
                return Err(Error::configuration(format!(
                    "schema '{}' has overlapping headers '{other}' and '{header}'",
                    self.name
                )));
            }
            for constraint in &field.constraints {
                check_constraint(&self.name, field, constraint)?;
            }
        }

        Ok(Schema {
            name: self.name,
            description: self.description,
            fields: self.fields,
        })
    }
}

fn check_constraint(schema: &str, field: &FieldSpec, constraint: &Constraint) -> Result<()> {
    if !constraint.applies_to(field.kind) {
        return Err(Error::configuration(format!(
            "schema '{schema}': constraint on '{}' does not fit a {} field",
            field.name, field.kind
        )));
    }
    match constraint {
        Constraint::Range { min, max } if min > max => Err(Error::configuration(format!(
            "schema '{schema}': empty range {min}..={max} on '{}'",
            field.name
        ))),
        Constraint::OneOf(allowed) if allowed.is_empty() => Err(Error::configuration(format!(
            "schema '{schema}': no allowed values on '{}'",
            field.name
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn review() -> Schema {
        Schema::builder("review")
            .field(
                FieldSpec::text("sentiment", "Overall sentiment")
                    .with_constraint(Constraint::one_of(["Positive", "Negative", "Neutral"])),
            )
            .field(FieldSpec::integer("rating", "Rating").with_constraint(Constraint::range(1, 5)))
            .field(FieldSpec::text_list("key_features", "Features"))
            .build()
            .unwrap()
    }

    #[test]
    fn header_derivation() {
        assert_eq!(FieldSpec::text("improved_version", "").header(), "IMPROVED VERSION:");
        assert_eq!(FieldSpec::text("tone", "").header(), "TONE:");
        assert_eq!(
            FieldSpec::text("tone", "").with_header("Tone ->").header(),
            "Tone ->"
        );
    }

    #[test]
    fn default_record_follows_schema_order() {
        let record = review().default_record();
        assert_eq!(
            record.field_names().collect::<Vec<_>>(),
            ["sentiment", "rating", "key_features"]
        );
        assert_eq!(record.text("sentiment"), Some(""));
        assert_eq!(record.integer("rating"), Some(0));
        assert_eq!(record.text_list("key_features"), Some(&[][..]));
    }

    #[test]
    fn range_check() {
        let c = Constraint::range(1, 5);
        assert!(c.check(&FieldValue::Integer(1)).is_ok());
        assert!(c.check(&FieldValue::Integer(5)).is_ok());
        assert_eq!(
            c.check(&FieldValue::Integer(6)).unwrap_err(),
            "6 is above the maximum 5"
        );
        assert_eq!(
            c.check(&FieldValue::Integer(0)).unwrap_err(),
            "0 is below the minimum 1"
        );
    }

    #[test]
    fn one_of_check_is_exact() {
        let c = Constraint::one_of(["Positive", "Negative"]);
        assert!(c.check(&FieldValue::Text("Positive".into())).is_ok());
        assert!(c.check(&FieldValue::Text("positive".into())).is_err());
        assert!(
            c.check(&FieldValue::TextList(vec!["Positive".into(), "Other".into()]))
                .is_err()
        );
    }

    #[test]
    fn field_validate_reports_field() {
        let schema = review();
        let rating = schema.field("rating").unwrap();
        let err = rating.validate(&FieldValue::Integer(6)).unwrap_err();
        assert!(matches!(err, Error::SchemaValidation { ref field, .. } if field == "rating"));

        let err = rating.validate(&FieldValue::Text("5".into())).unwrap_err();
        assert!(matches!(err, Error::SchemaValidation { ref reason, .. } if reason == "expected integer"));
    }

    #[test]
    fn schema_validate_detects_missing() {
        let schema = review();
        let partial = Record::from_entries(vec![(
            "sentiment".to_owned(),
            FieldValue::Text("Positive".into()),
        )]);
        let err = schema.validate(&partial).unwrap_err();
        assert!(matches!(err, Error::SchemaValidation { ref field, .. } if field == "rating"));
    }

    #[test]
    fn builder_rejects_bad_definitions() {
        let dup = Schema::builder("s")
            .field(FieldSpec::text("a", ""))
            .field(FieldSpec::integer("a", ""))
            .build();
        assert!(matches!(dup, Err(Error::Configuration(_))));

        assert!(Schema::builder("s").build().is_err());
        assert!(Schema::builder("").field(FieldSpec::text("a", "")).build().is_err());
        assert!(Schema::builder("s").field(FieldSpec::text(" ", "")).build().is_err());

        let misplaced = Schema::builder("s")
            .field(FieldSpec::text("a", "").with_constraint(Constraint::range(1, 5)))
            .build();
        assert!(misplaced.is_err());

        let empty_range = Schema::builder("s")
            .field(FieldSpec::integer("a", "").with_constraint(Constraint::range(5, 1)))
            .build();
        assert!(empty_range.is_err());

        let same_header = Schema::builder("s")
            .field(FieldSpec::text("a", "").with_header("X:"))
            .field(FieldSpec::text("b", "").with_header("X:"))
            .build();
        assert!(same_header.is_err());
    }

    #[test]
    fn build_rejects_nested_headers() {
        let err = Schema::builder("s")
            .field(FieldSpec::text("executive_summary", ""))
            .field(FieldSpec::text("summary", ""))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(ref m) if m.contains("overlapping headers")));

        let reversed = Schema::builder("s")
            .field(FieldSpec::text("tone", ""))
            .field(FieldSpec::text("b", "").with_header("OVERALL TONE:"))
            .build();
        assert!(reversed.is_err());

        let blank = Schema::builder("s")
            .field(FieldSpec::text("a", "").with_header("  "))
            .build();
        assert!(blank.is_err());
    }
}
