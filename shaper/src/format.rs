//! Format instructions.
//!
//! [`format_instructions`] turns a [`Schema`] into the text that tells the
//! model what shape its reply must take. Equal schemas always produce
//! byte-identical instructions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::schema::{Constraint, FieldSpec, FieldType, Schema};

/// Reply syntax the model is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatStyle {
    /// Plain-text sections introduced by fixed headers.
    Sections,
    /// One JSON object.
    Json,
}

/// Builds the format instructions for `schema`.
#[must_use]
pub fn format_instructions(schema: &Schema, style: FormatStyle) -> String {
    match style {
        FormatStyle::Sections => sections_instructions(schema),
        FormatStyle::Json => json_instructions(schema),
    }
}

fn sections_instructions(schema: &Schema) -> String {
    let mut out = String::from(
        "Respond in plain text only. Do not use JSON, markdown, code blocks or any other special formatting.\n\
         Use exactly the section headers below, in this order, each on its own line, \
         and put each section's content on the lines that follow its header:\n",
    );

    for field in schema.fields() {
        out.push('\n');
        out.push_str(&field.header());
        out.push('\n');
        out.push_str(&field_hint(field));
        out.push('\n');
    }
    out
}

fn field_hint(field: &FieldSpec) -> String {
    let mut notes = Vec::new();
    match field.kind {
        FieldType::Text => {}
        FieldType::Integer => notes.push("a whole number".to_owned()),
        FieldType::TextList => notes.push("one item per line".to_owned()),
    }
    notes.extend(field.constraints.iter().map(Constraint::describe));

    if notes.is_empty() {
        field.description.clone()
    } else {
        format!("{} ({})", field.description, notes.join("; "))
    }
}

fn json_instructions(schema: &Schema) -> String {
    let described = serde_json::to_string_pretty(&json_schema(schema)).unwrap_or_default();
    let example = serde_json::to_string(&example_object(schema)).unwrap_or_default();

    format!(
        "The output must be a single JSON object that conforms to the JSON schema below.\n\
         Use exactly the listed keys, include every one of them and add no others.\n\
         Respond with the JSON object only, without explanations.\n\
         \n\
         Output schema:\n\
         ```json\n\
         {described}\n\
         ```\n\
         \n\
         Example of the expected shape:\n\
         {example}\n"
    )
}

/// JSON-Schema-like description of `schema`, keys in field order.
#[must_use]
pub fn json_schema(schema: &Schema) -> Value {
    let mut properties = Map::new();
    for field in schema.fields() {
        properties.insert(field.name.clone(), property(field));
    }
    let required: Vec<Value> = schema
        .fields()
        .iter()
        .map(|f| Value::String(f.name.clone()))
        .collect();

    let mut root = Map::new();
    root.insert("title".to_owned(), Value::String(schema.name().to_owned()));
    if !schema.description().is_empty() {
        root.insert(
            "description".to_owned(),
            Value::String(schema.description().to_owned()),
        );
    }
    root.insert("type".to_owned(), json!("object"));
    root.insert("properties".to_owned(), Value::Object(properties));
    root.insert("required".to_owned(), Value::Array(required));
    Value::Object(root)
}

fn property(field: &FieldSpec) -> Value {
    let mut prop = Map::new();
    prop.insert("type".to_owned(), json!(field.kind.json_type()));
    prop.insert("description".to_owned(), json!(field.description));
    if field.kind == FieldType::TextList {
        prop.insert("items".to_owned(), json!({ "type": "string" }));
    }

    for constraint in &field.constraints {
        match constraint {
            Constraint::Range { min, max } => {
                prop.insert("minimum".to_owned(), json!(min));
                prop.insert("maximum".to_owned(), json!(max));
            }
            Constraint::OneOf(allowed) if field.kind == FieldType::TextList => {
                prop.insert("items".to_owned(), json!({ "type": "string", "enum": allowed }));
            }
            Constraint::OneOf(allowed) => {
                prop.insert("enum".to_owned(), json!(allowed));
            }
        }
    }
    Value::Object(prop)
}

fn example_object(schema: &Schema) -> Value {
    let map: Map<String, Value> = schema
        .fields()
        .iter()
        .map(|f| (f.name.clone(), example_value(f)))
        .collect();
    Value::Object(map)
}

fn example_value(field: &FieldSpec) -> Value {
    let allowed = field.constraints.iter().find_map(|c| match c {
        Constraint::OneOf(allowed) => allowed.first().cloned(),
        Constraint::Range { .. } => None,
    });
    let minimum = field.constraints.iter().find_map(|c| match c {
        Constraint::Range { min, .. } => Some(*min),
        Constraint::OneOf(_) => None,
    });

    match field.kind {
        FieldType::Text => json!(allowed.unwrap_or_else(|| "...".to_owned())),
        FieldType::Integer => json!(minimum.unwrap_or(0)),
        FieldType::TextList => json!([allowed.unwrap_or_else(|| "...".to_owned())]),
    }
}
