//! Plain-text section parsing.
//!
//! A header counts only at the start of a line (leading spaces and tabs
//! allowed). Each field's content runs from the end of its header to the
//! next header of any field, or to the end of the reply.

use tracing::warn;

use crate::error::{Error, Result};
use crate::extraction::{FieldValue, Record};
use crate::schema::{FieldSpec, FieldType, Schema};

const BULLETS: [char; 3] = ['-', '*', '•'];

/// Splits `raw` on the schema's section headers.
///
/// A missing header yields the field's default value. A reply containing
/// none of the headers is malformed.
///
/// # Errors
///
/// Returns [`Error::MalformedReply`] if no header occurs, and
/// [`Error::SchemaValidation`] if an integer section does not parse.
pub fn parse_sections(raw: &str, schema: &Schema) -> Result<Record> {
    let headers: Vec<String> = schema.fields().iter().map(FieldSpec::header).collect();
    let marks = header_marks(raw, &headers);

    if marks.is_empty() {
        return Err(Error::malformed_reply(format!(
            "none of the expected section headers ({}) found",
            headers.join(", ")
        )));
    }

    let mut entries = Vec::with_capacity(headers.len());
    for (i, (field, header)) in schema.fields().iter().zip(&headers).enumerate() {
        let value = match section(raw, i, header, &marks) {
            Some(content) => coerce(field, content)?,
            None => {
                warn!(header = %header, "section header missing from reply");
                field.kind.default_value()
            }
        };
        entries.push((field.name.clone(), value));
    }
    Ok(Record::from_entries(entries))
}

/// Byte offsets of headers that open a line, as `(offset, header index)`
/// in reply order.
fn header_marks(raw: &str, headers: &[String]) -> Vec<(usize, usize)> {
    let mut marks = Vec::new();
    let mut offset = 0;
    for line in raw.split_inclusive('\n') {
        let body = line.trim_start_matches([' ', '\t']);
        let indent = line.len() - body.len();
        if let Some(i) = headers.iter().position(|h| body.starts_with(h.as_str())) {
            marks.push((offset + indent, i));
        }
        offset += line.len();
    }
    marks
}

fn section<'a>(
    raw: &'a str,
    index: usize,
    header: &str,
    marks: &[(usize, usize)],
) -> Option<&'a str> {
    let start = marks.iter().find(|(_, i)| *i == index)?.0 + header.len();
    let end = marks
        .iter()
        .map(|(offset, _)| *offset)
        .find(|offset| *offset >= start)
        .unwrap_or(raw.len());
    Some(raw[start..end].trim())
}

fn coerce(field: &FieldSpec, content: &str) -> Result<FieldValue> {
    match field.kind {
        FieldType::Text => Ok(FieldValue::Text(content.to_owned())),
        FieldType::Integer => content.parse().map(FieldValue::Integer).map_err(|_| {
            Error::schema_validation(&field.name, format!("'{content}' is not an integer"))
        }),
        FieldType::TextList => Ok(FieldValue::TextList(
            content
                .lines()
                .map(|line| line.trim().trim_start_matches(BULLETS).trim())
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect(),
        )),
    }
}
