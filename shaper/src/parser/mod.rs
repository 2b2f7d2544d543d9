//! Output parsing.
//!
//! [`ParseStrategy`] selects how a raw reply becomes an [`Extraction`]:
//!
//! | Strategy | Reply syntax | Constraints | On failure |
//! |----------|--------------|-------------|------------|
//! | [`Sections`](ParseStrategy::Sections) | labeled sections | not enforced | fallback |
//! | [`LooseJson`](ParseStrategy::LooseJson) | JSON object | not enforced | fallback |
//! | [`StrictJson`](ParseStrategy::StrictJson) | JSON object | enforced | unavailable |
//!
//! Parsing is a pure function of the reply and the schema.

pub mod json;
pub mod sections;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extraction::{Extraction, Record};
use crate::format::FormatStyle;
use crate::schema::Schema;

/// How replies are parsed and how failures are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    /// Fixed headers followed by free text. Missing headers give defaults.
    Sections,
    /// One JSON object, type-checked. Failures give a default-valued fallback.
    LooseJson,
    /// One JSON object, type- and constraint-checked. Failures give nothing.
    StrictJson,
}

impl ParseStrategy {
    /// Format instructions style matching this strategy.
    #[must_use]
    pub const fn format_style(self) -> FormatStyle {
        match self {
            Self::Sections => FormatStyle::Sections,
            Self::LooseJson | Self::StrictJson => FormatStyle::Json,
        }
    }

    /// Parses `raw`, converting failures into this strategy's recovery outcome.
    #[must_use]
    pub fn parse(self, raw: &str, schema: &Schema) -> Extraction {
        match self.try_parse(raw, schema) {
            Ok(record) => Extraction::Complete(record),
            Err(error) => self.recover(schema, error),
        }
    }

    /// Parses `raw` without recovery.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedReply`] for unparsable replies and
    /// [`Error::SchemaValidation`] for type or constraint violations.
    pub fn try_parse(self, raw: &str, schema: &Schema) -> Result<Record> {
        match self {
            Self::Sections => sections::parse_sections(raw, schema),
            Self::LooseJson => json::decode_record(&json::extract_object(raw)?, schema),
            Self::StrictJson => {
                let record = json::decode_record(&json::extract_object(raw)?, schema)?;
                schema.validate(&record)?;
                Ok(record)
            }
        }
    }

    /// Outcome for a failed call: fallback for the tolerant strategies,
    /// unavailable for [`StrictJson`](Self::StrictJson).
    #[must_use]
    pub fn recover(self, schema: &Schema, error: Error) -> Extraction {
        match self {
            Self::Sections | Self::LooseJson => Extraction::Fallback {
                record: schema.default_record(),
                error,
            },
            Self::StrictJson => Extraction::Unavailable { error },
        }
    }
}

impl std::fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Sections => "sections",
            Self::LooseJson => "loose_json",
            Self::StrictJson => "strict_json",
        })
    }
}
