//! Ready-made use cases.
//!
//! Each task fixes a schema, a template and a parse strategy:
//!
//! | Task | Entry point | Strategy | Temperature |
//! |------|-------------|----------|-------------|
//! | [`transformer`] | [`TextTransformer::transform`] | sections | 0.7 |
//! | [`resume`] | [`ResumeExtractor::extract`] | loose JSON | 0.0 |
//! | [`review`] | [`ReviewAnalyzer::analyze`] | strict JSON | 0.0 |

pub mod resume;
pub mod review;
pub mod transformer;

pub use resume::{ResumeExtraction, ResumeExtractor, ResumeInfo};
pub use review::{ReviewAnalysis, ReviewAnalyzer, Sentiment};
pub use transformer::{TextTransformation, TextTransformer, Transformed};

use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::extraction::Extraction;

/// Converts a tolerant-strategy outcome into a typed value plus the error, if
/// any. A record that fails typed conversion counts as a fallback.
fn typed_or_default<T: DeserializeOwned + Default>(extraction: Extraction) -> (T, Option<Error>) {
    match extraction {
        Extraction::Complete(record) => match record.deserialize() {
            Ok(value) => (value, None),
            Err(error) => (T::default(), Some(error)),
        },
        Extraction::Fallback { record, error } => {
            (record.deserialize().unwrap_or_default(), Some(error))
        }
        Extraction::Unavailable { error } => (T::default(), Some(error)),
    }
}
