//! Integration tests for shaper pipelines.

#![allow(clippy::unwrap_used, clippy::panic, clippy::clone_on_ref_ptr)]

use std::sync::Arc;

use shaper::prelude::*;
use shaper::tasks::{resume, review, transformer};

fn review_pipeline(mock: Arc<MockProvider>, strategy: ParseStrategy) -> Pipeline {
    Pipeline::builder("review")
        .schema(review::schema().unwrap())
        .template(PromptTemplate::new("review", review::TEMPLATE, "review"))
        .strategy(strategy)
        .provider(mock)
        .build()
        .unwrap()
}

const FENCED_REVIEW: &str = "Here you go:\n```json\n{\"sentiment\":\"Positive\",\"rating\":5,\"key_features\":[\"sound\"],\"improvement_suggestions\":[]}\n```";

const RATING_SIX: &str = r#"{"sentiment":"Positive","rating":6,"key_features":["sound"],"improvement_suggestions":[]}"#;

#[test]
fn format_instructions_are_deterministic() {
    let schemas = [
        transformer::schema().unwrap(),
        resume::schema().unwrap(),
        review::schema().unwrap(),
    ];
    for schema in &schemas {
        for style in [FormatStyle::Sections, FormatStyle::Json] {
            let first = format_instructions(schema, style);
            let second = format_instructions(&schema.clone(), style);
            assert_eq!(first, second);
            for field in schema.fields() {
                assert!(first.contains(&field.description), "{}", field.name);
            }
        }
    }
}

#[tokio::test]
async fn blank_input_fails_before_any_call() {
    let mock = Arc::new(MockProvider::new([FENCED_REVIEW]));
    let transformer = TextTransformer::new(mock.clone()).unwrap();
    let extractor = ResumeExtractor::new(mock.clone()).unwrap();
    let analyzer = ReviewAnalyzer::new(mock.clone()).unwrap();

    for blank in ["", " ", "\n\t\r\n"] {
        assert!(matches!(transformer.transform(blank).await, Err(Error::InvalidInput(_))));
        assert!(matches!(extractor.extract(blank).await, Err(Error::InvalidInput(_))));
        assert!(matches!(analyzer.analyze(blank).await, Err(Error::InvalidInput(_))));
    }
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn sections_end_to_end() {
    let reply = "SUMMARY:\nShort text.\n\nTONE:\nCasual\n\nIMPROVED VERSION:\nBetter text.";
    let mock = Arc::new(MockProvider::new([reply]));
    let out = TextTransformer::new(mock.clone())
        .unwrap()
        .transform("the meeting was like super long")
        .await
        .unwrap();

    assert_eq!(
        out.transformation,
        TextTransformation {
            summary: "Short text.".to_owned(),
            tone: "Casual".to_owned(),
            improved_version: "Better text.".to_owned(),
        }
    );
    assert!(out.error.is_none());
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn sections_missing_header_is_empty_without_error() {
    let reply = "SUMMARY:\nShort text.\n\nIMPROVED VERSION:\nBetter text.";
    let mock = Arc::new(MockProvider::new([reply]));
    let out = TextTransformer::new(mock).unwrap().transform("text").await.unwrap();

    assert_eq!(out.transformation.summary, "Short text.");
    assert_eq!(out.transformation.tone, "");
    assert_eq!(out.transformation.improved_version, "Better text.");
    assert!(out.error.is_none());
}

#[tokio::test]
async fn loose_json_fenced_object() {
    let reply = "```json\n{\"name\":\"John Doe\",\"email\":\"john.doe@email.com\",\"skills\":[\"Python\",\"SQL\"],\"experience_years\":6,\"education\":[\"B.S. Computer Science\"]}\n```";
    let mock = Arc::new(MockProvider::new([reply]));
    let out = ResumeExtractor::new(mock).unwrap().extract("resume").await.unwrap();

    assert_eq!(
        out.info,
        ResumeInfo {
            name: "John Doe".to_owned(),
            email: "john.doe@email.com".to_owned(),
            skills: vec!["Python".to_owned(), "SQL".to_owned()],
            experience_years: 6,
            education: vec!["B.S. Computer Science".to_owned()],
        }
    );
    assert!(out.extraction_error.is_none());
}

#[tokio::test]
async fn loose_json_invalid_is_documented_fallback() {
    let mock = Arc::new(MockProvider::new(["{\"name\": \"John\", \"skills\": [,]}"]));
    let pipeline = Pipeline::builder("extract")
        .schema(resume::schema().unwrap())
        .template(PromptTemplate::new("extract", resume::TEMPLATE, "resume_text"))
        .strategy(ParseStrategy::LooseJson)
        .provider(mock)
        .build()
        .unwrap();

    let extraction = pipeline.run("resume").await.unwrap();
    let Extraction::Fallback { record, error } = extraction else {
        panic!("expected fallback");
    };
    assert_eq!(record, pipeline.schema().default_record());
    assert_eq!(
        record.to_json(),
        serde_json::json!({
            "name": "",
            "email": "",
            "skills": [],
            "experience_years": 0,
            "education": []
        })
    );
    assert!(matches!(error, Error::MalformedReply(_)));
}

#[tokio::test]
async fn strict_out_of_bound_rating_is_unavailable_not_fallback() {
    let mock = Arc::new(MockProvider::new([RATING_SIX]));

    let strict = review_pipeline(mock.clone(), ParseStrategy::StrictJson)
        .run("review")
        .await
        .unwrap();
    assert!(strict.is_unavailable());
    assert!(strict.record().is_none());
    assert!(matches!(
        strict.error(),
        Some(Error::SchemaValidation { field, .. }) if field == "rating"
    ));

    let loose = review_pipeline(mock, ParseStrategy::LooseJson)
        .run("review")
        .await
        .unwrap();
    assert!(loose.is_complete());
    assert_eq!(loose.record().unwrap().integer("rating"), Some(6));
}

#[tokio::test]
async fn strict_fenced_reply_end_to_end() {
    let mock = Arc::new(MockProvider::new([FENCED_REVIEW]));
    let analysis = ReviewAnalyzer::new(mock)
        .unwrap()
        .analyze("These headphones sound amazing.")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(analysis.rating, 5);
    assert_eq!(analysis.sentiment, Sentiment::Positive);
    assert_eq!(analysis.key_features, ["sound"]);
    assert!(analysis.improvement_suggestions.is_empty());
}

#[test]
fn parsing_twice_yields_identical_results() {
    let schema = review::schema().unwrap();
    for strategy in [
        ParseStrategy::Sections,
        ParseStrategy::LooseJson,
        ParseStrategy::StrictJson,
    ] {
        for raw in [FENCED_REVIEW, RATING_SIX, "garbage", "SENTIMENT: Positive"] {
            assert_eq!(strategy.parse(raw, &schema), strategy.parse(raw, &schema));
        }
    }
}

#[tokio::test]
async fn upstream_failures_follow_strategy() {
    let mock = Arc::new(MockProvider::failing(LlmError::auth("mock", "invalid key")));

    let out = TextTransformer::new(mock.clone()).unwrap().transform("text").await.unwrap();
    assert!(matches!(out.error, Some(Error::Upstream(LlmError::Auth { .. }))));

    let out = ResumeExtractor::new(mock.clone()).unwrap().extract("resume").await.unwrap();
    assert_eq!(out.info, ResumeInfo::default());
    assert!(out.extraction_error.unwrap().contains("invalid key"));

    let out = ReviewAnalyzer::new(mock.clone()).unwrap().analyze("review").await.unwrap();
    assert!(out.is_none());

    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn one_call_per_run_and_runs_are_independent() {
    let mock = Arc::new(MockProvider::new([FENCED_REVIEW, RATING_SIX]));
    let analyzer = Arc::new(ReviewAnalyzer::new(mock.clone()).unwrap());

    let first = analyzer.analyze("one").await.unwrap();
    let second = analyzer.analyze("two").await.unwrap();
    let third = analyzer.analyze("three").await.unwrap();

    assert!(first.is_some());
    assert!(second.is_none());
    assert!(third.is_some());
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn concurrent_runs_share_one_pipeline() {
    let mock = Arc::new(MockProvider::new([FENCED_REVIEW]));
    let analyzer = Arc::new(ReviewAnalyzer::new(mock.clone()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let analyzer = analyzer.clone();
            tokio::spawn(async move { analyzer.analyze(&format!("review {i}")).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().unwrap().rating, 5);
    }
    assert_eq!(mock.call_count(), 8);
}

#[tokio::test]
async fn prompt_embeds_trimmed_text_and_instructions() {
    let mock = Arc::new(MockProvider::new([FENCED_REVIEW]));
    let analyzer = ReviewAnalyzer::new(mock.clone()).unwrap();
    analyzer.analyze("\n  Great coffee maker.  \n").await.unwrap();

    let request = mock.last_request().await.unwrap();
    let prompt = &request.messages[0].content;
    assert!(prompt.contains("\"\"\"Great coffee maker.\"\"\""));
    assert!(prompt.contains(analyzer.pipeline().instructions()));
    assert_eq!(request.temperature, Some(review::DEFAULT_TEMPERATURE));
}
