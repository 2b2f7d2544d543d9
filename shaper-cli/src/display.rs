//! Human-readable rendering of task results.

use std::fmt::Write;

use shaper::tasks::{ResumeExtraction, ReviewAnalysis, Sentiment, Transformed};

const RULE: &str = "==================================================";

/// Renders a transformed paragraph.
pub fn transformation(out: &Transformed) -> String {
    let t = &out.transformation;
    let mut s = String::new();
    let _ = writeln!(s, "{RULE}\nSUMMARY\n{RULE}\n{}\n", t.summary);
    let _ = writeln!(s, "TONE: {}\n", t.tone);
    let _ = writeln!(s, "{RULE}\nIMPROVED VERSION\n{RULE}\n{}", t.improved_version);
    if let Some(error) = &out.error {
        let _ = writeln!(s, "\nwarning: no structured output ({error})");
    }
    s
}

/// Renders an extracted resume as pretty JSON followed by a summary.
///
/// # Errors
///
/// Returns the serializer error if the JSON cannot be produced.
pub fn resume(out: &ResumeExtraction) -> serde_json::Result<String> {
    let info = &out.info;
    let mut s = serde_json::to_string_pretty(&out.to_json())?;
    s.push_str("\n\n");
    let _ = writeln!(s, "Name:       {}", info.name);
    let _ = writeln!(s, "Email:      {}", info.email);
    let _ = writeln!(s, "Experience: {} year(s)", info.experience_years);
    let _ = writeln!(s, "Skills:     {}", info.skills.len());
    let _ = writeln!(s, "Education:  {}", info.education.len());
    if let Some(error) = &out.extraction_error {
        let _ = writeln!(s, "\nwarning: extraction failed ({error})");
    }
    Ok(s)
}

/// Renders a review analysis, or a notice when none was produced.
pub fn review(index: usize, analysis: Option<&ReviewAnalysis>) -> String {
    let mut s = format!("{RULE}\nREVIEW #{index}\n{RULE}\n");
    let Some(a) = analysis else {
        s.push_str("No structured output could be generated.\n");
        return s;
    };

    let marker = match a.sentiment {
        Sentiment::Positive => "+",
        Sentiment::Negative => "-",
        Sentiment::Neutral => "~",
    };
    let _ = writeln!(s, "Sentiment: [{marker}] {}", a.sentiment);
    let _ = writeln!(s, "Rating:    {} ({}/5)", stars(a.rating), a.rating);
    list(&mut s, "Key features", &a.key_features);
    list(&mut s, "Improvement suggestions", &a.improvement_suggestions);
    s
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn list(s: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(s, "\n{title}:");
    if items.is_empty() {
        s.push_str("  (none)\n");
    }
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(s, "  {}. {item}", i + 1);
    }
}
