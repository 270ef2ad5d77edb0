use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, Result};

use crate::links::ProblemRef;

pub const NOT_FOUND: &str = "Not found";

const HEADER: &str = "problem_link,problem_id,topics";

/// One output row. `topics` is either the joined label list, the
/// `Not found` sentinel, or an `Error: <detail>` string.
#[derive(Debug, Clone)]
pub struct TopicRecord {
    pub problem_link: String,
    pub problem_id: String,
    pub topics: String,
}

impl TopicRecord {
    pub fn found(problem: &ProblemRef, topics: &[String]) -> Self {
        Self::new(problem, topics.join(", "))
    }

    pub fn not_found(problem: &ProblemRef) -> Self {
        Self::new(problem, NOT_FOUND.to_string())
    }

    pub fn error(problem: &ProblemRef, detail: &str) -> Self {
        Self::new(problem, format!("Error: {}", detail))
    }

    fn new(problem: &ProblemRef, topics: String) -> Self {
        Self {
            problem_link: problem.url.clone(),
            problem_id: problem.slug.clone(),
            topics,
        }
    }

    pub fn is_error(&self) -> bool {
        self.topics.starts_with("Error: ")
    }
}

/// Rewrite the whole results file. Called at every checkpoint, so the file
/// on disk always reflects the full sequence processed so far.
pub fn save_records(path: &Path, records: &[TopicRecord]) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let mut out = String::with_capacity(records.len() * 80 + HEADER.len() + 1);
    out.push_str(HEADER);
    out.push('\n');
    for r in records {
        out.push_str(&csv_field(&r.problem_link));
        out.push(',');
        out.push_str(&csv_field(&r.problem_id));
        out.push(',');
        out.push_str(&csv_field(&r.topics));
        out.push('\n');
    }

    std::fs::write(path, out)
        .with_context(|| format!("Failed to write results to {}", path.display()))
}

/// Minimal CSV quoting: quote only when the field contains a comma, quote,
/// or line break; embedded quotes are doubled.
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

// ── Tests ──
