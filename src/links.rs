use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// One problem page from the input list.
#[derive(Debug, Clone)]
pub struct ProblemRef {
    pub url: String,
    pub slug: String,
}

impl ProblemRef {
    pub fn from_url(url: &str) -> Self {
        Self {
            url: url.to_string(),
            slug: slug_from_url(url),
        }
    }
}

/// Derive the problem slug from its URL: everything after the final `/`.
/// No validation; a trailing slash yields an empty slug and a bare string
/// yields itself.
pub fn slug_from_url(url: &str) -> String {
    url.rsplit('/').next().unwrap_or(url).to_string()
}

/// Read the link list: one URL per non-empty line, file order preserved.
pub fn load_links(path: &Path) -> Result<Vec<ProblemRef>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read link list {}", path.display()))?;
    let links = parse_links(&text);
    info!("Loaded {} links from {}", links.len(), path.display());
    Ok(links)
}

fn parse_links(text: &str) -> Vec<ProblemRef> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ProblemRef::from_url)
        .collect()
}

// ── Tests ──
