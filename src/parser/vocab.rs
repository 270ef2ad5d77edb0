use std::sync::LazyLock;

use scraper::{Html, Selector};

static CANDIDATES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div, span").unwrap());

/// Closed vocabulary of common topic names. Matches are exact and
/// case-sensitive.
pub const KNOWN_TOPICS: &[&str] = &[
    "Array",
    "String",
    "Sorting",
    "Hash Table",
    "Math",
    "Dynamic Programming",
    "Tree",
    "Depth-First Search",
    "Binary Search",
    "Graph",
    "Binary Tree",
];

/// Known-label heuristic: collect any element whose full text is exactly one
/// of the vocabulary entries.
pub fn extract(doc: &Html) -> Vec<String> {
    doc.select(&CANDIDATES)
        .filter_map(|el| {
            let text = el.text().collect::<String>().trim().to_string();
            KNOWN_TOPICS.contains(&text.as_str()).then_some(text)
        })
        .collect()
}

// ── Tests ──
