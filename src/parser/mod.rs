pub mod chips;
pub mod embedded;
pub mod vocab;

use std::collections::HashSet;

use scraper::Html;

/// Ordered fallback heuristics against a rendered problem page. The first
/// pass that yields at least one label wins and later passes never run.
pub fn extract_topics(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    for pass in [chips::extract, vocab::extract, embedded::extract] {
        let found = pass(&doc);
        if !found.is_empty() {
            return dedup(found);
        }
    }
    Vec::new()
}

/// Drop duplicates keeping first-seen order, so identical pages always
/// produce identical label sequences.
fn dedup(topics: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    topics
        .into_iter()
        .filter(|topic| seen.insert(topic.clone()))
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chip_page_extracts_labels() {
        let html = std::fs::read_to_string("tests/fixtures/two-sum.html").unwrap();
        let topics = extract_topics(&html);
        assert_eq!(topics, vec!["Array", "Hash Table"]);
    }

    #[test]
    fn chips_win_short_circuits_later_passes() {
        // Vocabulary words and an embedded payload elsewhere in the page must
        // not leak into the result once the chip container matched.
        let html = r#"<html><body>
            <div>
                <span>Topics</span>
                <span class="tag">Two Pointers</span>
            </div>
            <div>Binary Search</div>
            <script>{"topicTags":[{"name":"Graph"}]}</script>
        </body></html>"#;
        assert_eq!(extract_topics(html), vec!["Two Pointers"]);
    }

    #[test]
    fn vocabulary_fallback_when_no_chips() {
        let html = r#"<html><body>
            <div class="sidebar"><span>Dynamic Programming</span></div>
            <div>unrelated prose</div>
        </body></html>"#;
        assert_eq!(extract_topics(html), vec!["Dynamic Programming"]);
    }

    #[test]
    fn embedded_fallback_when_nothing_rendered() {
        let html = std::fs::read_to_string("tests/fixtures/embedded-only.html").unwrap();
        assert_eq!(extract_topics(&html), vec!["Stack", "Monotonic Stack"]);
    }

    #[test]
    fn no_heuristic_matches_yields_empty() {
        let html = "<html><body><p>404 page</p></body></html>";
        assert!(extract_topics(html).is_empty());
    }

    #[test]
    fn winning_pass_is_deduplicated_in_order() {
        // Two "Topics" markers sharing one container double-collect the chips.
        let html = r#"<html><body><div>
            <span>Topics</span>
            <span>Topics</span>
            <span class="chip">Greedy</span>
            <span class="chip">Array</span>
        </div></body></html>"#;
        assert_eq!(extract_topics(html), vec!["Greedy", "Array"]);
    }
}
