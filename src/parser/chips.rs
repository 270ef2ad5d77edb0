use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static CANDIDATES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div, span").unwrap());

/// Class fragments that mark chip/badge styling on topic tags.
const CHIP_CLASS_HINTS: &[&str] = &["rounded", "tag", "chip", "badge"];

/// UI labels that sit next to the tags but are never topics themselves.
const EXCLUDED_LABELS: &[&str] = &["Topics", "Companies", "Run", "Submit", "Auto"];

const MAX_LABEL_CHARS: usize = 25;

/// Labelled-container heuristic: locate the "Topics" marker element, then
/// collect chip-styled descendants of its parent container.
pub fn extract(doc: &Html) -> Vec<String> {
    let mut topics = Vec::new();
    for marker in doc.select(&CANDIDATES) {
        if !own_text_contains(marker, "Topics") {
            continue;
        }
        let Some(container) = marker.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        for chip in container.select(&CANDIDATES) {
            if !has_chip_class(chip) {
                continue;
            }
            let text = chip.text().collect::<String>().trim().to_string();
            if is_topic_label(&text) {
                topics.push(text);
            }
        }
    }
    topics
}

/// Match only text nodes directly under the element. "Topics" appears deep
/// inside ancestors of the whole page too, and those must not become markers.
fn own_text_contains(el: ElementRef, needle: &str) -> bool {
    el.children()
        .filter_map(|node| node.value().as_text())
        .any(|text| text.contains(needle))
}

fn has_chip_class(el: ElementRef) -> bool {
    el.value()
        .attr("class")
        .is_some_and(|class| CHIP_CLASS_HINTS.iter().any(|hint| class.contains(hint)))
}

/// Acceptance rates ("49.2%"), sibling UI labels, and long prose are chip
/// neighbors in the same container; none of them are topics.
fn is_topic_label(text: &str) -> bool {
    !text.is_empty()
        && text.chars().count() < MAX_LABEL_CHARS
        && !text.ends_with('%')
        && !EXCLUDED_LABELS.contains(&text)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_from(html: &str) -> Vec<String> {
        extract(&Html::parse_document(html))
    }

    #[test]
    fn collects_chip_styled_siblings_of_the_marker() {
        let html = r#"<div class="mt-2">
            <div class="text-sm">Topics</div>
            <div class="rounded-full px-2">Array</div>
            <div class="rounded-full px-2">Hash Table</div>
        </div>"#;
        assert_eq!(extract_from(html), vec!["Array", "Hash Table"]);
    }

    #[test]
    fn excluded_labels_never_kept() {
        let html = r#"<div>
            <span>Topics</span>
            <span class="chip">Companies</span>
            <span class="chip">Run</span>
            <span class="chip">Submit</span>
            <span class="chip">Auto</span>
            <span class="chip">Sorting</span>
        </div>"#;
        assert_eq!(extract_from(html), vec!["Sorting"]);
    }

    #[test]
    fn label_filter_rules() {
        assert!(is_topic_label("Sorting"));
        assert!(is_topic_label("Data Stream"));
        assert!(!is_topic_label("Topics"));
        assert!(!is_topic_label("49.2%"));
        assert!(!is_topic_label(""));
        assert!(!is_topic_label("a label well over twenty-five characters"));
    }

    #[test]
    fn acceptance_rates_and_long_text_filtered() {
        let html = r#"<div>
            <span>Topics</span>
            <span class="rounded">49.2%</span>
            <span class="badge">This label is definitely longer than twenty-five characters</span>
            <span class="badge"></span>
            <span class="tag">Math</span>
        </div>"#;
        assert_eq!(extract_from(html), vec!["Math"]);
    }

    #[test]
    fn unstyled_siblings_ignored() {
        let html = r#"<div>
            <span>Topics</span>
            <span>Array</span>
        </div>"#;
        assert!(extract_from(html).is_empty());
    }

    #[test]
    fn deep_topics_text_does_not_mark_ancestors() {
        // "Topics" only appears inside the inner span, so the outer div must
        // not become a marker and pull in the whole page's chips.
        let html = r#"<div>
            <div><span>Topics</span><span class="chip">Graph</span></div>
            <div><span class="chip">Unrelated</span></div>
        </div>"#;
        assert_eq!(extract_from(html), vec!["Graph"]);
    }

    #[test]
    fn marker_with_no_chips_in_container_yields_nothing() {
        assert!(extract_from("<span>Topics</span>").is_empty());
    }
}
