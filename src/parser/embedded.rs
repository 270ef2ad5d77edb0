use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

static SCRIPTS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").unwrap());

/// A real `topicTags` key, not just the word appearing in prose.
static TOPIC_TAGS_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""topicTags"\s*:"#).unwrap());

/// Embedded-data heuristic: pull `topicTags` out of inline script payloads.
/// Parse failures stay inside this pass; they never abort the extraction.
pub fn extract(doc: &Html) -> Vec<String> {
    for script in doc.select(&SCRIPTS) {
        let body: String = script.text().collect();
        if !TOPIC_TAGS_KEY.is_match(&body) {
            continue;
        }
        match parse_topic_tags(&body) {
            Ok(topics) if !topics.is_empty() => return topics,
            Ok(_) => {}
            Err(e) => debug!("Failed to parse embedded topicTags: {:#}", e),
        }
    }
    Vec::new()
}

/// Parse the smallest balanced-brace object containing `"topicTags"` out of
/// a script body. Single quotes are normalized to double quotes first, since
/// the payload is only JSON-shaped, not guaranteed JSON.
fn parse_topic_tags(script: &str) -> Result<Vec<String>> {
    let key = TOPIC_TAGS_KEY
        .find(script)
        .context("No topicTags key in script")?;
    let object = enclosing_object(script, key.start())
        .context("No balanced object around topicTags")?;
    let normalized = object.replace('\'', "\"");
    let value: serde_json::Value =
        serde_json::from_str(&normalized).context("Embedded topicTags is not valid JSON")?;
    let tags = value
        .get("topicTags")
        .and_then(|v| v.as_array())
        .context("topicTags is not an array")?;
    Ok(tags
        .iter()
        .filter_map(|tag| tag.get("name").and_then(|name| name.as_str()))
        .map(str::to_string)
        .collect())
}

/// Smallest `{...}` span containing the key at byte offset `key_at`: walk
/// candidate openers outward from the key and return the first whose
/// balanced span covers it.
fn enclosing_object(text: &str, key_at: usize) -> Option<&str> {
    let mut search_end = key_at;
    while let Some(start) = text[..search_end].rfind('{') {
        if let Some(len) = balanced_len(&text[start..]) {
            if start + len > key_at {
                return Some(&text[start..start + len]);
            }
        }
        search_end = start;
    }
    None
}

/// Byte length of the balanced `{...}` prefix, or `None` if it never closes.
/// Braces inside string literals are not tracked; a miscount surfaces as a
/// parse error upstream and is absorbed there.
fn balanced_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, byte) in text.bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_names_from_inline_state() {
        let script = r#"window.__STATE__ = {"question":{"questionId":"20",
            "topicTags":[{"name":"Stack","slug":"stack"},{"name":"String","slug":"string"}],
            "difficulty":"Easy"}};"#;
        let topics = parse_topic_tags(script).unwrap();
        assert_eq!(topics, vec!["Stack", "String"]);
    }

    #[test]
    fn picks_the_enclosing_object_past_earlier_siblings() {
        // The brace right before the key belongs to a sibling value; the
        // scan must step outward to the object that actually holds the key.
        let script = r#"{"stats":{"total":100},"topicTags":[{"name":"Graph"}]}"#;
        assert_eq!(parse_topic_tags(script).unwrap(), vec!["Graph"]);
    }

    #[test]
    fn normalizes_single_quotes() {
        let script = r#"var data = {'id': 7, "topicTags": [{'name': 'Tree'}]};"#;
        assert_eq!(parse_topic_tags(script).unwrap(), vec!["Tree"]);
    }

    #[test]
    fn entries_without_a_name_are_skipped() {
        let script = r#"{"topicTags":[{"slug":"math"},{"name":"Math"}]}"#;
        assert_eq!(parse_topic_tags(script).unwrap(), vec!["Math"]);
    }

    #[test]
    fn unbalanced_payload_is_an_error() {
        assert!(parse_topic_tags(r#"{"topicTags":[{"name":"Math"}"#).is_err());
    }

    #[test]
    fn invalid_json_is_an_error_not_a_panic() {
        assert!(parse_topic_tags(r#"{"topicTags": not json}"#).is_err());
    }

    #[test]
    fn extract_absorbs_parse_failures() {
        let html = r#"<script>{"topicTags": broken</script>"#;
        assert!(extract(&Html::parse_document(html)).is_empty());
    }

    #[test]
    fn extract_skips_unrelated_scripts() {
        let html = r#"<html><body>
            <script>console.log("analytics")</script>
            <script>{"topicTags":[{"name":"Greedy"}]}</script>
        </body></html>"#;
        assert_eq!(extract(&Html::parse_document(html)), vec!["Greedy"]);
    }
}
