use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const GRAPHQL_URL: &str = "https://leetcode.com/graphql";

const QUESTION_QUERY: &str = "
query questionData($titleSlug: String!) {
    question(titleSlug: $titleSlug) {
        questionId
        title
        titleSlug
        topicTags {
            name
            slug
        }
    }
}";

/// Result of one extraction strategy. `NotAvailable` means "try the next
/// strategy", never an error the caller has to surface.
pub enum Outcome {
    Found(Vec<String>),
    NotAvailable,
}

/// Query the GraphQL endpoint for a problem's topic tags.
///
/// Every failure on this path (transport, non-2xx, malformed shape, unknown
/// question, empty tag list) collapses into `NotAvailable`; the orchestrator
/// decides whether to fall back.
pub async fn fetch_topics(client: &Client, slug: &str) -> Outcome {
    match query_topics(client, slug).await {
        Ok(topics) if !topics.is_empty() => Outcome::Found(topics),
        Ok(_) => {
            debug!("GraphQL returned no topics for {}", slug);
            Outcome::NotAvailable
        }
        Err(e) => {
            debug!("GraphQL unavailable for {}: {:#}", slug, e);
            Outcome::NotAvailable
        }
    }
}

async fn query_topics(client: &Client, slug: &str) -> Result<Vec<String>> {
    let body = serde_json::json!({
        "operationName": "questionData",
        "variables": { "titleSlug": slug },
        "query": QUESTION_QUERY,
    });

    let response = client.post(GRAPHQL_URL).json(&body).send().await?;
    let status = response.status();
    if !status.is_success() {
        bail!("HTTP {}", status.as_u16());
    }

    decode_topics(&response.text().await?)
}

/// Decode `data.question.topicTags[].name`, preserving source order.
fn decode_topics(body: &str) -> Result<Vec<String>> {
    let envelope: Envelope =
        serde_json::from_str(body).context("Malformed GraphQL response")?;
    let question = envelope
        .data
        .and_then(|d| d.question)
        .context("No question data in GraphQL response")?;
    Ok(question.topic_tags.into_iter().map(|t| t.name).collect())
}

#[derive(Deserialize)]
struct Envelope {
    data: Option<Data>,
}

#[derive(Deserialize)]
struct Data {
    question: Option<Question>,
}

#[derive(Deserialize)]
struct Question {
    #[serde(rename = "topicTags", default)]
    topic_tags: Vec<TopicTag>,
}

#[derive(Deserialize)]
struct TopicTag {
    name: String,
}

// ── Tests ──
