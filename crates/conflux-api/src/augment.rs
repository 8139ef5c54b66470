use anyhow::Result;
use conflux_llm::Message;
use conflux_retrieval::{unwrap_hits, RetrievalClient, RetrievalHit};

/// Hits requested from the index and kept in the synthesized message.
pub const CONTEXT_TOP_K: usize = 5;

/// Per-snippet excerpt ceiling, in characters.
const SNIPPET_MAX_CHARS: usize = 800;

/// Best-effort retrieval augmentation.
///
/// When retrieval succeeds and produces hits, one synthesized system message
/// is inserted at the front of the sequence. Every other path (no client
/// configured, no query, no hits, any failure) leaves `messages` exactly as
/// received.
pub async fn augment_with_context(
    retrieval: Option<&dyn RetrievalClient>,
    messages: &mut Vec<Message>,
) {
    let Some(client) = retrieval else {
        return;
    };
    let Some(query) = latest_user_query(messages) else {
        return;
    };

    match build_context_message(client, &query).await {
        Ok(Some(context)) => messages.insert(0, context),
        Ok(None) => {}
        Err(e) => tracing::warn!("Context retrieval failed: {:#}", e),
    }
}

/// Most recent user utterance, scanning from the end. Empty content counts
/// as no query; retrieval is never invoked with an empty query.
fn latest_user_query(messages: &[Message]) -> Option<String> {
    messages
        .iter()
        .rev()
        .find(|m| m.is_user())
        .map(|m| m.content().to_string())
        .filter(|q| !q.is_empty())
}

async fn build_context_message(
    client: &dyn RetrievalClient,
    query: &str,
) -> Result<Option<Message>> {
    let raw = client.query(query, CONTEXT_TOP_K).await?;
    let hits = unwrap_hits(&raw);
    if hits.is_empty() {
        return Ok(None);
    }

    let snippets: Vec<String> = hits
        .iter()
        .take(CONTEXT_TOP_K)
        .enumerate()
        .map(|(i, hit)| RetrievalHit::from_value(hit, i, SNIPPET_MAX_CHARS).snippet())
        .collect();

    Ok(Some(Message::system(format!(
        "Relevant context (from the vector index):\n\n{}\n\nUse this information to answer the user.",
        snippets.join("\n\n")
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_user_query_scans_from_end() {
        let messages = vec![
            Message::user("first"),
            Message::assistant("reply"),
            Message::user("second"),
        ];
        assert_eq!(latest_user_query(&messages), Some("second".to_string()));
    }

    #[test]
    fn test_latest_user_query_none_without_user() {
        let messages = vec![Message::system("sys"), Message::assistant("reply")];
        assert_eq!(latest_user_query(&messages), None);
    }

    #[test]
    fn test_latest_user_query_empty_content_is_no_query() {
        let messages = vec![Message::user("earlier"), Message::user("")];
        assert_eq!(latest_user_query(&messages), None);
    }
}
