use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::Arc;

use conflux_llm::{CompletionOptions, CompletionRequest, Message};

use crate::{augment, error::ApiResult, state::AppState};

/// Chat completion request body
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "messages_or_default")]
    pub messages: Vec<Message>,
}

/// An absent or ill-shaped `messages` field collapses to an empty
/// conversation instead of failing the request.
fn messages_or_default<'de, D>(deserializer: D) -> Result<Vec<Message>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Handle a chat conversation and stream the model output back verbatim
///
/// Two observable outcomes: a streamed 200, or the uniform JSON 500 from
/// `ApiError` for any failure before the stream is handed off.
pub async fn chat_completion(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Response> {
    let request: ChatRequest = serde_json::from_slice(&body)?;
    let mut messages = request.messages;

    // Add system prompt if not present
    if !messages.iter().any(Message::is_system) {
        messages.insert(0, Message::system(state.config.llm.system_prompt.clone()));
    }

    // Optional retrieval-augmented context; failures are logged, never fatal
    augment::augment_with_context(state.retrieval.as_deref(), &mut messages).await;

    let completion = CompletionRequest::new(state.config.llm.model.clone(), messages).with_options(
        CompletionOptions::new()
            .max_tokens(state.config.llm.max_tokens)
            .stream(true),
    );

    let stream = state.inference.run_stream(completion).await?;

    let mut response = Body::from_stream(stream).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream; charset=utf-8"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));

    Ok(response)
}
