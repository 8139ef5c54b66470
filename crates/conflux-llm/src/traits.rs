use crate::types::Message;
use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

/// Incremental model output, forwarded as raw bytes.
///
/// The provider emits server-sent events when streaming is requested; this
/// crate never interprets the contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Trait for the hosted inference service boundary.
///
/// Implementations receive the full message sequence and hand back the
/// provider's byte stream untouched.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Streaming completion; the returned bytes are suitable for direct
    /// pass-through as an HTTP response body.
    async fn run_stream(&self, request: CompletionRequest) -> Result<ByteStream>;
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub options: CompletionOptions,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: CompletionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

impl CompletionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}
