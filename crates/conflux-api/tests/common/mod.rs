#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use serde_json::Value;
use std::convert::Infallible;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use conflux_api::{config::Config, routes, state::AppState};
use conflux_llm::{ByteStream, CompletionRequest, InferenceClient};
use conflux_retrieval::RetrievalClient;

pub fn test_config() -> Config {
    toml::from_str(
        r#"
        [server]
        host = "127.0.0.1"
        port = 0

        [cors]
        enabled = false
        origins = []

        [llm]
        account_id = "acct-test"

        [logging]
        level = "info"
        format = "pretty"
    "#,
    )
    .unwrap()
}

/// Inference stub: records every request and replays canned chunks.
pub struct StubInference {
    requests: Mutex<Vec<CompletionRequest>>,
    chunks: Vec<&'static str>,
    fail: bool,
}

impl StubInference {
    pub fn streaming(chunks: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            chunks,
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            chunks: Vec::new(),
            fail: true,
        })
    }

    pub fn last_request(&self) -> CompletionRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no inference request was recorded")
    }
}

#[async_trait]
impl InferenceClient for StubInference {
    async fn run_stream(&self, request: CompletionRequest) -> anyhow::Result<ByteStream> {
        self.requests.lock().unwrap().push(request);
        if self.fail {
            anyhow::bail!("stub inference refused the request");
        }
        let chunks = self.chunks.clone();
        Ok(Box::pin(futures::stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok::<_, anyhow::Error>(Bytes::from(c))),
        )))
    }
}

/// Retrieval stub: counts calls and either replays a canned result or fails.
pub struct StubRetrieval {
    calls: AtomicUsize,
    response: Option<Value>,
}

impl StubRetrieval {
    pub fn with_result(response: Value) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            response: Some(response),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            response: None,
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RetrievalClient for StubRetrieval {
    async fn query(&self, _query: &str, _k: usize) -> anyhow::Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Some(value) => Ok(value.clone()),
            None => anyhow::bail!("stub retrieval exploded"),
        }
    }
}

/// Router wired with stub collaborators and a no-op asset service.
pub fn app(inference: Arc<StubInference>, retrieval: Option<Arc<StubRetrieval>>) -> Router {
    let state = Arc::new(AppState::new(
        test_config(),
        inference as Arc<dyn InferenceClient>,
        retrieval.map(|r| r as Arc<dyn RetrievalClient>),
    ));
    routes::build_router(
        state,
        tower::service_fn(|_req: Request| async move {
            Ok::<_, Infallible>((StatusCode::OK, "asset").into_response())
        }),
    )
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
