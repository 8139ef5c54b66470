use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Trait for the vector search service boundary.
///
/// The result is handed back as raw JSON: the external contract is
/// undocumented and shapes vary by provider, so interpretation is left to
/// `normalize`.
#[async_trait]
pub trait RetrievalClient: Send + Sync {
    /// Query the index for the `k` records closest to `query`.
    async fn query(&self, query: &str, k: usize) -> Result<Value>;
}
