use crate::domain::model::TransformResult;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Collect the raw words from the configured source.
    async fn extract(&self) -> Result<Vec<String>>;
    async fn transform(&self, words: Vec<String>) -> Result<TransformResult>;
    /// Persist the result, returning where it went.
    async fn load(&self, result: TransformResult) -> Result<String>;
}
