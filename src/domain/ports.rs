use crate::domain::model::{FailurePolicy, LoadedImage, SizePreset};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn concurrency(&self) -> usize;
    fn failure_policy(&self) -> FailurePolicy;
}

#[async_trait]
pub trait Resizer: Send + Sync {
    /// Produce the encoded bytes of `image` scaled to exactly the preset
    /// dimensions, keeping the source's container format.
    async fn resize(&self, image: &LoadedImage, preset: SizePreset) -> Result<Vec<u8>>;
}
