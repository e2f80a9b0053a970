use crate::domain::model::{DiscoveredToken, PuzzleId, SessionToken};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &Path) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &Path) -> impl std::future::Future<Output = bool> + Send;
}

/// Settings the setup engine reads. Paths are relative to the storage root.
pub trait ConfigProvider: Send + Sync {
    fn puzzle(&self) -> PuzzleId;
    fn src_dir(&self) -> &Path;
    fn lib_dir(&self) -> &Path;
    fn template_dir(&self) -> &Path;
    fn force(&self) -> bool;
    fn dry_run(&self) -> bool;
    fn skip_skeleton(&self) -> bool;

    fn day_dir(&self) -> std::path::PathBuf {
        self.src_dir().join(self.puzzle().dir_name())
    }
}

#[async_trait]
pub trait TokenSource: Send + Sync {
    fn name(&self) -> String;
    async fn discover(&self) -> Result<Vec<DiscoveredToken>>;
}

#[async_trait]
pub trait PuzzleProvider: Send + Sync {
    async fn fetch_input(&self, puzzle: PuzzleId, token: &SessionToken) -> Result<String>;
    async fn fetch_page(&self, puzzle: PuzzleId, token: &SessionToken) -> Result<String>;
}

#[async_trait]
impl<T: TokenSource + ?Sized> TokenSource for Box<T> {
    fn name(&self) -> String {
        (**self).name()
    }

    async fn discover(&self) -> Result<Vec<DiscoveredToken>> {
        (**self).discover().await
    }
}
