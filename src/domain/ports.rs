use crate::domain::model::{CompileRequest, CompiledArtifact, DomainList, RulesetDocument};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Output location rooted at a single directory.
pub trait Storage: Send + Sync {
    fn path_for(&self, name: &Path) -> PathBuf;
    fn write_file(
        &self,
        name: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<PathBuf>> + Send;
    fn remove_file(&self, name: &Path) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait Compiler: Send + Sync {
    async fn compile(&self, request: &CompileRequest) -> Result<CompiledArtifact>;
}

pub trait ConfigProvider: Send + Sync {
    fn compiler_binary(&self) -> &str;
    fn compile_timeout(&self) -> Option<Duration>;
    fn keep_json(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<DomainList>;
    async fn transform(&self, domains: DomainList) -> Result<RulesetDocument>;
    async fn load(&self, document: RulesetDocument) -> Result<PathBuf>;
}

/// Presentation layer: dialogs, console, or a recorder in tests.
pub trait Notifier {
    fn success(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, title: &str, message: &str);
}
