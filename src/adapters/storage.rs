use crate::domain::ports::Storage;
use crate::utils::error::{Result, RulesetError};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    fn path_for(&self, name: &Path) -> PathBuf {
        self.base_path.join(name)
    }

    async fn write_file(&self, name: &Path, data: &[u8]) -> Result<PathBuf> {
        let full_path = self.path_for(name);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| RulesetError::WriteError {
                    path: full_path.clone(),
                    source,
                })?;
        }

        tokio::fs::write(&full_path, data)
            .await
            .map_err(|source| RulesetError::WriteError {
                path: full_path.clone(),
                source,
            })?;

        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(full_path)
    }

    async fn remove_file(&self, name: &Path) -> Result<()> {
        let full_path = self.path_for(name);
        tokio::fs::remove_file(&full_path)
            .await
            .map_err(|source| RulesetError::WriteError {
                path: full_path,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_remove() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let path = storage.write_file(Path::new("rules.json"), b"{}").await.unwrap();
        assert_eq!(path, temp_dir.path().join("rules.json"));
        assert_eq!(std::fs::read(&path).unwrap(), b"{}");

        storage.remove_file(Path::new("rules.json")).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_write_into_file_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        // base path 是一般檔案，無法在底下建立子檔案
        let storage = LocalStorage::new(&blocker);
        let err = storage.write_file(Path::new("rules.json"), b"{}").await.unwrap_err();
        assert!(matches!(err, RulesetError::WriteError { .. }));
    }
}
