use crate::adapters::storage::LocalStorage;
use crate::core::ruleset::{build_document, load_domains, serialize_document};
use crate::core::{Compiler, Pipeline, Storage};
use crate::domain::model::{CompileRequest, DomainList, RulesetDocument};
use crate::utils::error::{Result, RulesetError};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Writes `<stem>.json` into `storage`, then compiles it to `<stem>.srs` in the same place.
pub async fn write_and_compile<S, C>(
    storage: &S,
    compiler: &C,
    document: &RulesetDocument,
    input_stem: &OsStr,
) -> Result<PathBuf>
where
    S: Storage,
    C: Compiler + ?Sized,
{
    let bytes = serialize_document(document)?;
    let json_path = storage.write_file(&json_name(input_stem), &bytes).await?;
    tracing::info!("📝 JSON rule-set written to {}", json_path.display());

    let request = CompileRequest::new(json_path, storage.path_for(&srs_name(input_stem)));
    let artifact = compiler.compile(&request).await?;

    if !artifact.stdout.trim().is_empty() {
        tracing::debug!("Compiler output: {}", artifact.stdout.trim());
    }

    Ok(artifact.path)
}

fn json_name(stem: &OsStr) -> PathBuf {
    output_name(stem, ".json")
}

fn srs_name(stem: &OsStr) -> PathBuf {
    output_name(stem, ".srs")
}

// 檔名不一定是 UTF-8，保留 OsString
fn output_name(stem: &OsStr, extension: &str) -> PathBuf {
    let mut name = stem.to_os_string();
    name.push(extension);
    PathBuf::from(name)
}

/// 輸出目錄 = 輸入檔所在目錄，檔名 = 去掉副檔名的輸入檔名
pub fn output_location(source: &Path) -> Result<(PathBuf, OsString)> {
    let stem = source
        .file_stem()
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| RulesetError::InvalidConfigValueError {
            field: "input".to_string(),
            value: source.display().to_string(),
            reason: "Input path has no usable file name".to_string(),
        })?;

    let directory = match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((directory, stem.to_os_string()))
}

pub struct RulesetPipeline<S: Storage, C: Compiler> {
    source: PathBuf,
    stem: OsString,
    storage: S,
    compiler: C,
    keep_json: bool,
}

impl<C: Compiler> RulesetPipeline<LocalStorage, C> {
    pub fn for_input(source: impl Into<PathBuf>, compiler: C) -> Result<Self> {
        let source = source.into();
        let (directory, stem) = output_location(&source)?;
        Ok(Self::new(source, stem, LocalStorage::new(directory), compiler))
    }
}

impl<S: Storage, C: Compiler> RulesetPipeline<S, C> {
    pub fn new(source: PathBuf, stem: OsString, storage: S, compiler: C) -> Self {
        Self {
            source,
            stem,
            storage,
            compiler,
            keep_json: true,
        }
    }

    pub fn with_keep_json(mut self, keep_json: bool) -> Self {
        self.keep_json = keep_json;
        self
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: Compiler> Pipeline for RulesetPipeline<S, C> {
    async fn extract(&self) -> Result<DomainList> {
        load_domains(&self.source)
    }

    async fn transform(&self, domains: DomainList) -> Result<RulesetDocument> {
        Ok(build_document(domains))
    }

    async fn load(&self, document: RulesetDocument) -> Result<PathBuf> {
        let artifact =
            write_and_compile(&self.storage, &self.compiler, &document, &self.stem).await?;

        if !self.keep_json {
            self.storage.remove_file(&json_name(&self.stem)).await?;
            tracing::debug!("Removed intermediate {}", json_name(&self.stem).display());
        }

        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_location() {
        let (dir, stem) = output_location(Path::new("/tmp/x/rules.lst")).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/x"));
        assert_eq!(stem, "rules");

        let (dir, stem) = output_location(Path::new("domains.tar.txt")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(stem, "domains.tar");

        let (_, stem) = output_location(Path::new("/tmp/x/noext")).unwrap();
        assert_eq!(stem, "noext");
    }

    #[cfg(unix)]
    #[test]
    fn test_output_location_keeps_non_utf8_stem() {
        use std::os::unix::ffi::OsStrExt;

        let source = Path::new(OsStr::from_bytes(b"/tmp/x/r\xffles.lst"));
        let (dir, stem) = output_location(source).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/x"));
        assert_eq!(stem.as_bytes(), b"r\xffles");
        assert_eq!(json_name(&stem).as_os_str().as_bytes(), b"r\xffles.json");
        assert_eq!(srs_name(&stem).as_os_str().as_bytes(), b"r\xffles.srs");
    }

    #[test]
    fn test_output_location_without_file_name() {
        assert!(output_location(Path::new("/")).is_err());
        assert!(output_location(Path::new("")).is_err());
    }
}
