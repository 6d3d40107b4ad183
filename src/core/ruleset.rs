use crate::domain::model::{DomainList, RulesetDocument, RULESET_VERSION};
use crate::utils::error::{Result, RulesetError};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::Path;

const COMMENT_MARKER: char = '#';
const JSON_INDENT: &[u8] = b"    ";

/// Filters a domain list: trims each line, drops blanks and `#` comments.
/// Order and duplicates are kept, entries are not validated.
pub fn parse_domains(text: &str) -> DomainList {
    // `\r\n`、`\n` 與單獨的 `\r` 都視為換行
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
        .collect()
}

/// Reads a UTF-8 domain list from disk. An empty result is an error.
pub fn load_domains(source_path: &Path) -> Result<DomainList> {
    let bytes = std::fs::read(source_path).map_err(|source| RulesetError::ReadError {
        path: source_path.to_path_buf(),
        source,
    })?;

    let text = String::from_utf8(bytes).map_err(|e| RulesetError::ReadError {
        path: source_path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;

    let domains = parse_domains(&text);
    if domains.is_empty() {
        return Err(RulesetError::EmptyInputError {
            path: source_path.to_path_buf(),
        });
    }

    tracing::debug!(
        "Parsed {} domains from {}",
        domains.len(),
        source_path.display()
    );
    Ok(domains)
}

pub fn build_document(domains: DomainList) -> RulesetDocument {
    RulesetDocument::new(domains)
}

/// 4 空格縮排，非 ASCII 字元原樣輸出
pub fn serialize_document(document: &RulesetDocument) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    document.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Loads, wraps and serializes a domain list without touching the output directory.
pub fn render_document(source_path: &Path) -> Result<Vec<u8>> {
    let domains = load_domains(source_path)?;
    serialize_document(&build_document(domains))
}

pub fn parse_document(bytes: &[u8]) -> Result<RulesetDocument> {
    let document: RulesetDocument = serde_json::from_slice(bytes)?;

    if document.version != RULESET_VERSION {
        return Err(RulesetError::ValidationError {
            message: format!(
                "Unsupported rule-set version {} (expected {})",
                document.version, RULESET_VERSION
            ),
        });
    }

    if document.rules.len() != 1 {
        return Err(RulesetError::ValidationError {
            message: format!(
                "Expected exactly one rule, found {}",
                document.rules.len()
            ),
        });
    }

    Ok(document)
}
