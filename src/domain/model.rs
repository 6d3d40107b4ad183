use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;

/// 目前唯一支援的 rule-set schema 版本
pub const RULESET_VERSION: u8 = 3;

/// Ordered domain suffix patterns, duplicates kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainList(Vec<String>);

impl DomainList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for DomainList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSuffixRule {
    pub domain_suffix: DomainList,
}

/// sing-box source rule-set. Always exactly one `domain_suffix` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesetDocument {
    pub version: u8,
    pub rules: Vec<DomainSuffixRule>,
}

impl RulesetDocument {
    pub fn new(domains: DomainList) -> Self {
        Self {
            version: RULESET_VERSION,
            rules: vec![DomainSuffixRule {
                domain_suffix: domains,
            }],
        }
    }

    pub fn domains(&self) -> &[String] {
        self.rules
            .first()
            .map(|rule| rule.domain_suffix.as_slice())
            .unwrap_or(&[])
    }
}

/// One invocation of `<compiler> rule-set compile <input> -o <output>`.
/// Exit status 0 means success; anything else is a failure with diagnostics on stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl CompileRequest {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    pub fn args(&self) -> Vec<OsString> {
        vec![
            OsString::from("rule-set"),
            OsString::from("compile"),
            self.input.clone().into_os_string(),
            OsString::from("-o"),
            self.output.clone().into_os_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArtifact {
    pub path: PathBuf,
    pub stdout: String,
    pub stderr: String,
}

impl CompiledArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_request_args() {
        let request = CompileRequest::new("/tmp/x/rules.json", "/tmp/x/rules.srs");
        let args: Vec<String> = request
            .args()
            .into_iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec!["rule-set", "compile", "/tmp/x/rules.json", "-o", "/tmp/x/rules.srs"]
        );
    }

    #[test]
    fn test_document_wraps_single_rule() {
        let doc = RulesetDocument::new(DomainList::from_iter(["a.com", "a.com"]));
        assert_eq!(doc.version, RULESET_VERSION);
        assert_eq!(doc.rules.len(), 1);
        assert_eq!(doc.domains(), ["a.com", "a.com"]);
    }
}
