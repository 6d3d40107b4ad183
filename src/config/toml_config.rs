use crate::adapters::compiler::DEFAULT_COMPILER;
use crate::core::ConfigProvider;
use crate::utils::error::{Result, RulesetError};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const MAX_TIMEOUT_SECONDS: u64 = 86_400;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub compiler: CompilerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilerConfig {
    pub binary: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub keep_json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| RulesetError::ConfigError {
            message: format!("Cannot read config file {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RulesetError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SING_BOX_PATH})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RulesetError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn compiler_binary(&self) -> &str {
        self.compiler.binary.as_deref().unwrap_or(DEFAULT_COMPILER)
    }

    fn compile_timeout(&self) -> Option<Duration> {
        self.compiler.timeout_seconds.map(Duration::from_secs)
    }

    fn keep_json(&self) -> bool {
        self.output.keep_json.unwrap_or(true)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(binary) = &self.compiler.binary {
            validate_non_empty_string("compiler.binary", binary)?;
        }
        if let Some(timeout) = self.compiler.timeout_seconds {
            validate_range("compiler.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[compiler]
binary = "/usr/local/bin/sing-box"
timeout_seconds = 60

[output]
keep_json = false
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.compiler_binary(), "/usr/local/bin/sing-box");
        assert_eq!(config.compile_timeout(), Some(Duration::from_secs(60)));
        assert!(!config.keep_json());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.compiler_binary(), "sing-box");
        assert_eq!(config.compile_timeout(), None);
        assert!(config.keep_json());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DOMAIN_SRS_TEST_COMPILER", "/opt/sing-box");

        let toml_content = r#"
[compiler]
binary = "${DOMAIN_SRS_TEST_COMPILER}"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.compiler_binary(), "/opt/sing-box");

        std::env::remove_var("DOMAIN_SRS_TEST_COMPILER");
    }

    #[test]
    fn test_unset_env_var_is_left_verbatim() {
        let toml_content = r#"
[compiler]
binary = "${DOMAIN_SRS_SURELY_UNSET_VAR}"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.compiler_binary(), "${DOMAIN_SRS_SURELY_UNSET_VAR}");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str("[compiler]\ntimeout_seconds = 0\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[compiler]\nbinary = \"  \"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let err = TomlConfig::from_toml_str("[compiler\nbinary = 1").unwrap_err();
        assert!(matches!(err, RulesetError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nkeep_json = false").unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();
        assert!(!config.keep_json());

        assert!(matches!(
            TomlConfig::from_file("/definitely/not/here.toml"),
            Err(RulesetError::ConfigError { .. })
        ));
    }
}
