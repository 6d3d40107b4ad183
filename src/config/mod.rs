pub mod toml_config;

use crate::adapters::compiler::DEFAULT_COMPILER;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_not_output_target, validate_path, validate_range, Validate,
};
use std::path::PathBuf;
use std::time::Duration;
use toml_config::{TomlConfig, MAX_TIMEOUT_SECONDS};

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "domain-srs")]
#[command(about = "Convert a domain list into a compiled sing-box rule-set (.srs)")]
pub struct CliConfig {
    /// Domain list file, one domain suffix per line ('#' starts a comment)
    pub input: PathBuf,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Compiler binary name or path [default: sing-box]
    #[arg(long)]
    pub compiler: Option<String>,

    /// Kill the compiler after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Delete the intermediate .json after a successful compile
    #[arg(long)]
    pub remove_json: bool,

    /// Print the JSON document to stdout without writing or compiling
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 命令列參數優先於 TOML 設定
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = Settings::new(self.input.clone());

        if let Some(path) = &self.config {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            let toml = TomlConfig::from_file(path)?;
            toml.validate()?;
            settings = settings.with_toml(&toml);
        }

        if let Some(compiler) = &self.compiler {
            settings.compiler_binary = compiler.clone();
        }
        if let Some(timeout) = self.timeout {
            settings.timeout_seconds = Some(timeout);
        }
        if self.remove_json {
            settings.keep_json = false;
        }

        Ok(settings)
    }
}

/// Effective settings after merging flags, TOML file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input: PathBuf,
    pub compiler_binary: String,
    pub timeout_seconds: Option<u64>,
    pub keep_json: bool,
}

impl Settings {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            compiler_binary: DEFAULT_COMPILER.to_string(),
            timeout_seconds: None,
            keep_json: true,
        }
    }

    pub fn with_toml(mut self, toml: &TomlConfig) -> Self {
        self.compiler_binary = toml.compiler_binary().to_string();
        self.timeout_seconds = toml.compiler.timeout_seconds;
        self.keep_json = toml.keep_json();
        self
    }
}

impl ConfigProvider for Settings {
    fn compiler_binary(&self) -> &str {
        &self.compiler_binary
    }

    fn compile_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn keep_json(&self) -> bool {
        self.keep_json
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_not_output_target("input", &self.input)?;
        validate_non_empty_string("compiler", &self.compiler_binary)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_range("timeout", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::new("rules.lst");
        assert_eq!(settings.compiler_binary(), "sing-box");
        assert_eq!(settings.compile_timeout(), None);
        assert!(settings.keep_json());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let toml = TomlConfig::from_toml_str(
            "[compiler]\nbinary = \"/opt/sing-box\"\ntimeout_seconds = 5\n[output]\nkeep_json = false\n",
        )
        .unwrap();
        let settings = Settings::new("rules.lst").with_toml(&toml);

        assert_eq!(settings.compiler_binary, "/opt/sing-box");
        assert_eq!(settings.compile_timeout(), Some(Duration::from_secs(5)));
        assert!(!settings.keep_json);
    }

    #[test]
    fn test_validation_rejects_output_as_input() {
        assert!(Settings::new("rules.json").validate().is_err());
        assert!(Settings::new("rules.srs").validate().is_err());

        let mut settings = Settings::new("rules.lst");
        settings.timeout_seconds = Some(0);
        assert!(settings.validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides_toml() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[compiler]\nbinary = \"from-toml\"\ntimeout_seconds = 10"
        )
        .unwrap();

        let cli = CliConfig::parse_from([
            "domain-srs",
            "--config",
            file.path().to_str().unwrap(),
            "--compiler",
            "from-cli",
            "--remove-json",
            "/tmp/x/rules.lst",
        ]);
        let settings = cli.resolve().unwrap();

        assert_eq!(settings.input, PathBuf::from("/tmp/x/rules.lst"));
        assert_eq!(settings.compiler_binary, "from-cli");
        assert_eq!(settings.timeout_seconds, Some(10));
        assert!(!settings.keep_json);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_resolve_rejects_invalid_toml_values() {
        use crate::utils::error::RulesetError;
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[compiler]\ntimeout_seconds = 0").unwrap();

        let cli = CliConfig::parse_from([
            "domain-srs",
            "--config",
            file.path().to_str().unwrap(),
            "rules.lst",
        ]);

        match cli.resolve() {
            Err(RulesetError::InvalidConfigValueError { field, .. }) => {
                assert_eq!(field, "compiler.timeout_seconds");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
