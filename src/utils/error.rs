use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RulesetError {
    #[error("Failed to read domain list {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No domains found in {}", .path.display())]
    EmptyInputError { path: PathBuf },

    #[error("Failed to write {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Compiler '{binary}' not found in PATH")]
    CompilerNotFoundError { binary: String },

    #[error("Compiler exited with {}: {}", describe_status(.status), .stderr.trim())]
    CompilerExecutionError {
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Compiler '{binary}' did not finish within {timeout:?}")]
    CompilerTimeoutError { binary: String, timeout: Duration },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

pub type Result<T> = std::result::Result<T, RulesetError>;

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        // Unix 上被信號終止時沒有 exit code
        None => "no exit status".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Output,
    Compiler,
    Environment,
    Configuration,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RulesetError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ReadError { .. } | Self::EmptyInputError { .. } | Self::ValidationError { .. } => {
                ErrorCategory::Input
            }
            Self::WriteError { .. } | Self::IoError(_) => ErrorCategory::Output,
            Self::CompilerExecutionError { .. } | Self::CompilerTimeoutError { .. } => {
                ErrorCategory::Compiler
            }
            Self::CompilerNotFoundError { .. } => ErrorCategory::Environment,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EmptyInputError { .. } => ErrorSeverity::Medium,
            Self::ReadError { .. }
            | Self::ValidationError { .. }
            | Self::WriteError { .. }
            | Self::IoError(_)
            | Self::CompilerExecutionError { .. }
            | Self::CompilerTimeoutError { .. } => ErrorSeverity::High,
            Self::CompilerNotFoundError { .. }
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    /// 依嚴重程度決定 process exit code
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// 空輸入只是警告，其餘都當作錯誤呈現
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::EmptyInputError { .. })
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ReadError { .. } => {
                "Check that the file exists, is readable and is UTF-8 encoded".to_string()
            }
            Self::EmptyInputError { .. } => {
                "Add at least one domain per line; lines starting with '#' are comments".to_string()
            }
            Self::WriteError { .. } | Self::IoError(_) => {
                "Check write permissions and free space in the input file's directory".to_string()
            }
            Self::CompilerNotFoundError { binary } => format!(
                "Install {} and make sure it is on PATH, or pass --compiler <path>",
                binary
            ),
            Self::CompilerExecutionError { .. } => {
                "Inspect the compiler output above and fix the offending entries in the domain list"
                    .to_string()
            }
            Self::CompilerTimeoutError { .. } => {
                "Raise --timeout or check whether the compiler is waiting on something".to_string()
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Review the command-line flags and the TOML configuration file".to_string()
            }
            Self::ValidationError { .. } => "Check the document contents".to_string(),
            Self::SerializationError(_) => "This is a bug, please report it".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ReadError { path, .. } => format!("Could not read {}", path.display()),
            Self::EmptyInputError { path } => {
                format!("No domains found in {}", path.display())
            }
            Self::WriteError { path, .. } => format!("Could not write {}", path.display()),
            Self::CompilerNotFoundError { binary } => format!(
                "{} was not found in PATH. Make sure it is installed and reachable.",
                binary
            ),
            Self::CompilerExecutionError { stderr, .. } => {
                format!("Rule-set compilation failed:\n{}", stderr.trim_end())
            }
            Self::CompilerTimeoutError { binary, timeout } => {
                format!("{} was stopped after {:?}", binary, timeout)
            }
            other => other.to_string(),
        }
    }
}
