use crate::domain::ports::Notifier;
use crate::utils::error::{Result, RulesetError};
use std::path::PathBuf;

/// Plain console output in place of message boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("✅ {}", message);
    }

    fn warning(&self, message: &str) {
        eprintln!("⚠️  {}", message);
    }

    fn error(&self, title: &str, message: &str) {
        eprintln!("❌ {}: {}", title, message);
    }
}

pub fn error_title(error: &RulesetError) -> &'static str {
    match error {
        RulesetError::CompilerNotFoundError { .. } => "Compiler not found",
        RulesetError::CompilerExecutionError { .. } => "Compilation failed",
        RulesetError::CompilerTimeoutError { .. } => "Compilation timed out",
        RulesetError::ReadError { .. } => "Cannot read input",
        RulesetError::WriteError { .. } | RulesetError::IoError(_) => "Cannot write output",
        RulesetError::ConfigError { .. }
        | RulesetError::ConfigValidationError { .. }
        | RulesetError::InvalidConfigValueError { .. } => "Invalid configuration",
        _ => "Error",
    }
}

pub fn notify_outcome<N: Notifier + ?Sized>(notifier: &N, outcome: &Result<PathBuf>) {
    match outcome {
        Ok(path) => notifier.success(&format!(
            "Compiled rule-set written to {}",
            path.display()
        )),
        Err(e) if e.is_warning() => notifier.warning(&e.user_friendly_message()),
        Err(e) => notifier.error(error_title(e), &e.user_friendly_message()),
    }
}
