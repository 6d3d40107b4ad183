use crate::domain::model::{CompileRequest, CompiledArtifact};
use crate::domain::ports::{Compiler, ConfigProvider};
use crate::utils::error::{Result, RulesetError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

pub const DEFAULT_COMPILER: &str = "sing-box";

/// Runs `sing-box rule-set compile` as a child process.
#[derive(Debug, Clone)]
pub struct SingBoxCompiler {
    binary: String,
    timeout: Option<Duration>,
}

impl SingBoxCompiler {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(config.compiler_binary()).with_timeout(config.compile_timeout())
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn locate(&self) -> Result<PathBuf> {
        which::which(&self.binary).map_err(|e| {
            tracing::debug!("Lookup of '{}' failed: {}", self.binary, e);
            RulesetError::CompilerNotFoundError {
                binary: self.binary.clone(),
            }
        })
    }
}

impl Default for SingBoxCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_COMPILER)
    }
}

#[async_trait]
impl Compiler for SingBoxCompiler {
    async fn compile(&self, request: &CompileRequest) -> Result<CompiledArtifact> {
        let program = self.locate()?;
        tracing::debug!(
            "Running {} rule-set compile {} -o {}",
            program.display(),
            request.input.display(),
            request.output.display()
        );

        let mut command = Command::new(&program);
        command
            .args(request.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let child = command.output();

        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, child).await.map_err(|_| {
                RulesetError::CompilerTimeoutError {
                    binary: self.binary.clone(),
                    timeout,
                }
            })?,
            None => child.await,
        };

        let output = output.map_err(|e| match e.kind() {
            // which 找得到但 spawn 時已消失
            std::io::ErrorKind::NotFound => RulesetError::CompilerNotFoundError {
                binary: self.binary.clone(),
            },
            _ => RulesetError::IoError(e),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            tracing::debug!("Compiler stdout: {}", stdout);
            tracing::debug!("Compiler stderr: {}", stderr);
            return Err(RulesetError::CompilerExecutionError {
                status: output.status.code(),
                stdout,
                stderr,
            });
        }

        Ok(CompiledArtifact {
            path: request.output.clone(),
            stdout,
            stderr,
        })
    }
}
