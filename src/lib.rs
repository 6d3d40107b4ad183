pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ConsoleNotifier, LocalStorage, SingBoxCompiler};
pub use config::{toml_config::TomlConfig, Settings};
pub use core::{engine::RulesetEngine, pipeline::RulesetPipeline};
pub use domain::model::{CompileRequest, CompiledArtifact, DomainList, RulesetDocument};
pub use utils::error::{Result, RulesetError};
