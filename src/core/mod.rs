pub mod engine;
pub mod pipeline;
pub mod ruleset;

pub use crate::domain::model::{DomainList, RulesetDocument};
pub use crate::domain::ports::{Compiler, ConfigProvider, Notifier, Pipeline, Storage};
pub use crate::utils::error::Result;
