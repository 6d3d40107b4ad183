// Adapters layer: concrete implementations for external systems (storage, compiler process, console).

pub mod compiler;
pub mod notifier;
pub mod storage;

pub use compiler::SingBoxCompiler;
pub use notifier::{notify_outcome, ConsoleNotifier};
pub use storage::LocalStorage;
