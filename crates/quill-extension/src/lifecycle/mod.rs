//! Lifecycle: the per-extension state machine and its orchestrator.

pub mod manager;
pub mod state;

pub use manager::{LifecycleManager, StartupReport};
pub use state::{ExtensionState, ExtensionStatus};
