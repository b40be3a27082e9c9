//! # quill-extension
//!
//! Extension host runtime for Quill. Provides:
//!
//! - An extension registry holding manifests and activation entry points
//! - A lifecycle manager driving each extension's state machine
//! - A command bus dispatching globally addressable commands
//! - A contribution registry for sidebar panels, status-bar items, and
//!   editor buttons
//! - A settings store with typed descriptors and durable overrides
//! - A capability context scoping everything an extension may touch
//!
//! All registries are explicitly constructed and shared through `Arc`, so
//! independent runtimes can coexist in one process.

pub mod commands;
pub mod context;
pub mod contributions;
pub mod error;
pub mod host;
pub mod icon;
pub mod lifecycle;
pub mod manifest;
pub mod prelude;
pub mod registry;
pub mod settings;
pub mod traits;

mod isolation;

pub use commands::CommandBus;
pub use context::ExtensionContext;
pub use contributions::ContributionRegistry;
pub use error::{ExtensionError, ExtensionResult};
pub use host::HostBindings;
pub use lifecycle::{ExtensionState, LifecycleManager};
pub use manifest::ExtensionManifest;
pub use registry::{Extension, ExtensionModule, ExtensionRegistry};
pub use settings::SettingsStore;
