//! Capability context: the bounded API handed to each activation.

pub mod extension;
pub mod factory;
pub mod state;
pub mod window;

pub use extension::ExtensionContext;
pub use factory::ContextFactory;
pub use state::ActivationState;
pub use window::Window;
