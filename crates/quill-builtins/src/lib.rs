//! Extensions bundled with the Quill editor.
//!
//! Each module is written only against the public extension API, exactly
//! as a third-party extension would be. [`builtin_modules`] returns them
//! in the order the host registers and activates them.

pub mod formatter;
pub mod live_server;
pub mod lorem;
pub mod rest_client;

mod host_call;

#[cfg(test)]
mod testing;

use quill_extension::ExtensionModule;

pub use formatter::FormatterExtension;
pub use live_server::LiveServerExtension;
pub use lorem::LoremExtension;
pub use rest_client::RestClientExtension;

/// Every bundled extension, in startup order.
pub fn builtin_modules() -> Vec<ExtensionModule> {
    vec![
        live_server::module(),
        formatter::module(),
        lorem::module(),
        rest_client::module(),
    ]
}
