//! # quill-host
//!
//! Wires the extension runtime to the host's collaborators and loads the
//! bundled extensions.

pub mod runtime;

pub use runtime::HostRuntime;
