//! # quill-core
//!
//! Core crate for the Quill editor host. Contains configuration schemas,
//! the unified error system, and the traits describing the services the
//! host process provides to the extension runtime (notifications,
//! workspace access, opaque host services, settings persistence).
//!
//! This crate has **no** internal dependencies on other Quill crates.

pub mod config;
pub mod error;
pub mod host;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
