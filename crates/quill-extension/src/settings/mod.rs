//! Settings: typed descriptors contributed by extensions and the value store.

pub mod descriptor;
pub mod store;

pub use descriptor::{SettingDescriptor, SettingKind, SettingsSection};
pub use store::{SettingChange, SettingsSnapshot, SettingsStore};
