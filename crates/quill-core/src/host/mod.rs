//! Host collaborators: services the extension runtime calls but does not implement.

pub mod notify;
pub mod persistence;
pub mod services;
pub mod workspace;

#[cfg(feature = "mock")]
pub mod mock;

pub use notify::{Notification, NotificationLevel, NotificationSurface, RecordingNotifier};
pub use persistence::{JsonFileSettings, MemorySettings, SettingsPersistence};
pub use services::{HostRequest, HostServiceError, HostServices, NoHostServices};
pub use workspace::{StaticWorkspace, WorkspaceAccessor};

#[cfg(feature = "mock")]
pub use mock::MockHostServices;
