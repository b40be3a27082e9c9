//! Host collaborators handed to the runtime.

use std::sync::Arc;

use quill_core::host::{HostServices, NotificationSurface, WorkspaceAccessor};

/// The host-side services the runtime calls but does not implement.
#[derive(Clone)]
pub struct HostBindings {
    /// User-visible notification surface.
    pub notifier: Arc<dyn NotificationSurface>,
    /// Access to the open project.
    pub workspace: Arc<dyn WorkspaceAccessor>,
    /// Opaque host services passed through to extensions.
    pub services: Arc<dyn HostServices>,
}

impl std::fmt::Debug for HostBindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostBindings")
            .field("workspace_root", &self.workspace.root())
            .finish()
    }
}

impl HostBindings {
    /// Bundles host collaborators.
    pub fn new(
        notifier: Arc<dyn NotificationSurface>,
        workspace: Arc<dyn WorkspaceAccessor>,
        services: Arc<dyn HostServices>,
    ) -> Self {
        Self {
            notifier,
            workspace,
            services,
        }
    }
}
