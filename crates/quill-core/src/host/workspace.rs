//! Access to the currently open project.

use std::path::PathBuf;
use std::sync::RwLock;

/// Returns the currently open project path, if any.
pub trait WorkspaceAccessor: Send + Sync {
    /// The project root, or `None` when no folder is open.
    fn root(&self) -> Option<PathBuf>;
}

/// Workspace accessor backed by a settable path.
#[derive(Debug, Default)]
pub struct StaticWorkspace {
    root: RwLock<Option<PathBuf>>,
}

impl StaticWorkspace {
    /// Creates an accessor with the given root.
    pub fn new(root: Option<PathBuf>) -> Self {
        Self {
            root: RwLock::new(root),
        }
    }

    /// Opens a different project, or closes the current one with `None`.
    pub fn set_root(&self, root: Option<PathBuf>) {
        *self.root.write().unwrap_or_else(|e| e.into_inner()) = root;
    }
}

impl WorkspaceAccessor for StaticWorkspace {
    fn root(&self) -> Option<PathBuf> {
        self.root.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
