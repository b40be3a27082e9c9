//! The `window` namespace of the capability context.

use quill_core::host::NotificationSurface;

use super::extension::ExtensionContext;
use crate::contributions::{EditorButton, EditorButtonOptions, StatusBarItem, StatusBarItemOptions};
use crate::error::ExtensionResult;

/// Status bar, editor toolbar, and notification operations bound to one extension.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    ctx: &'a ExtensionContext,
}

impl<'a> Window<'a> {
    pub(crate) fn new(ctx: &'a ExtensionContext) -> Self {
        Self { ctx }
    }

    /// Creates or replaces a status-bar item (last write wins).
    pub async fn create_status_bar_item(
        &self,
        options: StatusBarItemOptions,
    ) -> ExtensionResult<StatusBarItem> {
        let _live = self.ctx.live().await?;
        self.ctx
            .inner
            .contributions
            .upsert_status_bar_item(&self.ctx.inner.extension_id, options)
            .await
    }

    /// Removes one of this extension's status-bar items.
    pub async fn dispose_status_bar_item(&self, id: &str) -> ExtensionResult<bool> {
        let _live = self.ctx.live().await?;
        self.ctx
            .inner
            .contributions
            .remove_status_bar_item(&self.ctx.inner.extension_id, id)
            .await
    }

    /// Creates or replaces an editor toolbar button (last write wins).
    pub async fn register_editor_button(
        &self,
        options: EditorButtonOptions,
    ) -> ExtensionResult<EditorButton> {
        let _live = self.ctx.live().await?;
        self.ctx
            .inner
            .contributions
            .upsert_editor_button(&self.ctx.inner.extension_id, options)
            .await
    }

    /// Shows an informational notification.
    pub fn show_information_message(&self, text: &str) {
        self.notifier().show_information(text);
    }

    /// Shows a warning notification.
    pub fn show_warning_message(&self, text: &str) {
        self.notifier().show_warning(text);
    }

    /// Shows an error notification.
    pub fn show_error_message(&self, text: &str) {
        self.notifier().show_error(text);
    }

    fn notifier(&self) -> &dyn NotificationSurface {
        self.ctx.inner.host.notifier.as_ref()
    }
}
