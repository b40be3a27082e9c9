//! Contribution registry: keyed collections queried by the host UI.
//!
//! Sidebar panels are insert-once. Status-bar items and editor buttons are
//! single-slot upserts: re-registering an id replaces the entry in place
//! (last write wins), as long as the same extension owns it.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::types::{
    EditorButton, EditorButtonOptions, PanelOptions, RenderFactory, SidebarPanel, StatusBarItem,
    StatusBarItemOptions, ToolbarPosition,
};
use crate::error::{ExtensionError, ExtensionResult};
use crate::icon::Icon;
use crate::settings::{SettingsSection, SettingsStore};

/// Common view over keyed, owned contributions.
trait Owned {
    const KIND: &'static str;
    fn id(&self) -> &str;
    fn owner(&self) -> &str;
}

impl Owned for SidebarPanel {
    const KIND: &'static str = "Sidebar panel";
    fn id(&self) -> &str {
        &self.id
    }
    fn owner(&self) -> &str {
        &self.owner
    }
}

impl Owned for StatusBarItem {
    const KIND: &'static str = "Status bar item";
    fn id(&self) -> &str {
        &self.id
    }
    fn owner(&self) -> &str {
        &self.owner
    }
}

impl Owned for EditorButton {
    const KIND: &'static str = "Editor button";
    fn id(&self) -> &str {
        &self.id
    }
    fn owner(&self) -> &str {
        &self.owner
    }
}

fn insert_once<T: Owned>(entries: &mut Vec<T>, entry: T) -> ExtensionResult<()> {
    if let Some(existing) = entries.iter().find(|e| e.id() == entry.id()) {
        return Err(ExtensionError::DuplicateContribution {
            kind: T::KIND,
            id: entry.id().to_string(),
            owner: existing.owner().to_string(),
        });
    }
    entries.push(entry);
    Ok(())
}

fn upsert<T: Owned>(entries: &mut Vec<T>, entry: T) -> ExtensionResult<()> {
    match entries.iter_mut().find(|e| e.id() == entry.id()) {
        Some(existing) if existing.owner() != entry.owner() => {
            Err(ExtensionError::DuplicateContribution {
                kind: T::KIND,
                id: entry.id().to_string(),
                owner: existing.owner().to_string(),
            })
        }
        Some(existing) => {
            *existing = entry;
            Ok(())
        }
        None => {
            entries.push(entry);
            Ok(())
        }
    }
}

fn remove_owned<T: Owned>(entries: &mut Vec<T>, owner: &str) -> usize {
    let before = entries.len();
    entries.retain(|e| e.owner() != owner);
    before - entries.len()
}

/// Counts of entries removed by an ownership sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweptContributions {
    pub sidebar_panels: usize,
    pub status_bar_items: usize,
    pub editor_buttons: usize,
}

impl SweptContributions {
    /// Total number of removed entries.
    pub fn total(&self) -> usize {
        self.sidebar_panels + self.status_bar_items + self.editor_buttons
    }
}

/// Registry of sidebar panels, status-bar items, and editor buttons.
#[derive(Debug)]
pub struct ContributionRegistry {
    /// Sidebar panels in registration order.
    panels: RwLock<Vec<SidebarPanel>>,
    /// Status-bar items in first-registration order.
    status_items: RwLock<Vec<StatusBarItem>>,
    /// Editor buttons in first-registration order.
    buttons: RwLock<Vec<EditorButton>>,
    /// Source of the merged settings contribution list.
    settings: Arc<SettingsStore>,
}

impl ContributionRegistry {
    /// Creates an empty registry exposing the given store's settings.
    pub fn new(settings: Arc<SettingsStore>) -> Self {
        Self {
            panels: RwLock::new(Vec::new()),
            status_items: RwLock::new(Vec::new()),
            buttons: RwLock::new(Vec::new()),
            settings,
        }
    }

    /// Registers a sidebar panel. Panel ids are unique across extensions.
    pub async fn register_sidebar_panel(
        &self,
        owner: &str,
        panel_id: &str,
        options: PanelOptions,
        renderer: RenderFactory,
    ) -> ExtensionResult<()> {
        let panel = SidebarPanel {
            id: panel_id.to_string(),
            owner: owner.to_string(),
            icon: Icon::resolve(&options.icon),
            label: options.label,
            renderer,
        };
        insert_once(&mut *self.panels.write().await, panel)?;
        info!(extension_id = %owner, panel = %panel_id, "Sidebar panel registered");
        Ok(())
    }

    /// Creates or replaces a status-bar item.
    pub async fn upsert_status_bar_item(
        &self,
        owner: &str,
        options: StatusBarItemOptions,
    ) -> ExtensionResult<StatusBarItem> {
        let item = StatusBarItem::from_options(owner, options);
        upsert(&mut *self.status_items.write().await, item.clone())?;
        debug!(extension_id = %owner, item = %item.id, text = %item.text, "Status bar item set");
        Ok(item)
    }

    /// Removes a status-bar item owned by `owner`. Returns whether it existed.
    pub async fn remove_status_bar_item(&self, owner: &str, id: &str) -> ExtensionResult<bool> {
        let mut items = self.status_items.write().await;
        match items.iter().position(|i| i.id == id) {
            Some(index) if items[index].owner != owner => {
                Err(ExtensionError::DuplicateContribution {
                    kind: StatusBarItem::KIND,
                    id: id.to_string(),
                    owner: items[index].owner.clone(),
                })
            }
            Some(index) => {
                items.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Creates or replaces an editor toolbar button.
    pub async fn upsert_editor_button(
        &self,
        owner: &str,
        options: EditorButtonOptions,
    ) -> ExtensionResult<EditorButton> {
        let button = EditorButton::from_options(owner, options);
        upsert(&mut *self.buttons.write().await, button.clone())?;
        debug!(extension_id = %owner, button = %button.id, "Editor button set");
        Ok(button)
    }

    /// Returns all sidebar panels in registration order.
    pub async fn list_sidebar_panels(&self) -> Vec<SidebarPanel> {
        self.panels.read().await.clone()
    }

    /// Returns a sidebar panel by id.
    pub async fn get_sidebar_panel(&self, id: &str) -> Option<SidebarPanel> {
        self.panels.read().await.iter().find(|p| p.id == id).cloned()
    }

    /// Returns a status-bar item by id.
    pub async fn get_status_bar_item(&self, id: &str) -> Option<StatusBarItem> {
        self.status_items
            .read()
            .await
            .iter()
            .find(|i| i.id == id)
            .cloned()
    }

    /// Returns all status-bar items: left side first, then by descending priority.
    pub async fn list_status_bar_items(&self) -> Vec<StatusBarItem> {
        let mut items = self.status_items.read().await.clone();
        items.sort_by(|a, b| {
            a.alignment
                .cmp(&b.alignment)
                .then_with(|| b.priority.cmp(&a.priority))
        });
        items
    }

    /// Returns all editor buttons in first-registration order.
    pub async fn list_editor_buttons(&self) -> Vec<EditorButton> {
        self.buttons.read().await.clone()
    }

    /// Returns editor buttons grouped by toolbar position.
    pub async fn editor_buttons_by_position(&self) -> BTreeMap<ToolbarPosition, Vec<EditorButton>> {
        let mut groups: BTreeMap<ToolbarPosition, Vec<EditorButton>> = BTreeMap::new();
        for button in self.list_editor_buttons().await {
            groups.entry(button.position).or_default().push(button);
        }
        groups
    }

    /// Returns every extension's settings grouped by section.
    pub async fn list_settings_by_section(&self) -> Vec<SettingsSection> {
        self.settings.descriptors_by_section().await
    }

    /// Removes every contribution owned by `owner`.
    pub async fn remove_owned(&self, owner: &str) -> SweptContributions {
        let swept = SweptContributions {
            sidebar_panels: remove_owned(&mut *self.panels.write().await, owner),
            status_bar_items: remove_owned(&mut *self.status_items.write().await, owner),
            editor_buttons: remove_owned(&mut *self.buttons.write().await, owner),
        };
        if swept.total() > 0 {
            info!(
                extension_id = %owner,
                panels = swept.sidebar_panels,
                status_items = swept.status_bar_items,
                buttons = swept.editor_buttons,
                "Contributions removed"
            );
        }
        swept
    }
}
