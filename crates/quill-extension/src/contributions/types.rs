//! Contribution shapes consumed by the host UI.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::icon::Icon;

/// Produces the contents of a sidebar panel. Opaque to the runtime.
pub trait PanelRenderer: Send + Sync {
    /// Renders the panel into a view description for the host UI.
    fn render(&self) -> Value;
}

impl<F> PanelRenderer for F
where
    F: Fn() -> Value + Send + Sync,
{
    fn render(&self) -> Value {
        self()
    }
}

/// Shared handle to a panel renderer.
pub type RenderFactory = Arc<dyn PanelRenderer>;

/// Icon and label of a sidebar panel, as requested by the extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelOptions {
    /// Symbolic icon name.
    pub icon: String,
    /// Label shown on hover.
    pub label: String,
}

impl PanelOptions {
    /// Creates panel options.
    pub fn new(icon: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            label: label.into(),
        }
    }
}

/// A registered sidebar panel.
#[derive(Clone, Serialize)]
pub struct SidebarPanel {
    /// Panel id.
    pub id: String,
    /// Extension that registered the panel.
    pub owner: String,
    /// Resolved icon.
    pub icon: Icon,
    /// Label.
    pub label: String,
    /// Renderer invoked by the host UI.
    #[serde(skip)]
    pub renderer: RenderFactory,
}

impl std::fmt::Debug for SidebarPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SidebarPanel")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("icon", &self.icon)
            .field("label", &self.label)
            .field("renderer", &"<renderer>")
            .finish()
    }
}

/// Which end of the status bar an item sits on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBarAlignment {
    #[default]
    Left,
    Right,
}

/// Status-bar item as requested by the extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBarItemOptions {
    /// Item id; re-using it replaces the item.
    pub id: String,
    /// Text shown in the status bar.
    pub text: String,
    /// Command executed when the item is clicked.
    #[serde(default)]
    pub command: Option<String>,
    /// Hover text.
    #[serde(default)]
    pub tooltip: Option<String>,
    /// CSS-style color.
    #[serde(default)]
    pub color: Option<String>,
    /// Side of the status bar.
    #[serde(default)]
    pub alignment: StatusBarAlignment,
    /// Higher priority sits further toward the outer edge.
    #[serde(default)]
    pub priority: i32,
}

impl StatusBarItemOptions {
    /// Creates options with just an id and text.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            command: None,
            tooltip: None,
            color: None,
            alignment: StatusBarAlignment::Left,
            priority: 0,
        }
    }

    /// Sets the command run on click.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Sets the tooltip.
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Sets the color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Places the item on the given side.
    pub fn aligned(mut self, alignment: StatusBarAlignment, priority: i32) -> Self {
        self.alignment = alignment;
        self.priority = priority;
        self
    }
}

/// A status-bar entry as rendered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBarItem {
    pub id: String,
    pub owner: String,
    pub text: String,
    pub command: Option<String>,
    pub tooltip: Option<String>,
    pub color: Option<String>,
    pub alignment: StatusBarAlignment,
    pub priority: i32,
}

impl StatusBarItem {
    pub(crate) fn from_options(owner: &str, options: StatusBarItemOptions) -> Self {
        Self {
            id: options.id,
            owner: owner.to_string(),
            text: options.text,
            command: options.command,
            tooltip: options.tooltip,
            color: options.color,
            alignment: options.alignment,
            priority: options.priority,
        }
    }
}

/// Group of the editor toolbar a button is placed in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolbarPosition {
    Left,
    #[default]
    Right,
}

/// Editor toolbar button as requested by the extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorButtonOptions {
    /// Button id; re-using it replaces the button.
    pub id: String,
    /// Button label.
    pub label: String,
    /// Symbolic icon name.
    #[serde(default)]
    pub icon: String,
    /// Hover text.
    #[serde(default)]
    pub tooltip: Option<String>,
    /// Command executed on click.
    pub command: String,
    /// Toolbar group.
    #[serde(default)]
    pub position: ToolbarPosition,
}

impl EditorButtonOptions {
    /// Creates options for a button running `command`.
    pub fn new(id: impl Into<String>, label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: String::new(),
            tooltip: None,
            command: command.into(),
            position: ToolbarPosition::Right,
        }
    }

    /// Sets the icon name.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Sets the tooltip.
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Sets the toolbar group.
    pub fn at(mut self, position: ToolbarPosition) -> Self {
        self.position = position;
        self
    }
}

/// An editor toolbar button as rendered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorButton {
    pub id: String,
    pub owner: String,
    pub label: String,
    pub icon: Icon,
    pub tooltip: Option<String>,
    pub command: String,
    pub position: ToolbarPosition,
}

impl EditorButton {
    pub(crate) fn from_options(owner: &str, options: EditorButtonOptions) -> Self {
        let icon = if options.icon.is_empty() {
            Icon::Extension
        } else {
            Icon::resolve(&options.icon)
        };
        Self {
            id: options.id,
            owner: owner.to_string(),
            label: options.label,
            icon,
            tooltip: options.tooltip,
            command: options.command,
            position: options.position,
        }
    }
}
