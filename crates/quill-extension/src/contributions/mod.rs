//! Contributions: UI entries extensions add to the shared host.

pub mod registry;
pub mod types;

pub use registry::{ContributionRegistry, SweptContributions};
pub use types::{
    EditorButton, EditorButtonOptions, PanelOptions, PanelRenderer, RenderFactory, SidebarPanel,
    StatusBarAlignment, StatusBarItem, StatusBarItemOptions, ToolbarPosition,
};
