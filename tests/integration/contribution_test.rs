//! Integration tests for UI contribution registries.

mod helpers;

use std::sync::Arc;

use serde_json::json;

use quill_extension::context::ExtensionContext;
use quill_extension::contributions::{
    EditorButtonOptions, PanelOptions, StatusBarAlignment, StatusBarItemOptions, ToolbarPosition,
};
use quill_extension::icon::Icon;
use quill_extension::settings::SettingDescriptor;
use quill_extension::traits::FnExtension;
use quill_extension::{Extension, ExtensionError, ExtensionManifest};

use helpers::{TestHost, manifest};

/// Extension whose status item text flips each time its command runs.
fn toggling_extension() -> Arc<dyn Extension> {
    FnExtension::new(|ctx: ExtensionContext| async move {
        ctx.window()
            .create_status_bar_item(
                StatusBarItemOptions::new("live-server-btn", "Go Live")
                    .aligned(StatusBarAlignment::Right, 100),
            )
            .await?;
        let flip = ctx.clone();
        ctx.register_command("toggle.flip", move |_| {
            let ctx = flip.clone();
            async move {
                ctx.window()
                    .create_status_bar_item(
                        StatusBarItemOptions::new("live-server-btn", "Port: 5500")
                            .aligned(StatusBarAlignment::Right, 100),
                    )
                    .await?;
                Ok(json!(null))
            }
        })?;
        Ok(())
    })
    .into_arc()
}

/// Extension contributing one item of every kind.
fn contributing_extension(id: &'static str) -> Arc<dyn Extension> {
    FnExtension::new(move |ctx: ExtensionContext| async move {
        ctx.register_sidebar_panel(
            &format!("{id}-panel"),
            PanelOptions::new("files", id),
            Arc::new(move || json!({ "view": id })),
        )
        .await?;
        ctx.window()
            .create_status_bar_item(StatusBarItemOptions::new(format!("{id}-item"), id))
            .await?;
        ctx.window()
            .register_editor_button(EditorButtonOptions::new(
                format!("{id}-button"),
                id,
                format!("{id}.run"),
            ))
            .await?;
        Ok(())
    })
    .into_arc()
}

#[tokio::test]
async fn test_status_item_last_write_wins() {
    let host = TestHost::new().await;
    let manager = host.manager();
    manager
        .register(manifest("toggle"), vec![], toggling_extension())
        .await
        .unwrap();
    manager.activate("toggle").await.unwrap();

    manager.execute_command("toggle.flip", vec![]).await.unwrap();

    let items = manager.contributions().list_status_bar_items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "live-server-btn");
    assert_eq!(items[0].text, "Port: 5500");
}

#[tokio::test]
async fn test_foreign_item_cannot_be_overwritten() {
    let host = TestHost::new().await;
    let manager = host.manager();
    manager
        .register(manifest("toggle"), vec![], toggling_extension())
        .await
        .unwrap();

    let thief = FnExtension::new(|ctx: ExtensionContext| async move {
        ctx.window()
            .create_status_bar_item(StatusBarItemOptions::new("live-server-btn", "Mine"))
            .await?;
        Ok(())
    })
    .into_arc();
    manager.register(manifest("thief"), vec![], thief).await.unwrap();

    let report = manager.activate_all().await;
    assert_eq!(report.failed, vec!["thief"]);

    let item = manager
        .contributions()
        .get_status_bar_item("live-server-btn")
        .await
        .unwrap();
    assert_eq!(item.owner, "toggle");
    assert_eq!(item.text, "Go Live");
}

#[tokio::test]
async fn test_duplicate_panel_is_rejected() {
    let host = TestHost::new().await;
    let contributions = host.manager().contributions();

    contributions
        .register_sidebar_panel("a", "shared-panel", PanelOptions::new("files", "A"), Arc::new(|| json!("a")))
        .await
        .unwrap();
    let err = contributions
        .register_sidebar_panel("b", "shared-panel", PanelOptions::new("files", "B"), Arc::new(|| json!("b")))
        .await
        .unwrap_err();
    assert!(matches!(err, ExtensionError::DuplicateContribution { ref owner, .. } if owner == "a"));

    let panels = contributions.list_sidebar_panels().await;
    assert_eq!(panels.len(), 1);
    assert_eq!(panels[0].label, "A");
}

#[tokio::test]
async fn test_deactivation_sweeps_only_own_contributions() {
    let host = TestHost::new().await;
    let manager = host.manager();
    manager
        .register(manifest("one"), vec![], contributing_extension("one"))
        .await
        .unwrap();
    manager
        .register(manifest("two"), vec![], contributing_extension("two"))
        .await
        .unwrap();
    manager.activate_all().await;

    manager.deactivate("one").await.unwrap();

    let contributions = manager.contributions();
    let panels = contributions.list_sidebar_panels().await;
    let items = contributions.list_status_bar_items().await;
    let buttons = contributions.list_editor_buttons().await;
    assert_eq!(panels.len(), 1);
    assert_eq!(panels[0].owner, "two");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].owner, "two");
    assert_eq!(buttons.len(), 1);
    assert_eq!(buttons[0].owner, "two");
}

#[tokio::test]
async fn test_settings_grouped_by_section() {
    let host = TestHost::new().await;
    let manager = host.manager();

    let noop = || FnExtension::new(|_ctx: ExtensionContext| async { Ok(()) }).into_arc();
    manager
        .register(
            manifest("a"),
            vec![
                SettingDescriptor::number("a.size", "Size", 1).in_section("Editor"),
                SettingDescriptor::toggle("a.on", "On", true).in_section("Alpha"),
            ],
            noop(),
        )
        .await
        .unwrap();
    manager
        .register(
            manifest("b"),
            vec![SettingDescriptor::text("b.font", "Font", "mono").in_section("Editor")],
            noop(),
        )
        .await
        .unwrap();

    let sections = manager.contributions().list_settings_by_section().await;
    let layout: Vec<(String, Vec<String>)> = sections
        .into_iter()
        .map(|s| (s.section, s.settings.into_iter().map(|d| d.id).collect()))
        .collect();
    assert_eq!(
        layout,
        vec![
            ("Editor".to_string(), vec!["a.size".to_string(), "b.font".to_string()]),
            ("Alpha".to_string(), vec!["a.on".to_string()]),
        ]
    );
}

#[tokio::test]
async fn test_buttons_grouped_by_position() {
    let host = TestHost::new().await;
    let manager = host.manager();

    let ext = FnExtension::new(|ctx: ExtensionContext| async move {
        let window = ctx.window();
        window
            .register_editor_button(EditorButtonOptions::new("run", "Run", "b.run").at(ToolbarPosition::Left))
            .await?;
        window
            .register_editor_button(EditorButtonOptions::new("fmt", "Format", "b.fmt"))
            .await?;
        window
            .register_editor_button(EditorButtonOptions::new("dbg", "Debug", "b.dbg").at(ToolbarPosition::Left))
            .await?;
        Ok(())
    })
    .into_arc();
    manager.register(manifest("b"), vec![], ext).await.unwrap();
    manager.activate("b").await.unwrap();

    let grouped = manager.contributions().editor_buttons_by_position().await;
    let left: Vec<&str> = grouped[&ToolbarPosition::Left].iter().map(|b| b.id.as_str()).collect();
    let right: Vec<&str> = grouped[&ToolbarPosition::Right].iter().map(|b| b.id.as_str()).collect();
    assert_eq!(left, vec!["run", "dbg"]);
    assert_eq!(right, vec!["fmt"]);
}

#[tokio::test]
async fn test_unknown_icons_fall_back() {
    let host = TestHost::new().await;
    let manager = host.manager();

    let ext = FnExtension::new(|ctx: ExtensionContext| async move {
        ctx.register_sidebar_panel("odd-panel", PanelOptions::new("unicorn", "Odd"), Arc::new(|| json!({})))
            .await?;
        Ok(())
    })
    .into_arc();
    manager
        .register(
            ExtensionManifest::new("odd", "Odd", "1.0.0").with_icon("sparkles"),
            vec![],
            ext,
        )
        .await
        .unwrap();
    manager.activate("odd").await.unwrap();

    assert_eq!(manager.registry().get("odd").await.unwrap().icon, Icon::Extension);
    let panel = manager.contributions().get_sidebar_panel("odd-panel").await.unwrap();
    assert_eq!(panel.icon, Icon::Extension);
}

#[tokio::test]
async fn test_status_items_ordered_by_alignment_and_priority() {
    let host = TestHost::new().await;
    let manager = host.manager();

    let ext = FnExtension::new(|ctx: ExtensionContext| async move {
        let window = ctx.window();
        for (id, alignment, priority) in [
            ("right-low", StatusBarAlignment::Right, 1),
            ("left", StatusBarAlignment::Left, 0),
            ("right-high", StatusBarAlignment::Right, 50),
        ] {
            window
                .create_status_bar_item(StatusBarItemOptions::new(id, id).aligned(alignment, priority))
                .await?;
        }
        Ok(())
    })
    .into_arc();
    manager.register(manifest("s"), vec![], ext).await.unwrap();
    manager.activate("s").await.unwrap();

    let ids: Vec<String> = manager
        .contributions()
        .list_status_bar_items()
        .await
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(ids, vec!["left", "right-high", "right-low"]);
}

#[tokio::test]
async fn test_owner_can_dispose_status_item() {
    let host = TestHost::new().await;
    let manager = host.manager();

    let ext = FnExtension::new(|ctx: ExtensionContext| async move {
        ctx.window()
            .create_status_bar_item(StatusBarItemOptions::new("transient", "Working"))
            .await?;
        let disposer = ctx.clone();
        ctx.register_command("transient.done", move |_| {
            let ctx = disposer.clone();
            async move { Ok(json!(ctx.window().dispose_status_bar_item("transient").await?)) }
        })?;
        Ok(())
    })
    .into_arc();
    manager.register(manifest("transient"), vec![], ext).await.unwrap();
    manager.activate("transient").await.unwrap();

    assert_eq!(manager.execute_command("transient.done", vec![]).await.unwrap(), json!(true));
    assert!(manager.contributions().get_status_bar_item("transient").await.is_none());
    assert_eq!(manager.execute_command("transient.done", vec![]).await.unwrap(), json!(false));
}
