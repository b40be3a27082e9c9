//! Integration tests for the bundled extensions running inside a full host.

mod helpers;

use std::collections::HashMap;

use serde_json::json;

use quill_builtins::{formatter, live_server, lorem, rest_client};
use quill_core::config::AppConfig;
use quill_core::host::NotificationLevel;
use quill_extension::ExtensionState;

use helpers::TestHost;

const ALL: [&str; 4] = [
    live_server::EXTENSION_ID,
    formatter::EXTENSION_ID,
    lorem::EXTENSION_ID,
    rest_client::EXTENSION_ID,
];

#[tokio::test]
async fn test_start_activates_every_builtin_in_order() {
    let host = TestHost::new().await;
    let report = host.runtime.start(&AppConfig::default()).await;

    assert_eq!(report.activated, ALL);
    assert!(report.failed.is_empty());

    let manager = host.manager();
    for id in ALL {
        assert_eq!(manager.state(id).await, Some(ExtensionState::Active), "{id}");
    }

    let panels: Vec<String> = manager
        .contributions()
        .list_sidebar_panels()
        .await
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(panels, vec![lorem::PANEL_ID, rest_client::PANEL_ID]);

    let sections: Vec<String> = manager
        .contributions()
        .list_settings_by_section()
        .await
        .into_iter()
        .map(|s| s.section)
        .collect();
    assert_eq!(sections, vec!["Live Server", "Prettier", "Lorem Ipsum", "REST Client"]);
}

#[tokio::test]
async fn test_disabled_builtin_is_registered_but_inactive() {
    let mut config = AppConfig::default();
    config.extensions.disabled = vec![lorem::EXTENSION_ID.to_string()];
    let host = TestHost::with_config(config.clone(), HashMap::new()).await;

    let report = host.runtime.start(&config).await;
    assert_eq!(report.skipped, vec![lorem::EXTENSION_ID]);

    let manager = host.manager();
    assert_eq!(manager.state(lorem::EXTENSION_ID).await, Some(ExtensionState::Registered));
    assert!(!manager.commands().contains(lorem::CMD_GENERATE));

    manager.activate(lorem::EXTENSION_ID).await.unwrap();
    assert!(manager.commands().contains(lorem::CMD_GENERATE));
}

#[tokio::test]
async fn test_auto_activate_off_leaves_everything_registered() {
    let mut config = AppConfig::default();
    config.extensions.auto_activate = false;
    let host = TestHost::with_config(config.clone(), HashMap::new()).await;

    let report = host.runtime.start(&config).await;
    assert!(report.activated.is_empty());
    assert_eq!(host.manager().registry().count().await, 4);
    assert!(host.manager().commands().list_commands().is_empty());
}

#[tokio::test]
async fn test_live_server_end_to_end() {
    let host = TestHost::new().await;
    host.runtime.start(&AppConfig::default()).await;
    host.runtime.workspace().set_root(Some("/projects/site".into()));
    let manager = host.manager();

    let item = manager
        .contributions()
        .get_status_bar_item(live_server::STATUS_ITEM_ID)
        .await
        .unwrap();
    assert_eq!(item.text, "Go Live");
    assert_eq!(item.command.as_deref(), Some(live_server::CMD_TOGGLE));

    manager.execute_command(live_server::CMD_TOGGLE, vec![]).await.unwrap();
    assert!(host.services.is_serving(5500));
    let item = manager
        .contributions()
        .get_status_bar_item(live_server::STATUS_ITEM_ID)
        .await
        .unwrap();
    assert_eq!(item.text, "Port: 5500");
    assert!(
        host.notifier
            .messages(NotificationLevel::Information)
            .iter()
            .any(|m| m.contains("5500"))
    );

    host.runtime.shutdown().await;
    assert!(!host.services.is_serving(5500));
    assert!(manager.contributions().list_status_bar_items().await.is_empty());
}

#[tokio::test]
async fn test_reload_one_builtin_leaves_others_untouched() {
    let host = TestHost::new().await;
    host.runtime.start(&AppConfig::default()).await;
    let manager = host.manager();

    let before_commands = manager.commands().list_commands();
    let before_buttons = manager.contributions().list_editor_buttons().await;

    manager.reload(lorem::EXTENSION_ID).await.unwrap();

    assert_eq!(manager.commands().list_commands(), before_commands);
    assert_eq!(manager.contributions().list_editor_buttons().await, before_buttons);
    for id in ALL {
        assert_eq!(manager.state(id).await, Some(ExtensionState::Active), "{id}");
    }
    assert_eq!(
        manager
            .execute_command(lorem::CMD_GENERATE, vec![json!(3), json!("words")])
            .await
            .unwrap(),
        json!("lorem ipsum dolor")
    );
}

#[tokio::test]
async fn test_rest_client_uses_persisted_method() {
    let persisted = HashMap::from([(rest_client::SETTING_DEFAULT_METHOD.to_string(), json!("DELETE"))]);
    let host = TestHost::with_persisted(persisted).await;
    host.runtime.start(&AppConfig::default()).await;
    host.services.set_http_response("https://api.test/items/1", 204, "");

    let response = host
        .manager()
        .execute_command(rest_client::CMD_SEND_REQUEST, vec![json!("https://api.test/items/1")])
        .await
        .unwrap();
    assert_eq!(response["status"], 204);

    let history = host
        .manager()
        .execute_command(rest_client::CMD_HISTORY, vec![])
        .await
        .unwrap();
    assert_eq!(history[0]["method"], "DELETE");
}

#[tokio::test]
async fn test_shutdown_deactivates_everything() {
    let host = TestHost::new().await;
    host.runtime.start(&AppConfig::default()).await;

    host.runtime.shutdown().await;

    let manager = host.manager();
    for id in ALL {
        assert_eq!(manager.state(id).await, Some(ExtensionState::Deactivated), "{id}");
    }
    assert!(manager.commands().list_commands().is_empty());
    assert!(manager.contributions().list_sidebar_panels().await.is_empty());
    assert!(manager.contributions().list_editor_buttons().await.is_empty());
    assert_eq!(manager.settings().get_all().await.len(), 11);
}
