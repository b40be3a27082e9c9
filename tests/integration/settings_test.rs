//! Integration tests for contributed settings and their persistence.

mod helpers;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use quill_core::config::AppConfig;
use quill_core::host::{MockHostServices, RecordingNotifier};
use quill_extension::context::ExtensionContext;
use quill_extension::settings::SettingDescriptor;
use quill_extension::traits::FnExtension;
use quill_extension::ExtensionError;
use quill_host::HostRuntime;

use helpers::{TestHost, command_extension, manifest};

fn port_settings() -> Vec<SettingDescriptor> {
    vec![
        SettingDescriptor::number("x.port", "Port", 5500).in_section("X"),
        SettingDescriptor::toggle("x.open", "Open", true).in_section("X"),
    ]
}

#[tokio::test]
async fn test_defaults_then_override() {
    let host = TestHost::new().await;
    let manager = host.manager();
    manager
        .register(manifest("x"), port_settings(), command_extension("x"))
        .await
        .unwrap();

    let settings = manager.settings().get_all().await;
    assert_eq!(settings.get("x.port"), Some(&json!(5500)));
    assert_eq!(settings.get("x.open"), Some(&json!(true)));

    manager.settings().set("x.port", json!(8080)).await.unwrap();
    let settings = manager.settings().get_all().await;
    assert_eq!(settings.get("x.port"), Some(&json!(8080)));
    assert_eq!(settings.get("x.open"), Some(&json!(true)));
}

#[tokio::test]
async fn test_extension_reads_current_values() {
    let host = TestHost::new().await;
    let manager = host.manager();

    let ext = FnExtension::new(|ctx: ExtensionContext| async move {
        let reader = ctx.clone();
        ctx.register_command("x.readPort", move |_| {
            let ctx = reader.clone();
            async move { Ok(ctx.setting("x.port").await?) }
        })?;
        Ok(())
    })
    .into_arc();
    manager.register(manifest("x"), port_settings(), ext).await.unwrap();
    manager.activate("x").await.unwrap();

    assert_eq!(manager.execute_command("x.readPort", vec![]).await.unwrap(), json!(5500));
    manager.settings().set("x.port", json!(9000)).await.unwrap();
    assert_eq!(manager.execute_command("x.readPort", vec![]).await.unwrap(), json!(9000));
}

#[tokio::test]
async fn test_duplicate_setting_keeps_first_descriptor() {
    let host = TestHost::new().await;
    let manager = host.manager();

    manager
        .register(
            manifest("rest"),
            vec![SettingDescriptor::select("rest.defaultMethod", "Method", &["GET", "POST"], "GET")],
            command_extension("rest"),
        )
        .await
        .unwrap();

    let err = manager
        .register(
            manifest("impostor"),
            vec![SettingDescriptor::text("rest.defaultMethod", "Method", "PUT")],
            command_extension("impostor"),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ExtensionError::DuplicateSetting {
            id: "rest.defaultMethod".into(),
            owner: "rest".into(),
        }
    );

    let descriptor = manager.settings().descriptor("rest.defaultMethod").await.unwrap();
    assert_eq!(descriptor.extension_id, "rest");
    assert_eq!(descriptor.default, json!("GET"));
    assert!(!manager.registry().contains("impostor").await);
}

#[tokio::test]
async fn test_invalid_values_are_rejected() {
    let host = TestHost::new().await;
    let manager = host.manager();
    manager
        .register(manifest("x"), port_settings(), command_extension("x"))
        .await
        .unwrap();

    assert!(matches!(
        manager.settings().set("x.port", json!("eighty")).await,
        Err(ExtensionError::InvalidSettingValue { .. })
    ));
    assert_eq!(
        manager.settings().set("x.missing", json!(1)).await,
        Err(ExtensionError::SettingNotFound("x.missing".into()))
    );
    assert_eq!(manager.settings().get("x.port").await.unwrap(), json!(5500));
    assert!(host.persistence.snapshot().await.is_empty());
}

#[tokio::test]
async fn test_set_is_persisted() {
    let host = TestHost::new().await;
    let manager = host.manager();
    manager
        .register(manifest("x"), port_settings(), command_extension("x"))
        .await
        .unwrap();

    manager.settings().set("x.port", json!(8080)).await.unwrap();
    assert_eq!(host.persistence.snapshot().await.get("x.port"), Some(&json!(8080)));

    manager.settings().reset("x.port").await.unwrap();
    assert!(host.persistence.snapshot().await.get("x.port").is_none());
    assert_eq!(manager.settings().get("x.port").await.unwrap(), json!(5500));
}

#[tokio::test]
async fn test_persisted_overrides_apply_at_registration() {
    let persisted = HashMap::from([
        ("x.port".to_string(), json!(3000)),
        ("x.open".to_string(), json!("not a bool")),
    ]);
    let host = TestHost::with_persisted(persisted).await;
    let manager = host.manager();
    manager
        .register(manifest("x"), port_settings(), command_extension("x"))
        .await
        .unwrap();

    assert_eq!(manager.settings().get("x.port").await.unwrap(), json!(3000));
    assert_eq!(manager.settings().get("x.open").await.unwrap(), json!(true));
}

#[tokio::test]
async fn test_json_file_survives_restart() {
    let path = std::env::temp_dir().join(format!("quill-settings-{}.json", uuid::Uuid::now_v7()));
    let mut config = AppConfig::default();
    config.host.settings_file = path.display().to_string();

    {
        let runtime = HostRuntime::with_settings_file(
            &config,
            Arc::new(RecordingNotifier::new()),
            Arc::new(MockHostServices::new()),
        )
        .await
        .unwrap();
        runtime.start(&config).await;
        runtime
            .manager()
            .settings()
            .set("live-server.port", json!(8081))
            .await
            .unwrap();
        runtime.shutdown().await;
    }

    let runtime = HostRuntime::with_settings_file(
        &config,
        Arc::new(RecordingNotifier::new()),
        Arc::new(MockHostServices::new()),
    )
    .await
    .unwrap();
    runtime.start(&config).await;
    assert_eq!(
        runtime.manager().settings().get("live-server.port").await.unwrap(),
        json!(8081)
    );

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_corrupt_settings_file_boots_with_defaults() {
    let path = std::env::temp_dir().join(format!("quill-settings-{}.json", uuid::Uuid::now_v7()));
    std::fs::write(&path, r#"{ "live-server.port": 55"#).unwrap();
    let mut config = AppConfig::default();
    config.host.settings_file = path.display().to_string();

    let runtime = HostRuntime::with_settings_file(
        &config,
        Arc::new(RecordingNotifier::new()),
        Arc::new(MockHostServices::new()),
    )
    .await
    .unwrap();
    let report = runtime.start(&config).await;
    assert!(report.failed.is_empty());

    let settings = runtime.manager().settings();
    assert_eq!(settings.get("live-server.port").await.unwrap(), json!(5500));
    settings.set("live-server.port", json!(8081)).await.unwrap();
    assert_eq!(settings.get("live-server.port").await.unwrap(), json!(8081));

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_changes_are_broadcast() {
    let host = TestHost::new().await;
    let manager = host.manager();
    manager
        .register(manifest("x"), port_settings(), command_extension("x"))
        .await
        .unwrap();

    let mut changes = manager.settings().subscribe();
    manager.settings().set("x.open", json!(false)).await.unwrap();

    let change = changes.recv().await.unwrap();
    assert_eq!(change.id, "x.open");
    assert_eq!(change.value, json!(false));
}

#[tokio::test]
async fn test_settings_outlive_deactivation() {
    let host = TestHost::new().await;
    let manager = host.manager();
    manager
        .register(manifest("x"), port_settings(), command_extension("x"))
        .await
        .unwrap();
    manager.activate("x").await.unwrap();
    manager.settings().set("x.port", json!(8080)).await.unwrap();

    manager.deactivate("x").await.unwrap();
    assert_eq!(manager.settings().get("x.port").await.unwrap(), json!(8080));
    assert_eq!(manager.contributions().list_settings_by_section().await.len(), 1);
}
