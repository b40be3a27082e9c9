//! Integration tests for extension registration and the lifecycle state machine.

mod helpers;

use std::sync::{Arc, Mutex};

use serde_json::json;

use quill_core::host::NotificationLevel;
use quill_extension::context::ExtensionContext;
use quill_extension::contributions::StatusBarItemOptions;
use quill_extension::traits::FnExtension;
use quill_extension::{ExtensionError, ExtensionState};

use helpers::{TestHost, command_extension, failing_extension, hello_extension, manifest};

#[tokio::test]
async fn test_duplicate_extension_keeps_first_registration() {
    let host = TestHost::new().await;
    let manager = host.manager();

    manager
        .register(manifest("sample.ext"), vec![], hello_extension())
        .await
        .unwrap();
    let err = manager
        .register(manifest("sample.ext"), vec![], command_extension("other"))
        .await
        .unwrap_err();
    assert_eq!(err, ExtensionError::DuplicateExtension("sample.ext".into()));

    manager.activate("sample.ext").await.unwrap();
    assert_eq!(manager.state("sample.ext").await, Some(ExtensionState::Active));
    assert!(manager.commands().contains("sample.hello"));
    assert!(!manager.commands().contains("other.run"));
}

#[tokio::test]
async fn test_failed_activation_is_isolated() {
    let host = TestHost::new().await;
    let manager = host.manager();

    manager
        .register(manifest("broken"), vec![], failing_extension("cannot start"))
        .await
        .unwrap();
    manager
        .register(manifest("healthy"), vec![], command_extension("healthy"))
        .await
        .unwrap();

    let report = manager.activate_all().await;
    assert_eq!(report.failed, vec!["broken"]);
    assert_eq!(report.activated, vec!["healthy"]);

    assert_eq!(manager.state("broken").await, Some(ExtensionState::Failed));
    assert_eq!(manager.state("healthy").await, Some(ExtensionState::Active));
    assert_eq!(
        manager.execute_command("healthy.run", vec![]).await.unwrap(),
        json!("healthy")
    );

    let errors = host.notifier.messages(NotificationLevel::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("cannot start"));
}

#[tokio::test]
async fn test_hello_end_to_end() {
    let host = TestHost::new().await;
    let manager = host.manager();

    manager
        .register(manifest("sample.ext"), vec![], hello_extension())
        .await
        .unwrap();
    manager.activate("sample.ext").await.unwrap();
    assert_eq!(
        manager.execute_command("sample.hello", vec![]).await.unwrap(),
        json!("Hello")
    );

    manager.deactivate("sample.ext").await.unwrap();
    assert_eq!(
        manager.execute_command("sample.hello", vec![]).await,
        Err(ExtensionError::CommandNotFound("sample.hello".into()))
    );
}

#[tokio::test]
async fn test_reload_does_not_accumulate_registrations() {
    let host = TestHost::new().await;
    let manager = host.manager();

    manager
        .register(manifest("sample.ext"), vec![], hello_extension())
        .await
        .unwrap();
    manager.activate("sample.ext").await.unwrap();
    manager.reload("sample.ext").await.unwrap();

    assert_eq!(manager.state("sample.ext").await, Some(ExtensionState::Active));
    assert_eq!(manager.commands().commands_of("sample.ext"), vec!["sample.hello"]);
    let items = manager.contributions().list_status_bar_items().await;
    assert_eq!(items.iter().filter(|i| i.id == "sample-btn").count(), 1);
    assert_eq!(
        manager.execute_command("sample.hello", vec![]).await.unwrap(),
        json!("Hello")
    );
}

#[tokio::test]
async fn test_reactivation_after_deactivate_matches_first_activation() {
    let host = TestHost::new().await;
    let manager = host.manager();

    manager
        .register(manifest("sample.ext"), vec![], hello_extension())
        .await
        .unwrap();
    manager.activate("sample.ext").await.unwrap();
    let first_items = manager.contributions().list_status_bar_items().await;

    manager.deactivate("sample.ext").await.unwrap();
    manager.activate("sample.ext").await.unwrap();

    let second_items = manager.contributions().list_status_bar_items().await;
    assert_eq!(first_items, second_items);
    assert_eq!(manager.commands().list_commands().len(), 1);
}

#[tokio::test]
async fn test_reload_leaves_other_extensions_alone() {
    let host = TestHost::new().await;
    let manager = host.manager();

    manager
        .register(manifest("a"), vec![], command_extension("a"))
        .await
        .unwrap();
    manager
        .register(manifest("b"), vec![], command_extension("b"))
        .await
        .unwrap();
    manager.activate_all().await;

    manager.reload("a").await.unwrap();
    assert_eq!(manager.state("b").await, Some(ExtensionState::Active));
    assert_eq!(manager.execute_command("b.run", vec![]).await.unwrap(), json!("b"));
    assert_eq!(manager.execute_command("a.run", vec![]).await.unwrap(), json!("a"));
}

#[tokio::test]
async fn test_startup_activates_in_registration_order() {
    let host = TestHost::new().await;
    let manager = host.manager();
    let order: Arc<Mutex<Vec<String>>> = Arc::default();

    for id in ["zeta", "alpha", "mid"] {
        let order = order.clone();
        let ext = FnExtension::new(move |ctx: ExtensionContext| {
            let order = order.clone();
            async move {
                tokio::task::yield_now().await;
                order.lock().unwrap().push(ctx.extension_id().to_string());
                ctx.window()
                    .create_status_bar_item(StatusBarItemOptions::new(
                        format!("{}-item", ctx.extension_id()),
                        ctx.extension_id(),
                    ))
                    .await?;
                Ok(())
            }
        })
        .into_arc();
        manager.register(manifest(id), vec![], ext).await.unwrap();
    }

    manager.activate_all().await;

    assert_eq!(*order.lock().unwrap(), vec!["zeta", "alpha", "mid"]);
    let ids: Vec<String> = manager
        .contributions()
        .list_status_bar_items()
        .await
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(ids, vec!["zeta-item", "alpha-item", "mid-item"]);
}

#[tokio::test]
async fn test_lifecycle_misuse_is_rejected() {
    let host = TestHost::new().await;
    let manager = host.manager();

    assert_eq!(
        manager.activate("ghost").await,
        Err(ExtensionError::NotFound("ghost".into()))
    );
    assert_eq!(
        manager.reload("ghost").await,
        Err(ExtensionError::NotFound("ghost".into()))
    );

    manager
        .register(manifest("a"), vec![], command_extension("a"))
        .await
        .unwrap();
    assert!(matches!(
        manager.deactivate("a").await,
        Err(ExtensionError::InvalidState { state: ExtensionState::Registered, .. })
    ));

    manager.activate("a").await.unwrap();
    assert!(matches!(
        manager.activate("a").await,
        Err(ExtensionError::InvalidState { state: ExtensionState::Active, .. })
    ));
}

#[tokio::test]
async fn test_failed_extension_can_be_retried() {
    let host = TestHost::new().await;
    let manager = host.manager();
    let attempts = Arc::new(Mutex::new(0));

    let counter = attempts.clone();
    let flaky = FnExtension::new(move |ctx: ExtensionContext| {
        let counter = counter.clone();
        async move {
            let attempt = {
                let mut n = counter.lock().unwrap();
                *n += 1;
                *n
            };
            ctx.register_command("flaky.run", |_| async { Ok(json!("ok")) })?;
            if attempt == 1 {
                anyhow::bail!("first attempt fails");
            }
            Ok(())
        }
    })
    .into_arc();
    manager.register(manifest("flaky"), vec![], flaky).await.unwrap();

    assert!(manager.activate("flaky").await.is_err());
    assert!(!manager.commands().contains("flaky.run"));

    manager.reload("flaky").await.unwrap();
    assert_eq!(manager.state("flaky").await, Some(ExtensionState::Active));
    assert_eq!(manager.execute_command("flaky.run", vec![]).await.unwrap(), json!("ok"));
}

#[tokio::test]
async fn test_states_snapshot() {
    let host = TestHost::new().await;
    let manager = host.manager();

    manager
        .register(manifest("ok"), vec![], command_extension("ok"))
        .await
        .unwrap();
    manager
        .register(manifest("bad"), vec![], failing_extension("nope"))
        .await
        .unwrap();
    manager.activate_all().await;

    let states = manager.states().await;
    assert_eq!(states.len(), 2);
    assert_eq!(states[0].id, "ok");
    assert_eq!(states[0].state, ExtensionState::Active);
    assert!(states[0].activated_at.is_some());
    assert_eq!(states[1].state, ExtensionState::Failed);
    assert_eq!(states[1].last_error.as_deref(), Some("nope"));
}

#[tokio::test]
async fn test_every_listed_extension_has_a_state() {
    let host = TestHost::new().await;
    let manager = host.manager();

    manager
        .register(manifest("early"), vec![], command_extension("early"))
        .await
        .unwrap();
    let (registered, report) = tokio::join!(
        manager.register(manifest("late"), vec![], command_extension("late")),
        manager.activate_all(),
    );
    registered.unwrap();
    assert!(report.skipped.is_empty());

    for listed in manager.registry().list().await {
        let state = manager.state(&listed.id).await;
        assert!(state.is_some(), "{} has no state", listed.id);
        if state != Some(ExtensionState::Active) {
            manager.activate(&listed.id).await.unwrap();
        }
    }
    assert!(manager.commands().contains("early.run"));
    assert!(manager.commands().contains("late.run"));
}
