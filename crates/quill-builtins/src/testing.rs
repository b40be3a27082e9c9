//! Test harness running one bundled extension in an isolated runtime.

use std::sync::Arc;

use quill_core::config::extensions::ExtensionsConfig;
use quill_core::host::{MockHostServices, RecordingNotifier, StaticWorkspace};
use quill_extension::{ExtensionModule, HostBindings, LifecycleManager, SettingsStore};

pub(crate) struct Harness {
    pub(crate) manager: LifecycleManager,
    pub(crate) notifier: Arc<RecordingNotifier>,
    pub(crate) services: Arc<MockHostServices>,
    pub(crate) workspace: Arc<StaticWorkspace>,
}

impl Harness {
    /// Registers and activates `module`.
    pub(crate) async fn start(module: ExtensionModule) -> Self {
        let notifier = Arc::new(RecordingNotifier::new());
        let services = Arc::new(MockHostServices::new());
        let workspace = Arc::new(StaticWorkspace::default());
        let host = HostBindings::new(notifier.clone(), workspace.clone(), services.clone());
        let manager = LifecycleManager::new(
            host,
            Arc::new(SettingsStore::new()),
            &ExtensionsConfig::default(),
        );

        let id = module.manifest.id.clone();
        manager.register_module(module).await.expect("register");
        manager.activate(&id).await.expect("activate");

        Self {
            manager,
            notifier,
            services,
            workspace,
        }
    }
}
