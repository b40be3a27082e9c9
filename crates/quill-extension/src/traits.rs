//! Closure-based extensions for small or test-only modules.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::context::ExtensionContext;
use crate::registry::Extension;

type EntryPoint = dyn Fn(ExtensionContext) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync;

fn boxed<F, Fut>(f: F) -> Arc<EntryPoint>
where
    F: Fn(ExtensionContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

/// An [`Extension`] assembled from async closures.
#[derive(Clone)]
pub struct FnExtension {
    activate: Arc<EntryPoint>,
    deactivate: Option<Arc<EntryPoint>>,
}

impl std::fmt::Debug for FnExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnExtension")
            .field("activate", &"<closure>")
            .field("has_deactivate", &self.deactivate.is_some())
            .finish()
    }
}

impl FnExtension {
    /// Creates an extension from its activation closure.
    pub fn new<F, Fut>(activate: F) -> Self
    where
        F: Fn(ExtensionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            activate: boxed(activate),
            deactivate: None,
        }
    }

    /// Sets the deactivation closure.
    pub fn on_deactivate<F, Fut>(mut self, deactivate: F) -> Self
    where
        F: Fn(ExtensionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.deactivate = Some(boxed(deactivate));
        self
    }

    /// Wraps the extension for registration.
    pub fn into_arc(self) -> Arc<dyn Extension> {
        Arc::new(self)
    }
}

#[async_trait]
impl Extension for FnExtension {
    async fn activate(&self, ctx: ExtensionContext) -> anyhow::Result<()> {
        (self.activate)(ctx).await
    }

    async fn deactivate(&self, ctx: ExtensionContext) -> anyhow::Result<()> {
        match &self.deactivate {
            Some(deactivate) => deactivate(ctx).await,
            None => Ok(()),
        }
    }
}
