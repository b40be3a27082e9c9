//! Command handler trait and closure adapter.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

/// An invokable command implementation.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Runs the command with caller-supplied arguments.
    async fn call(&self, args: Vec<Value>) -> anyhow::Result<Value>;
}

type BoxedCommandFn = dyn Fn(Vec<Value>) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync;

/// A closure-based command handler.
#[derive(Clone)]
pub struct FnCommand {
    handler: Arc<BoxedCommandFn>,
}

impl std::fmt::Debug for FnCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCommand")
            .field("handler", &"<closure>")
            .finish()
    }
}

impl FnCommand {
    /// Wraps an async closure as a command handler.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        Self {
            handler: Arc::new(move |args| {
                let fut = handler(args);
                Box::pin(fut)
            }),
        }
    }
}

#[async_trait]
impl CommandHandler for FnCommand {
    async fn call(&self, args: Vec<Value>) -> anyhow::Result<Value> {
        (self.handler)(args).await
    }
}
