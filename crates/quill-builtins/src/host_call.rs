//! Calls into host services with uniform failure handling.

use anyhow::{Context, bail};
use serde_json::Value;
use tracing::debug;

use quill_core::host::HostRequest;
use quill_extension::ExtensionContext;

/// Invokes a host service, treating `{ "success": false }` replies as errors.
pub(crate) async fn call_host(ctx: &ExtensionContext, request: HostRequest) -> anyhow::Result<Value> {
    let name = request.name();
    debug!(extension_id = %ctx.extension_id(), request = name, "Calling host service");

    let reply = ctx
        .host_services()
        .invoke(request)
        .await
        .with_context(|| format!("host service '{name}' failed"))?;

    if reply.get("success").and_then(Value::as_bool) == Some(false) {
        let message = reply
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        bail!("host service '{name}' failed: {message}");
    }
    Ok(reply)
}
