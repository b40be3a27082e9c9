//! Containment of faults raised by extension code.
//!
//! Extension futures run behind `catch_unwind`, so a panic inside an
//! activation routine or command handler is reported like a returned error
//! instead of unwinding into the host.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

/// Runs extension code, flattening returned errors and panics into a message.
pub(crate) async fn contain<T, F>(future: F) -> Result<T, String>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(format!("{e:#}")),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
