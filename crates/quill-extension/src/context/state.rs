//! Per-activation state cells.
//!
//! Each activation owns a fresh set of typed cells. Extensions keep mutable
//! state here instead of in statics, so a reload starts from a clean slate
//! and two activations never share a flag.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Typed storage private to one activation of one extension.
#[derive(Default)]
pub struct ActivationState {
    cells: Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl std::fmt::Debug for ActivationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cells = self.cells.lock().unwrap_or_else(|e| e.into_inner()).len();
        f.debug_struct("ActivationState")
            .field("cells", &cells)
            .finish()
    }
}

impl ActivationState {
    /// Creates empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell of type `T`, creating it with `T::default()` on first use.
    pub fn get<T>(&self) -> Arc<T>
    where
        T: Default + Send + Sync + 'static,
    {
        let mut cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(typed) = cells
            .get(&TypeId::of::<T>())
            .and_then(|cell| cell.clone().downcast::<T>().ok())
        {
            return typed;
        }
        let typed = Arc::new(T::default());
        cells.insert(TypeId::of::<T>(), typed.clone());
        typed
    }
}
