//! Key bindings: associating key sequences, gated by filters, with
//! handlers, and the processor that matches an incoming key stream
//! against them.

pub mod digraphs;
pub mod processor;
pub mod vi_state;

use std::sync::Arc;

use crate::filter::Filter;
use crate::keys::KeyId;

/// A handler invoked when its binding's key sequence and filter both
/// match. Returns nothing: handlers communicate through whatever
/// shared/ambient state they close over (typically an
/// [`crate::app_context::AppContext`]-scoped buffer or application
/// handle).
pub type KeyHandler = Arc<dyn Fn() + Send + Sync>;

/// A single registered binding: a key sequence, an optional guard filter,
/// and the handler to run when both match.
pub struct Binding {
    keys: Vec<KeyId>,
    filter: Filter,
    handler: KeyHandler,
}

impl Binding {
    /// The key sequence this binding matches.
    pub fn keys(&self) -> &[KeyId] {
        &self.keys
    }

    /// Whether this binding's guard currently allows it to fire.
    pub fn is_active(&self) -> bool {
        self.filter.invoke()
    }

    /// Invoke the handler.
    pub fn call(&self) {
        (self.handler)();
    }
}

/// A registry of key bindings, searched by the [`processor::KeyProcessor`]
/// on every key press.
#[derive(Default)]
pub struct KeyBindings {
    bindings: Vec<Binding>,
}

impl KeyBindings {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Register a binding for `keys`, gated by `filter`, invoking
    /// `handler` when it fires.
    pub fn add(
        &mut self,
        keys: Vec<KeyId>,
        filter: Filter,
        handler: impl Fn() + Send + Sync + 'static,
    ) {
        self.bindings.push(Binding {
            keys,
            filter,
            handler: Arc::new(handler),
        });
    }

    /// All bindings whose key sequence is a prefix of `pressed` (includes
    /// exact matches, where the binding's sequence equals `pressed`).
    pub fn matching_prefix(&self, pressed: &[KeyId]) -> Vec<&Binding> {
        self.bindings
            .iter()
            .filter(|b| b.is_active() && b.keys.len() >= pressed.len() && &b.keys[..pressed.len()] == pressed)
            .collect()
    }

    /// All bindings, for introspection/testing.
    pub fn all(&self) -> &[Binding] {
        &self.bindings
    }
}
