//! `KeyProcessor`: matches an incoming stream of [`KeyPress`] events
//! against a [`KeyBindings`] registry, buffering ahead when a prefix is
//! ambiguous (could still extend into a longer binding).

use crate::keys::{KeyId, KeyPress};

use super::KeyBindings;

/// What happened after feeding a key into the processor.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// No binding matched and none could start with this key; the key
    /// should be treated as plain input (inserted into the focused
    /// buffer).
    Unbound,
    /// The pressed sequence is a prefix of at least one active binding;
    /// waiting for more keys or a flush.
    Pending,
    /// A binding fired; contains the number of keys consumed from the
    /// pending buffer that matched it (always the whole buffer, since the
    /// processor dispatches as soon as an exact+no-longer-ambiguous match
    /// exists).
    Fired,
}

/// Drives key-sequence matching against a [`KeyBindings`] registry.
///
/// Call [`Self::feed`] once per incoming key; it returns a [`Dispatch`]
/// describing what happened. When [`Dispatch::Pending`] is returned,
/// [`Self::flush`] should be called after an inter-key timeout (the same
/// way [`crate::vt100::Vt100Parser::flush`] resolves a bare `ESC`): it
/// fires the best remaining match (the longest active binding that is a
/// prefix of what's buffered) or, with nothing bound, replays the
/// buffered keys as plain input via the returned `Vec<KeyPress>`.
pub struct KeyProcessor<'a> {
    bindings: &'a KeyBindings,
    pending_keys: Vec<KeyId>,
    pending_presses: Vec<KeyPress>,
}

impl<'a> KeyProcessor<'a> {
    /// Drive matching against `bindings`.
    pub fn new(bindings: &'a KeyBindings) -> Self {
        Self {
            bindings,
            pending_keys: Vec::new(),
            pending_presses: Vec::new(),
        }
    }

    /// Feed one key press.
    pub fn feed(&mut self, press: KeyPress) -> Dispatch {
        self.pending_keys.push(press.key);
        self.pending_presses.push(press);

        let candidates = self.bindings.matching_prefix(&self.pending_keys);
        if candidates.is_empty() {
            self.pending_keys.clear();
            self.pending_presses.clear();
            return Dispatch::Unbound;
        }

        let exact: Vec<_> = candidates
            .iter()
            .filter(|b| b.keys().len() == self.pending_keys.len())
            .collect();
        let has_longer = candidates.iter().any(|b| b.keys().len() > self.pending_keys.len());

        if !exact.is_empty() && !has_longer {
            exact[0].call();
            self.pending_keys.clear();
            self.pending_presses.clear();
            return Dispatch::Fired;
        }

        Dispatch::Pending
    }

    /// Resolve an ambiguous pending sequence: fire the best exact match if
    /// one exists among what's buffered, otherwise return the buffered
    /// key presses for the caller to treat as plain input.
    pub fn flush(&mut self) -> Vec<KeyPress> {
        if self.pending_keys.is_empty() {
            return Vec::new();
        }
        let candidates = self.bindings.matching_prefix(&self.pending_keys);
        let exact = candidates
            .iter()
            .find(|b| b.keys().len() == self.pending_keys.len());
        if let Some(binding) = exact {
            binding.call();
            self.pending_keys.clear();
            return std::mem::take(&mut self.pending_presses);
        }
        self.pending_keys.clear();
        std::mem::take(&mut self.pending_presses)
    }

    /// Whether a key sequence is currently buffered awaiting more input.
    pub fn is_pending(&self) -> bool {
        !self.pending_keys.is_empty()
    }
}
