//! Vi editing-mode state: the mutable side of the `(input_mode,
//! operator_pending, waiting_for_digraph, selection_active,
//! temporary_navigation, recording_register, search_direction_reversed)`
//! tuple that [`crate::filter::app`]'s `Vi*` filters project through
//! [`crate::app_context::AppHandle`].
//!
//! `ViState` itself doesn't install anything into `AppContext` — an
//! application wires its accessors into its own `AppHandle` impl (see
//! [`crate::application::Application`]) so the ambient filters read live
//! state.

use std::sync::{Arc, Mutex};

pub use crate::app_context::ViInputMode;

/// Holds the current Vi sub-mode, pending operator, and the handful of
/// other flags the ambient Vi filters key off of.
pub struct ViState {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    input_mode: ViInputMode,
    pending_operator: Option<char>,
    waiting_for_digraph: bool,
    selection_active: bool,
    temporary_navigation: bool,
    recording_register: Option<char>,
    search_direction_reversed: bool,
    last_find_char: Option<(char, bool)>,
}

impl ViState {
    /// Start in `Insert` mode with every flag clear.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                input_mode: ViInputMode::Insert,
                pending_operator: None,
                waiting_for_digraph: false,
                selection_active: false,
                temporary_navigation: false,
                recording_register: None,
                search_direction_reversed: false,
                last_find_char: None,
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The current sub-mode.
    pub fn input_mode(&self) -> ViInputMode {
        self.lock().input_mode
    }

    /// Transition to a new sub-mode, clearing the pending operator and
    /// (unless the new mode is itself `Navigation`) temporary navigation.
    pub fn set_input_mode(&self, mode: ViInputMode) {
        let mut inner = self.lock();
        inner.input_mode = mode;
        inner.pending_operator = None;
        if mode != ViInputMode::Navigation {
            inner.temporary_navigation = false;
        }
    }

    /// Record an operator (`d`, `c`, `y`) awaiting its motion.
    pub fn set_pending_operator(&self, op: char) {
        self.lock().pending_operator = Some(op);
    }

    /// The pending operator, if any, consuming it.
    pub fn take_pending_operator(&self) -> Option<char> {
        self.lock().pending_operator.take()
    }

    /// Whether an operator is currently pending.
    pub fn operator_pending(&self) -> bool {
        self.lock().pending_operator.is_some()
    }

    /// Whether the next keystroke is expected to complete a `Ctrl-K`
    /// digraph.
    pub fn waiting_for_digraph(&self) -> bool {
        self.lock().waiting_for_digraph
    }

    /// Start or stop waiting for a digraph's second character.
    pub fn set_waiting_for_digraph(&self, waiting: bool) {
        self.lock().waiting_for_digraph = waiting;
    }

    /// Whether a visual-mode selection is active.
    pub fn selection_active(&self) -> bool {
        self.lock().selection_active
    }

    /// Start or stop a visual-mode selection.
    pub fn set_selection_active(&self, active: bool) {
        self.lock().selection_active = active;
    }

    /// Whether `Ctrl-O` (run one navigation command from insert mode) is
    /// currently in effect.
    pub fn temporary_navigation(&self) -> bool {
        self.lock().temporary_navigation
    }

    /// Set or clear temporary navigation.
    pub fn set_temporary_navigation(&self, active: bool) {
        self.lock().temporary_navigation = active;
    }

    /// The register a macro recording is being captured into, if any.
    pub fn recording_register(&self) -> Option<char> {
        self.lock().recording_register
    }

    /// Start recording a macro into `register` (`q<register>`).
    pub fn start_recording(&self, register: char) {
        self.lock().recording_register = Some(register);
    }

    /// Stop recording, returning the register that was being captured.
    pub fn stop_recording(&self) -> Option<char> {
        self.lock().recording_register.take()
    }

    /// Whether the last `/`/`?` search direction has been reversed by `n`.
    pub fn search_direction_reversed(&self) -> bool {
        self.lock().search_direction_reversed
    }

    /// Set or clear the reversed-search-direction flag.
    pub fn set_search_direction_reversed(&self, reversed: bool) {
        self.lock().search_direction_reversed = reversed;
    }

    /// Record the target of `f`/`F`/`t`/`T` so `;`/`,` can repeat it.
    /// `forward` distinguishes `f`/`t` from `F`/`T`.
    pub fn set_last_find(&self, target: char, forward: bool) {
        self.lock().last_find_char = Some((target, forward));
    }

    /// The last `f`/`F`/`t`/`T` target, if any.
    pub fn last_find(&self) -> Option<(char, bool)> {
        self.lock().last_find_char
    }
}

impl Default for ViState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_insert_with_no_flags() {
        let vi = ViState::new();
        assert_eq!(vi.input_mode(), ViInputMode::Insert);
        assert!(!vi.operator_pending());
        assert!(!vi.selection_active());
        assert_eq!(vi.recording_register(), None);
    }

    #[test]
    fn set_input_mode_clears_pending_operator() {
        let vi = ViState::new();
        vi.set_pending_operator('d');
        vi.set_input_mode(ViInputMode::Navigation);
        assert_eq!(vi.take_pending_operator(), None);
    }

    #[test]
    fn set_input_mode_clears_temporary_navigation_unless_navigation() {
        let vi = ViState::new();
        vi.set_temporary_navigation(true);
        vi.set_input_mode(ViInputMode::Insert);
        assert!(!vi.temporary_navigation());

        vi.set_temporary_navigation(true);
        vi.set_input_mode(ViInputMode::Navigation);
        assert!(vi.temporary_navigation());
    }

    #[test]
    fn pending_operator_round_trip() {
        let vi = ViState::new();
        assert!(!vi.operator_pending());
        vi.set_pending_operator('c');
        assert!(vi.operator_pending());
        assert_eq!(vi.take_pending_operator(), Some('c'));
        assert!(!vi.operator_pending());
    }

    #[test]
    fn last_find_round_trip() {
        let vi = ViState::new();
        vi.set_last_find('x', true);
        assert_eq!(vi.last_find(), Some(('x', true)));
    }

    #[test]
    fn recording_register_round_trip() {
        let vi = ViState::new();
        assert_eq!(vi.recording_register(), None);
        vi.start_recording('a');
        assert_eq!(vi.recording_register(), Some('a'));
        assert_eq!(vi.stop_recording(), Some('a'));
        assert_eq!(vi.recording_register(), None);
    }

    #[test]
    fn search_direction_reversed_round_trip() {
        let vi = ViState::new();
        assert!(!vi.search_direction_reversed());
        vi.set_search_direction_reversed(true);
        assert!(vi.search_direction_reversed());
    }
}
