//! Ambient application context: a thread-local slot filters and key
//! bindings can read without every closure having to capture an explicit
//! handle.
//!
//! [`Application`](crate::application::Application) pushes itself onto
//! the stack for the duration of its run loop via [`SetApp`]; anything
//! reading [`AppContext::current`] off that thread before an application
//! starts (or after it exits) sees the [`DummyApp`] sentinel rather than
//! panicking.

use std::cell::RefCell;
use std::sync::Arc;

/// Whether the editor is using Vi- or Emacs-style key bindings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EditingMode {
    /// Emacs-style bindings: everything is effectively always in "insert"
    /// mode, with `Ctrl`-prefixed commands.
    #[default]
    Emacs,
    /// Vi-style bindings: modal editing via [`crate::key_binding::vi_state::ViState`].
    Vi,
}

/// The active Vi sub-mode. Meaningless unless [`AppHandle::editing_mode`] is
/// [`EditingMode::Vi`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ViInputMode {
    /// Commands (`h`, `j`, `k`, `l`, `dd`, ...) are interpreted, not
    /// inserted.
    Navigation,
    /// Text is inserted at the cursor as typed.
    #[default]
    Insert,
    /// Like `Insert`, but the inserted text is replayed at every cursor
    /// recorded by a preceding block-visual-mode `I`/`A`.
    InsertMultiple,
    /// Typed characters overwrite existing text instead of being
    /// inserted, until `Escape`.
    Replace,
    /// Like `Replace`, but only a single character is overwritten before
    /// returning to navigation mode (`r` vs `R`).
    ReplaceSingle,
}

/// What [`AppHandle::has_focus`] compares the ambient focus state against.
/// Comparisons are by value for a buffer's name and by the stable identity
/// `u32`/`u64` of the thing the caller holds, never by content, so two
/// distinct buffers that happen to hold equal text don't alias.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FocusTarget {
    /// A buffer given a name via `Buffer::with_name`.
    BufferName(String),
    /// A specific window, identified by its stable `Window::id`.
    WindowId(u64),
}

/// The slice of an `Application`'s state that filters and key bindings are
/// allowed to observe from arbitrary call sites.
///
/// Every method past `invalidate`/`is_exiting` carries a default matching
/// the "dummy application" sentinel described for [`crate::filter`]'s
/// ambient filter surface: Emacs mode, nothing selected, nothing focused,
/// a writable non-searching layout. A concrete handle (e.g. the one
/// [`crate::application::Application`] installs for its run loop) overrides
/// only the methods it can actually answer.
pub trait AppHandle: Send + Sync {
    /// Request a redraw on the next idle tick.
    fn invalidate(&self);

    /// Whether the application's run loop is in the process of exiting.
    fn is_exiting(&self) -> bool;

    /// Vi vs Emacs key-binding style.
    fn editing_mode(&self) -> EditingMode {
        EditingMode::Emacs
    }

    /// The active Vi sub-mode; meaningless when `editing_mode` is Emacs.
    fn vi_input_mode(&self) -> ViInputMode {
        ViInputMode::Insert
    }

    /// Whether a Vi operator (`d`, `c`, `y`, ...) is awaiting its motion.
    fn vi_operator_pending(&self) -> bool {
        false
    }

    /// Whether the next keystroke is expected to complete a `Ctrl-K`
    /// digraph.
    fn vi_waiting_for_digraph(&self) -> bool {
        false
    }

    /// Whether a Vi visual-mode selection is active.
    fn vi_selection_active(&self) -> bool {
        false
    }

    /// Whether a normally-modal key binding forced one navigation command
    /// from within insert mode (`Ctrl-O` in Vi).
    fn vi_temporary_navigation(&self) -> bool {
        false
    }

    /// The register a Vi macro recording (`q<register>`) is being
    /// captured into, if any.
    fn vi_recording_register(&self) -> Option<char> {
        None
    }

    /// Whether the last `/`/`?` search direction has been reversed by `n`.
    fn vi_search_direction_reversed(&self) -> bool {
        false
    }

    /// Whether the focused buffer has an active selection.
    fn has_selection(&self) -> bool {
        false
    }

    /// Whether the focused buffer's completion menu has candidates.
    fn has_completions(&self) -> bool {
        false
    }

    /// Whether the focused buffer's completion menu has a highlighted
    /// entry.
    fn completion_is_selected(&self) -> bool {
        false
    }

    /// Whether the focused buffer has an auto-suggestion to accept.
    fn has_suggestion(&self) -> bool {
        false
    }

    /// Whether the focused buffer rejects edits.
    fn is_read_only(&self) -> bool {
        false
    }

    /// Whether the focused buffer accepts embedded newlines.
    fn is_multiline(&self) -> bool {
        false
    }

    /// Whether the focused buffer's last validation failed.
    fn has_validation_error(&self) -> bool {
        false
    }

    /// Whether a numeric prefix argument is currently being accumulated.
    fn has_arg(&self) -> bool {
        false
    }

    /// Whether the application (a prompt session, typically) considers
    /// itself finished and is only waiting to tear down.
    fn is_done(&self) -> bool {
        false
    }

    /// Whether the renderer has measured the terminal height at least
    /// once (false during the very first layout pass).
    fn renderer_height_is_known(&self) -> bool {
        false
    }

    /// Whether bracketed-paste mode is currently active.
    fn in_paste_mode(&self) -> bool {
        false
    }

    /// Whether an incremental search is in progress.
    fn is_searching(&self) -> bool {
        false
    }

    /// Whether the focused control has a linked search buffer control.
    fn control_is_searchable(&self) -> bool {
        false
    }

    /// Whether plain cursor movement extends the active selection (GUI
    /// "hold shift to select" emulation).
    fn shift_selection_mode(&self) -> bool {
        false
    }

    /// The name of the currently focused buffer, if any.
    fn focused_buffer_name(&self) -> Option<String> {
        None
    }

    /// The stable id of the currently focused window, if any.
    fn focused_window_id(&self) -> Option<u64> {
        None
    }
}

/// The sentinel returned by [`AppContext::current`] when no application is
/// running on the current thread: invalidation is a no-op and exit is
/// always false.
pub struct DummyApp;

impl AppHandle for DummyApp {
    fn invalidate(&self) {}

    fn is_exiting(&self) -> bool {
        false
    }
}

thread_local! {
    static STACK: RefCell<Vec<Arc<dyn AppHandle>>> = const { RefCell::new(Vec::new()) };
}

/// Accessor for the ambient application handle.
pub struct AppContext;

impl AppContext {
    /// The innermost active application on this thread, or the dummy
    /// sentinel if none is running.
    pub fn current() -> Arc<dyn AppHandle> {
        STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .cloned()
                .unwrap_or_else(|| Arc::new(DummyApp) as Arc<dyn AppHandle>)
        })
    }
}

/// RAII guard that pushes `app` onto the ambient stack for its lifetime.
/// Supports nested applications (a sub-application run from within a
/// key-binding handler sees itself as current; dropping its guard
/// restores the parent).
pub struct SetApp {
    _private: (),
}

impl SetApp {
    /// Push `app` as the current application on this thread.
    pub fn new(app: Arc<dyn AppHandle>) -> Self {
        STACK.with(|stack| stack.borrow_mut().push(app));
        Self { _private: () }
    }
}

impl Drop for SetApp {
    fn drop(&mut self) {
        STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}
