//! The application run loop: ties together input, layout, rendering, key
//! dispatch, and cooperative background work.
//!
//! Unlike an exception-driven event loop, [`Application::run`] returns an
//! [`AppResult<T>`] describing *why* the loop ended rather than throwing a
//! control-flow exception through the call stack — the same redesign this
//! crate applies to [`crate::error`] generally.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::app_context::{AppHandle, EditingMode, SetApp, ViInputMode};
use crate::buffer::{Buffer, CompletionState};
use crate::controls::BufferControl;
use crate::error::Result;
use crate::filter::Filter;
use crate::input::Input;
use crate::key_binding::processor::{Dispatch, KeyProcessor};
use crate::key_binding::vi_state::ViState;
use crate::key_binding::KeyBindings;
use crate::keys::{KeyId, KeyPress};
use crate::layout::Container;
use crate::output::Output;
use crate::primitives::WritePosition;
use crate::screen::Screen;

/// How a run loop terminated.
///
/// Replaces the common pattern (seen in the toolkit this crate
/// re-architects) of unwinding an exception out of the render loop to
/// signal `Ctrl-C`/`Ctrl-D`: both are ordinary values here.
#[derive(Debug)]
pub enum AppResult<T> {
    /// The loop exited normally, carrying the application's return value.
    Value(T),
    /// The user interrupted the loop. `ControlC` triggers this by default
    /// whenever no registered binding claims it.
    Interrupted,
    /// The input stream closed (`Ctrl-D` on an empty line, or EOF).
    Eof,
}

impl<T> AppResult<T> {
    /// The loop's value, if it exited normally.
    pub fn value(self) -> Option<T> {
        match self {
            AppResult::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Whether the loop ended for a reason other than a normal return.
    pub fn is_interrupted_or_eof(&self) -> bool {
        matches!(self, AppResult::Interrupted | AppResult::Eof)
    }
}

/// Interval the run loop waits for more input before treating a pending,
/// still-ambiguous key sequence (or a bare `Escape`) as complete. Mirrors
/// the VT100 parser's own escape-disambiguation timeout.
const KEY_FLUSH_TIMEOUT: Duration = Duration::from_millis(25);

/// Poll interval used while waiting for [`Input::read_keys`] to produce
/// something, so the loop can also notice invalidation requests and
/// background task completions without a dedicated OS-level multiplexer.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(10);

struct SharedState {
    invalidated: AtomicBool,
    exiting: AtomicBool,
    editing_mode: Mutex<EditingMode>,
    vi: ViState,
    paste_mode: AtomicBool,
    searching: AtomicBool,
    control_searchable: AtomicBool,
    shift_selection: AtomicBool,
    renderer_height_known: AtomicBool,
    arg: Mutex<Option<String>>,
    focused_buffer: Mutex<Option<Arc<Mutex<Buffer>>>>,
    focused_window: Mutex<Option<u64>>,
}

/// The ambient handle registered via [`crate::app_context::AppContext`]
/// while an [`Application`] runs: exposes the full [`AppHandle`] surface
/// every filter and key binding is allowed to touch, regardless of the
/// application's exit-value type `T`.
struct ContextHandle {
    state: Arc<SharedState>,
}

impl ContextHandle {
    fn with_focused_buffer<R>(&self, f: impl FnOnce(&Buffer) -> R) -> Option<R> {
        let focused = self.state.focused_buffer.lock().unwrap_or_else(|e| e.into_inner());
        focused.as_ref().map(|shared| {
            let buffer = shared.lock().unwrap_or_else(|e| e.into_inner());
            f(&buffer)
        })
    }
}

impl AppHandle for ContextHandle {
    fn invalidate(&self) {
        self.state.invalidated.store(true, Ordering::SeqCst);
    }

    fn is_exiting(&self) -> bool {
        self.state.exiting.load(Ordering::SeqCst)
    }

    fn editing_mode(&self) -> EditingMode {
        *self.state.editing_mode.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn vi_input_mode(&self) -> ViInputMode {
        self.state.vi.input_mode()
    }

    fn vi_operator_pending(&self) -> bool {
        self.state.vi.operator_pending()
    }

    fn vi_waiting_for_digraph(&self) -> bool {
        self.state.vi.waiting_for_digraph()
    }

    fn vi_selection_active(&self) -> bool {
        self.state.vi.selection_active()
    }

    fn vi_temporary_navigation(&self) -> bool {
        self.state.vi.temporary_navigation()
    }

    fn vi_recording_register(&self) -> Option<char> {
        self.state.vi.recording_register()
    }

    fn vi_search_direction_reversed(&self) -> bool {
        self.state.vi.search_direction_reversed()
    }

    fn has_selection(&self) -> bool {
        self.with_focused_buffer(|b| b.document().selection().is_some()).unwrap_or(false)
    }

    fn has_completions(&self) -> bool {
        self.with_focused_buffer(|b| !matches!(b.completion_state(), CompletionState::Idle))
            .unwrap_or(false)
    }

    fn completion_is_selected(&self) -> bool {
        self.with_focused_buffer(|b| b.completion_state().current().is_some()).unwrap_or(false)
    }

    fn has_suggestion(&self) -> bool {
        self.with_focused_buffer(|b| b.suggestion().is_some()).unwrap_or(false)
    }

    fn is_read_only(&self) -> bool {
        self.with_focused_buffer(|b| b.is_read_only()).unwrap_or(false)
    }

    fn is_multiline(&self) -> bool {
        self.with_focused_buffer(|b| b.is_multiline()).unwrap_or(false)
    }

    fn has_validation_error(&self) -> bool {
        self.with_focused_buffer(|b| b.validation_error().is_some()).unwrap_or(false)
    }

    fn has_arg(&self) -> bool {
        self.state.arg.lock().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    fn is_done(&self) -> bool {
        self.is_exiting()
    }

    fn renderer_height_is_known(&self) -> bool {
        self.state.renderer_height_known.load(Ordering::SeqCst)
    }

    fn in_paste_mode(&self) -> bool {
        self.state.paste_mode.load(Ordering::SeqCst)
    }

    fn is_searching(&self) -> bool {
        self.state.searching.load(Ordering::SeqCst)
    }

    fn control_is_searchable(&self) -> bool {
        self.state.control_searchable.load(Ordering::SeqCst)
    }

    fn shift_selection_mode(&self) -> bool {
        self.state.shift_selection.load(Ordering::SeqCst)
    }

    fn focused_buffer_name(&self) -> Option<String> {
        self.with_focused_buffer(|b| b.name().map(str::to_string)).flatten()
    }

    fn focused_window_id(&self) -> Option<u64> {
        *self.state.focused_window.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A cloneable, `Send + Sync` handle a key-binding handler closure can
/// capture to end the run loop with a typed exit value — `AppHandle` itself
/// can't carry `T`, since it has to be a single trait object shared by every
/// application on the thread stack.
pub struct ExitHandle<T> {
    state: Arc<SharedState>,
    value: Arc<Mutex<Option<AppResult<T>>>>,
}

impl<T> Clone for ExitHandle<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            value: self.value.clone(),
        }
    }
}

impl<T> ExitHandle<T> {
    fn set(&self, result: AppResult<T>) {
        self.state.exiting.store(true, Ordering::SeqCst);
        *self.value.lock().unwrap_or_else(|e| e.into_inner()) = Some(result);
    }

    /// End the run loop, returning `value` from [`Application::run`].
    pub fn exit(&self, value: T) {
        self.set(AppResult::Value(value));
    }

    /// End the run loop as if the user pressed `Ctrl-C`.
    pub fn exit_interrupted(&self) {
        self.set(AppResult::Interrupted);
    }

    /// End the run loop as if the input stream closed.
    pub fn exit_eof(&self) {
        self.set(AppResult::Eof);
    }

    /// Request a redraw without ending the loop.
    pub fn invalidate(&self) {
        self.state.invalidated.store(true, Ordering::SeqCst);
    }
}

/// A cooperative background task polled once per render cycle; returns
/// `true` once it has no more work to contribute (and can be dropped).
pub type BackgroundTask = Box<dyn FnMut() -> bool + Send>;

/// Coordinates a [`Container`] layout tree, an [`Input`] source, an
/// [`Output`] sink, and a [`KeyBindings`] registry into a render/dispatch
/// loop.
///
/// Generic over the exit value `T` a key binding hands to
/// [`ExitHandle::exit`]. Call [`Self::exit_handle`] to get a handle to
/// capture in binding closures.
pub struct Application<T> {
    layout: Box<dyn Container>,
    input: Box<dyn Input>,
    output: Box<dyn Output>,
    bindings: KeyBindings,
    background_tasks: Vec<BackgroundTask>,
    state: Arc<SharedState>,
    exit_value: Arc<Mutex<Option<AppResult<T>>>>,
    focus_filter: Filter,
}

impl<T: Send + 'static> Application<T> {
    /// Build a run loop over `layout`, reading keys from `input` and
    /// writing frames to `output`.
    pub fn new(layout: Box<dyn Container>, input: Box<dyn Input>, output: Box<dyn Output>) -> Self {
        Self {
            layout,
            input,
            output,
            bindings: KeyBindings::new(),
            background_tasks: Vec::new(),
            state: Arc::new(SharedState {
                invalidated: AtomicBool::new(true),
                exiting: AtomicBool::new(false),
                editing_mode: Mutex::new(EditingMode::Emacs),
                vi: ViState::new(),
                paste_mode: AtomicBool::new(false),
                searching: AtomicBool::new(false),
                control_searchable: AtomicBool::new(false),
                shift_selection: AtomicBool::new(false),
                renderer_height_known: AtomicBool::new(false),
                arg: Mutex::new(None),
                focused_buffer: Mutex::new(None),
                focused_window: Mutex::new(None),
            }),
            exit_value: Arc::new(Mutex::new(None)),
            focus_filter: Filter::always(),
        }
    }

    /// A handle key-binding handlers can capture to end the loop or force
    /// a redraw.
    pub fn exit_handle(&self) -> ExitHandle<T> {
        ExitHandle {
            state: self.state.clone(),
            value: self.exit_value.clone(),
        }
    }

    /// Register a key binding fired while `filter` evaluates to true.
    /// Application-level focus gating (see [`Self::set_focus_filter`]) is
    /// applied by ANDing it into every binding added after it's set.
    pub fn add_binding(
        &mut self,
        keys: Vec<KeyId>,
        filter: Filter,
        handler: impl Fn() + Send + Sync + 'static,
    ) {
        let gated = filter.and(&self.focus_filter);
        self.bindings.add(keys, gated, handler);
    }

    /// Restrict which bindings registered from this point on are eligible
    /// to fire, ANDed with each binding's own filter (used to implement
    /// focus: bindings scoped to a widget that doesn't currently have
    /// focus never match).
    pub fn set_focus_filter(&mut self, filter: Filter) {
        self.focus_filter = filter;
    }

    /// Register a background task polled once per render cycle until it
    /// reports completion. Used for slow auto-suggest/completion sources
    /// that need a chance to hand results back to the render thread (see
    /// [`crate::auto_suggest::Threaded`]).
    pub fn spawn_background_task(&mut self, task: BackgroundTask) {
        self.background_tasks.push(task);
    }

    /// Request a redraw on the next loop iteration.
    pub fn invalidate(&self) {
        self.state.invalidated.store(true, Ordering::SeqCst);
    }

    /// The Vi state machine backing the `Vi*` ambient filters. Key
    /// bindings registered with [`Self::add_binding`] mutate it directly
    /// (e.g. `vi_state().set_input_mode(ViInputMode::Navigation)` on
    /// `Escape`).
    pub fn vi_state(&self) -> &ViState {
        &self.state.vi
    }

    /// Switch between Vi and Emacs key-binding styles.
    pub fn set_editing_mode(&mut self, mode: EditingMode) {
        *self.state.editing_mode.lock().unwrap_or_else(|e| e.into_inner()) = mode;
    }

    /// The active key-binding style.
    pub fn editing_mode(&self) -> EditingMode {
        *self.state.editing_mode.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Mark `control`'s buffer as the focus target `HasSelection`,
    /// `IsReadOnly`, `HasFocus(BufferName(..))`, and friends observe.
    pub fn focus_buffer(&mut self, control: &BufferControl) {
        *self.state.focused_buffer.lock().unwrap_or_else(|e| e.into_inner()) = Some(control.shared_buffer());
    }

    /// Clear the focused buffer (nothing has focus).
    pub fn clear_focused_buffer(&mut self) {
        *self.state.focused_buffer.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Mark `window_id` (see [`crate::layout::window::Window::id`]) as
    /// focused for `HasFocus(WindowId(..))`.
    pub fn focus_window(&mut self, window_id: u64) {
        *self.state.focused_window.lock().unwrap_or_else(|e| e.into_inner()) = Some(window_id);
    }

    /// Set whether bracketed-paste mode is active.
    pub fn set_paste_mode(&mut self, active: bool) {
        self.state.paste_mode.store(active, Ordering::SeqCst);
    }

    /// Set whether an incremental search is in progress.
    pub fn set_searching(&mut self, searching: bool) {
        self.state.searching.store(searching, Ordering::SeqCst);
    }

    /// Set whether the focused control has a linked search buffer
    /// control.
    pub fn set_control_searchable(&mut self, searchable: bool) {
        self.state.control_searchable.store(searchable, Ordering::SeqCst);
    }

    /// Set whether plain cursor movement currently extends the active
    /// selection.
    pub fn set_shift_selection_mode(&mut self, active: bool) {
        self.state.shift_selection.store(active, Ordering::SeqCst);
    }

    /// Set the numeric prefix argument currently being accumulated, or
    /// `None` to clear it.
    pub fn set_arg(&mut self, arg: Option<String>) {
        *self.state.arg.lock().unwrap_or_else(|e| e.into_inner()) = arg;
    }

    /// The numeric prefix argument currently being accumulated, if any.
    pub fn arg(&self) -> Option<String> {
        self.state.arg.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn context_handle(&self) -> Arc<dyn AppHandle> {
        Arc::new(ContextHandle {
            state: self.state.clone(),
        })
    }

    fn render_once(&mut self, size: crate::primitives::Size) -> Result<()> {
        let mut screen = Screen::new(size.width, size.height);
        self.layout
            .write_to_screen(&mut screen, WritePosition::new(0, 0, size.width, size.height));
        screen.flush_floats();
        self.output.render(&screen)?;
        self.output.flush()?;
        self.state.invalidated.store(false, Ordering::SeqCst);
        self.state.renderer_height_known.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn poll_background_tasks(&mut self) {
        self.background_tasks.retain_mut(|task| !task());
    }

    /// `ControlC` with no matching binding falls back to interrupting the
    /// loop, the same default a plain keybinding would give it — except
    /// it's wired in here rather than pre-registered, so it never shadows
    /// a binding the caller adds later (`Dispatch::Unbound` only fires
    /// once nothing in the registry claims the key).
    fn dispatch(&mut self, processor: &mut KeyProcessor<'_>, press: KeyPress) {
        let key = press.key;
        match processor.feed(press) {
            Dispatch::Fired => self.invalidate(),
            Dispatch::Pending => {}
            Dispatch::Unbound => {
                if key == KeyId::ControlC {
                    debug!("application: interrupted");
                    self.exit_handle().exit_interrupted();
                } else {
                    self.invalidate();
                }
            }
        }
    }

    /// Run until a key binding calls [`ExitHandle::exit`]/`exit_interrupted`/
    /// `exit_eof`, or the input stream is closed with nothing else to read.
    pub fn run(mut self) -> AppResult<T> {
        let handle = self.context_handle();
        let _guard = SetApp::new(handle);
        let raw_guard = match self.input.raw_mode() {
            Ok(guard) => Some(guard),
            Err(err) => {
                warn!(error = %err, "failed to enter raw mode; continuing without it");
                None
            }
        };
        let result = self.run_loop();
        drop(raw_guard);
        result
    }

    fn run_loop(&mut self) -> AppResult<T> {
        let bindings = std::mem::take(&mut self.bindings);
        let mut processor = KeyProcessor::new(&bindings);
        let mut last_key_at: Option<Instant> = None;

        loop {
            if self.state.exiting.load(Ordering::SeqCst) {
                break;
            }

            if self.state.invalidated.load(Ordering::SeqCst) {
                let size = self.output.size().unwrap_or(crate::primitives::Size::new(80, 24));
                if let Err(err) = self.render_once(size) {
                    warn!(error = %err, "render failed");
                }
            }

            self.poll_background_tasks();

            let keys = self.input.read_keys();
            if keys.is_empty() {
                if processor.is_pending() {
                    let elapsed = last_key_at.map(|at| at.elapsed()).unwrap_or_default();
                    if elapsed >= KEY_FLUSH_TIMEOUT {
                        let replayed = processor.flush();
                        if !replayed.is_empty() {
                            self.invalidate();
                        }
                    }
                }
                std::thread::sleep(IDLE_POLL_INTERVAL);
                continue;
            }

            for press in keys {
                trace!(key = ?press.key, "application: dispatching key");
                last_key_at = Some(Instant::now());
                self.dispatch(&mut processor, press);
                if self.state.exiting.load(Ordering::SeqCst) {
                    break;
                }
            }
        }

        self.bindings = bindings;
        self.exit_value
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .unwrap_or(AppResult::Eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::pipe::PipeInput;
    use crate::layout::FixedSize;
    use crate::primitives::Size;
    use crate::terminal::TestBackend;

    #[test]
    fn exits_with_value_from_binding() {
        let layout = Box::new(FixedSize::new(Size::new(1, 1)));
        let input = PipeInput::new();
        input.send_bytes("\r");
        let output = Box::new(TestBackend::new(Size::new(10, 10)));
        let mut app: Application<i32> = Application::new(layout, Box::new(input), output);

        let exit_handle = app.exit_handle();
        app.add_binding(vec![KeyId::Enter], Filter::always(), move || {
            exit_handle.exit(42);
        });

        let result = app.run();
        assert_eq!(result.value(), Some(42));
    }

    #[test]
    fn sigint_interrupts() {
        let layout = Box::new(FixedSize::new(Size::new(1, 1)));
        let input = PipeInput::new();
        input.send_bytes("\x03");
        let output = Box::new(TestBackend::new(Size::new(10, 10)));
        let app: Application<()> = Application::new(layout, Box::new(input), output);
        let result = app.run();
        assert!(matches!(result, AppResult::Interrupted));
    }

    #[test]
    fn empty_input_stream_exits_eof() {
        let layout = Box::new(FixedSize::new(Size::new(1, 1)));
        let input = PipeInput::new();
        let output = Box::new(TestBackend::new(Size::new(10, 10)));
        let mut app: Application<()> = Application::new(layout, Box::new(input), output);
        let exit_handle = app.exit_handle();
        app.spawn_background_task(Box::new(move || {
            exit_handle.exit_eof();
            true
        }));
        let result = app.run();
        assert!(matches!(result, AppResult::Eof));
    }

    #[test]
    fn app_result_value_extraction() {
        let v: AppResult<i32> = AppResult::Value(42);
        assert_eq!(v.value(), Some(42));
        assert!(AppResult::<i32>::Interrupted.is_interrupted_or_eof());
    }

    #[test]
    fn focused_buffer_and_editing_mode_drive_ambient_filters() {
        let layout = Box::new(FixedSize::new(Size::new(1, 1)));
        let input = PipeInput::new();
        input.send_bytes("\r");
        let output = Box::new(TestBackend::new(Size::new(10, 10)));
        let mut app: Application<bool> = Application::new(layout, Box::new(input), output);

        let control = BufferControl::new(Buffer::new().read_only(true));
        app.focus_buffer(&control);
        app.set_editing_mode(EditingMode::Vi);
        app.vi_state().set_input_mode(ViInputMode::Navigation);

        let exit_handle = app.exit_handle();
        app.add_binding(vec![KeyId::Enter], Filter::always(), move || {
            let observed = crate::filter::app::is_read_only().invoke()
                && crate::filter::app::vi_mode().invoke()
                && crate::filter::app::vi_navigation_mode().invoke();
            exit_handle.exit(observed);
        });

        let result = app.run();
        assert_eq!(result.value(), Some(true));
    }

    #[test]
    fn no_focused_buffer_reads_as_dummy_defaults() {
        let layout = Box::new(FixedSize::new(Size::new(1, 1)));
        let input = PipeInput::new();
        input.send_bytes("\r");
        let output = Box::new(TestBackend::new(Size::new(10, 10)));
        let mut app: Application<bool> = Application::new(layout, Box::new(input), output);

        let exit_handle = app.exit_handle();
        app.add_binding(vec![KeyId::Enter], Filter::always(), move || {
            let observed = !crate::filter::app::has_selection().invoke()
                && !crate::filter::app::is_read_only().invoke()
                && crate::filter::app::emacs_mode().invoke();
            exit_handle.exit(observed);
        });

        let result = app.run();
        assert_eq!(result.value(), Some(true));
    }
}
