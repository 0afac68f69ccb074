//! Filter algebra: an immutable boolean-expression system with operator
//! overloading, memoization, and short-circuit evaluation.
//!
//! Used pervasively to gate keybindings, control visibility, and drive
//! application-state predicates (see [`crate::key_binding`]). A [`Filter`]
//! is cheap to clone (it's an `Arc` handle) and safe to share across the
//! render thread and background task threads that might be constructing
//! combinators concurrently — each filter's `&`/`|`/`!` caches are guarded
//! by a mutex.

use std::sync::{Arc, Mutex, OnceLock};

use crate::app_context::{AppContext, EditingMode, FocusTarget, ViInputMode};

/// The constant, per-filter case analysis. `Condition` wraps an arbitrary
/// predicate; the list variants are produced exclusively through
/// [`and_list`] / [`or_list`] so their flattening/dedup invariants hold.
enum Kind {
    Always,
    Never,
    Condition(Box<dyn Fn() -> bool + Send + Sync>),
    AndList(Vec<Filter>),
    OrList(Vec<Filter>),
    Invert(Filter),
}

struct Inner {
    kind: Kind,
    and_cache: Mutex<Vec<(usize, Filter)>>,
    or_cache: Mutex<Vec<(usize, Filter)>>,
    invert_cache: Mutex<Option<Filter>>,
}

/// A boolean expression that can be evaluated repeatedly and combined with
/// `&`, `|`, and `!`.
///
/// `Filter` is a thin `Arc` wrapper: cloning shares the same combinator
/// caches, so `f.and(g)` constructed twice from the same `f`/`g` pair
/// returns the identical combinator instance on the second call.
#[derive(Clone)]
pub struct Filter(Arc<Inner>);

impl Filter {
    fn from_kind(kind: Kind) -> Self {
        Self(Arc::new(Inner {
            kind,
            and_cache: Mutex::new(Vec::new()),
            or_cache: Mutex::new(Vec::new()),
            invert_cache: Mutex::new(None),
        }))
    }

    /// A filter that always evaluates to `true`.
    pub fn always() -> Self {
        Self::from_kind(Kind::Always)
    }

    /// A filter that always evaluates to `false`.
    pub fn never() -> Self {
        Self::from_kind(Kind::Never)
    }

    /// A filter wrapping an arbitrary predicate. The predicate may return a
    /// different result on each call (it typically reads ambient
    /// application state).
    pub fn condition(f: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self::from_kind(Kind::Condition(Box::new(f)))
    }

    /// Evaluate this filter. `AndList`/`OrList` short-circuit: evaluation
    /// stops at the first operand that determines the result, and later
    /// operands are never invoked.
    pub fn invoke(&self) -> bool {
        match &self.0.kind {
            Kind::Always => true,
            Kind::Never => false,
            Kind::Condition(f) => f(),
            Kind::AndList(fs) => fs.iter().all(Filter::invoke),
            Kind::OrList(fs) => fs.iter().any(Filter::invoke),
            Kind::Invert(f) => !f.invoke(),
        }
    }

    fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// Logical AND, memoized by the identity of `other`: calling
    /// `f.and(&g)` twice returns the same combinator instance both times.
    #[must_use]
    pub fn and(&self, other: &Filter) -> Filter {
        let key = other.identity();
        {
            let cache = self.0.and_cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some((_, f)) = cache.iter().find(|(k, _)| *k == key) {
                return f.clone();
            }
        }
        let combined = and_list(vec![self.clone(), other.clone()]);
        let mut cache = self.0.and_cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.push((key, combined.clone()));
        combined
    }

    /// Logical OR, memoized by the identity of `other`.
    #[must_use]
    pub fn or(&self, other: &Filter) -> Filter {
        let key = other.identity();
        {
            let cache = self.0.or_cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some((_, f)) = cache.iter().find(|(k, _)| *k == key) {
                return f.clone();
            }
        }
        let combined = or_list(vec![self.clone(), other.clone()]);
        let mut cache = self.0.or_cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.push((key, combined.clone()));
        combined
    }

    /// Logical NOT. `~Always == Never` and `~Never == Always`; the single
    /// result is cached so repeated `!f` calls return the same instance.
    #[must_use]
    pub fn invert(&self) -> Filter {
        {
            let cache = self
                .0
                .invert_cache
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            if let Some(f) = cache.as_ref() {
                return f.clone();
            }
        }
        let inverted = match &self.0.kind {
            Kind::Always => Filter::never(),
            Kind::Never => Filter::always(),
            _ => Filter::from_kind(Kind::Invert(self.clone())),
        };
        let mut cache = self
            .0
            .invert_cache
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        *cache = Some(inverted.clone());
        inverted
    }

    fn is_always(&self) -> bool {
        matches!(self.0.kind, Kind::Always)
    }

    fn is_never(&self) -> bool {
        matches!(self.0.kind, Kind::Never)
    }
}

impl std::ops::BitAnd for &Filter {
    type Output = Filter;
    fn bitand(self, rhs: &Filter) -> Filter {
        self.and(rhs)
    }
}

impl std::ops::BitOr for &Filter {
    type Output = Filter;
    fn bitor(self, rhs: &Filter) -> Filter {
        self.or(rhs)
    }
}

impl std::ops::Not for &Filter {
    type Output = Filter;
    fn not(self) -> Filter {
        self.invert()
    }
}

/// Flatten nested `AndList`s, deduplicate by identity preserving
/// first-occurrence order, apply `Always & x = x` / `Never & x = Never`,
/// and collapse a single remaining filter to itself rather than wrapping it.
pub fn and_list(filters: Vec<Filter>) -> Filter {
    let mut flat: Vec<Filter> = Vec::new();
    let mut seen: Vec<usize> = Vec::new();
    for f in filters {
        if f.is_never() {
            return Filter::never();
        }
        if f.is_always() {
            continue;
        }
        let mut members = Vec::new();
        match &f.0.kind {
            Kind::AndList(inner) => members.extend(inner.iter().cloned()),
            _ => members.push(f),
        }
        for m in members {
            let id = m.identity();
            if !seen.contains(&id) {
                seen.push(id);
                flat.push(m);
            }
        }
    }
    match flat.len() {
        0 => Filter::always(),
        1 => flat.into_iter().next().unwrap_or_else(Filter::always),
        _ => Filter::from_kind(Kind::AndList(flat)),
    }
}

/// Flatten nested `OrList`s, deduplicate by identity preserving
/// first-occurrence order, apply `Always | x = Always` / `Never | x = x`,
/// and collapse a single remaining filter to itself.
pub fn or_list(filters: Vec<Filter>) -> Filter {
    let mut flat: Vec<Filter> = Vec::new();
    let mut seen: Vec<usize> = Vec::new();
    for f in filters {
        if f.is_always() {
            return Filter::always();
        }
        if f.is_never() {
            continue;
        }
        let mut members = Vec::new();
        match &f.0.kind {
            Kind::OrList(inner) => members.extend(inner.iter().cloned()),
            _ => members.push(f),
        }
        for m in members {
            let id = m.identity();
            if !seen.contains(&id) {
                seen.push(id);
                flat.push(m);
            }
        }
    }
    match flat.len() {
        0 => Filter::never(),
        1 => flat.into_iter().next().unwrap_or_else(Filter::never),
        _ => Filter::from_kind(Kind::OrList(flat)),
    }
}

/// A value that is either a plain `bool` or a [`Filter`] reference,
/// accepted at API boundaries that historically took either (keybinding
/// `when` clauses, widget visibility flags).
pub enum FilterOrBool {
    /// A constant boolean.
    Bool(bool),
    /// A filter to evaluate.
    FilterRef(Filter),
}

impl FilterOrBool {
    /// Convert to a [`Filter`]: a bool becomes `Always`/`Never`, a filter
    /// is returned as-is.
    pub fn to_filter(&self) -> Filter {
        match self {
            FilterOrBool::Bool(true) => Filter::always(),
            FilterOrBool::Bool(false) => Filter::never(),
            FilterOrBool::FilterRef(f) => f.clone(),
        }
    }

    /// Evaluate via [`Self::to_filter`].
    pub fn is_true(&self) -> bool {
        self.to_filter().invoke()
    }
}

impl From<bool> for FilterOrBool {
    fn from(b: bool) -> Self {
        FilterOrBool::Bool(b)
    }
}

impl From<Filter> for FilterOrBool {
    fn from(f: Filter) -> Self {
        FilterOrBool::FilterRef(f)
    }
}

/// The named, ambient-state filters described for the key-binding and
/// control surface: each reads [`AppContext::current`] fresh on every
/// `invoke`, so it tracks whichever application is installed on this
/// thread without needing to be rebuilt.
pub mod app {
    use super::*;

    /// True while the focused buffer has an active selection.
    pub fn has_selection() -> Filter {
        Filter::condition(|| AppContext::current().has_selection())
    }

    /// True while the focused buffer's completion menu has candidates.
    pub fn has_completions() -> Filter {
        Filter::condition(|| AppContext::current().has_completions())
    }

    /// True while the focused buffer's completion menu has a highlighted
    /// entry.
    pub fn completion_is_selected() -> Filter {
        Filter::condition(|| AppContext::current().completion_is_selected())
    }

    /// True while the focused buffer has an auto-suggestion to accept.
    pub fn has_suggestion() -> Filter {
        Filter::condition(|| AppContext::current().has_suggestion())
    }

    /// True while the focused buffer rejects edits.
    pub fn is_read_only() -> Filter {
        Filter::condition(|| AppContext::current().is_read_only())
    }

    /// True while the focused buffer accepts embedded newlines.
    pub fn is_multiline() -> Filter {
        Filter::condition(|| AppContext::current().is_multiline())
    }

    /// True while the focused buffer's last validation failed.
    pub fn has_validation_error() -> Filter {
        Filter::condition(|| AppContext::current().has_validation_error())
    }

    /// True while a numeric prefix argument is being accumulated.
    pub fn has_arg() -> Filter {
        Filter::condition(|| AppContext::current().has_arg())
    }

    /// True once the application considers itself finished.
    pub fn is_done() -> Filter {
        Filter::condition(|| AppContext::current().is_done())
    }

    /// True once the renderer has measured the terminal height at least
    /// once.
    pub fn renderer_height_is_known() -> Filter {
        Filter::condition(|| AppContext::current().renderer_height_is_known())
    }

    /// True while bracketed-paste mode is active.
    pub fn in_paste_mode() -> Filter {
        Filter::condition(|| AppContext::current().in_paste_mode())
    }

    /// True while any buffer has focus.
    pub fn buffer_has_focus() -> Filter {
        Filter::condition(|| AppContext::current().focused_buffer_name().is_some())
    }

    /// True while `target` (a buffer name or window id) currently has
    /// focus. Deliberately not memoized — memoizing by `target`'s identity
    /// would retain every distinct target ever queried for the life of the
    /// process.
    pub fn has_focus(target: FocusTarget) -> Filter {
        Filter::condition(move || {
            let app = AppContext::current();
            match &target {
                FocusTarget::BufferName(name) => app.focused_buffer_name().as_deref() == Some(name.as_str()),
                FocusTarget::WindowId(id) => app.focused_window_id() == Some(*id),
            }
        })
    }

    /// True while the editor's key-binding style is `mode`. Memoized per
    /// mode value: repeated calls with the same `mode` return the same
    /// `Filter` instance.
    pub fn in_editing_mode(mode: EditingMode) -> Filter {
        static CACHE: OnceLock<Mutex<Vec<(EditingMode, Filter)>>> = OnceLock::new();
        let cache = CACHE.get_or_init(|| Mutex::new(Vec::new()));
        let mut guard = cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((_, f)) = guard.iter().find(|(m, _)| *m == mode) {
            return f.clone();
        }
        let filter = Filter::condition(move || AppContext::current().editing_mode() == mode);
        guard.push((mode, filter.clone()));
        filter
    }

    /// True while the editor is using Vi bindings at all, regardless of
    /// sub-mode.
    pub fn vi_mode() -> Filter {
        Filter::condition(|| AppContext::current().editing_mode() == EditingMode::Vi)
    }

    /// True when Vi mode AND (navigation input mode OR temporary
    /// navigation OR the buffer is read-only), AND NOT (an operator is
    /// pending, a digraph is awaited, or a selection is active).
    pub fn vi_navigation_mode() -> Filter {
        Filter::condition(|| {
            let app = AppContext::current();
            if app.editing_mode() != EditingMode::Vi {
                return false;
            }
            let eligible = app.vi_input_mode() == ViInputMode::Navigation
                || app.vi_temporary_navigation()
                || app.is_read_only();
            let blocked = app.vi_operator_pending() || app.vi_waiting_for_digraph() || app.has_selection();
            eligible && !blocked
        })
    }

    fn vi_insert_like(mode: ViInputMode) -> Filter {
        Filter::condition(move || {
            let app = AppContext::current();
            if app.editing_mode() != EditingMode::Vi || app.vi_input_mode() != mode {
                return false;
            }
            let blocked = app.vi_operator_pending()
                || app.vi_waiting_for_digraph()
                || app.has_selection()
                || app.vi_temporary_navigation()
                || app.is_read_only();
            !blocked
        })
    }

    /// True when Vi mode AND insert input mode, AND NOT (operator
    /// pending, digraph wait, active selection, temporary navigation, or
    /// read-only).
    pub fn vi_insert_mode() -> Filter {
        vi_insert_like(ViInputMode::Insert)
    }

    /// Like [`vi_insert_mode`] but for the block-visual-mode `I`/`A`
    /// multi-cursor variant.
    pub fn vi_insert_multiple_mode() -> Filter {
        vi_insert_like(ViInputMode::InsertMultiple)
    }

    /// Like [`vi_insert_mode`] but for `R` replace mode.
    pub fn vi_replace_mode() -> Filter {
        vi_insert_like(ViInputMode::Replace)
    }

    /// Like [`vi_insert_mode`] but for single-character `r` replace mode.
    pub fn vi_replace_single_mode() -> Filter {
        vi_insert_like(ViInputMode::ReplaceSingle)
    }

    /// True while a Vi visual-mode selection is active.
    pub fn vi_selection_mode() -> Filter {
        Filter::condition(|| {
            let app = AppContext::current();
            app.editing_mode() == EditingMode::Vi && app.vi_selection_active()
        })
    }

    /// True while an operator (`d`, `c`, `y`, ...) is waiting for the text
    /// object that completes it.
    pub fn vi_waiting_for_text_object_mode() -> Filter {
        Filter::condition(|| {
            let app = AppContext::current();
            app.editing_mode() == EditingMode::Vi && app.vi_operator_pending()
        })
    }

    /// True while the next keystroke completes a `Ctrl-K` digraph.
    pub fn vi_digraph_mode() -> Filter {
        Filter::condition(|| {
            let app = AppContext::current();
            app.editing_mode() == EditingMode::Vi && app.vi_waiting_for_digraph()
        })
    }

    /// True while a macro recording (`q<register>`) is in progress.
    pub fn vi_recording_macro() -> Filter {
        Filter::condition(|| AppContext::current().vi_recording_register().is_some())
    }

    /// True while the last search direction has been reversed.
    pub fn vi_search_direction_reversed() -> Filter {
        Filter::condition(|| AppContext::current().vi_search_direction_reversed())
    }

    /// True while the editor's key-binding style is Emacs.
    pub fn emacs_mode() -> Filter {
        Filter::condition(|| AppContext::current().editing_mode() == EditingMode::Emacs)
    }

    /// True while in Emacs mode with nothing selected.
    pub fn emacs_insert_mode() -> Filter {
        Filter::condition(|| {
            let app = AppContext::current();
            app.editing_mode() == EditingMode::Emacs && !app.has_selection()
        })
    }

    /// True while in Emacs mode with an active selection
    /// (`Ctrl-Space`-started mark).
    pub fn emacs_selection_mode() -> Filter {
        Filter::condition(|| {
            let app = AppContext::current();
            app.editing_mode() == EditingMode::Emacs && app.has_selection()
        })
    }

    /// True while an incremental search is in progress.
    pub fn is_searching() -> Filter {
        Filter::condition(|| AppContext::current().is_searching())
    }

    /// True while the focused control has a linked search buffer control.
    pub fn control_is_searchable() -> Filter {
        Filter::condition(|| AppContext::current().control_is_searchable())
    }

    /// True while plain cursor movement is extending the active
    /// selection.
    pub fn shift_selection_mode() -> Filter {
        Filter::condition(|| AppContext::current().shift_selection_mode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn always_never() {
        assert!(Filter::always().invoke());
        assert!(!Filter::never().invoke());
    }

    #[test]
    fn and_or_invert_algebra() {
        let t = Filter::condition(|| true);
        let f = Filter::condition(|| false);
        assert!(!t.and(&f).invoke());
        assert!(t.or(&f).invoke());
        assert!(f.invert().invoke());
    }

    #[test]
    fn identity_collapse_always_and() {
        let f = Filter::condition(|| true);
        let combined = and_list(vec![Filter::always(), f.clone()]);
        assert!(combined.identity() == f.identity());
    }

    #[test]
    fn identity_collapse_never_or() {
        let f = Filter::condition(|| true);
        let combined = or_list(vec![Filter::never(), f.clone()]);
        assert!(combined.identity() == f.identity());
    }

    #[test]
    fn and_list_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = calls.clone();
        let f = Filter::never();
        let g = Filter::condition(move || {
            calls2.fetch_add(1, Ordering::SeqCst);
            true
        });
        let combined = and_list(vec![f, g]);
        assert!(!combined.invoke());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn or_list_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = calls.clone();
        let f = Filter::always();
        let g = Filter::condition(move || {
            calls2.fetch_add(1, Ordering::SeqCst);
            false
        });
        let combined = or_list(vec![f, g]);
        assert!(combined.invoke());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn and_list_flattens_and_dedups() {
        let a = Filter::condition(|| true);
        let b = Filter::condition(|| true);
        let ab = and_list(vec![a.clone(), b.clone()]);
        let abc = and_list(vec![ab, a.clone(), b.clone()]);
        match &abc.0.kind {
            Kind::AndList(members) => assert_eq!(members.len(), 2),
            _ => unreachable!("expected a flattened AndList with 2 members"),
        }
    }

    #[test]
    fn or_list_never_short_circuit_return() {
        let x = Filter::condition(|| true);
        let result = or_list(vec![Filter::always(), x]);
        assert!(result.is_always());
    }

    #[test]
    fn and_memoized_by_identity() {
        let f = Filter::condition(|| true);
        let g = Filter::condition(|| false);
        let c1 = f.and(&g);
        let c2 = f.and(&g);
        assert!(c1.identity() == c2.identity());
    }

    #[test]
    fn invert_memoized() {
        let f = Filter::condition(|| true);
        let i1 = f.invert();
        let i2 = f.invert();
        assert!(i1.identity() == i2.identity());
    }

    #[test]
    fn invert_always_is_never() {
        assert!(Filter::always().invert().is_never());
        assert!(Filter::never().invert().is_always());
    }

    #[test]
    fn filter_or_bool_conversion() {
        assert!(FilterOrBool::from(true).is_true());
        assert!(!FilterOrBool::from(false).is_true());
        assert!(FilterOrBool::from(Filter::always()).is_true());
    }

    #[test]
    fn and_list_all_always_collapses_to_always() {
        let r = and_list(vec![Filter::always(), Filter::always()]);
        assert!(r.is_always());
    }

    #[test]
    fn or_list_all_never_collapses_to_never() {
        let r = or_list(vec![Filter::never(), Filter::never()]);
        assert!(r.is_never());
    }

    mod app_filters {
        use super::super::app;
        use crate::app_context::{AppHandle, EditingMode, FocusTarget, SetApp, ViInputMode};
        use std::sync::Arc;

        #[derive(Default)]
        struct Fake {
            editing_mode: EditingMode,
            vi_input_mode: ViInputMode,
            vi_operator_pending: bool,
            vi_waiting_for_digraph: bool,
            vi_selection_active: bool,
            vi_temporary_navigation: bool,
            has_selection: bool,
            is_read_only: bool,
            focused_buffer_name: Option<String>,
            focused_window_id: Option<u64>,
        }

        impl AppHandle for Fake {
            fn invalidate(&self) {}
            fn is_exiting(&self) -> bool {
                false
            }
            fn editing_mode(&self) -> EditingMode {
                self.editing_mode
            }
            fn vi_input_mode(&self) -> ViInputMode {
                self.vi_input_mode
            }
            fn vi_operator_pending(&self) -> bool {
                self.vi_operator_pending
            }
            fn vi_waiting_for_digraph(&self) -> bool {
                self.vi_waiting_for_digraph
            }
            fn vi_selection_active(&self) -> bool {
                self.vi_selection_active
            }
            fn vi_temporary_navigation(&self) -> bool {
                self.vi_temporary_navigation
            }
            fn has_selection(&self) -> bool {
                self.has_selection
            }
            fn is_read_only(&self) -> bool {
                self.is_read_only
            }
            fn focused_buffer_name(&self) -> Option<String> {
                self.focused_buffer_name.clone()
            }
            fn focused_window_id(&self) -> Option<u64> {
                self.focused_window_id
            }
        }

        #[test]
        fn dummy_app_defaults_match_sentinel_description() {
            assert!(app::emacs_mode().invoke());
            assert!(app::emacs_insert_mode().invoke());
            assert!(!app::vi_mode().invoke());
            assert!(!app::has_selection().invoke());
            assert!(!app::is_read_only().invoke());
            assert!(!app::is_searching().invoke());
        }

        #[test]
        fn in_editing_mode_is_memoized_per_mode() {
            let a = app::in_editing_mode(EditingMode::Vi);
            let b = app::in_editing_mode(EditingMode::Vi);
            assert!(a.identity() == b.identity());
            let c = app::in_editing_mode(EditingMode::Emacs);
            assert!(a.identity() != c.identity());
        }

        #[test]
        fn vi_navigation_mode_requires_vi_and_navigation() {
            let fake = Fake {
                editing_mode: EditingMode::Vi,
                vi_input_mode: ViInputMode::Navigation,
                ..Default::default()
            };
            let _guard = SetApp::new(Arc::new(fake));
            assert!(app::vi_navigation_mode().invoke());
            assert!(!app::vi_insert_mode().invoke());
        }

        #[test]
        fn vi_navigation_mode_blocked_by_pending_operator() {
            let fake = Fake {
                editing_mode: EditingMode::Vi,
                vi_input_mode: ViInputMode::Navigation,
                vi_operator_pending: true,
                ..Default::default()
            };
            let _guard = SetApp::new(Arc::new(fake));
            assert!(!app::vi_navigation_mode().invoke());
        }

        #[test]
        fn vi_navigation_mode_via_temporary_navigation() {
            let fake = Fake {
                editing_mode: EditingMode::Vi,
                vi_input_mode: ViInputMode::Insert,
                vi_temporary_navigation: true,
                ..Default::default()
            };
            let _guard = SetApp::new(Arc::new(fake));
            assert!(app::vi_navigation_mode().invoke());
        }

        #[test]
        fn vi_insert_mode_blocked_by_active_selection() {
            let fake = Fake {
                editing_mode: EditingMode::Vi,
                vi_input_mode: ViInputMode::Insert,
                has_selection: true,
                ..Default::default()
            };
            let _guard = SetApp::new(Arc::new(fake));
            assert!(!app::vi_insert_mode().invoke());
        }

        #[test]
        fn emacs_selection_mode_tracks_has_selection() {
            let fake = Fake {
                editing_mode: EditingMode::Emacs,
                has_selection: true,
                ..Default::default()
            };
            let _guard = SetApp::new(Arc::new(fake));
            assert!(app::emacs_selection_mode().invoke());
            assert!(!app::emacs_insert_mode().invoke());
        }

        #[test]
        fn has_focus_compares_by_target() {
            let fake = Fake {
                focused_buffer_name: Some("search".to_string()),
                focused_window_id: Some(7),
                ..Default::default()
            };
            let _guard = SetApp::new(Arc::new(fake));
            assert!(app::has_focus(FocusTarget::BufferName("search".to_string())).invoke());
            assert!(!app::has_focus(FocusTarget::BufferName("other".to_string())).invoke());
            assert!(app::has_focus(FocusTarget::WindowId(7)).invoke());
            assert!(!app::has_focus(FocusTarget::WindowId(8)).invoke());
            assert!(app::buffer_has_focus().invoke());
        }
    }
}
