//! The editable text buffer: cursor-aware editing on top of [`Document`],
//! with undo history, command history navigation, auto-suggestion, and a
//! completion state machine.

use std::sync::Arc;

use tracing::debug;

use crate::auto_suggest::{AutoSuggest, Dummy as DummyAutoSuggest, Suggestion};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::history::{History, NullHistory, SharedHistory};

/// A single completion candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Text inserted if this completion is applied.
    pub text: String,
    /// Text shown in the completion menu, if different from `text`.
    pub display: String,
    /// How many characters before the cursor this completion replaces.
    pub start_position: usize,
}

impl Completion {
    /// A completion whose display text is the same as its insertion text.
    pub fn new(text: impl Into<String>, start_position: usize) -> Self {
        let text = text.into();
        Self {
            display: text.clone(),
            text,
            start_position,
        }
    }

    /// A completion with separate display and insertion text.
    pub fn with_display(
        text: impl Into<String>,
        display: impl Into<String>,
        start_position: usize,
    ) -> Self {
        Self {
            text: text.into(),
            display: display.into(),
            start_position,
        }
    }
}

/// Lifecycle of the completion menu.
///
/// `Requesting` exists so a slow completer (network, large index) can show
/// a "working" indicator without blocking the render loop; the buffer
/// itself never blocks waiting for completions to arrive.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum CompletionState {
    /// No completion menu is shown.
    #[default]
    Idle,
    /// A completion request was issued but results have not arrived yet.
    Requesting,
    /// Completions are available; `index` is the highlighted entry, if any.
    Active {
        /// Candidate completions for the current cursor position.
        completions: Vec<Completion>,
        /// Currently highlighted completion, if the user has cycled to one.
        index: Option<usize>,
    },
    /// A completion is in the process of being inserted into the buffer.
    Applying,
}

impl CompletionState {
    /// The currently highlighted completion, if any.
    pub fn current(&self) -> Option<&Completion> {
        match self {
            CompletionState::Active {
                completions,
                index: Some(i),
            } => completions.get(*i),
            _ => None,
        }
    }
}

/// Validates a buffer's contents, returning an error message for invalid
/// text or `None` if it is acceptable.
pub trait Validator: Send + Sync {
    /// Validate the given text, returning a diagnostic message on failure.
    fn validate(&self, text: &str) -> Option<String>;
}

/// Accepts anything.
pub struct AcceptAll;

impl Validator for AcceptAll {
    fn validate(&self, _text: &str) -> Option<String> {
        None
    }
}

/// Owns the editable [`Document`], undo/redo history, command history
/// navigation, the current suggestion, and the completion menu state.
///
/// Every mutating method checks `read_only` first and returns
/// [`Error::ReadOnly`] rather than silently ignoring the edit.
pub struct Buffer {
    document: Document,
    read_only: bool,
    multiline: bool,
    name: Option<String>,
    content_version: u64,
    undo_stack: Vec<Document>,
    redo_stack: Vec<Document>,
    history: SharedHistory,
    history_index: Option<usize>,
    working_document: Document,
    suggestion: Option<Suggestion>,
    auto_suggest: Arc<dyn AutoSuggest>,
    completion_state: CompletionState,
    validator: Arc<dyn Validator>,
    validation_error: Option<String>,
    preferred_column: Option<usize>,
}

impl Buffer {
    /// A new, empty, editable buffer with no history and no auto-suggest.
    pub fn new() -> Self {
        Self {
            document: Document::empty(),
            read_only: false,
            multiline: false,
            name: None,
            content_version: 0,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            history: Arc::new(NullHistory),
            history_index: None,
            working_document: Document::empty(),
            suggestion: None,
            auto_suggest: Arc::new(DummyAutoSuggest),
            completion_state: CompletionState::Idle,
            validator: Arc::new(AcceptAll),
            validation_error: None,
            preferred_column: None,
        }
    }

    /// Attach a history for up/down-arrow-style navigation and the record
    /// of accepted lines.
    #[must_use]
    pub fn with_history(mut self, history: SharedHistory) -> Self {
        self.history = history;
        self
    }

    /// Attach an auto-suggest source.
    #[must_use]
    pub fn with_auto_suggest(mut self, auto_suggest: Arc<dyn AutoSuggest>) -> Self {
        self.auto_suggest = auto_suggest;
        self
    }

    /// Attach a validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = validator;
        self.revalidate();
        self
    }

    /// Mark the buffer read-only: all mutating operations return
    /// [`Error::ReadOnly`].
    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Allow newlines to be inserted by `Enter` rather than accepting the
    /// buffer; purely descriptive here, key bindings decide what to do
    /// with it.
    #[must_use]
    pub fn multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    /// Give the buffer a stable name, used to key per-buffer ambient
    /// state (e.g. `HasFocus("name")` filters).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The current document snapshot.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Whether mutating operations are currently rejected.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether this buffer accepts embedded newlines.
    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    /// This buffer's name, if one was given.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Monotonically increasing counter bumped every time the document's
    /// text changes (not on pure cursor/selection moves). Lets callers
    /// like a [`crate::lexer::Lexer`] cache cheaply per content version
    /// instead of re-lexing on every render.
    pub fn content_version(&self) -> u64 {
        self.content_version
    }

    /// The active validation error message, if the last validation failed.
    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    /// The current suggestion, if any.
    pub fn suggestion(&self) -> Option<&Suggestion> {
        self.suggestion.as_ref()
    }

    /// The completion menu's current state.
    pub fn completion_state(&self) -> &CompletionState {
        &self.completion_state
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            Err(Error::ReadOnly)
        } else {
            Ok(())
        }
    }

    fn push_undo(&mut self) {
        self.undo_stack.push(self.document.clone());
        self.redo_stack.clear();
    }

    fn set_document(&mut self, document: Document) {
        self.content_version += 1;
        self.document = document;
        self.completion_state = CompletionState::Idle;
        self.update_suggestion();
        self.revalidate();
    }

    fn revalidate(&mut self) {
        self.validation_error = self.validator.validate(self.document.text());
    }

    fn update_suggestion(&mut self) {
        self.suggestion = self.auto_suggest.get_suggestion(&self.document);
    }

    /// Insert `text` at the cursor, replacing the active selection if one
    /// exists, and advance the cursor past the inserted text.
    pub fn insert_text(&mut self, text: &str) -> Result<()> {
        self.check_writable()?;
        if text.is_empty() {
            return Ok(());
        }
        self.push_undo();
        let before = self.document.text_before_cursor();
        let after = self.document.text_after_cursor();
        let new_text = format!("{before}{text}{after}");
        let new_cursor = before.chars().count() + text.chars().count();
        self.set_document(Document::new(new_text, new_cursor));
        self.preferred_column = None;
        debug!(len = text.len(), "buffer: inserted text");
        Ok(())
    }

    /// Delete `count` characters before the cursor, returning the deleted
    /// text (possibly shorter than `count` if near the start).
    pub fn delete_before_cursor(&mut self, count: usize) -> Result<String> {
        self.check_writable()?;
        if count == 0 {
            return Ok(String::new());
        }
        self.push_undo();
        let cursor = self.document.cursor_position();
        let start = cursor.saturating_sub(count);
        let chars: Vec<char> = self.document.text().chars().collect();
        let deleted: String = chars[start..cursor].iter().collect();
        let remaining: String = chars[..start]
            .iter()
            .chain(chars[cursor..].iter())
            .collect();
        self.set_document(Document::new(remaining, start));
        self.preferred_column = None;
        Ok(deleted)
    }

    /// Delete `count` characters starting at the cursor, returning the
    /// deleted text.
    pub fn delete(&mut self, count: usize) -> Result<String> {
        self.check_writable()?;
        if count == 0 {
            return Ok(String::new());
        }
        self.push_undo();
        let cursor = self.document.cursor_position();
        let chars: Vec<char> = self.document.text().chars().collect();
        let end = (cursor + count).min(chars.len());
        let deleted: String = chars[cursor..end].iter().collect();
        let remaining: String = chars[..cursor]
            .iter()
            .chain(chars[end..].iter())
            .collect();
        self.set_document(Document::new(remaining, cursor));
        self.preferred_column = None;
        Ok(deleted)
    }

    /// Move the cursor by a relative character offset (as returned by the
    /// `Document` navigation helpers), clamped into range.
    pub fn cursor_move(&mut self, relative: isize) {
        let cursor = self.document.cursor_position() as isize + relative;
        let cursor = cursor.max(0) as usize;
        self.document = self.document.with_cursor_position(cursor);
        self.preferred_column = None;
        self.update_suggestion();
    }

    /// Start (or replace) a selection anchored at `anchor`, keeping the
    /// cursor at its current position. Used by mouse handlers doing a
    /// double/triple-click word/line select.
    pub fn set_selection(&mut self, anchor: usize, selection_type: crate::document::SelectionType) {
        let selection = crate::document::Selection::new(anchor, selection_type);
        self.document = self.document.with_selection(Some(selection));
    }

    /// Drop any active selection, leaving the cursor where it is.
    pub fn cancel_selection(&mut self) {
        self.document = self.document.with_selection(None);
    }

    /// Move the cursor up `count` lines, preserving the column across
    /// calls even when intermediate lines are shorter (ragged-text
    /// navigation).
    pub fn cursor_up(&mut self, count: usize) {
        let preferred = self.preferred_column;
        let relative = self.document.get_cursor_up_position(count, preferred);
        if preferred.is_none() {
            let (_, col) = self
                .document
                .translate_index_to_position(self.document.cursor_position());
            self.preferred_column = Some(col);
        }
        let cursor = (self.document.cursor_position() as isize + relative).max(0) as usize;
        self.document = self.document.with_cursor_position(cursor);
        self.update_suggestion();
    }

    /// Move the cursor down `count` lines, preserving the column.
    pub fn cursor_down(&mut self, count: usize) {
        let preferred = self.preferred_column;
        let relative = self.document.get_cursor_down_position(count, preferred);
        if preferred.is_none() {
            let (_, col) = self
                .document
                .translate_index_to_position(self.document.cursor_position());
            self.preferred_column = Some(col);
        }
        let cursor = (self.document.cursor_position() as isize + relative).max(0) as usize;
        self.document = self.document.with_cursor_position(cursor);
        self.update_suggestion();
    }

    /// Undo the last edit, if any. Returns `false` if the undo stack is
    /// empty.
    pub fn undo(&mut self) -> bool {
        if let Some(previous) = self.undo_stack.pop() {
            self.redo_stack.push(self.document.clone());
            self.document = previous;
            self.content_version += 1;
            self.completion_state = CompletionState::Idle;
            self.update_suggestion();
            self.revalidate();
            true
        } else {
            false
        }
    }

    /// Redo the last undone edit, if any.
    pub fn redo(&mut self) -> bool {
        if let Some(next) = self.redo_stack.pop() {
            self.undo_stack.push(self.document.clone());
            self.document = next;
            self.content_version += 1;
            self.completion_state = CompletionState::Idle;
            self.update_suggestion();
            self.revalidate();
            true
        } else {
            false
        }
    }

    /// Move to the previous history entry, stashing the in-progress
    /// working document on first navigation so it can be restored by
    /// [`Self::history_forward`] past the newest entry.
    pub fn history_backward(&mut self) {
        let entries = self.history.load();
        if entries.is_empty() {
            return;
        }
        let next_index = match self.history_index {
            None => {
                self.working_document = self.document.clone();
                entries.len() - 1
            }
            Some(0) => 0,
            Some(i) => i - 1,
        };
        self.history_index = Some(next_index);
        if let Some(text) = entries.get(next_index) {
            self.document = Document::new(text.clone(), text.chars().count());
            self.content_version += 1;
            self.update_suggestion();
            self.revalidate();
        }
    }

    /// Move to the next history entry, or back to the stashed working
    /// document once the newest entry is passed.
    pub fn history_forward(&mut self) {
        let entries = self.history.load();
        match self.history_index {
            None => {}
            Some(i) if i + 1 < entries.len() => {
                self.history_index = Some(i + 1);
                if let Some(text) = entries.get(i + 1) {
                    self.document = Document::new(text.clone(), text.chars().count());
                    self.content_version += 1;
                    self.update_suggestion();
                    self.revalidate();
                }
            }
            Some(_) => {
                self.history_index = None;
                self.document = self.working_document.clone();
                self.content_version += 1;
                self.update_suggestion();
                self.revalidate();
            }
        }
    }

    /// Append the current text to history and reset the in-buffer undo
    /// stack and history navigation cursor, as happens when a line is
    /// accepted.
    pub fn append_to_history(&mut self) {
        self.history.append(self.document.text().to_string());
        self.history_index = None;
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Replace the buffer contents wholesale (used when resetting for a
    /// new prompt).
    pub fn reset(&mut self, text: impl Into<String>) {
        let text = text.into();
        let len = text.chars().count();
        self.document = Document::new(text, len);
        self.content_version += 1;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.history_index = None;
        self.completion_state = CompletionState::Idle;
        self.preferred_column = None;
        self.update_suggestion();
        self.revalidate();
    }

    /// Accept the current suggestion, appending its text at the cursor.
    pub fn accept_suggestion(&mut self) -> Result<()> {
        if let Some(suggestion) = self.suggestion.clone() {
            self.insert_text(&suggestion.text)?;
        }
        Ok(())
    }

    /// Enter the `Requesting` completion state; called when a completion
    /// request is dispatched but results have not arrived.
    pub fn start_completion(&mut self) {
        self.completion_state = CompletionState::Requesting;
    }

    /// Deliver completion candidates, transitioning to `Active`.
    pub fn set_completions(&mut self, completions: Vec<Completion>) {
        self.completion_state = CompletionState::Active {
            completions,
            index: None,
        };
    }

    /// Cycle the highlighted completion forward (wrapping).
    pub fn complete_next(&mut self) {
        if let CompletionState::Active { completions, index } = &mut self.completion_state {
            if completions.is_empty() {
                return;
            }
            *index = Some(match index {
                Some(i) => (*i + 1) % completions.len(),
                None => 0,
            });
        }
    }

    /// Cycle the highlighted completion backward (wrapping).
    pub fn complete_previous(&mut self) {
        if let CompletionState::Active { completions, index } = &mut self.completion_state {
            if completions.is_empty() {
                return;
            }
            *index = Some(match index {
                Some(0) => completions.len() - 1,
                Some(i) => *i - 1,
                None => completions.len() - 1,
            });
        }
    }

    /// Apply the currently highlighted completion, inserting its text and
    /// replacing the `start_position` characters before the cursor.
    pub fn apply_completion(&mut self) -> Result<()> {
        self.check_writable()?;
        let Some(completion) = self.completion_state.current().cloned() else {
            return Ok(());
        };
        self.completion_state = CompletionState::Applying;
        self.push_undo();
        let cursor = self.document.cursor_position();
        let start = cursor.saturating_sub(completion.start_position);
        let chars: Vec<char> = self.document.text().chars().collect();
        let new_text: String = chars[..start]
            .iter()
            .collect::<String>()
            + &completion.text
            + &chars[cursor..].iter().collect::<String>();
        let new_cursor = start + completion.text.chars().count();
        self.document = Document::new(new_text, new_cursor);
        self.content_version += 1;
        self.completion_state = CompletionState::Idle;
        self.update_suggestion();
        self.revalidate();
        Ok(())
    }

    /// Dismiss the completion menu without applying anything.
    pub fn cancel_completion(&mut self) {
        self.completion_state = CompletionState::Idle;
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::InMemoryHistory;

    #[test]
    fn insert_and_read_back() {
        let mut b = Buffer::new();
        b.insert_text("hello").unwrap();
        assert_eq!(b.document().text(), "hello");
        assert_eq!(b.document().cursor_position(), 5);
    }

    #[test]
    fn read_only_rejects_edits() {
        let mut b = Buffer::new().read_only(true);
        let err = b.insert_text("x").unwrap_err();
        assert!(matches!(err, Error::ReadOnly));
        assert!(b.is_read_only());
    }

    #[test]
    fn content_version_bumps_on_edit_not_on_cursor_move() {
        let mut b = Buffer::new();
        let v0 = b.content_version();
        b.insert_text("hello").unwrap();
        let v1 = b.content_version();
        assert!(v1 > v0);
        b.cursor_move(-1);
        assert_eq!(b.content_version(), v1);
    }

    #[test]
    fn name_and_multiline_are_set_by_builders() {
        let b = Buffer::new().with_name("prompt").multiline(true);
        assert_eq!(b.name(), Some("prompt"));
        assert!(b.is_multiline());
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut b = Buffer::new();
        b.insert_text("abc").unwrap();
        b.insert_text("def").unwrap();
        assert_eq!(b.document().text(), "abcdef");
        assert!(b.undo());
        assert_eq!(b.document().text(), "abc");
        assert!(b.redo());
        assert_eq!(b.document().text(), "abcdef");
    }

    #[test]
    fn delete_before_cursor_returns_deleted_text() {
        let mut b = Buffer::new();
        b.insert_text("hello").unwrap();
        let deleted = b.delete_before_cursor(2).unwrap();
        assert_eq!(deleted, "lo");
        assert_eq!(b.document().text(), "hel");
    }

    #[test]
    fn delete_forward() {
        let mut b = Buffer::new();
        b.insert_text("hello").unwrap();
        b.cursor_move(-5);
        let deleted = b.delete(2).unwrap();
        assert_eq!(deleted, "he");
        assert_eq!(b.document().text(), "llo");
    }

    #[test]
    fn history_navigation() {
        let history: SharedHistory = Arc::new(InMemoryHistory::with_entries(vec![
            "first".into(),
            "second".into(),
        ]));
        let mut b = Buffer::new().with_history(history);
        b.insert_text("typing").unwrap();
        b.history_backward();
        assert_eq!(b.document().text(), "second");
        b.history_backward();
        assert_eq!(b.document().text(), "first");
        b.history_forward();
        assert_eq!(b.document().text(), "second");
        b.history_forward();
        assert_eq!(b.document().text(), "typing");
    }

    #[test]
    fn completion_cycle_and_apply() {
        let mut b = Buffer::new();
        b.insert_text("fo").unwrap();
        b.set_completions(vec![Completion::new("foo", 2), Completion::new("food", 2)]);
        b.complete_next();
        assert_eq!(b.completion_state().current().unwrap().text, "foo");
        b.complete_next();
        assert_eq!(b.completion_state().current().unwrap().text, "food");
        b.apply_completion().unwrap();
        assert_eq!(b.document().text(), "food");
        assert_eq!(*b.completion_state(), CompletionState::Idle);
    }

    #[test]
    fn validator_reports_error() {
        struct NonEmpty;
        impl Validator for NonEmpty {
            fn validate(&self, text: &str) -> Option<String> {
                if text.is_empty() {
                    Some("must not be empty".into())
                } else {
                    None
                }
            }
        }
        let mut b = Buffer::new().with_validator(Arc::new(NonEmpty));
        assert_eq!(b.validation_error(), Some("must not be empty"));
        b.insert_text("x").unwrap();
        assert_eq!(b.validation_error(), None);
    }

    #[test]
    fn reset_clears_undo_stack() {
        let mut b = Buffer::new();
        b.insert_text("abc").unwrap();
        b.reset("");
        assert_eq!(b.document().text(), "");
        assert!(!b.undo());
    }
}
