//! Immutable document model: text plus cursor and selection, addressed by
//! Unicode scalar (code point) offsets.

use unicode_segmentation::UnicodeSegmentation;

/// The shape of an active selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionType {
    /// A contiguous run of text between anchor and cursor.
    Range,
    /// Whole lines between anchor and cursor.
    Line,
    /// A rectangular block between anchor and cursor.
    Block,
}

/// An active selection: an anchor offset plus its shape. The other endpoint
/// is always the document's current cursor position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    /// The offset where the selection was started.
    pub anchor: usize,
    /// The selection's shape.
    pub selection_type: SelectionType,
}

impl Selection {
    /// Create a new selection anchored at `anchor`.
    pub fn new(anchor: usize, selection_type: SelectionType) -> Self {
        Self {
            anchor,
            selection_type,
        }
    }
}

/// An immutable snapshot of editable text: the text itself, a cursor
/// position, and an optional selection anchor.
///
/// Every navigation method returns a new offset (or a new `Document`); none
/// of them mutate. `cursor_position` and `selection.anchor` are always in
/// `0..=text.chars().count()`; out-of-range requests are clamped, never
/// panicking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    text: String,
    cursor_position: usize,
    selection: Option<Selection>,
}

impl Document {
    /// Create a document from `text` with the cursor clamped into range.
    pub fn new(text: impl Into<String>, cursor_position: usize) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            text,
            cursor_position: cursor_position.min(len),
            selection: None,
        }
    }

    /// An empty document with the cursor at offset 0.
    pub fn empty() -> Self {
        Self::new(String::new(), 0)
    }

    /// The full document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The cursor's code-point offset.
    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    /// Number of Unicode scalar values in the text.
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    /// The active selection, if any.
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// A copy of this document with a different cursor position (clamped).
    #[must_use]
    pub fn with_cursor_position(&self, pos: usize) -> Self {
        Self {
            text: self.text.clone(),
            cursor_position: pos.min(self.len_chars()),
            selection: self.selection,
        }
    }

    /// A copy of this document with the selection set.
    #[must_use]
    pub fn with_selection(&self, selection: Option<Selection>) -> Self {
        Self {
            text: self.text.clone(),
            cursor_position: self.cursor_position,
            selection,
        }
    }

    /// The text before the cursor.
    pub fn text_before_cursor(&self) -> String {
        self.text.chars().take(self.cursor_position).collect()
    }

    /// The text after the cursor.
    pub fn text_after_cursor(&self) -> String {
        self.text.chars().skip(self.cursor_position).collect()
    }

    /// The current line: the text between the previous newline (exclusive)
    /// and the cursor, i.e. everything on the cursor's line before it.
    pub fn current_line_before_cursor(&self) -> String {
        self.text_before_cursor()
            .rsplit('\n')
            .next()
            .unwrap_or("")
            .to_string()
    }

    /// The text from the cursor to the next newline (exclusive).
    pub fn current_line_after_cursor(&self) -> String {
        self.text_after_cursor()
            .split('\n')
            .next()
            .unwrap_or("")
            .to_string()
    }

    /// The whole line the cursor is on.
    pub fn current_line(&self) -> String {
        format!(
            "{}{}",
            self.current_line_before_cursor(),
            self.current_line_after_cursor()
        )
    }

    /// Zero-based line index the cursor is on.
    pub fn cursor_row(&self) -> usize {
        self.text_before_cursor().matches('\n').count()
    }

    /// Zero-based column (code-point offset within the current line).
    pub fn cursor_col(&self) -> usize {
        self.current_line_before_cursor().chars().count()
    }

    /// Number of lines in the document (a trailing newline adds one).
    pub fn line_count(&self) -> usize {
        self.text.matches('\n').count() + 1
    }

    /// Translate an offset to `(row, col)`.
    pub fn translate_index_to_position(&self, index: usize) -> (usize, usize) {
        let index = index.min(self.len_chars());
        let prefix: String = self.text.chars().take(index).collect();
        let row = prefix.matches('\n').count();
        let col = prefix.rsplit('\n').next().unwrap_or("").chars().count();
        (row, col)
    }

    /// Translate a `(row, col)` position to an offset, clamping the column
    /// to the line's length.
    pub fn translate_row_col_to_index(&self, row: usize, col: usize) -> usize {
        let lines: Vec<&str> = self.text.split('\n').collect();
        let row = row.min(lines.len().saturating_sub(1));
        let mut index = 0usize;
        for line in lines.iter().take(row) {
            index += line.chars().count() + 1;
        }
        let line_len = lines.get(row).map(|l| l.chars().count()).unwrap_or(0);
        index + col.min(line_len)
    }

    /// Offset one character to the left of the cursor, clamped at 0.
    pub fn get_cursor_left_position(&self, count: usize) -> isize {
        -(count.min(self.cursor_position) as isize)
    }

    /// Offset one character to the right of the cursor, clamped at the end.
    pub fn get_cursor_right_position(&self, count: usize) -> isize {
        let remaining = self.len_chars().saturating_sub(self.cursor_position);
        count.min(remaining) as isize
    }

    /// Relative offset to move the cursor up `count` lines, preserving
    /// `preferred_column` when possible (falling back to the current
    /// column when `None`). Clamps at the top of the document.
    pub fn get_cursor_up_position(&self, count: usize, preferred_column: Option<usize>) -> isize {
        let (row, col) = self.translate_index_to_position(self.cursor_position);
        let target_col = preferred_column.unwrap_or(col);
        let target_row = row.saturating_sub(count);
        let target_index = self.translate_row_col_to_index(target_row, target_col);
        target_index as isize - self.cursor_position as isize
    }

    /// Relative offset to move the cursor down `count` lines, preserving
    /// `preferred_column` when possible. Clamps at the bottom of the
    /// document.
    pub fn get_cursor_down_position(
        &self,
        count: usize,
        preferred_column: Option<usize>,
    ) -> isize {
        let (row, col) = self.translate_index_to_position(self.cursor_position);
        let target_col = preferred_column.unwrap_or(col);
        let max_row = self.line_count().saturating_sub(1);
        let target_row = (row + count).min(max_row);
        let target_index = self.translate_row_col_to_index(target_row, target_col);
        target_index as isize - self.cursor_position as isize
    }

    /// Offset of the start of the word under/before the cursor (Unicode
    /// word-character boundary: letters, digits, underscore).
    pub fn find_start_of_previous_word(&self) -> usize {
        let before: Vec<char> = self.text_before_cursor().chars().collect();
        let mut i = before.len();
        while i > 0 && !is_word_char(before[i - 1]) {
            i -= 1;
        }
        while i > 0 && is_word_char(before[i - 1]) {
            i -= 1;
        }
        i
    }

    /// Offset of the start of the next word after the cursor.
    pub fn find_start_of_next_word(&self) -> usize {
        let after: Vec<char> = self.text_after_cursor().chars().collect();
        let mut i = 0;
        while i < after.len() && is_word_char(after[i]) {
            i += 1;
        }
        while i < after.len() && !is_word_char(after[i]) {
            i += 1;
        }
        self.cursor_position + i
    }

    /// The word (Unicode `\w+`-style run) containing `offset`, as
    /// `(start, end)` code-point bounds. Returns `None` if `offset` does
    /// not sit on a word character and is not adjacent to one.
    pub fn word_bounds_at(&self, offset: usize) -> Option<(usize, usize)> {
        let chars: Vec<char> = self.text.chars().collect();
        if chars.is_empty() {
            return None;
        }
        let offset = offset.min(chars.len().saturating_sub(1));
        if !is_word_char(chars[offset]) {
            return None;
        }
        let mut start = offset;
        while start > 0 && is_word_char(chars[start - 1]) {
            start -= 1;
        }
        let mut end = offset;
        while end + 1 < chars.len() && is_word_char(chars[end + 1]) {
            end += 1;
        }
        Some((start, end + 1))
    }

    /// Word boundaries for the whole document using Unicode word
    /// segmentation (used by double-click word selection).
    pub fn unicode_words(&self) -> Vec<(usize, usize)> {
        let mut bounds = Vec::new();
        for (byte_offset, word) in self.text.split_word_bound_indices() {
            let start_chars = self.text[..byte_offset].chars().count();
            let len_chars = word.chars().count();
            if word.chars().next().is_some_and(is_word_char) {
                bounds.push((start_chars, start_chars + len_chars));
            }
        }
        bounds
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}
