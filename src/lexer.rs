//! Lexers: turn a [`Document`]'s text into per-line styled spans for
//! [`BufferControl`](crate::controls::BufferControl) to paint, without the
//! control itself knowing anything about syntax.

use crate::document::Document;
use crate::style::Style;

/// A line's content split into `(style, text)` runs, in column order.
pub type LineSpans = Vec<(Style, String)>;

/// Maps a content line index to its styled spans. Built fresh by
/// [`Lexer::lex_document`] for a given document snapshot; cheap to call
/// repeatedly across a render pass since `BufferControl` caches the
/// mapper itself rather than re-lexing per cell.
pub type LineMapper = Box<dyn Fn(usize) -> LineSpans + Send + Sync>;

/// Produces a [`LineMapper`] for a document snapshot.
///
/// Implementations see the whole document at once (so multi-line
/// constructs like block comments are possible) but return a per-line
/// function, letting a control request only the lines it actually draws.
pub trait Lexer: Send + Sync {
    /// Build a line mapper for `document`. Called once per content
    /// version, not once per render.
    fn lex_document(&self, document: &Document) -> LineMapper;
}

/// Renders every line in a single style, with no highlighting at all.
pub struct PlainTextLexer {
    style: Style,
}

impl PlainTextLexer {
    /// Paint every character in `style`.
    pub fn new(style: Style) -> Self {
        Self { style }
    }
}

impl Default for PlainTextLexer {
    fn default() -> Self {
        Self::new(Style::new())
    }
}

impl Lexer for PlainTextLexer {
    fn lex_document(&self, document: &Document) -> LineMapper {
        let lines: Vec<String> = document.text().split('\n').map(str::to_string).collect();
        let style = self.style.clone();
        Box::new(move |line_index| match lines.get(line_index) {
            Some(line) if !line.is_empty() => vec![(style.clone(), line.clone())],
            _ => Vec::new(),
        })
    }
}

/// Highlights non-overlapping keyword substrings with a per-keyword
/// style, leaving everything else in the base style. Matches are found
/// independently per line (no multi-line constructs), longest match
/// first at each position so overlapping keywords don't double-paint.
pub struct KeywordLexer {
    base_style: Style,
    keywords: Vec<(String, Style)>,
}

impl KeywordLexer {
    /// `keywords` maps a literal substring to the style it should be
    /// painted in; `base_style` covers everything else.
    pub fn new(base_style: Style, keywords: Vec<(String, Style)>) -> Self {
        let mut keywords = keywords;
        keywords.sort_by_key(|(word, _)| std::cmp::Reverse(word.len()));
        Self { base_style, keywords }
    }

    fn spans_for_line(&self, line: &str) -> LineSpans {
        if line.is_empty() {
            return Vec::new();
        }
        let mut spans = Vec::new();
        let mut rest = line;
        let mut plain_run = String::new();
        while !rest.is_empty() {
            let hit = self
                .keywords
                .iter()
                .find_map(|(word, style)| rest.strip_prefix(word.as_str()).map(|tail| (word, style, tail)));
            match hit {
                Some((word, style, tail)) => {
                    if !plain_run.is_empty() {
                        spans.push((self.base_style.clone(), std::mem::take(&mut plain_run)));
                    }
                    spans.push((style.clone(), word.clone()));
                    rest = tail;
                }
                None => {
                    let mut chars = rest.chars();
                    if let Some(c) = chars.next() {
                        plain_run.push(c);
                    }
                    rest = chars.as_str();
                }
            }
        }
        if !plain_run.is_empty() {
            spans.push((self.base_style.clone(), plain_run));
        }
        spans
    }
}

impl Lexer for KeywordLexer {
    fn lex_document(&self, document: &Document) -> LineMapper {
        let spans: Vec<LineSpans> = document
            .text()
            .split('\n')
            .map(|line| self.spans_for_line(line))
            .collect();
        Box::new(move |line_index| spans.get(line_index).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_lexer_paints_whole_lines() {
        let lexer = PlainTextLexer::new(Style::from("class:text"));
        let doc = Document::new("ab\ncd", 0);
        let mapper = lexer.lex_document(&doc);
        assert_eq!(mapper(0), vec![(Style::from("class:text"), "ab".to_string())]);
        assert_eq!(mapper(1), vec![(Style::from("class:text"), "cd".to_string())]);
        assert_eq!(mapper(2), Vec::new());
    }

    #[test]
    fn keyword_lexer_splits_around_matches() {
        let lexer = KeywordLexer::new(
            Style::new(),
            vec![("fn".to_string(), Style::from("class:keyword"))],
        );
        let doc = Document::new("fn main", 0);
        let mapper = lexer.lex_document(&doc);
        assert_eq!(
            mapper(0),
            vec![
                (Style::from("class:keyword"), "fn".to_string()),
                (Style::new(), " main".to_string()),
            ]
        );
    }

    #[test]
    fn keyword_lexer_prefers_longest_match_at_a_position() {
        let lexer = KeywordLexer::new(
            Style::new(),
            vec![
                ("end".to_string(), Style::from("class:short")),
                ("endif".to_string(), Style::from("class:long")),
            ],
        );
        let doc = Document::new("endif", 0);
        let mapper = lexer.lex_document(&doc);
        assert_eq!(mapper(0), vec![(Style::from("class:long"), "endif".to_string())]);
    }

    #[test]
    fn keyword_lexer_empty_line_has_no_spans() {
        let lexer = KeywordLexer::new(Style::new(), vec![]);
        let doc = Document::new("a\n\nb", 0);
        let mapper = lexer.lex_document(&doc);
        assert_eq!(mapper(1), Vec::new());
    }
}
