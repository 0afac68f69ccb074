//! [`FromHistory`] is the default auto-suggest source wired up by prompts:
//! it offers the tail of the most recent history entry that starts with
//! the current line.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use termform::document::Document;
use termform::history::{InMemoryHistory, SharedHistory};

use termform::auto_suggest::{AutoSuggest, FromHistory};

fn history(entries: &[&str]) -> SharedHistory {
    Arc::new(InMemoryHistory::with_entries(
        entries.iter().map(|s| s.to_string()).collect(),
    ))
}

#[test]
fn suggests_remainder_of_matching_entry() {
    let suggest = FromHistory::new(history(&["git status", "git commit -m wip"]));
    let doc = Document::new("git c", 5);
    let suggestion = suggest.get_suggestion(&doc).unwrap();
    assert_eq!(suggestion.text, "ommit -m wip");
}

#[test]
fn prefers_most_recently_appended_match() {
    let suggest = FromHistory::new(history(&["cargo build", "cargo test --release"]));
    let doc = Document::new("cargo ", 6);
    let suggestion = suggest.get_suggestion(&doc).unwrap();
    assert_eq!(suggestion.text, "test --release");
}

#[test]
fn no_suggestion_on_empty_line() {
    let suggest = FromHistory::new(history(&["ls -la"]));
    let doc = Document::new("", 0);
    assert!(suggest.get_suggestion(&doc).is_none());
}

#[test]
fn no_suggestion_when_entry_equals_line_exactly() {
    let suggest = FromHistory::new(history(&["ls -la"]));
    let doc = Document::new("ls -la", 6);
    assert!(suggest.get_suggestion(&doc).is_none());
}

#[test]
fn no_suggestion_when_nothing_matches() {
    let suggest = FromHistory::new(history(&["ls -la"]));
    let doc = Document::new("cargo", 5);
    assert!(suggest.get_suggestion(&doc).is_none());
}
