//! Auto-suggestion: the grayed-out completion text shown after the cursor,
//! accepted with the right arrow or `End`.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::trace;

use crate::document::Document;
use crate::filter::{Filter, FilterOrBool};
use crate::history::SharedHistory;

/// Suggested completion text for the current [`Document`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    /// Text to append at the cursor if the suggestion is accepted.
    pub text: String,
}

impl Suggestion {
    /// Wrap suggestion text. An empty string is a valid "no suggestion"
    /// value but callers generally prefer `Option<Suggestion>` for that.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Produces a [`Suggestion`] for the current buffer contents.
///
/// Implementations must be cheap or asynchronous: `get_suggestion` runs on
/// the render path, so anything slow belongs behind [`Threaded`].
pub trait AutoSuggest: Send + Sync {
    /// Compute a suggestion synchronously, or `None` if none applies.
    fn get_suggestion(&self, document: &Document) -> Option<Suggestion>;
}

/// Never suggests anything.
pub struct Dummy;

impl AutoSuggest for Dummy {
    fn get_suggestion(&self, _document: &Document) -> Option<Suggestion> {
        None
    }
}

/// Suggests the most recent history entry that starts with the current
/// line, using the remainder of that entry as the suggestion text.
pub struct FromHistory {
    history: SharedHistory,
}

impl FromHistory {
    /// Suggest from the given history, most recently appended entry wins.
    pub fn new(history: SharedHistory) -> Self {
        Self { history }
    }
}

impl AutoSuggest for FromHistory {
    fn get_suggestion(&self, document: &Document) -> Option<Suggestion> {
        let line = document.current_line_before_cursor();
        if line.trim().is_empty() {
            return None;
        }
        self.history
            .load()
            .into_iter()
            .rev()
            .find_map(|entry| {
                entry
                    .lines()
                    .rev()
                    .find_map(|entry_line| entry_line.strip_prefix(line.as_str()).map(str::to_string))
            })
            .filter(|rest| !rest.is_empty())
            .map(Suggestion::new)
    }
}

/// Wraps an inner [`AutoSuggest`], only consulting it while a [`Filter`]
/// evaluates to true.
pub struct Conditional<A: AutoSuggest> {
    inner: A,
    filter: Filter,
}

impl<A: AutoSuggest> Conditional<A> {
    /// Gate `inner` behind `filter`.
    pub fn new(inner: A, filter: impl Into<FilterOrBool>) -> Self {
        Self {
            inner,
            filter: filter.into().to_filter(),
        }
    }
}

impl<A: AutoSuggest> AutoSuggest for Conditional<A> {
    fn get_suggestion(&self, document: &Document) -> Option<Suggestion> {
        if self.filter.invoke() {
            self.inner.get_suggestion(document)
        } else {
            None
        }
    }
}

/// Delegates to whatever an `Arc<dyn AutoSuggest>`-producing closure
/// currently returns, re-evaluated on every call.
pub struct Dynamic {
    get: Box<dyn Fn() -> Option<Arc<dyn AutoSuggest>> + Send + Sync>,
}

impl Dynamic {
    /// `get` is called on every `get_suggestion` to resolve the current
    /// delegate; returning `None` means no suggestion this round.
    pub fn new(get: impl Fn() -> Option<Arc<dyn AutoSuggest>> + Send + Sync + 'static) -> Self {
        Self { get: Box::new(get) }
    }
}

impl AutoSuggest for Dynamic {
    fn get_suggestion(&self, document: &Document) -> Option<Suggestion> {
        (self.get)().and_then(|inner| inner.get_suggestion(document))
    }
}

/// A request/response pair for delivering a suggestion computed off the
/// render thread.
struct PendingRequest {
    generation: u64,
    text: String,
}

/// Runs an inner [`AutoSuggest`] on a background thread and delivers
/// results back through a channel, so a slow suggestion source (network
/// lookups, large fuzzy indices) never blocks rendering.
///
/// `get_suggestion` is synchronous and always returns the *last delivered*
/// result immediately (never blocks); [`Threaded::poll`] drains the
/// channel to pick up anything new. This mirrors the crate's dummy
/// `AppContext` pattern of keeping the render path non-blocking.
pub struct Threaded {
    sender: Sender<PendingRequest>,
    receiver: Receiver<(u64, Option<Suggestion>)>,
    generation: std::sync::atomic::AtomicU64,
    last: std::sync::Mutex<Option<Suggestion>>,
}

impl Threaded {
    /// Spawn a worker thread driving `inner`.
    pub fn new<A>(inner: A) -> Self
    where
        A: AutoSuggest + 'static,
    {
        let (req_tx, req_rx) = unbounded::<PendingRequest>();
        let (res_tx, res_rx) = unbounded::<(u64, Option<Suggestion>)>();

        let spawned = thread::Builder::new()
            .name("termform-auto-suggest".into())
            .spawn(move || {
                while let Ok(req) = req_rx.recv() {
                    let document = Document::new(req.text, usize::MAX);
                    let suggestion = inner.get_suggestion(&document);
                    trace!(generation = req.generation, found = suggestion.is_some(), "auto-suggest worker result");
                    if res_tx.send((req.generation, suggestion)).is_err() {
                        break;
                    }
                }
            });
        if let Err(err) = spawned {
            tracing::error!(error = %err, "failed to spawn auto-suggest worker thread; suggestions will never arrive");
        }

        Self {
            sender: req_tx,
            receiver: res_rx,
            generation: std::sync::atomic::AtomicU64::new(0),
            last: std::sync::Mutex::new(None),
        }
    }

    /// Drain any results the worker has delivered since the last poll,
    /// keeping only the most recent generation's answer.
    pub fn poll(&self) {
        let current = self.generation.load(std::sync::atomic::Ordering::SeqCst);
        let mut newest: Option<(u64, Option<Suggestion>)> = None;
        while let Ok(item) = self.receiver.try_recv() {
            if newest.as_ref().map(|(g, _)| item.0 > *g).unwrap_or(true) {
                newest = Some(item);
            }
        }
        if let Some((generation, suggestion)) = newest {
            if generation == current {
                *self.last.lock().unwrap_or_else(|e| e.into_inner()) = suggestion;
            }
        }
    }
}

impl AutoSuggest for Threaded {
    fn get_suggestion(&self, document: &Document) -> Option<Suggestion> {
        self.poll();
        let generation = self.generation.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
        let _ = self.sender.send(PendingRequest {
            generation,
            text: document.text().to_string(),
        });
        self.last.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::InMemoryHistory;
    use std::sync::Arc;

    #[test]
    fn dummy_never_suggests() {
        let d = Dummy;
        assert_eq!(d.get_suggestion(&Document::new("abc", 3)), None);
    }

    #[test]
    fn from_history_suggests_remainder() {
        let history = InMemoryHistory::with_entries(vec!["hello world".into()]);
        let suggest = FromHistory::new(Arc::new(history));
        let doc = Document::new("hello ", 6);
        assert_eq!(
            suggest.get_suggestion(&doc),
            Some(Suggestion::new("world"))
        );
    }

    #[test]
    fn from_history_no_match() {
        let history = InMemoryHistory::with_entries(vec!["hello world".into()]);
        let suggest = FromHistory::new(Arc::new(history));
        let doc = Document::new("goodbye", 7);
        assert_eq!(suggest.get_suggestion(&doc), None);
    }

    #[test]
    fn from_history_exact_match_has_no_suggestion() {
        let history = InMemoryHistory::with_entries(vec!["hello".into()]);
        let suggest = FromHistory::new(Arc::new(history));
        let doc = Document::new("hello", 5);
        assert_eq!(suggest.get_suggestion(&doc), None);
    }

    #[test]
    fn from_history_whitespace_only_line_has_no_suggestion() {
        let history = InMemoryHistory::with_entries(vec!["hello world".into()]);
        let suggest = FromHistory::new(Arc::new(history));
        let doc = Document::new("   ", 3);
        assert_eq!(suggest.get_suggestion(&doc), None);
    }

    #[test]
    fn from_history_matches_current_line_only() {
        let history = InMemoryHistory::with_entries(vec!["echo hello\ncargo build".into()]);
        let suggest = FromHistory::new(Arc::new(history));
        let doc = Document::new("echo hello\ncargo ", 17);
        assert_eq!(suggest.get_suggestion(&doc), Some(Suggestion::new("build")));
    }

    #[test]
    fn conditional_respects_filter() {
        let history = InMemoryHistory::with_entries(vec!["hello world".into()]);
        let suggest = Conditional::new(FromHistory::new(Arc::new(history)), Filter::never());
        let doc = Document::new("hello ", 6);
        assert_eq!(suggest.get_suggestion(&doc), None);
    }

    #[test]
    fn threaded_eventually_delivers() {
        let history = InMemoryHistory::with_entries(vec!["hello world".into()]);
        let suggest = Threaded::new(FromHistory::new(Arc::new(history)));
        let doc = Document::new("hello ", 6);
        // First call kicks off the request; result is not guaranteed yet.
        let _ = suggest.get_suggestion(&doc);
        // Give the worker thread a chance to respond.
        for _ in 0..50 {
            std::thread::sleep(std::time::Duration::from_millis(2));
            if suggest.get_suggestion(&doc).is_some() {
                return;
            }
        }
        panic!("threaded auto-suggest never delivered a result");
    }
}
