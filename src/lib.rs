//! termform: a cross-platform terminal interaction toolkit for building
//! prompts, REPLs, and full-screen TUIs.
//!
//! The crate is organized in layers, each only depending on the ones
//! below it:
//!
//! ```text
//! application        run loop: input dispatch, rendering, focus, background tasks
//! key_binding         key-sequence matching, digraphs, Vi/Emacs modal state
//! layout, controls    Container/UIControl trees, Window scrolling
//! lexer               per-line styled spans for BufferControl to paint
//! buffer, screen      editable text + undo/history, the styled cell grid
//! document, history, auto_suggest
//! vt100, keys         byte stream -> KeyPress
//! input, output, terminal
//! filter, app_context, style, primitives, error
//! ```
//!
//! Style strings, like the toolkit this crate re-architects, are treated
//! as opaque class lists throughout (see [`style::Style`]); encoding them
//! into actual terminal attributes is a concern for a theme layer built on
//! top, not this crate.

pub mod app_context;
pub mod application;
pub mod auto_suggest;
pub mod buffer;
pub mod controls;
pub mod document;
pub mod error;
pub mod filter;
pub mod history;
pub mod input;
pub mod key_binding;
pub mod keys;
pub mod layout;
pub mod lexer;
pub mod output;
pub mod primitives;
pub mod screen;
pub mod style;
pub mod terminal;
pub mod vt100;

pub use application::{AppResult, Application, ExitHandle};
pub use buffer::Buffer;
pub use document::Document;
pub use error::{Error, Result};
pub use filter::Filter;
pub use keys::{KeyId, KeyPress};
pub use output::{ColorSupport, Output};
pub use screen::Screen;
pub use style::Style;
