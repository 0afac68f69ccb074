//! Concrete [`crate::output::Output`] backends: a real `crossterm` terminal
//! and in-memory stand-ins for tests.

pub mod crossterm_backend;
pub mod detect;
pub mod test_backend;

pub use crossterm_backend::CrosstermBackend;
pub use test_backend::{PipeOutput, TestBackend};
