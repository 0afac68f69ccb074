//! Color-depth negotiation from environment variables.
//!
//! Deliberately narrow: this crate does not attempt to identify which
//! terminal emulator or multiplexer is in use, only how many colors it
//! can display, which is the one signal the rendering path actually
//! needs (see `Output::color_support`).

use std::collections::HashMap;

use crate::output::ColorSupport;

/// Inspect `COLORTERM`/`TERM`-style variables to pick a [`ColorSupport`]
/// level. Takes a map rather than reading the process environment
/// directly so detection is testable without mutating global state.
pub fn detect_from_env(vars: &HashMap<String, String>) -> ColorSupport {
    if let Some(colorterm) = vars.get("COLORTERM") {
        if colorterm.contains("truecolor") || colorterm.contains("24bit") {
            return ColorSupport::TrueColor;
        }
    }
    match vars.get("TERM").map(String::as_str) {
        Some(term) if term.contains("256color") => ColorSupport::Indexed256,
        Some("dumb") | None => ColorSupport::Monochrome,
        Some(term) if term.starts_with("xterm") || term.starts_with("screen") || term.starts_with("tmux") => {
            ColorSupport::Ansi16
        }
        Some(_) => ColorSupport::Ansi16,
    }
}

/// Detect from the real process environment.
pub fn detect() -> ColorSupport {
    let vars: HashMap<String, String> = std::env::vars().collect();
    detect_from_env(&vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn truecolor_from_colorterm() {
        let vars = env(&[("COLORTERM", "truecolor")]);
        assert_eq!(detect_from_env(&vars), ColorSupport::TrueColor);
    }

    #[test]
    fn indexed_256_from_term() {
        let vars = env(&[("TERM", "xterm-256color")]);
        assert_eq!(detect_from_env(&vars), ColorSupport::Indexed256);
    }

    #[test]
    fn dumb_term_is_monochrome() {
        let vars = env(&[("TERM", "dumb")]);
        assert_eq!(detect_from_env(&vars), ColorSupport::Monochrome);
    }

    #[test]
    fn missing_term_is_monochrome() {
        let vars = env(&[]);
        assert_eq!(detect_from_env(&vars), ColorSupport::Monochrome);
    }

    #[test]
    fn plain_xterm_is_ansi16() {
        let vars = env(&[("TERM", "xterm")]);
        assert_eq!(detect_from_env(&vars), ColorSupport::Ansi16);
    }
}
