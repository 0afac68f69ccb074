//! Snapshot tests for `Window`'s rendered output, covering line wrapping
//! and the background-fill behind short content. Uses inline `insta`
//! snapshots rather than named `.snap` files kept alongside the test.

use termform::controls::FormattedTextControl;
use termform::layout::window::Window;
use termform::layout::Container;
use termform::primitives::WritePosition;
use termform::screen::Screen;
use termform::style::Style;

fn render_to_text(window: &Window, width: usize, height: usize) -> String {
    let mut screen = Screen::new(width, height);
    window.write_to_screen(&mut screen, WritePosition::new(0, 0, width, height));
    let mut rows = Vec::with_capacity(height);
    for y in 0..height {
        let mut row = String::with_capacity(width);
        for x in 0..width {
            row.push_str(screen.get_char(termform::primitives::Point::new(x, y)).display());
        }
        rows.push(row.trim_end().to_string());
    }
    rows.join("\n")
}

#[test]
fn text_fills_an_exact_fit_window() {
    let window = Window::new(Box::new(FormattedTextControl::new("Hi", Style::new())));
    let rendered = render_to_text(&window, 2, 1);
    insta::assert_snapshot!(rendered, @"Hi");
}

#[test]
fn multiline_text_fills_rows_top_to_bottom() {
    let window = Window::new(Box::new(FormattedTextControl::new("ab\ncd", Style::new())));
    let rendered = render_to_text(&window, 2, 2);
    insta::assert_snapshot!(rendered, @"ab\ncd");
}

#[test]
fn short_text_leaves_trailing_rows_blank() {
    let window = Window::new(Box::new(FormattedTextControl::new("Hi", Style::new())));
    let rendered = render_to_text(&window, 5, 2);
    // Row 0 is "Hi" with the rest of the line trimmed; row 1 has no
    // content at all, so it trims to an empty string.
    insta::assert_snapshot!(rendered, @"Hi\n");
}
