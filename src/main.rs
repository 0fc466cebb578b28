//! event-echo: take over the screen, block on input, and echo every event
//! on the bottom row. `Ctrl-c` quits (override with `$TERMGRID_QUIT_KEY`).

#[macro_use]
extern crate log;

use std::env;
use std::process;

use termgrid::attr::Attr;
use termgrid::canvas::Canvas;
use termgrid::cell::Cell;
use termgrid::event::Event;
use termgrid::key::{self, Key};
use termgrid::term::Term;
use termgrid::unwrap_or_return;

const QUIT_KEY_VAR: &str = "TERMGRID_QUIT_KEY";

/// Write `text` into the box bounded by `(row0, col0)` and `(row1, col1)`,
/// both inclusive: left to right from the origin, wrapping at the right
/// edge, silently dropping whatever does not fit past the bottom edge.
fn draw_text(
    canvas: &mut dyn Canvas,
    row0: usize,
    col0: usize,
    row1: usize,
    col1: usize,
    attr: Attr,
    text: &str,
) {
    let mut row = row0;
    let mut col = col0;
    for ch in text.chars() {
        if row > row1 {
            break;
        }
        let width = canvas.put_cell(row, col, Cell { ch, attr }).unwrap_or(1);
        col += width;
        if col > col1 {
            col = col0;
            row += 1;
        }
    }
}

/// Pad `text` to the full canvas width and draw it on the bottom row, so a
/// shorter message overwrites every cell of a longer one.
fn notify(canvas: &mut dyn Canvas, attr: Attr, text: &str) {
    let (width, height) = unwrap_or_return!(canvas.size(), ());
    if width == 0 || height == 0 {
        return;
    }
    let padded = format!("{:<width$}", text, width = width);
    draw_text(canvas, height - 1, 0, height - 1, width - 1, attr, &padded);
}

/// What one event asks of the loop.
#[derive(Debug, PartialEq)]
enum Step {
    Notify(String),
    Resync,
    Quit,
}

fn step(event: &Event, quit_key: Key) -> Step {
    match event {
        Event::Error(msg) => Step::Notify(format!("Error: {}", msg)),
        Event::Interrupt => Step::Notify("Interrupt".to_string()),
        Event::Paste(text) => Step::Notify(format!("Paste: {:?}", text)),
        Event::Timer => Step::Notify("Timer".to_string()),
        Event::Mouse(mouse) => Step::Notify(format!("Mouse: {:?}", mouse)),
        Event::Resize { .. } => Step::Resync,
        Event::Key(key) if *key == quit_key => Step::Quit,
        Event::Key(key) => Step::Notify(format!("Key: {} [{:?}]", key, key)),
        other => Step::Notify(format!("Other? {:?}", other)),
    }
}

fn quit_key() -> Key {
    env::var(QUIT_KEY_VAR)
        .ok()
        .and_then(|name| key::from_keyname(&name))
        .unwrap_or(Key::Ctrl('c'))
}

fn main() {
    env_logger::init();

    let quit = quit_key();

    // screen-initialization failure is fatal: log it and abort, no retry
    let mut term = match Term::new() {
        Ok(term) => term,
        Err(err) => {
            error!("failed to initialize the screen: {}", err);
            process::exit(1);
        }
    };

    let attr = Attr::default();
    let _ = term.enable_mouse_support();
    let _ = term.enable_paste_support();
    let _ = term.clear();
    let _ = term.print(
        0,
        0,
        &format!("event-echo: events appear on the bottom row, {} quits", quit),
    );

    loop {
        let _ = term.present();

        let event = match term.poll_event() {
            Ok(event) => event,
            Err(_) => break,
        };

        match step(&event, quit) {
            Step::Quit => break,
            Step::Resync => {
                // the buffer already re-sized itself; repaint it in full
                let _ = term.sync();
            }
            Step::Notify(line) => notify(&mut term, attr, &line),
        }
    }

    // `term` drops here and the tty is restored, whatever path got us out
}

#[cfg(test)]
mod tests {
    use super::*;
    use termgrid::event::{MouseButton, MouseEvent};
    use termgrid::Result;

    struct TestCanvas {
        width: usize,
        height: usize,
        rows: Vec<Vec<char>>,
    }

    impl TestCanvas {
        fn new(width: usize, height: usize) -> Self {
            Self {
                width,
                height,
                rows: vec![vec![' '; width]; height],
            }
        }

        fn row(&self, row: usize) -> String {
            self.rows[row].iter().collect()
        }
    }

    impl Canvas for TestCanvas {
        fn size(&self) -> Result<(usize, usize)> {
            Ok((self.width, self.height))
        }

        fn clear(&mut self) -> Result<()> {
            self.rows = vec![vec![' '; self.width]; self.height];
            Ok(())
        }

        fn put_cell(&mut self, row: usize, col: usize, cell: Cell) -> Result<usize> {
            if row < self.height && col < self.width {
                self.rows[row][col] = cell.ch;
            }
            Ok(1)
        }

        fn set_cursor(&mut self, _row: usize, _col: usize) -> Result<()> {
            Ok(())
        }

        fn show_cursor(&mut self, _show: bool) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn draw_text_wraps_at_the_right_edge() {
        let mut canvas = TestCanvas::new(5, 3);
        draw_text(&mut canvas, 0, 0, 2, 4, Attr::default(), "abcdefghij");
        assert_eq!(canvas.row(0), "abcde");
        assert_eq!(canvas.row(1), "fghij");
        assert_eq!(canvas.row(2), "     ");
    }

    #[test]
    fn draw_text_truncates_past_the_bottom_silently() {
        let mut canvas = TestCanvas::new(5, 3);
        // 3 rows of 5 hold 15 chars; the rest must vanish without a trace
        draw_text(&mut canvas, 0, 0, 2, 4, Attr::default(), "abcdefghijklmnopqrst");
        assert_eq!(canvas.row(0), "abcde");
        assert_eq!(canvas.row(1), "fghij");
        assert_eq!(canvas.row(2), "klmno");
    }

    #[test]
    fn draw_text_respects_an_inner_box() {
        let mut canvas = TestCanvas::new(6, 4);
        draw_text(&mut canvas, 1, 1, 2, 3, Attr::default(), "abcdefgh");
        assert_eq!(canvas.row(0), "      ");
        assert_eq!(canvas.row(1), " abc  ");
        assert_eq!(canvas.row(2), " def  ");
        assert_eq!(canvas.row(3), "      ");
    }

    #[test]
    fn notify_pads_to_the_full_width() {
        let mut canvas = TestCanvas::new(10, 3);
        notify(&mut canvas, Attr::default(), "hi");
        assert_eq!(canvas.row(0), "          ");
        assert_eq!(canvas.row(1), "          ");
        assert_eq!(canvas.row(2), "hi        ");
    }

    #[test]
    fn notify_overwrites_a_longer_previous_message() {
        let mut canvas = TestCanvas::new(12, 2);
        notify(&mut canvas, Attr::default(), "a long line!");
        notify(&mut canvas, Attr::default(), "hi");
        assert_eq!(canvas.row(1), "hi          ");
    }

    #[test]
    fn notify_ignores_a_zero_sized_canvas() {
        let mut canvas = TestCanvas::new(0, 0);
        notify(&mut canvas, Attr::default(), "hi");
    }

    #[test]
    fn notify_touches_only_the_bottom_row() {
        let mut canvas = TestCanvas::new(80, 24);
        notify(&mut canvas, Attr::default(), "Key: Enter [Enter]");
        let bottom = canvas.row(23);
        assert_eq!(bottom.len(), 80);
        assert!(bottom.starts_with("Key: Enter [Enter]"));
        assert!(bottom.ends_with(' '));
        for row in 0..23 {
            assert_eq!(canvas.row(row), " ".repeat(80), "row {} changed", row);
        }
    }

    #[test]
    fn quit_key_terminates_the_loop() {
        let quit = Key::Ctrl('c');
        assert_eq!(step(&Event::Key(quit), quit), Step::Quit);
    }

    #[test]
    fn other_keys_are_echoed_with_their_name() {
        let quit = Key::Ctrl('c');
        assert_eq!(
            step(&Event::Key(Key::Enter), quit),
            Step::Notify("Key: Enter [Enter]".to_string())
        );
        assert_eq!(
            step(&Event::Key(Key::Char('q')), quit),
            Step::Notify("Key: q [Char('q')]".to_string())
        );
    }

    #[test]
    fn resize_resynchronizes_without_a_status_line() {
        let quit = Key::Ctrl('c');
        let resize = Event::Resize {
            width: 120,
            height: 40,
        };
        assert_eq!(step(&resize, quit), Step::Resync);
    }

    #[test]
    fn remaining_variants_stay_running_with_a_status_line() {
        let quit = Key::Ctrl('c');
        assert_eq!(
            step(&Event::Error("boom".to_string()), quit),
            Step::Notify("Error: boom".to_string())
        );
        assert_eq!(step(&Event::Interrupt, quit), Step::Notify("Interrupt".to_string()));
        assert_eq!(step(&Event::Timer, quit), Step::Notify("Timer".to_string()));
        assert_eq!(
            step(&Event::Paste("a\nb".to_string()), quit),
            Step::Notify("Paste: \"a\\nb\"".to_string())
        );
        let mouse = MouseEvent::Press(MouseButton::Left, 2, 4);
        assert_eq!(
            step(&Event::Mouse(mouse), quit),
            Step::Notify(format!("Mouse: {:?}", mouse))
        );
        assert_eq!(
            step(&Event::Restarted, quit),
            Step::Notify("Other? Restarted".to_string())
        );
    }

    #[test]
    fn quit_key_comes_from_the_environment_when_set() {
        env::remove_var(QUIT_KEY_VAR);
        assert_eq!(quit_key(), Key::Ctrl('c'));

        env::set_var(QUIT_KEY_VAR, "f10");
        assert_eq!(quit_key(), Key::F(10));

        env::set_var(QUIT_KEY_VAR, "not a key");
        assert_eq!(quit_key(), Key::Ctrl('c'));
        env::remove_var(QUIT_KEY_VAR);
    }
}
