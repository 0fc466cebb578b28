//! In-memory model of the terminal: a pending buffer the application draws
//! into and a painted buffer mirroring what the terminal currently shows.
//! `present` diffs the two and emits the minimal command list.
use crate::attr::Attr;
use crate::canvas::Canvas;
use crate::cell::Cell;
use crate::output::Command;
use crate::Result;
use std::cmp::min;
use unicode_width::UnicodeWidthChar;

#[derive(Debug)]
pub struct Screen {
    width: usize,
    height: usize,
    cursor: Cursor,
    cells: Vec<Cell>,

    painted_cells: Vec<Cell>,
    painted_cursor: Cursor,
}

impl Screen {
    /// create an empty screen of size (width, height)
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
            cursor: Cursor::default(),
            painted_cells: vec![Cell::default(); width * height],
            painted_cursor: Cursor::default(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.height || col >= self.width {
            None
        } else {
            Some(row * self.width + col)
        }
    }

    /// Resize the buffers to `(width, height)`, keeping the overlapping
    /// region of the pending buffer. The painted buffer is invalidated so
    /// the next `present` repaints everything.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width == width && self.height == height {
            return;
        }

        let mut cells = vec![Cell::default(); width * height];
        for row in 0..min(height, self.height) {
            for col in 0..min(width, self.width) {
                cells[row * width + col] = self.cells[row * self.width + col];
            }
        }

        self.cells = cells;
        self.width = width;
        self.height = height;
        self.cursor.row = min(self.cursor.row, height.saturating_sub(1));
        self.cursor.col = min(self.cursor.col, width.saturating_sub(1));
        self.invalidate();
    }

    /// Forget what was painted so the next `present` repaints every cell.
    pub fn invalidate(&mut self) {
        self.painted_cells = vec![Cell::empty(); self.width * self.height];
    }

    /// Reset the pending buffer to blanks.
    pub fn clear_buffer(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = Cell::default();
        }
    }

    /// Write `cell` at `(row, col)`. Out-of-bounds writes are dropped.
    /// Returns the display width of the cell's character.
    pub fn put_cell(&mut self, row: usize, col: usize, cell: Cell) -> usize {
        if let Some(index) = self.index(row, col) {
            self.cells[index] = cell;
        }
        cell.ch.width().unwrap_or(2)
    }

    /// Diff the pending buffer against the painted buffer and return the
    /// commands that bring the terminal up to date. Calling `present` again
    /// with no intervening change yields no character writes.
    pub fn present(&mut self) -> Vec<Command> {
        let mut commands = Vec::with_capacity(2048);
        let default_attr = Attr::default();
        let mut last_cursor = self.painted_cursor;
        let mut last_attr = default_attr;

        commands.push(Command::CursorShow(false));
        commands.push(Command::ResetAttributes);

        for row in 0..self.height {
            // index past the last pending/painted cell with visible content
            let content_end = self.row_content_end(&self.cells, row);
            let painted_end = self.row_content_end(&self.painted_cells, row);

            let mut last_ch_is_wide = false;
            for col in 0..content_end {
                let index = row * self.width + col;

                // the cell shadowed by a preceding wide character is skipped
                if last_ch_is_wide {
                    last_ch_is_wide = false;
                    self.painted_cells[index] = self.cells[index];
                    continue;
                }

                let pending = self.cells[index];
                if pending == self.painted_cells[index] {
                    continue;
                }

                if last_cursor.row != row || last_cursor.col != col {
                    commands.push(Command::CursorGoto { row, col });
                }

                if pending.attr != last_attr {
                    commands.push(Command::ResetAttributes);
                    commands.push(Command::SetAttribute(pending.attr));
                    last_attr = pending.attr;
                }

                commands.push(Command::PutChar(pending.ch));

                let display_width = pending.ch.width().unwrap_or(2);
                last_ch_is_wide = display_width == 2;
                last_cursor.row = row;
                last_cursor.col = col + display_width;
                self.painted_cells[index] = pending;
            }

            // blank the tail only if something painted is still visible there
            if painted_end > content_end {
                commands.push(Command::CursorGoto {
                    row,
                    col: content_end,
                });
                commands.push(Command::ResetAttributes);
                commands.push(Command::EraseEndOfLine);
                last_attr = default_attr;
                last_cursor.row = row;
                last_cursor.col = content_end;
            }
            for col in content_end..self.width {
                let index = row * self.width + col;
                self.painted_cells[index] = self.cells[index];
            }
        }

        commands.push(Command::CursorGoto {
            row: self.cursor.row,
            col: self.cursor.col,
        });
        if self.cursor.visible {
            commands.push(Command::CursorShow(true));
        }
        self.painted_cursor = self.cursor;

        commands
    }

    fn row_content_end(&self, cells: &[Cell], row: usize) -> usize {
        let start = row * self.width;
        let blank = Cell::default();
        for col in (0..self.width).rev() {
            if cells[start + col] != blank {
                return col + 1;
            }
        }
        0
    }
}

impl Canvas for Screen {
    fn size(&self) -> Result<(usize, usize)> {
        Ok((self.width, self.height))
    }

    fn clear(&mut self) -> Result<()> {
        self.clear_buffer();
        Ok(())
    }

    fn put_cell(&mut self, row: usize, col: usize, cell: Cell) -> Result<usize> {
        Ok(Screen::put_cell(self, row, col, cell))
    }

    fn set_cursor(&mut self, row: usize, col: usize) -> Result<()> {
        self.cursor.row = min(row, self.height.saturating_sub(1));
        self.cursor.col = min(col, self.width.saturating_sub(1));
        Ok(())
    }

    fn show_cursor(&mut self, show: bool) -> Result<()> {
        self.cursor.visible = show;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    row: usize,
    col: usize,
    visible: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            row: 0,
            col: 0,
            visible: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::Color;

    fn put_chars(commands: &[Command]) -> String {
        commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::PutChar(ch) => Some(*ch),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn present_is_idempotent() {
        let mut screen = Screen::new(10, 3);
        screen.print(1, 2, "hi").unwrap();
        let first = screen.present();
        assert_eq!(put_chars(&first), "hi");

        let second = screen.present();
        assert_eq!(put_chars(&second), "");
        assert!(!second.iter().any(|cmd| *cmd == Command::EraseEndOfLine));
    }

    #[test]
    fn changed_cells_only_are_repainted() {
        let mut screen = Screen::new(10, 1);
        screen.print(0, 0, "abc").unwrap();
        let _ = screen.present();

        screen.print(0, 1, "x").unwrap();
        let commands = screen.present();
        assert_eq!(put_chars(&commands), "x");
    }

    #[test]
    fn cleared_tail_is_erased_not_rewritten() {
        let mut screen = Screen::new(10, 1);
        screen.print(0, 0, "stale").unwrap();
        let _ = screen.present();

        screen.clear_buffer();
        let commands = screen.present();
        assert_eq!(put_chars(&commands), "");
        assert!(commands.iter().any(|cmd| *cmd == Command::EraseEndOfLine));

        // and the erase is not emitted again
        let again = screen.present();
        assert!(!again.iter().any(|cmd| *cmd == Command::EraseEndOfLine));
    }

    #[test]
    fn wide_characters_advance_two_columns() {
        let mut screen = Screen::new(10, 1);
        let width = screen.print(0, 0, "你a").unwrap();
        assert_eq!(width, 3);
        assert_eq!(screen.cells[0].ch, '你');
        assert_eq!(screen.cells[2].ch, 'a');
    }

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut screen = Screen::new(4, 2);
        let width = Screen::put_cell(&mut screen, 5, 9, Cell::from('x'));
        assert_eq!(width, 1);
        assert!(screen.cells.iter().all(|cell| cell.ch != 'x'));
    }

    #[test]
    fn resize_keeps_the_overlapping_region() {
        let mut screen = Screen::new(4, 2);
        screen.print(1, 0, "ab").unwrap();
        screen.resize(6, 3);
        assert_eq!(screen.cells[1 * 6 + 0].ch, 'a');
        assert_eq!(screen.cells[1 * 6 + 1].ch, 'b');

        screen.resize(1, 1);
        assert_eq!(screen.width(), 1);
        assert_eq!(screen.height(), 1);
    }

    #[test]
    fn resize_invalidates_painted_state() {
        let mut screen = Screen::new(4, 1);
        screen.print(0, 0, "ab").unwrap();
        let _ = screen.present();

        screen.resize(5, 1);
        let commands = screen.present();
        assert_eq!(put_chars(&commands), "ab");
    }

    #[test]
    fn attribute_changes_are_repainted() {
        let mut screen = Screen::new(4, 1);
        screen.print(0, 0, "a").unwrap();
        let _ = screen.present();

        screen
            .print_with_attr(0, 0, "a", Attr::default().fg(Color::RED))
            .unwrap();
        let commands = screen.present();
        assert_eq!(put_chars(&commands), "a");
        assert!(commands
            .iter()
            .any(|cmd| matches!(cmd, Command::SetAttribute(_))));
    }
}
