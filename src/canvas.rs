//! A canvas is anything cells can be written to: the in-memory screen
//! buffer and the live terminal both implement it.
use crate::attr::Attr;
use crate::cell::Cell;
use crate::Result;

pub trait Canvas {
    /// Get the canvas size (width, height)
    fn size(&self) -> Result<(usize, usize)>;

    /// clear the canvas
    fn clear(&mut self) -> Result<()>;

    /// change the cell at `(row, col)` to `cell`
    /// if `(row, col)` is out of bounds, `Ok` is returned but nothing is written
    /// returns the display width of the cell
    fn put_cell(&mut self, row: usize, col: usize, cell: Cell) -> Result<usize>;

    /// print `content` starting at `(row, col)` with `attr`
    /// - the canvas will NOT wrap to the next row if the content is too long
    /// - wide characters advance the column by their display width
    /// returns the printed width of the content
    fn print_with_attr(&mut self, row: usize, col: usize, content: &str, attr: Attr) -> Result<usize> {
        let mut cell = Cell {
            attr,
            ..Cell::default()
        };

        let mut width = 0;
        for ch in content.chars() {
            cell.ch = ch;
            width += self.put_cell(row, col + width, cell)?;
        }
        Ok(width)
    }

    /// print `content` starting at `(row, col)` with the default attribute
    fn print(&mut self, row: usize, col: usize, content: &str) -> Result<usize> {
        self.print_with_attr(row, col, content, Attr::default())
    }

    /// move the cursor to (row, col)
    fn set_cursor(&mut self, row: usize, col: usize) -> Result<()>;

    /// show/hide the cursor, set `show` to `false` to hide it
    fn show_cursor(&mut self, show: bool) -> Result<()>;
}
