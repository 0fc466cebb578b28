//! `Output` is the write half of the terminal: a buffered escape-sequence
//! writer driven by the terminfo database, with raw CSI fallbacks for the
//! handful of capabilities some terminfo entries omit.
use std::io::Write;
use std::os::unix::io::AsRawFd;

use crate::attr::{Attr, Color, Effect};
use crate::sys::size::terminal_size;
use crate::Result;

use term::terminfo::TermInfo;

const DEFAULT_BUFFER_SIZE: usize = 1024;

/// A drawing command produced by `Screen::present`, replayed here as bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    PutChar(char),
    CursorGoto { row: usize, col: usize },
    CursorShow(bool),
    EraseEndOfLine,
    ResetAttributes,
    SetAttribute(Attr),
}

pub trait WriteAndAsRawFd: Write + AsRawFd + Send {}

impl<T: Write + AsRawFd + Send> WriteAndAsRawFd for T {}

pub struct Output {
    buffer: Vec<u8>,
    tty: Box<dyn WriteAndAsRawFd>,
    /// Capabilities of the terminal named by `$TERM`.
    terminfo: TermInfo,
}

impl Output {
    pub fn new(tty: Box<dyn WriteAndAsRawFd>) -> Result<Self> {
        Ok(Self {
            buffer: Vec::with_capacity(DEFAULT_BUFFER_SIZE),
            tty,
            terminfo: TermInfo::from_env()?,
        })
    }

    /// Queue the terminfo capability `name`, or `fallback` if the entry
    /// does not define it.
    fn write_cap(&mut self, name: &str, fallback: &[u8]) {
        match self.terminfo.strings.get(name) {
            Some(bytes) => self.buffer.extend(bytes),
            None => self.buffer.extend(fallback),
        }
    }

    pub fn write_raw(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Write the queued bytes to the tty and flush it.
    pub fn flush(&mut self) {
        let _ = self.tty.write_all(&self.buffer);
        self.buffer.clear();
        let _ = self.tty.flush();
    }

    /// Erase the whole screen and home the cursor.
    pub fn erase_screen(&mut self) {
        self.write_cap("clear", b"\x1b[H\x1b[2J");
    }

    /// Switch to the alternate screen buffer.
    pub fn enter_alternate_screen(&mut self) {
        self.write_cap("smcup", b"\x1b[?1049h");
    }

    /// Leave the alternate screen buffer.
    pub fn quit_alternate_screen(&mut self) {
        self.write_cap("rmcup", b"\x1b[?1049l");
    }

    /// Enable mouse reporting: xterm, urxvt and SGR modes together, so the
    /// terminal picks the richest one it understands.
    pub fn enable_mouse_support(&mut self) {
        self.write_raw(b"\x1b[?1000h");
        self.write_raw(b"\x1b[?1015h");
        self.write_raw(b"\x1b[?1006h");
    }

    pub fn disable_mouse_support(&mut self) {
        self.write_raw(b"\x1b[?1000l");
        self.write_raw(b"\x1b[?1015l");
        self.write_raw(b"\x1b[?1006l");
    }

    /// Enable bracketed paste (vt100 `?2004`).
    pub fn enable_bracketed_paste(&mut self) {
        self.write_raw(b"\x1b[?2004h");
    }

    pub fn disable_bracketed_paste(&mut self) {
        self.write_raw(b"\x1b[?2004l");
    }

    /// Erase from the cursor to the end of the current line.
    pub fn erase_end_of_line(&mut self) {
        self.write_cap("el", b"\x1b[K");
    }

    /// Reset color and effect attributes.
    pub fn reset_attributes(&mut self) {
        self.write_raw(b"\x1b[0m");
    }

    /// Queue the SGR sequences for `attr`.
    pub fn set_attribute(&mut self, attr: Attr) {
        self.set_fg(attr.fg);
        self.set_bg(attr.bg);
        self.set_effect(attr.effect);
    }

    fn set_fg(&mut self, color: Color) {
        match color {
            Color::Default => self.write_raw(b"\x1b[39m"),
            Color::AnsiValue(value) => {
                self.write_raw(format!("\x1b[38;5;{}m", value).as_bytes())
            }
            Color::Rgb(r, g, b) => {
                self.write_raw(format!("\x1b[38;2;{};{};{}m", r, g, b).as_bytes())
            }
            Color::__Nonexhaustive => {}
        }
    }

    fn set_bg(&mut self, color: Color) {
        match color {
            Color::Default => self.write_raw(b"\x1b[49m"),
            Color::AnsiValue(value) => {
                self.write_raw(format!("\x1b[48;5;{}m", value).as_bytes())
            }
            Color::Rgb(r, g, b) => {
                self.write_raw(format!("\x1b[48;2;{};{};{}m", r, g, b).as_bytes())
            }
            Color::__Nonexhaustive => {}
        }
    }

    fn set_effect(&mut self, effect: Effect) {
        if effect.contains(Effect::BOLD) {
            self.write_raw(b"\x1b[1m");
        }
        if effect.contains(Effect::DIM) {
            self.write_raw(b"\x1b[2m");
        }
        if effect.contains(Effect::UNDERLINE) {
            self.write_raw(b"\x1b[4m");
        }
        if effect.contains(Effect::BLINK) {
            self.write_raw(b"\x1b[5m");
        }
        if effect.contains(Effect::REVERSE) {
            self.write_raw(b"\x1b[7m");
        }
    }

    /// Move the cursor to 0-based (row, col).
    pub fn cursor_goto(&mut self, row: usize, col: usize) {
        self.write_raw(format!("\x1b[{};{}H", row + 1, col + 1).as_bytes());
    }

    pub fn hide_cursor(&mut self) {
        self.write_cap("civis", b"\x1b[?25l");
    }

    pub fn show_cursor(&mut self) {
        self.write_cap("cnorm", b"\x1b[?25h");
    }

    /// Current terminal size (width, height).
    pub fn terminal_size(&self) -> Result<(usize, usize)> {
        let (width, height) = terminal_size(self.tty.as_raw_fd())?;
        Ok((width as usize, height as usize))
    }

    /// Queue the bytes for one drawing command.
    pub fn execute(&mut self, command: Command) {
        match command {
            Command::PutChar(ch) => {
                let mut encoded = [0u8; 4];
                let encoded = ch.encode_utf8(&mut encoded);
                self.buffer.extend_from_slice(encoded.as_bytes());
            }
            Command::CursorGoto { row, col } => self.cursor_goto(row, col),
            Command::CursorShow(true) => self.show_cursor(),
            Command::CursorShow(false) => self.hide_cursor(),
            Command::EraseEndOfLine => self.erase_end_of_line(),
            Command::ResetAttributes => self.reset_attributes(),
            Command::SetAttribute(attr) => self.set_attribute(attr),
        }
    }
}
