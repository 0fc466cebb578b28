//! Parses the raw tty byte stream into structured input: keys, SGR mouse
//! reports and bracketed-paste blocks.
//!
//! Reference for the sequences: https://www.xfree86.org/4.8.0/ctlseqs.html
use crate::error::TermgridError;
use crate::event::{MouseButton, MouseEvent};
use crate::key::Key;
use crate::key::Key::*;
use crate::raw::get_tty;
use crate::sys::file::wait_until_ready;
use crate::Result;
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use std::collections::VecDeque;
use std::fs::File;
use std::io::prelude::Read;
use std::os::unix::io::AsRawFd;
use std::time::Duration;

/// How long a lone ESC byte may wait for a continuation before it is
/// reported as the ESC key itself.
const ESC_WAIT: Duration = Duration::from_millis(20);

/// One parsed unit of tty input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Key(Key),
    Mouse(MouseEvent),
    Paste(String),
}

pub struct KeyBoard {
    file: File,
    buf: VecDeque<char>,
}

impl KeyBoard {
    pub fn new(file: File) -> Self {
        KeyBoard {
            file,
            buf: VecDeque::new(),
        }
    }

    pub fn new_with_tty() -> Result<Self> {
        Ok(Self::new(get_tty()?))
    }

    /// Wait up to `timeout` for input, then parse one unit of it.
    pub fn next_input_timeout(&mut self, timeout: Duration) -> Result<Input> {
        if self.buf.is_empty() {
            wait_until_ready(self.file.as_raw_fd(), timeout)?;
        }
        self.next_input()
    }

    /// Parse one unit of input, blocking until bytes are available.
    pub fn next_input(&mut self) -> Result<Input> {
        let ch = self.next_char()?;
        match ch {
            '\u{00}' => Ok(Input::Key(Ctrl(' '))),
            '\u{09}' => Ok(Input::Key(Tab)),
            '\u{0d}' => Ok(Input::Key(Enter)),
            '\u{01}'..='\u{1a}' => Ok(Input::Key(Ctrl((ch as u8 - 0x01 + b'a') as char))),
            '\u{1b}' => self.escape_sequence(),
            '\u{7f}' => Ok(Input::Key(Backspace)),
            ch => Ok(Input::Key(Char(ch))),
        }
    }

    /// Refill the character queue from the tty: one blocking read for the
    /// first byte, then a non-blocking drain of whatever arrived with it
    /// (UTF-8 continuations, the rest of an escape sequence).
    fn get_chars(&mut self) -> Result<()> {
        let fd = self.file.as_raw_fd();
        let mut bytes = Vec::with_capacity(16);
        let mut byte = [0; 1];

        let flag = fcntl(fd, FcntlArg::F_GETFL)?;
        let mut flag = OFlag::from_bits_truncate(flag);

        flag.remove(OFlag::O_NONBLOCK);
        let _ = fcntl(fd, FcntlArg::F_SETFL(flag));
        if self.file.read(&mut byte)? == 0 {
            return Err(TermgridError::EndOfInput);
        }
        bytes.push(byte[0]);

        flag.insert(OFlag::O_NONBLOCK);
        let _ = fcntl(fd, FcntlArg::F_SETFL(flag));
        while let Ok(count) = self.file.read(&mut byte) {
            if count == 0 {
                break;
            }
            bytes.push(byte[0]);
        }

        for ch in String::from_utf8(bytes)?.chars() {
            self.buf.push_back(ch);
        }
        Ok(())
    }

    fn next_char(&mut self) -> Result<char> {
        if self.buf.is_empty() {
            self.get_chars()?;
        }
        self.buf.pop_front().ok_or(TermgridError::EndOfInput)
    }

    fn escape_sequence(&mut self) -> Result<Input> {
        // a lone ESC byte with no continuation is the ESC key
        if self.buf.is_empty() {
            match wait_until_ready(self.file.as_raw_fd(), ESC_WAIT) {
                Ok(()) => {}
                Err(TermgridError::Timeout(_)) => return Ok(Input::Key(ESC)),
                Err(err) => return Err(err),
            }
        }
        let seq1 = match self.next_char() {
            Ok(ch) => ch,
            Err(TermgridError::EndOfInput) => return Ok(Input::Key(ESC)),
            Err(err) => return Err(err),
        };
        match seq1 {
            '[' => self.escape_csi(),
            'O' => self.escape_ss3(),
            '\u{1b}' => Ok(Input::Key(ESC)), // ESC ESC
            '\u{0d}' => Ok(Input::Key(AltEnter)),
            '\u{7f}' => Ok(Input::Key(AltBackspace)),
            ch => Ok(Input::Key(Alt(ch))),
        }
    }

    /// `ESC [` sequences: cursor keys, function keys, modifiers, SGR mouse
    /// reports and the bracketed-paste opener.
    fn escape_csi(&mut self) -> Result<Input> {
        let mut ch = self.next_char()?;

        if ch == '<' {
            return self.sgr_mouse();
        }

        if ch == '[' {
            // Linux console: ESC [ [ A..E are F1..F5
            let seq3 = self.next_char()?;
            return match seq3 {
                'A'..='E' => Ok(Input::Key(F(seq3 as u8 - b'A' + 1))),
                _ => Err(unknown_seq(&format!("ESC [ [ {:?}", seq3))),
            };
        }

        let mut params = String::new();
        while ch.is_ascii_digit() || ch == ';' {
            params.push(ch);
            ch = self.next_char()?;
        }

        match (params.as_str(), ch) {
            ("", 'A') => Ok(Input::Key(Up)),    // kcuu1
            ("", 'B') => Ok(Input::Key(Down)),  // kcud1
            ("", 'C') => Ok(Input::Key(Right)), // kcuf1
            ("", 'D') => Ok(Input::Key(Left)),  // kcub1
            ("", 'H') => Ok(Input::Key(Home)),  // khome
            ("", 'F') => Ok(Input::Key(End)),
            ("", 'Z') => Ok(Input::Key(BackTab)),
            ("1;5", 'A') => Ok(Input::Key(CtrlUp)),
            ("1;5", 'B') => Ok(Input::Key(CtrlDown)),
            ("1;5", 'C') => Ok(Input::Key(CtrlRight)),
            ("1;5", 'D') => Ok(Input::Key(CtrlLeft)),
            ("1;2", 'A') => Ok(Input::Key(ShiftUp)),
            ("1;2", 'B') => Ok(Input::Key(ShiftDown)),
            ("1;2", 'C') => Ok(Input::Key(ShiftRight)),
            ("1;2", 'D') => Ok(Input::Key(ShiftLeft)),
            (params, '~') => self.escape_tilde(params),
            (params, ch) => Err(unknown_seq(&format!("ESC [ {} {:?}", params, ch))),
        }
    }

    fn escape_tilde(&mut self, params: &str) -> Result<Input> {
        let key = match params {
            "1" | "7" => Home, // tmux, rxvt
            "2" => Insert,
            "3" => Delete,    // kdch1
            "4" | "8" => End, // tmux, rxvt
            "5" => PageUp,    // kpp
            "6" => PageDown,  // knp
            "11" => F(1),     // rxvt-unicode
            "12" => F(2),
            "13" => F(3),
            "14" => F(4),
            "15" => F(5), // kf5
            "17" => F(6), // kf6
            "18" => F(7),
            "19" => F(8),
            "20" => F(9),
            "21" => F(10),
            "23" => F(11),
            "24" => F(12),
            "200" => return self.bracketed_paste(),
            _ => return Err(unknown_seq(&format!("ESC [ {} ~", params))),
        };
        Ok(Input::Key(key))
    }

    /// Collect everything between `ESC [ 200~` and `ESC [ 201~` verbatim.
    fn bracketed_paste(&mut self) -> Result<Input> {
        const TERMINATOR: &str = "\u{1b}[201~";
        let mut content = String::new();
        loop {
            content.push(self.next_char()?);
            if content.ends_with(TERMINATOR) {
                content.truncate(content.len() - TERMINATOR.len());
                return Ok(Input::Paste(content));
            }
        }
    }

    /// SGR mouse report: `ESC [ < button ; col ; row (M|m)`, 1-based
    /// coordinates, `m` for release.
    fn sgr_mouse(&mut self) -> Result<Input> {
        let mut params = String::new();
        let final_char = loop {
            let ch = self.next_char()?;
            if ch == 'M' || ch == 'm' {
                break ch;
            }
            params.push(ch);
        };

        let fields: Vec<&str> = params.split(';').collect();
        if fields.len() != 3 {
            return Err(unknown_seq(&format!("ESC [ < {} {:?}", params, final_char)));
        }
        let button_code = fields[0].parse::<u16>()?;
        let col = fields[1].parse::<u16>()?.saturating_sub(1);
        let row = fields[2].parse::<u16>()?.saturating_sub(1);

        if final_char == 'm' {
            return Ok(Input::Mouse(MouseEvent::Release(row, col)));
        }
        if button_code & 32 != 0 {
            return Ok(Input::Mouse(MouseEvent::Hold(row, col)));
        }
        // modifier bits (shift/meta/ctrl) are not distinguished
        let button = match button_code & 0b1100_0011 {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            64 => MouseButton::WheelUp,
            65 => MouseButton::WheelDown,
            code => return Err(unknown_seq(&format!("ESC [ < {} ... (button {})", params, code))),
        };
        Ok(Input::Mouse(MouseEvent::Press(button, row, col)))
    }

    // SS3
    fn escape_ss3(&mut self) -> Result<Input> {
        let seq2 = self.next_char()?;
        let key = match seq2 {
            'A' => Up,    // kcuu1
            'B' => Down,  // kcud1
            'C' => Right, // kcuf1
            'D' => Left,  // kcub1
            'F' => End,   // kend
            'H' => Home,  // khome
            'P' => F(1),  // kf1
            'Q' => F(2),  // kf2
            'R' => F(3),  // kf3
            'S' => F(4),  // kf4
            'a' => CtrlUp,
            'b' => CtrlDown,
            'c' => CtrlRight, // rxvt
            'd' => CtrlLeft,  // rxvt
            _ => return Err(unknown_seq(&format!("ESC O {:?}", seq2))),
        };
        Ok(Input::Key(key))
    }
}

fn unknown_seq(sequence: &str) -> TermgridError {
    TermgridError::UnknownSequence(sequence.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::unistd::{close, pipe, write};
    use std::os::unix::io::FromRawFd;

    fn keyboard_over(bytes: &[u8]) -> KeyBoard {
        let (read_fd, write_fd) = pipe().unwrap();
        write(write_fd, bytes).unwrap();
        close(write_fd).unwrap();
        KeyBoard::new(unsafe { File::from_raw_fd(read_fd) })
    }

    fn key(bytes: &[u8]) -> Key {
        match keyboard_over(bytes).next_input().unwrap() {
            Input::Key(key) => key,
            other => panic!("expected a key, got {:?}", other),
        }
    }

    fn mouse(bytes: &[u8]) -> MouseEvent {
        match keyboard_over(bytes).next_input().unwrap() {
            Input::Mouse(mouse) => mouse,
            other => panic!("expected a mouse event, got {:?}", other),
        }
    }

    #[test]
    fn plain_and_utf8_chars() {
        assert_eq!(key(b"a"), Char('a'));
        assert_eq!(key(b"Z"), Char('Z'));
        assert_eq!(key("你".as_bytes()), Char('你'));
    }

    #[test]
    fn control_keys() {
        assert_eq!(key(b"\x00"), Ctrl(' '));
        assert_eq!(key(b"\x03"), Ctrl('c'));
        assert_eq!(key(b"\x09"), Tab);
        assert_eq!(key(b"\x0d"), Enter);
        assert_eq!(key(b"\x1a"), Ctrl('z'));
        assert_eq!(key(b"\x7f"), Backspace);
    }

    #[test]
    fn escape_sequences() {
        assert_eq!(key(b"\x1b[A"), Up);
        assert_eq!(key(b"\x1b[D"), Left);
        assert_eq!(key(b"\x1b[Z"), BackTab);
        assert_eq!(key(b"\x1bOP"), F(1));
        assert_eq!(key(b"\x1bOd"), CtrlLeft);
        assert_eq!(key(b"\x1b[[B"), F(2));
        assert_eq!(key(b"\x1b[3~"), Delete);
        assert_eq!(key(b"\x1b[15~"), F(5));
        assert_eq!(key(b"\x1b[24~"), F(12));
        assert_eq!(key(b"\x1b[1;5C"), CtrlRight);
        assert_eq!(key(b"\x1b[1;2A"), ShiftUp);
    }

    #[test]
    fn alt_and_bare_esc() {
        assert_eq!(key(b"\x1bq"), Alt('q'));
        assert_eq!(key(b"\x1b\x0d"), AltEnter);
        assert_eq!(key(b"\x1b\x1b"), ESC);
        assert_eq!(key(b"\x1b"), ESC);
    }

    #[test]
    fn sgr_mouse_reports() {
        assert_eq!(mouse(b"\x1b[<0;5;3M"), MouseEvent::Press(MouseButton::Left, 2, 4));
        assert_eq!(mouse(b"\x1b[<2;1;1M"), MouseEvent::Press(MouseButton::Right, 0, 0));
        assert_eq!(mouse(b"\x1b[<64;1;1M"), MouseEvent::Press(MouseButton::WheelUp, 0, 0));
        assert_eq!(mouse(b"\x1b[<32;4;2M"), MouseEvent::Hold(1, 3));
        assert_eq!(mouse(b"\x1b[<0;5;3m"), MouseEvent::Release(2, 4));
        // ctrl-click: modifier bit 16 set on top of button 0
        assert_eq!(mouse(b"\x1b[<16;2;2M"), MouseEvent::Press(MouseButton::Left, 1, 1));
    }

    #[test]
    fn bracketed_paste_block() {
        let mut keyboard = keyboard_over(b"\x1b[200~hello\nworld\x1b[201~");
        assert_eq!(
            keyboard.next_input().unwrap(),
            Input::Paste("hello\nworld".to_string())
        );
    }

    #[test]
    fn paste_then_key() {
        let mut keyboard = keyboard_over(b"\x1b[200~hi\x1b[201~q");
        assert_eq!(keyboard.next_input().unwrap(), Input::Paste("hi".to_string()));
        assert_eq!(keyboard.next_input().unwrap(), Input::Key(Char('q')));
    }

    #[test]
    fn unknown_sequences_are_reported() {
        let err = keyboard_over(b"\x1b[9z").next_input().unwrap_err();
        assert!(matches!(err, TermgridError::UnknownSequence(_)));
    }

    #[test]
    fn end_of_input() {
        let err = keyboard_over(b"").next_input().unwrap_err();
        assert!(matches!(err, TermgridError::EndOfInput));
    }

    #[test]
    fn timeout_when_no_input_arrives() {
        let (read_fd, _write_fd) = pipe().unwrap();
        let mut keyboard = KeyBoard::new(unsafe { File::from_raw_fd(read_fd) });
        let err = keyboard
            .next_input_timeout(Duration::from_millis(10))
            .unwrap_err();
        assert!(matches!(err, TermgridError::Timeout(_)));
        let _ = close(_write_fd);
    }
}
