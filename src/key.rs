//! Defines all the keyboard keys `termgrid` recognizes.

// http://ascii-table.com/ansi-escape-sequences.php
/// Single key
#[rustfmt::skip]
#[derive(Eq, PartialEq, Hash, Debug, Copy, Clone)]
pub enum Key {
    ESC,

    Ctrl(char), // chars are lower case
    Tab, // Ctrl-i
    Enter, // Ctrl-m

    BackTab,
    Backspace,

    Up, Down, Left, Right, Home, End, Insert, Delete, PageUp, PageDown,
    CtrlUp, CtrlDown, CtrlLeft, CtrlRight,
    ShiftUp, ShiftDown, ShiftLeft, ShiftRight,

    F(u8),

    AltEnter,
    AltBackspace,

    Alt(char),
    Char(char),

    #[doc(hidden)]
    __Nonexhaustive,
}

impl std::fmt::Display for Key {
    /// The human-readable name of the key, the inverse of `from_keyname`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use self::Key::*;
        match self {
            ESC => write!(f, "Esc"),
            Ctrl(ch) => write!(f, "Ctrl-{}", ch),
            Tab => write!(f, "Tab"),
            Enter => write!(f, "Enter"),
            BackTab => write!(f, "Shift-Tab"),
            Backspace => write!(f, "Backspace"),
            Up => write!(f, "Up"),
            Down => write!(f, "Down"),
            Left => write!(f, "Left"),
            Right => write!(f, "Right"),
            Home => write!(f, "Home"),
            End => write!(f, "End"),
            Insert => write!(f, "Insert"),
            Delete => write!(f, "Delete"),
            PageUp => write!(f, "Page-Up"),
            PageDown => write!(f, "Page-Down"),
            CtrlUp => write!(f, "Ctrl-Up"),
            CtrlDown => write!(f, "Ctrl-Down"),
            CtrlLeft => write!(f, "Ctrl-Left"),
            CtrlRight => write!(f, "Ctrl-Right"),
            ShiftUp => write!(f, "Shift-Up"),
            ShiftDown => write!(f, "Shift-Down"),
            ShiftLeft => write!(f, "Shift-Left"),
            ShiftRight => write!(f, "Shift-Right"),
            F(num) => write!(f, "F{}", num),
            AltEnter => write!(f, "Alt-Enter"),
            AltBackspace => write!(f, "Alt-Backspace"),
            Alt(ch) => write!(f, "Alt-{}", ch),
            Char(ch) => write!(f, "{}", ch),
            _ => write!(f, "Unknown"),
        }
    }
}

/// Parse a textual key name (e.g. `ctrl-c`, `esc`, `f10`, `alt-x`, `q`)
/// into a `Key`. Names are case-insensitive.
pub fn from_keyname(keyname: &str) -> Option<Key> {
    use self::Key::*;
    let lower = keyname.to_lowercase();

    if let Some(ch) = strip_chord(&lower, "ctrl-") {
        return match ch {
            'i' => Some(Tab),
            'm' => Some(Enter),
            ch if ch.is_ascii_alphabetic() || ch == ' ' => Some(Ctrl(ch)),
            _ => None,
        };
    }

    if let Some(ch) = strip_chord(&lower, "alt-") {
        return Some(Alt(ch));
    }

    if let Some(num) = lower.strip_prefix("f").and_then(|n| n.parse::<u8>().ok()) {
        if num >= 1 && num <= 12 {
            return Some(F(num));
        }
    }

    match lower.as_ref() {
        "esc" => Some(ESC),
        "tab" => Some(Tab),
        "enter" | "return" => Some(Enter),
        "btab" | "shift-tab" => Some(BackTab),
        "bspace" | "bs" | "backspace" => Some(Backspace),
        "up" => Some(Up),
        "down" => Some(Down),
        "left" => Some(Left),
        "right" => Some(Right),
        "home" => Some(Home),
        "end" => Some(End),
        "insert" => Some(Insert),
        "del" | "delete" => Some(Delete),
        "pgup" | "page-up" => Some(PageUp),
        "pgdn" | "page-down" => Some(PageDown),
        "ctrl-up" => Some(CtrlUp),
        "ctrl-down" => Some(CtrlDown),
        "ctrl-left" => Some(CtrlLeft),
        "ctrl-right" => Some(CtrlRight),
        "shift-up" => Some(ShiftUp),
        "shift-down" => Some(ShiftDown),
        "shift-left" => Some(ShiftLeft),
        "shift-right" => Some(ShiftRight),
        "altenter" | "alt-enter" => Some(AltEnter),
        "alt-bs" | "alt-backspace" => Some(AltBackspace),
        ch if ch.chars().count() == 1 => ch.chars().next().map(Char),
        _ => None,
    }
}

fn strip_chord(name: &str, prefix: &str) -> Option<char> {
    let rest = name.strip_prefix(prefix)?;
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keynames_parse() {
        assert_eq!(from_keyname("ctrl-c"), Some(Key::Ctrl('c')));
        assert_eq!(from_keyname("Ctrl-Q"), Some(Key::Ctrl('q')));
        assert_eq!(from_keyname("ctrl-i"), Some(Key::Tab));
        assert_eq!(from_keyname("ctrl-m"), Some(Key::Enter));
        assert_eq!(from_keyname("alt-x"), Some(Key::Alt('x')));
        assert_eq!(from_keyname("esc"), Some(Key::ESC));
        assert_eq!(from_keyname("f10"), Some(Key::F(10)));
        assert_eq!(from_keyname("page-down"), Some(Key::PageDown));
        assert_eq!(from_keyname("q"), Some(Key::Char('q')));
        assert_eq!(from_keyname("f13"), None);
        assert_eq!(from_keyname("ctrl-"), None);
        assert_eq!(from_keyname("no-such-key"), None);
    }

    #[test]
    fn names_round_trip_through_display() {
        for name in &["ctrl-c", "esc", "f5", "alt-x", "enter", "shift-tab", "q"] {
            let key = from_keyname(name).unwrap();
            assert_eq!(from_keyname(&key.to_string()), Some(key), "{}", name);
        }
    }
}
