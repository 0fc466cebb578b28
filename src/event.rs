//! Events a `Term` could return.

pub use crate::key::Key;

/// One unit of terminal input, read once per loop iteration.
///
/// `Timer` and `Interrupt` are never produced by the terminal itself; they
/// enter the queue through [`Term::send_event`](crate::term::Term::send_event).
/// `Restarted` is emitted whenever the terminal is (re)acquired.
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub enum Event {
    Key(Key),
    Mouse(MouseEvent),
    Paste(String),
    Resize { width: usize, height: usize },
    Timer,
    Interrupt,
    /// A runtime failure surfaced as input rather than raised: an
    /// unrecognized escape sequence, a decode error, a closed input stream.
    Error(String),
    Restarted,

    #[doc(hidden)]
    __Nonexhaustive,
}

/// Mouse activity with 0-based (row, col) coordinates.
#[derive(Eq, PartialEq, Hash, Debug, Copy, Clone)]
pub enum MouseEvent {
    Press(MouseButton, u16, u16),
    Release(u16, u16),
    Hold(u16, u16),
}

/// A mouse button.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// The left mouse button.
    Left,
    /// The right mouse button.
    Right,
    /// The middle mouse button.
    Middle,
    /// Mouse wheel is going up.
    ///
    /// This event is typically only used with `MouseEvent::Press`.
    WheelUp,
    /// Mouse wheel is going down.
    ///
    /// This event is typically only used with `MouseEvent::Press`.
    WheelDown,
}
