pub use crate::attr::{Attr, Color, Effect};
pub use crate::canvas::Canvas;
pub use crate::cell::Cell;
pub use crate::event::{Event, Key, MouseButton, MouseEvent};
pub use crate::term::Term;
pub use crate::Result;
