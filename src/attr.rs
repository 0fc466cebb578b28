//! Attributes of a cell: foreground and background color plus text effects.

pub use crate::color::Color;

use bitflags::bitflags;

bitflags! {
    /// Text effects, combinable with `|`
    pub struct Effect: u8 {
        const BOLD = 0b0000_0001;
        const DIM = 0b0000_0010;
        const UNDERLINE = 0b0000_0100;
        const BLINK = 0b0000_1000;
        const REVERSE = 0b0001_0000;
    }
}

impl Default for Effect {
    fn default() -> Self {
        Effect::empty()
    }
}

/// The style of a cell: a (foreground, background) color pair and effects
///
/// ```
/// use termgrid::attr::{Attr, Color, Effect};
///
/// let attr = Attr::default().fg(Color::RED).effect(Effect::BOLD);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attr {
    pub fg: Color,
    pub bg: Color,
    pub effect: Effect,
}

impl Attr {
    pub fn fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    pub fn bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    pub fn effect(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }
}
