//!
//! ## Termgrid
//! Termgrid is a small terminal-screen toolkit. Highlights:
//!
//! - The terminal as a grid of styled cells, buffered for efficient rendering.
//! - Structured input events: keys, mouse reports, bracketed paste, resize.
//! - Scoped acquire/release so the tty is always restored.
//!
//! Termgrid views the terminal the way [termbox](https://github.com/nsf/termbox)
//! does: a table of fixed-size cells, with input arriving as a stream of
//! structured messages.
//!
//! ## Usage
//!
//! In your `Cargo.toml` add the following:
//!
//! ```toml
//! [dependencies]
//! termgrid = "*"
//! ```
//!
//! Here is an example:
//!
//! ```no_run
//! use termgrid::event::Event;
//! use termgrid::key::Key;
//! use termgrid::term::Term;
//!
//! fn main() {
//!     let term = Term::new().unwrap();
//!     let _ = term.print(0, 0, "press a key, (q) to quit");
//!     let _ = term.present();
//!
//!     while let Ok(ev) = term.poll_event() {
//!         match ev {
//!             Event::Key(Key::Char('q')) => break,
//!             ev => {
//!                 let _ = term.print(1, 0, format!("event: {:?}", ev).as_str());
//!             }
//!         }
//!         let _ = term.present();
//!     }
//! }
//! ```
pub mod attr;
pub mod canvas;
pub mod cell;
mod color;
pub mod error;
pub mod event;
pub mod input;
pub mod key;
mod macros;
pub mod output;
pub mod prelude;
pub mod raw;
pub mod screen;
mod sys;
pub mod term;

#[macro_use]
extern crate log;

use crate::error::TermgridError;

pub type Result<T> = std::result::Result<T, TermgridError>;
