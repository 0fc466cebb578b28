//! Term is a thread-safe handle to the terminal.
//!
//! It owns the screen buffer and the raw-mode tty, feeds structured input
//! events through a channel, and restores the terminal on every exit path,
//! including unwinding.
//!
//! ```no_run
//! use termgrid::event::Event;
//! use termgrid::key::Key;
//! use termgrid::term::Term;
//!
//! let term = Term::new().unwrap();
//!
//! while let Ok(ev) = term.poll_event() {
//!     if let Event::Key(Key::Char('q')) = ev {
//!         break;
//!     }
//!
//!     let _ = term.print(0, 0, format!("got event: {:?}", ev).as_str());
//!     let _ = term.present();
//! }
//! ```
//!
//! Term is modeled after [termbox](https://github.com/nsf/termbox): the
//! terminal is a table of fixed-size cells and input is a stream of
//! structured messages.

use crate::attr::Attr;
use crate::canvas::Canvas;
use crate::cell::Cell;
use crate::error::TermgridError;
use crate::event::Event;
use crate::input::{Input, KeyBoard};
use crate::output::Output;
use crate::raw::{get_tty, IntoRawMode};
use crate::screen::Screen;
use crate::sys::signal::{initialize_signals, notify_on_sigwinch, unregister_sigwinch};
use crate::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// How often the listener threads wake to check the stopped flag.
const WAIT_TIMEOUT: Duration = Duration::from_millis(300);

/// At most one terminal handle may be live per process.
static SCREEN_LIVE: AtomicBool = AtomicBool::new(false);

pub struct Term {
    stopped: Arc<AtomicBool>,
    term_lock: Mutex<TermLock>,
    event_rx: Mutex<Receiver<Event>>,
    event_tx: Arc<Mutex<Sender<Event>>>,
}

impl Term {
    /// Acquire the terminal: open `/dev/tty`, enter raw mode and the
    /// alternate screen, and start the input and resize listeners.
    ///
    /// Fails when no terminal is attached, when `$TERM` names no usable
    /// terminfo entry, or when another `Term` is already live in this
    /// process.
    pub fn new() -> Result<Term> {
        if SCREEN_LIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(TermgridError::AlreadyStarted);
        }

        initialize_signals();

        let (event_tx, event_rx) = channel();
        let term = Term {
            stopped: Arc::new(AtomicBool::new(true)),
            term_lock: Mutex::new(TermLock::new()),
            event_tx: Arc::new(Mutex::new(event_tx)),
            event_rx: Mutex::new(event_rx),
        };
        // on failure `term` is dropped here and the liveness flag released
        term.restart()?;
        Ok(term)
    }

    fn ensure_not_stopped(&self) -> Result<()> {
        if !self.stopped.load(Ordering::Relaxed) {
            Ok(())
        } else {
            Err(TermgridError::TerminalNotStarted)
        }
    }

    /// (Re)acquire the terminal after `pause`. A fresh `Term` is already
    /// started. Emits `Event::Restarted` once the listeners are running.
    pub fn restart(&self) -> Result<()> {
        if !self.stopped.load(Ordering::Relaxed) {
            return Ok(());
        }

        let mut termlock = self
            .term_lock
            .lock()
            .expect("term:restart: failed to lock terminal");

        let ttyout = get_tty()?.into_raw_mode()?;
        let output = Output::new(Box::new(ttyout))?;
        let keyboard = KeyBoard::new_with_tty()?;
        termlock.restart(output)?;
        debug!("term: started, size {:?}", termlock.term_size());

        self.start_input_listener(keyboard);
        self.start_resize_listener();
        self.stopped.store(false, Ordering::SeqCst);

        send_to(&self.event_tx, Event::Restarted);
        Ok(())
    }

    /// Give the terminal back: leave the alternate screen, restore cooked
    /// mode and stop the listeners. `poll_event` blocks until `restart`.
    pub fn pause(&self) -> Result<()> {
        self.ensure_not_stopped()?;
        self.stopped.store(true, Ordering::SeqCst);
        let mut termlock = self
            .term_lock
            .lock()
            .expect("term:pause: failed to lock terminal");
        termlock.pause();
        debug!("term: paused");
        Ok(())
    }

    fn start_input_listener(&self, mut keyboard: KeyBoard) {
        self.stopped.store(false, Ordering::SeqCst);
        let event_tx = self.event_tx.clone();
        let stopped = self.stopped.clone();
        thread::spawn(move || {
            loop {
                match keyboard.next_input_timeout(WAIT_TIMEOUT) {
                    Ok(Input::Key(key)) => send_to(&event_tx, Event::Key(key)),
                    Ok(Input::Mouse(mouse)) => send_to(&event_tx, Event::Mouse(mouse)),
                    Ok(Input::Paste(text)) => send_to(&event_tx, Event::Paste(text)),
                    Err(TermgridError::Timeout(_)) | Err(TermgridError::Interrupted) => {}
                    Err(err @ TermgridError::UnknownSequence(_))
                    | Err(err @ TermgridError::FromUtf8Error(_))
                    | Err(err @ TermgridError::ParseIntError(_)) => {
                        // recoverable decode failure, surfaced to the operator
                        debug!("term: input decode failure: {}", err);
                        send_to(&event_tx, Event::Error(err.to_string()));
                    }
                    Err(err) => {
                        // the input stream is gone; report once and stop
                        send_to(&event_tx, Event::Error(err.to_string()));
                        break;
                    }
                }

                if stopped.load(Ordering::Relaxed) {
                    break;
                }
            }
        });
    }

    fn start_resize_listener(&self) {
        self.stopped.store(false, Ordering::SeqCst);
        let event_tx = self.event_tx.clone();
        let stopped = self.stopped.clone();
        thread::spawn(move || {
            let sigwinch_rx = notify_on_sigwinch();
            loop {
                if sigwinch_rx.recv_timeout(WAIT_TIMEOUT).is_ok() {
                    send_to(&event_tx, Event::Resize { width: 0, height: 0 });
                }

                if stopped.load(Ordering::Relaxed) {
                    break;
                }
            }
            unregister_sigwinch();
        });
    }

    /// Resize events carry no size when they leave the listener; fill it in
    /// after resynchronizing the buffer with the terminal.
    fn filter_event(&self, event: Event) -> Event {
        match event {
            Event::Resize { .. } => {
                {
                    let mut termlock = self
                        .term_lock
                        .lock()
                        .expect("term:filter_event: failed to lock terminal");
                    let _ = termlock.on_resize();
                }
                let (width, height) = self.term_size().unwrap_or((0, 0));
                Event::Resize { width, height }
            }
            ev => ev,
        }
    }

    /// Wait for the next event indefinitely and return it.
    pub fn poll_event(&self) -> Result<Event> {
        let event_rx = self
            .event_rx
            .lock()
            .expect("term:poll_event: failed to lock event receiver");
        let event = event_rx.recv()?;
        Ok(self.filter_event(event))
    }

    /// Inject an event to be returned by a later `poll_event`. This is the
    /// entry point for `Event::Timer` and `Event::Interrupt`.
    pub fn send_event(&self, event: Event) -> Result<()> {
        let event_tx = self
            .event_tx
            .lock()
            .expect("term:send_event: failed to lock event sender");
        event_tx
            .send(event)
            .map_err(|err| TermgridError::SendEventError(err.to_string()))
    }

    /// Flush pending screen-buffer changes to the terminal.
    pub fn present(&self) -> Result<()> {
        self.ensure_not_stopped()?;
        let mut termlock = self
            .term_lock
            .lock()
            .expect("term:present: failed to lock terminal");
        termlock.present()
    }

    /// Re-read the terminal size and schedule a full repaint.
    pub fn sync(&self) -> Result<()> {
        self.ensure_not_stopped()?;
        let mut termlock = self
            .term_lock
            .lock()
            .expect("term:sync: failed to lock terminal");
        termlock.sync()
    }

    /// The printable size (width, height) of the terminal.
    pub fn term_size(&self) -> Result<(usize, usize)> {
        self.ensure_not_stopped()?;
        let termlock = self
            .term_lock
            .lock()
            .expect("term:term_size: failed to lock terminal");
        termlock.term_size()
    }

    /// Clear the screen buffer.
    pub fn clear(&self) -> Result<()> {
        self.ensure_not_stopped()?;
        let mut termlock = self
            .term_lock
            .lock()
            .expect("term:clear: failed to lock terminal");
        termlock.clear()
    }

    /// Change the cell at `(row, col)` to `cell`.
    pub fn put_cell(&self, row: usize, col: usize, cell: Cell) -> Result<usize> {
        self.ensure_not_stopped()?;
        let mut termlock = self
            .term_lock
            .lock()
            .expect("term:put_cell: failed to lock terminal");
        termlock.put_cell(row, col, cell)
    }

    /// Print `content` starting at `(row, col)`.
    pub fn print(&self, row: usize, col: usize, content: &str) -> Result<usize> {
        self.print_with_attr(row, col, content, Attr::default())
    }

    /// Print `content` starting at `(row, col)` with `attr`.
    pub fn print_with_attr(
        &self,
        row: usize,
        col: usize,
        content: &str,
        attr: Attr,
    ) -> Result<usize> {
        self.ensure_not_stopped()?;
        let mut termlock = self
            .term_lock
            .lock()
            .expect("term:print_with_attr: failed to lock terminal");
        termlock.print(row, col, content, attr)
    }

    /// Move the cursor to (row, col).
    pub fn set_cursor(&self, row: usize, col: usize) -> Result<()> {
        self.ensure_not_stopped()?;
        let mut termlock = self
            .term_lock
            .lock()
            .expect("term:set_cursor: failed to lock terminal");
        termlock.set_cursor(row, col)
    }

    /// Show or hide the cursor; `false` hides it.
    pub fn show_cursor(&self, show: bool) -> Result<()> {
        self.ensure_not_stopped()?;
        let mut termlock = self
            .term_lock
            .lock()
            .expect("term:show_cursor: failed to lock terminal");
        termlock.show_cursor(show)
    }

    /// Ask the terminal to report mouse activity.
    pub fn enable_mouse_support(&self) -> Result<()> {
        self.ensure_not_stopped()?;
        let mut termlock = self
            .term_lock
            .lock()
            .expect("term:enable_mouse_support: failed to lock terminal");
        termlock.set_mouse_support(true)
    }

    pub fn disable_mouse_support(&self) -> Result<()> {
        self.ensure_not_stopped()?;
        let mut termlock = self
            .term_lock
            .lock()
            .expect("term:disable_mouse_support: failed to lock terminal");
        termlock.set_mouse_support(false)
    }

    /// Ask the terminal to frame pasted text in bracketed-paste markers so
    /// it arrives as one `Event::Paste`.
    pub fn enable_paste_support(&self) -> Result<()> {
        self.ensure_not_stopped()?;
        let mut termlock = self
            .term_lock
            .lock()
            .expect("term:enable_paste_support: failed to lock terminal");
        termlock.set_paste_support(true)
    }

    pub fn disable_paste_support(&self) -> Result<()> {
        self.ensure_not_stopped()?;
        let mut termlock = self
            .term_lock
            .lock()
            .expect("term:disable_paste_support: failed to lock terminal");
        termlock.set_paste_support(false)
    }
}

impl Drop for Term {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
        SCREEN_LIVE.store(false, Ordering::SeqCst);
        // term_lock drops next and gives the tty back
    }
}

impl Canvas for Term {
    fn size(&self) -> Result<(usize, usize)> {
        self.term_size()
    }

    fn clear(&mut self) -> Result<()> {
        Term::clear(self)
    }

    fn put_cell(&mut self, row: usize, col: usize, cell: Cell) -> Result<usize> {
        Term::put_cell(self, row, col, cell)
    }

    fn set_cursor(&mut self, row: usize, col: usize) -> Result<()> {
        Term::set_cursor(self, row, col)
    }

    fn show_cursor(&mut self, show: bool) -> Result<()> {
        Term::show_cursor(self, show)
    }
}

fn send_to(event_tx: &Arc<Mutex<Sender<Event>>>, event: Event) {
    let event_tx = event_tx
        .lock()
        .expect("term: failed to lock event sender");
    let _ = event_tx.send(event);
}

struct TermLock {
    mouse_enabled: bool,
    paste_enabled: bool,
    screen: Screen,
    output: Option<Output>,
}

impl TermLock {
    fn new() -> Self {
        Self {
            mouse_enabled: false,
            paste_enabled: false,
            screen: Screen::new(0, 0),
            output: None,
        }
    }

    /// Take over the tty: alternate screen, blank slate, buffer sized to
    /// the terminal.
    fn restart(&mut self, output: Output) -> Result<()> {
        self.output.replace(output);
        let output = self
            .output
            .as_mut()
            .ok_or(TermgridError::TerminalNotStarted)?;
        output.enter_alternate_screen();
        output.erase_screen();
        output.flush();
        self.on_resize()
    }

    /// Resize the screen buffer to the terminal's current size.
    fn on_resize(&mut self) -> Result<()> {
        let output = self
            .output
            .as_mut()
            .ok_or(TermgridError::TerminalNotStarted)?;
        let (width, height) = output.terminal_size()?;
        self.screen.resize(width, height);
        Ok(())
    }

    /// Present the pending buffer to the terminal.
    fn present(&mut self) -> Result<()> {
        let commands = self.screen.present();
        let output = self
            .output
            .as_mut()
            .ok_or(TermgridError::TerminalNotStarted)?;
        for command in commands {
            output.execute(command);
        }
        output.flush();
        Ok(())
    }

    /// Erase the terminal, resynchronize the buffer size and schedule a
    /// full repaint on the next present.
    fn sync(&mut self) -> Result<()> {
        {
            let output = self
                .output
                .as_mut()
                .ok_or(TermgridError::TerminalNotStarted)?;
            output.erase_screen();
            output.flush();
        }
        self.on_resize()?;
        self.screen.invalidate();
        Ok(())
    }

    /// Hand the tty back to the shell. Dropping the output also drops its
    /// raw-mode guard, which restores cooked mode.
    fn pause(&mut self) {
        if let Some(mut output) = self.output.take() {
            if self.mouse_enabled {
                output.disable_mouse_support();
            }
            if self.paste_enabled {
                output.disable_bracketed_paste();
            }
            output.show_cursor();
            output.quit_alternate_screen();
            output.flush();
        }
    }

    fn term_size(&self) -> Result<(usize, usize)> {
        Ok((self.screen.width(), self.screen.height()))
    }

    fn clear(&mut self) -> Result<()> {
        self.screen.clear_buffer();
        Ok(())
    }

    fn put_cell(&mut self, row: usize, col: usize, cell: Cell) -> Result<usize> {
        Ok(Screen::put_cell(&mut self.screen, row, col, cell))
    }

    fn print(&mut self, row: usize, col: usize, content: &str, attr: Attr) -> Result<usize> {
        self.screen.print_with_attr(row, col, content, attr)
    }

    fn set_cursor(&mut self, row: usize, col: usize) -> Result<()> {
        Canvas::set_cursor(&mut self.screen, row, col)
    }

    fn show_cursor(&mut self, show: bool) -> Result<()> {
        Canvas::show_cursor(&mut self.screen, show)
    }

    fn set_mouse_support(&mut self, enable: bool) -> Result<()> {
        let output = self
            .output
            .as_mut()
            .ok_or(TermgridError::TerminalNotStarted)?;
        if enable {
            output.enable_mouse_support();
        } else {
            output.disable_mouse_support();
        }
        output.flush();
        self.mouse_enabled = enable;
        Ok(())
    }

    fn set_paste_support(&mut self, enable: bool) -> Result<()> {
        let output = self
            .output
            .as_mut()
            .ok_or(TermgridError::TerminalNotStarted)?;
        if enable {
            output.enable_bracketed_paste();
        } else {
            output.disable_bracketed_paste();
        }
        output.flush();
        self.paste_enabled = enable;
        Ok(())
    }
}

impl Drop for TermLock {
    fn drop(&mut self) {
        self.pause();
    }
}
