//! SIGWINCH plumbing: the signal is blocked process-wide, consumed by a
//! dedicated waiter thread and forwarded to the registered notifier.
use lazy_static::lazy_static;
use nix::sys::signal::{pthread_sigmask, sigaction};
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, SigmaskHow, Signal};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;
use std::sync::Once;
use std::thread;

lazy_static! {
    // the screen is a process singleton, so one notifier slot suffices
    static ref NOTIFIER: Mutex<Option<Sender<()>>> = Mutex::new(None);
}

static ONCE: Once = Once::new();

pub fn initialize_signals() {
    ONCE.call_once(listen_sigwinch);
}

/// Register to be woken on terminal size changes. Replaces any previous
/// registration.
pub fn notify_on_sigwinch() -> Receiver<()> {
    let (tx, rx) = channel();
    let mut notifier = NOTIFIER.lock().expect("signal: failed to lock notifier");
    notifier.replace(tx);
    rx
}

pub fn unregister_sigwinch() {
    let mut notifier = NOTIFIER.lock().expect("signal: failed to lock notifier");
    notifier.take();
}

extern "C" fn handle_sigwinch(_: i32) {}

fn listen_sigwinch() {
    // block the signal before any thread exists so every thread inherits
    // the mask and only the waiter below consumes it
    let mut sigset = SigSet::empty();
    sigset.add(Signal::SIGWINCH);
    let _ = pthread_sigmask(SigmaskHow::SIG_BLOCK, Some(&sigset), None);

    // SIGWINCH is ignored by default on some platforms (macOS), so an empty
    // handler has to be installed for sigwait to see it
    let action = SigAction::new(
        SigHandler::Handler(handle_sigwinch),
        SaFlags::empty(),
        SigSet::empty(),
    );

    unsafe {
        let _ = sigaction(Signal::SIGWINCH, &action);
    }

    thread::spawn(move || loop {
        if sigset.wait().is_err() {
            continue;
        }
        let notifier = NOTIFIER.lock().expect("signal: failed to lock notifier");
        if let Some(sender) = notifier.as_ref() {
            let _ = sender.send(());
        }
    });
}
