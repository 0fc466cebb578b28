use crate::error::TermgridError;
use crate::Result;
use std::os::unix::io::RawFd;
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::select;
use nix::sys::time::{TimeVal, TimeValLike};

fn duration_to_timeval(duration: Duration) -> TimeVal {
    let millis = duration.as_secs() * 1000 + u64::from(duration.subsec_millis());
    TimeVal::milliseconds(millis as i64)
}

/// Block until `fd` is readable or `timeout` elapses. A zero timeout waits
/// indefinitely. A signal arriving mid-wait surfaces as `Interrupted`.
pub fn wait_until_ready(fd: RawFd, timeout: Duration) -> Result<()> {
    let mut fdset = select::FdSet::new();
    fdset.insert(fd);

    let ready = if timeout == Duration::new(0, 0) {
        select::select(None, &mut fdset, None, None, None)
    } else {
        let mut timeout_spec = duration_to_timeval(timeout);
        select::select(None, &mut fdset, None, None, &mut timeout_spec)
    };

    match ready {
        Ok(count) if count < 1 => Err(TermgridError::Timeout(timeout)),
        Ok(_) => Ok(()),
        Err(nix::Error::Sys(Errno::EINTR)) => Err(TermgridError::Interrupted),
        Err(err) => Err(err.into()),
    }
}
