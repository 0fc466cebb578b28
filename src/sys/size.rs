// terminal size query, the way termion does it
use super::cvt;
use nix::libc::{c_ushort, ioctl, TIOCGWINSZ};
use std::io;
use std::mem;
use std::os::unix::io::RawFd;

#[repr(C)]
struct TermSize {
    row: c_ushort,
    col: c_ushort,
    x: c_ushort,
    y: c_ushort,
}

/// Size of the terminal behind `fd`, as (width, height) in cells.
pub fn terminal_size(fd: RawFd) -> io::Result<(u16, u16)> {
    unsafe {
        let mut size: TermSize = mem::zeroed();
        cvt(ioctl(fd, TIOCGWINSZ, &mut size as *mut _))?;
        Ok((size.col as u16, size.row as u16))
    }
}
