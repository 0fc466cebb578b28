use std::error::Error;
use std::fmt::{Display, Formatter};
use std::string::FromUtf8Error;
use std::time::Duration;

#[derive(Debug)]
pub enum TermgridError {
    UnknownSequence(String),
    Timeout(Duration),
    Interrupted,
    EndOfInput,
    TerminalNotStarted,
    AlreadyStarted,
    SendEventError(String),
    FromUtf8Error(std::string::FromUtf8Error),
    ParseIntError(std::num::ParseIntError),
    IOError(std::io::Error),
    NixError(nix::Error),
    TerminfoError(term::Error),
    ChannelReceiveError(std::sync::mpsc::RecvError),
}

impl Display for TermgridError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TermgridError::UnknownSequence(sequence) => {
                write!(f, "unsupported escape sequence: {}", sequence)
            }
            TermgridError::Timeout(duration) => write!(f, "timeout after {:?}", duration),
            TermgridError::Interrupted => write!(f, "interrupted while waiting for input"),
            TermgridError::EndOfInput => write!(f, "input stream closed"),
            TermgridError::TerminalNotStarted => {
                write!(f, "terminal not started, call `restart` to start it")
            }
            TermgridError::AlreadyStarted => {
                write!(f, "another terminal is already active in this process")
            }
            TermgridError::SendEventError(error) => write!(f, "send event error: {}", error),
            TermgridError::FromUtf8Error(error) => write!(f, "{}", error),
            TermgridError::ParseIntError(error) => write!(f, "{}", error),
            TermgridError::IOError(error) => write!(f, "{}", error),
            TermgridError::NixError(error) => write!(f, "{}", error),
            TermgridError::TerminfoError(error) => write!(f, "{}", error),
            TermgridError::ChannelReceiveError(error) => write!(f, "{}", error),
        }
    }
}

impl Error for TermgridError {}

impl From<std::string::FromUtf8Error> for TermgridError {
    fn from(error: FromUtf8Error) -> Self {
        TermgridError::FromUtf8Error(error)
    }
}

impl From<std::num::ParseIntError> for TermgridError {
    fn from(error: std::num::ParseIntError) -> Self {
        TermgridError::ParseIntError(error)
    }
}

impl From<std::io::Error> for TermgridError {
    fn from(error: std::io::Error) -> Self {
        TermgridError::IOError(error)
    }
}

impl From<nix::Error> for TermgridError {
    fn from(error: nix::Error) -> Self {
        TermgridError::NixError(error)
    }
}

impl From<term::Error> for TermgridError {
    fn from(error: term::Error) -> Self {
        TermgridError::TerminfoError(error)
    }
}

impl From<std::sync::mpsc::RecvError> for TermgridError {
    fn from(error: std::sync::mpsc::RecvError) -> Self {
        TermgridError::ChannelReceiveError(error)
    }
}
