use std::fmt;
use std::io;

#[derive(Debug)]
pub enum ErrorType {
    Io(io::Error),
    UnknownTag(u8),
    StringTooLong(usize),
    CollectionTooLarge(usize),
    TrailingBytes(usize),
    OutOfRange,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorType::Io(err) => write!(f, "io error: {}", err),
            ErrorType::UnknownTag(tag) => write!(f, "unknown message tag {}", tag),
            ErrorType::StringTooLong(len) => write!(f, "string of {} bytes exceeds 255 byte limit", len),
            ErrorType::CollectionTooLarge(len) => write!(f, "collection of {} entries exceeds limit", len),
            ErrorType::TrailingBytes(count) => write!(f, "{} trailing bytes after decoded message", count),
            ErrorType::OutOfRange => write!(f, "value out of range"),
        }
    }
}

/// Errors produced by the wire codec and the channels built on top of it.
///
/// `Wait` is not a failure: it signals the caller that a full frame is not
/// available yet and the read should be retried once more data has arrived.
#[derive(Debug)]
pub enum NetworkError {
    Wait,
    Fatal(ErrorType),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::Wait => write!(f, "would block"),
            NetworkError::Fatal(kind) => write!(f, "{}", kind),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<io::Error> for NetworkError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock => NetworkError::Wait,
            _ => NetworkError::Fatal(ErrorType::Io(err)),
        }
    }
}

impl From<std::string::FromUtf8Error> for NetworkError {
    fn from(_: std::string::FromUtf8Error) -> Self {
        NetworkError::Fatal(ErrorType::OutOfRange)
    }
}
