//! Common error types for shield communication

/// A common error type for shield operations.
///
/// Covers failures of the serial link, framing/parsing of shield messages and
/// errors reported back by the coprocessor. It is `Copy` and allocation free so
/// that it can travel through `no_std` code unchanged.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An error occurred during a write operation.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// No complete message arrived within the configured read budget.
    Timeout,
    /// The connection was closed.
    ConnectionClosed,
    /// A received message could not be framed or parsed.
    ProtocolError,
    /// A message did not fit into its fixed-size buffer.
    BufferOverflow,
    /// The coprocessor answered with an error code.
    Remote(i32),
}

impl Error {
    /// Returns the negative message id this error maps to.
    ///
    /// Sketches written against the callback-style API treat any negative id
    /// as a failed request; remote codes are passed through when they are
    /// already negative.
    pub fn code(&self) -> i32 {
        match self {
            Error::WriteError => -1,
            Error::ReadError => -2,
            Error::Timeout => -3,
            Error::ConnectionClosed => -4,
            Error::ProtocolError => -5,
            Error::BufferOverflow => -6,
            Error::Remote(code) if *code < 0 => *code,
            Error::Remote(_) => -7,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            Error::ProtocolError => defmt::write!(f, "ProtocolError"),
            Error::BufferOverflow => defmt::write!(f, "BufferOverflow"),
            Error::Remote(code) => defmt::write!(f, "Remote({})", code),
        }
    }
}
