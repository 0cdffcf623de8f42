//! Byte-stream abstraction for the link between the host and the shield.
//!
//! The shield coprocessor is reached over a serial port, a Bluetooth SPP
//! stream or any other ordered byte pipe. These traits describe that pipe so
//! that [`crate::shield::Shield`] can run on any of them.

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for link operations
pub mod error;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connection, Read, Write};
}

pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection.
    ///
    /// Returning `Ok(0)` means no bytes are currently available.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Close {}
