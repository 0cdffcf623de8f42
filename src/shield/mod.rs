//! Shield transport.
//!
//! The [`Transport`] trait is the seam between sensor drivers and the link to
//! the coprocessor: drivers hand it a service tag and an ordered list of
//! entries, and pull parsed events back out of it. [`Shield`] implements it
//! over any [`Connection`], writing each command as one JSON object and
//! framing incoming JSON objects out of the byte stream.
//!
//! ```rust,no_run
//! use virtualshield::shield::{Options, Shield};
//! # use virtualshield::network::Connection;
//! # struct MockConnection;
//! # impl Connection for MockConnection {}
//! # impl virtualshield::network::Read for MockConnection {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl virtualshield::network::Write for MockConnection {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl virtualshield::network::Close for MockConnection {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//!
//! let options = Options {
//!     idle_read_limit: 500,
//! };
//! let shield = Shield::with_options(MockConnection, options);
//! ```

#![deny(unsafe_code)]

use crate::network::Connection;
use crate::network::error::Error;
use crate::protocol::event::{ShieldEvent, frame};
use crate::protocol::{CommandRecord, MessageId, TaggedEntry};
use heapless::Vec;

/// Capacity of the outgoing command buffer.
pub const TX_BUFFER_LEN: usize = 512;
/// Capacity of the incoming message buffer.
pub const RX_BUFFER_LEN: usize = 1024;

/// Chunk size of a single read from the connection.
const READ_CHUNK_LEN: usize = 64;

/// Link between a sensor driver and the coprocessor.
pub trait Transport {
    /// Serializes and sends one command, returning its message id.
    fn write_all(&mut self, service: &str, entries: &[TaggedEntry<'_>])
    -> Result<MessageId, Error>;

    /// Returns the next complete event, or `None` if none is available yet.
    ///
    /// The event borrows the transport until it is dropped.
    fn receive(&mut self) -> Result<Option<ShieldEvent<'_>>, Error>;
}

/// Configuration of a [`Shield`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Number of consecutive empty reads tolerated before [`Error::Timeout`].
    ///
    /// Each call to [`Transport::receive`] that finds no bytes on the link
    /// counts as one empty read; any received byte resets the count.
    pub idle_read_limit: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            idle_read_limit: 10_000,
        }
    }
}

/// [`Transport`] over a byte-stream connection.
#[derive(Debug)]
pub struct Shield<C: Connection> {
    connection: C,
    options: Options,
    next_id: MessageId,
    rx: Vec<u8, RX_BUFFER_LEN>,
    /// Bytes of `rx` belonging to the event handed out last.
    consumed: usize,
    idle_reads: u32,
}

impl<C: Connection> Shield<C> {
    /// Creates a shield with default [`Options`].
    pub fn new(connection: C) -> Self {
        Self::with_options(connection, Options::default())
    }

    /// Creates a shield with explicit options.
    pub fn with_options(connection: C, options: Options) -> Self {
        Self {
            connection,
            options,
            next_id: 1,
            rx: Vec::new(),
            consumed: 0,
            idle_reads: 0,
        }
    }

    /// Returns the options in use.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Get the underlying connection
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Get a mutable reference to the underlying connection
    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// Consumes the shield and returns the connection.
    pub fn into_connection(self) -> C {
        self.connection
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = self.next_id;
        self.next_id = match self.next_id.wrapping_add(1) {
            0 => 1,
            next => next,
        };
        id
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let mut written = 0;
        while written < bytes.len() {
            match self.connection.write(&bytes[written..]) {
                Ok(0) => return Err(Error::ConnectionClosed),
                Ok(n) => written += n,
                Err(_) => return Err(Error::WriteError),
            }
        }
        self.connection.flush().map_err(|_| Error::WriteError)
    }

    /// Drops the bytes of the previously returned event from `rx`.
    fn discard_consumed(&mut self) {
        if self.consumed == 0 {
            return;
        }
        let len = self.rx.len();
        self.rx.copy_within(self.consumed..len, 0);
        self.rx.truncate(len - self.consumed);
        self.consumed = 0;
    }

    /// Reads one chunk from the connection into `rx`.
    ///
    /// Returns `false` when the connection had nothing to offer.
    fn fill(&mut self) -> Result<bool, Error> {
        let mut chunk = [0u8; READ_CHUNK_LEN];
        let room = (RX_BUFFER_LEN - self.rx.len()).min(READ_CHUNK_LEN);
        if room == 0 {
            // A message larger than the buffer can never be framed.
            warn!("receive buffer full, dropping {} bytes", self.rx.len());
            self.rx.clear();
            return Err(Error::BufferOverflow);
        }

        let n = self
            .connection
            .read(&mut chunk[..room])
            .map_err(|_| Error::ReadError)?;
        if n == 0 {
            self.idle_reads += 1;
            if self.idle_reads > self.options.idle_read_limit {
                self.idle_reads = 0;
                return Err(Error::Timeout);
            }
            return Ok(false);
        }

        self.idle_reads = 0;
        self.rx
            .extend_from_slice(&chunk[..n])
            .map_err(|_| Error::BufferOverflow)?;
        Ok(true)
    }
}

impl<C: Connection> Transport for Shield<C> {
    fn write_all(
        &mut self,
        service: &str,
        entries: &[TaggedEntry<'_>],
    ) -> Result<MessageId, Error> {
        let id = self.allocate_id();
        let record = CommandRecord {
            service,
            id,
            entries,
        };

        let mut tx = [0u8; TX_BUFFER_LEN];
        let len = record.to_slice(&mut tx).map_err(|_| Error::BufferOverflow)?;
        trace!("sending {} byte command {} to {}", len, id, service);
        self.send(&tx[..len])?;
        Ok(id)
    }

    fn receive(&mut self) -> Result<Option<ShieldEvent<'_>>, Error> {
        self.discard_consumed();

        let (start, end) = loop {
            if let Some(range) = frame(&self.rx) {
                break range;
            }
            if !self.fill()? {
                return Ok(None);
            }
        };

        self.consumed = end;
        match ShieldEvent::parse(&self.rx[start..end]) {
            Ok(event) => {
                trace!("received event {}", event.id);
                Ok(Some(event))
            }
            Err(_) => {
                warn!("dropping unparsable message of {} bytes", end - start);
                Err(Error::ProtocolError)
            }
        }
    }
}
