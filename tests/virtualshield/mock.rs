//! Mock serial link for driving the shield in tests

use virtualshield::network::error::Error;
use virtualshield::network::{Close, Connection, Read, Write};

/// Largest number of bytes handed out by a single read.
const READ_CHUNK: usize = 16;

/// Connection that replays queued bytes and records everything written.
#[derive(Debug, Default)]
pub struct MockConnection {
    data: Vec<u8>,
    read_pos: usize,
    pub writes: Vec<u8>,
}

impl MockConnection {
    /// Create a new mock connection with predefined data to read
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            ..Self::default()
        }
    }

    /// Queue more data behind whatever is still unread
    pub fn push_read_data(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data);
    }

    /// Number of bytes not yet read
    pub fn unread(&self) -> usize {
        self.data.len() - self.read_pos
    }

    /// Everything written so far, as text
    pub fn written(&self) -> &str {
        std::str::from_utf8(&self.writes).unwrap()
    }
}

impl Read for MockConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let to_read = buf.len().min(self.unread()).min(READ_CHUNK);
        buf[..to_read].copy_from_slice(&self.data[self.read_pos..self.read_pos + to_read]);
        self.read_pos += to_read;
        Ok(to_read)
    }
}

impl Write for MockConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.writes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for MockConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Connection for MockConnection {}

/// Connection whose writes always fail
#[derive(Debug)]
pub struct BrokenConnection;

impl Read for BrokenConnection {
    type Error = Error;

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
        Err(Error::ReadError)
    }
}

impl Write for BrokenConnection {
    type Error = Error;

    fn write(&mut self, _buf: &[u8]) -> Result<usize, Self::Error> {
        Err(Error::WriteError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Err(Error::WriteError)
    }
}

impl Close for BrokenConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Connection for BrokenConnection {}
