//! Web sensor: HTTP Get/Post performed by the shield on behalf of the host.
//!
//! The host never talks HTTP itself. It sends a small command naming the URL,
//! optional post data, a cap on the result size and optional parsing
//! instructions; the shield fetches the page, applies the instructions and
//! answers with one string whose fields are separated by `|`.
//!
//! ```rust,no_run
//! use virtualshield::sensor::Web;
//! use virtualshield::shield::Shield;
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
//! let mut web = Web::new(Shield::new(MockConnection));
//! // web.get("http://example.com/weather", "//temp|//wind", 64)?;
//!
//! let mut buffer = [0u8; 64];
//! let mut parts: [&[u8]; 2] = [&[], &[]];
//! web.get_response(&mut buffer, 64, Some(&mut parts));
//! ```

use super::split::{bounded_copy, split_in_place};
use super::{EventHandler, Sensor};
use crate::network::error::Error;
use crate::protocol::{
    MessageId, PART_DELIMITER, SERVICE_WEB, ShieldEvent, TaggedEntry, get_entries, post_entries,
};
use crate::shield::Transport;
use heapless::String;
use serde_json_core::str::EscapedStringFragment;

/// Capacity of the stored response.
pub const MAX_RESPONSE_LEN: usize = 256;

/// Sensor type character of the web sensor.
pub const SENSOR_TYPE: char = 'W';

/// Single-slot storage for the latest response.
#[derive(Debug, Clone, Default)]
struct ResponseSlot {
    response: String<MAX_RESPONSE_LEN>,
    result_id: i32,
}

impl ResponseSlot {
    /// Records the unescaped result of `event`.
    fn capture(&mut self, event: &ShieldEvent<'_>) {
        self.response.clear();
        self.result_id = event.result_id;
        let Some(result) = event.result else {
            return;
        };

        for fragment in result.fragments() {
            let complete = match fragment {
                Ok(EscapedStringFragment::NotEscaped(text)) => self.push_truncated(text),
                Ok(EscapedStringFragment::Escaped(c)) => self.response.push(c).is_ok(),
                Err(_) => {
                    warn!("invalid escape in web response after {} bytes", self.response.len());
                    return;
                }
            };
            if !complete {
                warn!("web response truncated to {} bytes", self.response.len());
                return;
            }
        }
    }

    /// Appends as much of `text` as fits, cut on a char boundary.
    fn push_truncated(&mut self, text: &str) -> bool {
        let mut end = text.len().min(MAX_RESPONSE_LEN - self.response.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        // Cannot fail, `end` is within the remaining capacity.
        let _ = self.response.push_str(&text[..end]);
        end == text.len()
    }
}

/// Returns `true` for events addressed to the web sensor: tagged `WEB`, or
/// untagged answers to a command.
fn is_for_web(event: &ShieldEvent<'_>) -> bool {
    event.is_from(SERVICE_WEB) || (event.service.is_none() && event.id != 0)
}

/// Web sensor driver.
///
/// Holds exactly one response: every event addressed to the sensor replaces
/// the previous one, so [`Web::get_response`] must be called before the next
/// request if the old response is still needed.
#[derive(Debug)]
pub struct Web<T: Transport> {
    transport: T,
    sensor: Sensor,
    slot: ResponseSlot,
}

impl<T: Transport> Web<T> {
    /// Creates a web sensor on top of `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            sensor: Sensor::new(SENSOR_TYPE),
            slot: ResponseSlot::default(),
        }
    }

    /// Performs a web Get.
    ///
    /// `parsing_instructions` is left off the wire when empty; `max_length`
    /// caps the size of the result. Blocks until the shield answers unless an
    /// event handler is registered.
    pub fn get(
        &mut self,
        url: &str,
        parsing_instructions: &str,
        max_length: u32,
    ) -> Result<MessageId, Error> {
        let entries = get_entries(url, parsing_instructions, max_length);
        self.request(&entries)
    }

    /// Performs a web Post.
    ///
    /// Like [`Web::get`] with `data` as the request body. `data` is always
    /// sent, even when empty.
    pub fn post(
        &mut self,
        url: &str,
        data: &str,
        parsing_instructions: &str,
        max_length: u32,
    ) -> Result<MessageId, Error> {
        let entries = post_entries(url, data, parsing_instructions, max_length);
        self.request(&entries)
    }

    fn request(&mut self, entries: &[TaggedEntry<'_>]) -> Result<MessageId, Error> {
        let id = self.transport.write_all(SERVICE_WEB, entries)?;
        debug!("web request {} sent", id);
        if self.sensor.has_handler() {
            return Ok(id);
        }
        self.block(id)
    }

    /// Dispatches incoming events until the one answering `id` arrives.
    fn block(&mut self, id: MessageId) -> Result<MessageId, Error> {
        loop {
            let event = match self.transport.receive() {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(Error::ProtocolError) => continue,
                Err(e) => {
                    warn!("web request {} failed: {:?}", id, e);
                    return Err(e);
                }
            };

            if !is_for_web(&event) {
                trace!("ignoring event {} while waiting for {}", event.id, id);
                continue;
            }

            self.slot.capture(&event);
            self.sensor.on_json_received(&event);

            if event.id == id {
                return match event.error {
                    Some(code) => Err(Error::Remote(code)),
                    None => Ok(id),
                };
            }
        }
    }

    /// Delivers at most one pending event.
    ///
    /// Used in callback mode to drive the registered handler. Events are
    /// routed as in the blocking wait. Returns `true` if an event for this
    /// sensor was processed.
    pub fn poll(&mut self) -> Result<bool, Error> {
        let Some(event) = self.transport.receive()? else {
            return Ok(false);
        };
        if !is_for_web(&event) {
            trace!("ignoring event {}", event.id);
            return Ok(false);
        }
        self.slot.capture(&event);
        self.sensor.on_json_received(&event);
        Ok(true)
    }

    /// Records the result of `event` and runs the generic sensor processing.
    pub fn on_json_received(&mut self, event: &ShieldEvent<'_>) {
        self.slot.capture(event);
        self.sensor.on_json_received(event);
    }

    /// Copies the current response into `buffer` and optionally splits it.
    ///
    /// At most `length` bytes are copied (never more than `buffer.len()`);
    /// a longer response is truncated without a terminator. When `parts` is
    /// given and non-empty the copied text is split on `|` in place, see
    /// [`split_in_place`]. The number of parts found is not reported and
    /// unused slots of `parts` are left as they were.
    pub fn get_response<'b>(
        &self,
        buffer: &'b mut [u8],
        length: usize,
        parts: Option<&mut [&'b [u8]]>,
    ) {
        let length = length.min(buffer.len());
        bounded_copy(&mut buffer[..length], self.slot.response.as_bytes());
        if let Some(parts) = parts {
            split_in_place(buffer, length, parts);
        }
    }

    /// The current response, valid until the next event.
    pub fn response(&self) -> &str {
        &self.slot.response
    }

    /// Iterates over the `|`-separated parts of the current response.
    pub fn parts(&self) -> core::str::Split<'_, char> {
        self.slot.response.split(char::from(PART_DELIMITER))
    }

    /// Opaque id of the current result on the shield side.
    pub fn result_id(&self) -> i32 {
        self.slot.result_id
    }

    /// Registers or clears the callback; see the module docs of [`crate::sensor`].
    pub fn set_on_event(&mut self, handler: Option<EventHandler>) {
        self.sensor.set_on_event(handler);
    }

    /// Generic sensor state.
    pub fn sensor(&self) -> &Sensor {
        &self.sensor
    }

    /// Mutable generic sensor state.
    pub fn sensor_mut(&mut self) -> &mut Sensor {
        &mut self.sensor
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable reference to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
