//! Messages coming back from the shield.

use super::MessageId;
use serde::Deserialize;
use serde_json_core::str::EscapedStr;

/// A parsed message from the shield.
///
/// String fields borrow from the receive buffer of the transport. `result`
/// keeps its JSON escapes; walk [`EscapedStr::fragments`] to decode it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ShieldEvent<'a> {
    /// Service that produced the event.
    #[serde(rename = "Service", borrow, default)]
    pub service: Option<&'a str>,
    /// Id of the command this event answers, 0 when unsolicited.
    #[serde(rename = "Id", default)]
    pub id: MessageId,
    /// Result payload, e.g. a pipe-delimited web response.
    #[serde(rename = "Result", borrow, default)]
    pub result: Option<EscapedStr<'a>>,
    /// Opaque identifier of the result on the shield side.
    #[serde(rename = "ResultId", default)]
    pub result_id: i32,
    /// Error code reported by the shield.
    #[serde(rename = "Error", default)]
    pub error: Option<i32>,
}

impl<'a> ShieldEvent<'a> {
    /// Parses one JSON message.
    pub fn parse(message: &'a [u8]) -> Result<Self, serde_json_core::de::Error> {
        serde_json_core::from_slice::<ShieldEvent<'a>>(message).map(|(event, _)| event)
    }

    /// Returns `true` if the event was produced by `service`.
    pub fn is_from(&self, service: &str) -> bool {
        self.service == Some(service)
    }
}

/// Locates the first complete JSON object in `buf`.
///
/// Returns the `start..end` byte range of the object, braces included. Braces
/// inside string literals are ignored, as are stray closing braces before the
/// first opening one.
pub fn frame(buf: &[u8]) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &byte) in buf.iter().enumerate() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match byte {
            b'\\' if in_string => escape_next = true,
            b'"' if start.is_some() => in_string = !in_string,
            b'{' if !in_string => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            b'}' if !in_string && depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return start.map(|s| (s, i + 1));
                }
            }
            _ => {}
        }
    }

    None
}
