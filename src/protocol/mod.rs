//! Shield command wire format.
//!
//! Commands travel to the coprocessor as a single flat JSON object whose keys
//! appear in a fixed order:
//!
//! ```text
//! {"Service":"WEB","Id":7,"Action":"Post","Url":"http://x","Data":"a=1","Len":64}
//! ```
//!
//! The object is built from an ordered list of [`TaggedEntry`] values. An entry
//! whose value is [`Value::None`] is left out of the object entirely, which is
//! how optional fields are kept off the serial link.

#![deny(unsafe_code)]

use serde::ser::{Serialize, SerializeMap, Serializer};

pub mod event;

pub use event::ShieldEvent;

/// Key of the service discriminator.
pub const SERVICE: &str = "Service";
/// Key of the message id.
pub const ID: &str = "Id";

/// Service tag of the web sensor.
pub const SERVICE_WEB: &str = "WEB";
/// Action value of a web Get.
pub const GET: &str = "Get";
/// Action value of a web Post.
pub const POST: &str = "Post";

/// Delimiter between parts of a web response.
pub const PART_DELIMITER: u8 = b'|';

/// Identifier correlating a command with its response event.
///
/// Ids handed out by the transport are never 0; an event with id 0 was not
/// requested by the host.
pub type MessageId = u16;

/// Field tags known to the shield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// The action to perform, e.g. "Get".
    Action,
    /// Target URL.
    Url,
    /// Request body of a Post.
    Data,
    /// Maximum length of the returned result.
    Len,
    /// Parsing instructions applied by the shield before answering.
    Parse,
}

impl Tag {
    /// Wire key of this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Action => "Action",
            Tag::Url => "Url",
            Tag::Data => "Data",
            Tag::Len => "Len",
            Tag::Parse => "Parse",
        }
    }
}

/// Value carried by a [`TaggedEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    /// A string, JSON-escaped on the wire.
    Str(&'a str),
    /// An integer.
    Int(i64),
    /// No value: the entry is not emitted.
    None,
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::Str(value)
    }
}

impl From<u32> for Value<'_> {
    fn from(value: u32) -> Self {
        Value::Int(value.into())
    }
}

impl From<i32> for Value<'_> {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

/// A single (tag, value) unit of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedEntry<'a> {
    /// Field tag.
    pub tag: Tag,
    /// Field value.
    pub value: Value<'a>,
}

impl<'a> TaggedEntry<'a> {
    /// Creates an entry that is always emitted.
    pub fn new(tag: Tag, value: impl Into<Value<'a>>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    /// Creates an entry that is only emitted when `value` is non-empty.
    pub fn optional(tag: Tag, value: &'a str) -> Self {
        let value = if value.is_empty() {
            Value::None
        } else {
            Value::Str(value)
        };
        Self { tag, value }
    }

    /// Returns `true` if this entry will appear on the wire.
    pub fn is_emitted(&self) -> bool {
        self.value != Value::None
    }
}

/// A complete command as handed to the serial link.
///
/// Records are built per request, serialized right away and dropped.
#[derive(Debug, Clone, Copy)]
pub struct CommandRecord<'a> {
    /// Service the command targets.
    pub service: &'a str,
    /// Message id assigned by the transport.
    pub id: MessageId,
    /// Ordered fields; the first one is the action.
    pub entries: &'a [TaggedEntry<'a>],
}

impl CommandRecord<'_> {
    /// Serializes the record as JSON into `buf`, returning the used length.
    pub fn to_slice(&self, buf: &mut [u8]) -> Result<usize, serde_json_core::ser::Error> {
        serde_json_core::to_slice(self, buf)
    }
}

impl Serialize for CommandRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(SERVICE, self.service)?;
        map.serialize_entry(ID, &self.id)?;
        for entry in self.entries {
            match entry.value {
                Value::Str(value) => map.serialize_entry(entry.tag.as_str(), value)?,
                Value::Int(value) => map.serialize_entry(entry.tag.as_str(), &value)?,
                Value::None => {}
            }
        }
        map.end()
    }
}

/// Builds the entries of a web Get.
///
/// Order: action, url, length, parsing instructions. The parsing instructions
/// are dropped when empty.
pub fn get_entries<'a>(
    url: &'a str,
    parsing_instructions: &'a str,
    max_length: u32,
) -> [TaggedEntry<'a>; 4] {
    [
        TaggedEntry::new(Tag::Action, GET),
        TaggedEntry::new(Tag::Url, url),
        TaggedEntry::new(Tag::Len, max_length),
        TaggedEntry::optional(Tag::Parse, parsing_instructions),
    ]
}

/// Builds the entries of a web Post.
///
/// Same as [`get_entries`] with the data inserted after the url. The data is
/// always emitted, even when empty.
pub fn post_entries<'a>(
    url: &'a str,
    data: &'a str,
    parsing_instructions: &'a str,
    max_length: u32,
) -> [TaggedEntry<'a>; 5] {
    [
        TaggedEntry::new(Tag::Action, POST),
        TaggedEntry::new(Tag::Url, url),
        TaggedEntry::new(Tag::Data, data),
        TaggedEntry::new(Tag::Len, max_length),
        TaggedEntry::optional(Tag::Parse, parsing_instructions),
    ]
}
