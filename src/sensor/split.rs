//! In-place splitting of pipe-delimited responses.
//!
//! The shield answers web requests with a single string whose fields are
//! separated by `|`. [`split_in_place`] turns that string, once copied into a
//! caller buffer, into a list of parts without allocating: every delimiter it
//! consumes is overwritten with a NUL byte and each part is a slice of the
//! buffer.
//!
//! # Caller hazards
//!
//! - The number of parts found is not reported. When the response has fewer
//!   delimiters than the part list has slots, the trailing slots keep whatever
//!   the caller stored in them. Initialise the list with a sentinel (for
//!   example empty slices) if the count matters.
//! - The first byte of the buffer is never treated as a delimiter.
//! - Once the list is full, scanning stops and the last part runs up to the
//!   end of the copied text, unconsumed `|` bytes included.

use crate::protocol::PART_DELIMITER;

/// Copies `src` into `dst` the way a bounded C string copy does.
///
/// Copying stops at the end of `dst` or at a NUL byte in `src`, whichever
/// comes first, and the rest of `dst` is zero-filled. When `src` fills `dst`
/// completely no terminator is written.
pub fn bounded_copy(dst: &mut [u8], src: &[u8]) {
    let src_len = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    let copied = src_len.min(dst.len());
    dst[..copied].copy_from_slice(&src[..copied]);
    dst[copied..].fill(0);
}

/// Splits the first `length` bytes of `buffer` on `|` into `parts`.
///
/// Part 0 always starts at the beginning of the buffer. Scanning starts at
/// index 1 and stops when `parts` is full, `length` is reached or a NUL byte
/// is met. Each delimiter consumed is replaced by a NUL and the next part
/// starts right after it. A part extends to the next NUL byte, or to `length`
/// when there is none.
///
/// Nothing happens when `parts` is empty or `length` is 0. See the module
/// documentation for the hazards of this interface.
pub fn split_in_place<'b>(buffer: &'b mut [u8], length: usize, parts: &mut [&'b [u8]]) {
    let length = length.min(buffer.len());
    if parts.is_empty() || length == 0 {
        return;
    }

    // `rest` always starts at the part being scanned.
    let mut rest = &mut buffer[..length];
    let mut found = 0;
    let mut index = 1;
    while found + 1 < parts.len() && index < rest.len() && rest[index] != 0 {
        if rest[index] != PART_DELIMITER {
            index += 1;
            continue;
        }
        rest[index] = 0;
        let (part, tail) = core::mem::take(&mut rest).split_at_mut(index + 1);
        parts[found] = until_nul(part);
        found += 1;
        rest = tail;
        index = 0;
    }
    parts[found] = until_nul(rest);
}

fn until_nul(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}
