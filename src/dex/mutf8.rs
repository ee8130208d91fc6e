//! Modified-UTF-8 string data decoding.
//!
//! DEX string data stores a uleb128 UTF-16 code-unit count followed by the
//! string bytes in modified UTF-8 (Java CESU-8, with NUL encoded as
//! `0xc0 0x80`). The byte count is not stored anywhere; it has to be
//! inferred by walking the encoded units until the UTF-16 count is
//! satisfied.

use cesu8::from_java_cesu8;

use crate::dex::error::DexError;

/// Decodes `utf16_len` UTF-16 code units of modified UTF-8 starting at
/// `start`. Every 1-, 2- or 3-byte unit encodes exactly one UTF-16 code
/// unit; supplementary-plane characters occupy two surrogate units, which
/// cesu8 pairs back into a single char.
pub(crate) fn decode(bytes: &[u8], start: usize, utf16_len: u32) -> Result<String, DexError> {
    let mut end = start;
    for _ in 0..utf16_len {
        let lead = *bytes
            .get(end)
            .ok_or(DexError::MalformedStringData { offset: start })?;
        // A bare NUL, a continuation byte or a 4-byte lead is never a valid
        // unit start in modified UTF-8.
        let unit_len = match lead {
            0x01..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            _ => return Err(DexError::MalformedStringData { offset: start }),
        };
        end += unit_len;
    }

    if end > bytes.len() {
        return Err(DexError::MalformedStringData { offset: start });
    }

    match from_java_cesu8(&bytes[start..end]) {
        Ok(decoded) => Ok(decoded.into_owned()),
        Err(_) => Err(DexError::MalformedStringData { offset: start }),
    }
}
