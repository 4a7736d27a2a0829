//! Flat-family (PSR-2000) name codec
//!
//! The name lives in a `GP00` sub-block inside the registration payload.
//! The block always occupies a fixed 80 bytes; the name is NUL-padded to
//! fill the remaining space. Any other block size may crash the
//! instrument.

use super::{find, latin1_to_string, string_to_latin1};
use crate::{RegBankError, Result};

/// Marker preceding the name block.
///
/// The block itself starts with "GP00", but scanning for "\xFFGP00" is
/// safer since "GP00" could occur inside a name, and every name block is
/// preceded by 0xFF filler bytes.
const NAME_MARKER: &[u8] = b"\xffGP00";

/// Fixed header of a freshly written name block: magic, block length
/// (0x50 = 80, big-endian) and two reserved bytes
const BLOCK_HEAD: &[u8] = b"GP00\x00\x50\x00\x00";

/// Total size of a written name block
const BLOCK_LEN: usize = 80;

/// Maximum name length: 46 characters plus a 5-character icon suffix
pub const MAX_NAME_CHARS: usize = 51;

/// Extract the display name, or an empty string if no block is present
pub fn name(data: &[u8]) -> String {
    let Some(marker) = find(data, NAME_MARKER) else {
        return String::new();
    };
    let pos = marker + 1;

    if pos + 8 > data.len() {
        return String::new();
    }

    // Block length includes the 8-byte block header
    let block_len = u16::from_be_bytes([data[pos + 4], data[pos + 5]]) as usize;
    if block_len <= 8 {
        return String::new();
    }

    let start = pos + 8;
    let end = (start + block_len - 8).min(data.len());
    let name = latin1_to_string(&data[start..end]);

    // Name is NUL-terminated within the padded block
    match name.find('\0') {
        Some(tail) => name[..tail].to_string(),
        None => name,
    }
}

/// Replace the name block with a freshly padded 80-byte block.
///
/// A payload without a name block is left untouched. The payload is not
/// modified when the name exceeds [`MAX_NAME_CHARS`].
pub fn set_name(data: &mut Vec<u8>, name: &str) -> Result<()> {
    let Some(marker) = find(data, NAME_MARKER) else {
        return Ok(());
    };
    let pos = marker + 1;

    if pos + 8 > data.len() {
        return Err(RegBankError::Malformed(
            "flat name block header truncated".into(),
        ));
    }

    let prev_block_len = u16::from_be_bytes([data[pos + 4], data[pos + 5]]) as usize;
    if pos + prev_block_len > data.len() {
        return Err(RegBankError::Malformed(
            "flat name block extends beyond payload".into(),
        ));
    }

    if name.chars().count() > MAX_NAME_CHARS {
        return Err(RegBankError::NameTooLong {
            name: name.to_string(),
            max_chars: MAX_NAME_CHARS,
        });
    }

    let encoded = string_to_latin1(name);
    let mut block = Vec::with_capacity(BLOCK_LEN);
    block.extend_from_slice(BLOCK_HEAD);
    block.extend_from_slice(&encoded);
    block.resize(BLOCK_LEN, 0);

    data.splice(pos..pos + prev_block_len, block);
    Ok(())
}
