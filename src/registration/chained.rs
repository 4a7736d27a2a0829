//! Chained-family (Tyros descendants) name codec
//!
//! Unlike the flat family the name block is not NUL-terminated. A
//! `GPm\x01` marker is followed by a big-endian u16 giving the exact
//! name length, then that many bytes of name data. Renaming changes the
//! block size and shifts everything behind it, so the payload's own
//! length field must be recomputed afterwards.

use super::{find, latin1_to_string, string_to_latin1};
use crate::{RegBankError, Result};

/// Marker of the name block
const NAME_MARKER: &[u8] = b"GPm\x01";

/// Magic of a registration payload block
const BLOCK_MAGIC: &[u8] = b"BHd\x00";

/// Bytes of the payload header (magic + length field) excluded from the
/// payload's own length count
const HEADER_LEN: usize = 6;

/// Extract the display name, or an empty string if no block is present
pub fn name(data: &[u8]) -> String {
    let Some(pos) = find(data, NAME_MARKER) else {
        return String::new();
    };

    if pos + HEADER_LEN > data.len() {
        return String::new();
    }

    let length = u16::from_be_bytes([data[pos + 4], data[pos + 5]]) as usize;
    let start = pos + HEADER_LEN;
    let end = (start + length).min(data.len());

    latin1_to_string(&data[start..end])
}

/// Replace the name block and refresh the payload's length field.
///
/// A payload without a name block is left untouched.
pub fn set_name(data: &mut Vec<u8>, name: &str) -> Result<()> {
    let Some(pos) = find(data, NAME_MARKER) else {
        return Ok(());
    };

    if pos + HEADER_LEN > data.len() {
        return Err(RegBankError::Malformed(
            "chained name block header truncated".into(),
        ));
    }

    let old_length = u16::from_be_bytes([data[pos + 4], data[pos + 5]]) as usize;
    if pos + HEADER_LEN + old_length > data.len() {
        return Err(RegBankError::Malformed(
            "chained name block extends beyond payload".into(),
        ));
    }

    let encoded = string_to_latin1(name);

    // The outer length field is a u16 counting everything after the
    // 6-byte header. Reject names that would push the payload past that
    // before touching the buffer.
    let name_capacity = (u16::MAX as usize + HEADER_LEN).saturating_sub(data.len() - old_length);
    if encoded.len() > name_capacity {
        return Err(RegBankError::NameTooLong {
            name: name.to_string(),
            max_chars: name_capacity,
        });
    }
    let length = encoded.len() as u16;

    let mut block = Vec::with_capacity(HEADER_LEN + encoded.len());
    block.extend_from_slice(NAME_MARKER);
    block.extend_from_slice(&length.to_be_bytes());
    block.extend_from_slice(&encoded);

    data.splice(pos..pos + HEADER_LEN + old_length, block);
    update_length_bytes(data);
    Ok(())
}

/// Rewrite the payload's leading `BHd\x00` header with a recomputed
/// big-endian length field (length counts everything after the 6-byte
/// header). Must run after every size-changing edit.
fn update_length_bytes(data: &mut [u8]) {
    if data.len() < HEADER_LEN {
        return;
    }

    let length = (data.len() - HEADER_LEN) as u16;
    data[..4].copy_from_slice(BLOCK_MAGIC);
    data[4..6].copy_from_slice(&length.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Complete payload block: BHd\x00 header, name block, trailing data
    fn payload_with_name(name: &str) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(NAME_MARKER);
        body.extend_from_slice(&(name.len() as u16).to_be_bytes());
        body.extend_from_slice(name.as_bytes());
        body.extend_from_slice(b"settings-data");

        let mut data = Vec::new();
        data.extend_from_slice(BLOCK_MAGIC);
        data.extend_from_slice(&(body.len() as u16).to_be_bytes());
        data.extend_from_slice(&body);
        data
    }

    #[test]
    fn test_name_extraction() {
        let data = payload_with_name("Grand Piano");
        assert_eq!(name(&data), "Grand Piano");
    }

    #[test]
    fn test_name_is_exact_length_not_nul_terminated() {
        let data = payload_with_name("AB\0CD");
        assert_eq!(name(&data), "AB\0CD");
    }

    #[test]
    fn test_rename_longer_shifts_tail_and_updates_length() {
        let mut data = payload_with_name("AB");
        let old_len = data.len();

        set_name(&mut data, "Much Longer Name").unwrap();
        assert_eq!(name(&data), "Much Longer Name");
        assert_eq!(data.len(), old_len + "Much Longer Name".len() - 2);
        assert!(data.ends_with(b"settings-data"));

        // Outer length field reflects the new size
        let recorded = u16::from_be_bytes([data[4], data[5]]) as usize;
        assert_eq!(recorded, data.len() - HEADER_LEN);
    }

    #[test]
    fn test_rename_shorter() {
        let mut data = payload_with_name("A Long Initial Name");
        set_name(&mut data, "X").unwrap();

        assert_eq!(name(&data), "X");
        let recorded = u16::from_be_bytes([data[4], data[5]]) as usize;
        assert_eq!(recorded, data.len() - HEADER_LEN);
    }

    #[test]
    fn test_no_marker_is_noop() {
        let mut data = b"BHd\x00\x00\x04asdf".to_vec();
        let before = data.clone();

        assert_eq!(name(&data), "");
        set_name(&mut data, "Anything").unwrap();
        assert_eq!(data, before);
    }

    #[test]
    fn test_rename_overflowing_length_field_rejected() {
        let mut data = payload_with_name("AB");
        let before = data.clone();

        // Payload length minus the 6-byte header must stay within u16
        let capacity = u16::MAX as usize + HEADER_LEN - (data.len() - 2);
        let result = set_name(&mut data, &"N".repeat(capacity + 1));
        assert!(matches!(
            result,
            Err(RegBankError::NameTooLong { max_chars, .. }) if max_chars == capacity
        ));
        assert_eq!(data, before);
    }

    #[test]
    fn test_rename_at_length_field_limit() {
        let mut data = payload_with_name("AB");
        let capacity = u16::MAX as usize + HEADER_LEN - (data.len() - 2);
        let longest = "N".repeat(capacity);

        set_name(&mut data, &longest).unwrap();
        assert_eq!(name(&data), longest);
        let recorded = u16::from_be_bytes([data[4], data[5]]) as usize;
        assert_eq!(recorded, data.len() - HEADER_LEN);
        assert_eq!(recorded, u16::MAX as usize);
    }

    #[test]
    fn test_truncated_name_block_is_malformed() {
        let mut data = b"BHd\x00\x00\x06GPm\x01\x00\xff".to_vec();
        let result = set_name(&mut data, "X");
        assert!(matches!(result, Err(RegBankError::Malformed(_))));
    }
}
