//! Registration payload handling
//!
//! A registration is one saved instrument setting, kept as an opaque
//! binary blob in the owning model's native encoding. The only part of
//! the blob this crate interprets is the embedded name sub-block, whose
//! layout differs per codec family:
//! - Flat family (PSR-2000): fixed 80-byte `GP00` block, NUL-padded
//! - Chained family (Tyros descendants): length-prefixed `GPm\x01` block

mod chained;
mod flat;

use crate::models::{Family, KeyboardModel};
use crate::Result;

/// One instrument registration with its opaque binary payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    model: KeyboardModel,
    data: Vec<u8>,
}

impl Registration {
    /// Create an empty registration for a model
    pub fn new(model: KeyboardModel) -> Self {
        Registration {
            model,
            data: Vec::new(),
        }
    }

    /// Wrap raw payload bytes taken from a bank or registration file
    pub fn from_bytes(model: KeyboardModel, data: Vec<u8>) -> Self {
        Registration { model, data }
    }

    /// The keyboard model whose layout this payload uses
    pub fn model(&self) -> KeyboardModel {
        self.model
    }

    /// Raw payload bytes as stored on disk
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the registration and return its payload bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Display name as it appears on the keyboard screen.
    ///
    /// Returns an empty string if the payload carries no name block.
    pub fn name(&self) -> String {
        match self.model.family() {
            Family::Flat => flat::name(&self.data),
            Family::Chained => chained::name(&self.data),
        }
    }

    /// Rewrite the embedded name block.
    ///
    /// Fails with [`NameTooLong`](crate::RegBankError::NameTooLong) if the
    /// name exceeds the format's capacity; the payload is left untouched
    /// on failure. A payload without a name block is left as-is.
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        match self.model.family() {
            Family::Flat => flat::set_name(&mut self.data, name),
            Family::Chained => chained::set_name(&mut self.data, name),
        }
    }
}

/// Strip the decoration Yamaha keyboards append to object names.
///
/// Removes a trailing file extension (if `file_ext` is non-empty) and a
/// trailing 5-character icon descriptor, both case-insensitively. A
/// typical input is `"xyz.S136.reg"`, which strips to `"xyz"`.
pub fn strip_yamaha_name(name: &str, file_ext: &str) -> String {
    let mut name: Vec<char> = name.chars().collect();

    // Strip extension
    if !file_ext.is_empty() {
        let ext: Vec<char> = format!(".{}", file_ext).chars().collect();
        if name.len() >= ext.len() {
            let tail = &name[name.len() - ext.len()..];
            let matches = tail
                .iter()
                .zip(ext.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b));
            if matches {
                name.truncate(name.len() - ext.len());
            }
        }
    }

    // Strip icon descriptor (".Sxx" + 2 digits)
    if name.len() >= 5 && name[name.len() - 5] == '.' && name[name.len() - 4].eq_ignore_ascii_case(&'S') {
        name.truncate(name.len() - 5);
    }

    name.into_iter().collect()
}

/// Locate a byte pattern within a payload
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Decode a single-byte (Latin-1) character run
pub(crate) fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Encode to Latin-1, substituting `?` for characters outside the charset
pub(crate) fn string_to_latin1(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_extension_and_icon() {
        assert_eq!(strip_yamaha_name("xyz.S136.reg", "reg"), "xyz");
        assert_eq!(strip_yamaha_name("Ballad.S910.RGT", "rgt"), "Ballad");
    }

    #[test]
    fn test_strip_plain_name_untouched() {
        assert_eq!(strip_yamaha_name("My Sound", "reg"), "My Sound");
        assert_eq!(strip_yamaha_name("My Sound", ""), "My Sound");
    }

    #[test]
    fn test_strip_icon_only() {
        assert_eq!(strip_yamaha_name("Organ.S033", ""), "Organ");
    }

    #[test]
    fn test_empty_payload_has_no_name() {
        let reg = Registration::new(KeyboardModel::Psr2000);
        assert_eq!(reg.name(), "");

        let mut reg = Registration::new(KeyboardModel::Tyros1);
        reg.set_name("ignored").unwrap();
        assert!(reg.bytes().is_empty());
    }

    #[test]
    fn test_latin1_lossy_substitution() {
        assert_eq!(string_to_latin1("Caf\u{e9}"), b"Caf\xe9".to_vec());
        assert_eq!(string_to_latin1("\u{2603}"), b"?".to_vec());
        assert_eq!(latin1_to_string(b"Caf\xe9"), "Caf\u{e9}");
    }
}
