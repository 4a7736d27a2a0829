//! Single-registration container codec
//!
//! A small interchange format for moving one registration between banks:
//! a 4-byte magic, a fixed 16-byte NUL-padded ASCII model-name field and
//! the registration's raw payload bytes up to end of file (no length
//! prefix).

use crate::models::KeyboardModel;
use crate::registration::Registration;
use crate::{RegBankError, Result};

/// Container magic
pub const MAGIC: &[u8; 4] = b"RS01";

/// Size of the fixed model-name field
const MODEL_FIELD_LEN: usize = 16;

/// Offset of the payload behind magic and model-name field
const PAYLOAD_OFFSET: usize = MAGIC.len() + MODEL_FIELD_LEN;

/// Codec for single-registration container files
pub struct RegFileFormat;

impl RegFileFormat {
    /// Whether the leading bytes carry the container magic
    pub fn recognizes(&self, header: &[u8]) -> bool {
        header.len() >= MAGIC.len() && &header[..MAGIC.len()] == MAGIC
    }

    /// Decode a container into its model and registration
    pub fn decode(&self, data: &[u8]) -> Result<(KeyboardModel, Registration)> {
        if !self.recognizes(data) {
            return Err(RegBankError::UnknownFileFormat);
        }
        if data.len() < PAYLOAD_OFFSET {
            return Err(RegBankError::Malformed(
                "registration file shorter than its header".into(),
            ));
        }

        let field = &data[MAGIC.len()..PAYLOAD_OFFSET];
        let name_len = field.iter().position(|&b| b == 0).unwrap_or(field.len());
        let wire_name = std::str::from_utf8(&field[..name_len])
            .map_err(|_| RegBankError::Malformed("model name field is not ASCII".into()))?;

        let model = KeyboardModel::from_wire_name(wire_name)
            .ok_or_else(|| RegBankError::UnknownKeyboardModel(wire_name.to_string()))?;

        let payload = data[PAYLOAD_OFFSET..].to_vec();
        Ok((model, Registration::from_bytes(model, payload)))
    }

    /// Serialize a registration into container bytes
    pub fn encode(&self, model: KeyboardModel, registration: &Registration) -> Vec<u8> {
        let mut out = Vec::with_capacity(PAYLOAD_OFFSET + registration.bytes().len());
        out.extend_from_slice(MAGIC);

        // Model name truncated or NUL-padded to exactly 16 bytes
        let mut field = model.wire_name().as_bytes().to_vec();
        field.resize(MODEL_FIELD_LEN, 0);
        out.extend_from_slice(&field);

        out.extend_from_slice(registration.bytes());
        out
    }
}
