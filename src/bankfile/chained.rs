//! Chained-family bank codec (Tyros descendants)
//!
//! Sequential self-describing block layout, shared by the Tyros 1/2,
//! PSR-S900/S700 and PSR-3000 with per-model magic headers:
//!
//! | Position | Length | Description                                  |
//! |----------|--------|----------------------------------------------|
//! | 0        | 16     | File header (per-model magic)                |
//! | 16       | 4      | Total file size in bytes (big-endian)        |
//! | 20       | 44     | Special padding (copied verbatim per model)  |
//! | 64       | ..     | Registration blocks of variable length       |
//! | -6       | 6      | File footer                                  |
//!
//! Each block starts with `BHd\x00` and a big-endian u16 payload length.
//! A zero length marks an empty slot; otherwise exactly that many bytes
//! of registration data follow. The paddings have no documented meaning
//! beyond being required by the instruments; they are opaque constants.

use super::{Bank, BankFormat};
use crate::models::KeyboardModel;
use crate::registration::Registration;
use crate::{RegBankError, Result};

/// Magic header and special padding per sub-variant
const VARIANTS: [(KeyboardModel, &[u8; 16], &[u8; 44]); 5] = [
    (
        KeyboardModel::Tyros1,
        b"SpfF\x00\x10\x0A\xD9RGST\x00\x00\x00\x07",
        b"\x15\x5C\x42\x48\x64\x01\x00\x24\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF",
    ),
    (
        KeyboardModel::Tyros2,
        b"SpfF\x00\x10\x0B\x75RGST\x00\x02\x00\x00",
        b"\x00\x82\x42\x48\x64\x01\x00\x24\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF",
    ),
    (
        KeyboardModel::S900,
        b"SpfF\x00\x10\x0B\xC6RGST\x00\x02\x00\x00",
        b"\x00\x78\x42\x48\x64\x01\x00\x24\x00\x01\
\xFF\x04\x05\x06\x07\xFF\x00\x00\
\x00\x00\x00\x00\x00\x00\x00\x00\
\x00\x00\x00\x00\x00\x00\x00\x00\
\x00\x00\x00\x00\x00\x00\x00\x00\
\x00\x00",
    ),
    (
        KeyboardModel::S700,
        b"SpfF\x00\x10\x0B\xC7RGST\x00\x02\x00\x00",
        b"\x00\x66\x42\x48\x64\x01\x00\x24\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF",
    ),
    (
        KeyboardModel::Psr3000,
        b"SpfF\x00\x10\x0B\x20RGST\x00\x01\x00\x02",
        b"\x00\x00\x42\x48\x64\x01\x00\x24\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF",
    ),
];

/// File footer appended after the last block
const FILE_FOOTER: &[u8; 6] = b"FEnd\x00\x00";

/// Magic of a registration block boundary
const BLOCK_MAGIC: &[u8; 4] = b"BHd\x00";

/// Block written for an empty slot: magic plus zero length
const EMPTY_BLOCK: &[u8; 6] = b"BHd\x00\x00\x00";

/// Start of the registration data region
const DATA_OFFSET: usize = 64;

/// Codec for Tyros-family bank files
#[derive(Debug)]
pub struct ChainedFormat;

impl ChainedFormat {
    fn variant(model: KeyboardModel) -> Option<(&'static [u8; 16], &'static [u8; 44])> {
        VARIANTS
            .iter()
            .find(|(m, _, _)| *m == model)
            .map(|(_, header, padding)| (*header, *padding))
    }
}

impl BankFormat for ChainedFormat {
    fn name(&self) -> &'static str {
        "Tyros-family bank"
    }

    fn recognizes(&self, header: &[u8]) -> bool {
        self.model_from_header(header).is_some()
    }

    fn supports(&self, model: KeyboardModel) -> bool {
        Self::variant(model).is_some()
    }

    fn model_from_header(&self, header: &[u8]) -> Option<KeyboardModel> {
        VARIANTS
            .iter()
            .find(|(_, magic, _)| header.len() >= magic.len() && &header[..magic.len()] == *magic)
            .map(|(model, _, _)| *model)
    }

    fn decode(&self, data: &[u8]) -> Result<Bank> {
        let Some(model) = self.model_from_header(data) else {
            return Err(RegBankError::UnknownFileFormat);
        };
        if data.len() < DATA_OFFSET {
            return Err(RegBankError::Malformed(
                "file shorter than the fixed bank header".into(),
            ));
        }

        let max = model.max_slots();
        let mut slots: Vec<Option<Registration>> = Vec::with_capacity(max);
        let mut pos = DATA_OFFSET;

        // Blocks follow each other until the marker no longer matches
        // (normally the file footer)
        while pos + BLOCK_MAGIC.len() <= data.len()
            && &data[pos..pos + BLOCK_MAGIC.len()] == BLOCK_MAGIC
        {
            if pos + 6 > data.len() {
                return Err(RegBankError::Malformed(
                    "registration block header truncated".into(),
                ));
            }

            let length = u16::from_be_bytes([data[pos + 4], data[pos + 5]]) as usize;

            if length == 0 {
                slots.push(None);
                pos += EMPTY_BLOCK.len();
            } else {
                let end = pos + 6 + length;
                if end > data.len() {
                    return Err(RegBankError::Malformed(format!(
                        "registration block {} extends beyond end of file",
                        slots.len()
                    )));
                }
                slots.push(Some(Registration::from_bytes(
                    model,
                    data[pos..end].to_vec(),
                )));
                pos = end;
            }

            if slots.len() > max {
                return Err(RegBankError::Malformed(format!(
                    "more than {} registration blocks",
                    max
                )));
            }
        }

        Ok(Bank::from_slots(model, slots))
    }

    fn encode(&self, bank: &Bank) -> Result<Vec<u8>> {
        let Some((header, padding)) = Self::variant(bank.model()) else {
            return Err(RegBankError::UnknownKeyboardModel(
                bank.model().wire_name().to_string(),
            ));
        };

        let mut data_block = Vec::new();
        for slot in bank.slots() {
            match slot {
                None => data_block.extend_from_slice(EMPTY_BLOCK),
                Some(reg) => data_block.extend_from_slice(reg.bytes()),
            }
        }

        let total =
            (header.len() + 4 + padding.len() + data_block.len() + FILE_FOOTER.len()) as u32;

        let mut out = Vec::with_capacity(total as usize);
        out.extend_from_slice(header);
        out.extend_from_slice(&total.to_be_bytes());
        out.extend_from_slice(padding);
        out.extend_from_slice(&data_block);
        out.extend_from_slice(FILE_FOOTER);
        Ok(out)
    }
}
