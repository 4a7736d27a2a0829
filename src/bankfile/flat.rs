//! Flat-family bank codec (Yamaha PSR-2000)
//!
//! Fixed-offset table layout:
//!
//! | Position | Length | Description                                  |
//! |----------|--------|----------------------------------------------|
//! | 0        | 28     | File header (magic)                          |
//! | 28       | 4      | Amount of registrations (little-endian)      |
//! | 32       | 32     | Access table: 8 x u32 absolute offsets (BE)  |
//! | 64       | 48     | Special padding (copied verbatim)            |
//! | 112      | ..     | Registration blocks (up to 8)                |
//!
//! A table entry of `0xFFFFFFFF` marks an empty slot; any other value is
//! the absolute byte offset of that slot's registration block. Each block
//! carries its own big-endian u16 length at relative offset 6, counting
//! the whole block.

use super::{Bank, BankFormat};
use crate::models::KeyboardModel;
use crate::registration::Registration;
use crate::{RegBankError, Result};

/// Magic file header
const FILE_HEADER: &[u8; 28] = b"REG-100-100-1000PSR2000x\x00\x08\x00\x40";

/// Special padding between the access table and the data region
const SPECIAL_PADDING: &[u8; 48] = b"\x24\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\
\xFF\xFF\xFF\xFF\xFF\x00\x00\x00\
\x00\x00\x00\x00\x00\x00\x00\x00";

/// Start of the access table
const TABLE_OFFSET: usize = 32;

/// Start of the registration data region
const DATA_OFFSET: usize = 112;

/// Access table entry marking an empty slot
const EMPTY_SENTINEL: u32 = 0xFFFF_FFFF;

/// Relative offset of a block's length field
const BLOCK_LENGTH_OFFSET: usize = 6;

/// Codec for PSR-2000 bank files
#[derive(Debug)]
pub struct FlatFormat;

impl BankFormat for FlatFormat {
    fn name(&self) -> &'static str {
        "PSR-2000 bank"
    }

    fn recognizes(&self, header: &[u8]) -> bool {
        header.len() >= FILE_HEADER.len() && &header[..FILE_HEADER.len()] == FILE_HEADER
    }

    fn supports(&self, model: KeyboardModel) -> bool {
        model == KeyboardModel::Psr2000
    }

    fn model_from_header(&self, header: &[u8]) -> Option<KeyboardModel> {
        self.recognizes(header).then_some(KeyboardModel::Psr2000)
    }

    fn decode(&self, data: &[u8]) -> Result<Bank> {
        if !self.recognizes(data) {
            return Err(RegBankError::UnknownFileFormat);
        }
        if data.len() < DATA_OFFSET {
            return Err(RegBankError::Malformed(
                "file shorter than the fixed bank header".into(),
            ));
        }

        let model = KeyboardModel::Psr2000;
        let mut slots: Vec<Option<Registration>> = vec![None; model.max_slots()];

        for (i, slot) in slots.iter_mut().enumerate() {
            let entry = TABLE_OFFSET + 4 * i;
            let start = u32::from_be_bytes([
                data[entry],
                data[entry + 1],
                data[entry + 2],
                data[entry + 3],
            ]);

            if start == EMPTY_SENTINEL {
                continue;
            }
            let start = start as usize;

            if start + BLOCK_LENGTH_OFFSET + 2 > data.len() {
                return Err(RegBankError::Malformed(format!(
                    "access table entry {} points past end of file",
                    i
                )));
            }

            let length = u16::from_be_bytes([
                data[start + BLOCK_LENGTH_OFFSET],
                data[start + BLOCK_LENGTH_OFFSET + 1],
            ]) as usize;

            if start + length > data.len() {
                return Err(RegBankError::Malformed(format!(
                    "registration block {} extends beyond end of file",
                    i
                )));
            }

            *slot = Some(Registration::from_bytes(
                model,
                data[start..start + length].to_vec(),
            ));
        }

        Ok(Bank::from_slots(model, slots))
    }

    fn encode(&self, bank: &Bank) -> Result<Vec<u8>> {
        if !self.supports(bank.model()) {
            return Err(RegBankError::UnknownKeyboardModel(
                bank.model().wire_name().to_string(),
            ));
        }

        let max = bank.model().max_slots();
        let mut n_regs: u32 = 0;
        let mut access_table = Vec::with_capacity(4 * max);
        let mut data_block = Vec::new();

        for i in 0..max {
            match bank.slots().get(i).and_then(Option::as_ref) {
                None => access_table.extend_from_slice(&EMPTY_SENTINEL.to_be_bytes()),
                Some(reg) => {
                    n_regs += 1;
                    let position = (DATA_OFFSET + data_block.len()) as u32;
                    access_table.extend_from_slice(&position.to_be_bytes());
                    data_block.extend_from_slice(reg.bytes());
                }
            }
        }

        let mut out = Vec::with_capacity(DATA_OFFSET + data_block.len());
        out.extend_from_slice(FILE_HEADER);
        // The count is little-endian although every other number in the
        // format is big-endian. The instruments expect it this way, so
        // the asymmetry is preserved exactly.
        out.extend_from_slice(&n_regs.to_le_bytes());
        out.extend_from_slice(&access_table);
        out.extend_from_slice(SPECIAL_PADDING);
        out.extend_from_slice(&data_block);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A well-formed registration block: "RGST01" + block length + a
    /// marker byte + fixed 80-byte GP00 name block
    fn make_block(name: &str) -> Vec<u8> {
        let mut name_block = Vec::with_capacity(80);
        name_block.extend_from_slice(b"GP00\x00\x50\x00\x00");
        name_block.extend_from_slice(name.as_bytes());
        name_block.resize(80, 0);

        let total = (6 + 2 + 1 + name_block.len()) as u16;
        let mut block = Vec::new();
        block.extend_from_slice(b"RGST01");
        block.extend_from_slice(&total.to_be_bytes());
        block.push(0xFF);
        block.extend_from_slice(&name_block);
        block
    }

    fn make_registration(name: &str) -> Registration {
        Registration::from_bytes(KeyboardModel::Psr2000, make_block(name))
    }

    /// Minimal synthetic bank file with one registration in slot 0
    fn make_single_slot_file(name: &str) -> Vec<u8> {
        let block = make_block(name);

        let mut data = Vec::new();
        data.extend_from_slice(FILE_HEADER);
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&(DATA_OFFSET as u32).to_be_bytes());
        for _ in 1..8 {
            data.extend_from_slice(&EMPTY_SENTINEL.to_be_bytes());
        }
        data.extend_from_slice(SPECIAL_PADDING);
        data.extend_from_slice(&block);
        data
    }

    #[test]
    fn test_decode_single_slot_file() {
        let bank = FlatFormat.decode(&make_single_slot_file("AB")).unwrap();

        assert_eq!(bank.model(), KeyboardModel::Psr2000);
        assert_eq!(bank.slots().len(), 8);
        assert_eq!(bank.slots()[0].as_ref().unwrap().name(), "AB");
        assert!(bank.slots()[1..].iter().all(Option::is_none));
    }

    #[test]
    fn test_encode_offset_table() {
        let mut bank = Bank::empty(KeyboardModel::Psr2000);
        let mut slots = bank.slots().to_vec();
        slots[0] = Some(make_registration("One"));
        slots[3] = Some(make_registration("Two"));
        slots[5] = Some(make_registration("Three"));
        bank.set_slots(slots).unwrap();

        let data = FlatFormat.encode(&bank).unwrap();

        // Count written little-endian
        assert_eq!(&data[28..32], &3u32.to_le_bytes());

        // Exactly 3 non-sentinel entries with strictly increasing
        // offsets starting at the data region
        let mut offsets = Vec::new();
        for i in 0..8 {
            let entry = TABLE_OFFSET + 4 * i;
            let value = u32::from_be_bytes([
                data[entry],
                data[entry + 1],
                data[entry + 2],
                data[entry + 3],
            ]);
            if value != EMPTY_SENTINEL {
                offsets.push(value);
            }
        }
        assert_eq!(offsets.len(), 3);
        assert_eq!(offsets[0], DATA_OFFSET as u32);
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_roundtrip() {
        let mut bank = Bank::empty(KeyboardModel::Psr2000);
        let mut slots = bank.slots().to_vec();
        slots[1] = Some(make_registration("First"));
        slots[6] = Some(make_registration("Second"));
        bank.set_slots(slots).unwrap();

        let decoded = FlatFormat.decode(&FlatFormat.encode(&bank).unwrap()).unwrap();
        assert_eq!(decoded, bank);
    }

    #[test]
    fn test_roundtrip_all_empty() {
        let bank = Bank::empty(KeyboardModel::Psr2000);
        let data = FlatFormat.encode(&bank).unwrap();

        assert_eq!(data.len(), DATA_OFFSET);
        let decoded = FlatFormat.decode(&data).unwrap();
        assert_eq!(decoded, bank);
    }

    #[test]
    fn test_unrecognized_header() {
        let result = FlatFormat.decode(b"garbage bytes, definitely not a bank file, long enough anyway..........");
        assert!(matches!(result, Err(RegBankError::UnknownFileFormat)));
    }

    #[test]
    fn test_table_entry_past_eof_is_malformed() {
        let mut data = make_single_slot_file("AB");
        // Point slot 0 far beyond the end of the file
        data[TABLE_OFFSET..TABLE_OFFSET + 4].copy_from_slice(&0x0001_0000u32.to_be_bytes());

        let result = FlatFormat.decode(&data);
        assert!(matches!(result, Err(RegBankError::Malformed(_))));
    }

    #[test]
    fn test_block_length_past_eof_is_malformed() {
        let mut data = make_single_slot_file("AB");
        // Inflate the block's own length field beyond the file size
        data[DATA_OFFSET + 6..DATA_OFFSET + 8].copy_from_slice(&0x4000u16.to_be_bytes());

        let result = FlatFormat.decode(&data);
        assert!(matches!(result, Err(RegBankError::Malformed(_))));
    }
}
