//! File I/O facade
//!
//! Thin synchronous helpers around whole-file reads and writes. All
//! parsing happens on in-memory byte buffers; the loader only bridges
//! between paths and the codecs, resolving formats through its owned
//! [`FormatDispatcher`].

use std::path::Path;

use crate::bankfile::Bank;
use crate::dispatch::{CodecHandle, FormatDispatcher};
use crate::models::KeyboardModel;
use crate::regfile::RegFileFormat;
use crate::registration::Registration;
use crate::{RegBankError, Result};

/// Loads and stores bank and registration files.
///
/// Owns the dispatch caches, so reusing one loader across many files
/// avoids repeated format-detection scans.
#[derive(Default)]
pub struct BankLoader {
    dispatcher: FormatDispatcher,
}

impl BankLoader {
    /// Create a loader with a fresh dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// The dispatcher backing this loader
    pub fn dispatcher(&self) -> &FormatDispatcher {
        &self.dispatcher
    }

    /// All keyboard models this build can handle
    pub fn supported_models(&self) -> &'static [KeyboardModel] {
        &KeyboardModel::ALL
    }

    /// Open a bank file from disk, auto-detecting its format
    pub fn open_bank(&self, path: impl AsRef<Path>) -> Result<Bank> {
        let data = std::fs::read(path)?;
        self.open_bank_bytes(&data)
    }

    /// Decode a bank from in-memory bytes, auto-detecting its format
    pub fn open_bank_bytes(&self, data: &[u8]) -> Result<Bank> {
        match self.dispatcher.by_content(data)? {
            CodecHandle::Bank(format) => format.decode(data),
            // A single-registration container is not a bank
            CodecHandle::SinglePreset(_) => Err(RegBankError::UnknownFileFormat),
        }
    }

    /// Decode a bank with a known model, skipping content sniffing
    pub fn open_bank_for_model(&self, model: KeyboardModel, data: &[u8]) -> Result<Bank> {
        self.dispatcher.by_model(model)?.decode(data)
    }

    /// Construct an empty bank with the model's full count of empty slots
    pub fn create_bank(&self, model: KeyboardModel) -> Bank {
        Bank::empty(model)
    }

    /// Open a single-registration container from disk
    pub fn open_registration(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(KeyboardModel, Registration)> {
        let data = std::fs::read(path)?;
        self.open_registration_bytes(&data)
    }

    /// Decode a single-registration container from in-memory bytes
    pub fn open_registration_bytes(&self, data: &[u8]) -> Result<(KeyboardModel, Registration)> {
        RegFileFormat.decode(data)
    }

    /// Write a registration to disk as a single-registration container
    pub fn save_registration(
        &self,
        model: KeyboardModel,
        registration: &Registration,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let bytes = RegFileFormat.encode(model, registration);
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
