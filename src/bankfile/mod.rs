//! Bank container codecs
//!
//! A bank file holds an ordered set of registrations in a model-specific
//! binary layout. Two layouts exist:
//! - [`flat`]: absolute-offset access table (PSR-2000)
//! - [`chained`]: sequential self-describing blocks (Tyros descendants)
//!
//! Codecs are registered in the fixed-order [`BANK_FORMATS`] table;
//! format resolution walks it front to back and the first match wins.

pub mod chained;
pub mod flat;

pub use chained::ChainedFormat;
pub use flat::FlatFormat;

use std::path::Path;

use crate::models::KeyboardModel;
use crate::registration::Registration;
use crate::{RegBankError, Result};

/// Codec for one bank file layout
pub trait BankFormat: Sync + std::fmt::Debug {
    /// Short codec name for diagnostics
    fn name(&self) -> &'static str;

    /// Whether the leading file bytes carry this layout's magic header
    fn recognizes(&self, header: &[u8]) -> bool;

    /// Whether this codec handles banks of the given model
    fn supports(&self, model: KeyboardModel) -> bool;

    /// Identify the exact model from the magic header, if recognized
    fn model_from_header(&self, header: &[u8]) -> Option<KeyboardModel>;

    /// Decode a complete bank file
    fn decode(&self, data: &[u8]) -> Result<Bank>;

    /// Serialize a bank to keyboard-readable bytes
    fn encode(&self, bank: &Bank) -> Result<Vec<u8>>;
}

/// All bank codecs, in registration order
pub static BANK_FORMATS: [&'static dyn BankFormat; 2] = [&ChainedFormat, &FlatFormat];

/// Find the codec responsible for a keyboard model
pub fn format_for_model(model: KeyboardModel) -> Result<&'static dyn BankFormat> {
    BANK_FORMATS
        .iter()
        .copied()
        .find(|f| f.supports(model))
        .ok_or_else(|| RegBankError::UnknownKeyboardModel(model.wire_name().to_string()))
}

/// An ordered, bounded-capacity container of registrations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    model: KeyboardModel,
    slots: Vec<Option<Registration>>,
}

impl Bank {
    /// Create an empty bank with the model's full count of empty slots
    pub fn empty(model: KeyboardModel) -> Self {
        Bank {
            model,
            slots: vec![None; model.max_slots()],
        }
    }

    /// Reassemble a bank from already-decoded slots.
    ///
    /// Used by the codecs; callers normally go through [`Bank::empty`]
    /// plus [`Bank::set_slots`].
    pub(crate) fn from_slots(model: KeyboardModel, slots: Vec<Option<Registration>>) -> Self {
        Bank { model, slots }
    }

    /// The keyboard model this bank belongs to
    pub fn model(&self) -> KeyboardModel {
        self.model
    }

    /// All slots in order; empty slots are `None`
    pub fn slots(&self) -> &[Option<Registration>] {
        &self.slots
    }

    /// Replace the whole slot list.
    ///
    /// Fails with [`TooManySlots`](crate::RegBankError::TooManySlots) if
    /// more slots are supplied than the model allows; the bank is left
    /// unchanged on failure.
    pub fn set_slots(&mut self, slots: Vec<Option<Registration>>) -> Result<()> {
        let max = self.model.max_slots();
        if slots.len() > max {
            return Err(RegBankError::TooManySlots {
                given: slots.len(),
                max,
            });
        }
        self.slots = slots;
        Ok(())
    }

    /// Serialize to keyboard-readable bytes.
    ///
    /// Encoding is a pure function of the current slots; nothing is
    /// cached between calls.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        format_for_model(self.model)?.encode(self)
    }

    /// Serialize and write to disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
