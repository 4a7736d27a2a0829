//! Format resolution
//!
//! Resolves the codec responsible for a keyboard model or for raw file
//! bytes. Codecs live in a static registry walked in fixed order; the
//! first recognizer that matches wins. Lookups are memoized: by model
//! for model resolution, and by the literal header fingerprint for
//! content resolution. The codec set is static, so cache entries are
//! write-once and never invalidated.

use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;

use crate::bankfile::{BankFormat, BANK_FORMATS};
use crate::models::KeyboardModel;
use crate::regfile::RegFileFormat;
use crate::{RegBankError, Result};

/// Number of leading bytes used as the content fingerprint.
///
/// 28 bytes cover the longest magic header (PSR-2000). Probing further
/// would break PSR-2000 compatibility: bytes 29-32 hold the
/// registration count there, which varies between files of one model.
pub const PROBE_LEN: usize = 28;

/// The single-registration container codec instance
static REG_FILE_FORMAT: RegFileFormat = RegFileFormat;

/// Resolved codec reference
#[derive(Clone, Copy)]
pub enum CodecHandle {
    /// A bank container codec
    Bank(&'static dyn BankFormat),
    /// The single-registration container codec
    SinglePreset(&'static RegFileFormat),
}

impl CodecHandle {
    /// Short codec name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            CodecHandle::Bank(format) => format.name(),
            CodecHandle::SinglePreset(_) => "registration file",
        }
    }
}

impl fmt::Debug for CodecHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CodecHandle").field(&self.name()).finish()
    }
}

/// Memoizing resolver from model identifiers or file contents to codecs.
///
/// Resolution itself is a pure function of the static registry and the
/// probe key; the caches only avoid repeated registry scans. Guarded by
/// mutexes so a dispatcher can be shared across threads.
#[derive(Default)]
pub struct FormatDispatcher {
    model_cache: Mutex<HashMap<KeyboardModel, &'static dyn BankFormat>>,
    name_cache: Mutex<HashMap<String, &'static dyn BankFormat>>,
    header_cache: Mutex<HashMap<Vec<u8>, CodecHandle>>,
}

impl FormatDispatcher {
    /// Create a dispatcher with empty caches
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the bank codec for a keyboard model
    pub fn by_model(&self, model: KeyboardModel) -> Result<&'static dyn BankFormat> {
        if let Some(format) = self.model_cache.lock().get(&model) {
            return Ok(*format);
        }

        let format = crate::bankfile::format_for_model(model)?;
        self.model_cache.lock().insert(model, format);
        Ok(format)
    }

    /// Resolve the bank codec for a model given by its wire name.
    ///
    /// Memoized on the exact name string; only known wire names are
    /// cached, so unknown strings cannot grow the map unboundedly.
    pub fn by_model_name(&self, name: &str) -> Result<&'static dyn BankFormat> {
        if let Some(format) = self.name_cache.lock().get(name) {
            return Ok(*format);
        }

        let model = KeyboardModel::from_wire_name(name)
            .ok_or_else(|| RegBankError::UnknownKeyboardModel(name.to_string()))?;
        let format = self.by_model(model)?;
        self.name_cache.lock().insert(name.to_string(), format);
        Ok(format)
    }

    /// Resolve the codec for raw file bytes by probing the magic header.
    ///
    /// Only the leading [`PROBE_LEN`] bytes take part in the decision,
    /// so files differing solely beyond that window resolve identically.
    pub fn by_content(&self, data: &[u8]) -> Result<CodecHandle> {
        let fingerprint = &data[..data.len().min(PROBE_LEN)];

        if let Some(handle) = self.header_cache.lock().get(fingerprint) {
            return Ok(*handle);
        }

        let handle = Self::scan(fingerprint)?;
        self.header_cache.lock().insert(fingerprint.to_vec(), handle);
        Ok(handle)
    }

    /// Walk the registry in fixed order; first match wins
    fn scan(fingerprint: &[u8]) -> Result<CodecHandle> {
        for format in BANK_FORMATS {
            if format.recognizes(fingerprint) {
                return Ok(CodecHandle::Bank(format));
            }
        }
        if REG_FILE_FORMAT.recognizes(fingerprint) {
            return Ok(CodecHandle::SinglePreset(&REG_FILE_FORMAT));
        }
        Err(RegBankError::UnknownKeyboardModel(
            "unrecognized file header".to_string(),
        ))
    }
}
