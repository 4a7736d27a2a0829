//! Registration bank codec library for Yamaha arranger keyboards
//!
//! Reads and writes the proprietary registration ("preset") container
//! formats used by the Yamaha PSR-2000, Tyros 1/2, PSR-3000 and
//! PSR-S700/S900 keyboards. Two incompatible bank layouts are supported:
//! the PSR-2000 flat layout with an absolute-offset access table, and the
//! Tyros-family layout built from sequential self-describing blocks.
//! A single-registration container format (`RS01`) is provided for moving
//! individual registrations between banks.
//!
//! All codecs are byte-exact with the files the instruments themselves
//! produce, so banks written by this crate load on the physical keyboards.
//!
//! # Quick start
//! ## Open a bank with format auto-detection
//! ```no_run
//! use regbank::BankLoader;
//!
//! let loader = BankLoader::new();
//! let bank = loader.open_bank("MyBank.reg").unwrap();
//! for slot in bank.slots() {
//!     match slot {
//!         Some(reg) => println!("{}", reg.name()),
//!         None => println!("(empty)"),
//!     }
//! }
//! ```
//!
//! ## Assemble and save a new bank
//! ```no_run
//! use regbank::{BankLoader, KeyboardModel};
//!
//! let loader = BankLoader::new();
//! let (model, reg) = loader.open_registration("Strings.RS01").unwrap();
//! assert_eq!(model, KeyboardModel::Tyros1);
//!
//! let mut bank = loader.create_bank(model);
//! let mut slots = bank.slots().to_vec();
//! slots[0] = Some(reg);
//! bank.set_slots(slots).unwrap();
//! bank.save("NewBank.rgt").unwrap();
//! ```

#![warn(missing_docs)]

pub mod bankfile; // Bank container codecs (flat + chained layouts)
pub mod dispatch; // Format resolution by model or file content
pub mod loader; // File I/O facade
pub mod models; // Keyboard model registry
pub mod regfile; // Single-registration container codec
pub mod registration; // Registration payload and name codecs

/// Error types for registration bank operations
#[derive(thiserror::Error, Debug)]
pub enum RegBankError {
    /// No codec is registered for the given keyboard model or file content
    #[error("Unknown keyboard model: {0}")]
    UnknownKeyboardModel(String),

    /// The file carries no recognizable container magic
    #[error("Unrecognized file format")]
    UnknownFileFormat,

    /// A registration name exceeds the capacity of the target format
    #[error("Name '{name}' exceeds the maximum of {max_chars} characters")]
    NameTooLong {
        /// The rejected name
        name: String,
        /// Maximum character count allowed by the format
        max_chars: usize,
    },

    /// Truncated or internally inconsistent container data
    #[error("Malformed bank data: {0}")]
    Malformed(String),

    /// More slots supplied than the bank's model allows
    #[error("Bank holds at most {max} slots, got {given}")]
    TooManySlots {
        /// Number of slots supplied
        given: usize,
        /// Slot capacity of the model
        max: usize,
    },

    /// IO error from the filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for registration bank operations
pub type Result<T> = std::result::Result<T, RegBankError>;

// Public API exports
pub use bankfile::{Bank, BankFormat, BANK_FORMATS};
pub use dispatch::{CodecHandle, FormatDispatcher, PROBE_LEN};
pub use loader::BankLoader;
pub use models::{Family, KeyboardModel};
pub use regfile::RegFileFormat;
pub use registration::{strip_yamaha_name, Registration};
