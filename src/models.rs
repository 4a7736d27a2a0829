//! Keyboard Model Registry
//!
//! Static knowledge about the supported keyboard models: which codec
//! family handles each model, the short wire name stored inside
//! registration files, the human-readable product name and the bank
//! file extension used by the instrument.

/// Codec family a keyboard model belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Family {
    /// Absolute-offset access table layout (PSR-2000)
    Flat,
    /// Sequential self-describing block layout (Tyros descendants)
    Chained,
}

/// A supported keyboard model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyboardModel {
    /// Yamaha PSR-2000
    Psr2000,
    /// Yamaha Tyros
    Tyros1,
    /// Yamaha Tyros 2
    Tyros2,
    /// Yamaha PSR-S900
    S900,
    /// Yamaha PSR-S700
    S700,
    /// Yamaha PSR-3000
    Psr3000,
}

impl KeyboardModel {
    /// All supported models, in registry order
    pub const ALL: [KeyboardModel; 6] = [
        KeyboardModel::Psr2000,
        KeyboardModel::Tyros1,
        KeyboardModel::Tyros2,
        KeyboardModel::S900,
        KeyboardModel::S700,
        KeyboardModel::Psr3000,
    ];

    /// Short model identifier as stored in registration files.
    ///
    /// At most 16 ASCII bytes so it fits the fixed model-name field of
    /// the single-registration container.
    pub fn wire_name(&self) -> &'static str {
        match self {
            KeyboardModel::Psr2000 => "YAMAHA PSR2000",
            KeyboardModel::Tyros1 => "YAMAHA TYROS1",
            KeyboardModel::Tyros2 => "YAMAHA TYROS2",
            KeyboardModel::S900 => "YAMAHA S900",
            KeyboardModel::S700 => "YAMAHA S700",
            KeyboardModel::Psr3000 => "YAMAHA PSR3000",
        }
    }

    /// Human-readable product name
    pub fn product_name(&self) -> &'static str {
        match self {
            KeyboardModel::Psr2000 => "Yamaha PSR-2000",
            KeyboardModel::Tyros1 => "Yamaha Tyros",
            KeyboardModel::Tyros2 => "Yamaha Tyros 2",
            KeyboardModel::S900 => "Yamaha PSR-S900",
            KeyboardModel::S700 => "Yamaha PSR-S700",
            KeyboardModel::Psr3000 => "Yamaha PSR-3000",
        }
    }

    /// File extension of bank files for this model
    pub fn file_ext(&self) -> &'static str {
        match self.family() {
            Family::Flat => "reg",
            Family::Chained => "rgt",
        }
    }

    /// Codec family handling this model's binary layouts
    pub fn family(&self) -> Family {
        match self {
            KeyboardModel::Psr2000 => Family::Flat,
            _ => Family::Chained,
        }
    }

    /// Maximum number of registrations a bank of this model can hold.
    ///
    /// Happens to be 8 for every model known today, but the capacity is
    /// a per-model property, not a format-wide constant.
    pub fn max_slots(&self) -> usize {
        8
    }

    /// Look up a model by its wire name. Returns `None` for unknown names.
    pub fn from_wire_name(name: &str) -> Option<KeyboardModel> {
        Self::ALL.iter().copied().find(|m| m.wire_name() == name)
    }
}
