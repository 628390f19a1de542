use std::fmt;

use serde::{Deserialize, Serialize};

/// `nm` symbol type letters the report knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    LocalText,
    GlobalText,
    LocalBss,
    GlobalBss,
    LocalData,
    GlobalData,
    Unknown,
}

impl SymbolKind {
    pub fn from_code(code: char) -> Self {
        match code {
            't' => Self::LocalText,
            'T' => Self::GlobalText,
            'b' => Self::LocalBss,
            'B' => Self::GlobalBss,
            'd' => Self::LocalData,
            'D' => Self::GlobalData,
            _ => Self::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LocalText => "Local Text (Code)",
            Self::GlobalText => "Global Text (Code)",
            Self::LocalBss => "Local BSS (Uninitialized Data)",
            Self::GlobalBss => "Global BSS (Uninitialized Data)",
            Self::LocalData => "Local Data (Initialized Data)",
            Self::GlobalData => "Global Data (Initialized Data)",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub address: u64,
    pub size: u64,
    pub kind: SymbolKind,
    pub name: String,
}

impl fmt::Display for SymbolEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Address: {}, Size: {}, Type: {}, Name: {}",
            self.address, self.size, self.kind, self.name
        )
    }
}
