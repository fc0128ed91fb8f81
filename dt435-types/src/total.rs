//! Totalizer and price readings

use crate::mode::TotalMode;

/// Reply to a `&T` read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalReading {
    /// Mode tag echoed by the device
    pub mode: char,

    /// Nozzle code (2 hex chars)
    pub nozzle: String,

    /// Register value; its width depends on the mode
    pub value: String,
}

impl TotalReading {
    /// Mode tag as a known register, if recognised
    pub fn total_mode(&self) -> Option<TotalMode> {
        TotalMode::try_from(self.mode).ok()
    }
}
