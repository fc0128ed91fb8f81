//! In-progress dispensing readings

/// One nozzle currently dispensing, as reported by `(&V)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizationEntry {
    /// Nozzle code (2 hex chars)
    pub nozzle: String,

    /// Running value (6 digits)
    pub value: String,
}

impl VisualizationEntry {
    pub fn new(nozzle: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            nozzle: nozzle.into(),
            value: value.into(),
        }
    }
}
