//! Supply (fuelling transaction) records

use std::fmt;

/// Supply record read with `&A`
///
/// Fields are kept as the raw fixed-width digit strings the device sends; the
/// comma code tells the caller where the decimal point goes. A field is `None`
/// when the reply was too short to carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplyRecord {
    /// Amount to pay
    pub total_to_pay: Option<String>,

    /// Dispensed volume
    pub volume: Option<String>,

    /// Unit price
    pub price: Option<String>,

    /// Decimal point placement code
    pub comma_code: Option<String>,

    /// Supply duration
    pub supply_time: Option<String>,

    /// Nozzle code (2 hex chars)
    pub nozzle: Option<String>,

    pub day: Option<String>,
    pub hour: Option<String>,
    pub minute: Option<String>,

    /// Extended form only
    pub month: Option<String>,

    /// Record number in device memory (extended form only)
    pub record: Option<String>,

    /// Nozzle totalizer after the supply (extended form only)
    pub final_total: Option<String>,

    /// Extended form only
    pub status: Option<String>,
}

impl SupplyRecord {
    /// Check if the extended fields were present in the reply
    pub fn is_extended(&self) -> bool {
        self.final_total.is_some()
    }
}

impl fmt::Display for SupplyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "Supply[nozzle: {}, total: {}, volume: {}, price: {}]",
            field(&self.nozzle),
            field(&self.total_to_pay),
            field(&self.volume),
            field(&self.price)
        )
    }
}

/// Supply record carrying the attendant/vehicle identifier tag
///
/// Either every field is present or none is: the device only sends the
/// identified form in full.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplyIdentified {
    pub total: Option<String>,
    pub volume: Option<String>,
    pub price: Option<String>,
    pub nozzle: Option<String>,

    /// 16-character identifier tag
    pub identifier: Option<String>,
}

impl SupplyIdentified {
    /// Check if the reply was too short to decode
    pub fn is_empty(&self) -> bool {
        self.identifier.is_none()
    }
}
