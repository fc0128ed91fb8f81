//! Device clock readings

/// Reply to `(&R)` and `&KR1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarReading {
    /// Clock text as sent by the device, without delimiters
    pub text: String,
}
