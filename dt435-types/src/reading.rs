//! Decoder result wrapper

/// Result of decoding a device reply
///
/// The device answers `(0)` when it has nothing to report (no pending supply,
/// no nozzle dispensing, ...). That is a valid answer, not an error, so every
/// decoder returns it as [`Reading::NoData`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reading<T> {
    /// Device replied with the `(0)` sentinel
    NoData,

    /// Decoded value
    Value(T),
}

impl<T> Reading<T> {
    /// Check if the device reported no data
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    /// Convert into an `Option`, dropping the sentinel
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::NoData => None,
            Self::Value(value) => Some(value),
        }
    }

    /// Borrow the decoded value, if any
    pub fn as_ref(&self) -> Reading<&T> {
        match self {
            Self::NoData => Reading::NoData,
            Self::Value(value) => Reading::Value(value),
        }
    }

    /// Map the decoded value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reading<U> {
        match self {
            Self::NoData => Reading::NoData,
            Self::Value(value) => Reading::Value(f(value)),
        }
    }
}

impl<T> From<Reading<T>> for Option<T> {
    fn from(reading: Reading<T>) -> Self {
        reading.into_option()
    }
}
