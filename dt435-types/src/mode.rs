//! Protocol mode codes sent as command parameters

use std::fmt;

use crate::error::{Error, Result};

/// Register selected by a `&T` read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TotalMode {
    /// Accumulated volume (`L`)
    Volume,

    /// Accumulated value (`$`)
    Value,

    /// Current unit price (`U`)
    Price,
}

impl TotalMode {
    /// Wire code
    pub fn code(self) -> char {
        match self {
            Self::Volume => 'L',
            Self::Value => '$',
            Self::Price => 'U',
        }
    }
}

impl TryFrom<char> for TotalMode {
    type Error = Error;

    fn try_from(code: char) -> Result<Self> {
        match code {
            'L' => Ok(Self::Volume),
            '$' => Ok(Self::Value),
            'U' => Ok(Self::Price),
            other => Err(Error::Validation(format!("unknown total mode '{}'", other))),
        }
    }
}

impl fmt::Display for TotalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Operating mode set with `&M`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingMode {
    /// Nozzle released for free use (`L`)
    Release,

    /// Nozzle blocked (`B`)
    Block,

    /// Authorize a single supply (`A`)
    AuthorizeOnce,
}

impl OperatingMode {
    /// Wire code
    pub fn code(self) -> char {
        match self {
            Self::Release => 'L',
            Self::Block => 'B',
            Self::AuthorizeOnce => 'A',
        }
    }
}

impl TryFrom<char> for OperatingMode {
    type Error = Error;

    fn try_from(code: char) -> Result<Self> {
        match code {
            'L' => Ok(Self::Release),
            'B' => Ok(Self::Block),
            'A' => Ok(Self::AuthorizeOnce),
            other => Err(Error::Validation(format!(
                "unknown operating mode '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
