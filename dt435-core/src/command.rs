//! DT435 command catalog
//!
//! Every logical operation maps to a [`Command`]. Parameters are validated and
//! encoded here, so a `Command` that exists is always legal to put on the
//! wire.

use std::fmt;

use dt435_types::{OperatingMode, TotalMode};

use crate::{
    constants::{headers, literals, widths},
    error::{Error, Result},
    frame,
};

/// Encoded protocol command
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Header plus parameters, framed with a checksum
    Checksummed {
        header: &'static str,
        params: String,
    },

    /// Fixed frame the firmware accepts without a checksum
    Literal { frame: &'static str },
}

impl Command {
    fn checksummed(header: &'static str, params: impl Into<String>) -> Self {
        Self::Checksummed {
            header,
            params: params.into(),
        }
    }

    /// Read the pending supply (`&A`)
    pub fn read_supply() -> Self {
        Self::checksummed(headers::READ_SUPPLY, "")
    }

    /// Read the pending supply in identified form
    ///
    /// Same request as [`Command::read_supply`]; the device answers with the
    /// identified layout when tags are enabled.
    pub fn read_supply_identified() -> Self {
        Self::checksummed(headers::READ_SUPPLY, "")
    }

    /// Read supply, PAF1 layout (`&A2`)
    pub fn read_supply_paf1() -> Self {
        Self::checksummed(headers::READ_SUPPLY_PAF1, "")
    }

    /// Read supply, PAF2 layout (`&A3`)
    pub fn read_supply_paf2() -> Self {
        Self::checksummed(headers::READ_SUPPLY_PAF2, "")
    }

    /// Read supply memory pointers (`&T99P`)
    pub fn read_memory_pointers() -> Self {
        Self::checksummed(headers::READ_MEMORY_POINTERS, "P")
    }

    /// Advance the supply pointer, `(&I)`
    pub fn increment() -> Self {
        Self::Literal {
            frame: literals::INCREMENT,
        }
    }

    /// In-progress dispensing readings, `(&V)`
    pub fn visualization() -> Self {
        Self::Literal {
            frame: literals::VISUALIZATION,
        }
    }

    /// Identified visualization (`?V`)
    pub fn visualization_identified() -> Self {
        Self::checksummed(headers::VISUALIZATION_IDENTIFIED, "")
    }

    /// Read the current identifier (`?A`)
    pub fn read_identifier() -> Self {
        Self::checksummed(headers::READ_IDENTIFIER, "")
    }

    /// Read the identifier stored at a memory position (`?LF`)
    pub fn read_identifier_at(position: u32) -> Result<Self> {
        let params = pad_number("position", position, widths::IDENTIFIER_POSITION)?;
        Ok(Self::checksummed(headers::READ_IDENTIFIER_AT, params))
    }

    /// Nozzle status vector, `(&S)`
    pub fn status() -> Self {
        Self::Literal {
            frame: literals::STATUS,
        }
    }

    /// Read a nozzle register (`&T`)
    pub fn read_total(nozzle: &str, mode: TotalMode) -> Result<Self> {
        let nozzle = nozzle_code(nozzle)?;
        Ok(Self::checksummed(
            headers::READ_TOTAL,
            format!("{}{}", nozzle, mode.code()),
        ))
    }

    /// Read the unit price of a nozzle (`&T` with mode `U`)
    pub fn read_price(nozzle: &str) -> Result<Self> {
        Self::read_total(nozzle, TotalMode::Price)
    }

    /// Change the unit price of a nozzle (`&U`)
    ///
    /// `level` selects the price table (0 = cash, 1 = credit). `price` is a
    /// decimal string of up to 4 digits.
    pub fn change_price(nozzle: &str, level: char, price: &str) -> Result<Self> {
        let nozzle = nozzle_code(nozzle)?;
        if !level.is_ascii_digit() {
            return Err(Error::invalid_parameter(
                "level",
                format!("expected a single digit, got '{}'", level),
            ));
        }
        let price = pad_digits("price", price, widths::PRICE)?;

        // The '0' between level and price is part of the layout
        Ok(Self::checksummed(
            headers::CHANGE_PRICE,
            format!("{}{}0{}", nozzle, level, price),
        ))
    }

    /// Preset the maximum value of the next supply (`&P`)
    pub fn set_preset(nozzle: &str, value: &str) -> Result<Self> {
        let nozzle = nozzle_code(nozzle)?;
        let value = pad_digits("value", value, widths::PRESET)?;
        Ok(Self::checksummed(
            headers::SET_PRESET,
            format!("{}{}", nozzle, value),
        ))
    }

    /// Set the operating mode of a nozzle (`&M`)
    pub fn set_operating_mode(nozzle: &str, mode: OperatingMode) -> Result<Self> {
        let nozzle = nozzle_code(nozzle)?;
        Ok(Self::checksummed(
            headers::SET_OPERATING_MODE,
            format!("{}{}", nozzle, mode.code()),
        ))
    }

    /// Read the device calendar, `(&R)`
    pub fn read_calendar() -> Self {
        Self::Literal {
            frame: literals::READ_CALENDAR,
        }
    }

    /// Read the extended clock (`&KR1`)
    pub fn read_clock_extended() -> Self {
        Self::checksummed(headers::READ_CLOCK_EXTENDED, "")
    }

    /// Header code, without delimiters
    pub fn header(&self) -> &str {
        match self {
            Self::Checksummed { header, .. } => header,
            Self::Literal { frame } => &frame[1..frame.len() - 1],
        }
    }

    /// Check if this command is sent without a checksum
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }

    /// Wire frame for this command
    pub fn to_frame(&self) -> String {
        match self {
            Self::Checksummed { header, params } => frame::build(header, params),
            Self::Literal { frame } => (*frame).to_string(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checksummed { header, params } => write!(f, "{}{}", header, params),
            Self::Literal { frame } => f.write_str(frame),
        }
    }
}

/// Encode a memory position for pointer reads (4 digits)
pub fn pointer_position(position: u32) -> Result<String> {
    pad_number("position", position, widths::POINTER_POSITION)
}

/// Validate a 2-char hex nozzle code; case is preserved
fn nozzle_code(nozzle: &str) -> Result<&str> {
    if nozzle.len() != widths::NOZZLE || !nozzle.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::invalid_parameter(
            "nozzle",
            format!("expected {} hex chars, got {:?}", widths::NOZZLE, nozzle),
        ));
    }
    Ok(nozzle)
}

/// Left-pad a decimal string with zeros to `width`
fn pad_digits(field: &'static str, value: &str, width: usize) -> Result<String> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::invalid_parameter(
            field,
            format!("expected decimal digits, got {:?}", value),
        ));
    }
    if value.len() > width {
        return Err(Error::invalid_parameter(
            field,
            format!("{:?} does not fit in {} digits", value, width),
        ));
    }
    Ok(format!("{:0>width$}", value, width = width))
}

fn pad_number(field: &'static str, value: u32, width: usize) -> Result<String> {
    pad_digits(field, &value.to_string(), width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_total_frame() {
        let command = Command::read_total("08", TotalMode::Volume).unwrap();
        assert_eq!(command.to_frame(), "(&T08L2E)");
        assert_eq!(command.header(), "&T");
    }

    #[test]
    fn test_literal_commands_skip_checksum() {
        assert_eq!(Command::increment().to_frame(), "(&I)");
        assert_eq!(Command::visualization().to_frame(), "(&V)");
        assert_eq!(Command::status().to_frame(), "(&S)");
        assert_eq!(Command::read_calendar().to_frame(), "(&R)");
        assert!(Command::status().is_literal());
        assert_eq!(Command::status().header(), "&S");
    }

    #[test]
    fn test_read_price_uses_unit_mode() {
        let command = Command::read_price("0a").unwrap();
        assert_eq!(
            command,
            Command::Checksummed {
                header: "&T",
                params: "0aU".into()
            }
        );
    }

    #[test]
    fn test_nozzle_case_preserved() {
        let upper = Command::read_total("0A", TotalMode::Value).unwrap();
        let lower = Command::read_total("0a", TotalMode::Value).unwrap();
        assert_eq!(upper.to_string(), "&T0A$");
        assert_eq!(lower.to_string(), "&T0a$");
    }

    #[test]
    fn test_invalid_nozzle() {
        for nozzle in ["8", "008", "0G", "", "0 "] {
            let result = Command::set_preset(nozzle, "1000");
            assert!(
                matches!(result, Err(Error::InvalidParameter { field: "nozzle", .. })),
                "nozzle {:?} accepted",
                nozzle
            );
        }
    }

    #[test]
    fn test_change_price_layout() {
        let command = Command::change_price("08", '1', "599").unwrap();
        assert_eq!(command.to_string(), "&U08100599");
        assert!(crate::frame::verify(&command.to_frame()).is_ok());
    }

    #[test]
    fn test_change_price_rejects_bad_input() {
        assert!(Command::change_price("08", 'x', "599").is_err());
        assert!(Command::change_price("08", '0', "12345").is_err());
        assert!(Command::change_price("08", '0', "5.99").is_err());
    }

    #[test]
    fn test_set_preset_pads_to_six() {
        let command = Command::set_preset("08", "1000").unwrap();
        assert_eq!(command.to_string(), "&P08001000");
    }

    #[test]
    fn test_set_preset_never_truncates() {
        let result = Command::set_preset("08", "1234567");
        assert!(matches!(
            result,
            Err(Error::InvalidParameter { field: "value", .. })
        ));
        assert!(Command::set_preset("08", "").is_err());
        assert!(Command::set_preset("08", "-100").is_err());
    }

    #[test]
    fn test_set_operating_mode() {
        let command = Command::set_operating_mode("04", OperatingMode::Block).unwrap();
        assert_eq!(command.to_string(), "&M04B");
    }

    #[test]
    fn test_read_identifier_at() {
        let command = Command::read_identifier_at(1).unwrap();
        assert_eq!(command.to_string(), "?LF000001");
        assert!(Command::read_identifier_at(1_000_000).is_err());
    }

    #[test]
    fn test_pointer_position() {
        assert_eq!(pointer_position(42).unwrap(), "0042");
        assert!(pointer_position(10_000).is_err());
    }

    #[test]
    fn test_memory_pointers() {
        assert_eq!(Command::read_memory_pointers().to_string(), "&T99P");
        assert_eq!(Command::read_clock_extended().to_string(), "&KR1");
        assert_eq!(Command::read_supply_paf2().to_string(), "&A3");
    }
}
