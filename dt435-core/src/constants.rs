//! Protocol constants

/// Opening frame delimiter
pub const FRAME_START: char = '(';

/// Closing frame delimiter
pub const FRAME_END: char = ')';

/// "No data available" reply
pub const NO_DATA: &str = "(0)";

/// Longest reply accepted before giving up on finding `)`
pub const MAX_FRAME_LEN: usize = 1024;

/// Checksum width in hex chars
pub const CHECKSUM_LEN: usize = 2;

/// Default concentrator TCP port
pub const DEFAULT_PORT: u16 = 2001;

/// Default connection timeout (seconds)
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Default per-command timeout, write and read combined (seconds)
pub const DEFAULT_COMMAND_TIMEOUT: u64 = 5;

/// Nozzle positions reported by the status vector
pub const MAX_NOZZLES: usize = 32;

/// Zero-padded widths of numeric command parameters
pub mod widths {
    /// Nozzle code (hex)
    pub const NOZZLE: usize = 2;

    /// Preset value (`&P`)
    pub const PRESET: usize = 6;

    /// Unit price, short form (`&U`)
    pub const PRICE: usize = 4;

    /// Identifier memory position (`?LF`)
    pub const IDENTIFIER_POSITION: usize = 6;

    /// Memory position for pointer reads
    pub const POINTER_POSITION: usize = 4;
}

/// Header codes
pub mod headers {
    pub const READ_SUPPLY: &str = "&A";
    pub const READ_SUPPLY_PAF1: &str = "&A2";
    pub const READ_SUPPLY_PAF2: &str = "&A3";
    pub const READ_MEMORY_POINTERS: &str = "&T99";
    pub const VISUALIZATION_IDENTIFIED: &str = "?V";
    pub const READ_IDENTIFIER: &str = "?A";
    pub const READ_IDENTIFIER_AT: &str = "?LF";
    pub const READ_TOTAL: &str = "&T";
    pub const CHANGE_PRICE: &str = "&U";
    pub const SET_PRESET: &str = "&P";
    pub const SET_OPERATING_MODE: &str = "&M";
    pub const READ_CLOCK_EXTENDED: &str = "&KR1";
}

/// Commands the firmware accepts without a checksum
pub mod literals {
    pub const INCREMENT: &str = "(&I)";
    pub const VISUALIZATION: &str = "(&V)";
    pub const STATUS: &str = "(&S)";
    pub const READ_CALENDAR: &str = "(&R)";
}
