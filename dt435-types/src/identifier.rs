//! Identifier (tag) records

/// Reply to `?A` / `?LF`
///
/// The layout of the identifier block varies with the device configuration,
/// so the payload is kept whole, without delimiters and checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierRecord {
    pub payload: String,
}
