//! DT435 checksum algorithm
//!
//! 1. Take the frame body starting with the opening `(`
//! 2. Sum the character codes of every byte after the `(`
//! 3. Keep the low 8 bits
//! 4. Render as 2 uppercase hex digits, zero-padded

use tracing::trace;

/// Calculate the checksum byte of a frame body
///
/// The first character of `body` is skipped; callers pass the body including
/// its leading `(`.
///
/// # Examples
///
/// ```
/// use dt435_core::checksum;
///
/// assert_eq!(checksum::calculate_byte("(&T08L"), 0x2E);
/// ```
pub fn calculate_byte(body: &str) -> u8 {
    body.bytes()
        .skip(1)
        .fold(0u8, |sum, byte| sum.wrapping_add(byte))
}

/// Calculate the checksum of a frame body as sent on the wire
///
/// # Examples
///
/// ```
/// use dt435_core::checksum;
///
/// assert_eq!(checksum::calculate("(&T08L"), "2E");
/// ```
pub fn calculate(body: &str) -> String {
    let checksum = hex::encode_upper([calculate_byte(body)]);

    trace!(body = body, checksum = %checksum, "Calculated checksum");

    checksum
}
