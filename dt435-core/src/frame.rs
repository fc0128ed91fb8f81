//! DT435 frame assembly and disassembly
//!
//! # Frame Structure
//!
//! ```text
//! ┌─────┬──────────┬──────────────┬────────────┬─────┐
//! │  (  │  Header  │  Parameters  │  Checksum  │  )  │
//! │  1  │  1-4     │  0..N        │  2 hex     │  1  │
//! └─────┴──────────┴──────────────┴────────────┴─────┘
//! ```
//!
//! The checksum covers everything between `(` and the checksum itself. A few
//! commands are sent as literal frames with no checksum (see
//! [`Command::Literal`](crate::command::Command::Literal)), and some replies
//! carry no checksum either, which is why [`strip`] takes the number of
//! trailing characters to drop.

use tracing::trace;

use crate::{
    checksum,
    constants::{CHECKSUM_LEN, FRAME_END, FRAME_START, NO_DATA},
    error::{Error, Result},
};

/// Assemble a checksummed frame
///
/// # Examples
///
/// ```
/// use dt435_core::frame;
///
/// assert_eq!(frame::build("&T", "08L"), "(&T08L2E)");
/// ```
pub fn build(header: &str, params: &str) -> String {
    let mut frame = String::with_capacity(1 + header.len() + params.len() + CHECKSUM_LEN + 1);
    frame.push(FRAME_START);
    frame.push_str(header);
    frame.push_str(params);

    let checksum = checksum::calculate(&frame);
    frame.push_str(&checksum);
    frame.push(FRAME_END);

    trace!(frame = %frame, "Built frame");

    frame
}

/// Strip the opening delimiter, `trailing` chars and the closing delimiter
///
/// `trailing` is usually 2 (checksum) or 0 for replies without one.
///
/// # Errors
///
/// Returns [`Error::MalformedFrame`] if `response` is not wrapped in `(` and
/// `)` or is shorter than `trailing + 2` chars.
///
/// # Examples
///
/// ```
/// use dt435_core::frame;
///
/// assert_eq!(frame::strip("(&T08L2E)", 2).unwrap(), "&T08L");
/// assert_eq!(frame::strip("(0801000012)", 0).unwrap(), "0801000012");
/// ```
pub fn strip(response: &str, trailing: usize) -> Result<&str> {
    if !response.starts_with(FRAME_START) || !response.ends_with(FRAME_END) {
        return Err(Error::MalformedFrame(format!(
            "{:?} is not delimited by '{}' and '{}'",
            response, FRAME_START, FRAME_END
        )));
    }

    let min = 1 + trailing + 1;
    let too_short = || {
        Error::MalformedFrame(format!(
            "expected at least {} chars, got {}",
            min,
            response.len()
        ))
    };

    if response.len() < min {
        return Err(too_short());
    }

    response
        .get(1..response.len() - 1 - trailing)
        .ok_or_else(too_short)
}

/// Check for the `(0)` "no data" reply
pub fn is_no_data(response: &str) -> bool {
    response == NO_DATA
}

/// Verify the checksum carried by a response
///
/// The device never requires this and the checksum is normally trusted, so
/// verification is opt-in.
///
/// # Errors
///
/// - [`Error::MalformedFrame`] if the response cannot hold a checksum
/// - [`Error::ChecksumMismatch`] if the carried checksum is wrong
pub fn verify(response: &str) -> Result<()> {
    let min = 1 + CHECKSUM_LEN + 1;
    let len = response.len();
    let malformed = || {
        Error::MalformedFrame(format!(
            "cannot hold a checksum: expected at least {} delimited chars, got {}",
            min, len
        ))
    };

    if len < min || !response.starts_with(FRAME_START) || !response.ends_with(FRAME_END) {
        return Err(malformed());
    }

    let split = len - 1 - CHECKSUM_LEN;
    let (Some(body), Some(received)) = (response.get(..split), response.get(split..len - 1))
    else {
        return Err(malformed());
    };

    let expected = checksum::calculate(body);
    if expected != received {
        return Err(Error::ChecksumMismatch {
            expected,
            received: received.to_string(),
        });
    }

    Ok(())
}
