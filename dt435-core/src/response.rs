//! Reply decoders
//!
//! One decoder per reply shape. Every decoder maps the `(0)` sentinel to
//! [`Reading::NoData`] before looking at the body, and degrades to partial
//! records instead of failing when a body is short but still carries its tag.

use dt435_types::{
    CalendarReading, IdentifierRecord, NozzleStatus, Reading, StatusVector, SupplyIdentified,
    SupplyRecord, TotalReading, VisualizationEntry,
};
use tracing::trace;

use crate::{
    constants::{CHECKSUM_LEN, MAX_NOZZLES},
    error::{Error, Result},
    frame,
    layout::{self, Layout},
};

/// Strip the frame and reject bodies that are not plain ASCII
fn body<'a>(kind: &'static str, response: &'a str, trailing: usize) -> Result<&'a str> {
    let body = frame::strip(response, trailing)?;
    if !body.is_ascii() {
        return Err(Error::MalformedResponse {
            kind,
            reason: "body contains non-ASCII characters".into(),
        });
    }
    trace!(kind = kind, body = body, "Stripped reply");
    Ok(body)
}

fn too_short(layout: &Layout, min: usize, actual: usize) -> Error {
    Error::MalformedResponse {
        kind: layout.kind,
        reason: format!("body has {} chars, need at least {}", actual, min),
    }
}

/// Decode a supply record (`&A`)
///
/// Fields the body is too short to carry stay `None`.
pub fn supply(response: &str) -> Result<Reading<SupplyRecord>> {
    if frame::is_no_data(response) {
        return Ok(Reading::NoData);
    }

    let body = body(layout::SUPPLY.kind, response, CHECKSUM_LEN)?;
    let fields = layout::SUPPLY.extract(body);

    Ok(Reading::Value(SupplyRecord {
        total_to_pay: fields.owned("total_to_pay"),
        volume: fields.owned("volume"),
        price: fields.owned("price"),
        comma_code: fields.owned("comma_code"),
        supply_time: fields.owned("supply_time"),
        nozzle: fields.owned("nozzle"),
        day: fields.owned("day"),
        hour: fields.owned("hour"),
        minute: fields.owned("minute"),
        month: fields.owned("month"),
        record: fields.owned("record"),
        final_total: fields.owned("final_total"),
        status: fields.owned("status"),
    }))
}

/// Decode an identified supply record
///
/// The identified reply carries one more header byte than the basic one. A
/// body shorter than the full layout yields an empty record.
pub fn supply_identified(response: &str) -> Result<Reading<SupplyIdentified>> {
    if frame::is_no_data(response) {
        return Ok(Reading::NoData);
    }

    let body = body(layout::SUPPLY_IDENTIFIED.kind, response, CHECKSUM_LEN)?;
    let body = body.get(1..).unwrap_or_default();
    let fields = layout::SUPPLY_IDENTIFIED.extract(body);

    Ok(Reading::Value(SupplyIdentified {
        total: fields.owned("total"),
        volume: fields.owned("volume"),
        price: fields.owned("price"),
        nozzle: fields.owned("nozzle"),
        identifier: fields.owned("identifier"),
    }))
}

/// Decode the visualization list (`(&V)`)
///
/// The body is a run of 8-char windows; a trailing partial window is dropped.
pub fn visualization(response: &str) -> Result<Reading<Vec<VisualizationEntry>>> {
    if frame::is_no_data(response) {
        return Ok(Reading::NoData);
    }

    let layout = layout::VISUALIZATION_ENTRY;
    let window = layout.full_len();
    let body = body(layout.kind, response, 0)?;

    let entries = body
        .as_bytes()
        .chunks_exact(window)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .filter_map(|chunk| {
            let fields = layout.extract(chunk);
            Some(VisualizationEntry::new(
                fields.get("nozzle")?,
                fields.get("value")?,
            ))
        })
        .collect();

    Ok(Reading::Value(entries))
}

/// Decode the nozzle status vector (`(&S)`)
///
/// The first body char is a tag; up to 32 one-char codes follow, one per
/// nozzle position starting at 1.
pub fn status(response: &str) -> Result<Reading<StatusVector>> {
    if frame::is_no_data(response) {
        return Ok(Reading::NoData);
    }

    let body = body("status", response, 0)?;
    if body.is_empty() {
        return Err(Error::MalformedResponse {
            kind: "status",
            reason: "missing status tag".into(),
        });
    }

    let nozzles = body
        .chars()
        .skip(1)
        .take(MAX_NOZZLES)
        .zip(1u8..)
        .map(|(code, position)| NozzleStatus::new(position, code))
        .collect();

    Ok(Reading::Value(StatusVector { nozzles }))
}

/// Decode a total or price reading (`&T`)
pub fn total(response: &str) -> Result<Reading<TotalReading>> {
    if frame::is_no_data(response) {
        return Ok(Reading::NoData);
    }

    let layout = layout::TOTAL;
    let body = body(layout.kind, response, CHECKSUM_LEN)?;
    let head = layout.full_len();
    if body.len() < head {
        return Err(too_short(&layout, head, body.len()));
    }

    let fields = layout.extract(body);
    let (Some(mode), Some(nozzle)) = (fields.get("mode"), fields.get("nozzle")) else {
        return Err(too_short(&layout, head, body.len()));
    };

    Ok(Reading::Value(TotalReading {
        mode: mode.chars().next().unwrap_or_default(),
        nozzle: nozzle.to_string(),
        value: body[head..].to_string(),
    }))
}

/// Decode an identifier record (`?A`, `?LF`)
pub fn identifier(response: &str) -> Result<Reading<IdentifierRecord>> {
    if frame::is_no_data(response) {
        return Ok(Reading::NoData);
    }

    let payload = body("identifier", response, CHECKSUM_LEN)?;
    Ok(Reading::Value(IdentifierRecord {
        payload: payload.to_string(),
    }))
}

/// Decode a clock reading (`(&R)`, `&KR1`)
pub fn calendar(response: &str) -> Result<Reading<CalendarReading>> {
    if frame::is_no_data(response) {
        return Ok(Reading::NoData);
    }

    let text = body("calendar", response, 0)?;
    Ok(Reading::Value(CalendarReading {
        text: text.to_string(),
    }))
}
