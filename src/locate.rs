//! Resynchronizing locator for the appended tail.
//!
//! # How it works
//!
//! The marker is plain ASCII appended verbatim, so nothing stops the same
//! byte sequence from occurring inside the carrier, inside a payload, or
//! even inside the manifest itself (a hidden file may be named after the
//! marker).  The locator therefore never trusts a bare marker hit: it takes
//! the rightmost occurrence at or below a search bound, tries to parse a
//! complete record there, and on any failure lowers the bound to that
//! candidate's position and retries.
//!
//! A candidate is rejected when:
//! - fewer than four bytes follow the marker (no length field),
//! - the length field is zero or the metadata slice would overrun the file,
//! - the metadata slice is not UTF-8 JSON.
//!
//! The record returned is always the rightmost one that is both a marker
//! occurrence and structurally decodable — the one closest to the true end
//! of intentionally appended data.  Termination is guaranteed: the bound
//! strictly decreases on every failed candidate and the search stops once
//! no marker fits below it.

use serde_json::Value;

use crate::format::{read_meta_len, MARKER, META_LEN_SIZE};

/// Rightmost occurrence of `needle` fully contained in `haystack`.
fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .rposition(|window| window == needle)
}

/// Find the rightmost structurally valid record at or below `upper_bound`.
///
/// Returns the decoded metadata and the payload slice that follows it, or
/// `None` when no candidate parses.  The payload slice is not yet checked
/// against the manifest's size sum; that is the caller's job.
pub fn find_valid_record(data: &[u8], upper_bound: usize) -> Option<(Value, &[u8])> {
    let mut search_end = upper_bound.min(data.len());
    loop {
        let marker = rfind(&data[..search_end], MARKER)?;
        search_end = marker;

        let len_start = marker + MARKER.len();
        let meta_len = match read_meta_len(&data[len_start..]) {
            Some(len) => len as usize,
            None => continue,
        };
        let meta_start = len_start + META_LEN_SIZE;
        let meta_end = match meta_start.checked_add(meta_len) {
            Some(end) if meta_len > 0 && end <= data.len() => end,
            _ => continue,
        };
        match serde_json::from_slice::<Value>(&data[meta_start..meta_end]) {
            Ok(metadata) => return Some((metadata, &data[meta_end..])),
            Err(_) => continue,
        }
    }
}
