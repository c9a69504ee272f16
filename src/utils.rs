use base64::{
    Engine,
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::{Rng, distr::Alphanumeric};

const STATE_LENGTH: usize = 16;

/// Characters left as-is in query values. `:` and `,` carry meaning for the
/// API (search filters, id lists). A literal `%` is always encoded.
const QUERY_VALUE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b':')
    .remove(b',');

/// Strict set used for `application/x-www-form-urlencoded` bodies and the
/// authorize url.
const FORM_VALUE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn base64_encode(bytes: &[u8], url_safe: bool) -> String {
    if url_safe {
        URL_SAFE_NO_PAD.encode(bytes)
    } else {
        STANDARD.encode(bytes)
    }
}

pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LENGTH)
        .map(char::from)
        .collect()
}

pub fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE_SET).to_string()
}

pub fn encode_form_value(value: &str) -> String {
    utf8_percent_encode(value, FORM_VALUE_SET).to_string()
}

/// Splits a comma-joined id list, trimming whitespace around each id.
///
/// An empty input yields no ids; empty entries between commas are kept so the
/// request builder can reject them.
pub fn split_ids(ids: &str) -> Vec<String> {
    if ids.trim().is_empty() {
        return Vec::new();
    }

    ids.split(',').map(|id| id.trim().to_string()).collect()
}

/// Parses a `key=value` pair from the command line.
pub fn parse_key_value(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", input)),
    }
}

pub fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Parses a local timestamp such as `2024-05-01T09:30:00`.
pub fn parse_timestamp(input: &str) -> Result<chrono::NaiveDateTime, String> {
    chrono::NaiveDateTime::parse_from_str(input.trim(), "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM:SS, got '{}': {}", input, e))
}
