//! Recipient normalization into WhatsApp JIDs.
//!
//! Accepts either a phone number (digits with an optional leading `+`,
//! spaces and punctuation tolerated) or a fully-qualified JID such as
//! `60123456789@s.whatsapp.net`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Domain appended to bare phone numbers.
pub const WHATSAPP_JID_SUFFIX: &str = "@s.whatsapp.net";

#[allow(clippy::expect_used)]
static NON_PHONE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9+]").expect("valid regex"));
#[allow(clippy::expect_used)]
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
#[allow(clippy::expect_used)]
static DIGITS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));

/// Turn a user-supplied recipient into the identifier the API expects.
///
/// `"+6012-345 6789"` becomes `"60123456789@s.whatsapp.net"`; a value that
/// already contains `@` keeps its domain and only loses whitespace.
pub fn normalize_recipient(raw: &str) -> Result<String> {
    let trimmed = raw.trim();

    if !trimmed.contains('@') {
        let stripped = NON_PHONE_CHARS.replace_all(trimmed, "");
        let number = stripped.strip_prefix('+').unwrap_or(&stripped);
        if !DIGITS_ONLY.is_match(number) {
            return Err(Error::validation(
                "Invalid `to` phone number. Use digits with optional leading \"+\" \
                 (for example: +60123456789) or a full JID like 60123456789@s.whatsapp.net",
            ));
        }
        return Ok(format!("{number}{WHATSAPP_JID_SUFFIX}"));
    }

    let jid = WHITESPACE.replace_all(trimmed, "").into_owned();
    let local = jid.split('@').next().unwrap_or_default();
    if !DIGITS_ONLY.is_match(local) {
        return Err(Error::validation(
            "Invalid `to` JID local part. Expected digits before the @ \
             (for example: 60123456789@s.whatsapp.net)",
        ));
    }
    Ok(jid)
}
