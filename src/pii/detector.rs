//! Heuristic detection of email addresses and phone numbers.
//!
//! # Design Decisions
//! - Email: the whole value must be exactly one RFC 5322 mailbox, either a
//!   bare addr-spec or `display name <addr-spec>`. Local part is a dot-atom or
//!   quoted-string; domain is a dot-atom or domain-literal. Comments and
//!   obsolete syntax are not accepted; UTF-8 is allowed in atoms (RFC 6532)
//! - Phone: the value must parse against a default region and be a valid
//!   number for that region's numbering plan
//! - Malformed input is a normal `false`, never an error

use std::panic::{self, AssertUnwindSafe};

use once_cell::sync::Lazy;
use phonenumber::country;
use regex::Regex;

const ATEXT: &str = r"A-Za-z0-9!#$%&'*+/=?^_`{|}~\-\x{80}-\x{10FFFF}";
const QUOTED_STRING: &str =
    r#""(?:[\x20\x21\x23-\x5B\x5D-\x7E\t\x{80}-\x{10FFFF}]|\\[\x20-\x7E\t])*""#;
const DOMAIN_LITERAL: &str = r"\[[\x21-\x5A\x5E-\x7E]*\]";

/// `addr-spec` or `[phrase] <addr-spec>`, anchored on both ends.
static MAILBOX: Lazy<Regex> = Lazy::new(|| {
    let dot_atom = format!("[{ATEXT}]+(?:\\.[{ATEXT}]+)*");
    let addr_spec = format!("(?:{dot_atom}|{QUOTED_STRING})@(?:{dot_atom}|{DOMAIN_LITERAL})");
    let word = format!("(?:[{ATEXT}.]+|{QUOTED_STRING})");
    let pattern = format!(
        "^(?:{addr_spec}|(?:{word}(?:[ \\t]+{word})*[ \\t]*)?<{addr_spec}>)$"
    );
    Regex::new(&pattern).unwrap()
});

/// Region used when a phone number carries no country code.
pub const DEFAULT_REGION: country::Id = country::Id::US;

/// Resolve an ISO 3166-1 alpha-2 region code (case-insensitive).
pub fn region_from_code(code: &str) -> Option<country::Id> {
    code.to_ascii_uppercase().parse::<country::Id>().ok()
}

/// Decides whether a string resembles personally identifiable information.
#[derive(Debug, Clone, Copy)]
pub struct PiiDetector {
    region: country::Id,
}

impl PiiDetector {
    /// Create a detector that assumes `region` for numbers without a country code.
    pub fn new(region: country::Id) -> Self {
        Self { region }
    }

    /// Create a detector from a region code, falling back to [`DEFAULT_REGION`].
    pub fn from_region_code(code: &str) -> Self {
        Self::new(region_from_code(code).unwrap_or(DEFAULT_REGION))
    }

    pub fn region(&self) -> country::Id {
        self.region
    }

    /// True if the whole of `value` is a single mailbox address.
    pub fn looks_like_email(&self, value: &str) -> bool {
        MAILBOX.is_match(value.trim())
    }

    /// True if `value` parses as a phone number valid in its numbering plan.
    pub fn looks_like_phone(&self, value: &str) -> bool {
        // phonenumber can panic on some malformed input; that is still "not a phone".
        let region = self.region;
        let parsed = panic::catch_unwind(AssertUnwindSafe(|| {
            phonenumber::parse(Some(region), value)
                .map(|number| phonenumber::is_valid(&number))
                .unwrap_or(false)
        }));
        parsed.unwrap_or(false)
    }

    /// True if `value` looks like an email address or a phone number.
    pub fn is_pii(&self, value: &str) -> bool {
        self.looks_like_email(value) || self.looks_like_phone(value)
    }
}

impl Default for PiiDetector {
    fn default() -> Self {
        Self::new(DEFAULT_REGION)
    }
}

/// Email check with the default detector.
pub fn looks_like_email(value: &str) -> bool {
    PiiDetector::default().looks_like_email(value)
}

/// Phone check with the default region.
pub fn looks_like_phone(value: &str) -> bool {
    PiiDetector::default().looks_like_phone(value)
}
