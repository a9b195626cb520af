//! Identifier extraction: filename → canonical DNI/CE/passport token.
//!
//! Registrars name upload files after the student's identity document, but
//! rarely after it alone — exports from spreadsheets produce names like
//! `44428590- SOTO PEREZ.jpg` (identifier, then the student's name) and
//! `1_927720733.jpg` (row number, then the identifier). Two trimming rules
//! recover the token:
//!
//! 1. if the stem contains `-`, keep the part before the *first* hyphen;
//! 2. if the result contains `_`, keep the part after the *last* underscore.
//!
//! The hyphen rule runs strictly before the underscore rule; a stem with
//! both applies the underscore rule to the hyphen rule's output. The final
//! token is then classified by shape. Pure function, no I/O.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output filename used when no identifier resolves from the filename.
pub const SIN_ID_FILENAME: &str = "SIN_ID.jpg";

static RE_DNI: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{8}$").unwrap());
static RE_FOREIGN_CARD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{9}$").unwrap());
static RE_PASSPORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{6,12}$").unwrap());

/// A canonical identity-document number extracted from a filename.
///
/// The contained string is already canonical: digits only for
/// [`Identifier::Dni`] and [`Identifier::ForeignCard`], upper-cased
/// alphanumerics for [`Identifier::Passport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Identifier {
    /// 8-digit national identity number (DNI).
    Dni(String),
    /// 9-digit foreign-resident card number (CE).
    ForeignCard(String),
    /// 6–12 character alphanumeric passport code, upper-cased.
    Passport(String),
}

impl Identifier {
    /// The canonical token itself.
    pub fn as_str(&self) -> &str {
        match self {
            Identifier::Dni(s) | Identifier::ForeignCard(s) | Identifier::Passport(s) => s,
        }
    }

    /// Output filename for the corrected photo: `{identifier}.jpg`.
    pub fn output_filename(&self) -> String {
        format!("{}.jpg", self.as_str())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract the identity-document number encoded in `filename`.
///
/// Returns `None` when no token matching the DNI, CE, or passport shape
/// survives the trimming rules.
///
/// # Example
/// ```rust
/// use fotocheck::extract_identifier;
///
/// let id = extract_identifier("44428590- SOTO PEREZ.jpg").unwrap();
/// assert_eq!(id.as_str(), "44428590");
/// assert!(extract_identifier("abc.jpg").is_none());
/// ```
pub fn extract(filename: &str) -> Option<Identifier> {
    let stem = strip_extension(filename);

    // Hyphen rule first, underscore rule on its result. Order matters:
    // "1_44428590- SOTO.jpg" must resolve via the hyphen cut before the
    // underscore cut sees the row prefix.
    let token = match stem.split_once('-') {
        Some((before, _)) => before.trim(),
        None => stem,
    };
    let token = match token.rsplit_once('_') {
        Some((_, after)) => after.trim(),
        None => token,
    };

    classify(token)
}

/// Classify a trimmed token by shape.
///
/// Checked narrowest-first: an 8-digit token is also a valid passport shape,
/// so the digit rules must win.
fn classify(token: &str) -> Option<Identifier> {
    if RE_DNI.is_match(token) {
        Some(Identifier::Dni(token.to_string()))
    } else if RE_FOREIGN_CARD.is_match(token) {
        Some(Identifier::ForeignCard(token.to_string()))
    } else if RE_PASSPORT.is_match(token) {
        Some(Identifier::Passport(token.to_ascii_uppercase()))
    } else {
        None
    }
}

/// Drop the extension (text after the last dot), if any.
fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => filename,
    }
}
