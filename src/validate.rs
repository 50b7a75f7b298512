//! Property validation: barcode values against their symbology, text length.
//!
//! Validation failures are surfaced to the caller as typed errors and the
//! offending update is never committed, so an element's last-valid properties
//! always remain renderable. Geometric sanitation (size clamping) is *not*
//! validation and never produces an error.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

use thiserror::Error;

use crate::consts::TEXT_MAX_CHARS;
use crate::element::{ElementProps, Symbology};

/// A rejected property update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Barcode value is empty.
    #[error("{symbology:?} value must not be empty")]
    EmptyValue { symbology: Symbology },

    /// Barcode value has the wrong number of digits for its symbology.
    #[error("{symbology:?} requires {expected} digits, got {found}")]
    WrongDigitCount {
        symbology: Symbology,
        /// Human-readable digit-count requirement, e.g. `"12 or 13"`.
        expected: &'static str,
        found: usize,
    },

    /// Barcode value contains a character outside the symbology's charset.
    #[error("{symbology:?} value contains unsupported character {ch:?}")]
    InvalidCharacter { symbology: Symbology, ch: char },

    /// EAN/UPC check digit does not match the payload.
    #[error("{symbology:?} check digit mismatch: expected {expected}")]
    CheckDigitMismatch { symbology: Symbology, expected: u32 },

    /// Text content exceeds the maximum length.
    #[error("text content exceeds {TEXT_MAX_CHARS} characters ({found})")]
    TextTooLong { found: usize },
}

/// Validate a full payload. Dispatches per kind; image and shape payloads
/// have no rejectable fields (their percentages are clamped, not validated).
pub fn validate_props(props: &ElementProps) -> Result<(), ValidationError> {
    match props {
        ElementProps::Text { content, .. } => validate_text(content),
        ElementProps::Barcode { symbology, value, .. } => validate_barcode(*symbology, value),
        ElementProps::Image { .. } | ElementProps::Shape { .. } => Ok(()),
    }
}

/// Validate text content length.
pub fn validate_text(content: &str) -> Result<(), ValidationError> {
    let found = content.chars().count();
    if found > TEXT_MAX_CHARS {
        return Err(ValidationError::TextTooLong { found });
    }
    Ok(())
}

/// Validate a barcode value against its symbology's pattern.
pub fn validate_barcode(symbology: Symbology, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyValue { symbology });
    }
    match symbology {
        Symbology::Code128 => {
            // Printable ASCII only; barcoders code set B covers this range.
            match value.chars().find(|c| !(' '..='~').contains(c)) {
                Some(ch) => Err(ValidationError::InvalidCharacter { symbology, ch }),
                None => Ok(()),
            }
        }
        Symbology::Code39 => {
            const CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";
            match value.chars().find(|c| !CHARSET.contains(*c)) {
                Some(ch) => Err(ValidationError::InvalidCharacter { symbology, ch }),
                None => Ok(()),
            }
        }
        Symbology::Ean13 => validate_numeric(symbology, value, 12, 13, "12 or 13"),
        Symbology::Ean8 => validate_numeric(symbology, value, 7, 8, "7 or 8"),
        Symbology::UpcA => validate_numeric(symbology, value, 11, 12, "11 or 12"),
        Symbology::UpcE => {
            // 6 payload digits, optionally with number-system and/or check
            // digit attached. Check-digit verification needs the expanded
            // UPC-A form, so only length and charset are checked here.
            if let Some(ch) = value.chars().find(|c| !c.is_ascii_digit()) {
                return Err(ValidationError::InvalidCharacter { symbology, ch });
            }
            let len = value.len();
            if !(6..=8).contains(&len) {
                return Err(ValidationError::WrongDigitCount { symbology, expected: "6 to 8", found: len });
            }
            Ok(())
        }
        Symbology::Qrcode | Symbology::Aztec => Ok(()),
    }
}

/// Shared digits-plus-optional-check-digit rule for the EAN/UPC family.
///
/// `payload_len` digits are the data; `full_len` includes the check digit,
/// which is verified when present.
fn validate_numeric(
    symbology: Symbology,
    value: &str,
    payload_len: usize,
    full_len: usize,
    expected: &'static str,
) -> Result<(), ValidationError> {
    if let Some(ch) = value.chars().find(|c| !c.is_ascii_digit()) {
        return Err(ValidationError::InvalidCharacter { symbology, ch });
    }
    let len = value.len();
    if len != payload_len && len != full_len {
        return Err(ValidationError::WrongDigitCount { symbology, expected, found: len });
    }
    if len == full_len {
        let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();
        let check = ean_check_digit(&digits[..payload_len]);
        if digits[payload_len] != check {
            return Err(ValidationError::CheckDigitMismatch { symbology, expected: check });
        }
    }
    Ok(())
}

/// Modulo-10 check digit over the payload digits, weighted 1/3 from the
/// right as in GS1 (EAN-8, EAN-13, UPC-A).
#[must_use]
pub fn ean_check_digit(payload: &[u32]) -> u32 {
    let sum: u32 = payload
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    (10 - (sum % 10)) % 10
}
