//! Barcode preview encoding for the canvas renderer.
//!
//! Linear symbologies encode to a module run (`true` = bar) via the
//! `barcoders` crate; QR encodes to a cell matrix via the `qrcode` crate.
//! UPC-E is encoded in-crate (barcoders has no UPC-E symbology). Aztec has
//! no encoder in the stack, so its preview is a deterministic value-seeded
//! matrix with the Aztec bullseye; the export pipeline owns true Aztec
//! encoding.
//!
//! Values reaching this module have already passed
//! [`crate::validate::validate_barcode`]; encoding failures on unvalidated
//! input degrade to `None` and the renderer draws nothing.

#[cfg(test)]
#[path = "barcode_test.rs"]
mod barcode_test;

use barcoders::sym::code128::Code128;
use barcoders::sym::code39::Code39;
use barcoders::sym::ean8::EAN8;
use barcoders::sym::ean13::EAN13;
use qrcode::QrCode;

use crate::element::Symbology;
use crate::validate::ean_check_digit;

/// Encoded preview geometry for one barcode value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolPattern {
    /// One-dimensional module run; `true` modules are bars.
    Linear(Vec<bool>),
    /// Square cell matrix, row-major; `true` cells are dark.
    Matrix { size: usize, cells: Vec<bool> },
}

/// Encode `value` for preview under the given symbology.
///
/// Returns `None` when the value cannot be encoded (invalid charset or digit
/// count for the symbology).
#[must_use]
pub fn encode_preview(symbology: Symbology, value: &str) -> Option<SymbolPattern> {
    match symbology {
        Symbology::Code128 => {
            // Character set B prefix, widest printable coverage.
            let prefixed = format!("\u{0181}{value}");
            let sym = Code128::new(&prefixed).ok()?;
            Some(SymbolPattern::Linear(to_bars(&sym.encode())))
        }
        Symbology::Code39 => {
            let sym = Code39::new(value).ok()?;
            Some(SymbolPattern::Linear(to_bars(&sym.encode())))
        }
        Symbology::Ean13 => {
            let payload = digit_payload(value, 12)?;
            let sym = EAN13::new(&payload).ok()?;
            Some(SymbolPattern::Linear(to_bars(&sym.encode())))
        }
        Symbology::Ean8 => {
            let payload = digit_payload(value, 7)?;
            let sym = EAN8::new(&payload).ok()?;
            Some(SymbolPattern::Linear(to_bars(&sym.encode())))
        }
        Symbology::UpcA => {
            // A UPC-A symbol is an EAN-13 with a leading zero.
            let payload = digit_payload(value, 11)?;
            let sym = EAN13::new(&format!("0{payload}")).ok()?;
            Some(SymbolPattern::Linear(to_bars(&sym.encode())))
        }
        Symbology::UpcE => encode_upc_e(value).map(SymbolPattern::Linear),
        Symbology::Qrcode => {
            let code = QrCode::new(value.as_bytes()).ok()?;
            let size = code.width();
            let cells = code.to_colors().iter().map(|c| *c == qrcode::Color::Dark).collect();
            Some(SymbolPattern::Matrix { size, cells })
        }
        Symbology::Aztec => Some(aztec_preview(value)),
    }
}

/// barcoders emits `u8` modules (1 = bar).
fn to_bars(modules: &[u8]) -> Vec<bool> {
    modules.iter().map(|&m| m == 1).collect()
}

/// Truncate an optionally check-digited numeric value to its payload digits.
fn digit_payload(value: &str, payload_len: usize) -> Option<String> {
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if value.len() == payload_len || value.len() == payload_len + 1 {
        Some(value[..payload_len].to_owned())
    } else {
        None
    }
}

// ── UPC-E ───────────────────────────────────────────────────────

/// Digit patterns, 7 modules each. L = odd parity, G = even parity.
const UPC_L: [u8; 10] = [0b000_1101, 0b001_1001, 0b001_0011, 0b011_1101, 0b010_0011, 0b011_0001, 0b010_1111, 0b011_1011, 0b011_0111, 0b000_1011];
const UPC_G: [u8; 10] = [0b010_0111, 0b011_0011, 0b001_1011, 0b010_0001, 0b001_1101, 0b011_1001, 0b000_0101, 0b001_0001, 0b000_1001, 0b001_0111];

/// Parity selection per digit position for number system 0, keyed by the
/// check digit of the expanded UPC-A number. `true` = even parity (G).
const UPC_E_PARITY: [[bool; 6]; 10] = [
    [true, true, true, false, false, false],
    [true, true, false, true, false, false],
    [true, true, false, false, true, false],
    [true, true, false, false, false, true],
    [true, false, true, true, false, false],
    [true, false, false, true, true, false],
    [true, false, false, false, true, true],
    [true, false, true, false, true, false],
    [true, false, true, false, false, true],
    [true, false, false, true, false, true],
];

/// Encode a UPC-E value: start guard, six variable-parity digits, and the
/// six-module end guard. Accepts 6 payload digits, optionally wrapped with
/// a number-system digit and/or check digit.
fn encode_upc_e(value: &str) -> Option<Vec<bool>> {
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();
    let payload: &[u32] = match digits.len() {
        6 => &digits,
        7 | 8 => &digits[1..7],
        _ => return None,
    };

    let upc_a = expand_upc_e(payload);
    let check = ean_check_digit(&upc_a) as usize;
    let parity = UPC_E_PARITY[check];

    let mut out = Vec::with_capacity(3 + 6 * 7 + 6);
    push_bits(&mut out, 0b101, 3);
    for (i, &d) in payload.iter().enumerate() {
        let table = if parity[i] { UPC_G } else { UPC_L };
        push_bits(&mut out, u32::from(table[d as usize]), 7);
    }
    push_bits(&mut out, 0b01_0101, 6);
    Some(out)
}

/// Expand the 6 UPC-E payload digits to the 11-digit UPC-A number
/// (number system 0) whose check digit selects the parity pattern.
fn expand_upc_e(d: &[u32]) -> [u32; 11] {
    match d[5] {
        0 | 1 | 2 => [0, d[0], d[1], d[5], 0, 0, 0, 0, d[2], d[3], d[4]],
        3 => [0, d[0], d[1], d[2], 0, 0, 0, 0, 0, d[3], d[4]],
        4 => [0, d[0], d[1], d[2], d[3], 0, 0, 0, 0, 0, d[4]],
        _ => [0, d[0], d[1], d[2], d[3], d[4], 0, 0, 0, 0, d[5]],
    }
}

fn push_bits(out: &mut Vec<bool>, bits: u32, count: u32) {
    for i in (0..count).rev() {
        out.push((bits >> i) & 1 == 1);
    }
}

// ── Aztec preview ───────────────────────────────────────────────

/// Preview matrix side length. Matches a compact Aztec symbol.
const AZTEC_PREVIEW_SIZE: usize = 23;

/// A value-seeded Aztec-styled matrix: alternating bullseye rings in the
/// middle, pseudo-random data cells elsewhere. Deterministic per value so
/// the preview is stable across repaints.
fn aztec_preview(value: &str) -> SymbolPattern {
    let size = AZTEC_PREVIEW_SIZE;
    let center = (size / 2) as i64;
    let mut state = fnv1a64(value.as_bytes());
    let mut cells = Vec::with_capacity(size * size);

    for row in 0..size {
        for col in 0..size {
            let dx = (col as i64 - center).abs();
            let dy = (row as i64 - center).abs();
            let ring = dx.max(dy);
            if ring <= 4 {
                cells.push(ring % 2 == 0);
            } else {
                state = splitmix64(state);
                cells.push(state & 1 == 1);
            }
        }
    }
    SymbolPattern::Matrix { size, cells }
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
