use super::*;

fn linear(symbology: Symbology, value: &str) -> Vec<bool> {
    match encode_preview(symbology, value) {
        Some(SymbolPattern::Linear(bars)) => bars,
        other => panic!("expected linear pattern, got {other:?}"),
    }
}

fn matrix(symbology: Symbology, value: &str) -> (usize, Vec<bool>) {
    match encode_preview(symbology, value) {
        Some(SymbolPattern::Matrix { size, cells }) => (size, cells),
        other => panic!("expected matrix pattern, got {other:?}"),
    }
}

// =============================================================
// Linear symbologies
// =============================================================

#[test]
fn code39_produces_bars() {
    let bars = linear(Symbology::Code39, "LABEL-1");
    assert!(!bars.is_empty());
    assert!(bars.iter().any(|&b| b));
    assert!(bars.iter().any(|&b| !b));
}

#[test]
fn code128_produces_bars() {
    let bars = linear(Symbology::Code128, "Order #42");
    assert!(!bars.is_empty());
    // Symbols start with a bar and end with a bar.
    assert!(bars[0]);
    assert!(bars[bars.len() - 1]);
}

#[test]
fn ean13_accepts_payload_and_check_digit_forms() {
    let from_payload = linear(Symbology::Ean13, "400638133393");
    let from_full = linear(Symbology::Ean13, "4006381333931");
    assert_eq!(from_payload, from_full);
    // 3 + 42 + 5 + 42 + 3 modules.
    assert_eq!(from_payload.len(), 95);
}

#[test]
fn ean8_encodes_to_standard_width() {
    let bars = linear(Symbology::Ean8, "9638507");
    assert_eq!(bars.len(), 67);
}

#[test]
fn upc_a_encodes_via_ean13_with_leading_zero() {
    let upc = linear(Symbology::UpcA, "03600029145");
    let ean = linear(Symbology::Ean13, "003600029145");
    assert_eq!(upc, ean);
}

#[test]
fn upc_e_encodes_six_digits_with_guards() {
    let bars = linear(Symbology::UpcE, "123456");
    // 3 start + 6*7 digits + 6 end modules.
    assert_eq!(bars.len(), 51);
    assert_eq!(&bars[..3], &[true, false, true]);
    assert_eq!(&bars[45..], &[false, true, false, true, false, true]);
}

#[test]
fn upc_e_ignores_number_system_and_check_wrappers() {
    let core = linear(Symbology::UpcE, "123456");
    let with_ns = linear(Symbology::UpcE, "0123456");
    let with_both = linear(Symbology::UpcE, "01234565");
    assert_eq!(core, with_ns);
    assert_eq!(core, with_both);
}

#[test]
fn invalid_values_encode_to_none() {
    assert_eq!(encode_preview(Symbology::Ean13, "123"), None);
    assert_eq!(encode_preview(Symbology::Ean13, "40063813339x"), None);
    assert_eq!(encode_preview(Symbology::UpcE, "12345"), None);
    assert_eq!(encode_preview(Symbology::Code39, "A~B"), None);
}

// =============================================================
// Matrix symbologies
// =============================================================

#[test]
fn qr_matrix_is_square() {
    let (size, cells) = matrix(Symbology::Qrcode, "https://example.com/track?id=1");
    assert!(size >= 21);
    assert_eq!(cells.len(), size * size);
    assert!(cells.iter().any(|&c| c));
}

#[test]
fn qr_differs_per_value() {
    let (_, a) = matrix(Symbology::Qrcode, "alpha");
    let (_, b) = matrix(Symbology::Qrcode, "beta");
    assert_ne!(a, b);
}

#[test]
fn aztec_preview_is_stable_per_value() {
    let (size_a, a1) = matrix(Symbology::Aztec, "ticket:abc");
    let (_, a2) = matrix(Symbology::Aztec, "ticket:abc");
    let (_, b) = matrix(Symbology::Aztec, "ticket:xyz");
    assert_eq!(size_a, 23);
    assert_eq!(a1, a2);
    assert_ne!(a1, b);
}

#[test]
fn aztec_preview_has_bullseye_center() {
    let (size, cells) = matrix(Symbology::Aztec, "anything");
    let center = size / 2;
    let at = |r: usize, c: usize| cells[r * size + c];
    // Alternating rings out from a dark center.
    assert!(at(center, center));
    assert!(!at(center, center + 1));
    assert!(at(center, center + 2));
    assert!(!at(center, center + 3));
    assert!(at(center, center + 4));
}

// =============================================================
// UPC-E expansion
// =============================================================

#[test]
fn upc_e_expansion_rules() {
    assert_eq!(expand_upc_e(&[1, 2, 3, 4, 5, 0]), [0, 1, 2, 0, 0, 0, 0, 0, 3, 4, 5]);
    assert_eq!(expand_upc_e(&[1, 2, 3, 4, 5, 3]), [0, 1, 2, 3, 0, 0, 0, 0, 0, 4, 5]);
    assert_eq!(expand_upc_e(&[1, 2, 3, 4, 5, 4]), [0, 1, 2, 3, 4, 0, 0, 0, 0, 0, 5]);
    assert_eq!(expand_upc_e(&[1, 2, 3, 4, 5, 9]), [0, 1, 2, 3, 4, 5, 0, 0, 0, 0, 9]);
}
