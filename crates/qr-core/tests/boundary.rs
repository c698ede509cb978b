//! Boundary cases and end-to-end scenarios from `spec.md` §8. These check
//! structural properties (side, version, error kind, reserved-cell
//! population) rather than byte-exact golden fingerprints, since no
//! reference-implementation output was available to pin down bit-for-bit
//! expectations for this retrieval.

use qr_core::container::Compression;
use qr_core::ecc::CodeEcc;
use qr_core::error::EncodeError;
use qr_core::segment::Segment;
use qr_core::tables;
use qr_core::version::Version;
use qr_core::{encode, EncodeOptions};

#[test]
fn empty_payload_encodes_with_zero_length_data_field() {
    let symbol = encode(b"", CodeEcc::Medium, EncodeOptions::default()).unwrap();
    assert_eq!(symbol.version(), 1);
    assert_eq!(symbol.side(), 21);
}

#[test]
fn payload_exactly_filling_v1_low_numeric_capacity() {
    // V1-L has 19 data codewords = 152 bits. 41 digits in numeric mode:
    // header (4 mode + 10 char-count) + data (13 full triples * 10 bits +
    // one leftover pair * 7 bits) = 14 + 137 = 151 bits, one bit short of
    // capacity. Only the terminator (clipped to that 1 spare bit, per
    // spec.md §4.9) fits - there is no room left for even one byte of the
    // 0xEC/0x11 pad-byte sequence.
    let version = Version::new(1);
    let ecc = CodeEcc::Low;
    let digits = "1".repeat(41);
    let segment = Segment::make_numeric(&digits);
    let used_bits = Segment::get_total_bits(std::slice::from_ref(&segment), version)
        .expect("41 digits fit in a single numeric segment's char-count field at V1");
    let capacity_bits = tables::num_data_codewords(version, ecc) * 8;

    let spare_bits = capacity_bits - used_bits;
    assert_eq!(spare_bits, 1, "this payload must leave exactly one spare bit before padding");
    let terminator_bits = spare_bits.min(4);
    assert_eq!(terminator_bits, 1, "the terminator must be clipped to the single spare bit");
    let bits_after_terminator = used_bits + terminator_bits;
    assert_eq!(bits_after_terminator, capacity_bits, "terminator bit must exactly fill capacity");
    let pad_to_byte = bits_after_terminator.wrapping_neg() & 7;
    assert_eq!(pad_to_byte, 0, "no alignment padding bits are needed");
    // bits_after_terminator == capacity_bits means the 0xEC/0x11 fill loop's
    // guard (`bb.len() >= capacity_bits`) is true on its very first check, so
    // it appends zero pad bytes.

    let symbol = encode(digits.as_bytes(), ecc, EncodeOptions::default()).unwrap();
    assert_eq!(symbol.version(), 1);
}

#[test]
fn payload_exceeding_v40_high_triggers_capacity_exceeded() {
    let payload = vec![b'a'; 20_000];
    let err = encode(&payload, CodeEcc::High, EncodeOptions::default()).unwrap_err();
    assert!(matches!(err, EncodeError::CapacityExceeded { .. }));
}

#[test]
fn numeric_tail_lengths_of_one_two_three_digits_all_succeed() {
    for digits in ["1", "12", "123"] {
        let symbol = encode(digits.as_bytes(), CodeEcc::Medium, EncodeOptions::default()).unwrap();
        assert_eq!(symbol.version(), 1);
    }
}

#[test]
fn version_one_has_no_alignment_overlap_and_v32_forced_layout_succeeds() {
    let v1 = encode(b"1", CodeEcc::Low, EncodeOptions::default()).unwrap();
    assert_eq!(v1.side(), 21);

    let options = EncodeOptions {
        forced_version: Some(32),
        ..Default::default()
    };
    // Forced V32 must lay out correctly even though the payload is tiny
    // (the padded data stream fills the rest of the capacity).
    let v32 = encode(b"hello", CodeEcc::Low, options).unwrap();
    assert_eq!(v32.version(), 32);
    assert_eq!(v32.side(), 21 + 4 * 31);
}

#[test]
fn corrupted_signature_is_rejected() {
    let symbol = encode(b"corrupt me", CodeEcc::Low, EncodeOptions::default()).unwrap();
    let mut bytes = symbol.serialize(Compression::None);
    bytes[1] = 0xFF;
    let err = qr_core::MatrixContainer::deserialize(&bytes, Compression::None).unwrap_err();
    assert!(matches!(err, qr_core::CorruptSerialization::BadSignature));
}

#[test]
fn truncated_body_is_rejected() {
    let symbol = encode(b"truncate me", CodeEcc::Low, EncodeOptions::default()).unwrap();
    let mut bytes = symbol.serialize(Compression::None);
    bytes.truncate(bytes.len() / 2);
    let err = qr_core::MatrixContainer::deserialize(&bytes, Compression::None).unwrap_err();
    assert!(matches!(err, qr_core::CorruptSerialization::TruncatedStream { .. }));
}

#[test]
fn oversized_deflate_bomb_is_rejected() {
    // A highly compressible 11 MiB payload: well past the 10 MiB decompression ceiling.
    let huge_body = vec![0u8; 11 * 1024 * 1024];
    let mut encoder =
        flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::best());
    use std::io::Write;
    encoder.write_all(&huge_body).unwrap();
    let bomb = encoder.finish().unwrap();

    let err = qr_core::MatrixContainer::deserialize(&bomb, Compression::Deflate).unwrap_err();
    assert!(matches!(err, qr_core::CorruptSerialization::DecompressedTooLarge(_)));
}

#[test]
fn scenario_forced_version_five_for_short_payload() {
    let options = EncodeOptions {
        forced_version: Some(5),
        ..Default::default()
    };
    let symbol = encode(b"ABC", CodeEcc::Medium, options).unwrap();
    assert_eq!(symbol.version(), 5);
}
