//! Top-level encoder entry point (`spec.md` §6): orchestrates the mode
//! analyzer, bit-stream builder, block interleaver, matrix layout, mask
//! scorer, and format/version writer behind one call.

use crate::bitbuffer::BitBuffer;
use crate::container::MatrixContainer;
use crate::ecc::CodeEcc;
use crate::eci::Eci;
use crate::error::EncodeError;
use crate::matrix::QrCode;
use crate::mode::SegmentMode;
use crate::segment::Segment;
use crate::tables;
use crate::version::Version;

/// Knobs accepted by [`encode`], matching `spec.md` §6's conceptual signature.
///
/// `force_utf8_byte_mode` is the documented knob from Open Question 1
/// (`spec.md` §9): forces Byte mode + UTF-8 transcoding even when the payload
/// would otherwise qualify for a more compact Numeric/Alphanumeric encoding.
/// Default behavior always prefers the smallest-capacity mode the payload
/// qualifies for.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    pub force_utf8_byte_mode: bool,
    pub utf8_bom: bool,
    pub eci: Eci,
    /// Forces a specific version instead of searching for the smallest one
    /// that fits. `CapacityExceeded` is raised if the payload does not fit
    /// at this version.
    pub forced_version: Option<u8>,
}

/// Encodes `payload` into a finished QR Code symbol (`spec.md` §6).
///
/// `payload` is interpreted as UTF-8 text when possible (driving the
/// Numeric/Alphanumeric/Byte mode analyzer over code points); payloads that
/// are not valid UTF-8 are always encoded in Byte mode using the raw bytes
/// as given (the standard's "Latin-1 unless told otherwise" convention,
/// `spec.md` §6).
///
/// Mask selection is always automatic; this entry point never takes a mask
/// override (`spec.md` §6).
pub fn encode(
    payload: &[u8],
    ecc: CodeEcc,
    options: EncodeOptions,
) -> Result<MatrixContainer, EncodeError> {
    let segments = build_segments(payload, &options)?;

    let min_version = options
        .forced_version
        .map(Version::new)
        .unwrap_or(Version::MIN);
    let max_version = options.forced_version.map(Version::new).unwrap_or(Version::MAX);

    let mut version = min_version;
    let data_used_bits = loop {
        let capacity_bits = tables::num_data_codewords(version, ecc) * 8;
        let used = Segment::get_total_bits(&segments, version);
        tracing::trace!(
            version = version.value(),
            capacity_bits,
            used_bits = ?used,
            "checked version capacity"
        );
        match used {
            Some(n) if n <= capacity_bits => break n,
            _ if version >= max_version => {
                let data_bits = used.unwrap_or(usize::MAX);
                tracing::debug!(
                    version = version.value(),
                    data_bits,
                    capacity_bits,
                    "payload exceeds capacity at the highest usable version"
                );
                return Err(EncodeError::CapacityExceeded { data_bits, capacity_bits });
            }
            _ => version = Version::new(version.value() + 1),
        }
    };
    tracing::debug!(version = version.value(), ?ecc, "selected version");

    let mut bb = BitBuffer(Vec::new());
    for seg in &segments {
        bb.append_bits(seg.mode().mode_bits(), 4);
        bb.append_bits(
            u32::try_from(seg.num_chars()).expect("segment char count fits in a u32"),
            seg.mode().num_char_count_bits(version),
        );
        bb.0.extend_from_slice(seg.data());
    }
    debug_assert_eq!(bb.0.len(), data_used_bits);

    let capacity_bits = tables::num_data_codewords(version, ecc) * 8;
    let terminator_bits = std::cmp::min(4, capacity_bits - bb.0.len());
    bb.append_bits(0, u8::try_from(terminator_bits).unwrap());
    let pad_to_byte = bb.0.len().wrapping_neg() & 7;
    bb.append_bits(0, u8::try_from(pad_to_byte).unwrap());
    debug_assert_eq!(bb.0.len() % 8, 0);

    for &pad_byte in [0xECu32, 0x11].iter().cycle() {
        if bb.0.len() >= capacity_bits {
            break;
        }
        bb.append_bits(pad_byte, 8);
    }

    let mut data_codewords = vec![0u8; bb.0.len() / 8];
    for (i, &bit) in bb.0.iter().enumerate() {
        data_codewords[i >> 3] |= u8::from(bit) << (7 - (i & 7));
    }

    let qr = QrCode::encode_codewords(version, ecc, &data_codewords, None)?;
    Ok(MatrixContainer::from_qr_code(&qr))
}

// Mode analysis + ECI handling (spec.md §4.3): returns the ordered segment
// list (optional ECI designator, then the single data segment).
fn build_segments(payload: &[u8], options: &EncodeOptions) -> Result<Vec<Segment>, EncodeError> {
    let text = std::str::from_utf8(payload).ok();

    let use_byte_mode = options.force_utf8_byte_mode
        || match text {
            Some(t) => !Segment::is_numeric(t) && !Segment::is_alphanumeric(t),
            None => true,
        };

    let mut eci = options.eci;
    let main_segment = if !use_byte_mode {
        let t = text.expect("non-byte modes only chosen for valid UTF-8 text");
        if Segment::is_numeric(t) {
            Segment::make_numeric(t)
        } else {
            Segment::make_alphanumeric(t)
        }
    } else {
        let mut bytes = match text {
            Some(t) if options.force_utf8_byte_mode || !t.is_ascii() => {
                if matches!(eci, Eci::Default) {
                    eci = Eci::Utf8;
                }
                t.as_bytes().to_vec()
            }
            _ => payload.to_vec(),
        };
        if options.utf8_bom && matches!(eci, Eci::Utf8) {
            let mut with_bom = vec![0xEF, 0xBB, 0xBF];
            with_bom.append(&mut bytes);
            bytes = with_bom;
        }
        Segment::make_bytes(&bytes)
    };

    let mut segments = Vec::with_capacity(2);
    if matches!(main_segment.mode(), SegmentMode::Byte) {
        if let Some(eci_segment) = eci
            .to_segment()
            .map_err(|v| EncodeError::UnsupportedEci(format!("assignment value {v}")))?
        {
            segments.push(eci_segment);
        }
    }
    segments.push(main_segment);
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_encodes_at_version_one() {
        let symbol = encode(b"", CodeEcc::Medium, EncodeOptions::default()).unwrap();
        assert_eq!(symbol.version(), 1);
        assert_eq!(symbol.side(), 21);
    }

    #[test]
    fn numeric_payload_prefers_numeric_mode() {
        let symbol = encode(b"12345", CodeEcc::Low, EncodeOptions::default()).unwrap();
        assert_eq!(symbol.version(), 1);
    }

    #[test]
    fn alphanumeric_payload_fits_at_version_one() {
        let symbol = encode(b"HELLO WORLD", CodeEcc::Quartile, EncodeOptions::default()).unwrap();
        assert_eq!(symbol.version(), 1);
    }

    #[test]
    fn byte_payload_with_unencodable_characters_is_accepted() {
        let symbol = encode(
            b"This is a quick test! 123#?",
            CodeEcc::High,
            EncodeOptions::default(),
        )
        .unwrap();
        assert!((1..=5).contains(&symbol.version()));
    }

    #[test]
    fn forced_version_is_honored_even_when_unnecessary() {
        let options = EncodeOptions {
            forced_version: Some(5),
            ..Default::default()
        };
        let symbol = encode(b"ABC", CodeEcc::Medium, options).unwrap();
        assert_eq!(symbol.version(), 5);
    }

    #[test]
    fn over_capacity_payload_is_rejected() {
        // spec.md §8 scenario 5: one byte past the V40-L byte-mode ceiling.
        let payload = vec![b'a'; 2954];
        let err = encode(&payload, CodeEcc::Low, EncodeOptions::default()).unwrap_err();
        assert!(matches!(err, EncodeError::CapacityExceeded { .. }));
    }

    #[test]
    fn max_capacity_byte_payload_succeeds_at_v40() {
        // Lowercase letters fall outside the alphanumeric set, forcing Byte mode.
        let payload = vec![b'a'; 2953];
        let symbol = encode(&payload, CodeEcc::Low, EncodeOptions::default()).unwrap();
        assert_eq!(symbol.version(), 40);
    }
}
