//! Extended Channel Interpretation designators (`spec.md` §3, §4.3, §4.4).

use crate::bitbuffer::BitBuffer;
use crate::mode::SegmentMode;
use crate::segment::Segment;

/// Which code page a Byte-mode segment's bytes should be interpreted under.
///
/// `Default` means "no ECI header" — the QR Code reader falls back to its own
/// default interpretation (conventionally ISO-8859-1), matching
/// `spec.md` §6's character-set convention for Byte mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eci {
    Default,
    Iso8859_1,
    Iso8859_2,
    Utf8,
    /// A caller-supplied ECI assignment value not named above.
    Explicit(u32),
}

impl Default for Eci {
    fn default() -> Self {
        Eci::Default
    }
}

impl Eci {
    /// The numeric ECI assignment value this designator names, or `None` for
    /// `Default` (no ECI segment is emitted at all).
    pub fn assignment_value(self) -> Option<u32> {
        match self {
            Eci::Default => None,
            Eci::Iso8859_1 => Some(3),
            Eci::Iso8859_2 => Some(4),
            Eci::Utf8 => Some(26),
            Eci::Explicit(v) => Some(v),
        }
    }

    /// Builds the ECI designator segment (`spec.md` §3): mode indicator
    /// `0111` followed by the smallest of 8/16/24 bits that fits the
    /// assignment value.
    ///
    /// Returns `Ok(None)` for `Default` (no ECI header at all), `Ok(Some(_))`
    /// on success, or `Err(value)` when the assignment value has no
    /// representation in the 8/16/24-bit ECI header (`spec.md` §7
    /// `UnsupportedEci`).
    pub fn to_segment(self) -> Result<Option<Segment>, u32> {
        let Some(value) = self.assignment_value() else {
            return Ok(None);
        };
        let mut bb = BitBuffer(Vec::with_capacity(24));
        if value < (1 << 7) {
            bb.append_bits(value, 8);
        } else if value < (1 << 14) {
            bb.append_bits(0b10, 2);
            bb.append_bits(value, 14);
        } else if value < 1_000_000 {
            bb.append_bits(0b110, 3);
            bb.append_bits(value, 21);
        } else {
            return Err(value);
        }
        Ok(Some(Segment::new(SegmentMode::Eci, 0, bb.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_segment() {
        assert!(Eci::Default.to_segment().unwrap().is_none());
    }

    #[test]
    fn named_designators_map_to_documented_values() {
        assert_eq!(Eci::Iso8859_1.assignment_value(), Some(3));
        assert_eq!(Eci::Iso8859_2.assignment_value(), Some(4));
        assert_eq!(Eci::Utf8.assignment_value(), Some(26));
    }

    #[test]
    fn out_of_range_explicit_value_is_unsupported() {
        assert_eq!(Eci::Explicit(1_000_000).to_segment(), Err(1_000_000));
    }

    #[test]
    fn header_width_grows_with_assignment_value() {
        let small = Eci::Explicit(5).to_segment().unwrap().unwrap();
        assert_eq!(small.data().len(), 8);

        let mid = Eci::Explicit(1000).to_segment().unwrap().unwrap();
        assert_eq!(mid.data().len(), 16);

        let large = Eci::Explicit(999_999).to_segment().unwrap().unwrap();
        assert_eq!(large.data().len(), 24);
    }
}
