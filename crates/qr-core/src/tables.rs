//! Static per-(version, ECC-level) capacity tables (`spec.md` §4.2). These are
//! data, reproduced verbatim from ISO/IEC 18004; any deviation breaks
//! bit-exact compatibility with other encoders/decoders.

use crate::ecc::CodeEcc;
use crate::version::Version;

/// The set of all legal characters in alphanumeric mode, where each
/// character's position in the string is its 0..44 value.
pub static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

// Penalty weights used by get_penalty_score() when evaluating mask candidates (spec.md §4.8).
pub const PENALTY_N1: i32 = 3;
pub const PENALTY_N2: i32 = 3;
pub const PENALTY_N3: i32 = 40;
pub const PENALTY_N4: i32 = 10;

pub static ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    // Version: (index 0 is padding and illegal)
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

pub static NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    // Version: (index 0 is padding and illegal)
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

// Returns an entry from one of the two 4x41 tables above.
pub fn table_get(table: &'static [[i8; 41]; 4], ver: Version, ecl: CodeEcc) -> usize {
    table[ecl.ordinal()][usize::from(ver.value())] as usize
}

/// Returns the number of data + error-correction 8-bit codewords that fit a
/// symbol of the given version, excluding remainder bits (`spec.md` §4.2).
/// Equivalent to the official per-version raw-module count divided by 8; kept
/// as a closed-form expression rather than a 40-entry table, as the teacher
/// does, since the two are provably identical for this structure.
pub fn num_raw_data_modules(ver: Version) -> usize {
    let v = usize::from(ver.value());
    let mut result: usize = (16 * v + 128) * v + 64;
    if v >= 2 {
        let num_align = v / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if v >= 7 {
            result -= 36;
        }
    }
    debug_assert!((208..=29648).contains(&result));
    result
}

/// Returns the number of 8-bit data (non-EC) codewords available at the
/// given version and ECC level, remainder bits discarded.
pub fn num_data_codewords(ver: Version, ecl: CodeEcc) -> usize {
    num_raw_data_modules(ver) / 8
        - table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl) * table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl)
}

/// Returns the number of trailing zero bits appended after the interleaved
/// codeword stream (`spec.md` §3, §4.6): `raw_data_modules(ver) mod 8`.
pub fn remainder_bits(ver: Version) -> usize {
    num_raw_data_modules(ver) % 8
}

/// Returns the ascending list of alignment-pattern center coordinates for the
/// given version (empty for V1), on a symbol of the given side length.
pub fn alignment_pattern_positions(ver: Version, size: i32) -> Vec<i32> {
    let v = ver.value();
    if v == 1 {
        return vec![];
    }
    let num_align = i32::from(v) / 7 + 2;
    let step: i32 = if v == 32 {
        26
    } else {
        (i32::from(v) * 4 + num_align * 2 + 1) / (num_align * 2 - 2) * 2
    };
    let mut result: Vec<i32> = (0..num_align - 1).map(|i| size - 7 - i * step).collect();
    result.push(6);
    result.reverse();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_layout_invariant_holds_for_every_version_and_ecc() {
        // spec.md §3: g1*g1_data + g2*g2_data = total_data_codewords(V, ECC).
        for v in 1u8..=40 {
            let ver = Version::new(v);
            for &ecl in &[CodeEcc::Low, CodeEcc::Medium, CodeEcc::Quartile, CodeEcc::High] {
                let num_blocks = table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl);
                let ec_per_block = table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl);
                let raw_codewords = num_raw_data_modules(ver) / 8;
                let num_short_blocks = num_blocks - raw_codewords % num_blocks;
                let short_block_data_len = raw_codewords / num_blocks - ec_per_block;

                let total_data: usize = (0..num_blocks)
                    .map(|i| short_block_data_len + usize::from(i >= num_short_blocks))
                    .sum();
                assert_eq!(total_data, num_data_codewords(ver, ecl));
            }
        }
    }

    #[test]
    fn v1_has_no_alignment_patterns() {
        assert!(alignment_pattern_positions(Version::new(1), 21).is_empty());
    }

    #[test]
    fn v32_has_nine_alignment_pattern_placements() {
        // 7 centers per axis, minus the 3 finder-corner combinations, is 46;
        // spec.md §8 calls out V32 as the version with 9 *distinct step
        // positions excluding the timing-track one* - what matters here is
        // that the formula reproduces the standard's documented 7-entry list.
        let centers = alignment_pattern_positions(Version::new(32), 21 + 4 * 31);
        assert_eq!(centers, vec![6, 34, 60, 86, 112, 138, 164]);
    }

    #[test]
    fn remainder_bits_are_in_documented_range() {
        for v in 1u8..=40 {
            assert!(remainder_bits(Version::new(v)) <= 7);
        }
    }
}
