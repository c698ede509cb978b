//! Arithmetic in GF(256) under the QR Code primitive polynomial
//! `x^8 + x^4 + x^3 + x^2 + 1` (0x11D), generator element `0x02`.
//!
//! The exponent/log tables are process-wide immutable singletons (`spec.md`
//! §5, §9): built once behind a `std::sync::OnceLock`, the same idiom the
//! pack uses elsewhere for lazily-initialized statics
//! (`eljojo-estrella/src/preview/ttf_font.rs`), and read-only afterward.

use std::sync::OnceLock;

const PRIMITIVE_POLY: u16 = 0x11D;

struct Tables {
    exp: [u8; 256],
    log: [u8; 256],
}

fn build_tables() -> Tables {
    let mut exp = [0u8; 256];
    let mut log = [0u8; 256];
    let mut x: u16 = 1;
    for i in 0..255usize {
        exp[i] = x as u8;
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLY;
        }
    }
    // exp[255] duplicates exp[0] so that exp_of() never needs to reduce mod 255 twice.
    exp[255] = exp[0];
    Tables { exp, log }
}

fn tables() -> &'static Tables {
    static TABLES: OnceLock<Tables> = OnceLock::new();
    TABLES.get_or_init(build_tables)
}

/// Returns `2^k` in GF(256), for `k` in `0..=255`.
pub fn exp_of(k: u8) -> u8 {
    tables().exp[k as usize]
}

/// Returns `log_2(x)` in GF(256). Requires `x != 0`.
pub fn log_of(x: u8) -> u8 {
    debug_assert!(x != 0, "log of zero is undefined in GF(256)");
    tables().log[x as usize]
}

/// Multiplies two GF(256) field elements.
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        0
    } else {
        let sum = u16::from(log_of(a)) + u16::from(log_of(b));
        exp_of((sum % 255) as u8)
    }
}

/// Multiplies two polynomials over GF(256), each given as coefficients in
/// descending degree order, returning the product in the same order.
pub fn poly_multiply(p: &[u8], q: &[u8]) -> Vec<u8> {
    let mut result = vec![0u8; p.len() + q.len() - 1];
    for (i, &pi) in p.iter().enumerate() {
        if pi == 0 {
            continue;
        }
        for (j, &qj) in q.iter().enumerate() {
            result[i + j] ^= mul(pi, qj);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_log_are_inverses() {
        for x in 1u16..=255 {
            let x = x as u8;
            assert_eq!(exp_of(log_of(x)), x, "exp_of(log_of({x})) must equal {x}");
        }
    }

    #[test]
    fn mul_by_zero_is_zero() {
        assert_eq!(mul(0, 200), 0);
        assert_eq!(mul(200, 0), 0);
    }

    #[test]
    fn mul_is_commutative_and_matches_peasant_multiplication() {
        fn russian_peasant(x: u8, y: u8) -> u8 {
            let mut z: u8 = 0;
            for i in (0..8).rev() {
                z = (z << 1) ^ ((z >> 7) * 0x1D);
                z ^= ((y >> i) & 1) * x;
            }
            z
        }
        for a in (0u16..256).step_by(7) {
            for b in (0u16..256).step_by(11) {
                let (a, b) = (a as u8, b as u8);
                assert_eq!(mul(a, b), mul(b, a));
                assert_eq!(mul(a, b), russian_peasant(a, b));
            }
        }
    }

    #[test]
    fn poly_multiply_degree_and_identity() {
        let p = [1u8, 2, 3];
        let q = [1u8];
        assert_eq!(poly_multiply(&p, &q), vec![1, 2, 3]);

        let r = poly_multiply(&[1, 0], &[1, 0]);
        assert_eq!(r.len(), 3);
    }
}
