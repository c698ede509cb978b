//! Reed-Solomon error-correction codeword generation over GF(256).
//!
//! `spec.md` §4.5: the generator polynomial `G(x) = prod_{i=0..k-1} (x - a^i)`
//! is deterministic per `k` (the number of EC codewords a block needs), so it
//! is cached process-wide the same way the GF(256) tables are (`gf256.rs`):
//! a `std::sync::OnceLock` guarding a `Mutex<HashMap<...>>`, giving any-writer/
//! any-reader safety with identical entries regardless of which caller wins
//! the race to populate a given `k` (the computation is pure).

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use crate::gf256;

fn generator_cache() -> &'static Mutex<HashMap<u8, Vec<u8>>> {
    static CACHE: OnceLock<Mutex<HashMap<u8, Vec<u8>>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Returns the degree-`degree` Reed-Solomon generator polynomial, coefficients
/// in descending degree order with the leading (degree-`degree`) coefficient
/// of 1 implied and omitted, i.e. `degree` coefficients total.
pub fn generator_polynomial(degree: u8) -> Vec<u8> {
    assert!((1..=30).contains(&degree), "EC codeword count out of range");

    if let Some(cached) = generator_cache().lock().unwrap().get(&degree) {
        return cached.clone();
    }

    let poly = compute_generator_polynomial(degree);
    generator_cache()
        .lock()
        .unwrap()
        .entry(degree)
        .or_insert(poly)
        .clone()
}

fn compute_generator_polynomial(degree: u8) -> Vec<u8> {
    // Coefficients stored highest-to-lowest power, excluding the leading term
    // which is always 1. For example x^3 + 255x^2 + 8x + 93 is [255, 8, 93].
    let degree = degree as usize;
    let mut result = vec![0u8; degree - 1];
    result.push(1);

    // Multiply the running product by (x - root) for root = a^0, a^1, ..., a^{degree-1}.
    // a = 0x02, the generator element of this field.
    let mut root: u8 = 1;
    for _ in 0..degree {
        for j in 0..degree {
            result[j] = gf256::mul(result[j], root);
            if j + 1 < result.len() {
                result[j] ^= result[j + 1];
            }
        }
        root = gf256::mul(root, 0x02);
    }
    result
}

/// Computes the `divisor.len()` error-correction codewords for one data block,
/// via polynomial long division of `data * x^divisor.len()` by the generator
/// polynomial `divisor`, all arithmetic in GF(256).
pub fn compute_remainder(data: &[u8], divisor: &[u8]) -> Vec<u8> {
    let mut result = vec![0u8; divisor.len()];
    for &b in data {
        let factor = b ^ result.remove(0);
        result.push(0);
        for (coeff, &div_coeff) in result.iter_mut().zip(divisor.iter()) {
            *coeff ^= gf256::mul(div_coeff, factor);
        }
    }
    result
}
