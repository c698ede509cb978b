//! The encoder's output object (`spec.md` §4.10, §6): a module grid plus
//! version, with a bit-exact serialization and optional DEFLATE/GZIP
//! wrapping via `flate2` (the crate the teacher's sibling `qr-render-png`
//! already pulls in for PNG's own DEFLATE stream, so the dependency is
//! already part of this workspace's stack).

use std::io::{Read, Write};

use flate2::read::{DeflateDecoder, GzDecoder};
use flate2::write::{DeflateEncoder, GzEncoder};
use flate2::Compression as FlateLevel;

use crate::error::CorruptSerialization;
use crate::matrix::QrCode;
use crate::version::Version;

const SIGNATURE: [u8; 4] = [0x51, 0x52, 0x52, 0x00];
const MIN_SIDE: u16 = 21;
const MAX_SIDE: u16 = 177;
const MAX_DECOMPRESSED_BYTES: usize = 10 * 1024 * 1024;

/// How a serialized matrix is wrapped. Selected by the caller on both ends;
/// deserialization does not attempt to auto-detect the wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Deflate,
    GZip,
}

/// The renderer-facing output of [`crate::encode::encode`] (`spec.md` §6):
/// a finished module grid plus its version, with no further encoder state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixContainer {
    version: Version,
    side: usize,
    // Row-major, true = dark.
    modules: Vec<bool>,
}

impl MatrixContainer {
    pub(crate) fn from_qr_code(qr: &QrCode) -> Self {
        let side = qr.size() as usize;
        let mut modules = Vec::with_capacity(side * side);
        for row in 0..side as i32 {
            for col in 0..side as i32 {
                modules.push(qr.get_module(col, row));
            }
        }
        Self {
            version: qr.version(),
            side,
            modules,
        }
    }

    /// The QR Code version, 1..=40.
    pub fn version(&self) -> u8 {
        self.version.value()
    }

    /// The matrix side length in modules, `21 + 4*(version-1)`.
    pub fn side(&self) -> usize {
        self.side
    }

    /// The color of the module at `(row, col)`: `true` for dark.
    ///
    /// Panics if either coordinate is out of `[0, side)`.
    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        assert!(row < self.side && col < self.side, "module coordinate out of range");
        self.modules[row * self.side + col]
    }

    /// Serializes the matrix to the wire format from `spec.md` §6: a 4-byte
    /// signature, a side-length byte, then the modules packed MSB-first,
    /// row-major, padded with zero bits to a byte boundary. `compression`
    /// wraps the whole byte string, header included.
    pub fn serialize(&self, compression: Compression) -> Vec<u8> {
        let mut body = Vec::with_capacity(5 + (self.side * self.side).div_ceil(8));
        body.extend_from_slice(&SIGNATURE);
        body.push(self.side as u8);

        let mut acc: u8 = 0;
        let mut bits_in_acc = 0u8;
        for &m in &self.modules {
            acc = (acc << 1) | u8::from(m);
            bits_in_acc += 1;
            if bits_in_acc == 8 {
                body.push(acc);
                acc = 0;
                bits_in_acc = 0;
            }
        }
        if bits_in_acc > 0 {
            body.push(acc << (8 - bits_in_acc));
        }

        match compression {
            Compression::None => body,
            Compression::Deflate => {
                let mut encoder = DeflateEncoder::new(Vec::new(), FlateLevel::default());
                encoder.write_all(&body).expect("writing to an in-memory buffer cannot fail");
                encoder.finish().expect("finishing an in-memory DEFLATE stream cannot fail")
            }
            Compression::GZip => {
                let mut encoder = GzEncoder::new(Vec::new(), FlateLevel::default());
                encoder.write_all(&body).expect("writing to an in-memory buffer cannot fail");
                encoder.finish().expect("finishing an in-memory GZIP stream cannot fail")
            }
        }
    }

    /// Parses a byte string produced by [`MatrixContainer::serialize`] with
    /// the matching [`Compression`] variant.
    pub fn deserialize(bytes: &[u8], compression: Compression) -> Result<Self, CorruptSerialization> {
        let body = match compression {
            Compression::None => bytes.to_vec(),
            Compression::Deflate => {
                let mut decoder = DeflateDecoder::new(bytes).take(MAX_DECOMPRESSED_BYTES as u64 + 1);
                let mut out = Vec::new();
                decoder
                    .read_to_end(&mut out)
                    .map_err(|e| CorruptSerialization::Decompression(e.to_string()))?;
                if out.len() > MAX_DECOMPRESSED_BYTES {
                    return Err(CorruptSerialization::DecompressedTooLarge(out.len()));
                }
                out
            }
            Compression::GZip => {
                let mut decoder = GzDecoder::new(bytes).take(MAX_DECOMPRESSED_BYTES as u64 + 1);
                let mut out = Vec::new();
                decoder
                    .read_to_end(&mut out)
                    .map_err(|e| CorruptSerialization::Decompression(e.to_string()))?;
                if out.len() > MAX_DECOMPRESSED_BYTES {
                    return Err(CorruptSerialization::DecompressedTooLarge(out.len()));
                }
                out
            }
        };

        if body.len() < 5 || body[0..4] != SIGNATURE {
            return Err(CorruptSerialization::BadSignature);
        }
        let side = u16::from(body[4]);
        if !(MIN_SIDE..=MAX_SIDE).contains(&side) || (side - MIN_SIDE) % 4 != 0 {
            return Err(CorruptSerialization::ImplausibleSide(side));
        }
        let side = side as usize;
        let version = Version::new(((side - 21) / 4 + 1) as u8);

        let needed_bits = side * side;
        let available_bits = body.len().saturating_sub(5) * 8;
        if available_bits < needed_bits {
            return Err(CorruptSerialization::TruncatedStream {
                expected: needed_bits,
                found: available_bits,
            });
        }

        let packed = &body[5..];
        let mut modules = Vec::with_capacity(needed_bits);
        for i in 0..needed_bits {
            let byte = packed[i / 8];
            let bit = (byte >> (7 - (i % 8))) & 1;
            modules.push(bit != 0);
        }

        Ok(Self { version, side, modules })
    }
}
