//! Encodes text and binary payloads into QR Code Model 2 symbols.
//!
//! This crate covers the encoder half of the standard only: segmentation,
//! Reed-Solomon error correction, matrix layout, masking, and a serializable
//! module-grid container. It does not decode symbols, draw pixels, or read
//! images — `qr-render-png` is a thin example consumer that does the latter.
//!
//! # Examples
//!
//! ```
//! use qr_core::encode::encode;
//! use qr_core::ecc::CodeEcc;
//!
//! let symbol = encode(b"Hello, world!", CodeEcc::Medium, Default::default()).unwrap();
//! for row in 0..symbol.side() {
//!     for col in 0..symbol.side() {
//!         let _dark = symbol.is_dark(row, col);
//!     }
//! }
//! ```

pub mod bitbuffer;
pub mod container;
pub mod ecc;
pub mod eci;
pub mod encode;
pub mod error;
pub mod finder_penalty;
mod gf256;
pub mod mask;
pub mod matrix;
pub mod mode;
mod reed_solomon;
pub mod segment;
pub mod tables;
pub mod version;

pub use container::MatrixContainer;
pub use ecc::CodeEcc;
pub use eci::Eci;
pub use encode::{encode, EncodeOptions};
pub use error::{CorruptSerialization, EncodeError};
pub use mask::Mask;
pub use mode::SegmentMode;
pub use segment::Segment;
pub use version::Version;
