use thiserror::Error;

/// Failure modes of [`crate::encode`] and the other encode-time entry points.
///
/// Mirrors `q-rs-png::error::QrPngError`'s shape (a `thiserror`-derived,
/// `#[non_exhaustive]` enum) one layer down, for the core encoder itself.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum EncodeError {
    /// The payload does not fit at the highest version (40, or `forced_version`
    /// if one was given) for the requested error correction level.
    #[error("data length = {data_bits} bits, capacity at the highest usable version = {capacity_bits} bits")]
    CapacityExceeded { data_bits: usize, capacity_bits: usize },

    /// An explicit mode was forced by the caller but the payload contains
    /// characters that mode cannot encode.
    #[error("input is not encodable in the requested mode: {0}")]
    InvalidInput(String),

    /// An ECI designator was selected but no code page could be located for it.
    #[error("unsupported ECI designator: {0}")]
    UnsupportedEci(String),

    /// A post-condition the encoder itself is responsible for failed. This is
    /// always a programming error in this crate, never a caller mistake.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolated(String),
}

/// Failure modes of [`crate::container::MatrixContainer::deserialize`].
///
/// Kept as a separate type from [`EncodeError`] because it belongs to a
/// different call (reading back a previously serialized matrix, not
/// producing one), matching `spec.md` §7's distinct `CorruptSerialization`
/// error family.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum CorruptSerialization {
    #[error("bad signature: expected 51 52 52 00")]
    BadSignature,

    #[error("implausible side length {0} modules (must be 21..=177)")]
    ImplausibleSide(u16),

    #[error("truncated module stream: expected at least {expected} bits, found {found}")]
    TruncatedStream { expected: usize, found: usize },

    #[error("decompressed payload of {0} bytes exceeds the 10 MiB ceiling")]
    DecompressedTooLarge(usize),

    #[error("decompression failed: {0}")]
    Decompression(String),
}
