use image::ImageError;
use qr_core::EncodeError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QrPngError {
    #[error("image error: {0}")]
    ImageError(#[from] ImageError),

    #[error("qr error: {0}")]
    EncodeError(#[from] EncodeError),
}
