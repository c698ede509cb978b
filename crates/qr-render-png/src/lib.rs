use std::io::Cursor;

use image::imageops::resize;
use image::{DynamicImage, ImageBuffer, ImageFormat};
use qr_core::{encode, CodeEcc, EncodeOptions};

mod error;
pub use error::QrPngError;

/// Renders `data` as a PNG-encoded QR Code, demonstrating `qr-core`'s
/// renderer-facing contract (`spec.md` §6): walk `side x side` modules via
/// `is_dark(row, col)` and paint one pixel per module before upscaling.
pub async fn generate_qr_image(data: &str) -> Result<Vec<u8>, QrPngError> {
    let symbol = encode(data.as_bytes(), CodeEcc::Medium, EncodeOptions::default())?;
    let side = symbol.side();

    let png = ImageBuffer::from_fn(side as u32, side as u32, |x, y| {
        if symbol.is_dark(y as usize, x as usize) {
            image::Luma([0u8])
        } else {
            image::Luma([255u8])
        }
    });

    let scale = 8;
    let resized = resize(
        &png,
        (side * scale) as u32,
        (side * scale) as u32,
        image::imageops::FilterType::Nearest,
    );

    let mut w = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(resized).write_to(&mut w, ImageFormat::Png)?;
    Ok(w.into_inner())
}
