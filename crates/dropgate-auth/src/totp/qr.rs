//! QR rendering for TOTP provisioning URIs.

use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, Luma};
use qrcode::QrCode;

use dropgate_core::error::AppError;

/// Render the given provisioning URI as a base64 PNG data URI.
///
/// A pure function of its input; the caller decides where the image goes.
pub fn qr_png_data_uri(data: &str) -> Result<String, AppError> {
    let code = QrCode::new(data)
        .map_err(|e| AppError::internal(format!("QR encoding failed: {e}")))?;
    let img = code.render::<Luma<u8>>().build();

    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(img)
        .write_to(&mut buffer, image::ImageOutputFormat::Png)
        .map_err(|e| AppError::internal(format!("QR PNG rendering failed: {e}")))?;

    Ok(format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(buffer.get_ref())
    ))
}
