//! Raster → PNG → data URI.

use crate::grid::Raster;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Prefix of every data URI produced by [`to_data_uri`].
pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}

/// Encode the raster as an 8-bit RGBA PNG.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, EncodeError> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, raster.width(), raster.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(raster.pixels())?;
        writer.finish()?;
    }
    log::debug!("PNG encoded: {} bytes", png_data.len());
    Ok(png_data)
}

/// Encode the raster as a `data:image/png;base64,...` URI.
pub fn to_data_uri(raster: &Raster) -> Result<String, EncodeError> {
    let png_data = encode_png(raster)?;
    let mut uri = String::with_capacity(DATA_URI_PREFIX.len() + png_data.len() * 4 / 3 + 4);
    uri.push_str(DATA_URI_PREFIX);
    STANDARD.encode_string(&png_data, &mut uri);
    Ok(uri)
}
