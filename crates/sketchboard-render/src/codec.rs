//! PNG and data URI encoding of surfaces.

use crate::surface::Surface;
use base64::{Engine, engine::general_purpose::STANDARD};
use image::DynamicImage;
use thiserror::Error;

/// Prefix of every data URI produced by [`encode_data_uri`].
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Codec errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("Image decoding failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Malformed data URI: {0}")]
    DataUri(String),
    #[error("Base64 decoding failed: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Result type for codec operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Encode a surface as PNG bytes.
pub fn encode_png(surface: &Surface) -> RenderResult<Vec<u8>> {
    let (width, height) = surface.dimensions();
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(surface.as_raw())?;
    }
    Ok(png_data)
}

/// Encode a surface as a `data:image/png;base64,...` URI.
pub fn encode_data_uri(surface: &Surface) -> RenderResult<String> {
    let png_data = encode_png(surface)?;
    Ok(format!("{}{}", PNG_DATA_URI_PREFIX, STANDARD.encode(png_data)))
}

/// Extract the raw bytes carried by a base64 data URI.
pub fn data_uri_bytes(uri: &str) -> RenderResult<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::DataUri("missing data: scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::DataUri("missing payload separator".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(RenderError::DataUri(format!("unsupported encoding in {:?}", header)));
    }
    Ok(STANDARD.decode(payload.trim())?)
}

/// Decode any supported image format from memory.
pub fn decode_image(bytes: &[u8]) -> RenderResult<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Decode the image carried by a data URI.
pub fn decode_data_uri(uri: &str) -> RenderResult<DynamicImage> {
    decode_image(&data_uri_bytes(uri)?)
}
