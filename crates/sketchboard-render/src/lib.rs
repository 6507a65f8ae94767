//! Sketchboard Render Library
//!
//! Raster surfaces, outline stroking, compositing and PNG data URI codecs
//! used by the Sketchboard drawing board.

mod codec;
mod color;
mod stroke;
mod surface;

pub use codec::{
    PNG_DATA_URI_PREFIX, RenderError, RenderResult, data_uri_bytes, decode_data_uri, decode_image,
    encode_data_uri, encode_png,
};
pub use color::{ColorError, SerializableColor};
pub use stroke::{DEFAULT_TOLERANCE, StrokeStyle, flatten_path};
pub use surface::Surface;

pub use image::DynamicImage;
