//! Board configuration.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sketchboard_render::{DEFAULT_TOLERANCE, SerializableColor};

/// Storage key the gallery lives under.
pub const DEFAULT_STORAGE_KEY: &str = "drawings";

/// Number of recently used colors remembered.
pub const DEFAULT_COLOR_HISTORY: usize = 5;

/// Edge length of layer thumbnails in pixels.
pub const DEFAULT_THUMBNAIL_EDGE: u32 = 100;

/// Settings a drawing session starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Initial canvas width in pixels.
    pub width: u32,
    /// Initial canvas height in pixels.
    pub height: u32,
    /// Color the eraser paints with.
    #[serde(with = "hex_color")]
    pub background: SerializableColor,
    /// Stroke color selected at startup.
    #[serde(with = "hex_color")]
    pub stroke_color: SerializableColor,
    /// Stroke width selected at startup.
    pub stroke_width: u32,
    /// Capacity of the recent color list.
    pub color_history: usize,
    pub thumbnail_edge: u32,
    pub storage_key: String,
    /// Curve flattening tolerance for circles.
    pub tolerance: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: SerializableColor::white(),
            stroke_color: SerializableColor::black(),
            stroke_width: 5,
            color_history: DEFAULT_COLOR_HISTORY,
            thumbnail_edge: DEFAULT_THUMBNAIL_EDGE,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl BoardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::normalized)
    }

    /// Replace settings the board cannot draw with.
    ///
    /// Curve flattening needs a positive finite tolerance, and the pen needs
    /// a positive width.
    pub fn normalized(mut self) -> Self {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            log::warn!(
                "Unusable curve tolerance {}, using {}",
                self.tolerance,
                DEFAULT_TOLERANCE
            );
            self.tolerance = DEFAULT_TOLERANCE;
        }
        if self.stroke_width == 0 {
            log::warn!("Stroke width 0 raised to 1");
            self.stroke_width = 1;
        }
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Set the canvas size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the eraser color.
    pub fn with_background(mut self, color: SerializableColor) -> Self {
        self.background = color;
        self
    }

    /// Set the initial pen.
    pub fn with_stroke(mut self, color: SerializableColor, width: u32) -> Self {
        self.stroke_color = color;
        self.stroke_width = width.max(1);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}

/// Colors are stored as `#rrggbb` strings.
mod hex_color {
    use super::*;

    pub fn serialize<S: Serializer>(color: &SerializableColor, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&color.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<SerializableColor, D::Error> {
        let s = String::deserialize(d)?;
        SerializableColor::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
