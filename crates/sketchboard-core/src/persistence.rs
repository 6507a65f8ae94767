//! Conversion between layer stacks and encoded layer images.
//!
//! Loading decodes each layer independently. Results may arrive in any
//! order; [`PendingLoad`] places them by index and only yields a stack once
//! every layer is in.

use crate::layers::{Layer, LayerError, LayerStack};
use futures_util::future::join_all;
use sketchboard_render::{RenderResult, Surface, decode_data_uri, encode_data_uri};
use thiserror::Error;

/// Load errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Layer index {index} out of range for {len} layers")]
    OutOfRange { index: usize, len: usize },
    #[error("Layer {0} delivered twice")]
    Duplicate(usize),
    #[error("Only {decoded} of {expected} layers decoded")]
    Incomplete { decoded: usize, expected: usize },
    #[error(transparent)]
    Layer(#[from] LayerError),
}

/// Encode every layer as a PNG data URI, bottom first.
pub fn serialize(stack: &LayerStack) -> RenderResult<Vec<String>> {
    stack
        .layers()
        .iter()
        .map(|layer| encode_data_uri(&layer.surface))
        .collect()
}

/// Join barrier for layers decoded out of order.
#[derive(Debug, Clone)]
pub struct PendingLoad {
    slots: Vec<Option<Surface>>,
    width: u32,
    height: u32,
}

impl PendingLoad {
    /// Expect `count` layers for a canvas of the given size.
    pub fn new(count: usize, width: u32, height: u32) -> Self {
        Self {
            slots: vec![None; count],
            width,
            height,
        }
    }

    /// Record the decoded surface for layer `index`.
    pub fn deliver(&mut self, index: usize, surface: Surface) -> Result<(), LoadError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(LoadError::OutOfRange { index, len })?;
        if slot.is_some() {
            return Err(LoadError::Duplicate(index));
        }
        *slot = Some(surface);
        Ok(())
    }

    pub fn expected(&self) -> usize {
        self.slots.len()
    }

    pub fn decoded(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Assemble the stack with the first layer active.
    pub fn into_stack(self) -> Result<LayerStack, LoadError> {
        if !self.is_complete() {
            return Err(LoadError::Incomplete {
                decoded: self.decoded(),
                expected: self.expected(),
            });
        }
        let layers = self
            .slots
            .into_iter()
            .flatten()
            .map(Layer::from_surface)
            .collect();
        Ok(LayerStack::from_layers(layers, self.width, self.height)?)
    }
}

/// Decode one encoded layer onto a blank canvas-sized surface.
///
/// Decoding runs synchronously inside the future when it is first polled;
/// the future only gives [`deserialize`] one unit per layer to join.
/// An undecodable image leaves the layer blank.
pub async fn decode_layer(index: usize, encoded: &str, width: u32, height: u32) -> (usize, Surface) {
    let mut surface = Surface::new(width, height);
    match decode_data_uri(encoded) {
        Ok(image) => surface.paste_image(&image),
        Err(e) => log::warn!("Layer {} could not be decoded, leaving it blank: {}", index, e),
    }
    (index, surface)
}

/// Rebuild a layer stack from encoded layers, bottom first.
///
/// All layers are decoded before the stack exists; the active layer is 0.
pub async fn deserialize(encoded: &[String], width: u32, height: u32) -> Result<LayerStack, LoadError> {
    if encoded.is_empty() {
        return Err(LayerError::Empty.into());
    }

    let decodes = encoded
        .iter()
        .enumerate()
        .map(|(index, data)| decode_layer(index, data, width, height));

    let mut pending = PendingLoad::new(encoded.len(), width, height);
    for (index, surface) in join_all(decodes).await {
        pending.deliver(index, surface)?;
    }
    pending.into_stack()
}
