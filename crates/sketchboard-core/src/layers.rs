//! Layer stack and compositor.

use sketchboard_render::Surface;
use thiserror::Error;

/// Layer stack errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerError {
    #[error("Cannot delete the last layer")]
    LastLayer,
    #[error("Layer index {index} out of range (stack has {len} layers)")]
    OutOfRange { index: usize, len: usize },
    #[error("A layer stack needs at least one layer")]
    Empty,
}

/// An independently drawable raster surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub surface: Surface,
}

impl Layer {
    /// Create a blank, transparent layer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: Surface::new(width, height),
        }
    }

    pub fn from_surface(surface: Surface) -> Self {
        Self { surface }
    }
}

/// Ordered layers, bottom first, with one active layer.
///
/// Never empty: `0 <= active < len` holds at all times.
#[derive(Debug, Clone)]
pub struct LayerStack {
    layers: Vec<Layer>,
    active: usize,
    /// Size given to new layers.
    width: u32,
    height: u32,
}

impl LayerStack {
    /// Create a stack holding one blank layer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            layers: vec![Layer::new(width, height)],
            active: 0,
            width,
            height,
        }
    }

    /// Build a stack from existing layers with the first one active.
    pub fn from_layers(layers: Vec<Layer>, width: u32, height: u32) -> Result<Self, LayerError> {
        if layers.is_empty() {
            return Err(LayerError::Empty);
        }
        Ok(Self {
            layers,
            active: 0,
            width,
            height,
        })
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Dimensions given to newly created layers.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn active(&self) -> &Layer {
        &self.layers[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Layer {
        &mut self.layers[self.active]
    }

    /// Append a blank layer at the current size and make it active.
    /// Returns its index.
    pub fn add_layer(&mut self) -> usize {
        self.layers.push(Layer::new(self.width, self.height));
        self.active = self.layers.len() - 1;
        log::debug!("Added layer {}", self.active);
        self.active
    }

    /// Remove the active layer and activate the one below it.
    ///
    /// Refused when only one layer remains. Returns the new active index.
    pub fn delete_active_layer(&mut self) -> Result<usize, LayerError> {
        if self.layers.len() <= 1 {
            return Err(LayerError::LastLayer);
        }
        self.layers.remove(self.active);
        self.active = self.active.saturating_sub(1);
        log::debug!("Deleted layer, {} now active", self.active);
        Ok(self.active)
    }

    /// Switch the layer that receives tool input.
    pub fn set_active_layer(&mut self, index: usize) -> Result<(), LayerError> {
        if index >= self.layers.len() {
            return Err(LayerError::OutOfRange {
                index,
                len: self.layers.len(),
            });
        }
        self.active = index;
        Ok(())
    }

    /// Redraw `display` as all layers composited bottom to top.
    ///
    /// Layers of a different size are clipped or leave uncovered pixels
    /// transparent.
    pub fn flatten(&self, display: &mut Surface) {
        display.clear();
        for layer in &self.layers {
            display.draw_surface(&layer.surface);
        }
    }

    /// A freshly allocated composite at the current size.
    pub fn composite(&self) -> Surface {
        let mut display = Surface::new(self.width, self.height);
        self.flatten(&mut display);
        display
    }

    /// Change the size used for future layers.
    ///
    /// Existing layers keep their pixels and dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Clear every layer to transparent.
    pub fn clear_all(&mut self) {
        for layer in &mut self.layers {
            layer.surface.clear();
        }
    }

    /// Square previews of every layer, bottom first.
    pub fn thumbnails(&self, edge: u32) -> Vec<Surface> {
        self.layers.iter().map(|l| l.surface.thumbnail(edge)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchboard_render::SerializableColor;

    #[test]
    fn test_new_stack_has_one_layer() {
        let stack = LayerStack::new(10, 10);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.active_index(), 0);
    }

    #[test]
    fn test_add_layer_activates_it() {
        let mut stack = LayerStack::new(10, 10);
        assert_eq!(stack.add_layer(), 1);
        assert_eq!(stack.add_layer(), 2);
        assert_eq!(stack.active_index(), 2);
        assert_eq!(stack.active().surface.dimensions(), (10, 10));
    }

    #[test]
    fn test_delete_last_layer_refused() {
        let mut stack = LayerStack::new(10, 10);
        assert_eq!(stack.delete_active_layer(), Err(LayerError::LastLayer));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.active_index(), 0);
    }

    #[test]
    fn test_delete_activates_layer_below() {
        let mut stack = LayerStack::new(10, 10);
        stack.add_layer();
        stack.add_layer();
        stack.set_active_layer(1).unwrap();

        assert_eq!(stack.delete_active_layer(), Ok(0));
        assert_eq!(stack.len(), 2);

        assert_eq!(stack.delete_active_layer(), Ok(0));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_set_active_out_of_range() {
        let mut stack = LayerStack::new(10, 10);
        assert_eq!(
            stack.set_active_layer(3),
            Err(LayerError::OutOfRange { index: 3, len: 1 })
        );
        assert_eq!(stack.active_index(), 0);
    }

    #[test]
    fn test_from_layers_rejects_empty() {
        assert!(matches!(
            LayerStack::from_layers(Vec::new(), 1, 1),
            Err(LayerError::Empty)
        ));
    }

    #[test]
    fn test_flatten_draws_bottom_to_top() {
        let mut stack = LayerStack::new(4, 4);
        stack.active_mut().surface.fill(SerializableColor::rgb(255, 0, 0));
        stack.add_layer();
        stack.active_mut().surface.fill(SerializableColor::rgb(0, 0, 255));

        let mut display = Surface::new(4, 4);
        stack.flatten(&mut display);
        assert_eq!(display.pixel(0, 0), Some(SerializableColor::rgb(0, 0, 255)));

        // idempotent
        let first = display.clone();
        stack.flatten(&mut display);
        assert_eq!(display, first);
        assert_eq!(stack.get(0).unwrap().surface.pixel(0, 0), Some(SerializableColor::rgb(255, 0, 0)));
    }

    #[test]
    fn test_resize_keeps_existing_layers() {
        let mut stack = LayerStack::new(4, 4);
        stack.active_mut().surface.fill(SerializableColor::black());
        stack.resize(8, 6);
        stack.add_layer();

        assert_eq!(stack.get(0).unwrap().surface.dimensions(), (4, 4));
        assert_eq!(stack.get(1).unwrap().surface.dimensions(), (8, 6));

        let mut display = Surface::new(8, 6);
        stack.flatten(&mut display);
        assert_eq!(display.dimensions(), (8, 6));
        assert_eq!(display.pixel(1, 1), Some(SerializableColor::black()));
        assert_eq!(display.pixel(7, 5), Some(SerializableColor::transparent()));
    }

    #[test]
    fn test_clear_all() {
        let mut stack = LayerStack::new(4, 4);
        stack.active_mut().surface.fill(SerializableColor::black());
        stack.add_layer();
        stack.active_mut().surface.fill(SerializableColor::white());
        stack.clear_all();
        assert!(stack.layers().iter().all(|l| l.surface.is_blank()));
    }

    #[test]
    fn test_thumbnails_one_per_layer() {
        let mut stack = LayerStack::new(40, 20);
        stack.add_layer();
        let thumbs = stack.thumbnails(10);
        assert_eq!(thumbs.len(), 2);
        assert!(thumbs.iter().all(|t| t.dimensions() == (10, 10)));
    }
}
