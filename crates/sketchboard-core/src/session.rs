//! The drawing session: owner of every piece of mutable board state.
//!
//! Hosts feed pointer input and control changes in; the session mutates its
//! layers and queues [`SessionEvent`]s for the host to render.

use crate::color_history::ColorHistory;
use crate::config::BoardConfig;
use crate::geometry::to_canvas_local;
use crate::input::{PointerInput, PointerPhase};
use crate::layers::{LayerError, LayerStack};
use crate::persistence::{self, LoadError};
use crate::storage::{Gallery, GalleryError, KeyValueStore, SavedDrawing};
use crate::tools::{DrawingState, ToolError, ToolKind, ToolMachine};
use kurbo::{Point, Rect};
use sketchboard_render::{ColorError, SerializableColor, Surface, decode_image};
use std::fmt;

/// User-visible messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    CannotDeleteLastLayer,
    MissingDrawingName,
    InvalidStrokeWidth,
    InvalidColor,
    DrawingSaved,
    DrawingDeleted,
    LoadFailed,
    ImportFailed,
    StorageFailed,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::CannotDeleteLastLayer => "Cannot delete the last layer",
            Notice::MissingDrawingName => "Please enter a name for your drawing!",
            Notice::InvalidStrokeWidth => "Stroke size must be a positive whole number",
            Notice::InvalidColor => "Colors must be written as #rrggbb",
            Notice::DrawingSaved => "Drawing saved!",
            Notice::DrawingDeleted => "Drawing deleted",
            Notice::LoadFailed => "Could not load that drawing",
            Notice::ImportFailed => "Could not import that image",
            Notice::StorageFailed => "Could not reach drawing storage",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Something the host should react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Notice(Notice),
    /// The display and layer previews need repainting.
    LayersChanged,
}

/// A single-user layered drawing board.
pub struct DrawingSession<S: KeyValueStore> {
    config: BoardConfig,
    state: DrawingState,
    tools: ToolMachine,
    layers: LayerStack,
    display: Surface,
    colors: ColorHistory,
    gallery: Gallery<S>,
    events: Vec<SessionEvent>,
}

impl<S: KeyValueStore> DrawingSession<S> {
    /// Start a blank one-layer board backed by `store`.
    pub fn new(config: BoardConfig, store: S) -> Self {
        let config = config.normalized();
        let state = DrawingState {
            stroke_color: config.stroke_color,
            stroke_width: config.stroke_width,
            ..DrawingState::default()
        };
        let mut colors = ColorHistory::new(config.color_history);
        colors.push(config.stroke_color);

        let layers = LayerStack::new(config.width, config.height);
        let mut display = Surface::new(config.width, config.height);
        layers.flatten(&mut display);

        Self {
            tools: ToolMachine::new(config.background).with_tolerance(config.tolerance),
            gallery: Gallery::new(store, config.storage_key.clone()),
            state,
            layers,
            display,
            colors,
            events: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    /// The flattened composite of every layer.
    pub fn display(&self) -> &Surface {
        &self.display
    }

    pub fn color_history(&self) -> &ColorHistory {
        &self.colors
    }

    pub fn gallery(&self) -> &Gallery<S> {
        &self.gallery
    }

    /// Square previews of each layer, bottom first.
    pub fn thumbnails(&self) -> Vec<Surface> {
        self.layers.thumbnails(self.config.thumbnail_edge)
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Pointer input ---

    /// Route a pointer event by phase. Leave and cancel map to `End`.
    pub fn handle_pointer(&mut self, phase: PointerPhase, input: &PointerInput, canvas_rect: Option<Rect>) {
        match phase {
            PointerPhase::Start => self.pointer_down(input, canvas_rect),
            PointerPhase::Move => self.pointer_move(input, canvas_rect),
            PointerPhase::End => self.pointer_up(input, canvas_rect),
        }
    }

    pub fn pointer_down(&mut self, input: &PointerInput, canvas_rect: Option<Rect>) {
        let point = Self::locate(input, canvas_rect);
        self.tools
            .start(&mut self.state, &mut self.layers.active_mut().surface, point);
    }

    pub fn pointer_move(&mut self, input: &PointerInput, canvas_rect: Option<Rect>) {
        if !self.state.is_drawing {
            return;
        }
        let point = Self::locate(input, canvas_rect);
        self.tools
            .move_to(&mut self.state, &mut self.layers.active_mut().surface, point);
        self.refresh();
    }

    pub fn pointer_up(&mut self, input: &PointerInput, canvas_rect: Option<Rect>) {
        if !self.state.is_drawing {
            return;
        }
        let point = Self::locate(input, canvas_rect);
        self.tools
            .end(&mut self.state, &mut self.layers.active_mut().surface, point);
        self.refresh();
    }

    fn locate(input: &PointerInput, canvas_rect: Option<Rect>) -> Point {
        match input.client_point() {
            Some(client) => to_canvas_local(client, canvas_rect),
            None => {
                log::error!("Pointer event carried no position; using origin");
                Point::ZERO
            }
        }
    }

    // --- Pen controls ---

    /// Select a tool by identifier. Unknown identifiers keep the current tool.
    pub fn set_tool(&mut self, id: &str) -> Result<(), ToolError> {
        match id.parse::<ToolKind>() {
            Ok(kind) => {
                self.set_tool_kind(kind);
                Ok(())
            }
            Err(e) => {
                log::warn!("{}", e);
                Err(e)
            }
        }
    }

    pub fn set_tool_kind(&mut self, kind: ToolKind) {
        if self.state.is_drawing {
            self.tools.cancel(&mut self.state);
        }
        self.state.active_tool = kind;
        log::debug!("Tool set to {}", kind);
    }

    /// Select a stroke color from hex text and record it in the history.
    pub fn set_color(&mut self, value: &str) -> Result<(), ColorError> {
        match value.parse::<SerializableColor>() {
            Ok(color) => {
                self.set_stroke_color(color);
                Ok(())
            }
            Err(e) => {
                log::warn!("{}", e);
                self.notify(Notice::InvalidColor);
                Err(e)
            }
        }
    }

    pub fn set_stroke_color(&mut self, color: SerializableColor) {
        self.state.stroke_color = color;
        self.colors.push(color);
    }

    /// Re-select a recent color. The history order is left as is.
    pub fn pick_history_color(&mut self, index: usize) -> Option<SerializableColor> {
        let color = self.colors.get(index)?;
        self.state.stroke_color = color;
        Some(color)
    }

    /// Set the stroke width from text.
    ///
    /// The leading integer is used, so `"2.5"` gives 2 and `"12px"` gives 12.
    /// Text without one, or a value below 1, keeps the current width.
    pub fn set_stroke_width(&mut self, value: &str) -> bool {
        match leading_integer(value).and_then(|n| u32::try_from(n).ok()) {
            Some(width) if width > 0 => {
                self.state.stroke_width = width;
                true
            }
            _ => {
                log::warn!("Rejected stroke width {:?}", value);
                self.notify(Notice::InvalidStrokeWidth);
                false
            }
        }
    }

    // --- Layers ---

    /// Append a layer above the others and make it active.
    pub fn add_layer(&mut self) -> usize {
        self.cancel_gesture();
        let index = self.layers.add_layer();
        log::debug!("Added layer {} of {}", index, self.layers.len());
        self.refresh();
        index
    }

    /// Remove the active layer. The last remaining layer is kept.
    pub fn delete_active_layer(&mut self) -> Result<usize, LayerError> {
        self.cancel_gesture();
        match self.layers.delete_active_layer() {
            Ok(active) => {
                log::debug!("Deleted layer, {} now active", active);
                self.refresh();
                Ok(active)
            }
            Err(e) => {
                log::warn!("{}", e);
                if e == LayerError::LastLayer {
                    self.notify(Notice::CannotDeleteLastLayer);
                }
                Err(e)
            }
        }
    }

    pub fn set_active_layer(&mut self, index: usize) -> Result<(), LayerError> {
        self.cancel_gesture();
        self.layers.set_active_layer(index).inspect_err(|e| log::warn!("{}", e))?;
        self.events.push(SessionEvent::LayersChanged);
        Ok(())
    }

    /// Erase every layer, keeping the stack shape.
    pub fn clear_canvas(&mut self) {
        self.cancel_gesture();
        self.layers.clear_all();
        self.refresh();
    }

    /// Resize the canvas. Existing layers keep their pixels and are clipped
    /// or padded when composited.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.cancel_gesture();
        self.layers.resize(width, height);
        self.display = Surface::new(width, height);
        log::debug!("Canvas resized to {}x{}", width, height);
        self.refresh();
    }

    /// Decode an image and draw it over the active layer, scaled to the canvas.
    pub fn import_image(&mut self, bytes: &[u8]) -> bool {
        let image = match decode_image(bytes) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Import failed: {}", e);
                self.notify(Notice::ImportFailed);
                return false;
            }
        };
        self.cancel_gesture();
        let (width, height) = self.display.dimensions();
        self.layers
            .active_mut()
            .surface
            .draw_image_scaled(&image, width, height);
        log::info!(
            "Imported {}x{} image onto layer {}",
            image.width(),
            image.height(),
            self.layers.active_index()
        );
        self.refresh();
        true
    }

    // --- Gallery ---

    pub fn drawings(&self) -> Vec<SavedDrawing> {
        self.gallery.drawings()
    }

    /// Save every layer under `name`.
    pub fn save_drawing(&mut self, name: &str) -> bool {
        if name.trim().is_empty() {
            self.notify(Notice::MissingDrawingName);
            return false;
        }
        let encoded = match persistence::serialize(&self.layers) {
            Ok(encoded) => encoded,
            Err(e) => {
                log::error!("Failed to encode layers: {}", e);
                self.notify(Notice::StorageFailed);
                return false;
            }
        };
        match self.gallery.save(name, encoded) {
            Ok(()) => {
                self.notify(Notice::DrawingSaved);
                true
            }
            Err(GalleryError::MissingName) => {
                self.notify(Notice::MissingDrawingName);
                false
            }
            Err(e) => {
                log::warn!("Failed to save drawing: {}", e);
                self.notify(Notice::StorageFailed);
                false
            }
        }
    }

    /// Replace the board with a saved drawing once all its layers decode.
    pub async fn load_drawing(&mut self, index: usize) -> bool {
        let Some(drawing) = self.gallery.get(index) else {
            log::warn!("No drawing at index {}", index);
            self.notify(Notice::LoadFailed);
            return false;
        };
        let (width, height) = self.display.dimensions();
        let stack: Result<LayerStack, LoadError> =
            persistence::deserialize(&drawing.layers, width, height).await;
        match stack {
            Ok(stack) => {
                self.tools.cancel(&mut self.state);
                self.layers = stack;
                log::info!("Loaded drawing '{}' ({} layers)", drawing.name, self.layers.len());
                self.refresh();
                true
            }
            Err(e) => {
                log::warn!("Failed to load drawing '{}': {}", drawing.name, e);
                self.notify(Notice::LoadFailed);
                false
            }
        }
    }

    pub fn delete_drawing(&mut self, index: usize) -> bool {
        match self.gallery.delete(index) {
            Ok(_) => {
                self.notify(Notice::DrawingDeleted);
                true
            }
            Err(GalleryError::OutOfRange(i)) => {
                log::warn!("No drawing at index {}", i);
                false
            }
            Err(e) => {
                log::warn!("Failed to delete drawing: {}", e);
                self.notify(Notice::StorageFailed);
                false
            }
        }
    }

    fn cancel_gesture(&mut self) {
        if self.state.is_drawing {
            log::debug!("Abandoning {} gesture", self.state.active_tool);
            self.tools.cancel(&mut self.state);
        }
    }

    fn refresh(&mut self) {
        self.layers.flatten(&mut self.display);
        self.events.push(SessionEvent::LayersChanged);
    }

    fn notify(&mut self, notice: Notice) {
        self.events.push(SessionEvent::Notice(notice));
    }
}

/// The signed integer at the start of `text`, after leading whitespace.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let sign_len = usize::from(text.starts_with(['+', '-']));
    let digits = text[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len() - sign_len);
    if digits == 0 {
        return None;
    }
    text[..sign_len + digits].parse().ok()
}
