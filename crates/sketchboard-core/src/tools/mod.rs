//! Tool system for the drawing board.
//!
//! Every tool follows the same start / move / end protocol against the
//! active layer. Freehand tools paint one segment per move event; shape
//! tools snapshot the layer at start and restore it before every preview so
//! earlier preview frames never linger.

use crate::geometry;
use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};
use sketchboard_render::{DEFAULT_TOLERANCE, SerializableColor, StrokeStyle, Surface};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of points on the star tool's star.
pub const STAR_POINTS: usize = 5;

/// Tool selection errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0:?}")]
    Unknown(String),
}

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pencil,
    Eraser,
    Line,
    Rectangle,
    Circle,
    Triangle,
    Star,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Pencil,
        ToolKind::Eraser,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Triangle,
        ToolKind::Star,
    ];

    /// Identifier used by tool buttons.
    pub fn id(self) -> &'static str {
        match self {
            ToolKind::Pencil => "pencil",
            ToolKind::Eraser => "eraser",
            ToolKind::Line => "line",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Triangle => "triangle",
            ToolKind::Star => "star",
        }
    }

    /// Pencil and eraser paint as the pointer moves; everything else is a
    /// previewed shape.
    pub fn is_freehand(self) -> bool {
        matches!(self, ToolKind::Pencil | ToolKind::Eraser)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ToolKind {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|tool| tool.id() == s)
            .ok_or_else(|| ToolError::Unknown(s.to_string()))
    }
}

/// Pen and gesture state shared by all tools.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingState {
    pub active_tool: ToolKind,
    pub stroke_color: SerializableColor,
    /// Line width in pixels, always positive.
    pub stroke_width: u32,
    /// True between a gesture's start and its end.
    pub is_drawing: bool,
    /// Gesture origin of the current shape.
    pub anchor: Point,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            active_tool: ToolKind::default(),
            stroke_color: SerializableColor::black(),
            stroke_width: 5,
            is_drawing: false,
            anchor: Point::ZERO,
        }
    }
}

impl DrawingState {
    fn pen(&self, color: SerializableColor, tolerance: f64) -> StrokeStyle {
        StrokeStyle::new(color, self.stroke_width as f64).with_tolerance(tolerance)
    }
}

/// Drives the active tool through a gesture.
#[derive(Debug, Clone)]
pub struct ToolMachine {
    /// Layer pixels captured at shape start.
    snapshot: Option<Surface>,
    /// Last point of the freehand polyline.
    cursor: Option<Point>,
    /// Color the eraser paints with.
    background: SerializableColor,
    tolerance: f64,
}

impl Default for ToolMachine {
    fn default() -> Self {
        Self::new(SerializableColor::white())
    }
}

impl ToolMachine {
    pub fn new(background: SerializableColor) -> Self {
        Self {
            snapshot: None,
            cursor: None,
            background,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Set the curve tolerance. Values that are not positive and finite are
    /// ignored, since curve flattening would never terminate.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        if tolerance.is_finite() && tolerance > 0.0 {
            self.tolerance = tolerance;
        } else {
            log::warn!("Ignoring curve tolerance {}", tolerance);
        }
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn background(&self) -> SerializableColor {
        self.background
    }

    /// Whether a shape preview snapshot is held.
    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Begin a gesture at `point`.
    pub fn start(&mut self, state: &mut DrawingState, layer: &mut Surface, point: Point) {
        state.is_drawing = true;
        if state.active_tool.is_freehand() {
            self.cursor = Some(point);
        } else {
            state.anchor = point;
            self.snapshot = Some(layer.clone());
        }
        log::debug!("{} start at ({}, {})", state.active_tool, point.x, point.y);
    }

    /// Continue the gesture at `point`.
    pub fn move_to(&mut self, state: &mut DrawingState, layer: &mut Surface, point: Point) {
        if state.active_tool.is_freehand() {
            if !state.is_drawing {
                return;
            }
            let from = self.cursor.unwrap_or(point);
            let pen = state.pen(self.freehand_color(state), self.tolerance);
            layer.stroke_line(from, point, &pen);
            self.cursor = Some(point);
        } else {
            self.restore(layer);
            self.draw_shape(state, layer, point);
        }
    }

    /// Finish the gesture at `point`, committing any shape.
    pub fn end(&mut self, state: &mut DrawingState, layer: &mut Surface, point: Point) {
        if state.active_tool.is_freehand() {
            self.cursor = None;
        } else {
            self.restore(layer);
            self.snapshot = None;
            self.draw_shape(state, layer, point);
        }
        state.is_drawing = false;
        log::debug!("{} end at ({}, {})", state.active_tool, point.x, point.y);
    }

    /// Drop any in-progress gesture without drawing.
    pub fn cancel(&mut self, state: &mut DrawingState) {
        self.snapshot = None;
        self.cursor = None;
        state.is_drawing = false;
    }

    /// Outline the active shape tool would draw from the anchor to `point`.
    pub fn shape_outline(&self, state: &DrawingState, point: Point) -> Option<BezPath> {
        let anchor = state.anchor;
        match state.active_tool {
            ToolKind::Pencil | ToolKind::Eraser => None,
            ToolKind::Line => Some(geometry::line_path(anchor, point)),
            ToolKind::Rectangle => Some(geometry::rect_path(anchor, point)),
            ToolKind::Circle => Some(geometry::circle_path(anchor, point, self.tolerance)),
            ToolKind::Triangle => Some(geometry::triangle_path(anchor, point)),
            ToolKind::Star => {
                let radius = anchor.distance(point);
                Some(geometry::star_path(anchor, STAR_POINTS, radius, radius / 2.0))
            }
        }
    }

    fn freehand_color(&self, state: &DrawingState) -> SerializableColor {
        match state.active_tool {
            ToolKind::Eraser => self.background,
            _ => state.stroke_color,
        }
    }

    fn restore(&self, layer: &mut Surface) {
        if let Some(snapshot) = &self.snapshot {
            layer.clone_from(snapshot);
        }
    }

    fn draw_shape(&self, state: &DrawingState, layer: &mut Surface, point: Point) {
        if let Some(path) = self.shape_outline(state, point) {
            let pen = state.pen(state.stroke_color, self.tolerance);
            layer.stroke_path(&path, &pen);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: SerializableColor = SerializableColor { r: 255, g: 0, b: 0, a: 255 };

    fn setup(tool: ToolKind) -> (ToolMachine, DrawingState, Surface) {
        let state = DrawingState {
            active_tool: tool,
            stroke_color: RED,
            stroke_width: 3,
            ..DrawingState::default()
        };
        (ToolMachine::default(), state, Surface::new(100, 100))
    }

    fn opaque(layer: &Surface, x: u32, y: u32) -> bool {
        layer.pixel(x, y).map(|c| c.a == 255).unwrap_or(false)
    }

    #[test]
    fn test_unusable_tolerance_ignored() {
        assert_eq!(ToolMachine::default().with_tolerance(0.0).tolerance(), DEFAULT_TOLERANCE);
        assert_eq!(ToolMachine::default().with_tolerance(-1.0).tolerance(), DEFAULT_TOLERANCE);
        assert_eq!(ToolMachine::default().with_tolerance(0.5).tolerance(), 0.5);
    }

    #[test]
    fn test_tool_ids_roundtrip() {
        for tool in ToolKind::ALL {
            assert_eq!(tool.id().parse::<ToolKind>().unwrap(), tool);
        }
    }

    #[test]
    fn test_unknown_tool_rejected() {
        assert_eq!(
            "spray".parse::<ToolKind>(),
            Err(ToolError::Unknown("spray".to_string()))
        );
    }

    #[test]
    fn test_pencil_draws_polyline() {
        let (mut tm, mut state, mut layer) = setup(ToolKind::Pencil);
        tm.start(&mut state, &mut layer, Point::new(10.0, 10.0));
        assert!(state.is_drawing);

        tm.move_to(&mut state, &mut layer, Point::new(50.0, 10.0));
        tm.move_to(&mut state, &mut layer, Point::new(50.0, 50.0));
        tm.end(&mut state, &mut layer, Point::new(50.0, 50.0));

        assert!(!state.is_drawing);
        assert_eq!(layer.pixel(30, 10), Some(RED));
        assert_eq!(layer.pixel(50, 30), Some(RED));
        assert!(!opaque(&layer, 30, 30));
    }

    #[test]
    fn test_pencil_move_without_drawing_is_ignored() {
        let (mut tm, mut state, mut layer) = setup(ToolKind::Pencil);
        tm.move_to(&mut state, &mut layer, Point::new(50.0, 10.0));
        assert!(layer.is_blank());
    }

    #[test]
    fn test_pencil_end_draws_nothing() {
        let (mut tm, mut state, mut layer) = setup(ToolKind::Pencil);
        tm.start(&mut state, &mut layer, Point::new(10.0, 10.0));
        tm.end(&mut state, &mut layer, Point::new(90.0, 90.0));
        assert!(layer.is_blank());
    }

    #[test]
    fn test_eraser_paints_background() {
        let (mut tm, mut state, mut layer) = setup(ToolKind::Eraser);
        layer.fill(RED);
        tm.start(&mut state, &mut layer, Point::new(10.0, 50.0));
        tm.move_to(&mut state, &mut layer, Point::new(90.0, 50.0));
        tm.end(&mut state, &mut layer, Point::new(90.0, 50.0));

        assert_eq!(layer.pixel(50, 50), Some(SerializableColor::white()));
        assert_eq!(layer.pixel(50, 10), Some(RED));
    }

    #[test]
    fn test_line_preview_leaves_no_ghosts() {
        let (mut tm, mut state, mut layer) = setup(ToolKind::Line);
        tm.start(&mut state, &mut layer, Point::new(10.0, 10.0));
        assert!(tm.has_snapshot());

        tm.move_to(&mut state, &mut layer, Point::new(90.0, 10.0));
        assert!(opaque(&layer, 80, 10));

        tm.move_to(&mut state, &mut layer, Point::new(10.0, 90.0));
        assert!(!opaque(&layer, 80, 10));
        assert!(opaque(&layer, 10, 80));

        tm.end(&mut state, &mut layer, Point::new(10.0, 90.0));
        assert!(!tm.has_snapshot());
        assert!(opaque(&layer, 10, 80));
    }

    #[test]
    fn test_preview_keeps_existing_content() {
        let (mut tm, mut state, mut layer) = setup(ToolKind::Circle);
        let pen = StrokeStyle::new(SerializableColor::black(), 4.0);
        layer.stroke_line(Point::new(0.0, 95.0), Point::new(100.0, 95.0), &pen);
        let before = layer.pixel(5, 95);

        tm.start(&mut state, &mut layer, Point::new(50.0, 50.0));
        tm.move_to(&mut state, &mut layer, Point::new(95.0, 50.0));
        tm.move_to(&mut state, &mut layer, Point::new(60.0, 50.0));
        tm.end(&mut state, &mut layer, Point::new(60.0, 50.0));

        assert_eq!(layer.pixel(5, 95), before);
    }

    #[test]
    fn test_circle_radius_from_anchor() {
        let (mut tm, mut state, mut layer) = setup(ToolKind::Circle);
        tm.start(&mut state, &mut layer, Point::new(50.0, 50.0));
        tm.end(&mut state, &mut layer, Point::new(70.0, 50.0));

        assert!(opaque(&layer, 69, 49) || opaque(&layer, 69, 50));
        assert!(!opaque(&layer, 50, 50));
    }

    #[test]
    fn test_rectangle_corner_order_independent() {
        let (mut tm, mut state, mut forward) = setup(ToolKind::Rectangle);
        tm.start(&mut state, &mut forward, Point::new(10.0, 10.0));
        tm.end(&mut state, &mut forward, Point::new(50.0, 50.0));

        let (mut tm, mut state, mut backward) = setup(ToolKind::Rectangle);
        tm.start(&mut state, &mut backward, Point::new(50.0, 50.0));
        tm.end(&mut state, &mut backward, Point::new(10.0, 10.0));

        assert!(!forward.is_blank());
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_end_without_start_draws_directly() {
        for tool in ToolKind::ALL.into_iter().filter(|t| !t.is_freehand()) {
            let (mut tm, mut state, mut layer) = setup(tool);
            state.anchor = Point::new(20.0, 20.0);
            let pen = StrokeStyle::new(SerializableColor::black(), 2.0);
            layer.stroke_line(Point::new(0.0, 98.0), Point::new(100.0, 98.0), &pen);

            tm.end(&mut state, &mut layer, Point::new(60.0, 60.0));

            assert!(!tm.has_snapshot(), "{}", tool);
            assert!(opaque(&layer, 50, 98), "{} lost existing pixels", tool);
            if tool == ToolKind::Line {
                assert_eq!(layer.pixel(20, 20), Some(RED));
            }
        }
    }

    #[test]
    fn test_move_without_start_draws_directly() {
        let (mut tm, mut state, mut layer) = setup(ToolKind::Star);
        state.anchor = Point::new(50.0, 50.0);
        tm.move_to(&mut state, &mut layer, Point::new(80.0, 50.0));
        assert!(opaque(&layer, 79, 50) || opaque(&layer, 79, 49));
    }

    #[test]
    fn test_cancel_discards_snapshot() {
        let (mut tm, mut state, mut layer) = setup(ToolKind::Triangle);
        tm.start(&mut state, &mut layer, Point::new(10.0, 10.0));
        tm.cancel(&mut state);
        assert!(!tm.has_snapshot());
        assert!(!state.is_drawing);
    }

    #[test]
    fn test_star_outline_radius() {
        let (tm, mut state, _) = setup(ToolKind::Star);
        state.anchor = Point::new(0.0, 0.0);
        let path = tm.shape_outline(&state, Point::new(30.0, 40.0)).unwrap();
        // 10 vertices + close
        assert_eq!(path.elements().len(), 11);
    }
}
