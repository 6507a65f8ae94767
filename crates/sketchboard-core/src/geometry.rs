//! Shape outlines and coordinate helpers.

use kurbo::{BezPath, Circle, Point, Rect, Shape};
use std::f64::consts::PI;

/// Vertices of a star centered at `center`.
///
/// Alternates an outer vertex at angle `2πi/points` with an inner vertex at
/// `2π(i + 0.5)/points`, measured from the positive x-axis.
pub fn star_vertices(center: Point, points: usize, outer_radius: f64, inner_radius: f64) -> Vec<Point> {
    let mut vertices = Vec::with_capacity(points * 2);
    for i in 0..points {
        let outer = 2.0 * PI * i as f64 / points as f64;
        let inner = 2.0 * PI * (i as f64 + 0.5) / points as f64;
        vertices.push(Point::new(
            center.x + outer_radius * outer.cos(),
            center.y + outer_radius * outer.sin(),
        ));
        vertices.push(Point::new(
            center.x + inner_radius * inner.cos(),
            center.y + inner_radius * inner.sin(),
        ));
    }
    vertices
}

/// Closed path through `vertices`.
pub fn polygon_path(vertices: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = vertices.iter();
    if let Some(&first) = iter.next() {
        path.move_to(first);
        for &p in iter {
            path.line_to(p);
        }
        path.close_path();
    }
    path
}

/// Closed star outline.
pub fn star_path(center: Point, points: usize, outer_radius: f64, inner_radius: f64) -> BezPath {
    polygon_path(&star_vertices(center, points, outer_radius, inner_radius))
}

/// Isosceles triangle with its apex at `anchor` and its base on the
/// horizontal through `current`, half as wide as the horizontal drag.
pub fn triangle_vertices(anchor: Point, current: Point) -> [Point; 3] {
    let width = current.x - anchor.x;
    let height = current.y - anchor.y;
    [
        anchor,
        Point::new(anchor.x + width / 2.0, anchor.y + height),
        Point::new(anchor.x - width / 2.0, anchor.y + height),
    ]
}

pub fn triangle_path(anchor: Point, current: Point) -> BezPath {
    polygon_path(&triangle_vertices(anchor, current))
}

/// Rectangle spanned by two opposite corners, in either order.
pub fn rect_path(anchor: Point, current: Point) -> BezPath {
    Rect::from_points(anchor, current).to_path(0.1)
}

/// Circle centered at `anchor` passing through `current`.
pub fn circle_path(anchor: Point, current: Point, tolerance: f64) -> BezPath {
    Circle::new(anchor, anchor.distance(current)).to_path(tolerance)
}

pub fn line_path(from: Point, to: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(from);
    path.line_to(to);
    path
}

/// Translate a viewport point into canvas-local coordinates.
///
/// `canvas_rect` is the canvas' on-screen bounds. Without it there is no
/// frame of reference and the origin is returned.
pub fn to_canvas_local(client: Point, canvas_rect: Option<Rect>) -> Point {
    match canvas_rect {
        Some(rect) => Point::new(client.x - rect.x0, client.y - rect.y0),
        None => {
            log::error!("Canvas bounds unavailable; using origin");
            Point::ZERO
        }
    }
}
