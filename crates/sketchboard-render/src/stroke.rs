//! Outline stroking onto RGBA pixel buffers.
//!
//! Paths are flattened to polylines and each pixel takes the coverage of the
//! nearest segment, so overlapping segments of one path never double-blend.

use crate::color::SerializableColor;
use image::{Pixel, RgbaImage};
use kurbo::{BezPath, PathEl, Point};

/// Default tolerance used when flattening curves.
pub const DEFAULT_TOLERANCE: f64 = 0.25;

/// Pen used for a single stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: SerializableColor,
    pub width: f64,
    /// Flattening tolerance in pixels.
    pub tolerance: f64,
}

impl StrokeStyle {
    pub fn new(color: SerializableColor, width: f64) -> Self {
        Self {
            color,
            width,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Split a path into polylines. Closed subpaths repeat their first point.
///
/// A tolerance that is not positive and finite uses [`DEFAULT_TOLERANCE`].
pub fn flatten_path(path: &BezPath, tolerance: f64) -> Vec<Vec<Point>> {
    let tolerance = if tolerance.is_finite() && tolerance > 0.0 {
        tolerance
    } else {
        DEFAULT_TOLERANCE
    };
    let mut polylines: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    kurbo::flatten(path.iter(), tolerance, |el| match el {
        PathEl::MoveTo(p) => {
            if !current.is_empty() {
                polylines.push(std::mem::take(&mut current));
            }
            current.push(p);
        }
        PathEl::LineTo(p) => {
            // a LineTo without a MoveTo starts at its own point
            if current.is_empty() {
                current.push(p);
            }
            current.push(p);
        }
        PathEl::ClosePath => {
            if let Some(&first) = current.first() {
                current.push(first);
                polylines.push(std::mem::take(&mut current));
            }
        }
        // flatten only emits lines
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });

    if !current.is_empty() {
        polylines.push(current);
    }
    polylines
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = p - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    (p - (a + seg * t)).hypot()
}

/// Stroke `path` into `target` with round caps and joins.
pub fn stroke_path(target: &mut RgbaImage, path: &BezPath, style: &StrokeStyle) {
    let polylines = flatten_path(path, style.tolerance);
    let segments: Vec<(Point, Point)> = polylines
        .iter()
        .flat_map(|line| {
            // a lone point still leaves a dot
            if line.len() == 1 {
                vec![(line[0], line[0])]
            } else {
                line.windows(2).map(|w| (w[0], w[1])).collect()
            }
        })
        .collect();
    stroke_segments(target, &segments, style);
}

/// Stroke a single straight segment.
pub fn stroke_line(target: &mut RgbaImage, from: Point, to: Point, style: &StrokeStyle) {
    stroke_segments(target, &[(from, to)], style);
}

/// Pixel rectangle `[x0, x1) x [y0, y1)` covered by the padded segment,
/// clipped to `width` x `height`.
fn segment_bounds(a: Point, b: Point, reach: f64, width: u32, height: u32) -> Option<[u32; 4]> {
    let min_x = a.x.min(b.x) - reach;
    let min_y = a.y.min(b.y) - reach;
    let max_x = a.x.max(b.x) + reach;
    let max_y = a.y.max(b.y) + reach;
    if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
        return None;
    }
    let x0 = min_x.floor().clamp(0.0, width as f64) as u32;
    let y0 = min_y.floor().clamp(0.0, height as f64) as u32;
    let x1 = max_x.ceil().clamp(0.0, width as f64) as u32;
    let y1 = max_y.ceil().clamp(0.0, height as f64) as u32;
    (x0 < x1 && y0 < y1).then_some([x0, y0, x1, y1])
}

/// Coverage of every segment, max-combined into one mask, then blended once
/// so overlapping segments never double-blend.
fn stroke_segments(target: &mut RgbaImage, segments: &[(Point, Point)], style: &StrokeStyle) {
    if segments.is_empty() || style.width <= 0.0 || style.color.a == 0 {
        return;
    }
    let (width, height) = target.dimensions();
    let half = style.width / 2.0;
    let reach = half + 1.0;

    let bounds: Vec<[u32; 4]> = segments
        .iter()
        .filter_map(|&(a, b)| segment_bounds(a, b, reach, width, height))
        .collect();
    let Some(&first) = bounds.first() else {
        return;
    };
    let [mx0, my0, mx1, my1] = bounds.iter().fold(first, |acc, b| {
        [acc[0].min(b[0]), acc[1].min(b[1]), acc[2].max(b[2]), acc[3].max(b[3])]
    });
    let mask_width = (mx1 - mx0) as usize;
    let mut mask = vec![0f32; mask_width * (my1 - my0) as usize];

    for &(a, b) in segments {
        let Some([x0, y0, x1, y1]) = segment_bounds(a, b, reach, width, height) else {
            continue;
        };
        for y in y0..y1 {
            let row = (y - my0) as usize * mask_width;
            for x in x0..x1 {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let coverage = (half + 0.5 - segment_distance(center, a, b)).clamp(0.0, 1.0) as f32;
                let cell = &mut mask[row + (x - mx0) as usize];
                *cell = cell.max(coverage);
            }
        }
    }

    for y in my0..my1 {
        let row = (y - my0) as usize * mask_width;
        for x in mx0..mx1 {
            let coverage = mask[row + (x - mx0) as usize];
            if coverage > 0.0 {
                target
                    .get_pixel_mut(x, y)
                    .blend(&style.color.with_coverage(coverage));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Shape};

    #[test]
    fn test_flatten_closed_rect() {
        let path = Rect::new(0.0, 0.0, 10.0, 10.0).to_path(DEFAULT_TOLERANCE);
        let lines = flatten_path(&path, DEFAULT_TOLERANCE);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].first(), lines[0].last());
        assert_eq!(lines[0].len(), 5);
    }

    #[test]
    fn test_segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_eq!(segment_distance(Point::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(segment_distance(Point::new(-4.0, 3.0), a, b), 5.0);
        assert_eq!(segment_distance(Point::new(1.0, 1.0), a, a), 2f64.sqrt());
    }

    #[test]
    fn test_stroke_line_paints_along_segment() {
        let mut img = RgbaImage::new(20, 20);
        let style = StrokeStyle::new(SerializableColor::black(), 3.0);
        stroke_line(&mut img, Point::new(2.0, 10.0), Point::new(18.0, 10.0), &style);

        assert_eq!(img.get_pixel(10, 9).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(10, 2).0[3], 0);
    }

    #[test]
    fn test_stroke_clips_to_bounds() {
        let mut img = RgbaImage::new(8, 8);
        let style = StrokeStyle::new(SerializableColor::black(), 4.0);
        stroke_line(&mut img, Point::new(-50.0, -50.0), Point::new(50.0, 50.0), &style);
        assert_eq!(img.get_pixel(4, 4).0[3], 255);
    }

    #[test]
    fn test_overlapping_segments_blend_once() {
        let color = SerializableColor::new(255, 0, 0, 128);
        let style = StrokeStyle::new(color, 4.0);

        let mut single = RgbaImage::new(20, 20);
        stroke_line(&mut single, Point::new(2.0, 10.0), Point::new(18.0, 10.0), &style);

        // out and back over the same pixels
        let mut path = BezPath::new();
        path.move_to((2.0, 10.0));
        path.line_to((18.0, 10.0));
        path.line_to((2.0, 10.0));
        let mut doubled = RgbaImage::new(20, 20);
        stroke_path(&mut doubled, &path, &style);

        let px = doubled.get_pixel(10, 10);
        assert_eq!(px, single.get_pixel(10, 10));
        assert!(px.0[3] > 100 && px.0[3] < 150);
    }

    #[test]
    fn test_far_segments_leave_gap_untouched() {
        let mut path = BezPath::new();
        path.move_to((1.0, 1.0));
        path.line_to((3.0, 1.0));
        path.move_to((60.0, 60.0));
        path.line_to((62.0, 60.0));

        let mut img = RgbaImage::new(64, 64);
        stroke_path(&mut img, &path, &StrokeStyle::new(SerializableColor::black(), 2.0));
        assert_eq!(img.get_pixel(2, 1).0[3], 255);
        assert_eq!(img.get_pixel(61, 60).0[3], 255);
        assert_eq!(img.get_pixel(30, 30).0[3], 0);
    }

    #[test]
    fn test_nonpositive_tolerance_falls_back() {
        let path = kurbo::Circle::new((0.0, 0.0), 10.0).to_path(DEFAULT_TOLERANCE);
        let lines = flatten_path(&path, 0.0);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].len() > 4);
    }

    #[test]
    fn test_zero_width_draws_nothing() {
        let mut img = RgbaImage::new(8, 8);
        let style = StrokeStyle::new(SerializableColor::black(), 0.0);
        stroke_line(&mut img, Point::new(0.0, 0.0), Point::new(8.0, 8.0), &style);
        assert!(img.pixels().all(|p| p.0[3] == 0));
    }
}
