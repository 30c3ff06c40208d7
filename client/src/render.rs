use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::capture::Stroke;
use crate::geometry::Point;
use crate::smooth::{chaikin, SMOOTHING_ITERATIONS};

pub const STROKE_COLOR: &str = "#9c4d95";
pub const STROKE_WIDTH: f64 = 2.0;

/// The drawing primitives the renderer needs from a 2D raster.
pub trait Surface {
    fn clear(&mut self);
    fn set_style(&mut self, color: &str, width: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, point: Point);
    fn line_to(&mut self, point: Point);
    fn stroke(&mut self);
    fn fill_disc(&mut self, center: Point, radius: f64);
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        Self { canvas, ctx }
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn set_style(&mut self, color: &str, width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_fill_style_str(color);
        self.ctx.set_line_width(width);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, point: Point) {
        self.ctx.move_to(point.x, point.y);
    }

    fn line_to(&mut self, point: Point) {
        self.ctx.line_to(point.x, point.y);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill_disc(&mut self, center: Point, radius: f64) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x, center.y, radius, 0.0, std::f64::consts::PI * 2.0);
        self.ctx.fill();
    }
}

/// Repaints the whole surface from the given strokes.
///
/// Committed strokes are painted in order, then the gesture in flight, all
/// with the same colour and width.
pub fn render<S: Surface + ?Sized>(
    surface: &mut S,
    committed: &[Stroke],
    in_progress: Option<&[Point]>,
) {
    surface.clear();
    surface.set_style(STROKE_COLOR, STROKE_WIDTH);
    for stroke in committed {
        draw_stroke(surface, stroke);
    }
    if let Some(points) = in_progress {
        draw_stroke(surface, points);
    }
}

pub fn draw_stroke<S: Surface + ?Sized>(surface: &mut S, points: &[Point]) {
    match points {
        [] => {}
        [dot] => surface.fill_disc(*dot, STROKE_WIDTH),
        _ => {
            let smooth = chaikin(points, SMOOTHING_ITERATIONS);
            surface.begin_path();
            surface.move_to(smooth[0]);
            for point in &smooth[1..] {
                surface.line_to(*point);
            }
            surface.stroke();
        }
    }
}


#[cfg(test)]
mod tests {
    use super::recording::{DrawOp, RecordingSurface};
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn empty_state_only_clears() {
        let mut surface = RecordingSurface::default();
        render(&mut surface, &[], None);
        assert_eq!(surface.clears, 1);
        assert!(surface.paths().is_empty());
        assert!(surface.discs().is_empty());
    }

    #[test]
    fn dot_is_a_disc_with_the_stroke_width_as_radius() {
        let mut surface = RecordingSurface::default();
        render(&mut surface, &[vec![p(5.0, 5.0)]], None);
        assert_eq!(surface.discs(), vec![(p(5.0, 5.0), STROKE_WIDTH)]);
        assert!(surface.paths().is_empty());
    }

    #[test]
    fn path_is_smoothed_between_pinned_endpoints() {
        let raw = vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)];
        let mut surface = RecordingSurface::default();
        render(&mut surface, &[raw.clone()], None);
        let paths = surface.paths();
        assert_eq!(paths.len(), 1);
        let path = &paths[0];
        assert_eq!(path.first(), Some(&p(0.0, 0.0)));
        assert_eq!(path.last(), Some(&p(10.0, 10.0)));
        assert_eq!(path.len(), 12);
        for point in &path[1..path.len() - 1] {
            assert!(!raw.contains(point));
        }
    }

    #[test]
    fn two_point_stroke_is_a_straight_segment() {
        let mut surface = RecordingSurface::default();
        render(&mut surface, &[vec![p(1.0, 1.0), p(4.0, 5.0)]], None);
        assert_eq!(surface.paths(), vec![vec![p(1.0, 1.0), p(4.0, 5.0)]]);
    }

    #[test]
    fn in_progress_is_painted_last_with_the_same_style() {
        let committed = vec![vec![p(0.0, 0.0)], vec![p(0.0, 0.0), p(3.0, 3.0)]];
        let live = [p(20.0, 20.0), p(25.0, 20.0)];
        let mut surface = RecordingSurface::default();
        render(&mut surface, &committed, Some(&live[..]));
        let styles: Vec<_> = surface
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Style { .. }))
            .collect();
        assert_eq!(
            styles,
            vec![&DrawOp::Style {
                color: STROKE_COLOR.to_string(),
                width: STROKE_WIDTH,
            }]
        );
        let paths = surface.paths();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[1], live.to_vec());
        assert_eq!(surface.discs().len(), 1);
    }

    #[test]
    fn in_progress_single_point_shows_as_a_dot() {
        let mut surface = RecordingSurface::default();
        render(&mut surface, &[], Some(&[p(7.0, 8.0)][..]));
        assert_eq!(surface.discs(), vec![(p(7.0, 8.0), STROKE_WIDTH)]);
    }

    #[test]
    fn repeated_renders_are_identical() {
        let committed = vec![
            vec![p(0.0, 0.0), p(3.0, 9.0), p(12.0, 4.0), p(20.0, 20.0)],
            vec![p(50.0, 50.0)],
        ];
        let mut surface = RecordingSurface::default();
        render(&mut surface, &committed, None);
        let first = surface.ops.clone();
        render(&mut surface, &committed, None);
        assert_eq!(surface.ops, first);
        assert_eq!(surface.clears, 2);
    }
}
