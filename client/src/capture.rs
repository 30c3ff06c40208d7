use crate::geometry::Point;

/// Releases closer than this to the press point, on both axes, become dots.
pub const DOT_THRESHOLD: f64 = 2.0;

/// One continuous gesture. Length 1 is a dot.
pub type Stroke = Vec<Point>;

struct Gesture {
    origin: Point,
    points: Stroke,
}

/// Committed strokes plus at most one gesture in flight.
///
/// Every operation returns whether the observable state changed, which is
/// what callers use to decide when to repaint.
#[derive(Default)]
pub struct StrokeCapture {
    strokes: Vec<Stroke>,
    gesture: Option<Gesture>,
}

impl StrokeCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn in_progress(&self) -> Option<&[Point]> {
        self.gesture.as_ref().map(|gesture| gesture.points.as_slice())
    }

    pub fn origin(&self) -> Option<Point> {
        self.gesture.as_ref().map(|gesture| gesture.origin)
    }

    pub fn is_drawing(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn can_undo(&self) -> bool {
        !self.strokes.is_empty()
    }

    /// Starts a gesture at `point`, replacing any gesture already in flight.
    pub fn begin(&mut self, point: Point) -> bool {
        if self.gesture.is_some() {
            log::debug!("begin while drawing, discarding previous gesture");
        }
        self.gesture = Some(Gesture {
            origin: point,
            points: vec![point],
        });
        true
    }

    pub fn extend(&mut self, point: Point) -> bool {
        match &mut self.gesture {
            Some(gesture) => {
                gesture.points.push(point);
                true
            }
            None => false,
        }
    }

    /// Finishes the gesture released at `point`.
    ///
    /// A release within [`DOT_THRESHOLD`] of the origin commits a dot at the
    /// origin. Otherwise a gesture of two or more points is committed as
    /// captured, repeated points included, and a lone point is dropped.
    pub fn end(&mut self, point: Point) -> bool {
        let Some(Gesture { origin, points }) = self.gesture.take() else {
            return false;
        };
        if point.within(origin, DOT_THRESHOLD) {
            log::debug!("committed dot at ({}, {})", origin.x, origin.y);
            self.strokes.push(vec![origin]);
        } else if points.len() > 1 {
            log::debug!("committed stroke with {} points", points.len());
            self.strokes.push(points);
        } else {
            log::debug!("dropped single point gesture released away from its origin");
        }
        true
    }

    pub fn undo_last(&mut self) -> bool {
        let discarded = self.gesture.take().is_some();
        let removed = self.strokes.pop().is_some();
        discarded || removed
    }

    pub fn clear_all(&mut self) -> bool {
        let changed = self.gesture.is_some() || !self.strokes.is_empty();
        self.gesture = None;
        self.strokes.clear();
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn drag_commits_the_captured_points() {
        let mut capture = StrokeCapture::new();
        capture.begin(p(0.0, 0.0));
        capture.extend(p(10.0, 0.0));
        capture.extend(p(10.0, 10.0));
        capture.end(p(10.0, 10.0));
        assert_eq!(
            capture.strokes(),
            &[vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)]]
        );
        assert!(!capture.is_drawing());
    }

    #[test]
    fn click_commits_a_dot_at_the_origin() {
        let mut capture = StrokeCapture::new();
        capture.begin(p(5.0, 5.0));
        capture.end(p(5.0, 5.0));
        assert_eq!(capture.strokes(), &[vec![p(5.0, 5.0)]]);
    }

    #[test]
    fn jitter_inside_the_threshold_collapses_to_a_dot() {
        let mut capture = StrokeCapture::new();
        capture.begin(p(5.0, 5.0));
        capture.extend(p(6.0, 4.5));
        capture.extend(p(6.5, 5.5));
        capture.end(p(6.9, 3.1));
        assert_eq!(capture.strokes(), &[vec![p(5.0, 5.0)]]);
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut capture = StrokeCapture::new();
        capture.begin(p(0.0, 0.0));
        capture.extend(p(2.0, 0.0));
        capture.end(p(2.0, 0.0));
        assert_eq!(capture.strokes(), &[vec![p(0.0, 0.0), p(2.0, 0.0)]]);
    }

    #[test]
    fn lone_point_released_far_away_is_dropped() {
        let mut capture = StrokeCapture::new();
        capture.begin(p(0.0, 0.0));
        assert!(capture.end(p(30.0, 30.0)));
        assert!(capture.strokes().is_empty());
        assert!(capture.in_progress().is_none());
    }

    #[test]
    fn repeated_point_released_far_away_is_committed() {
        let mut capture = StrokeCapture::new();
        capture.begin(p(0.0, 0.0));
        capture.extend(p(0.0, 0.0));
        assert!(capture.end(p(30.0, 30.0)));
        assert_eq!(capture.strokes(), &[vec![p(0.0, 0.0), p(0.0, 0.0)]]);
    }

    #[test]
    fn origin_tracks_the_gesture_in_flight() {
        let mut capture = StrokeCapture::new();
        assert_eq!(capture.origin(), None);
        capture.begin(p(3.0, 4.0));
        capture.extend(p(9.0, 9.0));
        assert_eq!(capture.origin(), Some(p(3.0, 4.0)));
        capture.end(p(9.0, 9.0));
        assert_eq!(capture.origin(), None);
    }

    #[test]
    fn release_point_is_not_appended() {
        let mut capture = StrokeCapture::new();
        capture.begin(p(0.0, 0.0));
        capture.extend(p(10.0, 0.0));
        capture.end(p(50.0, 50.0));
        assert_eq!(capture.strokes(), &[vec![p(0.0, 0.0), p(10.0, 0.0)]]);
    }

    #[test]
    fn extend_and_end_without_begin_are_ignored() {
        let mut capture = StrokeCapture::new();
        assert!(!capture.extend(p(1.0, 1.0)));
        assert!(!capture.end(p(1.0, 1.0)));
        assert!(capture.strokes().is_empty());
        assert!(!capture.is_drawing());
    }

    #[test]
    fn begin_while_drawing_starts_over() {
        let mut capture = StrokeCapture::new();
        capture.begin(p(0.0, 0.0));
        capture.extend(p(40.0, 40.0));
        capture.begin(p(100.0, 100.0));
        assert_eq!(capture.in_progress(), Some(&[p(100.0, 100.0)][..]));
        capture.end(p(100.5, 100.5));
        assert_eq!(capture.strokes(), &[vec![p(100.0, 100.0)]]);
    }

    #[test]
    fn in_progress_is_visible_while_drawing() {
        let mut capture = StrokeCapture::new();
        assert!(capture.in_progress().is_none());
        capture.begin(p(1.0, 2.0));
        capture.extend(p(3.0, 4.0));
        assert_eq!(capture.in_progress(), Some(&[p(1.0, 2.0), p(3.0, 4.0)][..]));
        assert!(capture.strokes().is_empty());
    }

    #[test]
    fn undo_removes_the_most_recent_stroke() {
        let mut capture = StrokeCapture::new();
        for x in [0.0, 10.0, 20.0] {
            capture.begin(p(x, 0.0));
            capture.end(p(x, 0.0));
        }
        assert!(capture.undo_last());
        assert_eq!(capture.strokes(), &[vec![p(0.0, 0.0)], vec![p(10.0, 0.0)]]);
    }

    #[test]
    fn undo_on_empty_is_a_noop() {
        let mut capture = StrokeCapture::new();
        assert!(!capture.undo_last());
        assert!(!capture.can_undo());
    }

    #[test]
    fn undo_discards_the_gesture_in_flight() {
        let mut capture = StrokeCapture::new();
        capture.begin(p(0.0, 0.0));
        capture.end(p(0.0, 0.0));
        capture.begin(p(5.0, 5.0));
        assert!(capture.undo_last());
        assert!(capture.strokes().is_empty());
        assert!(!capture.is_drawing());
    }

    #[test]
    fn clear_empties_everything() {
        let mut capture = StrokeCapture::new();
        capture.begin(p(0.0, 0.0));
        capture.end(p(0.0, 0.0));
        capture.begin(p(1.0, 1.0));
        capture.extend(p(9.0, 9.0));
        assert!(capture.clear_all());
        assert!(capture.strokes().is_empty());
        assert!(capture.in_progress().is_none());
        assert!(!capture.clear_all());
    }
}
