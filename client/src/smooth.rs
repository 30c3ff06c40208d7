use crate::geometry::Point;

pub const SMOOTHING_ITERATIONS: usize = 2;

/// Chaikin corner cutting with pinned endpoints.
///
/// Each pass keeps the first and last point and replaces every segment
/// `(p0, p1)` by its quarter points `0.75 p0 + 0.25 p1` and
/// `0.25 p0 + 0.75 p1`. Sequences shorter than three points come back as-is.
pub fn chaikin(points: &[Point], iterations: usize) -> Vec<Point> {
    let mut current = points.to_vec();
    for _ in 0..iterations {
        if current.len() < 3 {
            break;
        }
        current = chaikin_pass(&current);
    }
    current
}

fn chaikin_pass(points: &[Point]) -> Vec<Point> {
    let mut out = Vec::with_capacity(points.len() * 2);
    out.push(points[0]);
    for window in points.windows(2) {
        let (p0, p1) = (window[0], window[1]);
        out.push(p0.lerp(p1, 0.25));
        out.push(p0.lerp(p1, 0.75));
    }
    out.push(points[points.len() - 1]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn short_inputs_pass_through() {
        assert!(chaikin(&[], 2).is_empty());
        let one = pts(&[(3.0, 4.0)]);
        assert_eq!(chaikin(&one, 2), one);
        let two = pts(&[(0.0, 0.0), (10.0, 10.0)]);
        assert_eq!(chaikin(&two, 5), two);
    }

    #[test]
    fn zero_iterations_is_identity() {
        let input = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert_eq!(chaikin(&input, 0), input);
    }

    #[test]
    fn single_pass_cuts_corners() {
        let input = pts(&[(0.0, 0.0), (8.0, 0.0), (8.0, 8.0)]);
        let out = chaikin(&input, 1);
        assert_eq!(
            out,
            pts(&[
                (0.0, 0.0),
                (2.0, 0.0),
                (6.0, 0.0),
                (8.0, 2.0),
                (8.0, 6.0),
                (8.0, 8.0),
            ])
        );
    }

    #[test]
    fn each_pass_doubles_the_point_count() {
        let input = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        assert_eq!(chaikin(&input, 1).len(), 8);
        assert_eq!(chaikin(&input, 2).len(), 16);
    }

    #[test]
    fn endpoints_are_pinned() {
        let input = pts(&[(1.5, -2.0), (7.0, 3.0), (-4.0, 9.25), (12.0, 0.5)]);
        for iterations in 0..5 {
            let out = chaikin(&input, iterations);
            assert_eq!(out.first(), input.first());
            assert_eq!(out.last(), input.last());
        }
    }

    #[test]
    fn output_is_deterministic() {
        let input = pts(&[(0.1, 0.2), (3.3, 7.7), (9.9, 1.1), (4.4, 4.4)]);
        assert_eq!(
            chaikin(&input, SMOOTHING_ITERATIONS),
            chaikin(&input, SMOOTHING_ITERATIONS)
        );
    }

    #[test]
    fn interior_points_move_off_the_raw_polyline() {
        let input = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let out = chaikin(&input, SMOOTHING_ITERATIONS);
        for point in &out[1..out.len() - 1] {
            assert!(!input.contains(point), "{point:?} was not smoothed");
        }
    }
}
