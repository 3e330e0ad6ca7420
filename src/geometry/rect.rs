use crate::geometry::{Coord, LineString};

/// The canonical geographic domain.
pub const WGS84_BOUNDS: Rect = Rect::new(-180.0, -90.0, 180.0, 90.0);
/// The canonical domain shifted one turn west.
pub const WGS84_LEFT: Rect = Rect::new(-540.0, -90.0, -180.0, 90.0);
/// The canonical domain shifted one turn east.
pub const WGS84_RIGHT: Rect = Rect::new(180.0, -90.0, 540.0, 90.0);

/// Axis-aligned rectangle, boundary included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Coord,
    pub max: Coord,
}

impl Rect {
    pub const fn new(left: f64, bottom: f64, right: f64, top: f64) -> Rect {
        Rect {
            min: Coord::new(left, bottom),
            max: Coord::new(right, top),
        }
    }

    pub fn contains_coord(&self, c: Coord) -> bool {
        c.x >= self.min.x && c.x <= self.max.x && c.y >= self.min.y && c.y <= self.max.y
    }

    /// A line lies within a convex region exactly when all its vertices do.
    pub fn contains(&self, line: &LineString) -> bool {
        line.coords().iter().all(|&c| self.contains_coord(c))
    }

    /// Clips a segment with the Liang-Barsky algorithm.
    ///
    /// Returns the clipped end points and whether the segment leaves the rectangle before
    /// reaching `b`.
    fn clip_segment(&self, a: Coord, b: Coord) -> Option<(Coord, Coord, bool)> {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        let edges = [
            (-dx, a.x - self.min.x),
            (dx, self.max.x - a.x),
            (-dy, a.y - self.min.y),
            (dy, self.max.y - a.y),
        ];
        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        // Interpolated crossings are snapped onto the boundary so rounding never pushes them
        // outside the rectangle.
        let at = |t: f64| -> Coord {
            Coord::new(
                (a.x + t * dx).clamp(self.min.x, self.max.x),
                (a.y + t * dy).clamp(self.min.y, self.max.y),
            )
        };
        let start = if t0 == 0.0 { a } else { at(t0) };
        let (end, exits) = if t1 == 1.0 { (b, false) } else { (at(t1), true) };
        Some((start, end, exits))
    }

    /// Intersection of a line with the rectangle, as the list of runs inside it.
    ///
    /// Runs that collapse to a single point are dropped.
    pub fn clip(&self, line: &LineString) -> Vec<LineString> {
        let mut pieces = vec![];
        let mut current: Vec<Coord> = vec![];

        let mut flush = |current: &mut Vec<Coord>| {
            let piece = LineString(std::mem::take(current));
            if piece.is_degenerate() {
                if !piece.is_empty() {
                    log::trace!("Dropping degenerate clip piece {:?}", piece.coords());
                }
            } else {
                pieces.push(piece);
            }
        };

        for w in line.coords().windows(2) {
            match self.clip_segment(w[0], w[1]) {
                None => flush(&mut current),
                Some((start, end, exits)) => {
                    if current.last() != Some(&start) {
                        flush(&mut current);
                        current.push(start);
                    }
                    if current.last() != Some(&end) {
                        current.push(end);
                    }
                    if exits {
                        flush(&mut current);
                    }
                }
            }
        }
        flush(&mut current);
        pieces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(coords: &[(f64, f64)]) -> LineString {
        LineString::from(coords.to_vec())
    }

    #[test]
    fn contained_lines_clip_to_themselves() {
        let l = line(&[(-10.0, 0.0), (10.0, 5.0), (20.0, -5.0)]);
        assert!(WGS84_BOUNDS.contains(&l));
        assert_eq!(WGS84_BOUNDS.clip(&l), vec![l]);
    }

    #[test]
    fn crossing_segment_is_cut_on_the_boundary() {
        let l = line(&[(170.0, 0.0), (190.0, 10.0)]);
        assert!(!WGS84_BOUNDS.contains(&l));
        assert_eq!(
            WGS84_BOUNDS.clip(&l),
            vec![line(&[(170.0, 0.0), (180.0, 5.0)])]
        );
        assert_eq!(
            WGS84_RIGHT.clip(&l),
            vec![line(&[(180.0, 5.0), (190.0, 10.0)])]
        );
        assert!(WGS84_LEFT.clip(&l).is_empty());
    }

    #[test]
    fn leaving_and_reentering_gives_two_runs() {
        let l = line(&[(170.0, 0.0), (190.0, 0.0), (170.0, 10.0)]);
        let pieces = WGS84_BOUNDS.clip(&l);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0], line(&[(170.0, 0.0), (180.0, 0.0)]));
        assert_eq!(pieces[1], line(&[(180.0, 5.0), (170.0, 10.0)]));
    }

    #[test]
    fn touching_a_corner_is_degenerate() {
        let l = line(&[(170.0, 100.0), (190.0, 80.0)]);
        assert!(WGS84_BOUNDS.clip(&l).is_empty());
    }

    #[test]
    fn disjoint_lines_clip_to_nothing() {
        let l = line(&[(200.0, 0.0), (210.0, 0.0)]);
        assert!(WGS84_BOUNDS.clip(&l).is_empty());
    }
}
