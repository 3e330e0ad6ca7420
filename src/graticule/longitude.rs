//! Recovers the sign of longitude contours traced on `|qd_lon|`.
//!
//! Contouring the absolute longitude keeps lines whole across the ±180° seam of the signed
//! field. Each such line is then walked against the signed field and cut wherever the
//! sampled sign flips. The vertex where the flip is seen ends the closing segment and also
//! starts the next one.
use crate::contour::ScalarField;
use crate::geometry::{Coord, LineString};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run {
    Positive,
    Negative,
}

impl Run {
    fn of(sample: f64) -> Run {
        if sample >= 0.0 {
            Run::Positive
        } else {
            Run::Negative
        }
    }

    fn apply(self, magnitude: f64) -> f64 {
        match self {
            Run::Positive => magnitude,
            Run::Negative if magnitude == 0.0 => 0.0,
            Run::Negative => -magnitude,
        }
    }
}

/// A piece of a longitude line with its signed value.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedSegment {
    pub geometry: LineString,
    pub value: f64,
}

/// Splits a contour of `|lon|` at `magnitude` into runs of constant sign in `signed`.
///
/// Vertices where `signed` has no value are skipped. Runs left with fewer than 2 vertices are
/// dropped.
pub fn resign_longitude(line: &LineString, magnitude: f64, signed: &ScalarField) -> Vec<SignedSegment> {
    let (mut runs, open) = line
        .coords()
        .iter()
        .filter_map(|&c| signed.sample_nearest(c).map(|v| (c, Run::of(v))))
        .fold(
            (Vec::<(Run, Vec<Coord>)>::new(), None::<(Run, Vec<Coord>)>),
            |(mut runs, open), (c, run)| {
                let open = match open {
                    None => (run, vec![c]),
                    Some((current, mut coords)) if current == run => {
                        coords.push(c);
                        (current, coords)
                    }
                    Some((current, mut coords)) => {
                        coords.push(c);
                        runs.push((current, coords));
                        (run, vec![c])
                    }
                };
                (runs, Some(open))
            },
        );
    runs.extend(open);

    runs.into_iter()
        .filter(|(_, coords)| coords.len() >= 2)
        .map(|(run, coords)| SignedSegment {
            geometry: LineString(coords),
            value: run.apply(magnitude),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::Bounds;

    /// Signed field that is negative west of `split` and positive east of it.
    fn halves(split: f64) -> ScalarField {
        ScalarField::from_fn(Bounds::global(), 361, 181, |lon, _| {
            if lon < split {
                -90.0
            } else {
                90.0
            }
        })
        .unwrap()
    }

    #[test]
    fn single_sign_keeps_the_line() {
        let field = halves(-200.0);
        let line = LineString::from(vec![(10.0, 0.0), (10.0, 10.0), (10.0, 20.0)]);
        let segments = resign_longitude(&line, 90.0, &field);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].geometry, line);
        assert_eq!(segments[0].value, 90.0);
    }

    #[test]
    fn negative_run_gets_negative_value() {
        let field = halves(200.0);
        let line = LineString::from(vec![(10.0, 0.0), (10.0, 10.0)]);
        let segments = resign_longitude(&line, 90.0, &field);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].value, -90.0);
    }

    #[test]
    fn flip_vertex_is_shared() {
        let field = halves(0.0);
        let line = LineString::from(vec![
            (-30.0, 0.0),
            (-20.0, 0.0),
            (-10.0, 0.0),
            (10.0, 0.0),
            (20.0, 0.0),
        ]);
        let segments = resign_longitude(&line, 90.0, &field);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].value, -90.0);
        assert_eq!(
            segments[0].geometry,
            LineString::from(vec![(-30.0, 0.0), (-20.0, 0.0), (-10.0, 0.0), (10.0, 0.0)])
        );
        assert_eq!(segments[1].value, 90.0);
        assert_eq!(
            segments[1].geometry,
            LineString::from(vec![(10.0, 0.0), (20.0, 0.0)])
        );
    }

    #[test]
    fn flips_back_and_forth() {
        let field = halves(0.0);
        let line = LineString::from(vec![(5.0, 0.0), (-5.0, 0.0), (5.0, 1.0), (-5.0, 1.0)]);
        let values: Vec<f64> = resign_longitude(&line, 45.0, &field)
            .into_iter()
            .map(|s| s.value)
            .collect();
        // The trailing run only holds the last vertex and is dropped
        assert_eq!(values, vec![45.0, -45.0, 45.0]);
    }

    #[test]
    fn vertices_outside_the_grid_are_skipped() {
        let field = halves(0.0);
        let line = LineString::from(vec![(10.0, 0.0), (10.0, 95.0), (20.0, 0.0)]);
        let segments = resign_longitude(&line, 90.0, &field);
        assert_eq!(segments.len(), 1);
        assert_eq!(
            segments[0].geometry,
            LineString::from(vec![(10.0, 0.0), (20.0, 0.0)])
        );
    }

    #[test]
    fn zero_magnitude_is_unsigned() {
        let field = halves(200.0);
        let line = LineString::from(vec![(10.0, 0.0), (10.0, 10.0)]);
        assert_eq!(resign_longitude(&line, 0.0, &field)[0].value.to_bits(), 0.0f64.to_bits());
    }
}
