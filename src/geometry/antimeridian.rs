use crate::geometry::rect::{WGS84_BOUNDS, WGS84_LEFT, WGS84_RIGHT};
use crate::geometry::{Geometry, LineString, MultiLineString};
use crate::utils::constants::FULL_CIRCLE;

/// Splits a line that leaves the canonical domain into pieces that lie inside it.
///
/// A line inside `[-180, 180] x [-90, 90]` is returned as is. Otherwise the parts inside the
/// canonical domain are kept, and the parts inside the domains one turn west and east are
/// shifted back by +360 and -360 degrees. Parts that collapse to a point are dropped, so the
/// result may be an empty `MultiLineString`.
pub fn split_antimeridian(line: LineString) -> Geometry {
    if WGS84_BOUNDS.contains(&line) {
        return Geometry::LineString(line);
    }

    let mut pieces = WGS84_BOUNDS.clip(&line);
    pieces.extend(
        WGS84_LEFT
            .clip(&line)
            .into_iter()
            .map(|l| l.translate(FULL_CIRCLE, 0.0)),
    );
    pieces.extend(
        WGS84_RIGHT
            .clip(&line)
            .into_iter()
            .map(|l| l.translate(-FULL_CIRCLE, 0.0)),
    );
    log::debug!(
        "Split line of {} vertices across the antimeridian into {} pieces",
        line.len(),
        pieces.len()
    );

    Geometry::MultiLineString(MultiLineString(pieces))
}
