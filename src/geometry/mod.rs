//! Line geometries and the rectangular clipping domains.
pub mod antimeridian;
pub mod rect;

pub use antimeridian::split_antimeridian;
pub use rect::{Rect, WGS84_BOUNDS, WGS84_LEFT, WGS84_RIGHT};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub const fn new(x: f64, y: f64) -> Coord {
        Coord { x, y }
    }

    pub fn translate(self, xoff: f64, yoff: f64) -> Coord {
        Coord::new(self.x + xoff, self.y + yoff)
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Coord::new(x, y)
    }
}

impl From<Coord> for (f64, f64) {
    fn from(c: Coord) -> Self {
        (c.x, c.y)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString(pub Vec<Coord>);

impl LineString {
    pub fn new(coords: Vec<Coord>) -> LineString {
        LineString(coords)
    }

    pub fn coords(&self) -> &[Coord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A line needs at least two distinct vertices to have any length.
    pub fn is_degenerate(&self) -> bool {
        match self.0.first() {
            None => true,
            Some(first) => self.0.iter().all(|c| c == first),
        }
    }

    pub fn translate(&self, xoff: f64, yoff: f64) -> LineString {
        LineString(self.0.iter().map(|c| c.translate(xoff, yoff)).collect())
    }
}

impl From<Vec<(f64, f64)>> for LineString {
    fn from(coords: Vec<(f64, f64)>) -> Self {
        LineString(coords.into_iter().map(Coord::from).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiLineString(pub Vec<LineString>);

impl MultiLineString {
    pub fn lines(&self) -> &[LineString] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    LineString(LineString),
    MultiLineString(MultiLineString),
}

impl Geometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
        }
    }

    /// All component lines, in order.
    pub fn lines(&self) -> &[LineString] {
        match self {
            Geometry::LineString(line) => std::slice::from_ref(line),
            Geometry::MultiLineString(multi) => multi.lines(),
        }
    }
}

impl From<LineString> for Geometry {
    fn from(line: LineString) -> Self {
        Geometry::LineString(line)
    }
}

impl From<MultiLineString> for Geometry {
    fn from(multi: MultiLineString) -> Self {
        Geometry::MultiLineString(multi)
    }
}
