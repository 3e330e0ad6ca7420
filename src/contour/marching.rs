//! Marching squares iso-line tracer.
//!
//! Crossings are interpolated linearly along the grid edges and identified by the edge they
//! lie on, so the segments produced by neighbouring cells join exactly. Segments are then
//! chained into open paths, which start and end on the grid border or next to missing data,
//! and closed rings.
//!
//! A node counts as above the level only when it is strictly greater. A level equal to the
//! field maximum therefore traces nothing. Paths lying entirely along one side of the grid are
//! dropped, so a constant border row or column at the level never becomes a line.
use itertools::iproduct;
use ndarray::Array2;
use std::collections::HashMap;

/// Grid edge between two neighbouring nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Edge {
    /// Between `(row, col)` and `(row, col + 1)`
    Horizontal(usize, usize),
    /// Between `(row, col)` and `(row + 1, col)`
    Vertical(usize, usize),
}

/// A traced iso-line in fractional `(row, col)` grid indices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Isoline {
    pub vertices: Vec<(f64, f64)>,
    pub closed: bool,
}

struct Tracer<'a> {
    values: &'a Array2<f64>,
    level: f64,
    segments: Vec<[Edge; 2]>,
    adjacency: HashMap<Edge, Vec<usize>>,
    used: Vec<bool>,
}

impl<'a> Tracer<'a> {
    fn new(values: &'a Array2<f64>, level: f64) -> Tracer<'a> {
        Tracer {
            values,
            level,
            segments: vec![],
            adjacency: HashMap::new(),
            used: vec![],
        }
    }

    fn add_segment(&mut self, a: Edge, b: Edge) {
        let index = self.segments.len();
        self.segments.push([a, b]);
        self.adjacency.entry(a).or_default().push(index);
        self.adjacency.entry(b).or_default().push(index);
    }

    /// Emits the segments of every cell, scanning row by row.
    fn march(&mut self) {
        let (rows, cols) = self.values.dim();
        if rows < 2 || cols < 2 {
            return;
        }
        let level = self.level;
        for (r, c) in iproduct!(0..rows - 1, 0..cols - 1) {
            let tl = self.values[(r, c)];
            let tr = self.values[(r, c + 1)];
            let br = self.values[(r + 1, c + 1)];
            let bl = self.values[(r + 1, c)];
            if tl.is_nan() || tr.is_nan() || br.is_nan() || bl.is_nan() {
                continue;
            }

            let mut case = 0u8;
            if tl > level {
                case |= 1;
            }
            if tr > level {
                case |= 2;
            }
            if br > level {
                case |= 4;
            }
            if bl > level {
                case |= 8;
            }

            let top = Edge::Horizontal(r, c);
            let bottom = Edge::Horizontal(r + 1, c);
            let left = Edge::Vertical(r, c);
            let right = Edge::Vertical(r, c + 1);

            // Saddles are resolved with the mean of the corners
            let centre_above = || (tl + tr + br + bl) / 4.0 > level;
            match case {
                1 | 14 => self.add_segment(left, top),
                2 | 13 => self.add_segment(top, right),
                3 | 12 => self.add_segment(left, right),
                4 | 11 => self.add_segment(right, bottom),
                6 | 9 => self.add_segment(top, bottom),
                7 | 8 => self.add_segment(left, bottom),
                5 => {
                    if centre_above() {
                        self.add_segment(top, right);
                        self.add_segment(left, bottom);
                    } else {
                        self.add_segment(left, top);
                        self.add_segment(right, bottom);
                    }
                }
                10 => {
                    if centre_above() {
                        self.add_segment(left, top);
                        self.add_segment(right, bottom);
                    } else {
                        self.add_segment(top, right);
                        self.add_segment(left, bottom);
                    }
                }
                _ => {}
            }
        }
        self.used = vec![false; self.segments.len()];
    }

    fn degree(&self, edge: &Edge) -> usize {
        self.adjacency.get(edge).map_or(0, Vec::len)
    }

    /// Follows unused segments from `start` until the chain ends or closes.
    fn walk(&mut self, start: Edge, first_segment: usize) -> Vec<Edge> {
        let mut path = vec![start];
        let mut edge = start;
        let mut next = Some(first_segment);
        while let Some(segment) = next {
            self.used[segment] = true;
            let [a, b] = self.segments[segment];
            edge = if a == edge { b } else { a };
            path.push(edge);
            next = self.adjacency.get(&edge).and_then(|candidates| {
                candidates.iter().copied().find(|&s| !self.used[s])
            });
        }
        path
    }

    /// Where the iso-line crosses an edge, as a fractional `(row, col)` index.
    fn crossing(&self, edge: Edge) -> (f64, f64) {
        let interpolate = |a: f64, b: f64| -> f64 {
            if a == b {
                0.5
            } else {
                ((self.level - a) / (b - a)).clamp(0.0, 1.0)
            }
        };
        match edge {
            Edge::Horizontal(r, c) => {
                let t = interpolate(self.values[(r, c)], self.values[(r, c + 1)]);
                (r as f64, c as f64 + t)
            }
            Edge::Vertical(r, c) => {
                let t = interpolate(self.values[(r, c)], self.values[(r + 1, c)]);
                (r as f64 + t, c as f64)
            }
        }
    }

    fn to_isoline(&self, path: Vec<Edge>, closed: bool) -> Isoline {
        Isoline {
            vertices: path.into_iter().map(|e| self.crossing(e)).collect(),
            closed,
        }
    }

    /// Whether every vertex sits on the same side of the grid.
    fn hugs_border(&self, isoline: &Isoline) -> bool {
        let (rows, cols) = self.values.dim();
        let (last_row, last_col) = ((rows - 1) as f64, (cols - 1) as f64);
        let vertices = &isoline.vertices;
        vertices.iter().all(|v| v.0 == 0.0)
            || vertices.iter().all(|v| v.0 == last_row)
            || vertices.iter().all(|v| v.1 == 0.0)
            || vertices.iter().all(|v| v.1 == last_col)
    }

    fn trace(mut self) -> Vec<Isoline> {
        self.march();
        let mut isolines = vec![];

        // Open paths first, each started from whichever of its ends is found first
        for i in 0..self.segments.len() {
            if self.used[i] {
                continue;
            }
            let start = self.segments[i]
                .into_iter()
                .find(|e| self.degree(e) == 1);
            if let Some(start) = start {
                let path = self.walk(start, i);
                isolines.push(self.to_isoline(path, false));
            }
        }

        // Everything left belongs to a ring
        for i in 0..self.segments.len() {
            if !self.used[i] {
                let path = self.walk(self.segments[i][0], i);
                isolines.push(self.to_isoline(path, true));
            }
        }
        isolines.retain(|isoline| !self.hugs_border(isoline));
        isolines
    }
}

/// Traces the iso-lines of `values` at `level`.
pub(crate) fn trace_isolines(values: &Array2<f64>, level: f64) -> Vec<Isoline> {
    Tracer::new(values, level).trace()
}
