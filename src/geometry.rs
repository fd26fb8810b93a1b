//! Polygon geometry for contour candidates
//!
//! Polygons arrive from an external contour extractor as ordered integer
//! points. This module provides the measurements the sticker filter needs:
//! perimeter, Douglas-Peucker simplification, bounding box and enclosed area.

use serde::{Deserialize, Serialize};

/// 2D integer pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn distance(self, other: Point) -> f64 {
        let dx = (i64::from(self.x) - i64::from(other.x)) as f64;
        let dy = (i64::from(self.y) - i64::from(other.y)) as f64;
        dx.hypot(dy)
    }
}

/// Axis-aligned rectangle: top-left corner plus size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Ordered sequence of contour points, implicitly closed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn from_coords(coords: &[(i32, i32)]) -> Self {
        Self::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Perimeter, including the closing edge when `closed`
    pub fn arc_length(&self, closed: bool) -> f64 {
        let open: f64 = self
            .points
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum();

        match (closed, self.points.first(), self.points.last()) {
            (true, Some(&first), Some(&last)) if self.points.len() > 1 => {
                open + last.distance(first)
            }
            _ => open,
        }
    }

    /// Simplify a closed polygon with the Douglas-Peucker algorithm.
    ///
    /// The ring is split at the vertex farthest from the first point and each
    /// half simplified independently, so the result never repeats its first
    /// vertex. A final pass around the ring drops any kept vertex within
    /// `epsilon` of the line through its neighbours, which removes a start
    /// point lying on a straight edge.
    pub fn approximate(&self, epsilon: f64) -> Polygon {
        let points = &self.points;
        if points.len() < 3 {
            return self.clone();
        }

        let start = points[0];
        let (far, far_distance) = points
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, p)| (i, start.distance(*p)))
            .fold((0, 0.0), |best, candidate| {
                if candidate.1 > best.1 {
                    candidate
                } else {
                    best
                }
            });
        if far_distance == 0.0 {
            return Polygon::new(vec![start]);
        }

        let mut result = Vec::new();
        simplify(&points[..=far], epsilon, &mut result);
        result.pop();

        let mut closing: Vec<Point> = points[far..].to_vec();
        closing.push(start);
        simplify(&closing, epsilon, &mut result);
        result.pop();

        prune_collinear(&mut result, epsilon);
        Polygon::new(result)
    }

    /// Bounding box using the inclusive pixel convention (`width = max - min + 1`)
    ///
    /// Returns `None` for an empty polygon or when the extent does not fit in `i32`.
    pub fn bounding_rect(&self) -> Option<Rect> {
        let first = self.points.first()?;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        let width = i32::try_from(i64::from(max_x) - i64::from(min_x) + 1).ok()?;
        let height = i32::try_from(i64::from(max_y) - i64::from(min_y) + 1).ok()?;
        Some(Rect::new(min_x, min_y, width, height))
    }

    /// Unsigned enclosed area (shoelace formula)
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: i128 = (0..n)
            .map(|i| {
                let p = self.points[i];
                let q = self.points[(i + 1) % n];
                i128::from(p.x) * i128::from(q.y) - i128::from(q.x) * i128::from(p.y)
            })
            .sum();
        (twice as f64 / 2.0).abs()
    }
}

/// Douglas-Peucker on an open polyline; appends the kept points, endpoints included
fn simplify(points: &[Point], epsilon: f64, out: &mut Vec<Point>) {
    let (first, last) = match (points.first(), points.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return,
    };
    if points.len() < 3 {
        out.extend_from_slice(points);
        return;
    }

    let mut split = 0;
    let mut max_distance = 0.0;
    for (i, p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let distance = perpendicular_distance(*p, first, last);
        if distance > max_distance {
            split = i;
            max_distance = distance;
        }
    }

    if max_distance > epsilon {
        simplify(&points[..=split], epsilon, out);
        out.pop();
        simplify(&points[split..], epsilon, out);
    } else {
        out.push(first);
        out.push(last);
    }
}

/// Drop ring vertices within `epsilon` of the line through their neighbours
fn prune_collinear(ring: &mut Vec<Point>, epsilon: f64) {
    while ring.len() > 3 {
        let n = ring.len();
        let redundant = (0..n).find(|&i| {
            let prev = ring[(i + n - 1) % n];
            let next = ring[(i + 1) % n];
            perpendicular_distance(ring[i], prev, next) <= epsilon
        });
        match redundant {
            Some(i) => {
                ring.remove(i);
            }
            None => break,
        }
    }
}

/// Distance from `p` to the line through `a` and `b`
fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let length = a.distance(b);
    if length == 0.0 {
        return p.distance(a);
    }
    let (px, py) = (f64::from(p.x), f64::from(p.y));
    let (ax, ay) = (f64::from(a.x), f64::from(a.y));
    let (bx, by) = (f64::from(b.x), f64::from(b.y));
    let cross = (bx - ax) * (ay - py) - (ax - px) * (by - ay);
    cross.abs() / length
}
