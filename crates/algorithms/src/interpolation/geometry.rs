//! Planar geometry for piecewise-linear interpolation
//!
//! Orientation and in-circle predicates, an incremental Bowyer–Watson
//! Delaunay triangulation, barycentric coordinates and three-point plane
//! fitting. All predicates use the fixed tolerances in [`crate::tolerance`].

use crate::tolerance::{BARYCENTRIC_INSIDE, CIRCUMCIRCLE_SLACK, DEGENERATE_AREA};

use super::SamplePoint;

/// Signed doubled area of triangle `(a, b, c)`.
///
/// Positive for a counter-clockwise turn, negative for clockwise.
#[inline]
pub fn orientation(a: &SamplePoint, b: &SamplePoint, c: &SamplePoint) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Whether the (x, y) projections of three points are collinear
#[inline]
pub fn is_collinear(a: &SamplePoint, b: &SamplePoint, c: &SamplePoint) -> bool {
    orientation(a, b, c).abs() < DEGENERATE_AREA
}

/// Circumcircle of a triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circumcircle {
    pub cx: f64,
    pub cy: f64,
    pub radius_sq: f64,
}

impl Circumcircle {
    /// In-circle test with a small relative slack, so points on the circle
    /// count as inside
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.cx;
        let dy = y - self.cy;
        dx * dx + dy * dy <= self.radius_sq * (1.0 + CIRCUMCIRCLE_SLACK)
    }
}

/// Compute the circumcircle of three points.
///
/// Returns `None` for a near-degenerate triple.
pub fn circumcircle(p0: &SamplePoint, p1: &SamplePoint, p2: &SamplePoint) -> Option<Circumcircle> {
    let (ax, ay) = (p0.x, p0.y);
    let (bx, by) = (p1.x, p1.y);
    let (cx, cy) = (p2.x, p2.y);

    let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
    if d.abs() < DEGENERATE_AREA {
        return None;
    }

    let a2 = ax * ax + ay * ay;
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;

    let ux = (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d;
    let uy = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;

    let dx = ux - ax;
    let dy = uy - ay;

    Some(Circumcircle {
        cx: ux,
        cy: uy,
        radius_sq: dx * dx + dy * dy,
    })
}

/// Barycentric weights `(wa, wb, wc)` of `(px, py)` in triangle `(a, b, c)`.
///
/// Solved with Cramer's rule; `wa` is `1 - wb - wc`. Returns `None` when the
/// triangle's signed area is below the degeneracy tolerance.
pub fn barycentric(
    px: f64,
    py: f64,
    a: &SamplePoint,
    b: &SamplePoint,
    c: &SamplePoint,
) -> Option<(f64, f64, f64)> {
    let den = orientation(a, b, c);
    if den.abs() < DEGENERATE_AREA {
        return None;
    }

    let wb = ((px - a.x) * (c.y - a.y) - (py - a.y) * (c.x - a.x)) / den;
    let wc = ((b.x - a.x) * (py - a.y) - (px - a.x) * (b.y - a.y)) / den;
    let wa = 1.0 - wb - wc;

    Some((wa, wb, wc))
}

/// Inside-or-on-boundary test for barycentric weights
#[inline]
pub fn is_inside((wa, wb, wc): (f64, f64, f64)) -> bool {
    wa >= BARYCENTRIC_INSIDE && wb >= BARYCENTRIC_INSIDE && wc >= BARYCENTRIC_INSIDE
}

/// Plane `z = a·x + b·y + c`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Plane {
    #[inline]
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.a * x + self.b * y + self.c
    }
}

fn det3(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Fit the plane through three samples (value as height) by Cramer's rule.
///
/// Returns `None` when the (x, y) projections are collinear.
pub fn fit_plane(p: &SamplePoint, q: &SamplePoint, r: &SamplePoint) -> Option<Plane> {
    let d = det3([[p.x, p.y, 1.0], [q.x, q.y, 1.0], [r.x, r.y, 1.0]]);
    if d.abs() < DEGENERATE_AREA {
        return None;
    }

    let da = det3([[p.value, p.y, 1.0], [q.value, q.y, 1.0], [r.value, r.y, 1.0]]);
    let db = det3([[p.x, p.value, 1.0], [q.x, q.value, 1.0], [r.x, r.value, 1.0]]);
    let dc = det3([[p.x, p.y, p.value], [q.x, q.y, q.value], [r.x, r.y, r.value]]);

    Some(Plane {
        a: da / d,
        b: db / d,
        c: dc / d,
    })
}

/// Axis-aligned bounding box of a triangle, for cheap rejection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// A triangle defined by three vertex indices into a sample slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
    pub bbox: BoundingBox,
}

impl Triangle {
    fn new(points: &[SamplePoint], v0: usize, v1: usize, v2: usize) -> Self {
        let (a, b, c) = (&points[v0], &points[v1], &points[v2]);
        let bbox = BoundingBox {
            min_x: a.x.min(b.x).min(c.x),
            min_y: a.y.min(b.y).min(c.y),
            max_x: a.x.max(b.x).max(c.x),
            max_y: a.y.max(b.y).max(c.y),
        };
        Self { v0, v1, v2, bbox }
    }

    pub fn vertices(&self) -> [usize; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Barycentric weights of `(x, y)` with respect to this triangle
    pub fn weights(&self, points: &[SamplePoint], x: f64, y: f64) -> Option<(f64, f64, f64)> {
        barycentric(x, y, &points[self.v0], &points[self.v1], &points[self.v2])
    }
}

/// Build a Delaunay triangulation using the Bowyer–Watson algorithm.
///
/// Points are inserted in slice order into a super-triangle enclosing their
/// bounding box. Triangles touching a super-triangle vertex are dropped at
/// the end. Fewer than three points yield an empty set; near-collinear input
/// may yield zero-area triangles, which [`barycentric`] rejects.
pub fn triangulate(points: &[SamplePoint]) -> Vec<Triangle> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;

    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    let span = (max_x - min_x).max(max_y - min_y);
    let span = if span > 0.0 { span } else { 1.0 };
    let cx = (min_x + max_x) / 2.0;
    let cy = (min_y + max_y) / 2.0;

    // Super-triangle vertices take indices n, n+1, n+2
    let mut vertices: Vec<SamplePoint> = Vec::with_capacity(n + 3);
    vertices.extend_from_slice(points);
    vertices.push(SamplePoint::new(cx - 2.0 * span, cy - 3.0 * span, 0.0));
    vertices.push(SamplePoint::new(cx, cy + 4.0 * span, 0.0));
    vertices.push(SamplePoint::new(cx + 2.0 * span, cy - 3.0 * span, 0.0));

    let mut faces: Vec<[usize; 3]> = vec![[n, n + 1, n + 2]];

    for (vi, point) in points.iter().enumerate() {
        // Triangles whose circumcircle contains the new point
        let cavity: Vec<bool> = faces
            .iter()
            .map(|f| {
                circumcircle(&vertices[f[0]], &vertices[f[1]], &vertices[f[2]])
                    .is_some_and(|cc| cc.contains(point.x, point.y))
            })
            .collect();

        // Cavity boundary: edges used by exactly one removed triangle,
        // kept in first-seen order
        let mut edges: Vec<((usize, usize), usize)> = Vec::new();
        for (face, _) in faces.iter().zip(&cavity).filter(|(_, bad)| **bad) {
            for (a, b) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
                let key = if a < b { (a, b) } else { (b, a) };
                match edges.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, count)) => *count += 1,
                    None => edges.push((key, 1)),
                }
            }
        }

        let mut keep = cavity.iter().map(|bad| !bad);
        faces.retain(|_| keep.next().unwrap_or(true));

        faces.extend(
            edges
                .into_iter()
                .filter(|(_, count)| *count == 1)
                .map(|((a, b), _)| [a, b, vi]),
        );
    }

    faces
        .into_iter()
        .filter(|f| f.iter().all(|&v| v < n))
        .map(|[v0, v1, v2]| Triangle::new(points, v0, v1, v2))
        .collect()
}

/// Delaunay triangulation of a sample slice with point location.
///
/// Stores only indices; the same slice must be passed to queries.
#[derive(Debug, Clone)]
pub struct Triangulation {
    triangles: Vec<Triangle>,
}

impl Triangulation {
    pub fn new(points: &[SamplePoint]) -> Self {
        Self {
            triangles: triangulate(points),
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// First triangle containing `(x, y)` (boundary inclusive) and its weights
    pub fn locate(
        &self,
        points: &[SamplePoint],
        x: f64,
        y: f64,
    ) -> Option<(&Triangle, (f64, f64, f64))> {
        self.triangles
            .iter()
            .filter(|tri| tri.bbox.contains(x, y))
            .find_map(|tri| {
                tri.weights(points, x, y)
                    .filter(|w| is_inside(*w))
                    .map(|w| (tri, w))
            })
    }

    /// Linear interpolation inside the triangulated hull; `None` outside
    pub fn interpolate(&self, points: &[SamplePoint], x: f64, y: f64) -> Option<f64> {
        self.locate(points, x, y).map(|(tri, (wa, wb, wc))| {
            wa * points[tri.v0].value + wb * points[tri.v1].value + wc * points[tri.v2].value
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn corner_points() -> Vec<SamplePoint> {
        vec![
            SamplePoint::new(0.0, 10.0, 10.0),  // top-left
            SamplePoint::new(10.0, 10.0, 20.0), // top-right
            SamplePoint::new(0.0, 0.0, 30.0),   // bottom-left
            SamplePoint::new(10.0, 0.0, 40.0),  // bottom-right
        ]
    }

    /// Square lattice with boundary points on the hull edges and jittered
    /// interior points
    fn lattice(n: usize, step: f64) -> Vec<SamplePoint> {
        let mut points = Vec::new();
        for i in 0..n {
            for j in 0..n {
                let mut x = i as f64 * step;
                let mut y = j as f64 * step;
                if i > 0 && i < n - 1 && j > 0 && j < n - 1 {
                    x += 0.1 + ((i * 7 + j * 13) % 5) as f64 * 0.05;
                    y -= 0.1 + ((i * 11 + j * 3) % 5) as f64 * 0.05;
                }
                points.push(SamplePoint::new(x, y, x + y));
            }
        }
        points
    }

    fn scattered(n: usize, seed: u64) -> Vec<SamplePoint> {
        let mut rng = seed;
        let mut next = || {
            rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (rng >> 33) as f64 / (1u64 << 31) as f64 * 100.0
        };
        (0..n)
            .map(|_| {
                let x = next();
                let y = next();
                SamplePoint::new(x, y, 0.0)
            })
            .collect()
    }

    fn total_area(points: &[SamplePoint], tris: &[Triangle]) -> f64 {
        tris.iter()
            .map(|t| orientation(&points[t.v0], &points[t.v1], &points[t.v2]).abs() / 2.0)
            .sum()
    }

    #[test]
    fn test_orientation_sign() {
        let a = SamplePoint::new(0.0, 0.0, 0.0);
        let b = SamplePoint::new(1.0, 0.0, 0.0);
        let c = SamplePoint::new(0.0, 1.0, 0.0);
        assert_relative_eq!(orientation(&a, &b, &c), 1.0);
        assert_relative_eq!(orientation(&a, &c, &b), -1.0);

        let d = SamplePoint::new(2.0, 0.0, 0.0);
        assert!(is_collinear(&a, &b, &d));
        assert!(!is_collinear(&a, &b, &c));
    }

    #[test]
    fn test_circumcircle_right_triangle() {
        let a = SamplePoint::new(0.0, 0.0, 0.0);
        let b = SamplePoint::new(4.0, 0.0, 0.0);
        let c = SamplePoint::new(0.0, 4.0, 0.0);
        let cc = circumcircle(&a, &b, &c).unwrap();
        assert_relative_eq!(cc.cx, 2.0, epsilon = 1e-12);
        assert_relative_eq!(cc.cy, 2.0, epsilon = 1e-12);
        assert_relative_eq!(cc.radius_sq, 8.0, epsilon = 1e-12);

        // The fourth corner of the square lies exactly on the circle
        assert!(cc.contains(4.0, 4.0));
        assert!(cc.contains(2.0, 2.0));
        assert!(!cc.contains(5.0, 5.0));
    }

    #[test]
    fn test_circumcircle_degenerate() {
        let a = SamplePoint::new(0.0, 0.0, 0.0);
        let b = SamplePoint::new(1.0, 1.0, 0.0);
        let c = SamplePoint::new(2.0, 2.0, 0.0);
        assert!(circumcircle(&a, &b, &c).is_none());
    }

    #[test]
    fn test_delaunay_basic() {
        let points = corner_points();
        let tris = triangulate(&points);

        // 4 points should produce 2 triangles
        assert_eq!(tris.len(), 2, "Expected 2 triangles, got {}", tris.len());
        assert_relative_eq!(total_area(&points, &tris), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_delaunay_too_few_points() {
        let points = vec![
            SamplePoint::new(0.0, 0.0, 1.0),
            SamplePoint::new(1.0, 0.0, 2.0),
        ];
        assert!(triangulate(&points).is_empty());
    }

    #[test]
    fn test_delaunay_lattice_covers_hull() {
        let points = lattice(5, 2.5);
        let tris = triangulate(&points);

        // Hull of the lattice is the 10×10 square
        assert_relative_eq!(total_area(&points, &tris), 100.0, epsilon = 1e-9);

        for (i, _) in points.iter().enumerate() {
            assert!(
                tris.iter().any(|t| t.vertices().contains(&i)),
                "Vertex {} not used by any triangle",
                i
            );
        }
    }

    #[test]
    fn test_delaunay_empty_circumcircles() {
        let points = scattered(40, 7);
        let tris = triangulate(&points);
        assert!(!tris.is_empty());

        for tri in &tris {
            let Some(cc) = circumcircle(&points[tri.v0], &points[tri.v1], &points[tri.v2]) else {
                continue;
            };
            for (i, p) in points.iter().enumerate() {
                if tri.vertices().contains(&i) {
                    continue;
                }
                let dx = p.x - cc.cx;
                let dy = p.y - cc.cy;
                assert!(
                    dx * dx + dy * dy >= cc.radius_sq * (1.0 - 1e-9),
                    "Point {} lies inside the circumcircle of {:?}",
                    i,
                    tri.vertices()
                );
            }
        }
    }

    #[test]
    fn test_delaunay_collinear_has_no_area() {
        let points: Vec<SamplePoint> = (0..5)
            .map(|i| SamplePoint::new(i as f64, 2.0 * i as f64, i as f64))
            .collect();
        let tris = triangulate(&points);
        assert!(total_area(&points, &tris) < 1e-9);
    }

    #[test]
    fn test_barycentric_at_vertices() {
        let p0 = SamplePoint::new(0.0, 0.0, 1.0);
        let p1 = SamplePoint::new(10.0, 0.0, 2.0);
        let p2 = SamplePoint::new(0.0, 10.0, 3.0);

        let (u, v, w) = barycentric(0.0, 0.0, &p0, &p1, &p2).unwrap();
        assert!((u - 1.0).abs() < 1e-10);
        assert!(v.abs() < 1e-10);
        assert!(w.abs() < 1e-10);

        let (u, v, w) = barycentric(10.0, 0.0, &p0, &p1, &p2).unwrap();
        assert!(u.abs() < 1e-10);
        assert!((v - 1.0).abs() < 1e-10);
        assert!(w.abs() < 1e-10);

        let (u, v, w) = barycentric(10.0 / 3.0, 10.0 / 3.0, &p0, &p1, &p2).unwrap();
        assert!((u - 1.0 / 3.0).abs() < 1e-10);
        assert!((v - 1.0 / 3.0).abs() < 1e-10);
        assert!((w - 1.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_barycentric_partition_of_unity() {
        let a = SamplePoint::new(-3.0, 1.0, 0.0);
        let b = SamplePoint::new(7.5, -2.0, 0.0);
        let c = SamplePoint::new(1.0, 9.0, 0.0);
        for &(px, py) in &[(0.0, 0.0), (100.0, -50.0), (1e6, 3.0), (-7.0, 42.0)] {
            let (wa, wb, wc) = barycentric(px, py, &a, &b, &c).unwrap();
            assert!((wa + wb + wc - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_barycentric_inside_outside() {
        let a = SamplePoint::new(0.0, 0.0, 0.0);
        let b = SamplePoint::new(10.0, 0.0, 0.0);
        let c = SamplePoint::new(0.0, 10.0, 0.0);
        assert!(is_inside(barycentric(2.0, 2.0, &a, &b, &c).unwrap()));
        // On an edge
        assert!(is_inside(barycentric(5.0, 5.0, &a, &b, &c).unwrap()));
        assert!(!is_inside(barycentric(8.0, 8.0, &a, &b, &c).unwrap()));
        assert!(!is_inside(barycentric(-1.0, 2.0, &a, &b, &c).unwrap()));

        let d = SamplePoint::new(20.0, 0.0, 0.0);
        assert!(barycentric(1.0, 1.0, &a, &b, &d).is_none());
    }

    #[test]
    fn test_fit_plane() {
        // z = 2x - 3y + 1
        let f = |x: f64, y: f64| 2.0 * x - 3.0 * y + 1.0;
        let p = SamplePoint::new(0.0, 0.0, f(0.0, 0.0));
        let q = SamplePoint::new(4.0, 1.0, f(4.0, 1.0));
        let r = SamplePoint::new(-2.0, 5.0, f(-2.0, 5.0));
        let plane = fit_plane(&p, &q, &r).unwrap();
        assert_relative_eq!(plane.a, 2.0, epsilon = 1e-12);
        assert_relative_eq!(plane.b, -3.0, epsilon = 1e-12);
        assert_relative_eq!(plane.c, 1.0, epsilon = 1e-12);
        assert_relative_eq!(plane.evaluate(10.0, 10.0), f(10.0, 10.0), epsilon = 1e-9);
    }

    #[test]
    fn test_fit_plane_collinear() {
        let p = SamplePoint::new(0.0, 0.0, 1.0);
        let q = SamplePoint::new(1.0, 1.0, 2.0);
        let r = SamplePoint::new(3.0, 3.0, 5.0);
        assert!(fit_plane(&p, &q, &r).is_none());
    }

    #[test]
    fn test_triangulation_locate() {
        let points = corner_points();
        let tin = Triangulation::new(&points);
        assert_eq!(tin.len(), 2);

        let (_, w) = tin.locate(&points, 5.0, 5.0).unwrap();
        assert!((w.0 + w.1 + w.2 - 1.0).abs() < 1e-9);
        assert!(tin.locate(&points, 11.0, 5.0).is_none());

        let at_corner = tin.interpolate(&points, 10.0, 0.0).unwrap();
        assert_relative_eq!(at_corner, 40.0, epsilon = 1e-9);
    }
}
