//! Panel geometry derived from four ordered vertices
//!
//! Vertices are numbered counter-clockwise. Edge `i` runs from vertex `i` to
//! vertex `i + 1` and its midpoint is the position of grip `i`. Vertices 0/2
//! and 1/3 are the two diagonal pairs.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use crate::analysis::AnalysisOptions;
use crate::error::{PanelError, PanelResult};

/// Skew dimensions of the quadrilateral
///
/// `(a, d)` is the vector from the left (edge 3) to the right (edge 1) edge
/// midpoint, `(c, b)` the vector from the bottom (edge 0) to the top (edge 2)
/// edge midpoint. `c = d = 0` for a rectangle aligned with the axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Dimensions {
    fn from_vertices(v: &[Point2<f64>; 4]) -> Self {
        Self {
            a: 0.5 * (v[1].x + v[2].x - v[0].x - v[3].x),
            b: 0.5 * (v[2].y + v[3].y - v[0].y - v[1].y),
            c: 0.5 * (v[2].x + v[3].x - v[0].x - v[1].x),
            d: 0.5 * (v[1].y + v[2].y - v[0].y - v[3].y),
        }
    }

    /// Jacobian-like determinant `ab - cd`, equal to the panel area
    pub fn t1(&self) -> f64 {
        self.a * self.b - self.c * self.d
    }

    /// Normalizer of the quadratic mode in x, `½(a² - c²) + b² - d²`
    pub fn t2(&self) -> f64 {
        0.5 * (self.a * self.a - self.c * self.c) + self.b * self.b - self.d * self.d
    }

    /// Normalizer of the quadratic mode in y, `½(b² - d²) + a² - c²`
    pub fn t3(&self) -> f64 {
        0.5 * (self.b * self.b - self.d * self.d) + self.a * self.a - self.c * self.c
    }
}

/// Geometric data of a quadrilateral panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelGeometry {
    vertices: [Point2<f64>; 4],
    width: f64,
    dimensions: Dimensions,
    edge_lengths: [f64; 4],
    edge_angles: [f64; 4],
    direction_cosines: [(f64, f64); 4],
    center: Point2<f64>,
    area: f64,
    rectangular: bool,
}

impl PanelGeometry {
    /// Derive the geometry of a panel
    ///
    /// # Arguments
    /// * `vertices` - Four vertices in counter-clockwise order
    /// * `width` - Out-of-plane thickness of the panel
    /// * `options` - Tolerances for the degeneracy and rectangular checks
    pub fn new(
        vertices: [Point2<f64>; 4],
        width: f64,
        options: &AnalysisOptions,
    ) -> PanelResult<Self> {
        if !(width.is_finite() && width > 0.0) {
            return Err(PanelError::Geometry(format!(
                "panel width must be positive, got {}",
                width
            )));
        }
        if vertices.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(PanelError::Geometry(
                "vertex coordinates must be finite".to_string(),
            ));
        }

        let edges: [Vector2<f64>; 4] = std::array::from_fn(|i| vertices[(i + 1) % 4] - vertices[i]);
        let edge_lengths: [f64; 4] = std::array::from_fn(|i| edges[i].norm());

        let scale = edge_lengths.iter().cloned().fold(0.0, f64::max);
        let tol = options.degeneracy_tolerance;
        if scale == 0.0 || edge_lengths.iter().any(|&l| l <= tol * scale) {
            return Err(PanelError::Geometry(
                "panel has coincident vertices".to_string(),
            ));
        }

        validate_convexity(&edges, &edge_lengths, tol)?;

        let edge_angles: [f64; 4] = std::array::from_fn(|i| edges[i].y.atan2(edges[i].x));
        let direction_cosines: [(f64, f64); 4] =
            std::array::from_fn(|i| (edges[i].x / edge_lengths[i], edges[i].y / edge_lengths[i]));

        // Midpoint of the diagonal midpoints
        let m13 = nalgebra::center(&vertices[0], &vertices[2]);
        let m24 = nalgebra::center(&vertices[1], &vertices[3]);
        let center = nalgebra::center(&m13, &m24);

        let area = 0.5
            * (0..4)
                .map(|i| {
                    let (p, q) = (vertices[i], vertices[(i + 1) % 4]);
                    p.x * q.y - q.x * p.y
                })
                .sum::<f64>();

        let rectangular = (0..4).all(|i| {
            let turn = normalize_angle(edge_angles[(i + 1) % 4] - edge_angles[i]);
            (turn - FRAC_PI_2).abs() <= options.rectangular_tolerance
        });

        Ok(Self {
            vertices,
            width,
            dimensions: Dimensions::from_vertices(&vertices),
            edge_lengths,
            edge_angles,
            direction_cosines,
            center,
            area,
            rectangular,
        })
    }

    pub fn vertices(&self) -> &[Point2<f64>; 4] {
        &self.vertices
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn edge_lengths(&self) -> [f64; 4] {
        self.edge_lengths
    }

    /// Angle of each edge to the horizontal, in radians
    pub fn edge_angles(&self) -> [f64; 4] {
        self.edge_angles
    }

    /// (cos, sin) of each edge angle
    pub fn direction_cosines(&self) -> [(f64, f64); 4] {
        self.direction_cosines
    }

    pub fn center(&self) -> Point2<f64> {
        self.center
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Smaller of the two skew dimensions `a` and `b`
    pub fn reference_length(&self) -> f64 {
        self.dimensions.a.min(self.dimensions.b)
    }

    pub fn is_rectangular(&self) -> bool {
        self.rectangular
    }

    /// Edge vector from vertex `i` to vertex `i + 1`
    pub fn edge_vector(&self, i: usize) -> Vector2<f64> {
        self.vertices[(i + 1) % 4] - self.vertices[i]
    }

    /// Grip positions (edge midpoints)
    pub fn edge_midpoints(&self) -> [Point2<f64>; 4] {
        std::array::from_fn(|i| nalgebra::center(&self.vertices[i], &self.vertices[(i + 1) % 4]))
    }
}

/// Wrap an angle into (-π, π]
fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::PI;
    let mut a = angle % (2.0 * PI);
    if a <= -PI {
        a += 2.0 * PI;
    } else if a > PI {
        a -= 2.0 * PI;
    }
    a
}

/// Every corner must turn left by a non-negligible amount
fn validate_convexity(edges: &[Vector2<f64>; 4], lengths: &[f64; 4], tol: f64) -> PanelResult<()> {
    let turns: [f64; 4] = std::array::from_fn(|i| {
        let prev = edges[(i + 3) % 4];
        prev.perp(&edges[i]) / (lengths[(i + 3) % 4] * lengths[i])
    });

    if turns.iter().any(|t| t.abs() <= tol) {
        return Err(PanelError::Geometry(
            "panel has collinear vertices".to_string(),
        ));
    }
    if turns.iter().all(|&t| t < 0.0) {
        return Err(PanelError::Geometry(
            "vertices must be ordered counter-clockwise".to_string(),
        ));
    }
    if turns.iter().any(|&t| t < 0.0) {
        return Err(PanelError::Geometry(
            "panel is non-convex or self-intersecting".to_string(),
        ));
    }
    Ok(())
}
