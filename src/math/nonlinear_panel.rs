//! Operators of the nonlinear four-point panel
//!
//! The 8 grip displacements are split into rigid body motion, three constant
//! strains and two quadratic modes. Measured from the panel center the modes
//! are `ux = κx(½x² - y²)` and `uy = κy(½y² - x²)`; their grip patterns are
//! `u1x + u3x - u0x - u2x = ½κx·t2` and `u0y + u2y - u1y - u3y = ½κy·t3`.
//!
//! - [A] (5x8) extracts `[εx, εy, γxy/2, ½g·a·κx, ½g·b·κy]`
//! - [B] (12x5) distributes them to the 4 integration points
//! - [Pc], [Ps] (8x12) integrate point stresses into grip resultants
//! - [Q] (8x8) removes the moment about the center, translations pass through
//!
//! `g` is the Gauss coordinate. Positions inside the panel use the
//! coordinates (ξ, η) spanned by the edge midpoints: `x - C = ½(ξ·(a, d) + η·(c, b))`.

use nalgebra::{Point2, Vector2};

use super::geometry::{Dimensions, PanelGeometry};
use super::linear_panel::check_denominator;
use super::{Mat12, Mat12x5, Mat12x8, Mat5x8, Mat8, Mat8x12, Vec12, Vec3, Vec5, Vec8};
use crate::error::{PanelError, PanelResult};

/// Natural coordinate of the integration points (2x2 Gauss)
pub const GAUSS_COORD: f64 = 0.577_350_269_189_625_8;

/// (ξ, η) of the integration points; point `k` is the one nearest vertex `k`
pub const POINT_COORDS: [(f64, f64); 4] = [
    (-GAUSS_COORD, -GAUSS_COORD),
    (GAUSS_COORD, -GAUSS_COORD),
    (GAUSS_COORD, GAUSS_COORD),
    (-GAUSS_COORD, GAUSS_COORD),
];

/// Relative size below which a dimension counts as zero
const DIMENSION_TOLERANCE: f64 = 1e-10;

/// Geometry-derived operators of a nonlinear panel
#[derive(Debug, Clone, PartialEq)]
pub struct NonlinearOperators {
    a: Mat5x8,
    b: Mat12x5,
    ba: Mat12x8,
    q: Mat8,
    pc: Mat8x12,
    ps: Mat8x12,
    /// Integration weight of each point, `t1·w/4`
    weight: f64,
    /// Share of each point's concrete left outside the stringers
    concrete_fractions: [f64; 4],
}

impl NonlinearOperators {
    /// Build all operators
    ///
    /// # Arguments
    /// * `geometry` - Panel geometry
    /// * `corrections` - Stringer depth correction at each grip
    ///
    /// # Errors
    /// `PanelError::Geometry` when `a`, `b`, `t2` or `t3` vanishes (number the
    /// vertices so that edge 0 is the bottom edge) or a correction does not
    /// fit on its edge.
    pub fn new(geometry: &PanelGeometry, corrections: &[f64; 4]) -> PanelResult<Self> {
        let dim = mode_dimensions(geometry)?;
        let concrete_fractions = concrete_fractions(geometry, corrections)?;
        let a = a_matrix(&dim);
        let b = b_matrix(&dim);
        let ba = b * a;
        let weight = 0.25 * dim.t1() * geometry.width();

        Ok(Self {
            a,
            b,
            ba,
            q: q_matrix(&dim),
            pc: distribution_matrix(&ba, weight, &concrete_fractions),
            ps: distribution_matrix(&ba, weight, &[1.0; 4]),
            weight,
            concrete_fractions,
        })
    }

    pub fn a(&self) -> &Mat5x8 {
        &self.a
    }

    pub fn b(&self) -> &Mat12x5 {
        &self.b
    }

    pub fn ba(&self) -> &Mat12x8 {
        &self.ba
    }

    pub fn q(&self) -> &Mat8 {
        &self.q
    }

    pub fn pc(&self) -> &Mat8x12 {
        &self.pc
    }

    pub fn ps(&self) -> &Mat8x12 {
        &self.ps
    }

    pub fn concrete_fractions(&self) -> [f64; 4] {
        self.concrete_fractions
    }

    /// Stacked strains of the 4 integration points
    pub fn strains(&self, displacement: &Vec8) -> Vec12 {
        self.ba * displacement
    }

    /// Secant (or initial) stiffness [Q][Pc][Dc][BA] + [Q][Ps][Ds][BA]
    pub fn stiffness(&self, concrete: &Mat12, reinforcement: &Mat12) -> Mat8 {
        self.q * (self.pc * concrete + self.ps * reinforcement) * self.ba
    }

    /// Work-conjugates of the generalized deformations of [A]
    pub fn generalized_stresses(&self, concrete: &[Vec3; 4], reinforcement: &[Vec3; 4]) -> Vec5 {
        let mut s = Vec5::zeros();
        for k in 0..4 {
            let stress = concrete[k] * self.concrete_fractions[k] + reinforcement[k];
            s += self.b.fixed_rows::<3>(3 * k).transpose() * stress;
        }
        s * self.weight
    }

    /// Resultants at the grips, edge by edge from the generalized stresses
    pub fn edge_resultants(&self, concrete: &[Vec3; 4], reinforcement: &[Vec3; 4]) -> Vec8 {
        let s = self.generalized_stresses(concrete, reinforcement);
        let mut r = Vec8::zeros();
        for edge in 0..4 {
            r[2 * edge] = self.a.column(2 * edge).dot(&s);
            r[2 * edge + 1] = self.a.column(2 * edge + 1).dot(&s);
        }
        r
    }

    /// Grip forces from the edge resultants
    pub fn forces(&self, concrete: &[Vec3; 4], reinforcement: &[Vec3; 4]) -> Vec8 {
        self.q * self.edge_resultants(concrete, reinforcement)
    }

    /// Grip forces through the distribution matrices, [Q]([Pc]σc + [Ps]σs)
    pub fn forces_by_operators(&self, concrete: &Vec12, reinforcement: &Vec12) -> Vec8 {
        self.q * (self.pc * concrete + self.ps * reinforcement)
    }
}

/// Dimensions of a panel whose quadratic modes are well defined
pub fn mode_dimensions(geometry: &PanelGeometry) -> PanelResult<Dimensions> {
    let dim = geometry.dimensions();
    let scale = [dim.a, dim.b, dim.c, dim.d]
        .iter()
        .fold(0.0_f64, |m, x| m.max(x.abs()));

    check_denominator(dim.a, scale, DIMENSION_TOLERANCE, "a")?;
    check_denominator(dim.b, scale, DIMENSION_TOLERANCE, "b")?;
    check_denominator(dim.t2(), scale * scale, DIMENSION_TOLERANCE, "t2")?;
    check_denominator(dim.t3(), scale * scale, DIMENSION_TOLERANCE, "t3")?;
    Ok(dim)
}

/// Generalized deformations [A] (5x8)
pub fn a_matrix(dim: &Dimensions) -> Mat5x8 {
    let (a, b, c, d) = (dim.a, dim.b, dim.c, dim.d);
    let t1 = dim.t1();
    let (a1, b1, c1, d1) = (a / t1, b / t1, c / t1, d / t1);
    let (a2, b2, c2, d2) = (0.5 * a1, 0.5 * b1, 0.5 * c1, 0.5 * d1);
    let mx = GAUSS_COORD * a / dim.t2();
    let my = GAUSS_COORD * b / dim.t3();

    Mat5x8::from_row_slice(&[
        d1, 0.0, b1, 0.0, -d1, 0.0, -b1, 0.0,
        0.0, -a1, 0.0, -c1, 0.0, a1, 0.0, c1,
        -a2, d2, -c2, b2, a2, -d2, c2, -b2,
        -mx, 0.0, mx, 0.0, -mx, 0.0, mx, 0.0,
        0.0, my, 0.0, -my, 0.0, my, 0.0, -my,
    ])
}

/// Distribution of the generalized deformations to the points [B] (12x5)
pub fn b_matrix(dim: &Dimensions) -> Mat12x5 {
    let (a, b, c, d) = (dim.a, dim.b, dim.c, dim.d);
    let mut m = Mat12x5::zeros();

    for (k, &(xi, eta)) in POINT_COORDS.iter().enumerate() {
        let (sx, se) = (xi.signum(), eta.signum());
        let r = 3 * k;

        m[(r, 0)] = 1.0;
        m[(r, 3)] = sx + se * c / a;
        m[(r + 1, 1)] = 1.0;
        m[(r + 1, 4)] = sx * d / b + se;
        m[(r + 2, 2)] = 2.0;
        m[(r + 2, 3)] = -(sx * 2.0 * d / a + se * 2.0 * b / a);
        m[(r + 2, 4)] = -(sx * 2.0 * a / b + se * 2.0 * c / b);
    }
    m
}

/// Kinematic operator [BA] (12x8)
pub fn ba_matrix(geometry: &PanelGeometry) -> PanelResult<Mat12x8> {
    let dim = mode_dimensions(geometry)?;
    Ok(b_matrix(&dim) * a_matrix(&dim))
}

/// Equilibrium operator [Q] (8x8)
///
/// Takes the moment about the center out of a set of grip forces along the
/// rotation pattern of the matching rectangle. Uniform x and y forces pass
/// through unchanged.
pub fn q_matrix(dim: &Dimensions) -> Mat8 {
    let (a, b, c, d) = (dim.a, dim.b, dim.c, dim.d);

    let pattern = Vec8::from_column_slice(&[b, 0.0, 0.0, a, -b, 0.0, 0.0, -a]);
    // Twice the rigid rotation of the grips about the center
    let rotation = Vec8::from_column_slice(&[b, -c, -d, a, -b, c, d, -a]);

    Mat8::identity() - pattern * rotation.transpose() / (2.0 * (a * a + b * b))
}

/// Distribution matrix (8x12) from point stresses to grip resultants
///
/// Column block `k` is `weight·fraction[k]·(BA_k)ᵀ`.
pub fn distribution_matrix(ba: &Mat12x8, weight: f64, fractions: &[f64; 4]) -> Mat8x12 {
    let mut m = ba.transpose() * weight;
    for (k, f) in fractions.iter().enumerate() {
        m.fixed_columns_mut::<3>(3 * k).scale_mut(*f);
    }
    m
}

/// Share of the concrete of each point not covered by the stringers
///
/// Point `k` sits between the start half of edge `k` and the end half of edge
/// `k - 1`. The stringer on edge `k - 1` shortens the first, the stringer on
/// edge `k` the second.
pub fn concrete_fractions(
    geometry: &PanelGeometry,
    corrections: &[f64; 4],
) -> PanelResult<[f64; 4]> {
    let lengths = geometry.edge_lengths();

    for i in 0..4 {
        let half = 0.5 * lengths[i];
        for c in [corrections[(i + 3) % 4], corrections[(i + 1) % 4]] {
            if !(c.is_finite() && c >= 0.0 && c < half) {
                return Err(PanelError::Geometry(format!(
                    "stringer correction {} does not fit on edge {} of length {}",
                    c, i, lengths[i]
                )));
            }
        }
    }

    Ok(std::array::from_fn(|k| {
        let prev = (k + 3) % 4;
        let start = 1.0 - corrections[prev] / (0.5 * lengths[k]);
        let end = 1.0 - corrections[k] / (0.5 * lengths[prev]);
        start * end
    }))
}

/// Physical positions of the integration points
pub fn point_positions(geometry: &PanelGeometry) -> [Point2<f64>; 4] {
    let dim = geometry.dimensions();
    let center = geometry.center();
    std::array::from_fn(|k| {
        let (xi, eta) = POINT_COORDS[k];
        center
            + Vector2::new(
                0.5 * (xi * dim.a + eta * dim.c),
                0.5 * (xi * dim.d + eta * dim.b),
            )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisOptions;
    use crate::math::geometry::tests::{rectangle, skewed};
    use crate::math::{block_diagonal, stack_points, Mat3};
    use approx::assert_relative_eq;
    use nalgebra::Rotation2;

    fn geometries() -> Vec<PanelGeometry> {
        let opts = AnalysisOptions::default();
        let rot = Rotation2::new(0.5);
        vec![
            PanelGeometry::new(rectangle(1000.0, 1000.0), 100.0, &opts).unwrap(),
            PanelGeometry::new(rectangle(2000.0, 600.0), 150.0, &opts).unwrap(),
            PanelGeometry::new(skewed(), 120.0, &opts).unwrap(),
            PanelGeometry::new(rectangle(800.0, 400.0).map(|p| rot * p), 100.0, &opts).unwrap(),
        ]
    }

    fn grip_values(geometry: &PanelGeometry, field: impl Fn(f64, f64) -> [f64; 2]) -> Vec8 {
        let c = geometry.center();
        let mut u = Vec8::zeros();
        for (i, m) in geometry.edge_midpoints().iter().enumerate() {
            let v = field(m.x - c.x, m.y - c.y);
            u[2 * i] = v[0];
            u[2 * i + 1] = v[1];
        }
        u
    }

    /// Grip displacements of the field u(x) = u0 + G (x - C)
    fn linear_field(geometry: &PanelGeometry, u0: [f64; 2], g: [[f64; 2]; 2]) -> Vec8 {
        grip_values(geometry, |x, y| {
            [
                u0[0] + g[0][0] * x + g[0][1] * y,
                u0[1] + g[1][0] * x + g[1][1] * y,
            ]
        })
    }

    fn sample_stresses() -> [Vec3; 4] {
        [
            Vec3::new(1.5, -2.0, 0.7),
            Vec3::new(-0.3, 0.8, -1.1),
            Vec3::new(2.2, 0.1, 0.4),
            Vec3::new(-1.0, -0.6, 1.9),
        ]
    }

    fn orthotropic_steel() -> Mat12 {
        block_diagonal(&[Mat3::from_diagonal(&Vec3::new(1500.0, 400.0, 0.0)); 4])
    }

    fn plane_stress() -> Mat12 {
        let d = Mat3::new(1.0, 0.2, 0.0, 0.2, 1.0, 0.0, 0.0, 0.0, 0.4) * 30_000.0;
        block_diagonal(&[d; 4])
    }

    #[test]
    fn test_rigid_body_modes_give_zero_strain() {
        for g in geometries() {
            let ba = ba_matrix(&g).unwrap();
            let tx = linear_field(&g, [1.0, 0.0], [[0.0, 0.0], [0.0, 0.0]]);
            let ty = linear_field(&g, [0.0, 1.0], [[0.0, 0.0], [0.0, 0.0]]);
            let rz = linear_field(&g, [0.0, 0.0], [[0.0, -1e-3], [1e-3, 0.0]]);
            for u in [tx, ty, rz] {
                let e = ba * u;
                assert!(e.amax() < 1e-15, "rigid body strain {}", e.amax());
            }
        }
    }

    #[test]
    fn test_linear_field_gives_constant_strain() {
        for g in geometries() {
            let (ex, ey, gxy) = (2e-4, -1e-4, 3e-4);
            let u = linear_field(&g, [0.3, -0.2], [[ex, 0.5 * gxy], [0.5 * gxy, ey]]);
            let e = ba_matrix(&g).unwrap() * u;
            for k in 0..4 {
                assert_relative_eq!(e[3 * k], ex, epsilon = 1e-15);
                assert_relative_eq!(e[3 * k + 1], ey, epsilon = 1e-15);
                assert_relative_eq!(e[3 * k + 2], gxy, epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn test_quadratic_modes_match_field_strains() {
        let (kx, ky) = (1e-6, -2e-6);
        for g in geometries() {
            let u = grip_values(&g, |x, y| [kx * (0.5 * x * x - y * y), ky * (0.5 * y * y - x * x)]);
            let e = ba_matrix(&g).unwrap() * u;
            let c = g.center();
            for (k, p) in point_positions(&g).iter().enumerate() {
                let (x, y) = (p.x - c.x, p.y - c.y);
                assert_relative_eq!(e[3 * k], kx * x, epsilon = 1e-15);
                assert_relative_eq!(e[3 * k + 1], ky * y, epsilon = 1e-15);
                assert_relative_eq!(e[3 * k + 2], -2.0 * (kx * y + ky * x), epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn test_b_entries_are_dimension_ratios() {
        let b = b_matrix(&geometries()[1].dimensions());
        let (a, h) = (2000.0, 600.0);
        // Point 0 sits at ξ = η = -g
        assert_relative_eq!(b[(0, 3)], -1.0);
        assert_relative_eq!(b[(2, 2)], 2.0);
        assert_relative_eq!(b[(2, 3)], 2.0 * h / a);
        assert_relative_eq!(b[(2, 4)], 2.0 * a / h);

        let dim = geometries()[2].dimensions();
        let b = b_matrix(&dim);
        assert_relative_eq!(b[(0, 3)], -1.0 - dim.c / dim.a);
        assert_relative_eq!(b[(1, 4)], -dim.d / dim.b - 1.0);
        assert_relative_eq!(b[(5, 3)], -2.0 * dim.d / dim.a + 2.0 * dim.b / dim.a);
        assert_relative_eq!(b[(8, 4)], -2.0 * dim.a / dim.b - 2.0 * dim.c / dim.b);
    }

    #[test]
    fn test_a_mode_rows() {
        let dim = geometries()[2].dimensions();
        let a = a_matrix(&dim);
        let mx = GAUSS_COORD * 1100.0 / 1_363_750.0;
        let my = GAUSS_COORD * 900.0 / 1_572_500.0;
        assert_relative_eq!(a[(3, 0)], -mx, max_relative = 1e-12);
        assert_relative_eq!(a[(3, 2)], mx, max_relative = 1e-12);
        assert_relative_eq!(a[(4, 1)], my, max_relative = 1e-12);
        assert_relative_eq!(a[(4, 3)], -my, max_relative = 1e-12);
        assert_eq!(a[(3, 1)], 0.0);
    }

    #[test]
    fn test_quarter_turn_numbering_rejected() {
        let rot = Rotation2::new(std::f64::consts::FRAC_PI_2);
        let g = PanelGeometry::new(
            rectangle(800.0, 400.0).map(|p| rot * p),
            100.0,
            &AnalysisOptions::default(),
        )
        .unwrap();
        assert!(matches!(ba_matrix(&g), Err(PanelError::Geometry(_))));
        assert!(matches!(
            NonlinearOperators::new(&g, &[0.0; 4]),
            Err(PanelError::Geometry(_))
        ));
    }

    #[test]
    fn test_q_removes_resultant_and_moment() {
        for g in geometries() {
            let corrections = [20.0, 0.0, 35.0, 10.0];
            let ops = NonlinearOperators::new(&g, &corrections).unwrap();
            let f = ops.forces(&sample_stresses(), &sample_stresses());
            let c = g.center();

            let (mut fx, mut fy, mut mz) = (0.0, 0.0, 0.0);
            for (i, m) in g.edge_midpoints().iter().enumerate() {
                fx += f[2 * i];
                fy += f[2 * i + 1];
                mz += (m.x - c.x) * f[2 * i + 1] - (m.y - c.y) * f[2 * i];
            }
            let scale = f.amax() * g.edge_lengths()[0];
            assert!(fx.abs() < 1e-9 * f.amax());
            assert!(fy.abs() < 1e-9 * f.amax());
            assert!(mz.abs() < 1e-9 * scale);
        }
    }

    #[test]
    fn test_q_passes_translations_and_kills_moment() {
        for g in geometries() {
            let q = q_matrix(&g.dimensions());
            let diff = q * q - q;
            assert!(diff.amax() < 1e-12);

            let tx = Vec8::from_column_slice(&[1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
            let ty = Vec8::from_column_slice(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
            assert!((q * tx - tx).amax() < 1e-15);
            assert!((q * ty - ty).amax() < 1e-15);

            // Moment of any output about the center is zero
            let rz = linear_field(&g, [0.0, 0.0], [[0.0, -1.0], [1.0, 0.0]]);
            let moments = rz.transpose() * q;
            assert!(moments.amax() < 1e-9 * g.edge_lengths()[0]);
        }
    }

    #[test]
    fn test_q_entries() {
        let q = q_matrix(&geometries()[1].dimensions());
        let (a, b) = (2000.0, 600.0);
        let s = 2.0 * (a * a + b * b);
        assert_relative_eq!(q[(0, 0)], 1.0 - b * b / s, epsilon = 1e-12);
        assert_relative_eq!(q[(0, 3)], -a * b / s, epsilon = 1e-12);
        assert_relative_eq!(q[(3, 3)], 1.0 - a * a / s, epsilon = 1e-12);
        assert_eq!(q[(1, 1)], 1.0);
        assert_eq!(q[(1, 3)], 0.0);

        let dim = geometries()[2].dimensions();
        let q = q_matrix(&dim);
        let s = 2.0 * (dim.a * dim.a + dim.b * dim.b);
        assert_relative_eq!(q[(0, 1)], dim.b * dim.c / s, epsilon = 1e-12);
        assert_relative_eq!(q[(3, 2)], dim.a * dim.d / s, epsilon = 1e-12);
    }

    #[test]
    fn test_q_keeps_balanced_resultants() {
        for g in geometries() {
            let ops = NonlinearOperators::new(&g, &[15.0, 30.0, 0.0, 5.0]).unwrap();
            assert!((ops.q() * ops.pc() - ops.pc()).amax() < 1e-9 * ops.pc().amax());
            assert!((ops.q() * ops.ps() - ops.ps()).amax() < 1e-9 * ops.ps().amax());
        }
    }

    #[test]
    fn test_pure_shear_edge_forces() {
        let g = &geometries()[0];
        let ops = NonlinearOperators::new(g, &[0.0; 4]).unwrap();
        let tau = stack_points(&[Vec3::new(0.0, 0.0, 2.0); 4]);
        let f = ops.forces_by_operators(&tau, &Vec12::zeros());
        // Bottom edge: -τ·a·w along x, right edge: τ·b·w along y
        assert_relative_eq!(f[0], -2.0 * 1000.0 * 100.0, max_relative = 1e-12);
        assert_relative_eq!(f[3], 2.0 * 1000.0 * 100.0, max_relative = 1e-12);
        assert_relative_eq!(f[4], 2.0 * 1000.0 * 100.0, max_relative = 1e-12);
        assert_relative_eq!(f[7], -2.0 * 1000.0 * 100.0, max_relative = 1e-12);
    }

    #[test]
    fn test_force_formulations_agree() {
        for g in geometries() {
            let ops = NonlinearOperators::new(&g, &[25.0, 40.0, 0.0, 15.0]).unwrap();
            let conc = sample_stresses();
            let steel = sample_stresses().map(|s| s * 3.0);
            let f1 = ops.forces(&conc, &steel);
            let f2 = ops.forces_by_operators(&stack_points(&conc), &stack_points(&steel));
            for i in 0..8 {
                assert!((f1[i] - f2[i]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_stringer_correction_only_affects_concrete() {
        let g = &geometries()[0];
        let plain = NonlinearOperators::new(g, &[0.0; 4]).unwrap();
        let corrected = NonlinearOperators::new(g, &[50.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(plain.ps(), corrected.ps());
        assert_ne!(plain.pc(), corrected.pc());
        // The stringer on edge 0 covers part of points 0 and 1
        assert_eq!(corrected.concrete_fractions(), [0.9, 0.9, 1.0, 1.0]);
        assert_relative_eq!(corrected.pc()[(2, 0)], 0.9 * plain.pc()[(2, 0)], max_relative = 1e-12);
        assert_relative_eq!(corrected.pc()[(2, 6)], plain.pc()[(2, 6)]);
    }

    #[test]
    fn test_oversized_correction_rejected() {
        let g = &geometries()[0];
        assert!(matches!(
            NonlinearOperators::new(g, &[600.0, 0.0, 0.0, 0.0]),
            Err(PanelError::Geometry(_))
        ));
    }

    #[test]
    fn test_stiffness_is_symmetric() {
        for g in geometries() {
            let ops = NonlinearOperators::new(&g, &[25.0, 0.0, 40.0, 10.0]).unwrap();
            let k = ops.stiffness(&plane_stress(), &orthotropic_steel());
            let max = k.amax();
            for i in 0..8 {
                for j in 0..8 {
                    assert!((k[(i, j)] - k[(j, i)]).abs() <= 1e-9 * max);
                }
            }
        }
    }

    #[test]
    fn test_stiffness_matches_virtual_work() {
        let g = &geometries()[2];
        let ops = NonlinearOperators::new(g, &[0.0; 4]).unwrap();
        let d = plane_stress();
        let k = ops.stiffness(&d, &Mat12::zeros());
        let weight = 0.25 * g.area() * g.width();
        let expected = ops.ba().transpose() * d * ops.ba() * weight;
        assert!((k - expected).amax() < 1e-9 * k.amax());
    }

    #[test]
    fn test_elastic_stiffness_kills_rigid_modes() {
        let g = &geometries()[2];
        let ops = NonlinearOperators::new(g, &[10.0, 20.0, 0.0, 0.0]).unwrap();
        let k = ops.stiffness(&plane_stress(), &orthotropic_steel());
        let rz = linear_field(g, [0.0, 0.0], [[0.0, -1.0], [1.0, 0.0]]);
        assert!((k * rz).amax() < 1e-9 * k.amax());
    }

    #[test]
    fn test_point_positions_inside_square() {
        let g = &geometries()[0];
        let p = point_positions(g);
        assert_relative_eq!(p[0].x, 500.0 - 500.0 * GAUSS_COORD, epsilon = 1e-9);
        assert_relative_eq!(p[0].y, 500.0 - 500.0 * GAUSS_COORD, epsilon = 1e-9);
        assert!(p[2].x > 500.0 && p[2].y > 500.0);
    }
}
