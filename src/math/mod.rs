//! Mathematical utilities for panel calculations

pub mod geometry;
pub mod linear_panel;
pub mod nonlinear_panel;

use nalgebra::{Matrix3, Matrix4, SMatrix, SVector, Vector3, Vector4};

pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;
pub type Mat4 = Matrix4<f64>;
pub type Vec4 = Vector4<f64>;

/// 8x8 matrix for panel stiffness (2 dof at each of the 4 grips)
pub type Mat8 = SMatrix<f64, 8, 8>;
/// 8-element vector for panel forces/displacements
pub type Vec8 = SVector<f64, 8>;
/// 4x8 transformation from grip displacements to edge shear displacements
pub type Mat4x8 = SMatrix<f64, 4, 8>;
/// 12x12 block-diagonal material matrix (3 components at 4 integration points)
pub type Mat12 = SMatrix<f64, 12, 12>;
/// Stacked strains or stresses of the 4 integration points
pub type Vec12 = SVector<f64, 12>;
pub type Mat12x8 = SMatrix<f64, 12, 8>;
pub type Mat8x12 = SMatrix<f64, 8, 12>;
/// Generalized deformations or stresses of the nonlinear panel
pub type Vec5 = SVector<f64, 5>;
pub type Mat5x8 = SMatrix<f64, 5, 8>;
pub type Mat12x5 = SMatrix<f64, 12, 5>;

pub use geometry::PanelGeometry;
pub use linear_panel::LinearPanel;
pub use nonlinear_panel::NonlinearOperators;

/// Set entries smaller than `tol` in magnitude to exactly zero
pub fn clamp_small<const N: usize>(v: SVector<f64, N>, tol: f64) -> SVector<f64, N> {
    v.map(|x| if x.abs() < tol { 0.0 } else { x })
}

/// Assemble four 3x3 blocks on the diagonal of a 12x12 matrix
pub fn block_diagonal(blocks: &[Mat3; 4]) -> Mat12 {
    let mut m = Mat12::zeros();
    for (k, block) in blocks.iter().enumerate() {
        m.fixed_view_mut::<3, 3>(3 * k, 3 * k).copy_from(block);
    }
    m
}

/// Stack four 3-component vectors into a 12-vector
pub fn stack_points(values: &[Vec3; 4]) -> Vec12 {
    let mut v = Vec12::zeros();
    for (k, value) in values.iter().enumerate() {
        v.fixed_rows_mut::<3>(3 * k).copy_from(value);
    }
    v
}

/// True when every entry of the slice is finite
pub fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_small() {
        let v = Vec4::new(1e-7, -2.0, -5e-7, 3e-6);
        let c = clamp_small(v, 1e-6);
        assert_eq!(c, Vec4::new(0.0, -2.0, 0.0, 3e-6));
    }

    #[test]
    fn test_block_diagonal_layout() {
        let blocks = [
            Mat3::identity(),
            Mat3::identity() * 2.0,
            Mat3::identity() * 3.0,
            Mat3::identity() * 4.0,
        ];
        let m = block_diagonal(&blocks);
        assert_eq!(m[(0, 0)], 1.0);
        assert_eq!(m[(4, 4)], 2.0);
        assert_eq!(m[(8, 8)], 3.0);
        assert_eq!(m[(11, 11)], 4.0);
        assert_eq!(m[(0, 3)], 0.0);
    }

    #[test]
    fn test_stack_points() {
        let pts = [
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::new(7.0, 8.0, 9.0),
            Vec3::new(10.0, 11.0, 12.0),
        ];
        let v = stack_points(&pts);
        assert_eq!(v[5], 6.0);
        assert_eq!(v[9], 10.0);
    }
}
