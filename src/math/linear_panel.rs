//! Linear-elastic shear panel
//!
//! The panel carries a uniform shear flow along its four edges. Its degrees of
//! freedom are the tangential (shear) displacements of the edges, obtained from
//! the grip displacements through the transformation matrix [T].
//!
//! References:
//! - Blaauwendraad & Hoogenboom, "Stringer panel model for structural concrete
//!   design", ACI Structural Journal, 1996

use nalgebra::Matrix3;
use std::f64::consts::FRAC_PI_4;

use super::geometry::PanelGeometry;
use super::{clamp_small, Mat4, Mat4x8, Mat8, Vec4, Vec8};
use crate::analysis::AnalysisOptions;
use crate::error::{PanelError, PanelResult};
use crate::results::{PanelStresses, PrincipalStresses};

/// Linear shear panel: local 4x4 stiffness plus its transformation
#[derive(Debug, Clone, PartialEq)]
pub struct LinearPanel {
    local_stiffness: Mat4,
    transformation: Mat4x8,
    edge_lengths: [f64; 4],
    width: f64,
    force_tolerance: f64,
}

impl LinearPanel {
    /// Build the linear panel
    ///
    /// # Arguments
    /// * `geometry` - Panel geometry
    /// * `shear_modulus` - Concrete shear modulus Gc
    /// * `options` - Tolerances
    pub fn new(
        geometry: &PanelGeometry,
        shear_modulus: f64,
        options: &AnalysisOptions,
    ) -> PanelResult<Self> {
        let local_stiffness = if geometry.is_rectangular() {
            rectangular_stiffness(geometry, shear_modulus)
        } else {
            general_stiffness(geometry, shear_modulus, options.degeneracy_tolerance)?
        };

        Ok(Self {
            local_stiffness,
            transformation: transformation_matrix(geometry),
            edge_lengths: geometry.edge_lengths(),
            width: geometry.width(),
            force_tolerance: options.force_tolerance,
        })
    }

    /// Local stiffness relating edge shear displacements to edge shear forces
    pub fn local_stiffness(&self) -> &Mat4 {
        &self.local_stiffness
    }

    /// Transformation from the 8 grip dof to the 4 edge shear displacements
    pub fn transformation(&self) -> &Mat4x8 {
        &self.transformation
    }

    /// Global stiffness [T]^T [K] [T]
    pub fn global_stiffness(&self) -> Mat8 {
        self.transformation.transpose() * self.local_stiffness * self.transformation
    }

    /// Edge shear forces for the given grip displacements
    pub fn local_forces(&self, displacement: &Vec8) -> Vec4 {
        let f = self.local_stiffness * (self.transformation * displacement);
        clamp_small(f, self.force_tolerance)
    }

    /// Edge shear forces expressed at the 8 grip dof
    pub fn global_forces(&self, displacement: &Vec8) -> Vec8 {
        self.transformation.transpose() * self.local_forces(displacement)
    }

    /// Shear stress along each edge
    pub fn edge_shear_stresses(&self, local_forces: &Vec4) -> [f64; 4] {
        std::array::from_fn(|i| local_forces[i] / (self.edge_lengths[i] * self.width))
    }

    /// Average shear stress of the panel
    pub fn average_shear(&self, local_forces: &Vec4) -> f64 {
        let tau = self.edge_shear_stresses(local_forces);
        0.25 * (-tau[0] + tau[1] - tau[2] + tau[3])
    }

    /// Average stresses (only shear is carried by the linear panel)
    pub fn average_stresses(&self, displacement: &Vec8) -> PanelStresses {
        let f = self.local_forces(displacement);
        PanelStresses::new(0.0, 0.0, self.average_shear(&f))
    }
}

/// Local stiffness of a rectangular panel
pub fn rectangular_stiffness(geometry: &PanelGeometry, shear_modulus: f64) -> Mat4 {
    let l = geometry.edge_lengths();
    let a = 0.5 * (l[0] + l[2]);
    let b = 0.5 * (l[1] + l[3]);
    let ab = a / b;
    let ba = b / a;

    Mat4::new(
        ab, -1.0, ab, -1.0,
        -1.0, ba, -1.0, ba,
        ab, -1.0, ab, -1.0,
        -1.0, ba, -1.0, ba,
    ) * (shear_modulus * geometry.width())
}

/// Local stiffness of a general quadrilateral panel
///
/// The self-equilibrated edge shear flow pattern follows from the cofactors
/// `k_i` of the edge equilibrium rows `[Δx, Δy, x_i y_{i+1} - x_{i+1} y_i]`.
/// The stiffness is the rank-one product of that pattern with itself.
pub fn general_stiffness(
    geometry: &PanelGeometry,
    shear_modulus: f64,
    tol: f64,
) -> PanelResult<Mat4> {
    let k = shear_flow_cofactors(geometry);
    let lengths = geometry.edge_lengths();
    let center = geometry.center();
    let vertices = geometry.vertices();

    // Four times the area of the triangle between the center and each edge
    let t: [f64; 4] = std::array::from_fn(|i| {
        let p = vertices[i] - center;
        let q = vertices[(i + 1) % 4] - center;
        2.0 * p.perp(&q)
    });

    let kf: f64 = k.iter().sum();
    let ku: f64 = k.iter().zip(t.iter()).map(|(k, t)| k * t).sum();

    let scale = lengths.iter().sum::<f64>() / 4.0;
    check_denominator(kf, scale.powi(4), tol, "kf")?;
    check_denominator(ku, scale.powi(6), tol, "ku")?;

    let d = 16.0 * shear_modulus * geometry.width() / (kf * ku);
    let b = Vec4::new(
        -k[0] * lengths[0],
        k[1] * lengths[1],
        -k[2] * lengths[2],
        k[3] * lengths[3],
    );

    Ok(b * b.transpose() * d)
}

/// Cofactors `k_i` of the edge equilibrium rows, each excluding edge `i`
pub fn shear_flow_cofactors(geometry: &PanelGeometry) -> [f64; 4] {
    let center = geometry.center();
    // Relative to the center to keep the cross terms well scaled
    let v = geometry.vertices().map(|p| p - center);

    let rows: [[f64; 3]; 4] = std::array::from_fn(|i| {
        let (p, q) = (v[i], v[(i + 1) % 4]);
        [q.x - p.x, q.y - p.y, p.x * q.y - q.x * p.y]
    });

    std::array::from_fn(|i| {
        // Cyclic order of the remaining rows keeps the sign of the ascending order
        let [p, q, s] = [(i + 1) % 4, (i + 2) % 4, (i + 3) % 4].map(|j| rows[j]);
        Matrix3::new(
            p[0], p[1], p[2],
            q[0], q[1], q[2],
            s[0], s[1], s[2],
        )
        .determinant()
    })
}

/// Fail on a denominator that vanishes relative to its natural scale
pub fn check_denominator(value: f64, scale: f64, tol: f64, name: &str) -> PanelResult<()> {
    if !value.is_finite() || value.abs() <= tol * scale {
        return Err(PanelError::Geometry(format!(
            "degenerate panel: {} = {:e} vanishes",
            name, value
        )));
    }
    Ok(())
}

/// Transformation matrix [T] (4x8)
///
/// Row `i` projects the displacement of grip `i` onto the direction of edge `i`.
pub fn transformation_matrix(geometry: &PanelGeometry) -> Mat4x8 {
    let mut t = Mat4x8::zeros();
    for (i, &(cos, sin)) in geometry.direction_cosines().iter().enumerate() {
        t[(i, 2 * i)] = cos;
        t[(i, 2 * i + 1)] = sin;
    }
    t
}

/// Principal stresses by the equilibrium-plasticity truss model
///
/// Concrete struts carry the shear at ±45°. When the two reinforcement
/// directions have different yield stresses the strut stress is amplified by
/// `√(fyx/fyy) + √(fyy/fyx)`. A missing direction falls back to the equal case.
pub fn truss_principal_stresses(
    shear: f64,
    yield_x: Option<f64>,
    yield_y: Option<f64>,
) -> PrincipalStresses {
    let factor = match (yield_x, yield_y) {
        (Some(fx), Some(fy)) if fx > 0.0 && fy > 0.0 && fx != fy => {
            (fx / fy).sqrt() + (fy / fx).sqrt()
        }
        _ => 2.0,
    };

    let theta = if shear <= 0.0 { FRAC_PI_4 } else { -FRAC_PI_4 };
    PrincipalStresses::new(0.0, -factor * shear.abs(), theta)
}
