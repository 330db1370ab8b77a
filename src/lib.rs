//! Stringer Panel - shear panel elements for stringer-panel models
//!
//! Quadrilateral membrane (shear panel) element of a stringer-panel model of a
//! reinforced concrete wall or deep beam:
//! - Linear-elastic shear panel (rectangular and general quadrilaterals)
//! - Nonlinear four-point panel driven by a smeared-crack material law
//! - Secant, initial and finite-difference tangent stiffness
//! - Average, principal and per-point stresses for crack reporting
//!
//! ## Example
//! ```rust
//! use nalgebra::Point2;
//! use stringer_panel::prelude::*;
//!
//! let vertices = [
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1000.0, 0.0),
//!     Point2::new(1000.0, 1000.0),
//!     Point2::new(0.0, 1000.0),
//! ];
//! let mut panel = Panel::new(
//!     1,
//!     &vertices,
//!     100.0,
//!     &[0, 1, 2, 3],
//!     Concrete::new(30.0, 24_000.0),
//!     WebReinforcement::default(),
//! )
//! .unwrap();
//!
//! panel.set_local_displacement(&[-0.1, 0.0, 0.0, 0.0, 0.1, 0.0, 0.0, 0.0]).unwrap();
//! panel.analysis().unwrap();
//! let forces = panel.forces().unwrap();
//! let stresses = panel.average_stresses().unwrap();
//! assert!(stresses.txy > 0.0);
//! assert!(forces[0] < 0.0);
//! ```

pub mod analysis;
pub mod elements;
pub mod error;
pub mod math;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::AnalysisOptions;
    pub use crate::elements::{
        ConstitutiveLaw, Concrete, DofNumbering, ElasticMembrane, IntegrationPoint,
        MaterialResponse, OneDimensionalElement, Panel, PanelBehavior, SequentialDofs, Steel,
        Stringer, WebBars, WebReinforcement,
    };
    pub use crate::error::{PanelError, PanelResult};
    pub use crate::math::{LinearPanel, NonlinearOperators, PanelGeometry};
    pub use crate::results::{PanelStresses, PointResult, PrincipalStresses};
}
