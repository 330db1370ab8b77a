//! Panel element and its collaborators

mod integration_point;
mod material;
mod node;
mod panel;
mod stringer;

pub use integration_point::{
    ConstitutiveLaw, ElasticMembrane, ElasticPoint, IntegrationPoint, MaterialResponse,
};
pub use material::{Concrete, Steel, WebBars, WebReinforcement};
pub use node::{DofNumbering, Node, SequentialDofs};
pub use panel::{Panel, PanelBehavior};
pub use stringer::{stringer_corrections, OneDimensionalElement, Stringer};
