//! Grips and their global degrees of freedom

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A grip (node) shared between a panel and its neighbours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Global grip number
    pub number: usize,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Node {
    /// Create a new grip at the given coordinates
    pub fn new(number: usize, x: f64, y: f64) -> Self {
        Self { number, x, y }
    }

    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        (other.position() - self.position()).norm()
    }
}

/// Supplies the global displacement-vector indices of a grip
pub trait DofNumbering {
    /// Indices of the (x, y) dof of the grip, `None` if the grip is unknown
    fn dofs(&self, grip: usize) -> Option<[usize; 2]>;
}

/// Two consecutive dof per grip: `[2g, 2g + 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequentialDofs;

impl DofNumbering for SequentialDofs {
    fn dofs(&self, grip: usize) -> Option<[usize; 2]> {
        Some([2 * grip, 2 * grip + 1])
    }
}

/// Lookup table indexed by grip number
impl DofNumbering for [[usize; 2]] {
    fn dofs(&self, grip: usize) -> Option<[usize; 2]> {
        self.get(grip).copied()
    }
}

impl DofNumbering for Vec<[usize; 2]> {
    fn dofs(&self, grip: usize) -> Option<[usize; 2]> {
        self.as_slice().dofs(grip)
    }
}
