//! Analysis options shared by the panel formulations

use serde::{Deserialize, Serialize};

/// Numerical settings for panel analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Absolute displacement perturbation for the finite-difference tangent
    pub perturbation: f64,
    /// Linear panel forces with a magnitude below this value are set to zero
    pub force_tolerance: f64,
    /// Allowed deviation (radians) from 90° between adjacent edges for a
    /// panel to be treated as rectangular
    pub rectangular_tolerance: f64,
    /// Relative tolerance used to detect vanishing denominators and
    /// degenerate vertex configurations
    pub degeneracy_tolerance: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            perturbation: 1e-12,
            force_tolerance: 1e-6,
            rectangular_tolerance: 1e-3,
            degeneracy_tolerance: 1e-10,
        }
    }
}

impl AnalysisOptions {
    /// Set the finite-difference perturbation
    pub fn with_perturbation(mut self, perturbation: f64) -> Self {
        self.perturbation = perturbation;
        self
    }

    /// Set the force zero tolerance
    pub fn with_force_tolerance(mut self, tol: f64) -> Self {
        self.force_tolerance = tol;
        self
    }

    /// Set the angular tolerance of the rectangular check
    pub fn with_rectangular_tolerance(mut self, tol: f64) -> Self {
        self.rectangular_tolerance = tol;
        self
    }

    /// Set the degeneracy tolerance
    pub fn with_degeneracy_tolerance(mut self, tol: f64) -> Self {
        self.degeneracy_tolerance = tol;
        self
    }
}
