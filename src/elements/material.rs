//! Concrete and web reinforcement parameters
//!
//! Units are N and mm throughout (stresses in MPa).

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{PanelError, PanelResult};

/// Concrete properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Concrete {
    /// Compressive strength f'c
    pub strength: f64,
    /// Modulus of elasticity
    pub elastic_modulus: f64,
    /// Poisson's ratio
    pub nu: f64,
}

impl Concrete {
    /// Create a concrete with given strength and modulus (ν = 0.2)
    pub fn new(strength: f64, elastic_modulus: f64) -> Self {
        Self {
            strength,
            elastic_modulus,
            nu: 0.2,
        }
    }

    /// Estimate E from the compressive strength: E = 4700·√f'c (ACI 318)
    pub fn from_strength(strength: f64) -> Self {
        Self::new(strength, 4700.0 * strength.sqrt())
    }

    /// Shear modulus Gc = E / 2.4
    pub fn shear_modulus(&self) -> f64 {
        self.elastic_modulus / 2.4
    }

    /// Cracking stress fcr = 0.33·√f'c
    pub fn tensile_strength(&self) -> f64 {
        0.33 * self.strength.sqrt()
    }

    pub fn validate(&self) -> PanelResult<()> {
        if !(self.strength > 0.0 && self.elastic_modulus > 0.0) {
            return Err(PanelError::InvalidInput(format!(
                "concrete strength and modulus must be positive (fc = {}, Ec = {})",
                self.strength, self.elastic_modulus
            )));
        }
        if !(0.0..0.5).contains(&self.nu) {
            return Err(PanelError::InvalidInput(format!(
                "concrete Poisson's ratio {} out of range",
                self.nu
            )));
        }
        Ok(())
    }
}

impl Default for Concrete {
    fn default() -> Self {
        Self::from_strength(30.0)
    }
}

/// Reinforcing steel properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Steel {
    /// Yield stress fy
    pub yield_stress: f64,
    /// Modulus of elasticity
    pub elastic_modulus: f64,
}

impl Steel {
    pub fn new(yield_stress: f64, elastic_modulus: f64) -> Self {
        Self {
            yield_stress,
            elastic_modulus,
        }
    }

    /// Yield strain fy / Es
    pub fn yield_strain(&self) -> f64 {
        self.yield_stress / self.elastic_modulus
    }
}

impl Default for Steel {
    fn default() -> Self {
        Self::new(500.0, 210_000.0)
    }
}

/// Bars in one direction, one layer at each face of the panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WebBars {
    /// Bar diameter
    pub diameter: f64,
    /// Bar spacing
    pub spacing: f64,
    pub steel: Steel,
}

impl WebBars {
    pub fn new(diameter: f64, spacing: f64, steel: Steel) -> Self {
        Self {
            diameter,
            spacing,
            steel,
        }
    }

    /// Geometric reinforcement ratio for a panel of the given width
    pub fn ratio(&self, width: f64) -> f64 {
        if self.diameter <= 0.0 || self.spacing <= 0.0 || width <= 0.0 {
            return 0.0;
        }
        2.0 * 0.25 * PI * self.diameter * self.diameter / (self.spacing * width)
    }
}

/// Orthogonal web reinforcement of a panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WebReinforcement {
    pub x: Option<WebBars>,
    pub y: Option<WebBars>,
}

impl WebReinforcement {
    pub fn new(x: Option<WebBars>, y: Option<WebBars>) -> Self {
        Self { x, y }
    }

    /// Same bars in both directions
    pub fn uniform(bars: WebBars) -> Self {
        Self::new(Some(bars), Some(bars))
    }

    pub fn ratio_x(&self, width: f64) -> f64 {
        self.x.map_or(0.0, |b| b.ratio(width))
    }

    pub fn ratio_y(&self, width: f64) -> f64 {
        self.y.map_or(0.0, |b| b.ratio(width))
    }

    pub fn yield_stress_x(&self) -> Option<f64> {
        self.x.map(|b| b.steel.yield_stress)
    }

    pub fn yield_stress_y(&self) -> Option<f64> {
        self.y.map(|b| b.steel.yield_stress)
    }
}
