//! Result types for panel analysis

use serde::{Deserialize, Serialize};

/// In-plane stress state (σx, σy, τxy)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelStresses {
    /// Normal stress in X direction
    pub sx: f64,
    /// Normal stress in Y direction
    pub sy: f64,
    /// Shear stress XY
    pub txy: f64,
}

impl PanelStresses {
    pub fn new(sx: f64, sy: f64, txy: f64) -> Self {
        Self { sx, sy, txy }
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.sx, self.sy, self.txy]
    }

    /// Principal stresses from Mohr's circle
    pub fn principal(&self) -> PrincipalStresses {
        PrincipalStresses::from_components(self.sx, self.sy, self.txy)
    }
}

/// Principal values of a plane tensor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PrincipalStresses {
    /// Maximum principal value
    pub sigma1: f64,
    /// Minimum principal value
    pub sigma2: f64,
    /// Angle of the sigma1 direction to the X axis, in radians
    pub theta: f64,
}

impl PrincipalStresses {
    pub fn new(sigma1: f64, sigma2: f64, theta: f64) -> Self {
        Self {
            sigma1,
            sigma2,
            theta,
        }
    }

    /// Closed-form Mohr's circle solution
    pub fn from_components(sx: f64, sy: f64, txy: f64) -> Self {
        let s_avg = (sx + sy) / 2.0;
        let r = ((sx - sy).powi(2) / 4.0 + txy.powi(2)).sqrt();

        let theta = if r == 0.0 {
            0.0
        } else {
            0.5 * (2.0 * txy).atan2(sx - sy)
        };

        Self {
            sigma1: s_avg + r,
            sigma2: s_avg - r,
            theta,
        }
    }

    /// Principal strains from engineering strain components (γxy is halved)
    pub fn from_strains(ex: f64, ey: f64, gxy: f64) -> Self {
        Self::from_components(ex, ey, 0.5 * gxy)
    }

    /// Angle in degrees
    pub fn theta_degrees(&self) -> f64 {
        self.theta.to_degrees()
    }
}

/// State of one integration point, for crack and crush reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointResult {
    /// Position of the integration point (x, y)
    pub position: [f64; 2],
    /// Engineering strains (εx, εy, γxy)
    pub strain: [f64; 3],
    /// Total stresses (concrete + reinforcement)
    pub stress: [f64; 3],
    /// Principal concrete stresses
    pub principal_stresses: PrincipalStresses,
    /// Principal strains
    pub principal_strains: PrincipalStresses,
    pub cracked: bool,
    pub crushed: bool,
    pub yielded: bool,
}
