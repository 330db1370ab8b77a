//! One-dimensional (stringer) elements adjoining the panels
//!
//! Only the grips and the depth of a stringer matter here: a stringer whose
//! middle node is a panel grip takes half its depth out of the panel's lever
//! arm along the neighbouring edges.

use serde::{Deserialize, Serialize};

use crate::error::{PanelError, PanelResult};

/// Contract of a one-dimensional element as seen by a panel
pub trait OneDimensionalElement {
    /// Start, middle and end grip numbers
    fn grips(&self) -> [usize; 3];

    /// Cross-section depth in the plane of the panel
    fn depth(&self) -> f64;

    fn middle_grip(&self) -> usize {
        self.grips()[1]
    }
}

/// A three-node stringer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stringer {
    pub number: usize,
    pub grips: [usize; 3],
    /// Cross-section height
    pub height: f64,
}

impl Stringer {
    pub fn new(number: usize, grips: [usize; 3], height: f64) -> Self {
        Self {
            number,
            grips,
            height,
        }
    }
}

impl OneDimensionalElement for Stringer {
    fn grips(&self) -> [usize; 3] {
        self.grips
    }

    fn depth(&self) -> f64 {
        self.height
    }
}

/// Half depth of the stringer whose middle node is each of the panel grips
pub fn stringer_corrections<S: OneDimensionalElement>(
    grips: &[usize; 4],
    stringers: &[S],
) -> PanelResult<[f64; 4]> {
    let mut corrections = [0.0; 4];
    for (c, &grip) in corrections.iter_mut().zip(grips.iter()) {
        if let Some(s) = stringers.iter().find(|s| s.middle_grip() == grip) {
            let depth = s.depth();
            if !(depth.is_finite() && depth >= 0.0) {
                return Err(PanelError::InvalidInput(format!(
                    "stringer at grip {} has invalid depth {}",
                    grip, depth
                )));
            }
            *c = 0.5 * depth;
        }
    }
    Ok(corrections)
}
