//! Material contract of the four panel integration points
//!
//! A smeared-crack law (MCFT, DSFM or a plain elastic membrane) is seen by the
//! panel only through [`IntegrationPoint`]: give it a strain triple, get the
//! concrete and reinforcement stresses and their stiffness matrices back.
//! `update` never advances the committed history; only `commit` does.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::material::{Concrete, WebBars, WebReinforcement};
use super::panel::PanelBehavior;
use crate::error::{PanelError, PanelResult};
use crate::math::{Mat3, Vec3};
use crate::results::PrincipalStresses;

/// Output of one material update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialResponse {
    pub concrete_stress: Vec3,
    pub reinforcement_stress: Vec3,
    /// Secant stiffness of the concrete
    pub concrete_stiffness: Mat3,
    /// Secant stiffness of the smeared reinforcement
    pub reinforcement_stiffness: Mat3,
}

impl MaterialResponse {
    /// Total stress carried by the point
    pub fn stress(&self) -> Vec3 {
        self.concrete_stress + self.reinforcement_stress
    }

    pub fn is_finite(&self) -> bool {
        self.concrete_stress.iter().all(|x| x.is_finite())
            && self.reinforcement_stress.iter().all(|x| x.is_finite())
            && self.concrete_stiffness.iter().all(|x| x.is_finite())
            && self.reinforcement_stiffness.iter().all(|x| x.is_finite())
    }
}

/// State holder of one integration point
pub trait IntegrationPoint: Send + fmt::Debug {
    /// Evaluate the material at a trial strain (εx, εy, γxy)
    fn update(&mut self, strain: &Vec3) -> PanelResult<MaterialResponse>;

    /// Uncracked (concrete, reinforcement) stiffness matrices
    fn initial_stiffness(&self) -> (Mat3, Mat3);

    /// Make the current trial state permanent
    fn commit(&mut self);

    /// Strain of the last update
    fn strain(&self) -> Vec3;

    fn concrete_stress(&self) -> Vec3;

    fn reinforcement_stress(&self) -> Vec3;

    fn stress(&self) -> Vec3 {
        self.concrete_stress() + self.reinforcement_stress()
    }

    /// Principal stresses of the concrete
    fn principal_stresses(&self) -> PrincipalStresses {
        let s = self.concrete_stress();
        PrincipalStresses::from_components(s[0], s[1], s[2])
    }

    fn principal_strains(&self) -> PrincipalStresses {
        let e = self.strain();
        PrincipalStresses::from_strains(e[0], e[1], e[2])
    }

    fn is_cracked(&self) -> bool {
        false
    }

    fn is_crushed(&self) -> bool {
        false
    }

    fn is_yielded(&self) -> bool {
        false
    }

    /// Copy of the full state, used to snapshot and restore the point
    fn clone_box(&self) -> Box<dyn IntegrationPoint>;
}

impl Clone for Box<dyn IntegrationPoint> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Factory of integration points for a panel behavior
pub trait ConstitutiveLaw {
    fn integration_point(
        &self,
        behavior: PanelBehavior,
        concrete: &Concrete,
        reinforcement: &WebReinforcement,
        width: f64,
    ) -> PanelResult<Box<dyn IntegrationPoint>>;
}

/// Linear-elastic membrane: isotropic plane-stress concrete plus smeared
/// orthogonal reinforcement. Used for both nonlinear behaviors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ElasticMembrane;

impl ConstitutiveLaw for ElasticMembrane {
    fn integration_point(
        &self,
        behavior: PanelBehavior,
        concrete: &Concrete,
        reinforcement: &WebReinforcement,
        width: f64,
    ) -> PanelResult<Box<dyn IntegrationPoint>> {
        if !behavior.is_nonlinear() {
            return Err(PanelError::ContractViolation(
                "linear panels have no integration points".to_string(),
            ));
        }
        concrete.validate()?;
        Ok(Box::new(ElasticPoint::new(concrete, reinforcement, width)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PointState {
    strain: Vec3,
    concrete_stress: Vec3,
    reinforcement_stress: Vec3,
    cracked: bool,
    crushed: bool,
    yielded: bool,
}

/// Integration point of [`ElasticMembrane`]
#[derive(Debug, Clone, PartialEq)]
pub struct ElasticPoint {
    concrete_matrix: Mat3,
    reinforcement_matrix: Mat3,
    cracking_stress: f64,
    crushing_stress: f64,
    /// Yield strain in x and y, `None` without bars
    yield_strains: [Option<f64>; 2],
    trial: PointState,
    committed: PointState,
}

impl ElasticPoint {
    pub fn new(concrete: &Concrete, reinforcement: &WebReinforcement, width: f64) -> Self {
        let e = concrete.elastic_modulus;
        let nu = concrete.nu;
        let f = e / (1.0 - nu * nu);
        let concrete_matrix = Mat3::new(
            f, f * nu, 0.0,
            f * nu, f, 0.0,
            0.0, 0.0, f * 0.5 * (1.0 - nu),
        );

        let es = |bars: Option<WebBars>| {
            bars.map_or(0.0, |b| b.ratio(width) * b.steel.elastic_modulus)
        };
        let reinforcement_matrix = Mat3::from_diagonal(&Vec3::new(
            es(reinforcement.x),
            es(reinforcement.y),
            0.0,
        ));

        Self {
            concrete_matrix,
            reinforcement_matrix,
            cracking_stress: concrete.tensile_strength(),
            crushing_stress: concrete.strength,
            yield_strains: [
                reinforcement.x.map(|b| b.steel.yield_strain()),
                reinforcement.y.map(|b| b.steel.yield_strain()),
            ],
            trial: PointState::default(),
            committed: PointState::default(),
        }
    }
}

impl IntegrationPoint for ElasticPoint {
    fn update(&mut self, strain: &Vec3) -> PanelResult<MaterialResponse> {
        if !strain.iter().all(|x| x.is_finite()) {
            return Err(PanelError::Computation(format!(
                "non-finite strain {:?}",
                strain.as_slice()
            )));
        }

        let concrete_stress = self.concrete_matrix * strain;
        let reinforcement_stress = self.reinforcement_matrix * strain;
        let principal =
            PrincipalStresses::from_components(concrete_stress[0], concrete_stress[1], concrete_stress[2]);
        let yielded = self
            .yield_strains
            .iter()
            .zip([strain[0], strain[1]])
            .any(|(limit, e)| limit.is_some_and(|l| e.abs() > l));

        // Flags latch: once committed they stay set
        self.trial = PointState {
            strain: *strain,
            concrete_stress,
            reinforcement_stress,
            cracked: self.committed.cracked || principal.sigma1 > self.cracking_stress,
            crushed: self.committed.crushed || principal.sigma2 < -self.crushing_stress,
            yielded: self.committed.yielded || yielded,
        };

        Ok(MaterialResponse {
            concrete_stress,
            reinforcement_stress,
            concrete_stiffness: self.concrete_matrix,
            reinforcement_stiffness: self.reinforcement_matrix,
        })
    }

    fn initial_stiffness(&self) -> (Mat3, Mat3) {
        (self.concrete_matrix, self.reinforcement_matrix)
    }

    fn commit(&mut self) {
        self.committed = self.trial;
    }

    fn strain(&self) -> Vec3 {
        self.trial.strain
    }

    fn concrete_stress(&self) -> Vec3 {
        self.trial.concrete_stress
    }

    fn reinforcement_stress(&self) -> Vec3 {
        self.trial.reinforcement_stress
    }

    fn is_cracked(&self) -> bool {
        self.trial.cracked
    }

    fn is_crushed(&self) -> bool {
        self.trial.crushed
    }

    fn is_yielded(&self) -> bool {
        self.trial.yielded
    }

    fn clone_box(&self) -> Box<dyn IntegrationPoint> {
        Box::new(self.clone())
    }
}
