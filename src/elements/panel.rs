//! Quadrilateral shear panel of a stringer-panel model
//!
//! A panel has four grips, one at the midpoint of each edge, with two
//! displacement dof each. Its behavior selects the formulation:
//!
//! - `Linear`: closed-form elastic shear panel ([`LinearPanel`])
//! - `NonlinearMcft` / `NonlinearDsfm`: four integration points driven by a
//!   [`ConstitutiveLaw`] through the [`NonlinearOperators`]
//!
//! Outer solver cycle: `set_displacement` → `analysis` → `global_stiffness` /
//! `forces` → `results` once the step is accepted.

use log::{debug, trace, warn};
use nalgebra::{DVector, Point2};
use serde::{Deserialize, Serialize};

use super::integration_point::{ConstitutiveLaw, IntegrationPoint, MaterialResponse};
use super::material::{Concrete, WebReinforcement};
use super::node::{DofNumbering, Node, SequentialDofs};
use super::stringer::{stringer_corrections, OneDimensionalElement};
use crate::analysis::AnalysisOptions;
use crate::error::{PanelError, PanelResult};
use crate::math::linear_panel::truss_principal_stresses;
use crate::math::nonlinear_panel::point_positions;
use crate::math::{
    all_finite, block_diagonal, stack_points, LinearPanel, Mat12, Mat3, Mat8, NonlinearOperators,
    PanelGeometry, Vec3, Vec4, Vec8,
};
use crate::results::{PanelStresses, PointResult, PrincipalStresses};

/// Material behavior of a panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelBehavior {
    #[default]
    Linear,
    /// Modified Compression Field Theory
    NonlinearMcft,
    /// Disturbed Stress Field Model
    NonlinearDsfm,
}

impl PanelBehavior {
    pub fn is_nonlinear(&self) -> bool {
        !matches!(self, PanelBehavior::Linear)
    }
}

/// Integration points and operators of a nonlinear panel
#[derive(Debug, Clone)]
struct NonlinearState {
    behavior: PanelBehavior,
    operators: NonlinearOperators,
    points: [Box<dyn IntegrationPoint>; 4],
    /// Responses of the last analysis, cleared by every displacement change
    responses: Option<[MaterialResponse; 4]>,
}

#[derive(Debug, Clone)]
enum PanelFormulation {
    Linear(LinearPanel),
    Nonlinear(NonlinearState),
}

/// Stringer-panel shear element
#[derive(Debug, Clone)]
pub struct Panel {
    /// Element number
    pub number: usize,
    geometry: PanelGeometry,
    grips: [usize; 4],
    /// Global dof of the grips, x and y per grip
    dofs: [usize; 8],
    concrete: Concrete,
    reinforcement: WebReinforcement,
    corrections: [f64; 4],
    options: AnalysisOptions,
    displacement: Vec8,
    formulation: PanelFormulation,
}

impl Panel {
    /// Create a linear panel
    ///
    /// # Arguments
    /// * `number` - Element number
    /// * `vertices` - 4 vertices, counter-clockwise
    /// * `width` - Out-of-plane thickness
    /// * `grips` - Grip numbers of edges 0..4 (edge `i` from vertex `i` to `i + 1`)
    /// * `concrete` - Concrete parameters
    /// * `reinforcement` - Web reinforcement
    pub fn new(
        number: usize,
        vertices: &[Point2<f64>],
        width: f64,
        grips: &[usize],
        concrete: Concrete,
        reinforcement: WebReinforcement,
    ) -> PanelResult<Self> {
        let vertices = four(vertices, "vertices")?;
        let grips = four(grips, "grips")?;
        concrete.validate()?;

        let options = AnalysisOptions::default();
        let geometry = PanelGeometry::new(vertices, width, &options)?;
        let linear = LinearPanel::new(&geometry, concrete.shear_modulus(), &options)?;
        let dofs = resolve_dofs(&grips, &SequentialDofs)?;

        debug!(
            "Panel {}: grips {:?}, area {:.3}, rectangular {}",
            number,
            grips,
            geometry.area(),
            geometry.is_rectangular()
        );

        Ok(Self {
            number,
            geometry,
            grips,
            dofs,
            concrete,
            reinforcement,
            corrections: [0.0; 4],
            options,
            displacement: Vec8::zeros(),
            formulation: PanelFormulation::Linear(linear),
        })
    }

    /// Replace the numerical settings; geometry and operators are rebuilt
    pub fn with_options(mut self, options: AnalysisOptions) -> PanelResult<Self> {
        let geometry = PanelGeometry::new(*self.geometry.vertices(), self.geometry.width(), &options)?;
        self.formulation = self.reformulate(&geometry, &self.corrections, &options)?;
        self.geometry = geometry;
        self.options = options;
        Ok(self)
    }

    /// Take the depth of adjoining stringers out of the concrete edges
    pub fn with_stringers<S: OneDimensionalElement>(mut self, stringers: &[S]) -> PanelResult<Self> {
        let corrections = stringer_corrections(&self.grips, stringers)?;
        self.formulation = self.reformulate(&self.geometry, &corrections, &self.options)?;
        self.corrections = corrections;
        debug!("Panel {}: stringer corrections {:?}", self.number, corrections);
        Ok(self)
    }

    /// Resolve the grip dof through a numbering other than the sequential one
    pub fn with_dofs<D: DofNumbering + ?Sized>(mut self, numbering: &D) -> PanelResult<Self> {
        self.dofs = resolve_dofs(&self.grips, numbering)?;
        Ok(self)
    }

    pub fn with_behavior(
        mut self,
        behavior: PanelBehavior,
        law: &dyn ConstitutiveLaw,
    ) -> PanelResult<Self> {
        self.set_behavior(behavior, law)?;
        Ok(self)
    }

    /// Switch behavior; nonlinear behaviors get four fresh integration points
    pub fn set_behavior(
        &mut self,
        behavior: PanelBehavior,
        law: &dyn ConstitutiveLaw,
    ) -> PanelResult<()> {
        self.formulation = if behavior.is_nonlinear() {
            let width = self.geometry.width();
            let make = || law.integration_point(behavior, &self.concrete, &self.reinforcement, width);
            PanelFormulation::Nonlinear(NonlinearState {
                behavior,
                operators: NonlinearOperators::new(&self.geometry, &self.corrections)?,
                points: [make()?, make()?, make()?, make()?],
                responses: None,
            })
        } else {
            PanelFormulation::Linear(LinearPanel::new(
                &self.geometry,
                self.concrete.shear_modulus(),
                &self.options,
            )?)
        };
        debug!("Panel {}: behavior {:?}", self.number, behavior);
        Ok(())
    }

    /// Move the vertices; every derived quantity is rebuilt together
    pub fn set_vertices(&mut self, vertices: &[Point2<f64>]) -> PanelResult<()> {
        let vertices = four(vertices, "vertices")?;
        let geometry = PanelGeometry::new(vertices, self.geometry.width(), &self.options)?;
        self.formulation = self.reformulate(&geometry, &self.corrections, &self.options)?;
        self.geometry = geometry;
        Ok(())
    }

    fn reformulate(
        &self,
        geometry: &PanelGeometry,
        corrections: &[f64; 4],
        options: &AnalysisOptions,
    ) -> PanelResult<PanelFormulation> {
        Ok(match &self.formulation {
            PanelFormulation::Linear(_) => PanelFormulation::Linear(LinearPanel::new(
                geometry,
                self.concrete.shear_modulus(),
                options,
            )?),
            PanelFormulation::Nonlinear(state) => PanelFormulation::Nonlinear(NonlinearState {
                behavior: state.behavior,
                operators: NonlinearOperators::new(geometry, corrections)?,
                points: state.points.clone(),
                responses: None,
            }),
        })
    }

    pub fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    pub fn grips(&self) -> &[usize; 4] {
        &self.grips
    }

    pub fn dofs(&self) -> &[usize; 8] {
        &self.dofs
    }

    /// Grips at the edge midpoints
    pub fn grip_nodes(&self) -> [Node; 4] {
        let midpoints = self.geometry.edge_midpoints();
        std::array::from_fn(|i| Node::new(self.grips[i], midpoints[i].x, midpoints[i].y))
    }

    pub fn concrete(&self) -> &Concrete {
        &self.concrete
    }

    pub fn reinforcement(&self) -> &WebReinforcement {
        &self.reinforcement
    }

    pub fn stringer_corrections(&self) -> &[f64; 4] {
        &self.corrections
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    pub fn behavior(&self) -> PanelBehavior {
        match &self.formulation {
            PanelFormulation::Linear(_) => PanelBehavior::Linear,
            PanelFormulation::Nonlinear(state) => state.behavior,
        }
    }

    pub fn displacement(&self) -> &Vec8 {
        &self.displacement
    }

    /// Linear formulation, `None` for nonlinear behaviors
    pub fn linear(&self) -> Option<&LinearPanel> {
        match &self.formulation {
            PanelFormulation::Linear(linear) => Some(linear),
            PanelFormulation::Nonlinear(_) => None,
        }
    }

    /// Operators of the nonlinear formulation
    pub fn operators(&self) -> Option<&NonlinearOperators> {
        match &self.formulation {
            PanelFormulation::Linear(_) => None,
            PanelFormulation::Nonlinear(state) => Some(&state.operators),
        }
    }

    /// Material responses of the last analysis
    pub fn responses(&self) -> Option<&[MaterialResponse; 4]> {
        match &self.formulation {
            PanelFormulation::Linear(_) => None,
            PanelFormulation::Nonlinear(state) => state.responses.as_ref(),
        }
    }

    /// Gather the panel displacements from the global displacement vector
    pub fn set_displacement(&mut self, global: &DVector<f64>) -> PanelResult<()> {
        let mut u = Vec8::zeros();
        for (ui, &dof) in u.iter_mut().zip(self.dofs.iter()) {
            *ui = *global.get(dof).ok_or_else(|| {
                PanelError::ContractViolation(format!(
                    "panel {}: dof {} outside displacement vector of length {}",
                    self.number,
                    dof,
                    global.len()
                ))
            })?;
        }
        self.store_displacement(u)
    }

    /// Set the 8 panel displacements directly
    pub fn set_local_displacement(&mut self, displacement: &[f64]) -> PanelResult<()> {
        if displacement.len() != 8 {
            return Err(PanelError::ContractViolation(format!(
                "panel {}: expected 8 displacements, got {}",
                self.number,
                displacement.len()
            )));
        }
        self.store_displacement(Vec8::from_column_slice(displacement))
    }

    fn store_displacement(&mut self, u: Vec8) -> PanelResult<()> {
        if !all_finite(u.as_slice()) {
            return Err(PanelError::InvalidInput(format!(
                "panel {}: non-finite displacement",
                self.number
            )));
        }
        self.displacement = u;
        if let PanelFormulation::Nonlinear(state) = &mut self.formulation {
            state.responses = None;
        }
        Ok(())
    }

    /// Update the integration points for the current displacement
    ///
    /// Does not touch the committed material history. Nothing to do for the
    /// linear formulation.
    pub fn analysis(&mut self) -> PanelResult<()> {
        let PanelFormulation::Nonlinear(state) = &mut self.formulation else {
            return Ok(());
        };

        let strains = state.operators.strains(&self.displacement);
        let mut responses = [MaterialResponse {
            concrete_stress: Vec3::zeros(),
            reinforcement_stress: Vec3::zeros(),
            concrete_stiffness: Mat3::zeros(),
            reinforcement_stiffness: Mat3::zeros(),
        }; 4];

        for (k, (point, response)) in state.points.iter_mut().zip(responses.iter_mut()).enumerate() {
            let strain = strains.fixed_rows::<3>(3 * k).into_owned();
            let r = point.update(&strain)?;
            if !r.is_finite() {
                warn!("Panel {}: non-finite material response at point {}", self.number, k);
                return Err(PanelError::Computation(format!(
                    "panel {}: non-finite material response at integration point {}",
                    self.number, k
                )));
            }
            *response = r;
        }

        trace!("Panel {}: strains {:?}", self.number, strains.as_slice());
        state.responses = Some(responses);
        Ok(())
    }

    /// Commit the integration point states of the accepted step
    pub fn results(&mut self) -> PanelResult<()> {
        let number = self.number;
        let PanelFormulation::Nonlinear(state) = &mut self.formulation else {
            return Ok(());
        };
        if state.responses.is_none() {
            return Err(not_analysed(number));
        }
        for point in state.points.iter_mut() {
            point.commit();
        }
        debug!("Panel {}: state committed", number);
        Ok(())
    }

    fn analysed(&self) -> PanelResult<(&NonlinearState, &[MaterialResponse; 4])> {
        match &self.formulation {
            PanelFormulation::Nonlinear(state) => state
                .responses
                .as_ref()
                .map(|r| (state, r))
                .ok_or_else(|| not_analysed(self.number)),
            PanelFormulation::Linear(_) => Err(no_points(self.number)),
        }
    }

    /// Secant (concrete, reinforcement) material matrices of the 4 points
    pub fn material_stiffness(&self) -> PanelResult<(Mat12, Mat12)> {
        let (_, responses) = self.analysed()?;
        Ok((
            block_diagonal(&responses.map(|r| r.concrete_stiffness)),
            block_diagonal(&responses.map(|r| r.reinforcement_stiffness)),
        ))
    }

    /// Uncracked (concrete, reinforcement) material matrices of the 4 points
    pub fn initial_material_stiffness(&self) -> PanelResult<(Mat12, Mat12)> {
        let PanelFormulation::Nonlinear(state) = &self.formulation else {
            return Err(no_points(self.number));
        };
        let initial: [(Mat3, Mat3); 4] = std::array::from_fn(|k| state.points[k].initial_stiffness());
        Ok((
            block_diagonal(&initial.map(|m| m.0)),
            block_diagonal(&initial.map(|m| m.1)),
        ))
    }

    /// Global 8x8 stiffness (secant for nonlinear behaviors)
    pub fn global_stiffness(&self) -> PanelResult<Mat8> {
        match &self.formulation {
            PanelFormulation::Linear(linear) => Ok(linear.global_stiffness()),
            PanelFormulation::Nonlinear(state) => {
                let (dc, ds) = self.material_stiffness()?;
                Ok(state.operators.stiffness(&dc, &ds))
            }
        }
    }

    /// Stiffness from the uncracked material, used before any analysis
    pub fn initial_stiffness(&self) -> PanelResult<Mat8> {
        match &self.formulation {
            PanelFormulation::Linear(linear) => Ok(linear.global_stiffness()),
            PanelFormulation::Nonlinear(state) => {
                let (dc, ds) = self.initial_material_stiffness()?;
                Ok(state.operators.stiffness(&dc, &ds))
            }
        }
    }

    /// Internal grip forces
    pub fn forces(&self) -> PanelResult<Vec8> {
        match &self.formulation {
            PanelFormulation::Linear(linear) => Ok(linear.global_forces(&self.displacement)),
            PanelFormulation::Nonlinear(_) => {
                let (state, responses) = self.analysed()?;
                Ok(state.operators.forces(
                    &responses.map(|r| r.concrete_stress),
                    &responses.map(|r| r.reinforcement_stress),
                ))
            }
        }
    }

    /// Internal grip forces through [Q]([Pc]σc + [Ps]σs)
    pub fn forces_by_operators(&self) -> PanelResult<Vec8> {
        match &self.formulation {
            PanelFormulation::Linear(linear) => Ok(linear.global_forces(&self.displacement)),
            PanelFormulation::Nonlinear(_) => {
                let (state, responses) = self.analysed()?;
                Ok(state.operators.forces_by_operators(
                    &stack_points(&responses.map(|r| r.concrete_stress)),
                    &stack_points(&responses.map(|r| r.reinforcement_stress)),
                ))
            }
        }
    }

    /// Edge shear forces of the linear formulation
    pub fn local_forces(&self) -> PanelResult<Vec4> {
        match &self.formulation {
            PanelFormulation::Linear(linear) => Ok(linear.local_forces(&self.displacement)),
            PanelFormulation::Nonlinear(_) => Err(PanelError::ContractViolation(format!(
                "panel {}: edge shear forces exist only for linear panels",
                self.number
            ))),
        }
    }

    /// Central finite-difference Jacobian of the grip forces
    ///
    /// Displacement and integration point state are restored on return, also
    /// when an analysis fails halfway. The linear formulation returns its exact
    /// stiffness.
    pub fn tangent_stiffness(&mut self) -> PanelResult<Mat8> {
        if matches!(self.formulation, PanelFormulation::Linear(_)) {
            return self.global_stiffness();
        }

        let delta = self.options.perturbation;
        let number = self.number;
        let mut k = Mat8::zeros();
        {
            let mut guard = StateGuard::new(self);
            let base = guard.displacement;
            for j in 0..8 {
                let mut u = base;
                u[j] = base[j] + delta;
                let f_plus = guard.panel.forces_at(u)?;
                u[j] = base[j] - delta;
                let f_minus = guard.panel.forces_at(u)?;
                k.set_column(j, &((f_plus - f_minus) / (2.0 * delta)));
            }
        }

        if !all_finite(k.as_slice()) {
            warn!("Panel {}: non-finite tangent stiffness", number);
            return Err(PanelError::Computation(format!(
                "panel {}: finite-difference tangent is not finite",
                number
            )));
        }
        Ok(k)
    }

    fn forces_at(&mut self, u: Vec8) -> PanelResult<Vec8> {
        self.displacement = u;
        self.analysis()?;
        self.forces()
    }

    /// Average stresses (σx, σy, τxy)
    ///
    /// Shear only for the linear formulation, mean of the point stresses
    /// otherwise.
    pub fn average_stresses(&self) -> PanelResult<PanelStresses> {
        match &self.formulation {
            PanelFormulation::Linear(linear) => Ok(linear.average_stresses(&self.displacement)),
            PanelFormulation::Nonlinear(_) => {
                let (_, responses) = self.analysed()?;
                let sum = responses.iter().fold(Vec3::zeros(), |acc, r| acc + r.stress());
                let mean = sum * 0.25;
                Ok(PanelStresses::new(mean[0], mean[1], mean[2]))
            }
        }
    }

    /// Principal stresses: truss model for the linear formulation, Mohr's
    /// circle of the average stresses otherwise
    pub fn principal_stresses(&self) -> PanelResult<PrincipalStresses> {
        let average = self.average_stresses()?;
        Ok(match &self.formulation {
            PanelFormulation::Linear(_) => truss_principal_stresses(
                average.txy,
                self.reinforcement.yield_stress_x(),
                self.reinforcement.yield_stress_y(),
            ),
            PanelFormulation::Nonlinear(_) => average.principal(),
        })
    }

    /// Per-point state for crack, crush and yield reporting
    pub fn point_results(&self) -> PanelResult<[PointResult; 4]> {
        let PanelFormulation::Nonlinear(state) = &self.formulation else {
            return Err(no_points(self.number));
        };
        let positions = point_positions(&self.geometry);
        Ok(std::array::from_fn(|k| {
            let point = &state.points[k];
            PointResult {
                position: [positions[k].x, positions[k].y],
                strain: point.strain().into(),
                stress: point.stress().into(),
                principal_stresses: point.principal_stresses(),
                principal_strains: point.principal_strains(),
                cracked: point.is_cracked(),
                crushed: point.is_crushed(),
                yielded: point.is_yielded(),
            }
        }))
    }
}

/// Snapshot of the mutable panel state, put back on drop
struct StateGuard<'a> {
    panel: &'a mut Panel,
    displacement: Vec8,
    points: Option<[Box<dyn IntegrationPoint>; 4]>,
    responses: Option<[MaterialResponse; 4]>,
}

impl<'a> StateGuard<'a> {
    fn new(panel: &'a mut Panel) -> Self {
        let (points, responses) = match &panel.formulation {
            PanelFormulation::Nonlinear(state) => (Some(state.points.clone()), state.responses),
            PanelFormulation::Linear(_) => (None, None),
        };
        Self {
            displacement: panel.displacement,
            panel,
            points,
            responses,
        }
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        self.panel.displacement = self.displacement;
        if let PanelFormulation::Nonlinear(state) = &mut self.panel.formulation {
            if let Some(points) = self.points.take() {
                state.points = points;
            }
            state.responses = self.responses.take();
        }
    }
}

fn four<T: Copy>(values: &[T], what: &str) -> PanelResult<[T; 4]> {
    values.try_into().map_err(|_| {
        PanelError::ContractViolation(format!("a panel needs 4 {}, got {}", what, values.len()))
    })
}

fn resolve_dofs<D: DofNumbering + ?Sized>(grips: &[usize; 4], numbering: &D) -> PanelResult<[usize; 8]> {
    let mut dofs = [0; 8];
    for (i, &grip) in grips.iter().enumerate() {
        let [x, y] = numbering.dofs(grip).ok_or_else(|| {
            PanelError::ContractViolation(format!("no dof numbering for grip {}", grip))
        })?;
        dofs[2 * i] = x;
        dofs[2 * i + 1] = y;
    }
    Ok(dofs)
}

fn not_analysed(number: usize) -> PanelError {
    PanelError::ContractViolation(format!(
        "panel {}: analysis() has not been run for the current displacement",
        number
    ))
}

fn no_points(number: usize) -> PanelError {
    PanelError::ContractViolation(format!(
        "panel {}: linear panels have no integration points",
        number
    ))
}
