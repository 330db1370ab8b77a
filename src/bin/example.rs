//! Stringer Panel Example - Square wall panel in pure shear

use anyhow::Context;
use log::info;
use nalgebra::Point2;
use serde::Serialize;
use stringer_panel::prelude::*;

#[derive(Serialize)]
struct PanelReport {
    behavior: PanelBehavior,
    forces: Vec<f64>,
    average_stresses: PanelStresses,
    principal_stresses: PrincipalStresses,
    points: Option<[PointResult; 4]>,
}

fn report(panel: &mut Panel) -> anyhow::Result<PanelReport> {
    panel.analysis()?;
    let points = match panel.behavior() {
        PanelBehavior::Linear => None,
        _ => Some(panel.point_results()?),
    };
    Ok(PanelReport {
        behavior: panel.behavior(),
        forces: panel.forces()?.iter().copied().collect(),
        average_stresses: panel.average_stresses()?,
        principal_stresses: panel.principal_stresses()?,
        points,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== Stringer Panel Example: Square Panel in Shear ===\n");

    //   v3 ---- g2 ---- v2
    //   |                |
    //   g3              g1
    //   |                |
    //   v0 ---- g0 ---- v1
    //            |
    //        stringer
    let size = 1000.0;
    let vertices = [
        Point2::new(0.0, 0.0),
        Point2::new(size, 0.0),
        Point2::new(size, size),
        Point2::new(0.0, size),
    ];

    let concrete = Concrete::from_strength(30.0);
    let bars = WebBars::new(10.0, 150.0, Steel::new(500.0, 200_000.0));
    let reinforcement = WebReinforcement::uniform(bars);
    let stringers = [Stringer::new(1, [10, 0, 11], 200.0)];

    let mut panel = Panel::new(1, &vertices, 200.0, &[0, 1, 2, 3], concrete, reinforcement)
        .context("Failed to create panel")?
        .with_stringers(&stringers)?;

    for node in panel.grip_nodes() {
        info!("Grip {} at ({:.1}, {:.1})", node.number, node.x, node.y);
    }

    // Shear strain of 0.1‰: top edge moves right, bottom edge left
    let gamma = 1e-4;
    let u = [-0.5 * size * gamma, 0.0, 0.0, 0.0, 0.5 * size * gamma, 0.0, 0.0, 0.0];
    panel.set_local_displacement(&u)?;

    let linear = report(&mut panel)?;
    info!("Linear panel stiffness:\n{}", panel.global_stiffness()?);

    panel.set_behavior(PanelBehavior::NonlinearMcft, &ElasticMembrane)?;
    panel.set_local_displacement(&u)?;
    let nonlinear = report(&mut panel)?;

    let secant = panel.global_stiffness()?;
    let tangent = panel.tangent_stiffness()?;
    let deviation = (tangent - secant).amax() / secant.amax();
    panel.results()?;

    println!("Linear panel:\n{}\n", serde_json::to_string_pretty(&linear)?);
    println!("Nonlinear panel (elastic membrane):\n{}\n", serde_json::to_string_pretty(&nonlinear)?);
    println!("Tangent vs secant stiffness, max relative deviation: {:.3e}", deviation);

    println!("\n=== Analysis Complete ===");
    Ok(())
}
