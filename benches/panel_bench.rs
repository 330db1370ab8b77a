//! Benchmarks for panel elements

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Point2;
use stringer_panel::prelude::*;

fn skewed_vertices() -> [Point2<f64>; 4] {
    [
        Point2::new(0.0, 0.0),
        Point2::new(1100.0, -150.0),
        Point2::new(1250.0, 700.0),
        Point2::new(150.0, 950.0),
    ]
}

fn create_panel(behavior: PanelBehavior) -> Panel {
    let reinforcement =
        WebReinforcement::uniform(WebBars::new(12.0, 150.0, Steel::new(500.0, 200_000.0)));
    let stringers = [Stringer::new(1, [10, 0, 11], 200.0)];

    let mut panel = Panel::new(
        1,
        &skewed_vertices(),
        150.0,
        &[0, 1, 2, 3],
        Concrete::from_strength(30.0),
        reinforcement,
    )
    .unwrap()
    .with_stringers(&stringers)
    .unwrap()
    .with_behavior(behavior, &ElasticMembrane)
    .unwrap();

    panel
        .set_local_displacement(&[0.12, -0.05, 0.03, 0.21, -0.08, 0.04, -0.02, -0.17])
        .unwrap();
    panel
}

fn bench_construction(c: &mut Criterion) {
    c.bench_function("linear_panel_new", |b| {
        b.iter(|| black_box(create_panel(PanelBehavior::Linear)))
    });

    c.bench_function("nonlinear_panel_new", |b| {
        b.iter(|| black_box(create_panel(PanelBehavior::NonlinearMcft)))
    });
}

fn bench_analysis(c: &mut Criterion) {
    let mut panel = create_panel(PanelBehavior::NonlinearMcft);

    c.bench_function("analysis_and_forces", |b| {
        b.iter(|| {
            panel.analysis().unwrap();
            black_box(panel.forces().unwrap())
        })
    });

    panel.analysis().unwrap();
    c.bench_function("secant_stiffness", |b| {
        b.iter(|| black_box(panel.global_stiffness().unwrap()))
    });

    c.bench_function("tangent_stiffness", |b| {
        b.iter(|| black_box(panel.tangent_stiffness().unwrap()))
    });
}

criterion_group!(benches, bench_construction, bench_analysis);
criterion_main!(benches);
