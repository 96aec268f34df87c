use std::sync::Arc;

use aero_physics::{AccelerationLaw, Body, Earth, Epoch, Simulation, SolverKind};
use aero_utils::{Position, ReferenceFrame, Velocity, WGS84_MU, WGS84_SEMI_MAJOR_AXIS};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

#[allow(clippy::unwrap_used)] // constant initial conditions, all inside the provider window
fn orbiting_simulation(earth: Earth, solver: SolverKind) -> Simulation {
    let earth = Arc::new(earth);
    let radius = WGS84_SEMI_MAJOR_AXIS + 400_000.0;
    let speed = (WGS84_MU / radius).sqrt();

    let mut sim = Simulation::new(1.0).unwrap();
    for index in 0..4 {
        let body = Body::new(
            format!("sat-{index}"),
            Arc::clone(&earth),
            Epoch::J2000,
            Position::cartesian(radius, 0.0, index as f64 * 1_000.0, ReferenceFrame::EarthCenteredInertial),
            Velocity::cartesian(0.0, speed, 0.0, ReferenceFrame::EarthCenteredInertial),
        )
        .unwrap();
        sim.add_body(body, solver, AccelerationLaw::J2.into_fn()).unwrap();
    }
    sim
}

#[allow(clippy::unwrap_used)] // a failing step would make the timings meaningless anyway
fn step_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");
    for (label, earth) in [("spherical", Earth::spherical as fn() -> Earth), ("geoid", Earth::geoid)] {
        for solver in [SolverKind::Euler, SolverKind::VelocityVerlet] {
            let mut sim = orbiting_simulation(earth(), solver);
            group.bench_function(format!("{label}/{solver:?}"), |b| {
                b.iter(|| black_box(&mut sim).step().unwrap())
            });
        }
    }
    group.finish();
}

criterion_group!(benches, step_benchmark);
criterion_main!(benches);
