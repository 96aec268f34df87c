//! End-to-end propagation through the driver, solvers and state pipeline together.
use std::sync::Arc;

use aero_physics::{
    earth_rotation_angle, AccelerationLaw, Body, Earth, Epoch, LoggerKind, Simulation, SolverKind,
    EARTH_ROTATION_RATE,
};
use aero_utils::{Position, ReferenceFrame, Velocity, WGS84_MU, WGS84_SEMI_MAJOR_AXIS};
use approx::{assert_abs_diff_eq, assert_relative_eq};

use ReferenceFrame::{EarthCenteredEarthFixed as Ecef, EarthCenteredInertial as Eci};

const R: f64 = WGS84_SEMI_MAJOR_AXIS;

#[test]
fn fixed_ground_point_rides_the_earth() {
    let earth = Arc::new(Earth::spherical());
    let t0 = Epoch::from_j2000_seconds(1_000.0);
    let pad = Body::new("pad", earth, t0, Position::cartesian(R, 0.0, 0.0, Ecef), Velocity::zero(Ecef)).unwrap();

    // r_I = R3(-theta) (R, 0, 0)
    let theta = earth_rotation_angle(t0);
    let start = *pad.state().position();
    assert_eq!(start.frame(), Eci);
    assert_abs_diff_eq!(start.data().x, R * theta.cos(), epsilon = 1e-6);
    assert_abs_diff_eq!(start.data().y, R * theta.sin(), epsilon = 1e-6);
    assert_abs_diff_eq!(start.data().z, 0.0, epsilon = 1e-6);

    let mut sim = Simulation::new(1.0).unwrap();
    sim.add_body(pad, SolverKind::Fixed, AccelerationLaw::Zero.into_fn())
        .unwrap();
    sim.step().unwrap();

    let state = sim.body("pad").unwrap().state();
    assert_eq!(state.time(), t0 + 1.0);
    // the inertial point did not move
    assert_eq!(state.position().data(), start.data());

    // closed-form inverse of the Earth-fixed point at the new time
    let ecef = state.position_ecef().unwrap();
    let longitude = ecef.data().y.atan2(ecef.data().x);
    assert_abs_diff_eq!(state.longitude(), longitude, epsilon = 1e-12);
    assert_abs_diff_eq!(state.longitude(), -EARTH_ROTATION_RATE, epsilon = 1e-9);
    assert_abs_diff_eq!(state.latitude(), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(state.altitude(), 0.0, epsilon = 1e-6);
}

#[test]
fn circular_orbit_keeps_its_radius() {
    let earth = Arc::new(Earth::geoid());
    let radius = R + 500_000.0;
    let speed = (WGS84_MU / radius).sqrt();
    let satellite = Body::new(
        "sat",
        earth,
        Epoch::J2000,
        Position::cartesian(radius, 0.0, 0.0, Eci),
        Velocity::cartesian(0.0, speed, 0.0, Eci),
    )
    .unwrap()
    .with_logger(LoggerKind::Position.into_fn());

    let initial_energy = satellite.state().total_energy();
    assert_relative_eq!(initial_energy, -WGS84_MU / (2.0 * radius), max_relative = 1e-12);

    let mut sim = Simulation::new(1.0).unwrap();
    sim.add_body(satellite, SolverKind::VelocityVerlet, AccelerationLaw::PointMass.into_fn())
        .unwrap();
    sim.run(300.0).unwrap();

    let radii = sim.signals().get("sat", "radius").unwrap();
    assert_eq!(radii.data().len(), 301);
    for (_, r) in radii.data() {
        assert_relative_eq!(*r, radius, max_relative = 1e-5);
    }

    let state = sim.body("sat").unwrap().state();
    assert_relative_eq!(state.total_energy(), initial_energy, max_relative = 1e-5);
    // a quarter of the way round would be ~1400 s, so it has only swept a small arc
    assert!(state.position().data().y > 0.0);
}

#[test]
fn geoid_and_sphere_agree_on_the_equator() {
    let position = Position::cartesian(R, 0.0, 0.0, Ecef);
    let time = Epoch::from_j2000_seconds(86_400.0);
    let sphere = Earth::spherical().construct_state(time, position, Velocity::zero(Ecef)).unwrap();
    let geoid = Earth::geoid().construct_state(time, position, Velocity::zero(Ecef)).unwrap();

    assert_abs_diff_eq!(sphere.altitude(), geoid.altitude(), epsilon = 1e-3);
    // polar motion is a fraction of an arcsecond
    assert_abs_diff_eq!(sphere.longitude(), geoid.longitude(), epsilon = 1e-5);
    assert_abs_diff_eq!(sphere.latitude(), geoid.latitude(), epsilon = 1e-5);
}

#[test]
fn falling_body_reports_a_vertical_flight_path() {
    let earth = Arc::new(Earth::spherical());
    let drop = Body::new(
        "drop",
        earth,
        Epoch::J2000,
        Position::cartesian(R + 1_000.0, 0.0, 0.0, Ecef),
        Velocity::cartesian(-10.0, 0.0, 0.0, Ecef),
    )
    .unwrap();

    assert_abs_diff_eq!(drop.state().flight_path_angle(), -std::f64::consts::FRAC_PI_2, epsilon = 1e-9);
    assert_abs_diff_eq!(drop.state().speed(), 10.0, epsilon = 1e-9);
}
