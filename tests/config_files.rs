use trajectory_simulator::config::{SimulationConfig, load_parameters};
use trajectory_simulator::simulation::{Simulator, TrajectorySummary};

#[test]
fn bundled_yaml_launch_runs_and_stops_at_ground() {
    let params = load_parameters("configs/launch.yaml").expect("launch.yaml");
    let config = Simulator::default().resolve(&params).expect("valid launch");
    assert!(config.truncate_at_ground);
    assert!(config.wind.altitude_variation);
    assert_eq!(config.integrator.name(), "adaptive");

    let trajectory = Simulator::default()
        .run_parameters(&params)
        .expect("launch run");
    let last = trajectory.last().expect("sample");
    assert!(last.y < 0.0);
    assert!(trajectory.samples()[trajectory.len() - 2].y >= 0.0);
}

#[test]
fn bundled_toml_vacuum_drop_follows_free_fall() {
    let params = load_parameters("configs/vacuum.toml").expect("vacuum.toml");
    let config = SimulationConfig::from_parameters(&params).expect("valid vacuum config");
    assert_eq!(config.integrator.name(), "rk4");
    assert_eq!(config.environment.air_density, 0.0);

    let trajectory = Simulator::run_config(&config, &Default::default()).expect("vacuum run");
    let summary = TrajectorySummary::from_trajectory(&trajectory).expect("summary");
    // 100 m drop takes sqrt(200 / 9.81) = 4.515 s
    let flight = summary.flight_time_s().expect("hits the ground");
    assert!((flight - (200.0_f64 / 9.81).sqrt()).abs() < 0.01, "flight {flight}");
    assert!((summary.range_m - 12.0 * flight).abs() < 1e-6);
}
