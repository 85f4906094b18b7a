use std::time::Instant;

use rstest::rstest;
use trajectory_simulator::config::keys;
use trajectory_simulator::common::vector;
use trajectory_simulator::integrator::{AdaptiveRk4, IntegrationError, RungeKutta4};
use trajectory_simulator::simulation::{
    EnvironmentConfig, InitialConditions, IntegrationMethod, ParameterMap, RunControl,
    SimulationError, Simulator, WindSettings,
};
use trajectory_simulator::wind::{WindConfig, WindField};

fn launch() -> InitialConditions {
    InitialConditions {
        x0: 0.0,
        y0: 0.0,
        vx0: 10.0,
        vy0: 10.0,
        mass: 1.0,
        cross_sectional_area: 0.1,
        time_step: 0.1,
        max_time: 2.0,
    }
}

fn still_air() -> EnvironmentConfig {
    EnvironmentConfig {
        air_density: 0.0,
        ..EnvironmentConfig::default()
    }
}

#[test]
fn drag_free_flight_matches_the_parabola() {
    let initial = InitialConditions {
        x0: 3.0,
        y0: 50.0,
        vx0: 12.0,
        vy0: 7.0,
        max_time: 4.0,
        ..launch()
    };
    let trajectory = Simulator::new(still_air())
        .run(&initial, &WindSettings::default(), None)
        .expect("vacuum run");

    for s in &trajectory {
        let t = s.time;
        assert!((s.x - (3.0 + 12.0 * t)).abs() < 1e-3, "x at t = {t}");
        assert!((s.y - (50.0 + 7.0 * t - 0.5 * 9.81 * t * t)).abs() < 1e-3, "y at t = {t}");
        assert!((s.vy - (7.0 - 9.81 * t)).abs() < 1e-3);
    }
}

#[test]
fn eastward_wind_carries_the_projectile_further() {
    let sim = Simulator::default();
    let calm = sim
        .run(&launch(), &WindSettings::default(), None)
        .expect("calm run");
    let east = sim
        .run(
            &launch(),
            &WindSettings {
                wind_speed: 5.0,
                wind_direction_deg: 90.0,
                altitude_variation: false,
            },
            None,
        )
        .expect("windy run");

    assert_eq!(calm.len(), east.len());
    assert!(east.last().expect("sample").x > calm.last().expect("sample").x);
}

#[test]
fn apex_rises_above_launch_and_the_end_falls_below_it() {
    let initial = InitialConditions {
        max_time: 10.0,
        ..launch()
    };
    let trajectory = Simulator::default()
        .run(&initial, &WindSettings::default(), None)
        .expect("run");
    let apex = trajectory.apex().expect("apex");
    assert!(apex.y > 0.0);
    assert!(trajectory.last().expect("sample").y < apex.y);
}

#[test]
fn sample_times_start_at_zero_and_increase() {
    let trajectory = Simulator::default()
        .run_parameters(
            &ParameterMap::new()
                .with(keys::X0, 0.0)
                .with(keys::Y0, 0.0)
                .with(keys::VX0, 10.0)
                .with(keys::VY0, 10.0)
                .with(keys::MASS, 1.0)
                .with(keys::CROSS_SECTIONAL_AREA, 0.1),
        )
        .expect("default grid run");

    let times = trajectory.times();
    assert_eq!(times.len(), (10.0_f64 / 0.1).ceil() as usize);
    assert_eq!(times[0], 0.0);
    assert!(times.windows(2).all(|w| w[1] > w[0]));
    assert!(*times.last().expect("time") < 10.0);
}

#[test]
fn altitude_variation_strengthens_wind_aloft() {
    let wind = WindField::new(WindConfig::from_degrees(5.0, 90.0, true));
    let ground = vector::norm(&wind.vector(0.0, 0.0));
    let aloft = vector::norm(&wind.vector(0.0, 1000.0));
    assert!(aloft > ground);
    assert!((aloft - 5.5).abs() < 1e-12);
}

#[rstest]
#[case(0.0, 0.0)]
#[case(1.3, 250.0)]
#[case(7.25, -40.0)]
fn wind_vector_is_pure(#[case] time: f64, #[case] altitude: f64) {
    let wind = WindField::new(WindConfig::from_degrees(8.0, 135.0, true));
    let first = wind.vector(time, altitude);
    let _ = wind.vector(time + 3.0, altitude * 2.0);
    assert_eq!(wind.vector(time, altitude), first);
}

#[rstest]
#[case(keys::MASS)]
#[case(keys::CROSS_SECTIONAL_AREA)]
fn zero_sized_projectile_is_rejected(#[case] key: &str) {
    let params = ParameterMap::new()
        .with(keys::X0, 0.0)
        .with(keys::Y0, 0.0)
        .with(keys::VX0, 10.0)
        .with(keys::VY0, 10.0)
        .with(keys::MASS, 1.0)
        .with(keys::CROSS_SECTIONAL_AREA, 0.1)
        .with(key, 0.0);
    match Simulator::default().run_parameters(&params) {
        Err(SimulationError::InvalidConfiguration { field, .. }) => assert_eq!(field, key),
        other => panic!("expected invalid configuration, got {other:?}"),
    }
}

#[test]
fn fixed_step_and_adaptive_methods_agree() {
    let wind = WindSettings {
        wind_speed: 6.0,
        wind_direction_deg: 300.0,
        altitude_variation: true,
    };
    let initial = InitialConditions {
        max_time: 4.0,
        ..launch()
    };
    let rk4 = Simulator::default()
        .with_method(IntegrationMethod::Rk4(RungeKutta4::new(32)))
        .run(&initial, &wind, None)
        .expect("rk4 run");
    let adaptive = Simulator::default()
        .with_method(IntegrationMethod::Adaptive(AdaptiveRk4::default()))
        .run(&initial, &wind, None)
        .expect("adaptive run");

    for (a, b) in rk4.iter().zip(&adaptive) {
        assert!((a.x - b.x).abs() < 1e-6 * a.x.abs().max(1.0));
        assert!((a.y - b.y).abs() < 1e-6 * a.y.abs().max(1.0));
    }
}

#[test]
fn expired_deadline_aborts_the_run() {
    let control = RunControl::default().with_deadline(Instant::now());
    let err = Simulator::default()
        .run_with_control(&launch(), &WindSettings::default(), None, &control)
        .expect_err("deadline should fire");
    assert!(matches!(
        err,
        SimulationError::Integration(IntegrationError::DeadlineExceeded { .. })
    ));
}

#[test]
fn independent_runs_share_a_simulator_across_threads() {
    let sim = Simulator::default();
    let serial = sim
        .run(&launch(), &WindSettings::default(), None)
        .expect("serial run");
    let parallel: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| sim.run(&launch(), &WindSettings::default(), None)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread").expect("threaded run"))
            .collect()
    });
    assert!(parallel.iter().all(|t| *t == serial));
}
