mod helpers;

use uav_fleet_endurance::core::placement::solver::SolverEnvironment;
use uav_fleet_endurance::test_util::helpers::{
    default_test_fleet, default_test_scenario, default_test_simulation_config,
};

use helpers::new_simulation;

#[test]
fn test_same_seed_gives_same_run() {
    let solver = SolverEnvironment::start();
    let run = || {
        let mut sim = new_simulation(
            default_test_simulation_config(None),
            default_test_scenario(),
            default_test_fleet(3),
        );
        let summary = sim.run(&solver).unwrap();
        (summary, sim.into_records())
    };

    let (first_summary, first_records) = run();
    let (second_summary, second_records) = run();
    assert_eq!(first_summary, second_summary);
    assert_eq!(first_records, second_records);
}

#[test]
fn test_initial_workload_follows_seed() {
    let first = new_simulation(
        default_test_simulation_config(None),
        default_test_scenario(),
        default_test_fleet(4),
    );
    let second = new_simulation(
        default_test_simulation_config(None),
        default_test_scenario(),
        default_test_fleet(4),
    );
    assert_eq!(first.requests(), second.requests());

    let mut config = default_test_simulation_config(None);
    config.seed = 7;
    let third = new_simulation(config, default_test_scenario(), default_test_fleet(4));
    assert_eq!(first.requests().total(), third.requests().total());
}
