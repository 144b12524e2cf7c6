use crate::config::SimulationConfig;
use crate::core::fleet::Fleet;
use crate::core::service::{Service, ServiceCatalog};
use crate::core::uav::Uav;
use crate::scenario::Scenario;

pub fn default_test_simulation_config(with_suffix: Option<&str>) -> SimulationConfig {
    let mut default = r#"
    sim_name: "test_uav_fleet"
    seed: 123
    battery_floor: 13.986
    fairness_lower_bound: 0.3
    fleet_sweep:
      min_fleet_size: 2
      max_fleet_size: 3
    "#
    .to_string();

    if let Some(suffix) = with_suffix {
        default.push_str(suffix);
    }

    serde_yaml::from_str::<SimulationConfig>(&default).unwrap()
}

/// Two services: `detection` with two replicas and `tracking` with one, ten-minute slots.
pub fn default_test_scenario() -> Scenario {
    Scenario {
        catalog: ServiceCatalog::new(vec![
            Service::uniform("detection", 2, 0.15, 0.002, 1.0, 0.05),
            Service::uniform("tracking", 1, 0.1, 0.001, 0.5, 0.02),
        ]),
        time_slot_interval: 1.0 / 6.0,
        n_requests: 20,
    }
}

/// `size` reference UAVs: 46.62 Wh, 4 GB of RAM, 1.5 GHz.
pub fn default_test_fleet(size: usize) -> Fleet {
    Fleet::homogeneous(&Uav::default(), size)
}
