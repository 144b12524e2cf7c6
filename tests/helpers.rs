use std::rc::Rc;

use uav_fleet_endurance::config::SimulationConfig;
use uav_fleet_endurance::core::fleet::Fleet;
use uav_fleet_endurance::core::uav::Uav;
use uav_fleet_endurance::metrics::records::SlotRecord;
use uav_fleet_endurance::scenario::Scenario;
use uav_fleet_endurance::simulator::FleetSimulation;
use uav_fleet_endurance::test_util::helpers::default_test_simulation_config;

pub const IDLE_POWER: f64 = 1.5778 + 0.294 + 0.942 + 0.057 + 0.064;

/// One service with one replica which only costs `cpu_cycles_per_deploy` to host.
pub fn single_replica_scenario(
    cpu_cycles_per_deploy: f64,
    time_slot_interval: f64,
    n_requests: u64,
) -> Scenario {
    Scenario::from_json_str(&format!(
        r#"{{
            "services": [
                {{"s": {{"replicas": 1, "cpu_cycles_per_deploy": {},
                        "cpu_cycles_per_request": 0.001, "ram_req": 1.0, "input_size": 0.1}}}}
            ],
            "time_slot_interval": {},
            "n_requests": {}
        }}"#,
        cpu_cycles_per_deploy, time_slot_interval, n_requests
    ))
    .unwrap()
}

/// UAVs with the given (battery, ram capacity, cpu frequency).
pub fn fleet_of(uavs: &[(f64, f64, f64)]) -> Fleet {
    Fleet::new(
        uavs.iter()
            .enumerate()
            .map(|(idx, &(battery, ram, cpu))| Uav::new(format!("uav_{}", idx), battery, ram, cpu))
            .collect(),
    )
}

pub fn new_simulation(
    config: SimulationConfig,
    scenario: Scenario,
    fleet: Fleet,
) -> FleetSimulation {
    FleetSimulation::new(Rc::new(config), Rc::new(scenario), fleet).unwrap()
}

pub fn default_config() -> SimulationConfig {
    default_test_simulation_config(None)
}

pub fn records_of_slot(records: &[SlotRecord], slot: u64) -> Vec<&SlotRecord> {
    records.iter().filter(|record| record.slot == slot).collect()
}
