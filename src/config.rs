//! Config fields definitions for the uav fleet endurance simulation

use serde::Deserialize;

use crate::core::fleet::UavGroup;
use crate::core::placement::objective::{objective_policy, DEFAULT_OBJECTIVE};
use crate::core::power_model::PowerModel;
use crate::core::uav::Uav;
use crate::error::SimulationError;

use crate::metrics::printer::MetricsPrinterConfig;

fn default_battery_floor() -> f64 {
    // 30% of the reference 46.62 Wh pack
    13.986
}

fn default_fairness_lower_bound() -> f64 {
    0.3
}

fn default_objective() -> String {
    DEFAULT_OBJECTIVE.to_string()
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct SimulationConfig {
    pub sim_name: String,
    /// Seed of the workload generator, every run of a sweep starts from it.
    pub seed: u64,
    /// Wh a UAV must keep after every slot.
    #[serde(default = "default_battery_floor")]
    pub battery_floor: f64,
    #[serde(default = "default_fairness_lower_bound")]
    pub fairness_lower_bound: f64,
    /// Name of the objective policy, see `OBJECTIVE_REGISTRY`.
    #[serde(default = "default_objective")]
    pub objective: String,
    /// Stops a run after this many slots even if the fleet is not exhausted.
    pub max_slots: Option<u64>,
    #[serde(default)]
    pub power_model: PowerModel,
    #[serde(default)]
    pub fleet_sweep: FleetSweepConfig,
    /// Explicit fleet, simulated once instead of the sweep.
    pub fleet: Option<Vec<UavGroup>>,
    /// If not set default output of logs is stderr
    pub logs_filepath: Option<String>,
    pub metrics_printer: Option<MetricsPrinterConfig>,
    /// Directory for CSV reports of every run.
    pub slot_records_dir: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FleetSweepConfig {
    pub min_fleet_size: usize,
    // inclusive
    pub max_fleet_size: usize,
    pub uav_template: Uav,
}

impl Default for FleetSweepConfig {
    fn default() -> Self {
        Self {
            min_fleet_size: 10,
            max_fleet_size: 59,
            uav_template: Uav::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SimulationError> {
        let config = serde_yaml::from_str::<SimulationConfig>(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.battery_floor.is_finite() || self.battery_floor < 0.0 {
            return Err(SimulationError::InvalidConfig(format!(
                "battery_floor must be non-negative, got {}",
                self.battery_floor
            )));
        }
        if !self.fairness_lower_bound.is_finite() {
            return Err(SimulationError::InvalidConfig(format!(
                "fairness_lower_bound must be finite, got {}",
                self.fairness_lower_bound
            )));
        }
        if objective_policy(&self.objective).is_none() {
            return Err(SimulationError::InvalidConfig(format!(
                "unknown objective {:?}",
                self.objective
            )));
        }
        if self.fleet_sweep.min_fleet_size == 0
            || self.fleet_sweep.min_fleet_size > self.fleet_sweep.max_fleet_size
        {
            return Err(SimulationError::InvalidConfig(format!(
                "invalid fleet sweep range {}..={}",
                self.fleet_sweep.min_fleet_size, self.fleet_sweep.max_fleet_size
            )));
        }
        self.power_model
            .validate()
            .map_err(SimulationError::InvalidConfig)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::SimulationError;

    use super::SimulationConfig;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::from_yaml_str(
            r#"
    sim_name: "test"
    seed: 20
    "#,
        )
        .unwrap();
        assert_eq!(13.986, config.battery_floor);
        assert_eq!(0.3, config.fairness_lower_bound);
        assert_eq!("MaxMinBattery", config.objective);
        assert_eq!(10, config.fleet_sweep.min_fleet_size);
        assert_eq!(59, config.fleet_sweep.max_fleet_size);
        assert_eq!(46.62, config.fleet_sweep.uav_template.battery());
        assert_eq!(1.5778, config.power_model.p_idle);
        assert!(config.fleet.is_none());
    }

    #[test]
    fn test_partial_overrides() {
        let config = SimulationConfig::from_yaml_str(
            r#"
    sim_name: "test"
    seed: 1
    objective: MaxMeanBattery
    power_model:
      p_idle: 2.0
    fleet_sweep:
      min_fleet_size: 2
      max_fleet_size: 4
    fleet:
    - uav_count: 3
      uav_template:
        spec:
          ram_capacity: 8.0
          cpu_frequency: 2.0
        status:
          battery: 50.0
    "#,
        )
        .unwrap();
        assert_eq!(2.0, config.power_model.p_idle);
        assert_eq!(0.294, config.power_model.p_eth_idle);
        assert_eq!(2, config.fleet_sweep.min_fleet_size);
        assert_eq!(1.5, config.fleet_sweep.uav_template.spec.cpu_frequency);
        let groups = config.fleet.unwrap();
        assert_eq!(Some(3), groups[0].uav_count);
        assert_eq!(50.0, groups[0].uav_template.battery());
    }

    #[test]
    fn test_unknown_objective_is_rejected() {
        let err = SimulationConfig::from_yaml_str(
            r#"
    sim_name: "test"
    seed: 1
    objective: MinEnergy
    "#,
        )
        .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfig(_)));
    }

    #[test]
    fn test_negative_power_coefficient_is_rejected() {
        let err = SimulationConfig::from_yaml_str(
            r#"
    sim_name: "test"
    seed: 1
    power_model:
      cpu_coefficient: -0.1
    "#,
        )
        .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfig(_)));
    }
}
