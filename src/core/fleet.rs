//! Fleet of UAVs owned by one simulation run.

use std::collections::HashSet;

use serde::Deserialize;

use crate::core::common::UavId;
use crate::core::uav::Uav;

#[derive(Clone, Default, Debug, Deserialize, PartialEq)]
pub struct UavGroup {
    // If uav count is not none and template has a name, then it's taken as a prefix of all uavs
    // in a group.
    // If uav count is none or 1 and template has a name, then it's a single uav named as the
    // template.
    // If template has got no name, then prefix uav(_<idx>)? is used.
    pub uav_count: Option<u64>,
    pub uav_template: Uav,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fleet {
    uavs: Vec<Uav>,
}

impl Fleet {
    pub fn new(uavs: Vec<Uav>) -> Self {
        Self { uavs }
    }

    /// `size` copies of `template` named `uav_<idx>`.
    pub fn homogeneous(template: &Uav, size: usize) -> Self {
        let uavs = (0..size)
            .map(|idx| {
                let mut uav = template.clone();
                uav.metadata.name = format!("uav_{}", idx);
                uav
            })
            .collect();
        Self { uavs }
    }

    pub fn from_groups(groups: &[UavGroup]) -> Self {
        let mut uavs = vec![];
        let mut total_uavs = 0;
        for group in groups {
            let name_prefix: &str;
            let uav_count_in_group = group.uav_count.unwrap_or(1);
            let template_name = group.uav_template.name();

            if uav_count_in_group == 1 && !template_name.is_empty() {
                // use name as-is without suffix
                uavs.push(group.uav_template.clone());
                total_uavs += 1;
                continue;
            } else if !template_name.is_empty() {
                name_prefix = template_name;
            } else {
                name_prefix = "uav";
            }

            for _ in 0..uav_count_in_group {
                let mut uav = group.uav_template.clone();
                uav.metadata.name = format!("{}_{}", name_prefix, total_uavs);
                uavs.push(uav);
                total_uavs += 1;
            }
        }
        Self { uavs }
    }

    /// Rejects fleets the placement model cannot be built for.
    pub fn validate(&self) -> Result<(), String> {
        if self.uavs.is_empty() {
            return Err("fleet has no uavs".to_string());
        }
        let mut names = HashSet::new();
        for uav in self.uavs.iter() {
            if !names.insert(uav.name()) {
                return Err(format!("duplicate uav name {:?}", uav.name()));
            }
            if !uav.status.battery.is_finite() || uav.status.battery < 0.0 {
                return Err(format!(
                    "uav {:?} has invalid battery {}",
                    uav.name(),
                    uav.status.battery
                ));
            }
            if !uav.spec.ram_capacity.is_finite() || uav.spec.ram_capacity < 0.0 {
                return Err(format!(
                    "uav {:?} has invalid ram capacity {}",
                    uav.name(),
                    uav.spec.ram_capacity
                ));
            }
            if !uav.spec.cpu_frequency.is_finite() || uav.spec.cpu_frequency <= 0.0 {
                return Err(format!(
                    "uav {:?} has invalid cpu frequency {}",
                    uav.name(),
                    uav.spec.cpu_frequency
                ));
            }
        }
        Ok(())
    }

    pub fn uavs(&self) -> &[Uav] {
        &self.uavs
    }

    pub fn uav(&self, uav: UavId) -> &Uav {
        &self.uavs[uav]
    }

    pub fn uav_mut(&mut self, uav: UavId) -> &mut Uav {
        &mut self.uavs[uav]
    }

    pub fn iter(&self) -> impl Iterator<Item = (UavId, &Uav)> + '_ {
        self.uavs.iter().enumerate()
    }

    pub fn size(&self) -> usize {
        self.uavs.len()
    }

    pub fn max_battery(&self) -> f64 {
        self.uavs
            .iter()
            .map(|uav| uav.battery())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min_battery(&self) -> f64 {
        self.uavs
            .iter()
            .map(|uav| uav.battery())
            .fold(f64::INFINITY, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::uav::Uav;

    use super::{Fleet, UavGroup};

    #[test]
    fn test_homogeneous_fleet_names() {
        let fleet = Fleet::homogeneous(&Uav::default(), 3);
        let names: Vec<&str> = fleet.uavs().iter().map(|uav| uav.name()).collect();
        assert_eq!(vec!["uav_0", "uav_1", "uav_2"], names);
        assert_eq!(46.62, fleet.max_battery());
    }

    #[test]
    fn test_fleet_from_groups() {
        let mut scout = Uav::new("scout".to_string(), 30.0, 2.0, 1.0);
        let groups = vec![
            UavGroup {
                uav_count: None,
                uav_template: scout.clone(),
            },
            UavGroup {
                uav_count: Some(2),
                uav_template: Uav::default(),
            },
        ];
        let fleet = Fleet::from_groups(&groups);
        let names: Vec<&str> = fleet.uavs().iter().map(|uav| uav.name()).collect();
        assert_eq!(vec!["scout", "uav_1", "uav_2"], names);
        assert_eq!(30.0, fleet.min_battery());

        scout.metadata.name = "carrier".to_string();
        let fleet = Fleet::from_groups(&[UavGroup {
            uav_count: Some(2),
            uav_template: scout,
        }]);
        let names: Vec<&str> = fleet.uavs().iter().map(|uav| uav.name()).collect();
        assert_eq!(vec!["carrier_0", "carrier_1"], names);
    }

    #[test]
    fn test_validation_rejects_bad_fleets() {
        assert!(Fleet::new(vec![]).validate().is_err());
        assert!(Fleet::new(vec![Uav::new("a".to_string(), -1.0, 4.0, 1.5)])
            .validate()
            .is_err());
        assert!(Fleet::new(vec![Uav::new("a".to_string(), 40.0, 4.0, 0.0)])
            .validate()
            .is_err());
        assert!(Fleet::new(vec![
            Uav::new("a".to_string(), 40.0, 4.0, 1.5),
            Uav::new("a".to_string(), 40.0, 4.0, 1.5)
        ])
        .validate()
        .is_err());
        assert!(Fleet::homogeneous(&Uav::default(), 2).validate().is_ok());
    }
}
