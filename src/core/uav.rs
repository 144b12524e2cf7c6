//! Type definitions for UAV specification and state used by the fleet and the placement model

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct UavMetadata {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct UavSpec {
    // Total RAM in GB.
    pub ram_capacity: f64,
    // CPU clock budget, same unit as the services' cpu cycles.
    pub cpu_frequency: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct UavStatus {
    // Remaining battery in Wh. Only decreases during a run.
    pub battery: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Uav {
    #[serde(default)]
    pub metadata: UavMetadata,
    pub spec: UavSpec,
    pub status: UavStatus,
}

impl Uav {
    pub fn new(name: String, battery: f64, ram_capacity: f64, cpu_frequency: f64) -> Self {
        Self {
            metadata: UavMetadata { name },
            spec: UavSpec {
                ram_capacity,
                cpu_frequency,
            },
            status: UavStatus { battery },
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn battery(&self) -> f64 {
        self.status.battery
    }

    /// Applies the energy drawn during one slot.
    pub fn discharge(&mut self, energy: f64) {
        self.status.battery -= energy;
    }
}

/// Raspberry Pi 4 carried by the reference UAV: 46.62 Wh pack, 4 GB of RAM, 1.5 GHz.
impl Default for Uav {
    fn default() -> Self {
        Self::new(String::new(), 46.62, 4.0, 1.5)
    }
}
