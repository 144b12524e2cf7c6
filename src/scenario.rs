//! Scenario input: the service catalog, the slot duration and the number of requests per slot.
//!
//! Scenarios are JSON documents of the following form:
//! ```json
//! {
//!   "services": [
//!     {"detection": {"replicas": 2, "cpu_cycles_per_deploy": 0.15,
//!                    "cpu_cycles_per_request": 0.002, "ram_req": 1.0, "input_size": 0.5}}
//!   ],
//!   "time_slot_interval": 0.1667,
//!   "n_requests": 100
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::core::service::{Service, ServiceCatalog};
use crate::error::ScenarioError;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServiceTemplate {
    pub replicas: usize,
    pub cpu_cycles_per_deploy: f64,
    pub cpu_cycles_per_request: f64,
    pub ram_req: f64,
    pub input_size: f64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScenarioFile {
    // Each entry holds exactly one service keyed by its id, list order is the catalog order.
    pub services: Vec<BTreeMap<String, ServiceTemplate>>,
    /// Slot duration in hours.
    pub time_slot_interval: f64,
    pub n_requests: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub catalog: ServiceCatalog,
    /// Slot duration in hours.
    pub time_slot_interval: f64,
    /// Requests drawn for every slot.
    pub n_requests: u64,
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        let file: ScenarioFile = serde_json::from_str(json)?;
        Self::from_file_format(file)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ScenarioError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validates the parsed document and expands every service into its replicas.
    pub fn from_file_format(file: ScenarioFile) -> Result<Self, ScenarioError> {
        if !file.time_slot_interval.is_finite() || file.time_slot_interval <= 0.0 {
            return Err(ScenarioError::Invalid(format!(
                "time_slot_interval must be positive, got {}",
                file.time_slot_interval
            )));
        }
        if file.services.is_empty() {
            return Err(ScenarioError::Invalid("no services defined".to_string()));
        }

        let mut names = HashSet::new();
        let mut services = Vec::with_capacity(file.services.len());
        for (idx, entry) in file.services.into_iter().enumerate() {
            if entry.len() != 1 {
                return Err(ScenarioError::Invalid(format!(
                    "service entry {} must hold exactly one service, got {}",
                    idx,
                    entry.len()
                )));
            }
            for (name, template) in entry {
                validate_service(&name, &template)?;
                if !names.insert(name.clone()) {
                    return Err(ScenarioError::Invalid(format!("duplicate service {:?}", name)));
                }
                services.push(Service::uniform(
                    &name,
                    template.replicas,
                    template.cpu_cycles_per_deploy,
                    template.cpu_cycles_per_request,
                    template.ram_req,
                    template.input_size,
                ));
            }
        }

        Ok(Self {
            catalog: ServiceCatalog::new(services),
            time_slot_interval: file.time_slot_interval,
            n_requests: file.n_requests,
        })
    }
}

fn validate_service(name: &str, template: &ServiceTemplate) -> Result<(), ScenarioError> {
    if template.replicas == 0 {
        return Err(ScenarioError::Invalid(format!(
            "service {:?} has no replicas",
            name
        )));
    }
    let attributes = [
        ("cpu_cycles_per_deploy", template.cpu_cycles_per_deploy),
        ("cpu_cycles_per_request", template.cpu_cycles_per_request),
        ("ram_req", template.ram_req),
        ("input_size", template.input_size),
    ];
    for (attribute, value) in attributes {
        if !value.is_finite() || value < 0.0 {
            return Err(ScenarioError::Invalid(format!(
                "service {:?} has invalid {}: {}",
                name, attribute, value
            )));
        }
    }
    Ok(())
}
