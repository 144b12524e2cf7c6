//! Instantaneous power consumption model of the compute board carried by a UAV.
//!
//! The board is a Raspberry Pi 4 which only uses its WiFi interface, the Ethernet interface is
//! assumed idle. Coefficients follow "PowerPi: Measuring and Modeling the Power Consumption of
//! the Raspberry Pi" by Kaup et al.
//!
//! Every function is linear in its inputs so it can be embedded into the placement MILP. The
//! functions are generic over [`LinearTerm`]: fed with solver expressions they return solver
//! expressions, fed with `f64` they return the realized value.

use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

use good_lp::{Expression, IntoAffineExpression};
use serde::Deserialize;

use crate::core::common::{ReplicaId, ServiceId, UavId};
use crate::core::service::ServiceCatalog;
use crate::core::uav::Uav;
use crate::core::workload::RequestTable;

/// Value which is linear in the placement decisions.
pub trait LinearTerm:
    Clone
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
    + Sum<Self>
{
    fn constant(value: f64) -> Self;
}

impl LinearTerm for f64 {
    fn constant(value: f64) -> Self {
        value
    }
}

impl LinearTerm for Expression {
    fn constant(value: f64) -> Self {
        value.into_expression()
    }
}

/// Source of the 0/1 indicator "replica is deployed on uav". Implemented by the solver
/// variables while building a model and by a solved placement afterwards.
pub trait DeploymentIndicator<T: LinearTerm> {
    fn indicator(&self, uav: UavId, replica: ReplicaId) -> T;

    /// "At least one replica of service is deployed on uav", kept within [0, 1] however many
    /// replicas of the service share the UAV.
    fn service_indicator(&self, uav: UavId, service: ServiceId) -> T;
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PowerModel {
    /// Power of an idle board in W.
    pub p_idle: f64,
    /// Power of the idle Ethernet interface in W.
    pub p_eth_idle: f64,
    /// Power of the idle WiFi interface in W.
    pub p_wifi_idle: f64,
    /// W per unit of CPU utilization.
    pub cpu_coefficient: f64,
    pub wifi_down_offset: f64,
    /// W per Mbps received.
    pub wifi_down_coefficient: f64,
    pub wifi_up_offset: f64,
    /// W per Mbps sent.
    pub wifi_up_coefficient: f64,
}

impl Default for PowerModel {
    fn default() -> Self {
        Self {
            p_idle: 1.5778,
            p_eth_idle: 0.294,
            p_wifi_idle: 0.942,
            cpu_coefficient: 0.181,
            wifi_down_offset: 0.057,
            wifi_down_coefficient: 4.813e-3,
            wifi_up_offset: 0.064,
            wifi_up_coefficient: 4.813e-3,
        }
    }
}

impl PowerModel {
    /// Checks that the model is non-negative and strictly increasing in every load input.
    pub fn validate(&self) -> Result<(), String> {
        let constants = [
            ("p_idle", self.p_idle),
            ("p_eth_idle", self.p_eth_idle),
            ("p_wifi_idle", self.p_wifi_idle),
            ("wifi_down_offset", self.wifi_down_offset),
            ("wifi_up_offset", self.wifi_up_offset),
        ];
        for (name, value) in constants {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be finite and non-negative, got {}", name, value));
            }
        }
        let coefficients = [
            ("cpu_coefficient", self.cpu_coefficient),
            ("wifi_down_coefficient", self.wifi_down_coefficient),
            ("wifi_up_coefficient", self.wifi_up_coefficient),
        ];
        for (name, value) in coefficients {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be finite and positive, got {}", name, value));
            }
        }
        Ok(())
    }

    pub fn p_idle(&self) -> f64 {
        self.p_idle
    }

    pub fn p_eth_idle(&self) -> f64 {
        self.p_eth_idle
    }

    pub fn p_wifi_idle(&self) -> f64 {
        self.p_wifi_idle
    }

    pub fn p_cpu<T: LinearTerm>(&self, cpu_utilization: T) -> T {
        cpu_utilization * self.cpu_coefficient
    }

    pub fn p_wifi_down<T: LinearTerm>(&self, downlink_data_rate: T) -> T {
        T::constant(self.wifi_down_offset) + downlink_data_rate * self.wifi_down_coefficient
    }

    pub fn p_wifi_up<T: LinearTerm>(&self, uplink_data_rate: T) -> T {
        T::constant(self.wifi_up_offset) + uplink_data_rate * self.wifi_up_coefficient
    }

    /// Energy in Wh drawn during a slot of `time_slot_interval` hours.
    pub fn energy<T: LinearTerm>(
        &self,
        cpu_utilization: T,
        uplink_data_rate: T,
        downlink_data_rate: T,
        time_slot_interval: f64,
    ) -> T {
        (T::constant(self.p_idle() + self.p_eth_idle() + self.p_wifi_idle())
            + self.p_cpu(cpu_utilization)
            + self.p_wifi_down(downlink_data_rate)
            + self.p_wifi_up(uplink_data_rate))
            * time_slot_interval
    }

    /// Energy drawn in a slot by a UAV with no load at all.
    pub fn idle_energy(&self, time_slot_interval: f64) -> f64 {
        self.energy(0.0, 0.0, 0.0, time_slot_interval)
    }
}

/// CPU utilization of `uav`: deploy and per-request cycles of every replica placed on it,
/// divided by the UAV's CPU budget.
pub fn cpu_utilization<T, D>(
    catalog: &ServiceCatalog,
    uav_id: UavId,
    uav: &Uav,
    requests: &RequestTable,
    deployment: &D,
) -> T
where
    T: LinearTerm,
    D: DeploymentIndicator<T>,
{
    let cycles: T = catalog
        .replicas()
        .map(|(replica, instance)| {
            let demand = instance.cpu_cycles_per_deploy
                + instance.cpu_cycles_per_request
                    * requests.get(uav_id, replica.service) as f64;
            deployment.indicator(uav_id, replica) * demand
        })
        .sum();
    cycles * (1.0 / uav.spec.cpu_frequency)
}

/// Downlink data rate of `uav`. All requests addressed to the UAV arrive through its radio
/// wherever they are served, so this does not depend on the placement.
pub fn downlink_data_rate<T: LinearTerm>(
    catalog: &ServiceCatalog,
    uav_id: UavId,
    requests: &RequestTable,
) -> T {
    let rate: f64 = (0..catalog.service_count())
        .map(|service| catalog.service(service).input_size() * requests.get(uav_id, service) as f64)
        .sum();
    T::constant(rate)
}

/// Whether `service` runs on `uav`, capped at 1.
pub fn is_deployed<T, D>(uav_id: UavId, service: ServiceId, deployment: &D) -> T
where
    T: LinearTerm,
    D: DeploymentIndicator<T>,
{
    deployment.service_indicator(uav_id, service)
}

/// Uplink data rate of `uav`. Requests for a service which is not deployed on the UAV have to be
/// forwarded to another UAV.
pub fn uplink_data_rate<T, D>(
    catalog: &ServiceCatalog,
    uav_id: UavId,
    requests: &RequestTable,
    deployment: &D,
) -> T
where
    T: LinearTerm,
    D: DeploymentIndicator<T>,
{
    (0..catalog.service_count())
        .map(|service| {
            let traffic =
                catalog.service(service).input_size() * requests.get(uav_id, service) as f64;
            (T::constant(1.0) - is_deployed(uav_id, service, deployment)) * traffic
        })
        .sum()
}

/// Energy drawn by `uav` during a slot for the given deployment.
pub fn energy_consumption<T, D>(
    power_model: &PowerModel,
    catalog: &ServiceCatalog,
    uav_id: UavId,
    uav: &Uav,
    requests: &RequestTable,
    deployment: &D,
    time_slot_interval: f64,
) -> T
where
    T: LinearTerm,
    D: DeploymentIndicator<T>,
{
    power_model.energy(
        cpu_utilization(catalog, uav_id, uav, requests, deployment),
        uplink_data_rate(catalog, uav_id, requests, deployment),
        downlink_data_rate(catalog, uav_id, requests),
        time_slot_interval,
    )
}
