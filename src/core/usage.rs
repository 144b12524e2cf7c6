//! Resource usage of a UAV realized by a solved placement.

use crate::core::common::UavId;
use crate::core::placement::placement::Placement;
use crate::core::power_model::{
    cpu_utilization, downlink_data_rate, uplink_data_rate, PowerModel,
};
use crate::core::service::ServiceCatalog;
use crate::core::uav::Uav;
use crate::core::workload::RequestTable;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UavUsage {
    /// Fraction of the CPU budget, 1.0 means fully used.
    pub cpu_utilization: f64,
    /// Mbps forwarded to other UAVs.
    pub uplink_data_rate: f64,
    /// Mbps received.
    pub downlink_data_rate: f64,
    /// Wh drawn during the slot.
    pub energy: f64,
    /// GB of RAM taken by the hosted replicas.
    pub ram_usage: f64,
}

impl UavUsage {
    pub fn evaluate(
        power_model: &PowerModel,
        catalog: &ServiceCatalog,
        uav_id: UavId,
        uav: &Uav,
        requests: &RequestTable,
        placement: &Placement,
        time_slot_interval: f64,
    ) -> Self {
        let cpu_utilization: f64 = cpu_utilization(catalog, uav_id, uav, requests, placement);
        let uplink_data_rate: f64 = uplink_data_rate(catalog, uav_id, requests, placement);
        let downlink_data_rate: f64 = downlink_data_rate(catalog, uav_id, requests);
        let energy = power_model.energy(
            cpu_utilization,
            uplink_data_rate,
            downlink_data_rate,
            time_slot_interval,
        );
        Self {
            cpu_utilization,
            uplink_data_rate,
            downlink_data_rate,
            energy,
            ram_usage: placement.ram_usage(catalog, uav_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::core::common::ReplicaId;
    use crate::core::placement::placement::Placement;
    use crate::core::power_model::PowerModel;
    use crate::core::service::{Service, ServiceCatalog};
    use crate::core::uav::Uav;
    use crate::core::workload::RequestTable;

    use super::UavUsage;

    #[test]
    fn test_usage_of_hosting_and_forwarding_uavs() {
        let model = PowerModel::default();
        let catalog = ServiceCatalog::new(vec![Service::uniform("s", 1, 0.3, 0.01, 1.0, 0.5)]);
        let uav = Uav::new("uav".to_string(), 40.0, 4.0, 1.5);
        let requests = RequestTable::from_rows(vec![vec![4], vec![6]]);
        let mut placement = Placement::new();
        placement.assign(ReplicaId::new(0, 0), 1);

        let forwarding = UavUsage::evaluate(&model, &catalog, 0, &uav, &requests, &placement, 0.5);
        assert_eq!(0.0, forwarding.cpu_utilization);
        assert_abs_diff_eq!(2.0, forwarding.uplink_data_rate);
        assert_abs_diff_eq!(2.0, forwarding.downlink_data_rate);
        assert_eq!(0.0, forwarding.ram_usage);
        assert_abs_diff_eq!(
            0.5 * (2.9348 + 4.813e-3 * 2.0 * 2.0),
            forwarding.energy,
            epsilon = 1e-9
        );

        let hosting = UavUsage::evaluate(&model, &catalog, 1, &uav, &requests, &placement, 0.5);
        assert_abs_diff_eq!((0.3 + 0.01 * 6.0) / 1.5, hosting.cpu_utilization, epsilon = 1e-12);
        assert_eq!(0.0, hosting.uplink_data_rate);
        assert_abs_diff_eq!(3.0, hosting.downlink_data_rate);
        assert_eq!(1.0, hosting.ram_usage);
    }
}
