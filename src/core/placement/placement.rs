//! Placement decided by the solver for a single slot.

use std::collections::BTreeMap;

use crate::core::common::{ReplicaId, ServiceId, UavId};
use crate::core::power_model::DeploymentIndicator;
use crate::core::service::ServiceCatalog;

/// Assignment of every replica to the UAV hosting it. Only valid for the slot it was solved for.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Placement {
    assignments: BTreeMap<ReplicaId, UavId>,
}

impl Placement {
    pub fn new() -> Self {
        Self {
            assignments: Default::default(),
        }
    }

    pub fn assign(&mut self, replica: ReplicaId, uav: UavId) {
        self.assignments.insert(replica, uav);
    }

    pub fn host_of(&self, replica: ReplicaId) -> Option<UavId> {
        self.assignments.get(&replica).copied()
    }

    pub fn is_hosted_on(&self, uav: UavId, replica: ReplicaId) -> bool {
        self.host_of(replica) == Some(uav)
    }

    /// Replicas hosted by `uav` in catalog order.
    pub fn replicas_on(&self, uav: UavId) -> Vec<ReplicaId> {
        self.assignments
            .iter()
            .filter(|(_, &host)| host == uav)
            .map(|(&replica, _)| replica)
            .collect()
    }

    /// Whether at least one replica of `service` runs on `uav`.
    pub fn is_service_deployed(&self, uav: UavId, service: ServiceId) -> bool {
        self.assignments
            .iter()
            .any(|(replica, &host)| replica.service == service && host == uav)
    }

    pub fn ram_usage(&self, catalog: &ServiceCatalog, uav: UavId) -> f64 {
        self.replicas_on(uav)
            .into_iter()
            .map(|replica| catalog.instance(replica).ram_requirement)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl DeploymentIndicator<f64> for Placement {
    fn indicator(&self, uav: UavId, replica: ReplicaId) -> f64 {
        if self.is_hosted_on(uav, replica) {
            1.0
        } else {
            0.0
        }
    }

    fn service_indicator(&self, uav: UavId, service: ServiceId) -> f64 {
        if self.is_service_deployed(uav, service) {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::common::ReplicaId;
    use crate::core::power_model::DeploymentIndicator;
    use crate::core::service::{Service, ServiceCatalog};

    use super::Placement;

    #[test]
    fn test_placement_queries() {
        let catalog = ServiceCatalog::new(vec![
            Service::uniform("a", 2, 0.1, 0.01, 0.5, 1.0),
            Service::uniform("b", 1, 0.1, 0.01, 1.5, 1.0),
        ]);
        let mut placement = Placement::new();
        placement.assign(ReplicaId::new(0, 0), 0);
        placement.assign(ReplicaId::new(0, 1), 1);
        placement.assign(ReplicaId::new(1, 0), 1);

        assert_eq!(3, placement.len());
        assert_eq!(vec![ReplicaId::new(0, 0)], placement.replicas_on(0));
        assert!(placement.is_service_deployed(1, 1));
        assert!(!placement.is_service_deployed(0, 1));
        assert_eq!(2.0, placement.ram_usage(&catalog, 1));
        assert_eq!(1.0, placement.indicator(1, ReplicaId::new(0, 1)));
        assert_eq!(0.0, placement.indicator(0, ReplicaId::new(0, 1)));

        // two replicas of `a` on the same uav still count once
        placement.assign(ReplicaId::new(0, 0), 1);
        assert_eq!(1.0, placement.service_indicator(1, 0));
        assert_eq!(0.0, placement.service_indicator(0, 0));
    }
}
