//! Type definitions for microservices and their replicas

use serde::{Deserialize, Serialize};

use crate::core::common::{ReplicaId, ServiceId};

/// One deployable copy of a service with its resource demands.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServiceInstance {
    pub name: String,
    /// CPU cycles consumed just by having the replica deployed.
    pub cpu_cycles_per_deploy: f64,
    pub cpu_cycles_per_request: f64,
    /// RAM requirement in GB.
    pub ram_requirement: f64,
    /// Payload of a single request in Mb.
    pub input_size: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Service {
    pub name: String,
    pub replicas: Vec<ServiceInstance>,
}

impl Service {
    /// Builds a service whose `replica_count` replicas share the same demands.
    /// Replicas are named `<name>_<idx>`.
    pub fn uniform(
        name: &str,
        replica_count: usize,
        cpu_cycles_per_deploy: f64,
        cpu_cycles_per_request: f64,
        ram_requirement: f64,
        input_size: f64,
    ) -> Self {
        let replicas = (0..replica_count)
            .map(|idx| ServiceInstance {
                name: format!("{}_{}", name, idx),
                cpu_cycles_per_deploy,
                cpu_cycles_per_request,
                ram_requirement,
                input_size,
            })
            .collect();
        Self {
            name: name.to_string(),
            replicas,
        }
    }

    /// Payload size of the requests addressed to this service. Replicas of a service share
    /// it, the first replica is taken as representative.
    pub fn input_size(&self) -> f64 {
        self.replicas.first().map_or(0.0, |r| r.input_size)
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct ServiceCatalog {
    services: Vec<Service>,
}

impl ServiceCatalog {
    pub fn new(services: Vec<Service>) -> Self {
        Self { services }
    }

    pub fn service(&self, service: ServiceId) -> &Service {
        &self.services[service]
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    pub fn replica_count(&self) -> usize {
        self.services.iter().map(|s| s.replicas.len()).sum()
    }

    pub fn instance(&self, replica: ReplicaId) -> &ServiceInstance {
        &self.services[replica.service].replicas[replica.replica]
    }

    /// Iterates over all replicas of all services in catalog order.
    pub fn replicas(&self) -> impl Iterator<Item = (ReplicaId, &ServiceInstance)> + '_ {
        self.services
            .iter()
            .enumerate()
            .flat_map(|(service_id, service)| {
                service
                    .replicas
                    .iter()
                    .enumerate()
                    .map(move |(idx, instance)| (ReplicaId::new(service_id, idx), instance))
            })
    }

    /// Iterates over the replicas of one service.
    pub fn replicas_of(
        &self,
        service: ServiceId,
    ) -> impl Iterator<Item = (ReplicaId, &ServiceInstance)> + '_ {
        self.services[service]
            .replicas
            .iter()
            .enumerate()
            .map(move |(idx, instance)| (ReplicaId::new(service, idx), instance))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::common::ReplicaId;

    use super::{Service, ServiceCatalog};

    #[test]
    fn test_replicas_are_enumerated_in_catalog_order() {
        let catalog = ServiceCatalog::new(vec![
            Service::uniform("a", 2, 0.1, 0.01, 0.5, 1.0),
            Service::uniform("b", 1, 0.2, 0.02, 0.5, 2.0),
        ]);

        let replicas: Vec<(ReplicaId, String)> = catalog
            .replicas()
            .map(|(id, instance)| (id, instance.name.clone()))
            .collect();
        assert_eq!(
            replicas,
            vec![
                (ReplicaId::new(0, 0), "a_0".to_string()),
                (ReplicaId::new(0, 1), "a_1".to_string()),
                (ReplicaId::new(1, 0), "b_0".to_string()),
            ]
        );
        assert_eq!(3, catalog.replica_count());
        assert_eq!(2.0, catalog.service(1).input_size());
    }
}
