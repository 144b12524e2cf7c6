use serde::{Deserialize, Serialize};

/// Position of a UAV in its fleet.
pub type UavId = usize;

/// Position of a service in the service catalog.
pub type ServiceId = usize;

/// Identifies one deployable copy of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReplicaId {
    pub service: ServiceId,
    // Index of the replica inside its service.
    pub replica: usize,
}

impl ReplicaId {
    pub fn new(service: ServiceId, replica: usize) -> Self {
        Self { service, replica }
    }
}
