//! Synthetic per-slot workload: how many requests for each service arrive at each UAV.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::core::common::{ServiceId, UavId};

/// Request counts of the current slot indexed by `[uav][service]`.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct RequestTable {
    counts: Vec<Vec<u64>>,
}

impl RequestTable {
    pub fn zeros(uav_count: usize, service_count: usize) -> Self {
        Self {
            counts: vec![vec![0; service_count]; uav_count],
        }
    }

    pub fn from_rows(counts: Vec<Vec<u64>>) -> Self {
        Self { counts }
    }

    /// Request count of a (uav, service) pair, zero for pairs outside of the table.
    pub fn get(&self, uav: UavId, service: ServiceId) -> u64 {
        self.counts
            .get(uav)
            .and_then(|row| row.get(service))
            .copied()
            .unwrap_or(0)
    }

    pub fn increment(&mut self, uav: UavId, service: ServiceId) {
        self.counts[uav][service] += 1;
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn uav_count(&self) -> usize {
        self.counts.len()
    }
}

/// Spreads a fixed number of requests uniformly at random over all (uav, service) pairs.
pub struct RequestGenerator {
    rand: Pcg64,
}

impl RequestGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rand: Pcg64::seed_from_u64(seed),
        }
    }

    /// Returns a fresh table with `n_requests` requests, each one assigned to a uniformly drawn
    /// UAV and a uniformly drawn service.
    pub fn generate(&mut self, uav_count: usize, service_count: usize, n_requests: u64) -> RequestTable {
        let mut requests = RequestTable::zeros(uav_count, service_count);
        if uav_count == 0 || service_count == 0 {
            return requests;
        }
        for _ in 0..n_requests {
            let uav = self.rand.gen_range(0..uav_count);
            let service = self.rand.gen_range(0..service_count);
            requests.increment(uav, service);
        }
        requests
    }
}
