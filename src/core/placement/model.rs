//! Mixed-integer linear program deciding where every service replica runs during one slot.
//!
//! A model is built from scratch for every slot and dropped once solved: constraints depend on
//! the battery levels and on the workload of that slot only.

use std::collections::BTreeMap;

use good_lp::{
    constraint, variable, Constraint, Expression, IntoAffineExpression, ProblemVariables,
    Solution, Variable,
};

use crate::core::common::{ReplicaId, ServiceId, UavId};
use crate::core::fleet::Fleet;
use crate::core::placement::objective::{ObjectiveContext, ObjectivePolicy};
use crate::core::placement::placement::Placement;
use crate::core::power_model::{
    cpu_utilization, energy_consumption, DeploymentIndicator, LinearTerm, PowerModel,
};
use crate::core::service::ServiceCatalog;
use crate::core::workload::RequestTable;
use crate::error::PlacementError;

/// Everything a slot model is built from. Borrowed from the simulation for the build only.
pub struct SlotInput<'a> {
    pub fleet: &'a Fleet,
    pub catalog: &'a ServiceCatalog,
    pub requests: &'a RequestTable,
    pub power_model: &'a PowerModel,
    /// Slot duration in hours.
    pub time_slot_interval: f64,
    /// Wh every UAV must keep after the slot.
    pub battery_floor: f64,
    pub fairness_lower_bound: f64,
    pub objective: &'a dyn ObjectivePolicy,
}

/// Binary decision variable of every (uav, replica) pair, plus a continuous [0, 1] variable of
/// every (uav, service) pair bounded by the replicas of the service placed on the UAV.
pub struct PlacementVariables {
    variables: BTreeMap<(UavId, ReplicaId), Variable>,
    services: BTreeMap<(UavId, ServiceId), Variable>,
}

impl PlacementVariables {
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn variable(&self, uav: UavId, replica: ReplicaId) -> Option<Variable> {
        self.variables.get(&(uav, replica)).copied()
    }

    /// Reads the solved values back into a placement. Fails if some replica is not deployed
    /// exactly once, which a correct solver never reports as optimal.
    pub fn extract<S: Solution>(&self, solution: &S) -> Result<Placement, PlacementError> {
        let mut hosts: BTreeMap<ReplicaId, Vec<UavId>> = BTreeMap::new();
        for (&(uav, replica), &var) in self.variables.iter() {
            let entry = hosts.entry(replica).or_default();
            if solution.value(var) > 0.5 {
                entry.push(uav);
            }
        }

        let mut placement = Placement::new();
        for (replica, uavs) in hosts {
            if uavs.len() != 1 {
                return Err(PlacementError::InconsistentSolution {
                    replica,
                    count: uavs.len(),
                });
            }
            placement.assign(replica, uavs[0]);
        }
        Ok(placement)
    }
}

impl DeploymentIndicator<Expression> for PlacementVariables {
    fn indicator(&self, uav: UavId, replica: ReplicaId) -> Expression {
        match self.variable(uav, replica) {
            Some(var) => var.into_expression(),
            None => <Expression as LinearTerm>::constant(0.0),
        }
    }

    fn service_indicator(&self, uav: UavId, service: ServiceId) -> Expression {
        match self.services.get(&(uav, service)) {
            Some(var) => var.into_expression(),
            None => <Expression as LinearTerm>::constant(0.0),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ModelStats {
    pub placement_variables: usize,
    pub service_indicators: usize,
    pub coverage_constraints: usize,
    pub service_indicator_constraints: usize,
    pub memory_constraints: usize,
    pub cpu_constraints: usize,
    pub battery_floor_constraints: usize,
    pub fairness_constraints: usize,
}

impl ModelStats {
    pub fn constraint_count(&self) -> usize {
        self.coverage_constraints
            + self.service_indicator_constraints
            + self.memory_constraints
            + self.cpu_constraints
            + self.battery_floor_constraints
            + self.fairness_constraints
    }
}

/// A fully built slot model ready to be handed to a solver.
pub struct PlacementProblem {
    pub variables: ProblemVariables,
    pub placement: PlacementVariables,
    pub fairness: Variable,
    pub constraints: Vec<Constraint>,
    pub objective: Expression,
    pub stats: ModelStats,
}

impl PlacementProblem {
    pub fn build(input: &SlotInput) -> Self {
        let mut variables = ProblemVariables::new();

        let mut placement_vars = BTreeMap::new();
        for (uav, _) in input.fleet.iter() {
            for (replica, _) in input.catalog.replicas() {
                placement_vars.insert((uav, replica), variables.add(variable().binary()));
            }
        }
        let mut service_vars = BTreeMap::new();
        for (uav, _) in input.fleet.iter() {
            for service in 0..input.catalog.service_count() {
                service_vars.insert((uav, service), variables.add(variable().min(0.0).max(1.0)));
            }
        }
        let placement = PlacementVariables {
            variables: placement_vars,
            services: service_vars,
        };

        // z is a minimum over post-slot batteries so it never exceeds the highest current battery.
        // The upper bound is kept at least at the lower bound, infeasibility then comes from the
        // fairness constraints.
        let lower = input.fairness_lower_bound;
        let upper = input.fleet.max_battery().max(lower);
        let fairness = variables.add(variable().min(lower).max(upper));

        let mut problem = PlacementProblem {
            variables,
            stats: ModelStats {
                placement_variables: placement.len(),
                service_indicators: placement.services.len(),
                ..Default::default()
            },
            placement,
            fairness,
            constraints: vec![],
            objective: <Expression as LinearTerm>::constant(0.0),
        };

        problem.add_coverage_constraints(input);
        problem.add_service_indicator_constraints(input);
        problem.add_memory_constraints(input);
        problem.add_cpu_constraints(input);
        let projected_batteries = problem.add_battery_constraints(input);
        problem.objective = input.objective.objective(&ObjectiveContext {
            fairness,
            projected_batteries: &projected_batteries,
        });
        problem
    }

    /// Every replica is deployed on exactly one UAV.
    fn add_coverage_constraints(&mut self, input: &SlotInput) {
        for (replica, _) in input.catalog.replicas() {
            let deployments: Expression = input
                .fleet
                .iter()
                .map(|(uav, _)| self.placement.indicator(uav, replica))
                .sum();
            self.constraints.push(constraint!(deployments == 1.0));
            self.stats.coverage_constraints += 1;
        }
    }

    /// The service indicator of a UAV is 0 unless a replica of the service is deployed on it.
    fn add_service_indicator_constraints(&mut self, input: &SlotInput) {
        for (uav, _) in input.fleet.iter() {
            for service in 0..input.catalog.service_count() {
                let replicas: Expression = input
                    .catalog
                    .replicas_of(service)
                    .map(|(replica, _)| self.placement.indicator(uav, replica))
                    .sum();
                let deployed = self.placement.service_indicator(uav, service);
                self.constraints.push(constraint!(deployed <= replicas));
                self.stats.service_indicator_constraints += 1;
            }
        }
    }

    /// RAM of the replicas deployed on a UAV fits its capacity.
    fn add_memory_constraints(&mut self, input: &SlotInput) {
        for (uav_id, uav) in input.fleet.iter() {
            let ram_usage: Expression = input
                .catalog
                .replicas()
                .map(|(replica, instance)| {
                    self.placement.indicator(uav_id, replica) * instance.ram_requirement
                })
                .sum();
            self.constraints
                .push(constraint!(ram_usage <= uav.spec.ram_capacity));
            self.stats.memory_constraints += 1;
        }
    }

    /// CPU utilization of a UAV stays within its budget.
    fn add_cpu_constraints(&mut self, input: &SlotInput) {
        for (uav_id, uav) in input.fleet.iter() {
            let utilization: Expression = cpu_utilization(
                input.catalog,
                uav_id,
                uav,
                input.requests,
                &self.placement,
            );
            self.constraints.push(constraint!(utilization <= 1.0));
            self.stats.cpu_constraints += 1;
        }
    }

    /// Keeps every UAV above the battery floor and links the fairness variable to the lowest
    /// post-slot battery. Returns the projected post-slot battery of every UAV.
    fn add_battery_constraints(&mut self, input: &SlotInput) -> Vec<Expression> {
        let mut projected_batteries = Vec::with_capacity(input.fleet.size());
        for (uav_id, uav) in input.fleet.iter() {
            let energy: Expression = energy_consumption(
                input.power_model,
                input.catalog,
                uav_id,
                uav,
                input.requests,
                &self.placement,
                input.time_slot_interval,
            );
            let projected = <Expression as LinearTerm>::constant(uav.battery()) - energy;

            self.constraints
                .push(constraint!(projected.clone() >= input.battery_floor));
            self.stats.battery_floor_constraints += 1;

            self.constraints
                .push(constraint!(projected.clone() >= self.fairness));
            self.stats.fairness_constraints += 1;

            projected_batteries.push(projected);
        }
        projected_batteries
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use good_lp::Variable;

    use crate::core::common::ReplicaId;
    use crate::core::placement::model::PlacementProblem;
    use crate::core::placement::objective::objective_policy;
    use crate::error::PlacementError;
    use crate::test_util::helpers::{default_test_fleet, default_test_scenario};

    use super::{PlacementVariables, SlotInput};

    /// Solved values with `hosts` set to 1 and every other placement variable set to 0.
    fn solution_with(
        placement: &PlacementVariables,
        uavs: usize,
        replicas: &[ReplicaId],
        hosts: &[(usize, ReplicaId)],
    ) -> HashMap<Variable, f64> {
        let mut values = HashMap::new();
        for uav in 0..uavs {
            for &replica in replicas {
                let value = if hosts.contains(&(uav, replica)) { 1.0 } else { 0.0 };
                values.insert(placement.variable(uav, replica).unwrap(), value);
            }
        }
        values
    }

    #[test]
    fn test_extract_requires_exactly_one_host() {
        let scenario = default_test_scenario();
        let fleet = default_test_fleet(2);
        let requests = crate::core::workload::RequestTable::zeros(2, 2);
        let power_model = Default::default();
        let problem = PlacementProblem::build(&SlotInput {
            fleet: &fleet,
            catalog: &scenario.catalog,
            requests: &requests,
            power_model: &power_model,
            time_slot_interval: scenario.time_slot_interval,
            battery_floor: 13.986,
            fairness_lower_bound: 0.3,
            objective: objective_policy("MaxMinBattery").unwrap(),
        });
        let replicas: Vec<ReplicaId> = scenario.catalog.replicas().map(|(id, _)| id).collect();
        let (first, second, third) = (replicas[0], replicas[1], replicas[2]);

        // first replica placed twice, second one nowhere
        let doubled = solution_with(
            &problem.placement,
            2,
            &replicas,
            &[(0, first), (1, first), (1, third)],
        );
        match problem.placement.extract(&doubled) {
            Err(PlacementError::InconsistentSolution { replica, count }) => {
                assert_eq!(first, replica);
                assert_eq!(2, count);
            }
            other => panic!("unexpected extraction result {:?}", other),
        }

        let missing = solution_with(&problem.placement, 2, &replicas, &[(0, first), (1, third)]);
        match problem.placement.extract(&missing) {
            Err(PlacementError::InconsistentSolution { replica, count }) => {
                assert_eq!(second, replica);
                assert_eq!(0, count);
            }
            other => panic!("unexpected extraction result {:?}", other),
        }

        let valid = solution_with(
            &problem.placement,
            2,
            &replicas,
            &[(0, first), (1, second), (1, third)],
        );
        let placement = problem.placement.extract(&valid).unwrap();
        assert_eq!(3, placement.len());
        assert_eq!(Some(0), placement.host_of(first));
        assert_eq!(Some(1), placement.host_of(second));
        assert_eq!(Some(1), placement.host_of(third));
    }

    #[test]
    fn test_model_size() {
        let scenario = default_test_scenario();
        let fleet = default_test_fleet(4);
        let requests = crate::core::workload::RequestTable::zeros(4, 2);
        let power_model = Default::default();
        let input = SlotInput {
            fleet: &fleet,
            catalog: &scenario.catalog,
            requests: &requests,
            power_model: &power_model,
            time_slot_interval: scenario.time_slot_interval,
            battery_floor: 13.986,
            fairness_lower_bound: 0.3,
            objective: objective_policy("MaxMinBattery").unwrap(),
        };
        let problem = PlacementProblem::build(&input);

        // 4 uavs x 3 replicas
        assert_eq!(12, problem.stats.placement_variables);
        // 4 uavs x 2 services
        assert_eq!(8, problem.stats.service_indicators);
        assert_eq!(8, problem.stats.service_indicator_constraints);
        assert_eq!(3, problem.stats.coverage_constraints);
        assert_eq!(4, problem.stats.memory_constraints);
        assert_eq!(4, problem.stats.cpu_constraints);
        assert_eq!(4, problem.stats.battery_floor_constraints);
        assert_eq!(4, problem.stats.fairness_constraints);
        assert_eq!(27, problem.stats.constraint_count());
        assert_eq!(27, problem.constraints.len());
    }
}
