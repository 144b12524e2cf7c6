use std::collections::HashMap;

use good_lp::{Expression, IntoAffineExpression, Variable};
use lazy_static::lazy_static;

lazy_static! {
    pub static ref OBJECTIVE_REGISTRY: HashMap<&'static str, Box<dyn ObjectivePolicy>> = {
        HashMap::from([
            (
                "MaxMinBattery",
                Box::new(MaxMinBattery {}) as Box<dyn ObjectivePolicy>,
            ),
            (
                "MaxMeanBattery",
                Box::new(MaxMeanBattery {}) as Box<dyn ObjectivePolicy>,
            ),
        ])
    };
}

pub const DEFAULT_OBJECTIVE: &str = "MaxMinBattery";

/// Pieces of a slot model an objective may be built from.
pub struct ObjectiveContext<'a> {
    /// Continuous variable bounded from above by every projected post-slot battery.
    pub fairness: Variable,
    /// Battery of every UAV after the slot, as a function of the placement.
    pub projected_batteries: &'a [Expression],
}

/// Objective maximized by the placement model.
pub trait ObjectivePolicy: Send + Sync {
    fn name(&self) -> &'static str;

    fn objective(&self, ctx: &ObjectiveContext) -> Expression;
}

pub fn objective_policy(name: &str) -> Option<&'static dyn ObjectivePolicy> {
    OBJECTIVE_REGISTRY.get(name).map(|policy| policy.as_ref())
}

// Max-min fairness: push up the battery of the UAV which is left with the least energy.
pub struct MaxMinBattery {}
impl ObjectivePolicy for MaxMinBattery {
    fn name(&self) -> &'static str {
        "MaxMinBattery"
    }

    fn objective(&self, ctx: &ObjectiveContext) -> Expression {
        ctx.fairness.into_expression()
    }
}

// Mean battery of the fleet after the slot. Equivalent to minimizing the total energy drawn.
pub struct MaxMeanBattery {}
impl ObjectivePolicy for MaxMeanBattery {
    fn name(&self) -> &'static str {
        "MaxMeanBattery"
    }

    fn objective(&self, ctx: &ObjectiveContext) -> Expression {
        let total: Expression = ctx.projected_batteries.iter().cloned().sum();
        total * (1.0 / ctx.projected_batteries.len().max(1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::{objective_policy, DEFAULT_OBJECTIVE};

    #[test]
    fn test_registry_lookup() {
        assert_eq!(
            "MaxMinBattery",
            objective_policy(DEFAULT_OBJECTIVE).unwrap().name()
        );
        assert_eq!(
            "MaxMeanBattery",
            objective_policy("MaxMeanBattery").unwrap().name()
        );
        assert!(objective_policy("MinEnergy").is_none());
    }
}
