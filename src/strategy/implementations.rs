// src/strategy/implementations.rs

use crate::simulation::action::{NUM_ACTIONS, WAIT_ACTION};
use crate::simulation::config::SimConfig;
use crate::simulation::observation::{Observation, BACKLOG_SCALE};
use crate::strategy::traits::Policy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// =========================================================================
// 1. Random Feasible Policy
// =========================================================================

/// Picks uniformly among the currently feasible actions.
///
/// Useful as a rollout baseline and for property tests: it exercises the
/// whole action space without ever triggering the infeasible-action penalty.
/// Holds its own seeded rng so runs reproduce independently of the engine's
/// random stream.
#[derive(Debug, Clone)]
pub struct RandomFeasiblePolicy {
    rng: StdRng,
}

impl RandomFeasiblePolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomFeasiblePolicy {
    fn select_action(
        &mut self,
        _observation: &Observation,
        mask: &[bool; NUM_ACTIONS],
    ) -> usize {
        let feasible: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(action, ok)| ok.then_some(action))
            .collect();

        // WAIT is always feasible, so the list is never empty.
        feasible[self.rng.gen_range(0..feasible.len())]
    }
}

// =========================================================================
// 2. Restock Heuristic
// =========================================================================

/// A hand-written baseline in the order-up-to-target spirit: keep raw
/// material flowing in, run the P2 chain whenever its inputs are available
/// (P2 carries most of the sale value), and fill idle machine-1 time with
/// small P1 batches.
#[derive(Debug, Clone)]
pub struct RestockHeuristic {
    config: SimConfig,
    /// Raw units (on hand + en route) the policy orders up to.
    raw_target: u32,
    /// Batch size used for the P2 stages.
    p2_batch: u32,
    /// Batch size used for P1 filler work.
    p1_batch: u32,
}

impl RestockHeuristic {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            config: config.clone(),
            raw_target: 30,
            p2_batch: 5,
            p1_batch: 5,
        }
    }

    /// Recovers integer unit counts from the normalized observation.
    fn denormalize(&self, observation: &Observation) -> (u32, u32, u32) {
        let capacity = self.config.raw_capacity as f32;
        let raw = (observation.raw_stock * capacity).round() as u32;
        let p2_inter = (observation.p2_inter_stock * capacity).round() as u32;
        let in_transit = (observation.in_transit * BACKLOG_SCALE).round() as u32;
        (raw, p2_inter, in_transit)
    }
}

impl Policy for RestockHeuristic {
    fn select_action(
        &mut self,
        observation: &Observation,
        mask: &[bool; NUM_ACTIONS],
    ) -> usize {
        let (raw, p2_inter, in_transit) = self.denormalize(observation);

        // Finish P2 whenever stage-2 inputs are ready.
        if observation.m2_busy < 0.5 && p2_inter >= self.p2_batch {
            let action = 100 + self.p2_batch as usize - 1;
            if mask[action] {
                return action;
            }
        }

        // Feed the P2 chain from raw stock.
        if observation.m1_busy < 0.5 && raw >= self.p2_batch {
            let action = 50 + self.p2_batch as usize - 1;
            if mask[action] {
                return action;
            }
        }

        // Keep the raw pipeline filled up to the target.
        let pipeline = raw + in_transit;
        if pipeline < self.raw_target {
            let qty = (self.raw_target - pipeline).min(50);
            let action = 150 + qty as usize - 1;
            if mask[action] {
                return action;
            }
        }

        // Idle machine 1 and spare raw stock: run a small P1 batch.
        if observation.m1_busy < 0.5 && raw >= self.p1_batch {
            let action = self.p1_batch as usize - 1;
            if mask[action] {
                return action;
            }
        }

        WAIT_ACTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::engine::WorkshopSim;

    #[test]
    fn random_policy_only_picks_feasible_actions() {
        let mut sim = WorkshopSim::new(SimConfig::default());
        let mut obs = sim.reset(Some(21));
        let mut policy = RandomFeasiblePolicy::new(21);

        for _ in 0..500 {
            let mask = sim.action_mask();
            let action = policy.select_action(&obs, &mask);
            assert!(mask[action]);
            obs = sim.step(action).observation;
        }
    }

    #[test]
    fn random_policy_returns_wait_when_nothing_else_is_feasible() {
        let mut mask = [false; NUM_ACTIONS];
        mask[WAIT_ACTION] = true;

        let mut sim = WorkshopSim::new(SimConfig::default());
        let obs = sim.reset(Some(22));
        let mut policy = RandomFeasiblePolicy::new(22);

        assert_eq!(policy.select_action(&obs, &mask), WAIT_ACTION);
    }

    #[test]
    fn heuristic_orders_raw_material_from_an_empty_workshop() {
        let mut sim = WorkshopSim::new(SimConfig::default());
        let obs = sim.reset(Some(23));
        let mut policy = RestockHeuristic::new(sim.config());

        let action = policy.select_action(&obs, &sim.action_mask());
        assert!(
            (150..200).contains(&action),
            "expected an order action, got {}",
            action
        );

        // Ordering up to the target of 30 from an empty pipeline.
        assert_eq!(action, 150 + 30 - 1);
    }

    #[test]
    fn heuristic_always_returns_a_feasible_action() {
        let mut sim = WorkshopSim::new(SimConfig::default());
        let mut obs = sim.reset(Some(24));
        let mut policy = RestockHeuristic::new(sim.config());

        for _ in 0..2_000 {
            let mask = sim.action_mask();
            let action = policy.select_action(&obs, &mask);
            assert!(mask[action], "action {} is masked", action);
            obs = sim.step(action).observation;
        }
    }
}
