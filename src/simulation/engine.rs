// src/simulation/engine.rs

use crate::model::delivery::DeliveryQueue;
use crate::model::machine::{BatchKind, Machine, TickResult};
use crate::model::market::Market;
use crate::model::stock::Stock;
use crate::simulation::action::{
    decode_action, feasible_actions, ActionKind, DecodedAction, NUM_ACTIONS,
};
use crate::simulation::config::SimConfig;
use crate::simulation::observation::{
    Observation, ACTION_ID_SCALE, ACTION_TYPE_SCALE, BACKLOG_SCALE, BATCH_SIZE_SCALE,
    DEMAND_PROJECTION_P1, DEMAND_PROJECTION_P1_SCALE, DEMAND_PROJECTION_P2,
    DEMAND_PROJECTION_P2_SCALE, EPISODE_REWARD_SCALE, STEP_REWARD_SCALE, THEFT_WARNING_MINUTES,
    TIME_LEFT_SCALE,
};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Result of advancing the simulation by one minute.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f32,
    pub terminated: bool,
    /// Always false: the core has no external time-limit wrapper.
    pub truncated: bool,
}

/// The workshop simulation engine.
///
/// Owns every piece of mutable state (machines, stock, delivery pipeline,
/// backlogs, clock, rng) and advances exactly one simulated minute per
/// [`step`](WorkshopSim::step) call. Machine 1 runs P1 and the first P2
/// stage; machine 2 runs the second P2 stage. Instances are independent;
/// parallelism is achieved by constructing several engines, never by sharing
/// one.
pub struct WorkshopSim {
    config: SimConfig,

    time: u32,
    m1: Machine,
    m2: Machine,
    stock: Stock,
    delivery: DeliveryQueue,
    market: Market,

    backlog_p1: u32,
    backlog_p2: u32,

    // Bookkeeping echoed into the observation.
    last_action: DecodedAction,
    episode_reward: f32,
    last_reward: f32,

    rng: StdRng,
}

impl WorkshopSim {
    pub fn new(config: SimConfig) -> Self {
        let market = Market::new(config.demand_lambda_p1, config.demand_lambda_p2);
        let stock = Stock::new(config.raw_capacity);

        Self {
            config,
            time: 0,
            m1: Machine::new(),
            m2: Machine::new(),
            stock,
            delivery: DeliveryQueue::new(),
            market,
            backlog_p1: 0,
            backlog_p2: 0,
            last_action: DecodedAction::wait(),
            episode_reward: 0.0,
            last_reward: 0.0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Reinitializes every piece of state and returns the initial
    /// observation. A `Some` seed makes the whole episode reproducible;
    /// `None` reseeds from entropy.
    pub fn reset(&mut self, seed: Option<u64>) -> Observation {
        self.rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        self.time = 0;
        self.m1.reset();
        self.m2.reset();
        self.stock.reset();
        self.delivery.reset();
        self.backlog_p1 = 0;
        self.backlog_p2 = 0;
        self.last_action = DecodedAction::wait();
        self.episode_reward = 0.0;
        self.last_reward = 0.0;

        self.observe()
    }

    /// Advances the simulation by one minute.
    ///
    /// The stage order below is load-bearing: deliveries are released at the
    /// pre-increment minute, and demand, sales and theft read the stock state
    /// the machines just produced into.
    pub fn step(&mut self, action: usize) -> StepOutcome {
        let mut reward = 0.0f32;

        // -----------------------------------------------------------------
        // 1) Decode the action and echo it into the state.
        // -----------------------------------------------------------------
        let decoded = decode_action(action);
        self.last_action = decoded;

        // -----------------------------------------------------------------
        // 2) Immediate action effect. Infeasible production requests mutate
        // nothing and cost a flat penalty; they are legal inputs, not errors.
        // -----------------------------------------------------------------
        match decoded.kind {
            ActionKind::Wait => {
                reward += self.config.wait_penalty;
            }
            ActionKind::ProduceP1 => {
                let k = decoded.k;
                if !self.m1.busy && self.stock.consume_raw(k) {
                    let duration = self.config.p1_unit_minutes * k;
                    self.m1.start_batch(duration, k, BatchKind::P1);
                    reward += self.config.p1_start_bonus * k as f32;
                } else {
                    reward += self.config.infeasible_penalty;
                }
            }
            ActionKind::ProduceP2Step1 => {
                let k = decoded.k;
                if !self.m1.busy && self.stock.consume_raw(k) {
                    let duration = self.config.p2_step1_unit_minutes * k;
                    self.m1.start_batch(duration, k, BatchKind::P2Step1);
                    reward += self.config.p2_step1_start_bonus * k as f32;
                } else {
                    reward += self.config.infeasible_penalty;
                }
            }
            ActionKind::ProduceP2Step2 => {
                let k = decoded.k;
                if !self.m2.busy && self.stock.consume_p2_inter(k) {
                    let duration = self.config.p2_step2_unit_minutes * k;
                    self.m2.start_batch(duration, k, BatchKind::P2Step2);
                    reward += self.config.p2_step2_start_bonus * k as f32;
                } else {
                    reward += self.config.infeasible_penalty;
                }
            }
            ActionKind::OrderRaw => {
                let k = decoded.k;
                reward -= self.config.order_cost_per_unit * k as f32;

                let jitter_bound = self.config.order_jitter as i64;
                let jitter = self.rng.gen_range(-jitter_bound..=jitter_bound);
                let nominal = self.time as i64 + self.config.order_lead_time as i64 + jitter;
                // An order can never arrive before the next minute.
                let arrival = nominal.max(self.time as i64 + 1) as u32;
                self.delivery.schedule(k, arrival);
            }
        }

        // -----------------------------------------------------------------
        // 3) + 4) Continuous-flow production: each machine may finish one
        // unit this minute, credited to the buffer its batch type feeds.
        // -----------------------------------------------------------------
        match self.m1.tick() {
            TickResult::Unit => self.credit_unit(self.m1.batch_kind),
            TickResult::LastUnit => {
                self.credit_unit(self.m1.batch_kind);
                self.m1.reset_after_batch();
            }
            TickResult::Idle | TickResult::Working => {}
        }

        match self.m2.tick() {
            TickResult::Unit => self.credit_unit(self.m2.batch_kind),
            TickResult::LastUnit => {
                self.credit_unit(self.m2.batch_kind);
                self.m2.reset_after_batch();
            }
            TickResult::Idle | TickResult::Working => {}
        }

        // -----------------------------------------------------------------
        // 5) Raw-material deliveries due at the current minute.
        // -----------------------------------------------------------------
        let delivered = self.delivery.tick(self.time);
        if delivered > 0 {
            self.stock.add_raw(delivered);
        }

        // -----------------------------------------------------------------
        // 6) Advance the clock.
        // -----------------------------------------------------------------
        self.time += 1;

        // -----------------------------------------------------------------
        // 7) Periodic demand and sales clearing.
        // -----------------------------------------------------------------
        if self.time % self.config.demand_interval == 0 {
            let (new_d1, new_d2) = self.market.sample_demand(&mut self.rng);
            self.backlog_p1 += new_d1;
            self.backlog_p2 += new_d2;

            let (sold_p1, sold_p2) =
                self.market
                    .compute_sales(&mut self.stock, self.backlog_p1, self.backlog_p2);

            reward += self.config.p1_sale_price * sold_p1 as f32
                + self.config.p2_sale_price * sold_p2 as f32;

            self.backlog_p1 -= sold_p1;
            self.backlog_p2 -= sold_p2;

            let backlog = self.backlog_p1 + self.backlog_p2;
            reward -= self.config.backlog_penalty_per_unit * backlog as f32;

            debug!(
                "minute {}: demand +({}, {}), sold ({}, {}), backlog ({}, {})",
                self.time, new_d1, new_d2, sold_p1, sold_p2, self.backlog_p1, self.backlog_p2
            );
        }

        // -----------------------------------------------------------------
        // 8) Nightly theft on finished goods.
        // -----------------------------------------------------------------
        if self.time % self.config.minutes_per_day == self.config.theft_minute {
            let (lost_p1, lost_p2) = self.market.apply_theft(&mut self.stock, &mut self.rng);
            debug!(
                "minute {}: theft removed ({}, {})",
                self.time, lost_p1, lost_p2
            );
        }

        // -----------------------------------------------------------------
        // 9) + 10) Reward bookkeeping and termination.
        // -----------------------------------------------------------------
        self.episode_reward += reward;
        self.last_reward = reward;

        let terminated = self.time >= self.config.max_time;

        StepOutcome {
            observation: self.observe(),
            reward,
            terminated,
            truncated: false,
        }
    }

    /// The feasibility mask over all 201 action codes, recomputed from the
    /// instantaneous machine and stock state.
    pub fn action_mask(&self) -> [bool; NUM_ACTIONS] {
        feasible_actions(
            self.m1.busy,
            self.m2.busy,
            self.stock.raw,
            self.stock.p2_inter,
        )
    }

    fn credit_unit(&mut self, kind: Option<BatchKind>) {
        match kind {
            Some(BatchKind::P1) => self.stock.add_p1(1),
            Some(BatchKind::P2Step1) => self.stock.add_p2_inter(1),
            Some(BatchKind::P2Step2) => self.stock.add_p2(1),
            None => unreachable!("a ticking machine always carries a batch type"),
        }
    }

    /// Projects the full internal state into the normalized feature vector.
    pub fn observe(&self) -> Observation {
        let cfg = &self.config;

        let minute_of_day = self.time % cfg.minutes_per_day;
        let theft_risk = match cfg.theft_minute.checked_sub(minute_of_day) {
            Some(d) if d <= THEFT_WARNING_MINUTES => 1.0,
            _ => 0.0,
        };

        let time_mod = self.time % cfg.demand_interval;
        let time_to_next_sale = if time_mod == 0 {
            0
        } else {
            cfg.demand_interval - time_mod
        };

        let capacity = self.stock.capacity() as f32;
        let flag = |b: bool| if b { 1.0 } else { 0.0 };

        Observation {
            time: self.time as f32 / cfg.max_time as f32,
            m1_busy: flag(self.m1.busy),
            m1_time_left: self.m1.time_left as f32 / TIME_LEFT_SCALE,
            m2_busy: flag(self.m2.busy),
            m2_time_left: self.m2.time_left as f32 / TIME_LEFT_SCALE,
            raw_stock: self.stock.raw as f32 / capacity,
            p1_stock: self.stock.p1 as f32 / capacity,
            p2_inter_stock: self.stock.p2_inter as f32 / capacity,
            p2_stock: self.stock.p2 as f32 / capacity,
            next_delivery_countdown: self.delivery.next_arrival_countdown(self.time) as f32
                / cfg.max_time as f32,
            backlog_p1: self.backlog_p1 as f32 / BACKLOG_SCALE,
            backlog_p2: self.backlog_p2 as f32 / BACKLOG_SCALE,
            in_transit: self.delivery.total_in_transit() as f32 / BACKLOG_SCALE,
            action_type: self.last_action.kind.index() as f32 / ACTION_TYPE_SCALE,
            action_k: self.last_action.k as f32 / BATCH_SIZE_SCALE,
            action_id: self.last_action.id as f32 / ACTION_ID_SCALE,
            minute_of_day: minute_of_day as f32 / cfg.minutes_per_day as f32,
            expected_demand_p1: DEMAND_PROJECTION_P1 * self.backlog_p1 as f32
                / DEMAND_PROJECTION_P1_SCALE,
            expected_demand_p2: DEMAND_PROJECTION_P2 * self.backlog_p2 as f32
                / DEMAND_PROJECTION_P2_SCALE,
            theft_risk,
            episode_reward: self.episode_reward / EPISODE_REWARD_SCALE,
            last_reward: self.last_reward / STEP_REWARD_SCALE,
            time_to_next_sale: time_to_next_sale as f32 / cfg.demand_interval as f32,
        }
    }

    // Read accessors for recording, policies and tests.

    pub fn time(&self) -> u32 {
        self.time
    }

    pub fn stock(&self) -> &Stock {
        &self.stock
    }

    pub fn backlogs(&self) -> (u32, u32) {
        (self.backlog_p1, self.backlog_p2)
    }

    pub fn in_transit(&self) -> u32 {
        self.delivery.total_in_transit()
    }

    pub fn last_action(&self) -> DecodedAction {
        self.last_action
    }

    pub fn episode_reward(&self) -> f32 {
        self.episode_reward
    }

    pub fn last_reward(&self) -> f32 {
        self.last_reward
    }

    pub fn machine1(&self) -> &Machine {
        &self.m1
    }

    pub fn machine2(&self) -> &Machine {
        &self.m2
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}
