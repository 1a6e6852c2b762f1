// src/simulation/observation.rs

//! The fixed 23-feature state projection handed to the decision-making agent.
//!
//! Every feature is divided by a documented scale constant so values land in
//! (roughly) `[0, 1]`. The array order of [`Observation::to_array`] is part
//! of the external contract: a trained policy indexes features by position.

/// Number of features in the observation vector.
pub const OBS_DIM: usize = 23;

/// Scale applied to a machine's remaining batch minutes.
pub const TIME_LEFT_SCALE: f32 = 100.0;
/// Scale applied to both backlog counters and the in-transit total.
pub const BACKLOG_SCALE: f32 = 1_000.0;
/// Scale applied to the action-type echo (types 0..=4).
pub const ACTION_TYPE_SCALE: f32 = 4.0;
/// Scale applied to the batch-size echo (sizes 0..=50).
pub const BATCH_SIZE_SCALE: f32 = 50.0;
/// Scale applied to the raw action-code echo (codes 0..=200).
pub const ACTION_ID_SCALE: f32 = 200.0;
/// Linear factor projecting the P1 backlog into a near-term demand estimate.
pub const DEMAND_PROJECTION_P1: f32 = 2.0;
/// Linear factor projecting the P2 backlog into a near-term demand estimate.
pub const DEMAND_PROJECTION_P2: f32 = 20.0;
/// Scale applied to the projected P1 demand.
pub const DEMAND_PROJECTION_P1_SCALE: f32 = 2_000.0;
/// Scale applied to the projected P2 demand.
pub const DEMAND_PROJECTION_P2_SCALE: f32 = 20_000.0;
/// Scale applied to the cumulative episode reward.
pub const EPISODE_REWARD_SCALE: f32 = 1_000_000.0;
/// Scale applied to the last step's reward.
pub const STEP_REWARD_SCALE: f32 = 100_000.0;
/// The theft-proximity flag raises this many minutes before the event.
pub const THEFT_WARNING_MINUTES: u32 = 60;

/// One normalized snapshot of the workshop state.
///
/// Field comments give the raw quantity and its divisor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// time / max_time
    pub time: f32,
    /// machine 1 busy flag (0 or 1)
    pub m1_busy: f32,
    /// machine 1 remaining minutes / 100
    pub m1_time_left: f32,
    /// machine 2 busy flag (0 or 1)
    pub m2_busy: f32,
    /// machine 2 remaining minutes / 100
    pub m2_time_left: f32,
    /// raw stock / capacity
    pub raw_stock: f32,
    /// P1 stock / capacity
    pub p1_stock: f32,
    /// P2 intermediate stock / capacity
    pub p2_inter_stock: f32,
    /// P2 stock / capacity
    pub p2_stock: f32,
    /// minutes to the next delivery / max_time (0 when none pending)
    pub next_delivery_countdown: f32,
    /// P1 backlog / 1000
    pub backlog_p1: f32,
    /// P2 backlog / 1000
    pub backlog_p2: f32,
    /// total raw quantity en route / 1000
    pub in_transit: f32,
    /// last action type / 4
    pub action_type: f32,
    /// last batch size / 50
    pub action_k: f32,
    /// last raw action code / 200
    pub action_id: f32,
    /// minute of day / 1440
    pub minute_of_day: f32,
    /// 2 * P1 backlog / 2000
    pub expected_demand_p1: f32,
    /// 20 * P2 backlog / 20000
    pub expected_demand_p2: f32,
    /// 1 within the hour before the nightly theft, else 0
    pub theft_risk: f32,
    /// cumulative episode reward / 1e6
    pub episode_reward: f32,
    /// last step reward / 1e5
    pub last_reward: f32,
    /// minutes until the next demand/sales event / 15
    pub time_to_next_sale: f32,
}

impl Observation {
    /// Flattens the observation into its canonical positional layout.
    pub fn to_array(&self) -> [f32; OBS_DIM] {
        [
            self.time,
            self.m1_busy,
            self.m1_time_left,
            self.m2_busy,
            self.m2_time_left,
            self.raw_stock,
            self.p1_stock,
            self.p2_inter_stock,
            self.p2_stock,
            self.next_delivery_countdown,
            self.backlog_p1,
            self.backlog_p2,
            self.in_transit,
            self.action_type,
            self.action_k,
            self.action_id,
            self.minute_of_day,
            self.expected_demand_p1,
            self.expected_demand_p2,
            self.theft_risk,
            self.episode_reward,
            self.last_reward,
            self.time_to_next_sale,
        ]
    }
}
