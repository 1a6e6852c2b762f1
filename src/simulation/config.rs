// src/simulation/config.rs

/// Every tunable constant of the simulation, set at construction time.
///
/// The defaults model one week of continuous operation: a 10 080-minute
/// episode, stock buffers capped at 50 units, demand sampled every 15
/// minutes, raw-material orders arriving after roughly two hours, and a
/// theft event at 23:55 each night.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Episode horizon in minutes.
    pub max_time: u32,
    /// Capacity shared by all four stock buffers.
    pub raw_capacity: u32,
    /// Minutes per simulated day.
    pub minutes_per_day: u32,
    /// Minute of day at which the nightly theft fires.
    pub theft_minute: u32,
    /// Minutes between demand/sales events.
    pub demand_interval: u32,
    /// Nominal raw-material lead time in minutes.
    pub order_lead_time: u32,
    /// Symmetric bound on the per-order lead-time jitter.
    pub order_jitter: u32,

    /// Processing minutes per unit, by batch type.
    pub p1_unit_minutes: u32,
    pub p2_step1_unit_minutes: u32,
    pub p2_step2_unit_minutes: u32,

    /// Mean demand per interval for each finished good.
    pub demand_lambda_p1: f64,
    pub demand_lambda_p2: f64,

    /// Reward shaping.
    pub wait_penalty: f32,
    pub infeasible_penalty: f32,
    pub p1_start_bonus: f32,
    pub p2_step1_start_bonus: f32,
    pub p2_step2_start_bonus: f32,
    pub order_cost_per_unit: f32,
    pub p1_sale_price: f32,
    pub p2_sale_price: f32,
    pub backlog_penalty_per_unit: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_time: 7 * 24 * 60,
            raw_capacity: 50,
            minutes_per_day: 24 * 60,
            theft_minute: 1435,
            demand_interval: 15,
            order_lead_time: 120,
            order_jitter: 2,

            p1_unit_minutes: 3,
            p2_step1_unit_minutes: 10,
            p2_step2_unit_minutes: 15,

            demand_lambda_p1: 1.0,
            demand_lambda_p2: 10.0,

            wait_penalty: -0.2,
            infeasible_penalty: -1.0,
            p1_start_bonus: 0.5,
            p2_step1_start_bonus: 5.0,
            p2_step2_start_bonus: 15.0,
            order_cost_per_unit: 1.0,
            p1_sale_price: 2.0,
            p2_sale_price: 20.0,
            backlog_penalty_per_unit: 0.02,
        }
    }
}
