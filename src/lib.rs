// src/lib.rs

//! Minute-resolution simulation of a two-machine production workshop.
//!
//! The engine advances one simulated minute per [`WorkshopSim::step`] call:
//! it applies the caller's action (start a production batch, order raw
//! material, or wait), advances both machines and the delivery pipeline,
//! samples customer demand every 15 minutes, clears sales against finished
//! stock, and applies a nightly theft event. Each step returns a normalized
//! 23-feature observation and a scalar reward, so an external decision-making
//! agent can drive the workshop through the same interface a gym-style
//! environment would expose.

pub mod io;
pub mod model;
pub mod simulation;
pub mod strategy;

pub use model::delivery::{DeliveryQueue, Shipment};
pub use model::machine::{BatchKind, Machine, TickResult};
pub use model::market::Market;
pub use model::stock::Stock;
pub use simulation::action::{decode_action, feasible_actions, ActionKind, DecodedAction};
pub use simulation::action::{NUM_ACTIONS, WAIT_ACTION};
pub use simulation::config::SimConfig;
pub use simulation::engine::{StepOutcome, WorkshopSim};
pub use simulation::observation::{Observation, OBS_DIM};
pub use strategy::traits::Policy;
