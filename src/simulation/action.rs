// src/simulation/action.rs

//! Discrete action space: 201 codes in five contiguous bands.
//!
//! - 0..=49    produce P1, batch size `a + 1`
//! - 50..=99   produce P2 stage 1, batch size `a - 49`
//! - 100..=149 produce P2 stage 2, batch size `a - 99`
//! - 150..=199 order raw material, quantity `a - 149`
//! - 200       wait
//!
//! Decoding is pure arithmetic with no state dependency; codes outside the
//! range fail closed to WAIT.

pub const NUM_ACTIONS: usize = 201;
pub const WAIT_ACTION: usize = 200;
/// Width of each production/order band, i.e. the largest batch size.
pub const MAX_BATCH_SIZE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    ProduceP1,
    ProduceP2Step1,
    ProduceP2Step2,
    OrderRaw,
    Wait,
}

impl ActionKind {
    /// Numeric echo of the action type used in the observation vector.
    pub fn index(self) -> u32 {
        match self {
            ActionKind::ProduceP1 => 0,
            ActionKind::ProduceP2Step1 => 1,
            ActionKind::ProduceP2Step2 => 2,
            ActionKind::OrderRaw => 3,
            ActionKind::Wait => 4,
        }
    }
}

/// An action code resolved into its semantic parts. `k` is the batch size or
/// order quantity (0 for WAIT); `id` is the raw code echoed back to the
/// observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedAction {
    pub kind: ActionKind,
    pub k: u32,
    pub id: usize,
}

impl DecodedAction {
    /// The reset-time echo: nothing decided yet, reported as WAIT.
    pub fn wait() -> Self {
        Self {
            kind: ActionKind::Wait,
            k: 0,
            id: WAIT_ACTION,
        }
    }
}

/// Maps an action code to `(kind, batch size)`. Out-of-range codes are
/// treated as WAIT, including the echoed id.
pub fn decode_action(action: usize) -> DecodedAction {
    match action {
        0..=49 => DecodedAction {
            kind: ActionKind::ProduceP1,
            k: action as u32 + 1,
            id: action,
        },
        50..=99 => DecodedAction {
            kind: ActionKind::ProduceP2Step1,
            k: action as u32 - 49,
            id: action,
        },
        100..=149 => DecodedAction {
            kind: ActionKind::ProduceP2Step2,
            k: action as u32 - 99,
            id: action,
        },
        150..=199 => DecodedAction {
            kind: ActionKind::OrderRaw,
            k: action as u32 - 149,
            id: action,
        },
        WAIT_ACTION => DecodedAction {
            kind: ActionKind::Wait,
            k: 0,
            id: WAIT_ACTION,
        },
        _ => DecodedAction::wait(),
    }
}

/// Computes the feasibility mask for the whole action space from the current
/// machine and stock state. Rebuilt from scratch on every call.
///
/// Production codes are infeasible when their machine is busy or the input
/// buffer holds fewer units than the requested batch; ordering and waiting
/// are always feasible.
pub fn feasible_actions(
    m1_busy: bool,
    m2_busy: bool,
    raw: u32,
    p2_inter: u32,
) -> [bool; NUM_ACTIONS] {
    let mut mask = [true; NUM_ACTIONS];

    for (action, entry) in mask.iter_mut().enumerate() {
        let decoded = decode_action(action);
        *entry = match decoded.kind {
            ActionKind::ProduceP1 | ActionKind::ProduceP2Step1 => {
                !m1_busy && raw >= decoded.k
            }
            ActionKind::ProduceP2Step2 => !m2_busy && p2_inter >= decoded.k,
            ActionKind::OrderRaw | ActionKind::Wait => true,
        };
    }

    mask
}
