// src/model/machine.rs

/// What a machine is currently producing.
///
/// P1 is the single-stage good. P2 takes two passes: stage 1 turns raw
/// material into intermediate stock on machine 1, stage 2 turns intermediate
/// stock into the finished good on machine 2. A closed enum keeps the
/// stock-crediting dispatch in the engine exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    P1,
    P2Step1,
    P2Step2,
}

/// Outcome of advancing a machine by one minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Machine has no batch running.
    Idle,
    /// Batch in progress, no unit finished this minute.
    Working,
    /// One unit of the batch finished; more remain.
    Unit,
    /// The final unit finished; caller must invoke `reset_after_batch`.
    LastUnit,
}

/// A single production machine running one batch at a time.
///
/// Units are credited "au fil de l'eau": a batch of `k` units over `duration`
/// minutes emits one completed unit every `duration / k` minutes, so
/// partially-finished batches feed downstream stock before the batch ends.
/// When `duration` is not a multiple of `k` the per-unit slice is floored and
/// the remainder is absorbed by the final unit.
#[derive(Debug, Clone)]
pub struct Machine {
    pub busy: bool,
    pub time_left: u32,
    pub batch_kind: Option<BatchKind>,
    k: u32,
    unit_minutes: u32,
    elapsed: u32,
    emitted: u32,
}

impl Machine {
    pub fn new() -> Self {
        Self {
            busy: false,
            time_left: 0,
            batch_kind: None,
            k: 0,
            unit_minutes: 0,
            elapsed: 0,
            emitted: 0,
        }
    }

    /// Number of units in the current batch (0 when idle).
    pub fn batch_size(&self) -> u32 {
        self.k
    }

    /// Starts a batch of `k` units taking `duration` minutes in total.
    ///
    /// # Panics
    /// Panics if the machine is already busy or `k` is zero. The engine
    /// checks feasibility before calling; hitting this is an engine bug, not
    /// a bad action.
    pub fn start_batch(&mut self, duration: u32, k: u32, kind: BatchKind) {
        assert!(!self.busy, "start_batch on a busy machine");
        assert!(k >= 1, "batch must contain at least one unit");
        assert!(duration >= 1, "batch must take at least one minute");

        self.busy = true;
        self.time_left = duration;
        self.batch_kind = Some(kind);
        self.k = k;
        self.unit_minutes = (duration / k).max(1);
        self.elapsed = 0;
        self.emitted = 0;
    }

    /// Advances the machine by one minute.
    pub fn tick(&mut self) -> TickResult {
        if !self.busy {
            return TickResult::Idle;
        }
        debug_assert!(
            self.time_left > 0,
            "tick on a finished batch awaiting reset_after_batch"
        );

        self.time_left -= 1;
        self.elapsed += 1;

        if self.time_left == 0 {
            self.emitted += 1;
            return TickResult::LastUnit;
        }

        // Intermediate units complete on per-unit slice boundaries; the last
        // unit is only ever reported by the tick that exhausts time_left.
        if self.emitted + 1 < self.k && self.elapsed % self.unit_minutes == 0 {
            self.emitted += 1;
            return TickResult::Unit;
        }

        TickResult::Working
    }

    /// Returns the machine to idle once the caller has credited the final
    /// unit of a batch.
    pub fn reset_after_batch(&mut self) {
        self.busy = false;
        self.time_left = 0;
        self.batch_kind = None;
        self.k = 0;
        self.unit_minutes = 0;
        self.elapsed = 0;
        self.emitted = 0;
    }

    /// Full reset at episode start.
    pub fn reset(&mut self) {
        self.reset_after_batch();
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
