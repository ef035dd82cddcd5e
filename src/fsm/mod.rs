//! Function-pointer finite state machine for the watering cycle.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  PhaseTable                                         │
//! │  ┌───────────┬──────────────┬─────────────────────┐ │
//! │  │ Phase     │ on_enter     │ next                │ │
//! │  ├───────────┼──────────────┼─────────────────────┤ │
//! │  │ Testing   │ fn(ctx)      │ fn(&ctx) -> Phase   │ │
//! │  │ Sampling  │ -            │ fn(&ctx) -> Phase   │ │
//! │  │ Error     │ fn(ctx)      │ fn(&ctx) -> Phase   │ │
//! │  │ Deciding  │ -            │ fn(&ctx) -> Phase   │ │
//! │  │ Actuating │ -            │ fn(&ctx) -> Phase   │ │
//! │  │ Sleeping  │ -            │ fn(&ctx) -> Phase   │ │
//! │  └───────────┴──────────────┴─────────────────────┘ │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The table only decides *where to go next*.  The work each phase does
//! (moving the selector, sampling, sleeping) lives in the
//! [`CycleController`](crate::app::controller::CycleController), which
//! runs the current phase's action, records the outcome in the
//! [`CycleContext`], and then calls [`Fsm::advance`].

pub mod context;
pub mod states;

use context::CycleContext;
use log::info;

// ---------------------------------------------------------------------------
// Phase identity
// ---------------------------------------------------------------------------

/// Every phase of one cycle.  Must stay in sync with
/// [`states::build_phase_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    Testing = 0,
    Sampling = 1,
    Error = 2,
    Deciding = 3,
    Actuating = 4,
    Sleeping = 5,
}

impl Phase {
    /// Total number of phases — used to size the table array.
    pub const COUNT: usize = 6;

    /// Convert an index back to `Phase`.  Panics on out-of-range in debug
    /// builds; returns `Testing` in release, which restarts the cycle.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Testing,
            1 => Self::Sampling,
            2 => Self::Error,
            3 => Self::Deciding,
            4 => Self::Actuating,
            5 => Self::Sleeping,
            _ => {
                debug_assert!(false, "invalid phase index: {idx}");
                Self::Testing
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Runs once when a phase is entered.
pub type PhaseEnterFn = fn(&mut CycleContext);

/// Picks the successor once the phase's work is done.
pub type PhaseNextFn = fn(&CycleContext) -> Phase;

/// Static descriptor for a single phase.
pub struct PhaseDescriptor {
    pub id: Phase,
    pub name: &'static str,
    pub on_enter: Option<PhaseEnterFn>,
    pub next: PhaseNextFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `Phase as usize`.
    table: [PhaseDescriptor; Phase::COUNT],
    current: usize,
    transitions: u64,
}

impl Fsm {
    pub fn new(table: [PhaseDescriptor; Phase::COUNT], initial: Phase) -> Self {
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter`.  Call once before the first `advance()`.
    pub fn start(&mut self, ctx: &mut CycleContext) {
        info!("Cycle FSM starting in phase: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Leave the current phase for whatever its `next` function picks.
    /// Returns the new phase.
    pub fn advance(&mut self, ctx: &mut CycleContext) -> Phase {
        let next = (self.table[self.current].next)(ctx);
        let next_idx = next as usize;

        info!(
            "Cycle phase: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        self.current = next_idx;
        self.transitions += 1;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
        next
    }

    pub fn current_phase(&self) -> Phase {
        Phase::from_index(self.current)
    }

    pub fn transitions(&self) -> u64 {
        self.transitions
    }
}
