//! Phase transition functions and table builder.
//!
//! Each phase is described by plain `fn` pointers — no closures, no
//! dynamic dispatch, no heap.
//!
//! ```text
//!  TESTING ──▶ SAMPLING ──[invalid]──▶ ERROR ─────────┐
//!     ▲           │                                   │
//!     │        [valid]                                ▼
//!     │           ▼                                SLEEPING
//!     │        DECIDING ──[no water]─────────────────▲  │
//!     │           │                                  │  │
//!     │        [water]──▶ ACTUATING ─────────────────┘  │
//!     │                                                 │
//!     └─────────────────────────────────────────────────┘
//! ```

use super::context::CycleContext;
use super::{Phase, PhaseDescriptor};
use log::warn;

/// Build the static phase table.  Called once at startup.
pub fn build_phase_table() -> [PhaseDescriptor; Phase::COUNT] {
    [
        PhaseDescriptor {
            id: Phase::Testing,
            name: "Testing",
            on_enter: Some(testing_enter),
            next: testing_next,
        },
        PhaseDescriptor {
            id: Phase::Sampling,
            name: "Sampling",
            on_enter: None,
            next: sampling_next,
        },
        PhaseDescriptor {
            id: Phase::Error,
            name: "Error",
            on_enter: Some(error_enter),
            next: error_next,
        },
        PhaseDescriptor {
            id: Phase::Deciding,
            name: "Deciding",
            on_enter: None,
            next: deciding_next,
        },
        PhaseDescriptor {
            id: Phase::Actuating,
            name: "Actuating",
            on_enter: None,
            next: actuating_next,
        },
        PhaseDescriptor {
            id: Phase::Sleeping,
            name: "Sleeping",
            on_enter: None,
            next: sleeping_next,
        },
    ]
}

// ── TESTING ──────────────────────────────────────────────────

fn testing_enter(ctx: &mut CycleContext) {
    ctx.begin_cycle();
}

fn testing_next(_ctx: &CycleContext) -> Phase {
    Phase::Sampling
}

// ── SAMPLING ─────────────────────────────────────────────────

fn sampling_next(ctx: &CycleContext) -> Phase {
    if ctx.valid_reading().is_some() {
        Phase::Deciding
    } else {
        Phase::Error
    }
}

// ── ERROR — measurement failure, skip this cycle ────────────

fn error_enter(ctx: &mut CycleContext) {
    ctx.mark_sensor_fault();
    warn!(
        "ERROR: invalid reading in cycle {}, sleeping {}ms",
        ctx.cycle, ctx.sleep_ms
    );
}

fn error_next(_ctx: &CycleContext) -> Phase {
    Phase::Sleeping
}

// ── DECIDING ─────────────────────────────────────────────────

fn deciding_next(ctx: &CycleContext) -> Phase {
    if ctx.water {
        Phase::Actuating
    } else {
        Phase::Sleeping
    }
}

// ── ACTUATING ────────────────────────────────────────────────

fn actuating_next(_ctx: &CycleContext) -> Phase {
    Phase::Sleeping
}

// ── SLEEPING ─────────────────────────────────────────────────

fn sleeping_next(_ctx: &CycleContext) -> Phase {
    Phase::Testing
}
