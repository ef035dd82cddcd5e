//! GPIO pin assignments for the PlantCycle controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Selector stepper (28BYJ-style unipolar via ULN2003)
// ---------------------------------------------------------------------------

/// ULN2003 IN1.
pub const STEPPER_IN1_GPIO: i32 = 4;
/// ULN2003 IN2.
pub const STEPPER_IN2_GPIO: i32 = 5;
/// ULN2003 IN3.
pub const STEPPER_IN3_GPIO: i32 = 6;
/// ULN2003 IN4.
pub const STEPPER_IN4_GPIO: i32 = 7;

/// Order in which the driver energises the inputs.  The middle pair is
/// swapped: the ULN2003 board brings the coils out as IN1/IN3/IN2/IN4.
pub const STEPPER_COIL_ORDER: [i32; 4] = [
    STEPPER_IN1_GPIO,
    STEPPER_IN3_GPIO,
    STEPPER_IN2_GPIO,
    STEPPER_IN4_GPIO,
];

// ---------------------------------------------------------------------------
// Pump (logic-level MOSFET / transistor, active HIGH)
// ---------------------------------------------------------------------------

/// Digital output: HIGH = pump running.
pub const PUMP_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// Climate sensor
// ---------------------------------------------------------------------------

/// DHT11 single-wire data line (open-drain, external 10 kΩ pull-up).
pub const DHT_GPIO: i32 = 10;
