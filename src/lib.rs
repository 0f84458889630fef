//! Ping Track - a two-player timing game on one-dimensional tracks
//!
//! Core modules:
//! - `sim`: Simulation core (pucks, paddles, tracks, scoring)
//! - `settings`: Data-driven configuration with validation
//! - `display`: Maps track state onto a strip of LED cells
//! - `autopilot`: Seeded AI input source for demos and soak tests

pub mod autopilot;
pub mod display;
pub mod settings;
pub mod sim;

pub use autopilot::Autopilot;
pub use display::{Cell, Strip};
pub use settings::{Settings, SettingsError, TrackSettings};
pub use sim::{Game, Paddle, Puck, Side, Track};

/// Game tuning constants
pub mod consts {
    /// Upper bound applied to a puck's signed velocity when computing displacement
    pub const MAX_VELOCITY: f64 = 5.0;
    /// Speed a freshly fired puck leaves its paddle with
    pub const INITIAL_VELOCITY: f64 = 1.0;

    /// Scales `length / reaction_time` into a rebound speed
    pub const SPEED_MULTIPLIER: f64 = 0.1;
    /// Guards the rebound speed division when impact coincides with activation
    pub const REBOUND_EPSILON: f64 = 0.000_000_01;

    /// Paddle defaults (seconds)
    pub const DEFAULT_PADDLE_LENGTH: f64 = 0.2;
    pub const DEFAULT_PADDLE_COOLDOWN: f64 = 0.1;

    /// No puck is fired from a side this soon after a goal against it (seconds)
    pub const POST_GOAL_FIRE_WAIT: f64 = 0.5;

    /// Tolerance for timestamp comparisons, absorbs float rounding in
    /// sums like `activated_at + length + cooldown`
    pub const TIME_EPSILON: f64 = 1e-9;

    /// Driver cadence (samples per second)
    pub const UPDATE_HZ: u32 = 30;
    pub const RENDER_HZ: u32 = 60;
}
