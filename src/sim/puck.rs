//! Point mass on a one-dimensional track

use serde::{Deserialize, Serialize};

use crate::consts::MAX_VELOCITY;

/// A puck entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Puck {
    pub id: u32,
    /// Location along the track; `None` while held in a queue
    pub position: Option<f64>,
    /// Signed speed in track units per second. Only the upper bound is
    /// capped, and only when computing displacement.
    pub velocity: f64,
}

impl Puck {
    /// Create a puck in reserve (no position)
    pub fn new(id: u32) -> Self {
        Self {
            id,
            position: None,
            velocity: 0.0,
        }
    }

    #[inline]
    pub fn is_on_track(&self) -> bool {
        self.position.is_some()
    }

    /// Move the puck along the track by `dt` seconds
    pub fn advance(&mut self, dt: f64) {
        if let Some(position) = self.projected_position(dt) {
            self.position = Some(position);
        }
    }

    /// Where the puck would be after `dt` seconds, without moving it
    pub fn projected_position(&self, dt: f64) -> Option<f64> {
        self.position
            .map(|position| position + self.velocity.min(MAX_VELOCITY) * dt)
    }

    /// Put the puck on the track at `position`
    pub fn launch(&mut self, position: f64, velocity: f64) {
        self.position = Some(position);
        self.velocity = velocity;
    }

    /// Take the puck off the track
    pub fn stow(&mut self) {
        self.position = None;
        self.velocity = 0.0;
    }
}
