//! AI input source
//!
//! Plays both sides of every track: presses a paddle when a puck is about to
//! reach it and serves queued pucks now and then. Seeded so runs replay
//! exactly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::MAX_VELOCITY;
use crate::sim::{Game, Side, Track};

/// Chance per sample of serving a queued puck when nothing is incoming
const SERVE_CHANCE: f64 = 0.05;

#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    /// Chance per sample of reacting to an incoming puck (0-1)
    skill: f64,
}

impl Autopilot {
    /// `skill` is clamped to 0-1; NaN means no skill
    pub fn new(seed: u64, skill: f64) -> Self {
        let skill = if skill.is_nan() {
            0.0
        } else {
            skill.clamp(0.0, 1.0)
        };
        Self {
            rng: Pcg32::seed_from_u64(seed),
            skill,
        }
    }

    /// Paddle presses to make at `time`, as (track index, side)
    pub fn inputs(&mut self, game: &Game, time: f64) -> Vec<(usize, Side)> {
        let mut presses = Vec::new();
        for (index, track) in game.tracks().iter().enumerate() {
            for side in Side::ALL {
                if track.paddle(side).is_locked(time) {
                    continue;
                }

                let press = if incoming(track, side) {
                    self.rng.random_bool(self.skill)
                } else {
                    track.queued_count(side) > 0 && self.rng.random_bool(SERVE_CHANCE)
                };
                if press {
                    presses.push((index, side));
                }
            }
        }
        presses
    }
}

/// Whether some puck will reach `side`'s end within half a paddle extension
fn incoming(track: &Track, side: Side) -> bool {
    let window = track.paddle(side).length() / 2.0;
    track.active_pucks().iter().any(|puck| {
        let Some(position) = puck.position else {
            return false;
        };
        let speed = puck.velocity.min(MAX_VELOCITY);
        let (distance, closing) = match side {
            Side::Left => (position, -speed),
            Side::Right => (track.width() - position, speed),
        };
        closing > 0.0 && distance / closing <= window
    })
}
