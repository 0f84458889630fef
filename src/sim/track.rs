//! A single track: pucks, paddles, goals and rebounds
//!
//! Every puck is in exactly one of three groups: queued on the left, queued
//! on the right, or active. Only active pucks have a position.

use serde::{Deserialize, Serialize};

use super::events::{EventBus, SubscriptionId};
use super::paddle::{Paddle, PaddleEvent, PaddlePhase};
use super::puck::Puck;
use super::side::{Side, Sided};
use crate::consts::INITIAL_VELOCITY;
use crate::settings::{SettingsError, TrackSettings};

/// Things that happen on a track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TrackEvent {
    /// A queued puck was put into play from `side`
    Fired { side: Side, time: f64, puck: u32 },
    /// A puck was returned by the paddle on `side`
    Rebound {
        side: Side,
        time: f64,
        speed: f64,
        puck: u32,
    },
    /// A puck got past `side`; the other side scores
    Goal { side: Side, time: f64, puck: u32 },
}

/// Renderer-facing view of a track at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSnapshot {
    pub width: f64,
    pub queued: Sided<usize>,
    pub active: Vec<Puck>,
    pub paddles: Sided<PaddlePhase>,
}

#[derive(Debug)]
pub struct Track {
    width: f64,
    puck_count: u32,
    post_goal_fire_wait: f64,
    queued: Sided<Vec<Puck>>,
    active: Vec<Puck>,
    paddles: Sided<Paddle>,
    last_goal: Sided<Option<f64>>,
    last_update: Option<f64>,
    events: EventBus<TrackEvent>,
}

impl Track {
    pub fn new(settings: &TrackSettings) -> Result<Self, SettingsError> {
        settings.validate()?;

        let paddles = Sided::new(
            Paddle::new(settings.paddle_length, settings.paddle_cooldown)?,
            Paddle::new(settings.paddle_length, settings.paddle_cooldown)?,
        );

        let mut track = Self {
            width: settings.width,
            puck_count: settings.puck_count,
            post_goal_fire_wait: settings.post_goal_fire_wait,
            queued: Sided::default(),
            active: Vec::new(),
            paddles,
            last_goal: Sided::default(),
            last_update: None,
            events: EventBus::new(),
        };
        track.deal();

        log::info!(
            "Track created: width={}, pucks={}, paddle={}s",
            track.width,
            track.puck_count,
            settings.paddle_length
        );
        Ok(track)
    }

    /// Hand out pucks alternately, left first
    fn deal(&mut self) {
        for i in 0..self.puck_count {
            let side = if i % 2 == 0 { Side::Left } else { Side::Right };
            self.queued[side].insert(0, Puck::new(i + 1));
        }
    }

    /// Put every puck back in its starting queue and forget all timing.
    /// The next `update` only primes the clock.
    pub fn reset(&mut self) {
        self.queued = Sided::default();
        self.active.clear();
        self.deal();
        for side in Side::ALL {
            self.paddles[side].reset();
        }
        self.last_goal = Sided::default();
        self.last_update = None;
        log::info!("Track reset");
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn puck_count(&self) -> u32 {
        self.puck_count
    }

    pub fn queued(&self, side: Side) -> &[Puck] {
        &self.queued[side]
    }

    pub fn queued_count(&self, side: Side) -> usize {
        self.queued[side].len()
    }

    pub fn active_pucks(&self) -> &[Puck] {
        &self.active
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        &self.paddles[side]
    }

    pub fn last_goal_time(&self, side: Side) -> Option<f64> {
        self.last_goal[side]
    }

    pub fn last_update_time(&self) -> Option<f64> {
        self.last_update
    }

    /// The end of the track belonging to `side`
    #[inline]
    pub fn boundary(&self, side: Side) -> f64 {
        match side {
            Side::Left => 0.0,
            Side::Right => self.width,
        }
    }

    /// Whether `position` lies beyond `side`'s end of the track
    #[inline]
    fn is_past(&self, side: Side, position: f64) -> bool {
        match side {
            Side::Left => position < 0.0,
            Side::Right => position > self.width,
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&TrackEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn subscribe_paddle(
        &mut self,
        side: Side,
        listener: impl FnMut(&PaddleEvent) + 'static,
    ) -> SubscriptionId {
        self.paddles[side].subscribe(listener)
    }

    /// Input entrypoint: press `side`'s paddle. A successful activation also
    /// tries to put a queued puck into play from that side.
    pub fn press(&mut self, side: Side, time: f64) -> bool {
        if !self.paddles[side].press(time) {
            log::trace!("{side} paddle locked at {time:.3}");
            return false;
        }
        self.fire_if_ready(side, time);
        true
    }

    /// Fire the next queued puck from `side` unless that side just conceded
    /// or an active puck is about to reach its paddle. Returns whether a
    /// puck was fired.
    pub fn fire_if_ready(&mut self, side: Side, time: f64) -> bool {
        if self.queued[side].is_empty() {
            return false;
        }

        if let Some(last_goal) = self.last_goal[side] {
            if time - last_goal < self.post_goal_fire_wait {
                log::trace!("{side} fire suppressed: goal at {last_goal:.3}");
                return false;
            }
        }

        let rebound_delta = self.paddles[side].next_available_time() - time;
        if rebound_delta > 0.0 {
            let imminent = self.active.iter().any(|puck| {
                puck.projected_position(rebound_delta)
                    .is_some_and(|position| self.is_past(side, position))
            });
            if imminent {
                log::trace!("{side} fire suppressed: rebound imminent");
                return false;
            }
        }

        let mut puck = self.queued[side].remove(0);
        puck.launch(self.boundary(side), INITIAL_VELOCITY * side.direction());
        let event = TrackEvent::Fired {
            side,
            time,
            puck: puck.id,
        };
        log::debug!("Puck {} fired from {side} at {time:.3}", puck.id);
        self.active.insert(0, puck);
        self.events.emit(&event);
        true
    }

    /// Advance all active pucks to `time` and resolve boundary crossings.
    /// Returns the rebounds and goals this produced, in the order they were
    /// emitted.
    pub fn update(&mut self, time: f64) -> Vec<TrackEvent> {
        let Some(last_update) = self.last_update else {
            self.last_update = Some(time);
            return Vec::new();
        };

        let mut dt = time - last_update;
        if dt < 0.0 {
            log::warn!("Time went backwards ({last_update:.3} -> {time:.3}), holding pucks still");
            dt = 0.0;
        } else {
            self.last_update = Some(time);
        }

        for side in Side::ALL {
            self.paddles[side].poll(time);
        }

        let mut events = Vec::new();
        let mut i = 0;
        while i < self.active.len() {
            self.active[i].advance(dt);
            let Some(position) = self.active[i].position else {
                i += 1;
                continue;
            };
            if !self.is_past(Side::Left, position) && !self.is_past(Side::Right, position) {
                i += 1;
                continue;
            }

            let side = if self.is_past(Side::Right, position) {
                Side::Right
            } else {
                Side::Left
            };

            let event = if self.paddles[side].is_active(time) {
                let speed = self.paddles[side].rebound_speed(time);
                let boundary = self.boundary(side);
                let puck = &mut self.active[i];
                puck.velocity = -speed.copysign(puck.velocity);
                puck.position = Some(boundary);
                i += 1;
                log::debug!("Puck {} rebounded off {side} at {speed:.3}", puck.id);
                TrackEvent::Rebound {
                    side,
                    time,
                    speed,
                    puck: puck.id,
                }
            } else {
                let mut puck = self.active.remove(i);
                puck.stow();
                let id = puck.id;
                self.queued[side].insert(0, puck);
                self.last_goal[side] = Some(time);
                log::debug!("Goal against {side} at {time:.3} (puck {id})");
                TrackEvent::Goal {
                    side,
                    time,
                    puck: id,
                }
            };

            self.events.emit(&event);
            events.push(event);
        }

        events
    }

    pub fn snapshot(&self, time: f64) -> TrackSnapshot {
        TrackSnapshot {
            width: self.width,
            queued: self.queued.map(Vec::len),
            active: self.active.clone(),
            paddles: Sided::from_fn(|side| self.paddles[side].phase(time)),
        }
    }
}
