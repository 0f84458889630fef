//! Time-gated paddle
//!
//! A press extends the paddle for `length` seconds, after which it retracts
//! and stays locked for `cooldown` seconds. All gating is derived from the
//! activation timestamp, so re-pressing while locked is always a no-op.
//!
//! Retraction is a scheduled transition rather than a sleep: `press` records
//! when the paddle should come down and `poll` emits the deactivation once a
//! time sample reaches that point.

use serde::{Deserialize, Serialize};

use super::events::{EventBus, SubscriptionId};
use crate::consts::{REBOUND_EPSILON, SPEED_MULTIPLIER, TIME_EPSILON};
use crate::settings::SettingsError;

/// Activation notifications
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaddleEvent {
    /// Paddle extended at `time`
    Activated { time: f64 },
    /// Paddle activated at `activated_at` retracted at `time`
    Deactivated { activated_at: f64, time: f64 },
}

/// Where a paddle is in its press cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddlePhase {
    /// Can be pressed
    Ready,
    /// Extended, blocks goals
    Extended,
    /// Retracted but still locked out
    Cooldown,
}

#[derive(Debug)]
pub struct Paddle {
    /// Seconds the paddle stays extended after a press
    length: f64,
    /// Seconds after retracting before the paddle can be pressed again
    cooldown: f64,
    activated_at: Option<f64>,
    /// Retraction scheduled by the last press, not yet reported
    pending_off: Option<f64>,
    rebounded: bool,
    events: EventBus<PaddleEvent>,
}

impl Paddle {
    pub fn new(length: f64, cooldown: f64) -> Result<Self, SettingsError> {
        if !length.is_finite() || length <= 0.0 {
            return Err(SettingsError::InvalidPaddleLength(length));
        }
        if !cooldown.is_finite() || cooldown < 0.0 {
            return Err(SettingsError::InvalidCooldown(cooldown));
        }
        Ok(Self {
            length,
            cooldown,
            activated_at: None,
            pending_off: None,
            rebounded: false,
            events: EventBus::new(),
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn cooldown(&self) -> f64 {
        self.cooldown
    }

    pub fn activated_at(&self) -> Option<f64> {
        self.activated_at
    }

    /// Whether a rebound speed has been drawn since the last press
    pub fn has_rebounded(&self) -> bool {
        self.rebounded
    }

    /// When the current extension ends (0 if never pressed)
    pub fn next_off_time(&self) -> f64 {
        self.activated_at.map_or(0.0, |at| at + self.length)
    }

    /// When the paddle can next be pressed (0 if never pressed)
    pub fn next_available_time(&self) -> f64 {
        self.activated_at
            .map_or(0.0, |_| self.next_off_time() + self.cooldown)
    }

    pub fn is_active(&self, time: f64) -> bool {
        self.activated_at.is_some() && self.next_off_time() - time > TIME_EPSILON
    }

    pub fn is_locked(&self, time: f64) -> bool {
        self.activated_at.is_some() && self.next_available_time() - time > TIME_EPSILON
    }

    pub fn phase(&self, time: f64) -> PaddlePhase {
        if self.is_active(time) {
            PaddlePhase::Extended
        } else if self.is_locked(time) {
            PaddlePhase::Cooldown
        } else {
            PaddlePhase::Ready
        }
    }

    /// Extend the paddle. Returns false (and changes nothing) while locked.
    pub fn press(&mut self, time: f64) -> bool {
        if self.is_locked(time) {
            return false;
        }

        // A retraction nobody polled for still gets reported, in order
        self.flush_pending();

        self.activated_at = Some(time);
        self.pending_off = Some(time + self.length);
        self.rebounded = false;
        self.events.emit(&PaddleEvent::Activated { time });
        true
    }

    /// Report the scheduled retraction once `time` has reached it
    pub fn poll(&mut self, time: f64) -> Option<PaddleEvent> {
        if self.pending_off.is_none() || self.is_active(time) {
            return None;
        }
        self.flush_pending()
    }

    fn flush_pending(&mut self) -> Option<PaddleEvent> {
        let time = self.pending_off.take()?;
        let event = PaddleEvent::Deactivated {
            activated_at: self.activated_at.unwrap_or(0.0),
            time,
        };
        self.events.emit(&event);
        Some(event)
    }

    /// Launch speed for a puck hitting the paddle at `time`. Hitting right as
    /// the paddle comes out gives the strongest return.
    pub fn rebound_speed(&mut self, time: f64) -> f64 {
        self.rebounded = true;
        let elapsed = time - self.activated_at.unwrap_or(0.0);
        self.length / (elapsed + REBOUND_EPSILON) * SPEED_MULTIPLIER
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&PaddleEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Forget activation history. Listeners stay registered.
    pub fn reset(&mut self) {
        self.activated_at = None;
        self.pending_off = None;
        self.rebounded = false;
    }
}
