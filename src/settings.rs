//! Game settings
//!
//! Loaded from JSON; every field is optional and falls back to the defaults
//! of the single-track reference game.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("at least one track is required")]
    NoTracks,
    #[error("track width must be positive and finite, got {0}")]
    InvalidWidth(f64),
    #[error("paddle length must be positive and finite, got {0}")]
    InvalidPaddleLength(f64),
    #[error("paddle cooldown must be non-negative and finite, got {0}")]
    InvalidCooldown(f64),
    #[error("post-goal fire wait must be non-negative and finite, got {0}")]
    InvalidFireWait(f64),
    #[error("{0} rate must be at least 1 Hz")]
    InvalidRate(&'static str),
    #[error("display strip needs at least 2 cells, got {0}")]
    InvalidStrip(usize),
}

/// Configuration for one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackSettings {
    /// Length of the play line, `[0, width]`
    pub width: f64,
    /// Pucks in play, dealt alternately into the left and right queues
    pub puck_count: u32,
    /// Seconds a paddle stays extended
    pub paddle_length: f64,
    /// Seconds a paddle stays locked after retracting
    pub paddle_cooldown: f64,
    /// Seconds after a goal before the conceding side can fire again
    pub post_goal_fire_wait: f64,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            width: 2.0,
            puck_count: 2,
            paddle_length: DEFAULT_PADDLE_LENGTH,
            paddle_cooldown: DEFAULT_PADDLE_COOLDOWN,
            post_goal_fire_wait: POST_GOAL_FIRE_WAIT,
        }
    }
}

impl TrackSettings {
    pub fn with_width(width: f64, puck_count: u32) -> Self {
        Self {
            width,
            puck_count,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(SettingsError::InvalidWidth(self.width));
        }
        if !self.paddle_length.is_finite() || self.paddle_length <= 0.0 {
            return Err(SettingsError::InvalidPaddleLength(self.paddle_length));
        }
        if !self.paddle_cooldown.is_finite() || self.paddle_cooldown < 0.0 {
            return Err(SettingsError::InvalidCooldown(self.paddle_cooldown));
        }
        if !self.post_goal_fire_wait.is_finite() || self.post_goal_fire_wait < 0.0 {
            return Err(SettingsError::InvalidFireWait(self.post_goal_fire_wait));
        }
        Ok(())
    }
}

/// Whole-game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tracks: Vec<TrackSettings>,
    /// Simulation samples per second
    pub update_hz: u32,
    /// Display refreshes per second
    pub render_hz: u32,
    /// LED cells per track on the display strip
    pub strip_cells: usize,
    /// Autopilot seed
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tracks: vec![TrackSettings::default()],
            update_hz: UPDATE_HZ,
            render_hz: RENDER_HZ,
            // What fits across an 800px window
            strip_cells: 38,
            seed: 42,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!(
            "Loaded settings from {} ({} tracks)",
            path.display(),
            settings.tracks.len()
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tracks.is_empty() {
            return Err(SettingsError::NoTracks);
        }
        for track in &self.tracks {
            track.validate()?;
        }
        if self.update_hz == 0 {
            return Err(SettingsError::InvalidRate("update"));
        }
        if self.render_hz == 0 {
            return Err(SettingsError::InvalidRate("render"));
        }
        if self.strip_cells < 2 {
            return Err(SettingsError::InvalidStrip(self.strip_cells));
        }
        Ok(())
    }

    /// Seconds between simulation samples
    pub fn update_interval(&self) -> f64 {
        1.0 / self.update_hz as f64
    }
}
