//! Tracks and players; turns goals into scores

use serde::{Deserialize, Serialize};

use super::events::{EventBus, SubscriptionId};
use super::paddle::PaddleEvent;
use super::side::{Side, Sided};
use super::track::{Track, TrackEvent, TrackSnapshot};
use crate::settings::{Settings, SettingsError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub score: u32,
}

impl Player {
    pub fn goal(&mut self) {
        self.score += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A goal was conceded by `side` on track `track`
    Goal { track: usize, side: Side, time: f64 },
    /// `side`'s score is now `score`
    ScoreChanged { side: Side, score: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub scores: Sided<u32>,
    pub tracks: Vec<TrackSnapshot>,
}

#[derive(Debug)]
pub struct Game {
    players: Sided<Player>,
    tracks: Vec<Track>,
    events: EventBus<GameEvent>,
}

impl Game {
    pub fn new(settings: &Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let tracks = settings
            .tracks
            .iter()
            .map(Track::new)
            .collect::<Result<Vec<_>, _>>()?;

        log::info!("Game created with {} track(s)", tracks.len());
        Ok(Self {
            players: Sided::default(),
            tracks,
            events: EventBus::new(),
        })
    }

    /// Advance every track to `time`. Returns each track's events tagged
    /// with the track index.
    ///
    /// Scores are credited after all tracks have updated, so track listeners
    /// run before the goals they report are counted.
    pub fn update(&mut self, time: f64) -> Vec<(usize, TrackEvent)> {
        let mut events = Vec::new();
        for (index, track) in self.tracks.iter_mut().enumerate() {
            events.extend(track.update(time).into_iter().map(|event| (index, event)));
        }

        for &(index, event) in &events {
            if let TrackEvent::Goal { side, time, .. } = event {
                self.on_goal(index, side, time);
            }
        }
        events
    }

    /// Credit the side that did not concede
    fn on_goal(&mut self, track: usize, side: Side, time: f64) {
        let scorer = side.opponent();
        self.players[scorer].goal();
        let score = self.players[scorer].score;
        log::info!("Goal on track {track}: {scorer} now has {score}");

        self.events.emit(&GameEvent::Goal { track, side, time });
        self.events
            .emit(&GameEvent::ScoreChanged { side: scorer, score });
    }

    /// Input entrypoint: press a paddle on one track
    pub fn press(&mut self, track: usize, side: Side, time: f64) -> bool {
        match self.tracks.get_mut(track) {
            Some(t) => t.press(side, time),
            None => {
                log::warn!("Press on unknown track {track} ignored");
                false
            }
        }
    }

    pub fn players(&self) -> &Sided<Player> {
        &self.players
    }

    pub fn score(&self, side: Side) -> u32 {
        self.players[side].score
    }

    /// The side ahead on points, if any
    pub fn leader(&self) -> Option<Side> {
        let (left, right) = (self.score(Side::Left), self.score(Side::Right));
        match left.cmp(&right) {
            std::cmp::Ordering::Greater => Some(Side::Left),
            std::cmp::Ordering::Less => Some(Side::Right),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Listen to one track's events. `None` if there is no such track.
    pub fn subscribe_track(
        &mut self,
        index: usize,
        listener: impl FnMut(&TrackEvent) + 'static,
    ) -> Option<SubscriptionId> {
        self.tracks.get_mut(index).map(|t| t.subscribe(listener))
    }

    /// Listen to one paddle on one track. `None` if there is no such track.
    pub fn subscribe_paddle(
        &mut self,
        index: usize,
        side: Side,
        listener: impl FnMut(&PaddleEvent) + 'static,
    ) -> Option<SubscriptionId> {
        self.tracks
            .get_mut(index)
            .map(|t| t.subscribe_paddle(side, listener))
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Zero the scores and reset every track
    pub fn reset(&mut self) {
        self.players = Sided::default();
        for track in &mut self.tracks {
            track.reset();
        }
    }

    pub fn snapshot(&self, time: f64) -> GameSnapshot {
        GameSnapshot {
            scores: self.players.map(|p| p.score),
            tracks: self.tracks.iter().map(|t| t.snapshot(time)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TrackSettings;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn game(tracks: Vec<TrackSettings>) -> Game {
        Game::new(&Settings {
            tracks,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_game() {
        let game = Game::new(&Settings::default()).unwrap();
        assert_eq!(game.tracks().len(), 1);
        let track = &game.tracks()[0];
        assert_eq!(track.width(), 2.0);
        assert_eq!(track.queued_count(Side::Left), 1);
        assert_eq!(track.queued_count(Side::Right), 1);
        assert_eq!(track.paddle(Side::Left).length(), 0.2);
        assert_eq!(game.score(Side::Left), 0);
        assert_eq!(game.leader(), None);
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let result = Game::new(&Settings {
            tracks: vec![TrackSettings::with_width(-1.0, 1)],
            ..Default::default()
        });
        assert!(matches!(result, Err(SettingsError::InvalidWidth(_))));
    }

    #[test]
    fn test_goal_credits_non_conceding_side() {
        let mut game = game(vec![TrackSettings::with_width(2.0, 1)]);
        assert!(game.press(0, Side::Left, 0.0));
        game.update(0.0);
        let events = game.update(2.5);

        assert!(matches!(
            events.as_slice(),
            [(0, TrackEvent::Goal { side: Side::Right, .. })]
        ));
        assert_eq!(game.score(Side::Left), 1);
        assert_eq!(game.score(Side::Right), 0);
        assert_eq!(game.leader(), Some(Side::Left));
    }

    #[test]
    fn test_goals_across_tracks() {
        let mut game = game(vec![
            TrackSettings::with_width(2.0, 1),
            TrackSettings::with_width(4.0, 2),
        ]);
        game.press(0, Side::Left, 0.0);
        game.press(1, Side::Right, 0.0);
        game.update(0.0);

        // Track 0 puck crosses the right end; track 1 puck is only at 1.5
        game.update(2.5);
        assert_eq!(game.score(Side::Left), 1);
        assert_eq!(game.score(Side::Right), 0);

        game.update(4.5);
        assert_eq!(game.score(Side::Right), 1);

        let snapshot = game.snapshot(4.5);
        assert_eq!(snapshot.scores, Sided::new(1, 1));
        assert_eq!(snapshot.tracks.len(), 2);
    }

    #[test]
    fn test_press_unknown_track() {
        let mut game = game(vec![TrackSettings::default()]);
        assert!(!game.press(3, Side::Left, 0.0));
    }

    #[test]
    fn test_game_events() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut game = game(vec![TrackSettings::with_width(2.0, 1)]);
        let sink = Rc::clone(&log);
        game.subscribe(move |e| sink.borrow_mut().push(*e));

        game.press(0, Side::Left, 0.0);
        game.update(0.0);
        game.update(2.5);

        assert_eq!(
            *log.borrow(),
            vec![
                GameEvent::Goal {
                    track: 0,
                    side: Side::Right,
                    time: 2.5
                },
                GameEvent::ScoreChanged {
                    side: Side::Left,
                    score: 1
                },
            ]
        );
    }

    #[test]
    fn test_every_track_goal_is_credited() {
        let mut game = game(vec![
            TrackSettings::with_width(2.0, 2),
            TrackSettings::with_width(1.0, 2),
        ]);
        let conceded = Rc::new(RefCell::new([0u32; 2]));
        for index in 0..2 {
            let sink = Rc::clone(&conceded);
            let id = game.subscribe_track(index, move |e| {
                if let TrackEvent::Goal { side, .. } = e {
                    sink.borrow_mut()[side.index()] += 1;
                }
            });
            assert!(id.is_some());
        }
        assert!(game.subscribe_track(2, |_| {}).is_none());

        game.press(0, Side::Left, 0.0);
        game.press(1, Side::Right, 0.0);
        game.update(0.0);
        game.update(2.5);
        game.press(0, Side::Right, 3.0);
        game.update(3.0);
        game.update(6.0);

        let conceded = conceded.borrow();
        assert!(conceded.iter().sum::<u32>() >= 2);
        assert_eq!(game.score(Side::Left), conceded[Side::Right.index()]);
        assert_eq!(game.score(Side::Right), conceded[Side::Left.index()]);
    }

    #[test]
    fn test_track_listeners_run_before_scoring() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut game = game(vec![TrackSettings::with_width(2.0, 1)]);

        let track_sink = Rc::clone(&log);
        game.subscribe_track(0, move |e| {
            if matches!(e, TrackEvent::Goal { .. }) {
                track_sink.borrow_mut().push("track goal");
            }
        });
        let game_sink = Rc::clone(&log);
        game.subscribe(move |e| {
            if matches!(e, GameEvent::ScoreChanged { .. }) {
                game_sink.borrow_mut().push("score");
            }
        });

        game.press(0, Side::Left, 0.0);
        game.update(0.0);
        game.update(2.5);
        assert_eq!(*log.borrow(), vec!["track goal", "score"]);
    }

    #[test]
    fn test_paddle_subscription_through_game() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut game = game(vec![TrackSettings::default()]);
        let sink = Rc::clone(&log);
        assert!(game
            .subscribe_paddle(0, Side::Right, move |e| sink.borrow_mut().push(*e))
            .is_some());
        assert!(game.subscribe_paddle(1, Side::Right, |_| {}).is_none());

        game.press(0, Side::Right, 1.0);
        assert_eq!(*log.borrow(), vec![PaddleEvent::Activated { time: 1.0 }]);
    }

    #[test]
    fn test_reset_zeroes_scores() {
        let mut game = game(vec![TrackSettings::with_width(2.0, 1)]);
        game.press(0, Side::Left, 0.0);
        game.update(0.0);
        game.update(2.5);
        assert_eq!(game.score(Side::Left), 1);

        game.reset();
        assert_eq!(game.score(Side::Left), 0);
        assert_eq!(game.tracks()[0].queued_count(Side::Left), 1);
        assert_eq!(game.tracks()[0].last_update_time(), None);
    }
}
