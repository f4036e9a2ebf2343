pub mod autoplay;
mod replay_log;

use std::{cell::RefCell, rc::Rc};

use cgmath::Vector2;

use crate::{
    config::Config,
    events::Subscription,
    hit_objects::HitMarker,
    history::History,
    map_state::{Category, MapState, MapStateError},
    osu_input::{KeyboardState, OsuInput},
    scoring::ScoringPolicy,
};

pub use replay_log::ReplayLog;

/// Sink for hit sounds, actual audio playback lives elsewhere
pub trait Soundboard {
    fn play_sound(&mut self, name: &str, volume: f32);
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GameplayStats {
    pub time: f64,
    pub score: u64,
    pub accuracy: f64,
    pub combo: u32,
}

/// Drives one map attempt.
///
/// Responsible for
/// 1. Handling inputs and turning key presses into clicks
/// 2. Resolving slides and misses each tick before the timeline
/// dispatches due hit markers
/// 3. Keeping score, accuracy and combo history
pub struct GameplayProcessor<P> {
    map_state: MapState<P>,
    replay_log: ReplayLog,

    last_cursor_pos: Vector2<f64>,
    track_input: bool,

    score_history: History<u64>,
    accuracy_history: History<f64>,
    combo_history: History<u32>,

    /// Filled by the map state observer, drained after every mutation
    created: Rc<RefCell<Vec<HitMarker>>>,
    subscriptions: Vec<Subscription>,
}

impl<P: ScoringPolicy + 'static> GameplayProcessor<P> {
    pub fn new<S>(mut map_state: MapState<P>, mut soundboard: S, config: &Config) -> Self
    where
        S: Soundboard + 'static,
    {
        let created = Rc::new(RefCell::new(Vec::new()));
        let mut subscriptions = Vec::new();

        let queue = created.clone();
        subscriptions.push(map_state.subscribe(move |marker| {
            queue.borrow_mut().push(marker.clone());
        }));

        let policy = map_state.policy().clone();
        let volume_scale = config.hit_sound_volume;

        subscriptions.push(map_state.timeline_mut().subscribe(
            Category::HitMarkerCreation,
            move |item| {
                let Some(marker) = item.as_hit_marker() else {
                    return;
                };

                let names = policy.hit_sound_names(marker);

                if names.is_empty() {
                    return;
                }

                // Object time is more mapper friendly than marker time
                let volume = policy.hit_sound_volume(marker.object.time) * volume_scale
                    / names.len() as f32;

                for name in &names {
                    soundboard.play_sound(name, volume);
                }
            },
        ));

        Self {
            map_state,
            replay_log: ReplayLog::default(),
            last_cursor_pos: Vector2::new(0.0, 0.0),
            track_input: config.track_input,
            score_history: History::default(),
            accuracy_history: History::default(),
            combo_history: History::default(),
            created,
            subscriptions,
        }
    }

    /// Should be called every frame, before reading anything
    /// from the map state for rendering
    pub fn tick(&mut self, time: f64) -> Result<(), MapStateError> {
        self.map_state.process_slides(time, &self.replay_log)?;
        self.map_state.process_misses(time)?;
        self.map_state.timeline_mut().update(time);

        self.drain_created();

        Ok(())
    }

    pub fn store_cursor_moved(&mut self, ts: f64, pos: Vector2<f64>) {
        self.last_cursor_pos = pos;

        let keys = self
            .replay_log
            .last_input()
            .map_or(KeyboardState::empty(), |x| x.keys);

        self.store_input(OsuInput {
            ts,
            pos,
            keys,
            hold: keys,
        });
    }

    /// Stores a key press and clicks if any key went down
    pub fn store_keyboard_pressed(
        &mut self,
        ts: f64,
        state: KeyboardState,
    ) -> Result<Option<HitMarker>, MapStateError> {
        let last = self
            .replay_log
            .last_input()
            .map_or(KeyboardState::empty(), |x| x.keys);

        let input = OsuInput {
            ts,
            pos: self.last_cursor_pos,
            keys: KeyboardState {
                k1: last.k1 || state.k1,
                k2: last.k2 || state.k2,
                m1: last.m1 || state.m1,
                m2: last.m2 || state.m2,
            },
            hold: last,
        };

        let is_click = input.is_key_hit_no_hold();
        self.store_input(input);

        if !is_click {
            return Ok(None);
        }

        // Everything expired before the click has to be resolved
        // first, otherwise its marker lands behind the click marker
        self.map_state.process_slides(ts, &self.replay_log)?;
        self.map_state.process_misses(ts)?;

        let marker = self.map_state.click_at(self.last_cursor_pos, ts)?;
        self.drain_created();

        Ok(marker)
    }

    /// `true` in `state` means that particular key is released
    pub fn store_keyboard_released(&mut self, ts: f64, state: KeyboardState) {
        let Some(last) = self.replay_log.last_input().map(|x| x.keys) else {
            tracing::warn!("Trying to store release without previous input");
            return;
        };

        let keys = KeyboardState {
            k1: last.k1 && !state.k1,
            k2: last.k2 && !state.k2,
            m1: last.m1 && !state.m1,
            m2: last.m2 && !state.m2,
        };

        self.store_input(OsuInput {
            ts,
            pos: self.last_cursor_pos,
            keys,
            hold: keys,
        });
    }

    fn store_input(&mut self, input: OsuInput) {
        if self.track_input {
            self.replay_log.store_input(input);
        } else if let Some(last) = self.replay_log.last_input() {
            // Key state still has to be known for press detection
            if last.keys != input.keys {
                self.replay_log.store_input(input);
            }
        } else {
            self.replay_log.store_input(input);
        }
    }

    fn drain_created(&mut self) {
        let created: Vec<HitMarker> = self.created.borrow_mut().drain(..).collect();

        for marker in created {
            let time = marker.time;

            self.score_history.add(time, self.map_state.score(time));
            self.accuracy_history.add(time, self.map_state.accuracy(time));
            self.combo_history.add(time, self.map_state.combo(time));
        }
    }

    pub fn stats(&self, time: f64) -> GameplayStats {
        GameplayStats {
            time,
            score: self.score_history.data_at_time(time).copied().unwrap_or(0),
            accuracy: self.accuracy_history.data_at_time(time).copied().unwrap_or(1.0),
            combo: self.combo_history.data_at_time(time).copied().unwrap_or(0),
        }
    }

    /// Stops listening for map state and timeline events
    pub fn finish(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
    }

    pub fn map_state(&self) -> &MapState<P> {
        &self.map_state
    }

    pub fn replay_log(&self) -> &ReplayLog {
        &self.replay_log
    }

    pub fn score_history(&self) -> &History<u64> {
        &self.score_history
    }

    pub fn accuracy_history(&self) -> &History<f64> {
        &self.accuracy_history
    }

    pub fn combo_history(&self) -> &History<u32> {
        &self.combo_history
    }
}
