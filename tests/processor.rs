use std::{cell::RefCell, rc::Rc};

use cgmath::Vector2;
use rosu::{
    config::Config,
    hit_objects::{HitSound, MapObject, SliderPath},
    map_state::{MapState, MapTimeline},
    osu_input::KeyboardState,
    processor::{autoplay, GameplayProcessor, Soundboard},
    scoring::RuleSet,
};

const FRAME_TIME: f64 = 1000.0 / 60.0;
const END_TIME: f64 = 6000.0;

#[derive(Clone, Default)]
struct RecordingSoundboard {
    played: Rc<RefCell<Vec<(String, f32)>>>,
}

impl Soundboard for RecordingSoundboard {
    fn play_sound(&mut self, name: &str, volume: f32) {
        self.played.borrow_mut().push((name.to_owned(), volume));
    }
}

fn test_map() -> Vec<MapObject> {
    vec![
        MapObject::circle(1000.0, 100.0, 100.0),
        MapObject::slider(
            2000.0,
            200.0,
            200.0,
            SliderPath::linear(1000.0, 1, Vector2::new(200.0, 0.0)),
        ),
        MapObject::circle(4000.0, 300.0, 300.0).with_hit_sound(HitSound {
            whistle: true,
            ..Default::default()
        }),
    ]
}

fn processor(config: &Config) -> (GameplayProcessor<RuleSet>, RecordingSoundboard) {
    processor_with(test_map(), config)
}

fn processor_with(
    objects: Vec<MapObject>,
    config: &Config,
) -> (GameplayProcessor<RuleSet>, RecordingSoundboard) {
    let map_state = MapState::new(Rc::new(RuleSet::default()), objects, MapTimeline::new()).unwrap();

    let soundboard = RecordingSoundboard::default();
    let processor = GameplayProcessor::new(map_state, soundboard.clone(), config);

    (processor, soundboard)
}

#[test]
fn test_autoplay_full_combo() {
    let (mut processor, soundboard) = processor(&Config::default());

    let events = autoplay::generate(processor.map_state());
    autoplay::run(&mut processor, &events, FRAME_TIME, END_TIME).unwrap();

    let map_state = processor.map_state();
    assert!(map_state.is_finished());

    // 3 x300, slider tick and slider end
    assert_eq!(map_state.score(END_TIME), 300 * 4 + 10 + 30);
    assert_eq!(map_state.accuracy(END_TIME), 1.0);
    assert_eq!(map_state.max_combo(END_TIME), 6);

    let stats = processor.stats(END_TIME);
    assert_eq!(stats.score, 1240);
    assert_eq!(stats.accuracy, 1.0);
    assert_eq!(stats.combo, 6);

    let names: Vec<String> = soundboard.played.borrow().iter().map(|x| x.0.clone()).collect();
    assert_eq!(
        names,
        vec![
            "normal-hitnormal",
            "normal-hitnormal",
            "normal-slidertick",
            "normal-hitnormal",
            "normal-hitnormal",
            "normal-hitwhistle",
        ]
    );
}

#[test]
fn test_hit_sound_volume_is_split() {
    let config = Config {
        hit_sound_volume: 0.5,
        ..Default::default()
    };
    let (mut processor, soundboard) = processor(&config);

    let events = autoplay::generate(processor.map_state());
    autoplay::run(&mut processor, &events, FRAME_TIME, END_TIME).unwrap();

    let played = soundboard.played.borrow();

    // Single sound
    assert_eq!(played[0].1, 0.5);
    // Whistle circle plays two sounds
    assert_eq!(played[4].1, 0.25);
    assert_eq!(played[5].1, 0.25);
}

#[test]
fn test_no_input_misses_everything() {
    let (mut processor, soundboard) = processor(&Config::default());

    autoplay::run(&mut processor, &[], FRAME_TIME, END_TIME).unwrap();

    let map_state = processor.map_state();
    assert!(map_state.is_finished());
    assert_eq!(map_state.score(END_TIME), 0);
    assert_eq!(map_state.accuracy(END_TIME), 0.0);
    assert_eq!(map_state.max_combo(END_TIME), 0);

    assert!(soundboard.played.borrow().is_empty());
}

#[test]
fn test_held_key_does_not_click_again() {
    let (mut processor, _) = processor(&Config::default());
    let k1 = KeyboardState {
        k1: true,
        ..Default::default()
    };

    processor.store_cursor_moved(990.0, Vector2::new(100.0, 100.0));

    let marker = processor.store_keyboard_pressed(1000.0, k1).unwrap();
    assert_eq!(marker.map(|x| x.score), Some(300));

    processor.store_cursor_moved(1990.0, Vector2::new(200.0, 200.0));

    // k1 is still down
    assert!(processor.store_keyboard_pressed(2000.0, k1).unwrap().is_none());

    processor.store_keyboard_released(2010.0, k1);

    let marker = processor.store_keyboard_pressed(2020.0, k1).unwrap();
    assert_eq!(marker.map(|x| x.score), Some(300));
}

#[test]
fn test_stats_follow_markers() {
    let (mut processor, _) = processor(&Config::default());
    let k2 = KeyboardState {
        k2: true,
        ..Default::default()
    };

    processor.store_cursor_moved(1000.0, Vector2::new(100.0, 100.0));
    processor.store_keyboard_pressed(1060.0, k2).unwrap();
    processor.tick(1100.0).unwrap();

    let stats = processor.stats(1100.0);
    assert_eq!(stats.score, 100);
    assert_eq!(stats.combo, 1);

    // Slider and its parts are never touched
    processor.tick(END_TIME).unwrap();

    let stats = processor.stats(END_TIME);
    assert_eq!(stats.score, 100);
    assert_eq!(stats.combo, 0);
    assert_eq!(processor.stats(0.0).accuracy, 1.0);
    assert_eq!(processor.score_history().len(), 5);
}

#[test]
fn test_finish_stops_sounds() {
    let (mut processor, soundboard) = processor(&Config::default());

    processor.finish();

    let events = autoplay::generate(processor.map_state());
    autoplay::run(&mut processor, &events, FRAME_TIME, END_TIME).unwrap();

    assert!(soundboard.played.borrow().is_empty());
    assert!(processor.score_history().is_empty());
    assert_eq!(processor.map_state().score(END_TIME), 1240);
}

#[test]
fn test_click_after_expired_object_keeps_stats_in_sync() {
    let (mut processor, _) = processor_with(
        vec![
            MapObject::circle(1000.0, 100.0, 100.0),
            MapObject::circle(1100.0, 300.0, 300.0),
        ],
        &Config::default(),
    );
    let k1 = KeyboardState {
        k1: true,
        ..Default::default()
    };

    // First circle expired at 1150 without a frame in between
    processor.store_cursor_moved(1155.0, Vector2::new(300.0, 300.0));
    let marker = processor.store_keyboard_pressed(1155.0, k1).unwrap();
    assert_eq!(marker.map(|x| x.score), Some(100));

    processor.tick(1160.0).unwrap();

    let map_state = processor.map_state();
    let stats = processor.stats(1160.0);

    assert_eq!(stats.score, map_state.score(1160.0));
    assert_eq!(stats.accuracy, map_state.accuracy(1160.0));
    assert_eq!(stats.combo, map_state.combo(1160.0));
    assert_eq!(stats.accuracy, 100.0 / 600.0);
    assert_eq!(stats.combo, 1);
}
