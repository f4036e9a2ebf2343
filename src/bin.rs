use std::{collections::HashMap, process::ExitCode, rc::Rc};

use rosu::{
    config::Config,
    hit_objects::MapObject,
    map_state::{MapState, MapTimeline},
    processor::{autoplay, GameplayProcessor, Soundboard},
    scoring::{RuleSet, ScoringPolicy},
};
use rosu_map::Beatmap;

/// 60 fps
const FRAME_TIME: f64 = 1000.0 / 60.0;

/// Keep ticking a bit after the last object so everything expires
const END_PADDING: f64 = 1000.0;

/// Counts played sounds instead of playing them
#[derive(Default)]
struct LogSoundboard {
    played: HashMap<String, usize>,
}

impl Soundboard for LogSoundboard {
    fn play_sound(&mut self, name: &str, volume: f32) {
        tracing::trace!("Playing {name} at {volume:.2}");
        *self.played.entry(name.to_owned()).or_default() += 1;
    }
}

impl Drop for LogSoundboard {
    fn drop(&mut self) {
        for (name, count) in &self.played {
            tracing::info!("{name}: played {count} times");
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .with_thread_names(true)
        .init();

    let mut args = std::env::args().skip(1);

    let Some(map_path) = args.next() else {
        tracing::error!("Usage: rosu-autoplay <map.osu> [config.ini]");
        return ExitCode::FAILURE;
    };

    let config = match args.next() {
        Some(path) => match Config::from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to load config: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let beatmap = match Beatmap::from_path(&map_path) {
        Ok(beatmap) => beatmap,
        Err(e) => {
            tracing::error!("Failed to parse beatmap {map_path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let rule_set = Rc::new(RuleSet::from_beatmap(&beatmap));
    let objects = MapObject::from_beatmap(&beatmap);

    let map_state = match MapState::new(rule_set, objects, MapTimeline::new()) {
        Ok(map_state) => map_state,
        Err(e) => {
            tracing::error!("Failed to build map state: {e}");
            return ExitCode::FAILURE;
        }
    };

    let end_time = map_state
        .objects()
        .iter()
        .map(|x| map_state.policy().latest_hit_time(x))
        .fold(0.0, f64::max)
        + END_PADDING;

    let events = autoplay::generate(&map_state);
    let mut processor = GameplayProcessor::new(map_state, LogSoundboard::default(), &config);

    if let Err(e) = autoplay::run(&mut processor, &events, FRAME_TIME, end_time) {
        tracing::error!("Attempt aborted: {e}");
        return ExitCode::FAILURE;
    }

    let map_state = processor.map_state();

    tracing::info!(
        "Finished at {:.0}ms: score {}, accuracy {:.2}%, max combo {}x",
        end_time,
        map_state.score(end_time),
        map_state.accuracy(end_time) * 100.0,
        map_state.max_combo(end_time)
    );

    processor.finish();

    ExitCode::SUCCESS
}
