use cgmath::Vector2;

use crate::{
    hit_objects::HitObjectKind,
    map_state::{MapState, MapStateError},
    osu_input::KeyboardState,
    scoring::ScoringPolicy,
};

use super::GameplayProcessor;

/// How long a key stays down after a circle is hit
const RELEASE_DELAY: f64 = 40.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AutoplayAction {
    Move(Vector2<f64>),
    Press(KeyboardState),
    Release(KeyboardState),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AutoplayEvent {
    pub ts: f64,
    pub action: AutoplayAction,
}

/// Generates perfect inputs for every circle and slider,
/// alternating between k1 and k2
pub fn generate<P: ScoringPolicy>(map_state: &MapState<P>) -> Vec<AutoplayEvent> {
    let mut events = Vec::new();
    let mut alternate = false;

    let mut push = |ts: f64, action: AutoplayAction| events.push(AutoplayEvent { ts, action });

    for object in map_state.objects() {
        let key = if alternate {
            KeyboardState { k2: true, ..Default::default() }
        } else {
            KeyboardState { k1: true, ..Default::default() }
        };

        match &object.kind {
            HitObjectKind::Circle => {
                push(object.time, AutoplayAction::Move(object.pos));
                push(object.time, AutoplayAction::Press(key));
                push(object.time + RELEASE_DELAY, AutoplayAction::Release(key));
            }
            HitObjectKind::Slider(slider) => {
                push(object.time, AutoplayAction::Move(object.pos));
                push(object.time, AutoplayAction::Press(key));

                let mut parts: Vec<_> = slider.ticks.iter().chain(slider.ends.iter()).collect();
                parts.sort_by(|a, b| a.time.total_cmp(&b.time));

                for part in parts {
                    push(part.time, AutoplayAction::Move(part.pos));
                }

                push(object.end_time() + RELEASE_DELAY, AutoplayAction::Release(key));
            }
            HitObjectKind::SliderTick { .. } | HitObjectKind::SliderEnd { .. } => continue,
        }

        alternate = !alternate;
    }

    // Stable, moves stay in front of presses with the same timestamp
    events.sort_by(|a, b| a.ts.total_cmp(&b.ts));
    events
}

pub fn apply<P: ScoringPolicy + 'static>(
    processor: &mut GameplayProcessor<P>,
    event: &AutoplayEvent,
) -> Result<(), MapStateError> {
    match event.action {
        AutoplayAction::Move(pos) => processor.store_cursor_moved(event.ts, pos),
        AutoplayAction::Press(keys) => {
            processor.store_keyboard_pressed(event.ts, keys)?;
        }
        AutoplayAction::Release(keys) => processor.store_keyboard_released(event.ts, keys),
    }

    Ok(())
}

/// Plays `events` through `processor` with a fixed frame step
/// until `end_time`
pub fn run<P: ScoringPolicy + 'static>(
    processor: &mut GameplayProcessor<P>,
    events: &[AutoplayEvent],
    frame_time: f64,
    end_time: f64,
) -> Result<(), MapStateError> {
    let frame_time = frame_time.max(1.0);
    let mut pending = events.iter().peekable();
    let mut time = events.first().map_or(0.0, |x| x.ts.min(0.0));

    loop {
        while let Some(event) = pending.next_if(|x| x.ts <= time) {
            apply(processor, event)?;
        }

        processor.tick(time)?;

        if time >= end_time {
            break;
        }

        time = (time + frame_time).min(end_time);
    }

    Ok(())
}
