pub mod combo;
pub mod hit_marker;
pub mod hit_window;
pub mod slider;

use std::rc::Rc;

use cgmath::Vector2;
use rosu_map::{
    section::hit_objects::{
        hit_samples::{HitSampleDefaultName, HitSampleInfo, HitSampleInfoName},
        HitObjectKind as RosuHitObjectKind,
    },
    Beatmap,
};

pub use combo::{Combo, ComboPosition};
pub use hit_marker::HitMarker;
pub use slider::{SliderPath, SliderPoint};

/// How many points are sampled from a parsed slider curve
const CURVE_SAMPLES: usize = 100;

/// Identity of a hit object inside one `MapState`.
///
/// Two objects with equal fields are still distinct objects
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

/// Additions on top of the always played normal sound
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct HitSound {
    pub whistle: bool,
    pub finish: bool,
    pub clap: bool,
}

impl HitSound {
    pub fn from_samples(samples: &[HitSampleInfo]) -> Self {
        let mut hit_sound = Self::default();

        for sample in samples {
            if let HitSampleInfoName::Default(name) = &sample.name {
                match name {
                    HitSampleDefaultName::Whistle => hit_sound.whistle = true,
                    HitSampleDefaultName::Finish => hit_sound.finish = true,
                    HitSampleDefaultName::Clap => hit_sound.clap = true,
                    HitSampleDefaultName::Normal => {}
                }
            }
        }

        hit_sound
    }
}

#[derive(Debug)]
pub struct Slider {
    pub path: SliderPath,
    /// Drawn as a part of the slider, hittable on their own
    pub ticks: Vec<Rc<HitObject>>,
    /// One per span, the last one is the actual slider end
    pub ends: Vec<Rc<HitObject>>,
}

#[derive(Debug)]
pub enum HitObjectKind {
    Circle,
    Slider(Slider),
    SliderTick { parent: ObjectId },
    SliderEnd { parent: ObjectId, span: usize },
}

#[derive(Debug)]
pub struct HitObject {
    pub id: ObjectId,
    pub time: f64,
    pub pos: Vector2<f64>,
    pub combo: ComboPosition,
    pub hit_sound: HitSound,
    pub kind: HitObjectKind,
}

impl HitObject {
    pub fn end_time(&self) -> f64 {
        match &self.kind {
            HitObjectKind::Slider(slider) => slider.path.end_time(self.time),
            _ => self.time,
        }
    }

    /// Ticks and ends are resolved by holding, not by clicking
    pub fn is_slider_part(&self) -> bool {
        matches!(
            self.kind,
            HitObjectKind::SliderTick { .. } | HitObjectKind::SliderEnd { .. }
        )
    }

    pub fn parent(&self) -> Option<ObjectId> {
        match self.kind {
            HitObjectKind::SliderTick { parent } | HitObjectKind::SliderEnd { parent, .. } => {
                Some(parent)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapObjectKind {
    Circle,
    Slider(SliderPath),
}

/// A hit object as it comes from a parsed map,
/// before `MapState` assigns identities
#[derive(Debug, Clone, PartialEq)]
pub struct MapObject {
    pub time: f64,
    pub pos: Vector2<f64>,
    pub new_combo: bool,
    /// Extra combo colours to skip when starting a new combo
    pub combo_offset: u32,
    pub hit_sound: HitSound,
    pub kind: MapObjectKind,
}

impl MapObject {
    pub fn circle(time: f64, x: f64, y: f64) -> Self {
        Self {
            time,
            pos: Vector2::new(x, y),
            new_combo: false,
            combo_offset: 0,
            hit_sound: HitSound::default(),
            kind: MapObjectKind::Circle,
        }
    }

    pub fn slider(time: f64, x: f64, y: f64, path: SliderPath) -> Self {
        Self {
            kind: MapObjectKind::Slider(path),
            ..Self::circle(time, x, y)
        }
    }

    pub fn with_new_combo(mut self, combo_offset: u32) -> Self {
        self.new_combo = true;
        self.combo_offset = combo_offset;
        self
    }

    pub fn with_hit_sound(mut self, hit_sound: HitSound) -> Self {
        self.hit_sound = hit_sound;
        self
    }

    /// Converts a parsed hit object, spinners and holds are skipped
    pub fn from_rosu(value: &rosu_map::section::hit_objects::HitObject) -> Option<Self> {
        let hit_sound = HitSound::from_samples(&value.samples);

        match &value.kind {
            RosuHitObjectKind::Slider(slider) => {
                let mut slider = slider.clone();

                let pos = slider.pos;
                let new_combo = slider.new_combo;
                let combo_offset = slider.combo_offset.max(0) as u32;
                let repeats = slider.span_count();
                let duration = slider.duration();

                let curve = slider.path.curve();

                let points = (0..=CURVE_SAMPLES)
                    .map(|i| {
                        let offset = curve.position_at(i as f64 / CURVE_SAMPLES as f64);
                        Vector2::new(offset.x as f64, offset.y as f64)
                    })
                    .collect();

                Some(Self {
                    time: value.start_time,
                    pos: Vector2::new(pos.x as f64, pos.y as f64),
                    new_combo,
                    combo_offset,
                    hit_sound,
                    kind: MapObjectKind::Slider(SliderPath::new(duration, repeats, points)),
                })
            }
            RosuHitObjectKind::Circle(circle) => Some(Self {
                time: value.start_time,
                pos: Vector2::new(circle.pos.x as f64, circle.pos.y as f64),
                new_combo: circle.new_combo,
                combo_offset: circle.combo_offset.max(0) as u32,
                hit_sound,
                kind: MapObjectKind::Circle,
            }),
            _ => None,
        }
    }

    pub fn from_beatmap(beatmap: &Beatmap) -> Vec<Self> {
        let objects: Vec<Self> = beatmap.hit_objects.iter().filter_map(Self::from_rosu).collect();

        let skipped = beatmap.hit_objects.len() - objects.len();
        if skipped > 0 {
            tracing::warn!("Skipped {skipped} unsupported hit objects");
        }

        objects
    }
}
