use cgmath::{MetricSpace, Vector2};
use rosu_map::{section::hit_objects::hit_samples::SampleBank, Beatmap};
use smallvec::SmallVec;

use crate::{
    hit_objects::{hit_window::{Hit, HitWindow}, HitMarker, HitObject, HitObjectKind, SliderPath, SliderPoint},
    history::History,
    math::{calc_hitcircle_diameter, calc_progress, calculate_preempt_fadein, FOLLOW_CIRCLE_SCALE},
};

use super::ScoringPolicy;

/// 120 BPM
const DEFAULT_BEAT_LENGTH: f64 = 500.0;

/// Ticks closer than that to the end of a span are dropped
const MIN_TICK_DISTANCE_FROM_END: f64 = 10.0;

const SLIDER_TICK_SCORE: u32 = 10;
const SLIDER_END_SCORE: u32 = 30;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum SampleSet {
    #[default]
    Normal,
    Soft,
    Drum,
}

impl SampleSet {
    pub fn name(&self) -> &'static str {
        match self {
            SampleSet::Normal => "normal",
            SampleSet::Soft => "soft",
            SampleSet::Drum => "drum",
        }
    }

    fn from_rosu(bank: SampleBank) -> Self {
        match bank {
            SampleBank::Soft => SampleSet::Soft,
            SampleBank::Drum => SampleSet::Drum,
            _ => SampleSet::Normal,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TimingPoint {
    pub time: f64,
    pub beat_length: f64,
    /// 0 - 100
    pub volume: f32,
    pub sample_set: SampleSet,
}

impl Default for TimingPoint {
    fn default() -> Self {
        Self {
            time: 0.0,
            beat_length: DEFAULT_BEAT_LENGTH,
            volume: 100.0,
            sample_set: SampleSet::Normal,
        }
    }
}

/// Standard osu! rules
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub approach_rate: f32,
    pub overall_difficulty: f32,
    pub circle_size: f32,
    pub slider_tick_rate: f64,
    pub timing_points: History<TimingPoint>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            approach_rate: 5.0,
            overall_difficulty: 5.0,
            circle_size: 5.0,
            slider_tick_rate: 1.0,
            timing_points: History::default(),
        }
    }
}

impl RuleSet {
    pub fn from_beatmap(beatmap: &Beatmap) -> Self {
        let mut rule_set = Self {
            approach_rate: beatmap.approach_rate as f32,
            overall_difficulty: beatmap.overall_difficulty as f32,
            circle_size: beatmap.circle_size as f32,
            slider_tick_rate: beatmap.slider_tick_rate as f64,
            ..Default::default()
        };

        let control_points = &beatmap.control_points;

        // Timing and sample points change independently,
        // merging them into one history
        let mut times: Vec<f64> = control_points
            .timing_points
            .iter()
            .map(|x| x.time)
            .chain(control_points.sample_points.iter().map(|x| x.time))
            .collect();

        times.sort_by(f64::total_cmp);
        times.dedup();

        for time in times {
            let beat_length = control_points
                .timing_points
                .iter()
                .rev()
                .find(|x| x.time <= time)
                .or(control_points.timing_points.first())
                .map_or(DEFAULT_BEAT_LENGTH, |x| x.beat_len);

            let (volume, sample_set) = control_points
                .sample_points
                .iter()
                .rev()
                .find(|x| x.time <= time)
                .map_or((100.0, SampleSet::Normal), |x| {
                    (x.sample_volume as f32, SampleSet::from_rosu(x.sample_bank))
                });

            rule_set.timing_points.add(
                time,
                TimingPoint {
                    time,
                    beat_length,
                    volume,
                    sample_set,
                },
            );
        }

        rule_set
    }

    pub fn preempt(&self) -> f64 {
        calculate_preempt_fadein(self.approach_rate).0 as f64
    }

    pub fn hit_window(&self) -> HitWindow {
        HitWindow::from_od(self.overall_difficulty)
    }

    pub fn circle_radius(&self) -> f64 {
        calc_hitcircle_diameter(self.circle_size) as f64 / 2.0
    }

    /// Timing point active at `time`, objects placed before the
    /// first timing point use the first one
    pub fn timing_point_at(&self, time: f64) -> TimingPoint {
        self.timing_points
            .data_at_time(time)
            .or(self.timing_points.first())
            .copied()
            .unwrap_or_default()
    }
}

impl ScoringPolicy for RuleSet {
    fn appear_time(&self, object: &HitObject) -> f64 {
        object.time - self.preempt()
    }

    fn disappear_time(&self, object: &HitObject) -> f64 {
        match &object.kind {
            HitObjectKind::Circle | HitObjectKind::Slider(_) => {
                object.end_time() + self.hit_window().x50
            }
            HitObjectKind::SliderTick { .. } | HitObjectKind::SliderEnd { .. } => object.time,
        }
    }

    fn earliest_hit_time(&self, object: &HitObject) -> f64 {
        match &object.kind {
            HitObjectKind::Circle | HitObjectKind::Slider(_) => object.time - self.hit_window().x50,
            HitObjectKind::SliderTick { .. } | HitObjectKind::SliderEnd { .. } => object.time,
        }
    }

    fn latest_hit_time(&self, object: &HitObject) -> f64 {
        match &object.kind {
            HitObjectKind::Circle | HitObjectKind::Slider(_) => object.time + self.hit_window().x50,
            HitObjectKind::SliderTick { .. } | HitObjectKind::SliderEnd { .. } => object.time,
        }
    }

    fn slider_ticks(&self, start_time: f64, head: Vector2<f64>, path: &SliderPath) -> Vec<SliderPoint> {
        let spacing = self.timing_point_at(start_time).beat_length / self.slider_tick_rate;

        // Also rejects NaN
        if !(spacing >= 1.0) || !spacing.is_finite() {
            return Vec::new();
        }

        let span = path.span_duration();
        let mut ticks = Vec::new();

        for span_index in 0..path.repeats {
            let span_start = start_time + span * span_index as f64;
            let mut offset = spacing;

            while offset < span - MIN_TICK_DISTANCE_FROM_END {
                let time = span_start + offset;

                ticks.push(SliderPoint {
                    time,
                    pos: path.position_at_time(start_time, head, time),
                });

                offset += spacing;
            }
        }

        ticks
    }

    fn slider_ends(&self, start_time: f64, head: Vector2<f64>, path: &SliderPath) -> Vec<SliderPoint> {
        let span = path.span_duration();

        (1..=path.repeats)
            .map(|span_index| {
                let time = start_time + span * span_index as f64;

                SliderPoint {
                    time,
                    pos: path.position_at_time(start_time, head, time),
                }
            })
            .collect()
    }

    fn can_hit_object(&self, object: &HitObject, pos: Vector2<f64>, time: f64) -> bool {
        let distance = object.pos.distance(pos);

        match &object.kind {
            HitObjectKind::Circle | HitObjectKind::Slider(_) => {
                distance <= self.circle_radius()
                    && self.hit_window().judge(time - object.time) != Hit::Miss
            }
            HitObjectKind::SliderTick { .. } | HitObjectKind::SliderEnd { .. } => {
                distance <= self.circle_radius() * FOLLOW_CIRCLE_SCALE
            }
        }
    }

    fn hit_score(&self, object: &HitObject, time: f64) -> u32 {
        match &object.kind {
            HitObjectKind::Circle | HitObjectKind::Slider(_) => {
                self.hit_window().judge(time - object.time).score()
            }
            HitObjectKind::SliderTick { .. } => SLIDER_TICK_SCORE,
            HitObjectKind::SliderEnd { .. } => SLIDER_END_SCORE,
        }
    }

    fn total_score(&self, markers: &[&HitMarker]) -> u64 {
        markers.iter().map(|x| x.score as u64).sum()
    }

    fn total_accuracy(&self, markers: &[&HitMarker]) -> f64 {
        let (count, score) = markers
            .iter()
            .filter(|x| !x.object.is_slider_part())
            .fold((0u64, 0u64), |(count, score), x| (count + 1, score + x.score as u64));

        if count == 0 {
            return 1.0;
        }

        score as f64 / (Hit::X300.score() as u64 * count) as f64
    }

    fn hit_sound_names(&self, marker: &HitMarker) -> SmallVec<[String; 4]> {
        let mut names = SmallVec::new();

        if !marker.is_hit {
            return names;
        }

        let object = &marker.object;
        let set = self.timing_point_at(object.time).sample_set.name();

        if let HitObjectKind::SliderTick { .. } = object.kind {
            names.push(format!("{set}-slidertick"));
            return names;
        }

        names.push(format!("{set}-hitnormal"));

        if object.hit_sound.whistle {
            names.push(format!("{set}-hitwhistle"));
        }

        if object.hit_sound.finish {
            names.push(format!("{set}-hitfinish"));
        }

        if object.hit_sound.clap {
            names.push(format!("{set}-hitclap"));
        }

        names
    }

    fn hit_sound_volume(&self, time: f64) -> f32 {
        self.timing_point_at(time).volume / 100.0
    }

    fn approach_progress(&self, object: &HitObject, time: f64) -> f64 {
        let appear = self.appear_time(object);

        if object.time <= appear {
            return 1.0;
        }

        calc_progress(time, appear, object.time).clamp(0.0, 1.0)
    }
}
