mod rule_set;

use cgmath::Vector2;
use smallvec::SmallVec;

use crate::hit_objects::{HitMarker, HitObject, SliderPath, SliderPoint};

pub use rule_set::{RuleSet, SampleSet, TimingPoint};

/// Rules of the game.
///
/// Everything here is a pure function of its arguments,
/// `MapState` asks the policy and never second guesses it
pub trait ScoringPolicy {
    fn appear_time(&self, object: &HitObject) -> f64;
    fn disappear_time(&self, object: &HitObject) -> f64;

    fn earliest_hit_time(&self, object: &HitObject) -> f64;
    /// Last instant an object is still hittable
    fn latest_hit_time(&self, object: &HitObject) -> f64;

    fn slider_ticks(&self, start_time: f64, head: Vector2<f64>, path: &SliderPath) -> Vec<SliderPoint>;
    fn slider_ends(&self, start_time: f64, head: Vector2<f64>, path: &SliderPath) -> Vec<SliderPoint>;

    fn can_hit_object(&self, object: &HitObject, pos: Vector2<f64>, time: f64) -> bool;
    fn hit_score(&self, object: &HitObject, time: f64) -> u32;

    fn total_score(&self, markers: &[&HitMarker]) -> u64;
    fn total_accuracy(&self, markers: &[&HitMarker]) -> f64;

    fn hit_sound_names(&self, marker: &HitMarker) -> SmallVec<[String; 4]>;
    fn hit_sound_volume(&self, time: f64) -> f32;

    fn approach_progress(&self, object: &HitObject, time: f64) -> f64;
}
