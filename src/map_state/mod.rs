mod registry;

use std::rc::Rc;

use cgmath::Vector2;
use thiserror::Error;

use crate::{
    events::{Observers, Subscription},
    hit_objects::{
        combo::build_combos, Combo, ComboPosition, HitMarker, HitObject, HitObjectKind, MapObject, MapObjectKind,
        ObjectId, Slider, SliderPoint,
    },
    osu_input::PointerHistory,
    scoring::ScoringPolicy,
    timeline::{Timeline, TimelineError},
};

pub use registry::{RegistryEntry, UnhitRegistry};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// Interval from appearing to disappearing
    Visibility,
    /// Interval from earliest to latest hit time, circles and sliders only
    Hittable,
    /// Point at every hit marker time
    HitMarkerCreation,
}

#[derive(Debug, Clone)]
pub enum TimelineItem {
    Object(Rc<HitObject>),
    HitMarker(HitMarker),
}

impl TimelineItem {
    pub fn as_object(&self) -> Option<&Rc<HitObject>> {
        match self {
            TimelineItem::Object(object) => Some(object),
            TimelineItem::HitMarker(_) => None,
        }
    }

    pub fn as_hit_marker(&self) -> Option<&HitMarker> {
        match self {
            TimelineItem::HitMarker(marker) => Some(marker),
            TimelineItem::Object(_) => None,
        }
    }
}

pub type MapTimeline = Timeline<Category, TimelineItem>;

#[derive(Error, Debug)]
pub enum MapStateError {
    #[error("timeline rejected an entry: {0}")]
    Timeline(#[from] TimelineError),
    #[error("object `{0:?}` is not waiting for a result")]
    NotInRegistry(ObjectId),
}

/// Gameplay progression of one map attempt.
///
/// Every hittable object (circles, sliders, slider ticks and ends)
/// ends up with exactly one `HitMarker`, either from a click,
/// from slide processing or from miss processing.
pub struct MapState<P> {
    policy: Rc<P>,
    timeline: MapTimeline,

    /// Indexed by `ObjectId`
    objects: Vec<Rc<HitObject>>,
    combos: Vec<Combo>,

    unhit: UnhitRegistry,
    events: Observers<HitMarker>,
}

fn slider_part(
    id: u32,
    point: SliderPoint,
    parent: &MapObject,
    combo: ComboPosition,
    kind: HitObjectKind,
) -> Rc<HitObject> {
    Rc::new(HitObject {
        id: ObjectId(id),
        time: point.time,
        pos: point.pos,
        combo,
        hit_sound: parent.hit_sound,
        kind,
    })
}

impl<P: ScoringPolicy> MapState<P> {
    pub fn new(
        policy: Rc<P>,
        mut map_objects: Vec<MapObject>,
        mut timeline: MapTimeline,
    ) -> Result<Self, MapStateError> {
        // Stable, hittable objects are scanned in insertion order
        map_objects.sort_by(|a, b| a.time.total_cmp(&b.time));

        let (combos, positions) = build_combos(&map_objects);

        let mut objects: Vec<Rc<HitObject>> = Vec::with_capacity(map_objects.len());
        let mut registry = Vec::new();

        for (map_object, combo) in map_objects.iter().zip(positions) {
            let id = objects.len() as u32;

            let kind = match &map_object.kind {
                MapObjectKind::Circle => HitObjectKind::Circle,
                MapObjectKind::Slider(path) => {
                    let mut next_id = id + 1;

                    let mut ticks = Vec::new();
                    for point in policy.slider_ticks(map_object.time, map_object.pos, path) {
                        let kind = HitObjectKind::SliderTick { parent: ObjectId(id) };
                        ticks.push(slider_part(next_id, point, map_object, combo, kind));
                        next_id += 1;
                    }

                    let mut ends = Vec::new();
                    for (span, point) in policy
                        .slider_ends(map_object.time, map_object.pos, path)
                        .into_iter()
                        .enumerate()
                    {
                        let kind = HitObjectKind::SliderEnd {
                            parent: ObjectId(id),
                            span,
                        };
                        ends.push(slider_part(next_id, point, map_object, combo, kind));
                        next_id += 1;
                    }

                    HitObjectKind::Slider(Slider {
                        path: path.clone(),
                        ticks,
                        ends,
                    })
                }
            };

            let object = Rc::new(HitObject {
                id: ObjectId(id),
                time: map_object.time,
                pos: map_object.pos,
                combo,
                hit_sound: map_object.hit_sound,
                kind,
            });

            timeline.add(
                Category::Visibility,
                TimelineItem::Object(object.clone()),
                policy.appear_time(&object),
                Some(policy.disappear_time(&object)),
            )?;

            timeline.add(
                Category::Hittable,
                TimelineItem::Object(object.clone()),
                policy.earliest_hit_time(&object),
                Some(policy.latest_hit_time(&object)),
            )?;

            objects.push(object.clone());

            if let HitObjectKind::Slider(slider) = &object.kind {
                objects.extend(slider.ticks.iter().cloned());
                objects.extend(slider.ends.iter().cloned());
            }
        }

        for object in &objects {
            registry.push(RegistryEntry {
                id: object.id,
                expires_at: policy.latest_hit_time(object),
            });
        }

        tracing::info!(
            "Initialized map state with {} objects ({} hittable) in {} combos",
            map_objects.len(),
            registry.len(),
            combos.len()
        );

        Ok(Self {
            policy,
            timeline,
            objects,
            combos,
            unhit: UnhitRegistry::new(registry),
            events: Observers::default(),
        })
    }

    pub fn visible_objects(&self, time: f64) -> Vec<&Rc<HitObject>> {
        self.timeline
            .get_all_at_time(time, Category::Visibility)
            .into_iter()
            .filter_map(TimelineItem::as_object)
            .collect()
    }

    /// Objects inside their hit window which were not
    /// resolved yet, earliest appearing first
    pub fn hittable_objects(&self, time: f64) -> Vec<&Rc<HitObject>> {
        self.timeline
            .get_all_at_time(time, Category::Hittable)
            .into_iter()
            .filter_map(TimelineItem::as_object)
            .filter(|x| self.unhit.contains(x.id))
            .collect()
    }

    pub fn is_object_hittable(&self, id: ObjectId) -> bool {
        self.unhit.contains(id)
    }

    /// Markers created at or before `time`, in time order
    pub fn hit_markers(&self, time: f64) -> Vec<&HitMarker> {
        self.timeline
            // Not clamped at 0, markers of objects placed before the
            // start of the track still count towards the totals
            .get_all_in_time_range(f64::NEG_INFINITY, time, Category::HitMarkerCreation)
            .into_iter()
            .filter_map(TimelineItem::as_hit_marker)
            .collect()
    }

    pub fn accuracy(&self, time: f64) -> f64 {
        self.policy.total_accuracy(&self.hit_markers(time))
    }

    pub fn score(&self, time: f64) -> u64 {
        self.policy.total_score(&self.hit_markers(time))
    }

    /// Hits since the last miss
    pub fn combo(&self, time: f64) -> u32 {
        self.hit_markers(time)
            .iter()
            .fold(0, |combo, x| if x.is_hit { combo + 1 } else { 0 })
    }

    pub fn max_combo(&self, time: f64) -> u32 {
        let mut combo = 0;
        let mut max_combo = 0;

        for marker in self.hit_markers(time) {
            combo = if marker.is_hit { combo + 1 } else { 0 };
            max_combo = max_combo.max(combo);
        }

        max_combo
    }

    /// Resolves the first hittable object the policy lets us hit.
    /// Returns `None` when nothing was hit
    pub fn click_at(&mut self, pos: Vector2<f64>, time: f64) -> Result<Option<HitMarker>, MapStateError> {
        let target = self
            .hittable_objects(time)
            .into_iter()
            .find(|x| self.policy.can_hit_object(x, pos, time))
            .cloned();

        let Some(object) = target else {
            return Ok(None);
        };

        let score = self.policy.hit_score(&object, time);
        let marker = HitMarker::hit(object, time, score);

        self.apply_hit_marker(marker.clone())?;

        Ok(Some(marker))
    }

    /// Resolves expired slider ticks and ends by looking at
    /// the pointer state at the time of each of them
    pub fn process_slides<H>(&mut self, time: f64, pointer_history: &H) -> Result<Vec<HitMarker>, MapStateError>
    where
        H: PointerHistory + ?Sized,
    {
        let mut indices = Vec::new();
        let mut markers = Vec::new();

        for (index, entry) in self.unhit.expired(time) {
            let object = &self.objects[entry.id.0 as usize];

            if !object.is_slider_part() {
                continue;
            }

            let is_hit = pointer_history
                .data_at_time(object.time)
                .is_some_and(|x| x.is_down() && self.policy.can_hit_object(object, x.pos, object.time));

            let marker = if is_hit {
                let score = self.policy.hit_score(object, object.time);
                HitMarker::hit(object.clone(), object.time, score)
            } else {
                HitMarker::miss(object.clone(), object.time)
            };

            indices.push(index);
            markers.push(marker);
        }

        self.unhit.remove_indices(&indices);

        for marker in &markers {
            self.record(marker.clone())?;
        }

        Ok(markers)
    }

    /// Every object which expired before `time` becomes a miss
    /// one millisecond after its last hittable instant
    pub fn process_misses(&mut self, time: f64) -> Result<Vec<HitMarker>, MapStateError> {
        let expired = self.unhit.drain_expired(time);
        let mut markers = Vec::with_capacity(expired.len());

        for entry in expired {
            let object = self.objects[entry.id.0 as usize].clone();
            let marker = HitMarker::miss(object, entry.expires_at + 1.0);

            self.record(marker.clone())?;
            markers.push(marker);
        }

        Ok(markers)
    }

    /// Observer channel for every created hit marker
    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(&HitMarker) + 'static,
    {
        self.events.subscribe(callback)
    }

    fn apply_hit_marker(&mut self, marker: HitMarker) -> Result<(), MapStateError> {
        let id = marker.object.id;

        self.unhit
            .remove(id)
            .ok_or(MapStateError::NotInRegistry(id))?;

        self.record(marker)
    }

    fn record(&mut self, marker: HitMarker) -> Result<(), MapStateError> {
        tracing::debug!(
            "Object {:?} resolved at {} with score {} (hit: {})",
            marker.object.id,
            marker.time,
            marker.score,
            marker.is_hit
        );

        self.timeline.add(
            Category::HitMarkerCreation,
            TimelineItem::HitMarker(marker.clone()),
            marker.time,
            None,
        )?;

        self.events.publish(&marker);

        Ok(())
    }

    pub fn object(&self, id: ObjectId) -> Option<&Rc<HitObject>> {
        self.objects.get(id.0 as usize)
    }

    /// All objects including slider parts, in id order
    pub fn objects(&self) -> &[Rc<HitObject>] {
        &self.objects
    }

    pub fn combos(&self) -> &[Combo] {
        &self.combos
    }

    pub fn unhit_count(&self) -> usize {
        self.unhit.len()
    }

    /// Every object got its result
    pub fn is_finished(&self) -> bool {
        self.unhit.is_empty()
    }

    pub fn policy(&self) -> &Rc<P> {
        &self.policy
    }

    pub fn timeline(&self) -> &MapTimeline {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut MapTimeline {
        &mut self.timeline
    }
}
