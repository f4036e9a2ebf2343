use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fmt::Debug,
    hash::Hash,
};

use ordered_float::OrderedFloat;
use thiserror::Error;

use crate::events::{Observers, Subscription};

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum TimelineError {
    #[error("interval ends before it starts: start `{start}`, end `{end}`")]
    InvalidInterval { start: f64, end: f64 },
    #[error("time is not a finite number: `{0}`")]
    NonFiniteTime(f64),
}

/// Point entries are ordered by time, ties by insertion
type PointKey = (OrderedFloat<f64>, u64);

struct Interval<T> {
    start: f64,
    end: f64,
    payload: T,
}

struct Track<T> {
    /// In insertion order
    intervals: Vec<Interval<T>>,
    points: BTreeMap<PointKey, T>,
    /// Point entries which were never dispatched yet
    pending: BTreeSet<PointKey>,
    observers: Observers<T>,
}

impl<T> Default for Track<T> {
    fn default() -> Self {
        Self {
            intervals: Vec::new(),
            points: BTreeMap::new(),
            pending: BTreeSet::new(),
            observers: Observers::default(),
        }
    }
}

/// Temporal index over categorized entries.
///
/// Serves three kinds of queries against the same data:
/// 1. Intervals active at a point in time
/// 2. Points inside a time range
/// 3. Due-dispatch of points as the cursor moves forward
///
/// Every point entry is dispatched at most once for the
/// lifetime of the timeline. Seeking backward only moves the
/// cursor, entries that already fired stay fired.
pub struct Timeline<K, T> {
    tracks: HashMap<K, Track<T>>,
    cursor: f64,
    sequence: u64,
}

impl<K, T> Default for Timeline<K, T>
where
    K: Eq + Hash + Copy + Debug,
    T: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_finite(time: f64) -> Result<(), TimelineError> {
    if time.is_finite() {
        Ok(())
    } else {
        Err(TimelineError::NonFiniteTime(time))
    }
}

impl<K, T> Timeline<K, T>
where
    K: Eq + Hash + Copy + Debug,
    T: Clone,
{
    pub fn new() -> Self {
        Self {
            tracks: HashMap::new(),
            cursor: f64::NEG_INFINITY,
            sequence: 0,
        }
    }

    /// Registers an entry.
    ///
    /// - `end` is `Some` - interval entry, `start <= t < end`
    /// - `end` is `None` - point entry, used by range queries
    /// and due-dispatch
    pub fn add(
        &mut self,
        category: K,
        payload: T,
        start: f64,
        end: Option<f64>,
    ) -> Result<(), TimelineError> {
        ensure_finite(start)?;

        let track = self.tracks.entry(category).or_default();

        match end {
            Some(end) => {
                ensure_finite(end)?;

                if start > end {
                    return Err(TimelineError::InvalidInterval { start, end });
                }

                track.intervals.push(Interval {
                    start,
                    end,
                    payload,
                });
            }
            None => {
                let key = (OrderedFloat(start), self.sequence);
                self.sequence += 1;

                track.points.insert(key, payload);
                track.pending.insert(key);
            }
        }

        Ok(())
    }

    /// All interval entries of `category` active at `time`,
    /// in insertion order
    pub fn get_all_at_time(&self, time: f64, category: K) -> Vec<&T> {
        let Some(track) = self.tracks.get(&category) else {
            return Vec::new();
        };

        track
            .intervals
            .iter()
            .filter(|x| x.start <= time && time < x.end)
            .map(|x| &x.payload)
            .collect()
    }

    /// All point entries of `category` with `start <= time <= end`,
    /// in time order
    pub fn get_all_in_time_range(&self, start: f64, end: f64, category: K) -> Vec<&T> {
        // Also rejects NaN
        if !(start <= end) {
            return Vec::new();
        }

        let Some(track) = self.tracks.get(&category) else {
            return Vec::new();
        };

        track
            .points
            .range((OrderedFloat(start), 0)..=(OrderedFloat(end), u64::MAX))
            .map(|(_, payload)| payload)
            .collect()
    }

    /// Registers a callback for due-dispatch of point entries
    /// in `category`.
    ///
    /// Entries already dispatched to earlier subscribers are not
    /// delivered again. Entries nobody received yet fire on the
    /// next `update` reaching them
    pub fn subscribe<F>(&mut self, category: K, callback: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        self.tracks
            .entry(category)
            .or_default()
            .observers
            .subscribe(callback)
    }

    /// Moves the dispatch cursor to `time` and fires every
    /// pending point entry with `entry_time <= time`.
    ///
    /// Categories without live subscribers keep their entries
    /// pending
    pub fn update(&mut self, time: f64) {
        if time.is_nan() {
            tracing::warn!("Ignoring timeline update with NaN time");
            return;
        }

        if time < self.cursor {
            tracing::debug!("Timeline seek backward from {} to {}", self.cursor, time);
        }

        self.cursor = time;

        for (category, track) in self.tracks.iter_mut() {
            let Track {
                points,
                pending,
                observers,
                ..
            } = track;

            let mut dispatched = 0;

            while let Some(key) = pending.first().copied() {
                // Entries stay pending until somebody listens
                if key.0.into_inner() > time || observers.is_empty() {
                    break;
                }

                pending.pop_first();

                if let Some(payload) = points.get(&key) {
                    observers.publish(payload);
                    dispatched += 1;
                }
            }

            if dispatched > 0 {
                tracing::trace!("Dispatched {dispatched} entries of {category:?} at {time}");
            }
        }
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Total amount of entries (intervals and points) in `category`
    pub fn len(&self, category: K) -> usize {
        self.tracks
            .get(&category)
            .map_or(0, |x| x.intervals.len() + x.points.len())
    }

    pub fn is_empty(&self) -> bool {
        self.tracks
            .values()
            .all(|x| x.intervals.is_empty() && x.points.is_empty())
    }

    /// Point entries of `category` still waiting for dispatch
    pub fn pending_len(&self, category: K) -> usize {
        self.tracks.get(&category).map_or(0, |x| x.pending.len())
    }
}
