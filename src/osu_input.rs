use cgmath::Vector2;

use crate::history::History;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct KeyboardState {
    pub k1: bool,
    pub k2: bool,
    pub m1: bool,
    pub m2: bool,
}

impl KeyboardState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// k1 and m1 act as the left button
    pub fn left(&self) -> bool {
        self.k1 || self.m1
    }

    /// k2 and m2 act as the right button
    pub fn right(&self) -> bool {
        self.k2 || self.m2
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OsuInput {
    /// A timestamp relative to the beginning of the map
    pub ts: f64,

    /// Cursors position
    pub pos: Vector2<f64>,

    /// Keys pressed
    pub keys: KeyboardState,

    /// Keys which were already down on the previous input
    pub hold: KeyboardState,
}

impl OsuInput {
    /// Returns `true` if any key is down which was not held on the previous input
    pub fn is_key_hit_no_hold(&self) -> bool {
        let k1 = self.keys.k1 && !self.hold.k1;
        let k2 = self.keys.k2 && !self.hold.k2;
        let m1 = self.keys.m1 && !self.hold.m1;
        let m2 = self.keys.m2 && !self.hold.m2;

        k1 || k2 || m1 || m2
    }

    pub fn pointer_state(&self) -> PointerState {
        PointerState {
            pos: self.pos,
            left_down: self.keys.left(),
            right_down: self.keys.right(),
        }
    }
}

/// Pointer sample as seen by gameplay
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerState {
    pub pos: Vector2<f64>,
    pub left_down: bool,
    pub right_down: bool,
}

impl PointerState {
    pub fn is_down(&self) -> bool {
        self.left_down || self.right_down
    }
}

/// Queryable record of past pointer samples
pub trait PointerHistory {
    /// Latest sample recorded at or before `time`
    fn data_at_time(&self, time: f64) -> Option<PointerState>;
}

impl PointerHistory for History<PointerState> {
    fn data_at_time(&self, time: f64) -> Option<PointerState> {
        History::data_at_time(self, time).copied()
    }
}
