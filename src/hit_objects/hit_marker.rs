use std::rc::Rc;

use super::HitObject;

/// Resolution (hit or miss) of a single hit object.
///
/// Created once per object and never changed afterwards
#[derive(Debug, Clone)]
pub struct HitMarker {
    pub object: Rc<HitObject>,
    pub time: f64,
    pub score: u32,
    pub is_hit: bool,
}

impl HitMarker {
    pub fn hit(object: Rc<HitObject>, time: f64, score: u32) -> Self {
        Self {
            object,
            time,
            score,
            is_hit: true,
        }
    }

    pub fn miss(object: Rc<HitObject>, time: f64) -> Self {
        Self {
            object,
            time,
            score: 0,
            is_hit: false,
        }
    }
}
