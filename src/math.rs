/// Follow circle radius relative to the hit circle radius
pub const FOLLOW_CIRCLE_SCALE: f64 = 2.4;

pub fn calc_hitcircle_diameter(cs: f32) -> f32 {
    ((1.0 - 0.7 * (cs - 5.0) / 5.0) / 2.0) * 128.0 * 1.00041
}

/// Return preempt and fadein based on AR
pub fn calculate_preempt_fadein(ar: f32) -> (f32, f32) {
    if ar > 5.0 {
        (
            1200.0 - 750.0 * (ar - 5.0) / 5.0,
            800.0 - 500.0 * (ar - 5.0) / 5.0,
        )
    } else if ar < 5.0 {
        (
            1200.0 + 600.0 * (5.0 - ar) / 5.0,
            800.0 + 400.0 * (5.0 - ar) / 5.0,
        )
    } else {
        (1200.0, 800.0)
    }
}

#[inline]
pub fn calc_progress(current: f64, start: f64, end: f64) -> f64 {
    (current - start) / (end - start)
}

#[test]
pub fn test_progress() {
    assert_eq!(calc_progress(50.0, 0.0, 100.0), 0.50);
}

#[test]
pub fn test_preempt() {
    assert_eq!(calculate_preempt_fadein(5.0).0, 1200.0);
    assert_eq!(calculate_preempt_fadein(10.0).0, 450.0);
    assert_eq!(calculate_preempt_fadein(0.0).0, 1800.0);
}
