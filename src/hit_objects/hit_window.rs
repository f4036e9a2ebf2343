#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Hit {
    X300,
    X100,
    X50,
    Miss,
}

impl Hit {
    pub fn score(&self) -> u32 {
        match self {
            Hit::X300 => 300,
            Hit::X100 => 100,
            Hit::X50 => 50,
            Hit::Miss => 0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HitWindow {
    pub x300: f64,
    pub x100: f64,
    pub x50: f64,
}

impl HitWindow {
    pub fn from_od(od: f32) -> Self {
        HitWindow {
            x300: 80.0 - 6.0 * (od as f64),
            x100: 140.0 - 8.0 * (od as f64),
            x50: 200.0 - 10.0 * (od as f64),
        }
    }

    /// Judges absolute hit error (in ms) against the window
    pub fn judge(&self, hit_error: f64) -> Hit {
        let hit_error = hit_error.abs();

        if hit_error < self.x300.round() {
            return Hit::X300;
        }

        if hit_error < self.x100.round() {
            return Hit::X100;
        }

        if hit_error < self.x50.round() {
            return Hit::X50;
        }

        Hit::Miss
    }
}

impl Default for HitWindow {
    fn default() -> Self {
        Self::from_od(5.0)
    }
}

#[test]
fn test_od5_judgements() {
    let window = HitWindow::from_od(5.0);

    assert_eq!(window.x50, 150.0);
    assert_eq!(window.judge(-49.0), Hit::X300);
    assert_eq!(window.judge(50.0), Hit::X100);
    assert_eq!(window.judge(149.0), Hit::X50);
    assert_eq!(window.judge(150.0), Hit::Miss);
}
