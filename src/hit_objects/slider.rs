use cgmath::{InnerSpace, Vector2};

/// Time and position of a slider sub-object (tick or end)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SliderPoint {
    pub time: f64,
    pub pos: Vector2<f64>,
}

/// Timing and geometry of a slider body.
///
/// `points` is a polyline relative to the slider head,
/// first point is always `(0, 0)`
#[derive(Debug, Clone, PartialEq)]
pub struct SliderPath {
    pub duration: f64,

    /// Total spans (head to end counts as one)
    /// Example:
    /// `*===R===R===*` => 3 repeats
    /// `*===R===*` => 2 repeats
    /// `*===*` => 1 repeats
    pub repeats: i32,

    pub points: Vec<Vector2<f64>>,
}

impl SliderPath {
    pub fn new(duration: f64, repeats: i32, mut points: Vec<Vector2<f64>>) -> Self {
        if points.is_empty() {
            points.push(Vector2::new(0.0, 0.0));
        }

        Self {
            duration: duration.max(0.0),
            repeats: repeats.max(1),
            points,
        }
    }

    /// Straight slider from the head towards `end`
    pub fn linear(duration: f64, repeats: i32, end: Vector2<f64>) -> Self {
        Self::new(duration, repeats, vec![Vector2::new(0.0, 0.0), end])
    }

    #[inline]
    pub fn end_time(&self, start_time: f64) -> f64 {
        start_time + self.duration
    }

    #[inline]
    pub fn span_duration(&self) -> f64 {
        self.duration / self.repeats as f64
    }

    /// Returns slide index for certain time
    /// Indexes starts from 1
    ///
    /// # Example:
    /// `*===R===*`
    ///  ^ ^ ^   ^
    ///  1 2 3   4
    ///
    ///  1 - Slider head at 0
    ///  3 - Reverse at 50
    ///  4 - Slider end at 100
    ///  2 - Position we want to know slide of at 25
    ///  For that time we will get 1
    ///  If time were 75 we should get 2
    #[inline]
    pub fn slide(&self, start_time: f64, time: f64) -> i32 {
        let span = self.span_duration();

        if span <= 0.0 {
            return 1;
        }

        let v1 = time - start_time;
        ((v1 / span).floor() as i32 + 1).clamp(1, self.repeats)
    }

    /// Gets progress along the path taking slides and
    /// repeats into account
    ///
    /// 0.0 >= Return value <= 1.0
    pub fn progress(&self, start_time: f64, time: f64) -> f64 {
        let span = self.span_duration();

        if span <= 0.0 {
            return 0.0;
        }

        let time = time.clamp(start_time, self.end_time(start_time));

        let v1 = time - start_time;
        let slide = (v1 / span).floor() + 1.0;
        let slide_start = start_time + span * (slide - 1.0);

        let current = (time - slide_start) / span;

        if slide % 2.0 == 0.0 {
            1.0 - current
        } else {
            current
        }
    }

    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|x| (x[1] - x[0]).magnitude())
            .sum()
    }

    /// Offset from the slider head at `progress` along the path
    pub fn position_at(&self, progress: f64) -> Vector2<f64> {
        let length = self.length();

        if length <= 0.0 {
            return self.points[0];
        }

        let mut remaining = progress.clamp(0.0, 1.0) * length;

        for segment in self.points.windows(2) {
            let (a, b) = (segment[0], segment[1]);
            let segment_length = (b - a).magnitude();

            if remaining <= segment_length && segment_length > 0.0 {
                return a + (b - a) * (remaining / segment_length);
            }

            remaining -= segment_length;
        }

        *self.points.last().unwrap_or(&self.points[0])
    }

    /// Absolute position of the slider ball at `time`
    pub fn position_at_time(&self, start_time: f64, head: Vector2<f64>, time: f64) -> Vector2<f64> {
        head + self.position_at(self.progress(start_time, time))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_slides_and_progress() {
        // *===R===*
        let path = SliderPath::linear(1000.0, 2, Vector2::new(100.0, 0.0));

        assert_eq!(path.slide(0.0, 250.0), 1);
        assert_eq!(path.slide(0.0, 750.0), 2);
        assert_eq!(path.slide(0.0, 5000.0), 2);

        assert_relative_eq!(path.progress(0.0, 0.0), 0.0);
        assert_relative_eq!(path.progress(0.0, 250.0), 0.5);
        assert_relative_eq!(path.progress(0.0, 500.0), 1.0);
        assert_relative_eq!(path.progress(0.0, 750.0), 0.5);
        assert_relative_eq!(path.progress(0.0, 1000.0), 0.0);
    }

    #[test]
    fn test_position_along_polyline() {
        let path = SliderPath::new(
            300.0,
            1,
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(100.0, 0.0),
                Vector2::new(100.0, 100.0),
            ],
        );

        assert_relative_eq!(path.length(), 200.0);

        let middle = path.position_at(0.5);
        assert_relative_eq!(middle.x, 100.0);
        assert_relative_eq!(middle.y, 0.0);

        let pos = path.position_at_time(1000.0, Vector2::new(10.0, 10.0), 1300.0);
        assert_relative_eq!(pos.x, 110.0);
        assert_relative_eq!(pos.y, 110.0);
    }

    #[test]
    fn test_degenerate_path() {
        let path = SliderPath::new(0.0, 0, Vec::new());

        assert_eq!(path.repeats, 1);
        assert_eq!(path.progress(0.0, 10.0), 0.0);
        assert_eq!(path.position_at(0.7), Vector2::new(0.0, 0.0));
    }
}
