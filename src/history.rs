/// Time indexed log of samples.
///
/// Answers "what was the latest value at or before `t`",
/// samples with equal time keep their insertion order
#[derive(Debug, Clone)]
pub struct History<T> {
    samples: Vec<(f64, T)>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self {
            samples: Vec::new(),
        }
    }
}

impl<T> History<T> {
    pub fn add(&mut self, time: f64, value: T) {
        // Common case is appending in order
        let index = self.samples.partition_point(|(x, _)| *x <= time);
        self.samples.insert(index, (time, value));
    }

    pub fn data_at_time(&self, time: f64) -> Option<&T> {
        let index = self.samples.partition_point(|(x, _)| *x <= time);

        if index == 0 {
            return None;
        }

        self.samples.get(index - 1).map(|(_, value)| value)
    }

    pub fn first(&self) -> Option<&T> {
        self.samples.first().map(|(_, value)| value)
    }

    pub fn last(&self) -> Option<&T> {
        self.samples.last().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &T)> {
        self.samples.iter().map(|(time, value)| (*time, value))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[test]
fn test_history_lookup() {
    let mut history = History::default();

    history.add(100.0, "a");
    history.add(300.0, "c");
    history.add(200.0, "b");
    history.add(200.0, "b2");

    assert_eq!(history.data_at_time(99.0), None);
    assert_eq!(history.data_at_time(100.0), Some(&"a"));
    assert_eq!(history.data_at_time(250.0), Some(&"b2"));
    assert_eq!(history.data_at_time(1000.0), Some(&"c"));
    assert_eq!(history.len(), 4);
}
