use crate::hit_objects::ObjectId;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RegistryEntry {
    pub id: ObjectId,
    /// Last instant the object is still hittable
    pub expires_at: f64,
}

/// Objects which are still waiting for a hit or a miss,
/// sorted by expiry time
#[derive(Debug, Default)]
pub struct UnhitRegistry {
    entries: Vec<RegistryEntry>,
    /// Indexed by object id
    unhit: Vec<bool>,
}

impl UnhitRegistry {
    pub fn new(mut entries: Vec<RegistryEntry>) -> Self {
        // Stable, objects expiring together keep map order
        entries.sort_by(|a, b| a.expires_at.total_cmp(&b.expires_at));

        let size = entries.iter().map(|x| x.id.0 as usize + 1).max().unwrap_or(0);
        let mut unhit = vec![false; size];

        for entry in &entries {
            unhit[entry.id.0 as usize] = true;
        }

        Self { entries, unhit }
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.unhit.get(id.0 as usize).copied().unwrap_or(false)
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<RegistryEntry> {
        if !self.contains(id) {
            return None;
        }

        let index = self.entries.iter().position(|x| x.id == id)?;
        self.unhit[id.0 as usize] = false;

        Some(self.entries.remove(index))
    }

    /// Amount of entries at the front which expired before `time`
    pub fn expired_len(&self, time: f64) -> usize {
        self.entries.partition_point(|x| x.expires_at < time)
    }

    /// Expired entries in expiry order together with their index
    pub fn expired(&self, time: f64) -> impl Iterator<Item = (usize, &RegistryEntry)> {
        self.entries[..self.expired_len(time)].iter().enumerate()
    }

    /// Removes entries at `indices`, which must be taken from
    /// the current state of the registry
    pub fn remove_indices(&mut self, indices: &[usize]) {
        let mut indices = indices.to_vec();
        indices.sort_unstable();
        indices.dedup();

        // Highest first so remaining indices stay valid
        for index in indices.into_iter().rev() {
            if index < self.entries.len() {
                let entry = self.entries.remove(index);
                self.unhit[entry.id.0 as usize] = false;
            }
        }
    }

    pub fn drain_expired(&mut self, time: f64) -> Vec<RegistryEntry> {
        let len = self.expired_len(time);
        let drained: Vec<RegistryEntry> = self.entries.drain(..len).collect();

        for entry in &drained {
            self.unhit[entry.id.0 as usize] = false;
        }

        drained
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
