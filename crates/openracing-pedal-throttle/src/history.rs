//! Fixed-capacity ring buffer of sampled acceleration values.
//!
//! The buffer carries no synchronization of its own; it is only ever touched
//! under the engine's lock.

/// Rolling record of the most recent `capacity` samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedHistoryBuffer {
    samples: Box<[u16]>,
    cursor: usize,
    len: usize,
}

impl SpeedHistoryBuffer {
    /// Create a zero-filled ring. A requested capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: vec![0; capacity.max(1)].into_boxed_slice(),
            cursor: 0,
            len: 0,
        }
    }

    /// Write `value` at the cursor and advance it. O(1).
    pub fn push(&mut self, value: u16) {
        if let Some(slot) = self.samples.get_mut(self.cursor) {
            *slot = value;
        }
        self.cursor = self.cursor.wrapping_add(1) % self.capacity();
        self.len = self.len.saturating_add(1).min(self.capacity());
    }

    /// Samples oldest-to-newest; length is `min(pushed, capacity)`.
    pub fn snapshot(&self) -> Vec<u16> {
        self.iter().collect()
    }

    /// Iterate oldest-to-newest without allocating.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        let capacity = self.capacity();
        let start = if self.len < capacity { 0 } else { self.cursor };
        (0..self.len).filter_map(move |offset| {
            self.samples
                .get(start.wrapping_add(offset) % capacity)
                .copied()
        })
    }

    /// Most recently pushed sample.
    pub fn latest(&self) -> Option<u16> {
        if self.len == 0 {
            return None;
        }
        let capacity = self.capacity();
        let index = self.cursor.wrapping_add(capacity).wrapping_sub(1) % capacity;
        self.samples.get(index).copied()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.samples.fill(0);
        self.cursor = 0;
        self.len = 0;
    }
}
