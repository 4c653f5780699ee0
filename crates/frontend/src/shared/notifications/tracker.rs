/// Remembers the last "today" count to detect new sales between refreshes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NewSalesTracker {
    last_count: u64,
    loaded: bool,
}

impl NewSalesTracker {
    /// Record a successful KPI load.
    ///
    /// Returns how many sales appeared since the previous load. The first
    /// load only sets the baseline; a lower count (day rollover, platform
    /// switch) is never reported.
    pub fn observe(&mut self, today_count: u64) -> Option<u64> {
        let increase = (self.loaded && today_count > self.last_count)
            .then(|| today_count - self.last_count);
        self.last_count = today_count;
        self.loaded = true;
        increase
    }

    /// Forget the baseline; the next load is treated as the first one
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn last_count(&self) -> u64 {
        self.last_count
    }
}
