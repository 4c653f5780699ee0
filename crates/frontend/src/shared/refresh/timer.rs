use gloo_timers::callback::Interval;

/// Recurring dashboard refresh; the interval stops when this is dropped
pub struct AutoRefresh {
    _interval: Interval,
    pub interval_ms: u32,
}

impl AutoRefresh {
    pub fn start(interval_ms: u32, tick: impl FnMut() + 'static) -> Self {
        log::info!("Auto-refresh every {} min", interval_ms / 60_000);
        Self {
            _interval: Interval::new(interval_ms, tick),
            interval_ms,
        }
    }
}
