
use std::time::Duration;


/// Long-press delay for the host repeat-delay setting (0..=3, anything above is clamped)
/// .. the os repeat kicks in at 250ms + 250ms per unit, and we fire at 80% of that so the popup always beats the first repeat
pub fn long_press_delay (repeat_delay_units:u32) -> Duration {
    let base_ms = 250.0 + repeat_delay_units.min(3) as f64 * 250.0;
    Duration::from_millis ((0.8 * base_ms).round() as u64)
}



/// Single-shot countdown bookkeeping .. the actual tick source lives with the host (a thread timer on the hook thread),
/// this only tracks whether an expiry delivered from there is still meaningful
# [ derive (Debug, Clone) ]
pub struct LongPressTimer {
    delay : Duration,
    armed : bool,
}

impl LongPressTimer {

    pub fn new (delay:Duration) -> LongPressTimer {
        LongPressTimer { delay, armed: false }
    }

    pub fn delay (&self) -> Duration { self.delay }

    pub fn is_armed (&self) -> bool { self.armed }

    /// (re)starts the countdown, returning the duration the host should schedule
    pub fn restart (&mut self) -> Duration {
        self.armed = true;
        self.delay
    }

    pub fn stop (&mut self) { self.armed = false }

    /// consumes an expiry from the host .. returns false for a stale one (timer was stopped after the tick got queued)
    pub fn expire (&mut self) -> bool {
        std::mem::replace (&mut self.armed, false)
    }
}
