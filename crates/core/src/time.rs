use chrono::{DateTime, Duration, Utc};

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// Returns true if this clock represents real time.
    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self, Clock::Default)
    }

    /// Returns true if this clock is fixed.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// Upper bound on a single measured question duration.
///
/// Anything above this is treated the same as a negative reading: a clock
/// anomaly, not a real measurement.
pub const MAX_ELAPSED_SECS: u64 = 24 * 60 * 60;

/// Whole seconds elapsed between `start` and `now`, clamped to
/// `[0, MAX_ELAPSED_SECS]`.
///
/// A backward clock jump (negative delta) or an absurdly large delta both
/// yield 0 rather than leaking the anomaly into recorded timings.
#[must_use]
pub fn elapsed_secs(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = now.signed_duration_since(start).num_milliseconds();
    if millis < 0 {
        return 0;
    }
    let secs = (millis / 1000) as u64;
    if secs > MAX_ELAPSED_SECS { 0 } else { secs }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_floors_to_whole_seconds() {
        let start = fixed_now();
        let now = start + Duration::milliseconds(2_999);
        assert_eq!(elapsed_secs(start, now), 2);
    }

    #[test]
    fn backward_jump_clamps_to_zero() {
        let start = fixed_now();
        let now = start - Duration::seconds(30);
        assert_eq!(elapsed_secs(start, now), 0);
    }

    #[test]
    fn absurd_duration_clamps_to_zero() {
        let start = fixed_now();
        let now = start + Duration::days(3);
        assert_eq!(elapsed_secs(start, now), 0);
    }

    #[test]
    fn fixed_clock_advances() {
        let mut clock = fixed_clock();
        let before = clock.now();
        clock.advance(Duration::seconds(5));
        assert_eq!(clock.now(), before + Duration::seconds(5));
    }
}
