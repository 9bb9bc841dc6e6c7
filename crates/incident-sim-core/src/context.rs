//! Explicit generation context.
//!
//! Every factory call takes a `&mut GenerationContext` instead of reaching
//! for a process-wide random source. Two contexts built from the same seed
//! and a fixed clock produce identical incidents.

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Builder;

/// Source of "now" for generated timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// Eastern Standard Time, the simulated city's local offset.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -5;

/// Maximum age (seconds) of a generated call relative to `now`.
pub const DEFAULT_CALL_WINDOW_SECS: i64 = 300;

pub struct GenerationContext {
    rng: StdRng,
    clock: Clock,
    utc_offset: FixedOffset,
    call_window_secs: i64,
}

impl GenerationContext {
    /// Deterministic random source, system clock.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Random source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            clock: Clock::System,
            utc_offset: offset_from_hours(DEFAULT_UTC_OFFSET_HOURS),
            call_window_secs: DEFAULT_CALL_WINDOW_SECS,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn with_call_window_secs(mut self, secs: i64) -> Self {
        self.call_window_secs = secs.max(0);
        self
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// Hour of day (0–23) of `t` in the simulated city's local time.
    pub fn local_hour(&self, t: DateTime<Utc>) -> u32 {
        t.with_timezone(&self.utc_offset).hour()
    }

    /// A call time at most `call_window_secs` before `now`.
    pub fn sample_call_time(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let back = self.rng.gen_range(0..=self.call_window_secs);
        now - chrono::Duration::seconds(back)
    }

    /// `prefix` followed by 8 uppercase hex characters drawn from the RNG.
    pub fn short_id(&mut self, prefix: &str) -> String {
        let bytes: [u8; 16] = self.rng.gen();
        let id = Builder::from_random_bytes(bytes).into_uuid();
        let simple = id.simple().to_string();
        format!("{}{}", prefix, simple[..8].to_uppercase())
    }
}

/// Convert whole hours to a [`FixedOffset`], falling back to UTC when the
/// value is outside chrono's supported range.
pub fn offset_from_hours(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed() -> Clock {
        Clock::Fixed(Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap())
    }

    #[test]
    fn test_same_seed_same_ids() {
        let mut a = GenerationContext::seeded(42);
        let mut b = GenerationContext::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.short_id("INC"), b.short_id("INC"));
        }
    }

    #[test]
    fn test_short_id_shape() {
        let mut ctx = GenerationContext::seeded(1);
        let id = ctx.short_id("INC");
        assert_eq!(id.len(), 11);
        assert!(id.starts_with("INC"));
        assert!(id[3..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id[3..].to_uppercase(), id[3..]);
    }

    #[test]
    fn test_local_hour_uses_offset() {
        let ctx = GenerationContext::seeded(1).with_clock(fixed());
        // 14:30 UTC is 09:30 in UTC-5.
        assert_eq!(ctx.local_hour(ctx.now()), 9);
        let utc = GenerationContext::seeded(1).with_utc_offset(offset_from_hours(0));
        assert_eq!(utc.local_hour(fixed().now()), 14);
    }

    #[test]
    fn test_call_time_within_window() {
        let mut ctx = GenerationContext::seeded(3)
            .with_clock(fixed())
            .with_call_window_secs(60);
        let now = ctx.now();
        for _ in 0..100 {
            let t = ctx.sample_call_time(now);
            assert!(t <= now);
            assert!(now - t <= chrono::Duration::seconds(60));
        }
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_utc() {
        assert_eq!(offset_from_hours(99).local_minus_utc(), 0);
        assert_eq!(offset_from_hours(-5).local_minus_utc(), -5 * 3600);
    }
}
