//! Linear Dutch-auction price curve.
//!
//! The price holds at `starting_amount` until `start_time`, decays linearly
//! to `ending_amount` over `decay_duration`, then holds at the floor until
//! `end_time`. The decay advances in whole steps of
//! `1 / PRICE_STEP_SCALE` of the window, truncating at each division.

use serde::{Deserialize, Serialize};

use crate::{Amount, Result, SwapError, Timestamp, constants};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionCurve {
    starting_amount: Amount,
    ending_amount: Amount,
    start_time: Timestamp,
    end_time: Timestamp,
    decay_duration: u64,
}

impl AuctionCurve {
    /// # Errors
    /// `InvalidAuctionCurve` unless `starting > ending > 0`,
    /// `start_time < end_time`, `decay_duration > 0`, and a tail window
    /// remains after the decay (`end_time > start_time + decay_duration`).
    pub fn new(
        starting_amount: Amount,
        ending_amount: Amount,
        start_time: Timestamp,
        end_time: Timestamp,
        decay_duration: u64,
    ) -> Result<Self> {
        let invalid = |reason: String| -> Result<Self> {
            Err(SwapError::InvalidAuctionCurve { reason })
        };

        if ending_amount == 0 {
            return invalid("ending amount is zero".into());
        }
        if starting_amount <= ending_amount {
            return invalid(format!(
                "starting amount {starting_amount} must exceed ending amount {ending_amount}"
            ));
        }
        if start_time >= end_time {
            return invalid(format!(
                "start time {start_time} must precede end time {end_time}"
            ));
        }
        if decay_duration == 0 {
            return invalid("decay duration is zero".into());
        }
        match start_time.checked_add(decay_duration) {
            Some(decay_end) if decay_end < end_time => {}
            _ => {
                return invalid(format!(
                    "decay of {decay_duration}s from {start_time} leaves no window before {end_time}"
                ));
            }
        }

        Ok(Self {
            starting_amount,
            ending_amount,
            start_time,
            end_time,
            decay_duration,
        })
    }

    #[must_use]
    pub fn starting_amount(&self) -> Amount {
        self.starting_amount
    }

    #[must_use]
    pub fn ending_amount(&self) -> Amount {
        self.ending_amount
    }

    #[must_use]
    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    #[must_use]
    pub fn end_time(&self) -> Timestamp {
        self.end_time
    }

    #[must_use]
    pub fn decay_duration(&self) -> u64 {
        self.decay_duration
    }

    /// Time at which the floor price is reached.
    #[must_use]
    pub fn decay_end(&self) -> Timestamp {
        // Checked in `new`.
        self.start_time + self.decay_duration
    }

    /// Price of a 100% fill at `now`. Non-increasing in `now`.
    #[must_use]
    pub fn price_at(&self, now: Timestamp) -> Amount {
        if now < self.start_time {
            return self.starting_amount;
        }
        if now >= self.decay_end() {
            return self.ending_amount;
        }
        let elapsed = Amount::from(now - self.start_time);
        let step = elapsed * constants::PRICE_STEP_SCALE / Amount::from(self.decay_duration);
        let spread = self.starting_amount - self.ending_amount;
        // Equals `spread * step / SCALE` without overflowing for large spreads.
        let scale = constants::PRICE_STEP_SCALE;
        let decayed = spread / scale * step + spread % scale * step / scale;
        self.starting_amount - decayed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> AuctionCurve {
        AuctionCurve::new(1000, 500, 10_000, 20_000, 600).unwrap()
    }

    #[test]
    fn halfway_through_decay() {
        assert_eq!(curve().price_at(10_300), 750);
    }

    #[test]
    fn huge_spread_does_not_overflow() {
        let start = Amount::MAX / 2;
        let c = AuctionCurve::new(start, 1, 0, 1_000, 100).unwrap();
        let spread = start - 1;
        let expected = start - (spread / 100 * 50 + spread % 100 * 50 / 100);
        assert_eq!(c.price_at(50), expected);
        assert!(c.price_at(50) < start);
        assert!(c.price_at(50) > 1);
        assert_eq!(c.price_at(100), 1);

        let c = AuctionCurve::new(Amount::MAX, Amount::MAX - 1_000, 0, 1_000, 100).unwrap();
        assert_eq!(c.price_at(50), Amount::MAX - 500);
        assert_eq!(c.price_at(99), Amount::MAX - 990);
    }

    #[test]
    fn holds_before_start_and_after_decay() {
        let c = curve();
        assert_eq!(c.price_at(0), 1000);
        assert_eq!(c.price_at(9_999), 1000);
        assert_eq!(c.price_at(10_000), 1000);
        assert_eq!(c.price_at(10_600), 500);
        assert_eq!(c.price_at(19_999), 500);
        assert_eq!(c.price_at(u64::MAX), 500);
    }

    #[test]
    fn steps_truncate_to_whole_percent() {
        // 5s of 600s is 0.83% → step 0.
        assert_eq!(curve().price_at(10_005), 1000);
        // 6s is exactly 1%.
        assert_eq!(curve().price_at(10_006), 995);
    }

    #[test]
    fn price_is_non_increasing() {
        let c = curve();
        let mut prev = c.price_at(9_000);
        for now in 9_000..11_000 {
            let price = c.price_at(now);
            assert!(price <= prev, "price rose at {now}");
            assert!(price >= c.ending_amount() && price <= c.starting_amount());
            prev = price;
        }
    }

    #[test]
    fn invalid_parameters_rejected() {
        let cases = [
            (500, 500, 0, 1000, 100),
            (500, 600, 0, 1000, 100),
            (500, 0, 0, 1000, 100),
            (1000, 500, 1000, 1000, 100),
            (1000, 500, 0, 1000, 0),
            (1000, 500, 0, 1000, 1000),
            (1000, 500, u64::MAX - 1, u64::MAX, 5),
        ];
        for (start, end, t0, t1, decay) in cases {
            let err = AuctionCurve::new(start, end, t0, t1, decay).unwrap_err();
            assert!(
                matches!(err, SwapError::InvalidAuctionCurve { .. }),
                "accepted {start} {end} {t0} {t1} {decay}"
            );
        }
    }
}
