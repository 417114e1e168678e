use chrono::{DateTime, Utc};

use crate::amount::{Amount, BasisPoints};

/// engine for simple, linear interest over a fixed term
///
/// Interest grows with whole elapsed seconds and stops once the full term has
/// elapsed. All division truncates, matching integer ledger arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualEngine {
    pub rate: BasisPoints,
    pub duration_secs: u64,
}

impl AccrualEngine {
    pub fn new(rate: BasisPoints, duration_secs: u64) -> Self {
        Self { rate, duration_secs }
    }

    /// seconds of accrual between start and now, capped at the term
    pub fn elapsed_seconds(&self, start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
        let secs = (now - start).num_seconds().max(0) as u64;
        secs.min(self.duration_secs)
    }

    /// floor(principal * rate * elapsed / (10000 * duration))
    pub fn interest_for(&self, principal: Amount, elapsed_secs: u64) -> Amount {
        if self.duration_secs == 0 {
            return Amount::ZERO;
        }
        let elapsed = elapsed_secs.min(self.duration_secs) as u128;
        let numerator = self.rate.as_bps() as u128 * elapsed;
        let denominator = BasisPoints::SCALE * self.duration_secs as u128;
        // numerator <= denominator whenever the rate is valid, so the quotient
        // never exceeds the principal
        mul_div_floor(principal.raw(), numerator, denominator)
            .map(Amount::from_raw)
            .unwrap_or(Amount::MAX)
    }

    /// interest owed over the whole term
    pub fn full_term_interest(&self, principal: Amount) -> Amount {
        self.interest_for(principal, self.duration_secs)
    }

    /// principal plus interest accrued from start to now
    pub fn amount_due(
        &self,
        principal: Amount,
        start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<Amount> {
        let elapsed = self.elapsed_seconds(start, now);
        principal.checked_add(self.interest_for(principal, elapsed))
    }
}

/// floor(a * b / d) with a full 256-bit intermediate product
///
/// Returns None when d is zero or the quotient does not fit in 128 bits.
pub fn mul_div_floor(a: u128, b: u128, d: u128) -> Option<u128> {
    if d == 0 {
        return None;
    }
    if let Some(product) = a.checked_mul(b) {
        return Some(product / d);
    }
    let (hi, lo) = widening_mul(a, b);
    div_wide(hi, lo, d)
}

fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = u64::MAX as u128;
    let (a0, a1) = (a & MASK, a >> 64);
    let (b0, b1) = (b & MASK, b >> 64);

    let p00 = a0 * b0;
    let p01 = a0 * b1;
    let p10 = a1 * b0;
    let p11 = a1 * b1;

    let mid = (p00 >> 64) + (p01 & MASK) + (p10 & MASK);
    let lo = (p00 & MASK) | (mid << 64);
    let hi = p11 + (p01 >> 64) + (p10 >> 64) + (mid >> 64);
    (hi, lo)
}

// restoring long division of hi:lo by d
fn div_wide(hi: u128, lo: u128, d: u128) -> Option<u128> {
    if hi >= d {
        return None;
    }
    let mut rem = hi;
    let mut quotient: u128 = 0;
    for i in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((lo >> i) & 1);
        quotient <<= 1;
        if carry == 1 || rem >= d {
            rem = rem.wrapping_sub(d);
            quotient |= 1;
        }
    }
    Some(quotient)
}
