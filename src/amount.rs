use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// number of implied decimal places carried by an amount
pub const DECIMALS: u32 = 18;

/// raw units in one whole token
pub const UNIT: u128 = 1_000_000_000_000_000_000;

/// Amount type: unsigned fixed-point integer with 18 implied decimal places
///
/// Stored as raw units so interest arithmetic stays exact. Serialized as a
/// string of raw units since 128-bit integers don't survive every json reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);
    pub const MAX: Amount = Amount(u128::MAX);

    /// create from raw units (10^-18 of a token)
    pub const fn from_raw(raw: u128) -> Self {
        Amount(raw)
    }

    /// create from whole tokens
    pub fn from_units(units: u64) -> Self {
        Amount(units as u128 * UNIT)
    }

    /// create from a decimal token amount, truncating past 18 places
    pub fn from_tokens(tokens: Decimal) -> Option<Self> {
        if tokens.is_sign_negative() {
            return None;
        }
        let whole = tokens.trunc().to_u128()?;
        let frac = (tokens.fract() * Decimal::from(UNIT as u64)).trunc().to_u128()?;
        whole.checked_mul(UNIT)?.checked_add(frac).map(Amount)
    }

    /// get raw units
    pub const fn raw(&self) -> u128 {
        self.0
    }

    /// token amount as a decimal, if it fits in 96 bits of mantissa
    pub fn as_decimal(&self) -> Option<Decimal> {
        let raw = i128::try_from(self.0).ok()?;
        Decimal::try_from_i128_with_scale(raw, DECIMALS).ok()
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    pub fn saturating_sub(self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / UNIT;
        let frac = self.0 % UNIT;
        if frac == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:018}", frac);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl FromStr for Amount {
    type Err = std::num::ParseIntError;

    /// parse raw units
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u128>().map(Amount)
    }
}

impl TryFrom<String> for Amount {
    type Error = std::num::ParseIntError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Amount> for String {
    fn from(a: Amount) -> Self {
        a.0.to_string()
    }
}

impl From<u128> for Amount {
    fn from(raw: u128) -> Self {
        Amount(raw)
    }
}

/// interest rate in basis points (500 = 5%), charged pro rata over the loan term
///
/// Stored wider than the valid range so out-of-range rates read from config
/// reach `LoanTerms::validate` instead of failing inside the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasisPoints(u32);

impl BasisPoints {
    pub const ZERO: BasisPoints = BasisPoints(0);
    /// 100% over the term
    pub const MAX: BasisPoints = BasisPoints(10_000);
    /// denominator for basis point arithmetic
    pub const SCALE: u128 = 10_000;

    pub const fn from_bps(bps: u32) -> Self {
        BasisPoints(bps)
    }

    pub const fn as_bps(&self) -> u32 {
        self.0
    }

    /// get as a decimal fraction (e.g. 0.05 for 5%)
    pub fn as_rate(&self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(10_000)
    }

    /// get as percentage (e.g. 5 for 5%)
    pub fn as_percentage(&self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(100)
    }

    pub fn is_valid(&self) -> bool {
        *self <= Self::MAX
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}
