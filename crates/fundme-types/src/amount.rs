use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FundMeError, Result};

/// Decimals of the native unit (1 ether = 10^18 wei)
pub const ETHER_DECIMALS: u8 = 18;

/// Decimals of the reference currency amounts
pub const USD_DECIMALS: u8 = 18;

const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000; // 10^18

/// Native-unit amount in its smallest denomination
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Wei(u128);

/// Reference-currency amount with 18 decimal places
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Usd(u128);

impl Wei {
    pub const ZERO: Wei = Wei(0);

    pub const fn from_raw(raw: u128) -> Self {
        Wei(raw)
    }

    pub const fn raw(&self) -> u128 {
        self.0
    }

    /// Whole ether to wei
    pub const fn from_ether(ether: u64) -> Self {
        Wei((ether as u128) * WEI_PER_ETHER)
    }

    /// Parse a decimal ether string such as "0.1" or "25" without going through f64
    pub fn parse_ether(s: &str) -> Result<Self> {
        parse_fixed(s, ETHER_DECIMALS).map(Wei)
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(&self, other: Self) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Wei)
            .ok_or_else(|| FundMeError::Overflow(format!("{} + {} wei", self.0, other.0)))
    }

    pub fn checked_sub(&self, other: Self) -> Result<Self> {
        self.0
            .checked_sub(other.0)
            .map(Wei)
            .ok_or_else(|| FundMeError::Overflow(format!("{} - {} wei", self.0, other.0)))
    }
}

impl Usd {
    pub const ZERO: Usd = Usd(0);

    pub const fn from_raw(raw: u128) -> Self {
        Usd(raw)
    }

    pub const fn raw(&self) -> u128 {
        self.0
    }

    /// Whole dollars to 18-decimal fixed point
    pub const fn from_dollars(dollars: u64) -> Self {
        Usd((dollars as u128) * 1_000_000_000_000_000_000)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ETH", format_fixed(self.0, ETHER_DECIMALS))
    }
}

impl fmt::Display for Usd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} USD", format_fixed(self.0, USD_DECIMALS))
    }
}

fn format_fixed(raw: u128, decimals: u8) -> String {
    let scale = 10u128.pow(decimals as u32);
    let whole = raw / scale;
    let frac = raw % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", frac, width = decimals as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

fn parse_fixed(s: &str, decimals: u8) -> Result<u128> {
    let invalid = || FundMeError::InvalidAmount(format!("cannot parse: {}", s));
    let s = s.trim();
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac.len() > decimals as usize {
        return Err(FundMeError::InvalidAmount(format!(
            "{} has more than {} decimal places",
            s, decimals
        )));
    }

    let scale = 10u128.pow(decimals as u32);
    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let frac: u128 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = decimals as usize);
        padded.parse().map_err(|_| invalid())?
    };

    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(|| FundMeError::Overflow(format!("amount {} does not fit", s)))
}
