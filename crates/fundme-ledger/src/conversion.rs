use fundme_oracle::{unix_now, PriceFeed};
use fundme_types::{FundMeError, Result, Usd, Wei, ETHER_DECIMALS, USD_DECIMALS};
use serde::{Deserialize, Serialize};

/// Exchange rate as reported by a feed: `answer / 10^decimals` reference units per native unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    pub answer: u128,
    pub decimals: u8,
}

/// Decimal precision on both sides of the conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionParams {
    pub native_decimals: u8,
    pub reference_decimals: u8,
}

impl Default for ConversionParams {
    fn default() -> Self {
        Self {
            native_decimals: ETHER_DECIMALS,
            reference_decimals: USD_DECIMALS,
        }
    }
}

/// Read the current rate from a feed.
/// Any read failure, incomplete or stale round, or non-positive answer is `OracleUnavailable`.
pub fn get_price<F: PriceFeed + ?Sized>(feed: &F, max_age_secs: Option<u64>) -> Result<Rate> {
    let round = feed.latest_round_data().map_err(|e| match e {
        FundMeError::OracleUnavailable(_) => e,
        other => FundMeError::OracleUnavailable(other.to_string()),
    })?;
    let answer = round.usable_answer(unix_now(), max_age_secs)?;
    Ok(Rate {
        answer,
        decimals: feed.decimals(),
    })
}

/// Convert a native amount to reference units.
///
/// `amount * answer * 10^reference / (10^native * 10^rate_decimals)`, evaluated with a
/// single integer division so the result truncates toward zero exactly once.
pub fn convert(amount: Wei, rate: &Rate, params: &ConversionParams) -> Result<Usd> {
    let product = amount.raw().checked_mul(rate.answer).ok_or_else(|| {
        FundMeError::Overflow(format!("{} wei * rate {}", amount.raw(), rate.answer))
    })?;

    let scale_up = params.reference_decimals as u32;
    let scale_down = params.native_decimals as u32 + rate.decimals as u32;

    let converted = if scale_up >= scale_down {
        10u128
            .checked_pow(scale_up - scale_down)
            .and_then(|factor| product.checked_mul(factor))
            .ok_or_else(|| {
                FundMeError::Overflow(format!(
                    "{} scaled by 10^{}",
                    product,
                    scale_up - scale_down
                ))
            })?
    } else {
        // A divisor past 10^38 exceeds any u128 product
        match 10u128.checked_pow(scale_down - scale_up) {
            Some(divisor) => product / divisor,
            None => 0,
        }
    };

    Ok(Usd::from_raw(converted))
}

/// Read the feed and convert in one step
pub fn get_conversion_rate<F: PriceFeed + ?Sized>(
    amount: Wei,
    feed: &F,
    params: &ConversionParams,
    max_age_secs: Option<u64>,
) -> Result<Usd> {
    let rate = get_price(feed, max_age_secs)?;
    convert(amount, &rate, params)
}
