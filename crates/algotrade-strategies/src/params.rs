//! Shared parameter defaults and range checks for strategy configs.

use algotrade_core::{error::StrategyError, types::FillPolicy};

pub(crate) fn default_slow() -> usize {
    26
}

pub(crate) fn default_fast() -> usize {
    12
}

pub(crate) fn default_smooth() -> usize {
    9
}

/// Default `fill_value` of the MACD-based strategies.
pub(crate) fn zero_fill() -> Option<FillPolicy> {
    Some(FillPolicy::Constant(0.0))
}

pub(crate) fn ensure_period(name: &str, value: usize) -> Result<(), StrategyError> {
    if value == 0 {
        return Err(StrategyError::InvalidConfig(format!(
            "{name} must be greater than 0"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_ordered(
    short_name: &str,
    short: usize,
    long_name: &str,
    long: usize,
) -> Result<(), StrategyError> {
    ensure_period(short_name, short)?;
    ensure_period(long_name, long)?;
    if short >= long {
        return Err(StrategyError::InvalidConfig(format!(
            "{short_name} ({short}) must be less than {long_name} ({long})"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_macd_periods(
    fast: usize,
    slow: usize,
    smooth: usize,
) -> Result<(), StrategyError> {
    ensure_ordered("fast", fast, "slow", slow)?;
    ensure_period("smooth", smooth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_periods() {
        assert!(ensure_ordered("short", 2, "long", 4).is_ok());

        let err = ensure_ordered("short", 4, "long", 4).unwrap_err();
        assert!(err.to_string().contains("short (4) must be less than long (4)"));

        assert!(ensure_macd_periods(12, 26, 0).is_err());
        assert!(ensure_period("lookback", 0).is_err());
    }
}
