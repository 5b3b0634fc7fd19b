use rust_decimal::Decimal;

use crate::error::WaccError;
use crate::CostOfCapitalResult;

/// `numerator / denominator`. A zero denominator or a quotient outside the
/// decimal range is `DivisionUndefined`.
pub(crate) fn div(
    numerator: Decimal,
    denominator: Decimal,
    context: &str,
) -> CostOfCapitalResult<Decimal> {
    if denominator.is_zero() {
        return Err(WaccError::division(format!("{context} (divisor is zero)")));
    }
    match numerator.checked_div(denominator) {
        Some(quotient) => Ok(quotient),
        None => Err(WaccError::division(format!(
            "{context} (quotient exceeds the decimal range)"
        ))),
    }
}

pub(crate) fn mul(a: Decimal, b: Decimal, field: &str) -> CostOfCapitalResult<Decimal> {
    match a.checked_mul(b) {
        Some(product) => Ok(product),
        None => Err(WaccError::invalid(field, "Product exceeds the decimal range")),
    }
}

pub(crate) fn add(a: Decimal, b: Decimal, field: &str) -> CostOfCapitalResult<Decimal> {
    match a.checked_add(b) {
        Some(total) => Ok(total),
        None => Err(WaccError::invalid(field, "Sum exceeds the decimal range")),
    }
}

pub(crate) fn sub(a: Decimal, b: Decimal, field: &str) -> CostOfCapitalResult<Decimal> {
    match a.checked_sub(b) {
        Some(difference) => Ok(difference),
        None => Err(WaccError::invalid(field, "Difference exceeds the decimal range")),
    }
}

/// Running total that stops at the first overflow.
pub(crate) fn sum<I>(values: I, field: &str) -> CostOfCapitalResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| add(total, value, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_div_tiny_denominator_overflows() {
        let err = div(dec!(10), Decimal::new(1, 28), "yield").unwrap_err();
        assert!(matches!(err, WaccError::DivisionUndefined { .. }));
    }

    #[test]
    fn test_div_zero_denominator() {
        let err = div(Decimal::ONE, Decimal::ZERO, "yield").unwrap_err();
        assert!(matches!(err, WaccError::DivisionUndefined { .. }));
    }

    #[test]
    fn test_sum_stops_at_overflow() {
        let err = sum([Decimal::MAX, Decimal::MAX], "market_value").unwrap_err();
        match err {
            WaccError::InvalidParameter { field, .. } => assert_eq!(field, "market_value"),
            e => panic!("Expected InvalidParameter, got {e:?}"),
        }
        assert_eq!(sum([dec!(1.5), dec!(2.5)], "x").unwrap(), dec!(4.0));
    }

    #[test]
    fn test_mul_and_sub_overflow() {
        assert!(mul(Decimal::MAX, dec!(2), "beta").is_err());
        assert!(sub(Decimal::MIN, Decimal::MAX, "premium").is_err());
        assert_eq!(mul(dec!(1.5), dec!(2), "beta").unwrap(), dec!(3.0));
    }
}
