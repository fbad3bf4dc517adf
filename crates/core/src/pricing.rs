//! Pricing

use rust_decimal::Decimal;
use rusty_money::{
    Money, MoneyError,
    iso::{self, Currency},
};
use thiserror::Error;

/// Currency every price in the store is quoted in.
pub fn currency() -> &'static Currency {
    iso::INR
}

/// Money in the store currency.
pub type Rupees = Money<'static, Currency>;

/// Errors that can occur while calculating total price.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Price of `quantity` units at `price_per_unit`.
pub fn line_total(price_per_unit: Decimal, quantity: u32) -> Rupees {
    Money::from_decimal(price_per_unit * Decimal::from(quantity), currency())
}

/// Zero in the store currency.
pub fn zero() -> Rupees {
    Money::from_minor(0, currency())
}

/// Sums a sequence of amounts; an empty sequence totals zero.
///
/// # Errors
///
/// - [`TotalPriceError::Money`]: Wrapped money arithmetic or currency mismatch error.
pub fn total_price<I>(amounts: I) -> Result<Rupees, TotalPriceError>
where
    I: IntoIterator<Item = Rupees>,
{
    let total = amounts
        .into_iter()
        .try_fold(zero(), |acc, amount| acc.add(amount))?;

    Ok(total)
}
