//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;

use crate::define_kind;

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Creates a new [`Money`] of the provided `amount` in the `currency`.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Indicates whether this [`Money`] is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Multiplies this per-unit [`Money`] by the provided number of `units`.
    ///
    /// Computed on [`Decimal`]s, so no precision is lost. Returns [`None`] if
    /// the result doesn't fit into a [`Decimal`].
    #[must_use]
    pub fn checked_mul(self, units: u16) -> Option<Self> {
        Some(Self {
            amount: self.amount.checked_mul(Decimal::from(units))?,
            currency: self.currency,
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        write!(f, "{}{currency}", amount.normalize())
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 {
            return Err("too short");
        }
        if !s.is_char_boundary(s.len() - 3) {
            return Err("invalid currency");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        Ok(Self { amount, currency })
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "Euro."]
        Eur = 1,

        #[doc = "US Dollar."]
        Usd = 2,

        #[doc = "Pound Sterling."]
        Gbp = 3,
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Money in `{major}.{minor}{currency}` format, where:
    /// - `major` is an integer;
    /// - `minor` is an optional integer;
    /// - `currency` is a three-letter currency code (`EUR`, `USD`, `GBP`).
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Money::from_str("123.45EUR").unwrap(),
            Money::new(decimal("123.45"), Currency::Eur),
        );
        assert_eq!(
            Money::from_str("0.5GBP").unwrap(),
            Money::new(decimal("0.5"), Currency::Gbp),
        );

        assert!(Money::from_str("123.45").is_err());
        assert!(Money::from_str("123.45Eu").is_err());
        assert!(Money::from_str("123.45Euros").is_err());
        assert!(Money::from_str("123.45RUB").is_err());
        assert!(Money::from_str("1€EUR").is_err());

        assert!(Money::from_str("123.00USD").is_ok());
        assert!(Money::from_str("123USD").is_ok());
    }

    #[test]
    fn to_string() {
        assert_eq!(
            Money::new(decimal("123.45"), Currency::Eur).to_string(),
            "123.45EUR",
        );
        assert_eq!(
            Money::new(decimal("123.450"), Currency::Gbp).to_string(),
            "123.45GBP",
        );
        assert_eq!(
            Money::new(decimal("123.00"), Currency::Usd).to_string(),
            "123USD",
        );
        assert_eq!(Money::new(decimal("0"), Currency::Usd).to_string(), "0USD");
    }

    #[test]
    fn multiplies_without_drift() {
        assert_eq!(
            Money::new(decimal("25"), Currency::Eur).checked_mul(20),
            Some(Money::new(decimal("500"), Currency::Eur)),
        );
        assert_eq!(
            Money::new(decimal("0.1"), Currency::Eur).checked_mul(3),
            Some(Money::new(decimal("0.3"), Currency::Eur)),
        );
        assert_eq!(
            Money::new(decimal("12.35"), Currency::Usd).checked_mul(7),
            Some(Money::new(decimal("86.45"), Currency::Usd)),
        );
    }

    #[test]
    fn multiplication_overflow_is_none() {
        let max = Money::new(Decimal::MAX, Currency::Eur);

        assert_eq!(max.checked_mul(1), Some(max));
        assert_eq!(max.checked_mul(2), None);
        assert_eq!(
            Money::new(decimal("79228162514264337593543950335"), Currency::Eur)
                .checked_mul(20),
            None,
        );
    }

    #[test]
    fn positiveness() {
        assert!(Money::new(decimal("0.01"), Currency::Eur).is_positive());
        assert!(!Money::new(decimal("0"), Currency::Eur).is_positive());
        assert!(!Money::new(decimal("-1"), Currency::Eur).is_positive());
    }
}
