//! [`Rating`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::{Decimal, RoundingStrategy};

/// Average rating in the `[0; 5]` range, with up to 2 decimal places.
///
/// `0` means "not rated yet".
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Rating(Decimal);

impl Rating {
    /// Maximal possible [`Rating`].
    pub const MAX: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

    /// Creates a new [`Rating`] by checking the provided value is within
    /// `[0; 5]` range.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        if val < Decimal::ZERO || val > Self::MAX {
            None
        } else {
            #[expect(
                clippy::allow_attributes,
                reason = "`#[expect]` is not fulfilled on `unsafe` blocks"
            )]
            #[allow(unsafe_code, reason = "invariants checked already")]
            Some(unsafe { Self::new_unchecked(val) })
        }
    }

    /// Creates a new [`Rating`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided value must be within `[0; 5]` range.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(val: Decimal) -> Self {
        Self(val)
    }

    /// Computes the arithmetic mean of the provided scores, rounded half away
    /// from zero to 2 decimal places.
    ///
    /// Returns the default [`Rating`] for no scores. [`None`] is returned if
    /// any score is out of the `[0; 5]` range.
    #[must_use]
    pub fn mean<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = u8>,
    {
        let (sum, count) = scores
            .into_iter()
            .fold((Decimal::ZERO, 0_u32), |(sum, count), s| {
                (sum + Decimal::from(s), count + 1)
            });
        if count == 0 {
            return Some(Self::default());
        }
        Self::new(
            (sum / Decimal::from(count))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Returns the inner [`Decimal`] value of this [`Rating`].
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Rating {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid rating value")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Average rating from `0` to `5` with up to 2 decimal places.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Rating = super::Rating;

    impl Rating {
        fn to_output<S: ScalarValue>(r: &Rating) -> Value<S> {
            Value::scalar(r.0.normalize().to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Rating` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Rating` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::Rating;

    fn rating(s: &str) -> Rating {
        Rating::new(s.parse::<Decimal>().unwrap()).unwrap()
    }

    #[test]
    fn bounds() {
        assert!(Rating::new(Decimal::ZERO).is_some());
        assert!(Rating::new(Decimal::from(5)).is_some());
        assert!(Rating::new(Decimal::from(6)).is_none());
        assert!(Rating::new(Decimal::NEGATIVE_ONE).is_none());
        assert!("4.5".parse::<Rating>().is_ok());
        assert!("five".parse::<Rating>().is_err());
    }

    #[test]
    fn mean_of_nothing_is_default() {
        assert_eq!(Rating::mean([]), Some(Rating::default()));
    }

    #[test]
    fn mean_is_rounded_to_two_places() {
        assert_eq!(Rating::mean([5, 4]), Some(rating("4.5")));
        assert_eq!(Rating::mean([5, 4, 4]), Some(rating("4.33")));
        assert_eq!(Rating::mean([5, 5, 4]), Some(rating("4.67")));
        assert_eq!(Rating::mean([1, 2, 2, 2, 2, 2]), Some(rating("1.83")));
    }

    #[test]
    fn mean_rejects_out_of_range_scores() {
        assert_eq!(Rating::mean([7, 9]), None);
    }
}
