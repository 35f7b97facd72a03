//! [`Activity`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money, Rating};
use derive_more::{Display, Error, From};

use super::{define_id, define_text, review, supplier, Capacity, PartySize};

/// Bookable offering of a supplier.
#[derive(Clone, Debug)]
pub struct Activity {
    /// ID of this [`Activity`].
    pub id: Id,

    /// ID of the supplier owning this [`Activity`].
    pub supplier_id: supplier::Id,

    /// [`Name`] of this [`Activity`].
    pub name: Name,

    /// Price of this [`Activity`] for a single person.
    pub price_per_person: Money,

    /// Maximal number of people this [`Activity`] can host at once.
    pub capacity: Capacity,

    /// Approval [`Status`] of this [`Activity`].
    pub status: Status,

    /// Average [`Rating`] of this [`Activity`] across all its reviews.
    pub rating: Rating,

    /// Number of reviews the [`Activity::rating`] is computed from.
    pub reviews_count: u32,

    /// [`DateTime`] when this [`Activity`] was created.
    pub created_at: CreationDateTime,
}

impl Activity {
    /// Computes the total price of this [`Activity`] for a party of the
    /// provided size.
    ///
    /// # Errors
    ///
    /// - If the party doesn't fit into the [`Activity::capacity`].
    /// - If the total price is too large to be represented.
    pub fn price_for(&self, party_size: PartySize) -> Result<Money, PriceError> {
        if !self.capacity.fits(party_size) {
            return Err(CapacityExceeded {
                activity_id: self.id,
                capacity: self.capacity,
                party_size,
            }
            .into());
        }
        self.price_per_person
            .checked_mul(party_size.get())
            .ok_or_else(|| {
                PriceOverflow {
                    activity_id: self.id,
                    party_size,
                }
                .into()
            })
    }

    /// Recomputes [`Activity::rating`] and [`Activity::reviews_count`] out of
    /// the complete set of [`review::Score`]s given to this [`Activity`].
    pub fn rate<I>(&mut self, scores: I)
    where
        I: IntoIterator<Item = review::Score>,
    {
        let scores = scores.into_iter().map(u8::from).collect::<Vec<_>>();
        // Scores are always within `1..=5`, so the mean is within bounds.
        self.rating = Rating::mean(scores.iter().copied()).unwrap_or_default();
        self.reviews_count = u32::try_from(scores.len()).unwrap_or(u32::MAX);
    }
}

/// Error of a party not fitting into an [`Activity`].
#[derive(Clone, Copy, Debug, Display, Error)]
#[display(
    "party of {party_size} exceeds capacity {capacity} of \
     `Activity(id: {activity_id})`"
)]
pub struct CapacityExceeded {
    /// ID of the [`Activity`].
    pub activity_id: Id,

    /// [`Capacity`] of the [`Activity`].
    pub capacity: Capacity,

    /// Requested [`PartySize`].
    pub party_size: PartySize,
}

/// Error of a total price of an [`Activity`] being too large.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display(
    "price of `Activity(id: {activity_id})` for party of {party_size} \
     overflows"
)]
pub struct PriceOverflow {
    /// ID of the [`Activity`].
    pub activity_id: Id,

    /// Requested [`PartySize`].
    pub party_size: PartySize,
}

/// Error of pricing an [`Activity`] for a party.
#[derive(Clone, Copy, Debug, Display, Error, From)]
pub enum PriceError {
    /// Party doesn't fit into the [`Activity`].
    #[display("{_0}")]
    CapacityExceeded(CapacityExceeded),

    /// Total price doesn't fit into [`Money`].
    #[display("{_0}")]
    Overflow(PriceOverflow),
}

define_id! {
    #[doc = "ID of an [`Activity`]."]
    Id
}

define_text! {
    #[doc = "Name of an [`Activity`]."]
    Name(max = 256)
}

define_kind! {
    #[doc = "Approval status of an [`Activity`]."]
    enum Status {
        #[doc = "[`Activity`] awaits a moderation."]
        Pending = 1,

        #[doc = "[`Activity`] is approved to be listed."]
        Approved = 2,

        #[doc = "[`Activity`] is rejected by a moderation."]
        Rejected = 3,
    }
}

/// [`DateTime`] when an [`Activity`] was created.
pub type CreationDateTime = DateTimeOf<(Activity, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{money::Currency, DateTime, Money, Rating};

    use super::{Activity, CapacityExceeded, Id, Name, PriceError, Status};
    use crate::domain::{review, supplier, Capacity, PartySize};

    fn activity(price: &str, capacity: u16) -> Activity {
        Activity {
            id: Id::new(),
            supplier_id: supplier::Id::new(),
            name: Name::new("Canoeing").unwrap(),
            price_per_person: Money::new(price.parse().unwrap(), Currency::Eur),
            capacity: Capacity::new(capacity).unwrap(),
            status: Status::Approved,
            rating: Rating::default(),
            reviews_count: 0,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn price_is_per_person_times_party() {
        let a = activity("25", 20);

        assert_eq!(
            a.price_for(PartySize::new(20).unwrap()).unwrap(),
            Money::new("500".parse().unwrap(), Currency::Eur),
        );
        assert!(matches!(
            a.price_for(PartySize::new(21).unwrap()),
            Err(PriceError::CapacityExceeded(CapacityExceeded { .. })),
        ));
    }

    #[test]
    fn huge_price_is_refused_instead_of_overflowing() {
        let a = activity("79228162514264337593543950335", 20);

        assert!(matches!(
            a.price_for(PartySize::new(2).unwrap()),
            Err(PriceError::Overflow(e)) if e.activity_id == a.id,
        ));
        assert!(a.price_for(PartySize::new(1).unwrap()).is_ok());
    }

    #[test]
    fn price_keeps_cents_exact() {
        let a = activity("19.99", 100);

        assert_eq!(
            a.price_for(PartySize::new(3).unwrap()).unwrap(),
            Money::new("59.97".parse().unwrap(), Currency::Eur),
        );
    }

    #[test]
    fn rating_is_recomputed_from_all_scores() {
        let mut a = activity("10", 10);
        let score = |s| review::Score::new(s).unwrap();

        a.rate([score(5), score(4)]);
        assert_eq!(a.rating, "4.5".parse().unwrap());
        assert_eq!(a.reviews_count, 2);

        a.rate([score(5), score(4), score(1)]);
        assert_eq!(a.rating, "3.33".parse().unwrap());
        assert_eq!(a.reviews_count, 3);

        a.rate([]);
        assert_eq!(a.rating, Rating::default());
        assert_eq!(a.reviews_count, 0);
    }
}
