//! [`Booking`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select};
use tracerr::Traced;

use crate::{
    domain::{booking, company, proposal, supplier, Booking},
    infra::{
        database::{
            self,
            memory::{Memory, Storage},
            BOOKING_PER_PROPOSAL,
        },
        Database,
    },
};

use super::ensure_unique;

impl<S> Database<Select<By<Option<Booking>, booking::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.bookings.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Option<Booking>, proposal::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, proposal::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let proposal_id = by.into_inner();
        self.read(|s| {
            s.bookings
                .values()
                .find(|b| b.proposal_id == Some(proposal_id))
                .cloned()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Vec<Booking>, company::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Vec<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, company::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let company_id = by.into_inner();
        self.read(|s| {
            let mut bookings = s
                .bookings
                .values()
                .filter(|b| b.company_id == company_id)
                .cloned()
                .collect::<Vec<_>>();
            bookings.sort_by_key(|b| (b.created_at, b.id));
            bookings
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Vec<Booking>, supplier::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Vec<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, supplier::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let supplier_id = by.into_inner();
        self.read(|s| {
            let provided = |b: &Booking| match (b.activity_id, b.proposal_id) {
                (Some(id), _) => s
                    .activities
                    .get(&id)
                    .is_some_and(|a| a.supplier_id == supplier_id),
                (None, Some(id)) => s
                    .proposals
                    .get(&id)
                    .is_some_and(|p| p.supplier_id == supplier_id),
                (None, None) => false,
            };
            let mut bookings = s
                .bookings
                .values()
                .filter(|b| provided(b))
                .cloned()
                .collect::<Vec<_>>();
            bookings.sort_by_key(|b| (b.created_at, b.id));
            bookings
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Insert<Booking>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            ensure_unique(
                &s.bookings,
                &booking.id,
                |b| b.proposal_id,
                booking.proposal_id,
                BOOKING_PER_PROPOSAL,
            )?;
            drop(s.bookings.insert(booking.id, booking));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Lock<By<Booking, booking::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}
