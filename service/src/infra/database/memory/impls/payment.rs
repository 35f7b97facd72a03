//! [`Payment`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select};
use tracerr::Traced;

use crate::{
    domain::{booking, payment, Payment},
    infra::{
        database::{
            self,
            memory::{Memory, Storage},
            PAYMENT_PER_BOOKING,
        },
        Database,
    },
};

use super::ensure_unique;

impl<S> Database<Select<By<Option<Payment>, payment::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.payments.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Option<Payment>, booking::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let booking_id = by.into_inner();
        self.read(|s| {
            s.payments
                .values()
                .find(|p| p.booking_id == booking_id)
                .cloned()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Insert<Payment>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(payment): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            ensure_unique(
                &s.payments,
                &payment.id,
                |p| Some(p.booking_id),
                Some(payment.booking_id),
                PAYMENT_PER_BOOKING,
            )?;
            drop(s.payments.insert(payment.id, payment));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Lock<By<Payment, payment::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Payment, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}
