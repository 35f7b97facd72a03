//! [`Review`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{activity, supplier, Review},
    infra::{
        database::{
            self,
            memory::{Memory, Storage},
        },
        Database,
    },
};

impl<S> Database<Select<By<Vec<Review>, activity::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Vec<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Review>, activity::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let activity_id = by.into_inner();
        self.read(|s| {
            let mut reviews = s
                .reviews
                .values()
                .filter(|r| r.activity_id == Some(activity_id))
                .cloned()
                .collect::<Vec<_>>();
            reviews.sort_by_key(|r| (r.created_at, r.id));
            reviews
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Vec<Review>, supplier::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Vec<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Review>, supplier::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let supplier_id = by.into_inner();
        self.read(|s| {
            let mut reviews = s
                .reviews
                .values()
                .filter(|r| r.supplier_id == Some(supplier_id))
                .cloned()
                .collect::<Vec<_>>();
            reviews.sort_by_key(|r| (r.created_at, r.id));
            reviews
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Insert<Review>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(review): Insert<Review>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            drop(s.reviews.insert(review.id, review));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
