//! [`Activity`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select};
use tracerr::Traced;

use crate::{
    domain::{activity, supplier, Activity},
    infra::{
        database::{
            self,
            memory::{Memory, Storage},
        },
        Database,
    },
};

impl<S> Database<Select<By<Option<Activity>, activity::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Option<Activity>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Activity>, activity::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.activities.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Vec<Activity>, supplier::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Vec<Activity>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Activity>, supplier::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let supplier_id = by.into_inner();
        self.read(|s| {
            let mut activities = s
                .activities
                .values()
                .filter(|a| a.supplier_id == supplier_id)
                .cloned()
                .collect::<Vec<_>>();
            activities.sort_by_key(|a| (a.created_at, a.id));
            activities
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Insert<Activity>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(activity): Insert<Activity>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            drop(s.activities.insert(activity.id, activity));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Lock<By<Activity, activity::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Activity, activity::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}
