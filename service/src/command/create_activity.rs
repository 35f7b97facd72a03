//! [`Command`] for creating a new [`Activity`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime, Money, Rating,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{activity, supplier, Activity, Capacity, Supplier},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Activity`] of a [`Supplier`].
///
/// The created [`Activity`] awaits a moderation.
#[derive(Clone, Debug)]
pub struct CreateActivity {
    /// ID of the [`Supplier`] offering the [`Activity`].
    pub supplier_id: supplier::Id,

    /// Name of a new [`Activity`].
    pub name: activity::Name,

    /// Price of a new [`Activity`] for a single person.
    pub price_per_person: Money,

    /// [`Capacity`] of a new [`Activity`].
    pub capacity: Capacity,
}

impl<Db, Ntf, Gw> Command<CreateActivity> for Service<Db, Ntf, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Supplier>, supplier::Id>>,
            Ok = Option<Supplier>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Insert<Activity>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Activity;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateActivity,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateActivity {
            supplier_id,
            name,
            price_per_person,
            capacity,
        } = cmd;

        if !price_per_person.is_positive() {
            return Err(tracerr::new!(E::NonPositivePrice(price_per_person)));
        }

        self.database()
            .execute(Select(By::<Option<Supplier>, _>::new(supplier_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SupplierNotExists(supplier_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let activity = Activity {
            id: activity::Id::new(),
            supplier_id,
            name,
            price_per_person,
            capacity,
            status: activity::Status::Pending,
            rating: Rating::default(),
            reviews_count: 0,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(activity.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(activity)
    }
}

/// Error of [`CreateActivity`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Price of the [`Activity`] is not positive.
    #[display("`Activity` price must be positive, got {_0}")]
    NonPositivePrice(#[error(not(source))] Money),

    /// [`Supplier`] with the provided ID does not exist.
    #[display("`Supplier(id: {_0})` does not exist")]
    SupplierNotExists(#[error(not(source))] supplier::Id),
}
