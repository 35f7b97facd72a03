//! [`Command`] for creating a new [`Review`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        activity, company, review, supplier, Activity, Company, Review,
        Supplier,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Review`] of an [`Activity`] and/or a
/// [`Supplier`].
///
/// Rating of the reviewed [`Activity`] is recomputed along.
#[derive(Clone, Debug)]
pub struct CreateReview {
    /// ID of the [`Company`] leaving the [`Review`].
    pub company_id: company::Id,

    /// ID of the reviewed [`Activity`].
    pub activity_id: Option<activity::Id>,

    /// ID of the reviewed [`Supplier`].
    pub supplier_id: Option<supplier::Id>,

    /// Given [`review::Score`].
    pub score: review::Score,

    /// Comment of the [`Review`].
    pub comment: Option<review::Comment>,
}

impl<Db, Ntf, Gw> Command<CreateReview> for Service<Db, Ntf, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Company>, company::Id>>,
            Ok = Option<Company>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Supplier>, supplier::Id>>,
            Ok = Option<Supplier>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Activity, activity::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Activity>, activity::Id>>,
            Ok = Option<Activity>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Review>, activity::Id>>,
            Ok = Vec<Review>,
            Err = Traced<database::Error>,
        > + Database<Insert<Review>, Err = Traced<database::Error>>
        + Database<Insert<Activity>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Review;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateReview,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateReview {
            company_id,
            activity_id,
            supplier_id,
            score,
            comment,
        } = cmd;

        if activity_id.is_none() && supplier_id.is_none() {
            return Err(tracerr::new!(E::NoTarget));
        }

        self.database()
            .execute(Select(By::<Option<Company>, _>::new(company_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CompanyNotExists(company_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        if let Some(id) = supplier_id {
            self.database()
                .execute(Select(By::<Option<Supplier>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::SupplierNotExists(id))
                .map_err(tracerr::wrap!())
                .map(drop)?;
        }

        let review = Review {
            id: review::Id::new(),
            company_id,
            activity_id,
            supplier_id,
            score,
            comment,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if let Some(id) = activity_id {
            // Avoid losing concurrently left reviews in the rating.
            tx.execute(Lock(By::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;

            let mut activity = tx
                .execute(Select(By::<Option<Activity>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::ActivityNotExists(id))
                .map_err(tracerr::wrap!())?;

            tx.execute(Insert(review.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;

            let reviews = tx
                .execute(Select(By::<Vec<Review>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            activity.rate(reviews.into_iter().map(|r| r.score));

            tx.execute(Insert(activity))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        } else {
            tx.execute(Insert(review.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(review)
    }
}

/// Error of [`CreateReview`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Activity`] with the provided ID does not exist.
    #[display("`Activity(id: {_0})` does not exist")]
    ActivityNotExists(#[error(not(source))] activity::Id),

    /// [`Company`] with the provided ID does not exist.
    #[display("`Company(id: {_0})` does not exist")]
    CompanyNotExists(#[error(not(source))] company::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Neither an [`Activity`] nor a [`Supplier`] is reviewed.
    #[display("`Review` must target an `Activity` or a `Supplier`")]
    NoTarget,

    /// [`Supplier`] with the provided ID does not exist.
    #[display("`Supplier(id: {_0})` does not exist")]
    SupplierNotExists(#[error(not(source))] supplier::Id),
}
