//! [`Command`] for moderating an [`Activity`].

use common::operations::{By, Commit, Insert, Lock, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{activity, Activity},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for approving or rejecting a pending [`Activity`].
#[derive(Clone, Copy, Debug)]
pub struct ReviewActivity {
    /// ID of the [`Activity`] to be moderated.
    pub activity_id: activity::Id,

    /// Whether the [`Activity`] is approved.
    pub approve: bool,
}

impl<Db, Ntf, Gw> Command<ReviewActivity> for Service<Db, Ntf, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Activity, activity::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Activity>, activity::Id>>,
            Ok = Option<Activity>,
            Err = Traced<database::Error>,
        > + Database<Insert<Activity>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Activity;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ReviewActivity,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReviewActivity {
            activity_id,
            approve,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent moderations.
        tx.execute(Lock(By::new(activity_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut activity = tx
            .execute(Select(By::<Option<Activity>, _>::new(activity_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ActivityNotExists(activity_id))
            .map_err(tracerr::wrap!())?;

        if activity.status != activity::Status::Pending {
            return Err(tracerr::new!(E::AlreadyReviewed(
                activity_id,
                activity.status,
            )));
        }
        activity.status = if approve {
            activity::Status::Approved
        } else {
            activity::Status::Rejected
        };

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

/// Error of [`ReviewActivity`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Activity`] with the provided ID does not exist.
    #[display("`Activity(id: {_0})` does not exist")]
    ActivityNotExists(#[error(not(source))] activity::Id),

    /// [`Activity`] is not pending a moderation anymore.
    #[display("`Activity(id: {_0})` is already {_1}")]
    AlreadyReviewed(activity::Id, activity::Status),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
