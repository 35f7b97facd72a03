//! [`Command`] for booking an [`Activity`] directly.

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{activity, company, Activity, Booking, Company, PartySize},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for booking an [`Activity`] directly, bypassing any RFQ.
#[derive(Clone, Copy, Debug)]
pub struct BookActivity {
    /// ID of the [`Company`] booking the [`Activity`].
    pub company_id: company::Id,

    /// ID of the [`Activity`] to be booked.
    pub activity_id: activity::Id,

    /// Date the event takes place on.
    pub date: Date,

    /// Number of people taking part in the event.
    pub party_size: PartySize,
}

impl<Db, Ntf, Gw> Command<BookActivity> for Service<Db, Ntf, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Company>, company::Id>>,
            Ok = Option<Company>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Activity>, activity::Id>>,
            Ok = Option<Activity>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: BookActivity,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let BookActivity {
            company_id,
            activity_id,
            date,
            party_size,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<Company>, _>::new(company_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CompanyNotExists(company_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let activity = self
            .database()
            .execute(Select(By::<Option<Activity>, _>::new(activity_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ActivityNotExists(activity_id))
            .map_err(tracerr::wrap!())?;

        let booking =
            Booking::from_activity(company_id, &activity, date, party_size)
                .map_err(|e| tracerr::new!(E::Price(e)))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(booking)
    }
}

/// Error of [`BookActivity`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Activity`] with the provided ID does not exist.
    #[display("`Activity(id: {_0})` does not exist")]
    ActivityNotExists(#[error(not(source))] activity::Id),

    /// Offered [`Activity`] cannot be priced for the party.
    #[display("Cannot book `Activity`: {_0}")]
    Price(activity::PriceError),

    /// [`Company`] with the provided ID does not exist.
    #[display("`Company(id: {_0})` does not exist")]
    CompanyNotExists(#[error(not(source))] company::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
