//! [`Command`] for confirming a [`Booking`] by its supplier.

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        activity, booking, proposal, supplier, Activity, Booking, Proposal,
    },
    infra::{database, Database},
    Service,
};

use super::{booking_supplier, Command};

/// [`Command`] for confirming a [`Booking`] by the supplier providing the
/// booked event.
///
/// Confirming an already confirmed [`Booking`] changes nothing.
#[derive(Clone, Copy, Debug)]
pub struct ConfirmBooking {
    /// ID of the [`Booking`] to be confirmed.
    pub booking_id: booking::Id,

    /// ID of the supplier confirming the [`Booking`].
    pub supplier_id: supplier::Id,
}

impl<Db, Ntf, Gw> Command<ConfirmBooking> for Service<Db, Ntf, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Booking, booking::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Activity>, activity::Id>>,
            Ok = Option<Activity>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Proposal>, proposal::Id>>,
            Ok = Option<Proposal>,
            Err = Traced<database::Error>,
        > + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ConfirmBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ConfirmBooking {
            booking_id,
            supplier_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;
        let provider = booking_supplier(&tx, &booking)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if provider != Some(supplier_id) {
            return Err(tracerr::new!(E::NotBookingSupplier(
                supplier_id,
                booking_id,
            )));
        }

        let changed = booking
            .accept(DateTime::now().coerce())
            .map_err(|s| tracerr::new!(E::BookingClosed(booking_id, s)))?;
        if changed {
            tx.execute(Insert(booking.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(booking)
    }
}

/// Error of [`ConfirmBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] is cancelled or rejected already.
    #[display("`Booking(id: {_0})` is {_1}")]
    BookingClosed(booking::Id, booking::Status),

    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Supplier doesn't provide the event of the [`Booking`].
    #[display("`Supplier(id: {_0})` doesn't provide `Booking(id: {_1})`")]
    NotBookingSupplier(supplier::Id, booking::Id),
}
