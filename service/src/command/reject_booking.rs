//! [`Command`] for rejecting a [`Booking`] by its supplier.

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

/// [`Command`] for rejecting a [`booking::Status::Pending`] [`Booking`] by the
/// supplier providing the booked event.
#[derive(Clone, Copy, Debug)]
pub struct RejectBooking {
    /// ID of the [`Booking`] to be rejected.
    pub booking_id: booking::Id,

    /// ID of the supplier rejecting the [`Booking`].
    pub supplier_id: supplier::Id,
}

impl<Db, Ntf, Gw> Command<RejectBooking> for Service<Db, Ntf, Gw>
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

    async fn execute(&self, cmd: RejectBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RejectBooking {
            booking_id,
            supplier_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid racing with a payment confirmation.
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

        booking
            .reject(DateTime::now().coerce())
            .map_err(|s| tracerr::new!(E::BookingNotPending(booking_id, s)))?;

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

/// Error of [`RejectBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Booking`] is not [`booking::Status::Pending`].
    #[display("`Booking(id: {_0})` is {_1}, not pending")]
    BookingNotPending(booking::Id, booking::Status),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Supplier doesn't provide the event of the [`Booking`].
    #[display("`Supplier(id: {_0})` doesn't provide `Booking(id: {_1})`")]
    NotBookingSupplier(supplier::Id, booking::Id),
}
