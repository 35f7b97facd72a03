//! [`Command`] for creating a new [`Payment`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{booking, company, payment, Booking, Email, Payment},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Payment`] of a [`Booking`].
///
/// A [`Booking`] may have only a single [`Payment`], which amount is the
/// total price of the [`Booking`].
#[derive(Clone, Debug)]
pub struct CreatePayment {
    /// ID of the [`Booking`] to be paid.
    pub booking_id: booking::Id,

    /// ID of the company paying the [`Booking`].
    pub company_id: company::Id,

    /// Method of the [`Payment`].
    pub method: payment::Method,

    /// Description of the [`Payment`].
    pub description: Option<payment::Description>,

    /// [`Email`] to send the invoice to.
    pub invoice_email: Option<Email>,
}

impl<Db, Ntf, Gw> Command<CreatePayment> for Service<Db, Ntf, Gw>
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
            Select<By<Option<Payment>, booking::Id>>,
            Ok = Option<Payment>,
            Err = Traced<database::Error>,
        > + Database<Insert<Payment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Payment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreatePayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreatePayment {
            booking_id,
            company_id,
            method,
            description,
            invoice_email,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent payments of the same `Booking`.
        tx.execute(Lock(By::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;
        if booking.company_id != company_id {
            return Err(tracerr::new!(E::NotBookingOwner(
                company_id, booking_id,
            )));
        }
        if matches!(
            booking.status,
            booking::Status::Cancelled | booking::Status::Rejected,
        ) {
            return Err(tracerr::new!(E::BookingNotPayable(
                booking_id,
                booking.status,
            )));
        }

        let existing = tx
            .execute(Select(By::<Option<Payment>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::DuplicatePayment(booking_id)));
        }

        let now = DateTime::now();
        let payment = Payment {
            id: payment::Id::new(),
            booking_id,
            amount: booking.total_price,
            method,
            status: payment::Status::Pending,
            gateway_payment_id: None,
            gateway_transaction_id: None,
            description,
            invoice_email,
            created_at: now.coerce(),
            updated_at: now.coerce(),
            completed_at: None,
        };

        tx.execute(Insert(payment.clone()))
            .await
            .map_err(|e| {
                let violated: &database::Error = e.as_ref();
                if violated.is_unique_violation(database::PAYMENT_PER_BOOKING) {
                    return tracerr::new!(E::DuplicatePayment(booking_id));
                }
                let wrap = tracerr::map_from_and_wrap!(=> E);
                wrap(e)
            })
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(payment)
    }
}

/// Error of [`CreatePayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] cannot be paid in its current status.
    #[display("`Booking(id: {_0})` is {_1} and cannot be paid")]
    BookingNotPayable(booking::Id, booking::Status),

    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Booking`] has a [`Payment`] already.
    #[display("`Booking(id: {_0})` has a `Payment` already")]
    DuplicatePayment(#[error(not(source))] booking::Id),

    /// Company doesn't own the [`Booking`].
    #[display("`Company(id: {_0})` doesn't own `Booking(id: {_1})`")]
    NotBookingOwner(company::Id, booking::Id),
}
