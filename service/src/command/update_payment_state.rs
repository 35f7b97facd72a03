//! [`Command`] for updating a [`Payment`] state.

use common::{
    operations::{
        By, Commit, Insert, Lock, Notify, Select, Transact, Transacted,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        activity, booking, company, payment, proposal, supplier, Activity,
        Booking, Company, Payment, Proposal, Supplier,
    },
    infra::{database, notifier, Database, Notifier},
    Service,
};

use super::{booking_supplier, Command};

/// [`Command`] for moving a [`Payment`] into a new [`payment::Status`] and
/// recording the payment gateway references.
///
/// Completion of a [`Payment`] confirms its [`Booking`] atomically.
#[derive(Clone, Debug)]
pub struct UpdatePaymentState {
    /// ID of the [`Payment`] to be updated.
    pub payment_id: payment::Id,

    /// New [`payment::Status`] of the [`Payment`].
    pub status: payment::Status,

    /// Payment ID assigned by the payment gateway.
    ///
    /// The stored one is kept if [`None`].
    pub gateway_payment_id: Option<payment::GatewayPaymentId>,

    /// Transaction ID assigned by the payment gateway.
    ///
    /// The stored one is kept if [`None`].
    pub gateway_transaction_id: Option<payment::GatewayTransactionId>,
}

impl<Db, Ntf, Gw> Command<UpdatePaymentState> for Service<Db, Ntf, Gw>
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
        > + Database<
            Select<By<Option<Proposal>, proposal::Id>>,
            Ok = Option<Proposal>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Supplier>, supplier::Id>>,
            Ok = Option<Supplier>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Payment, payment::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Payment>, payment::Id>>,
            Ok = Option<Payment>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Booking, booking::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Insert<Payment>, Err = Traced<database::Error>>
        + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Ntf: Notifier<
        Notify<notifier::Event>,
        Ok = (),
        Err = Traced<notifier::Error>,
    >,
{
    type Ok = Payment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdatePaymentState,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdatePaymentState {
            payment_id,
            status,
            gateway_payment_id,
            gateway_transaction_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Payment is always locked before its booking.
        tx.execute(Lock(By::new(payment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut payment = tx
            .execute(Select(By::<Option<Payment>, _>::new(payment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PaymentNotExists(payment_id))
            .map_err(tracerr::wrap!())?;

        let booking_id = payment.booking_id;
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

        let now = DateTime::now();
        payment.transition(status, now.coerce()).map_err(|from| {
            tracerr::new!(E::InvalidTransition {
                payment_id,
                from,
                to: status,
            })
        })?;
        if let Some(id) = gateway_payment_id {
            payment.gateway_payment_id = Some(id);
        }
        if let Some(id) = gateway_transaction_id {
            payment.gateway_transaction_id = Some(id);
        }

        tx.execute(Insert(payment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let confirmed = status == payment::Status::Completed
            && booking.confirm(now.coerce());
        if confirmed {
            tx.execute(Insert(booking.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if confirmed {
            self.notify_confirmed(booking).await;
        }

        Ok(payment)
    }
}

impl<Db, Ntf, Gw> Service<Db, Ntf, Gw>
where
    Db: Database<
            Select<By<Option<Company>, company::Id>>,
            Ok = Option<Company>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Activity>, activity::Id>>,
            Ok = Option<Activity>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Proposal>, proposal::Id>>,
            Ok = Option<Proposal>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Supplier>, supplier::Id>>,
            Ok = Option<Supplier>,
            Err = Traced<database::Error>,
        >,
    Ntf: Notifier<
        Notify<notifier::Event>,
        Ok = (),
        Err = Traced<notifier::Error>,
    >,
{
    /// Notifies the company about the confirmed [`Booking`].
    async fn notify_confirmed(&self, booking: Booking) {
        let company = match self
            .database()
            .execute(Select(By::<Option<Company>, _>::new(booking.company_id)))
            .await
        {
            Ok(Some(c)) => c,
            Ok(None) => {
                log::warn!(
                    "`Company(id: {})` of confirmed `Booking(id: {})` does \
                     not exist",
                    booking.company_id,
                    booking.id,
                );
                return;
            }
            Err(e) => {
                log::warn!(
                    "failed to load `Company(id: {})` for notification: {e}",
                    booking.company_id,
                );
                return;
            }
        };

        let supplier = match booking_supplier(self.database(), &booking).await {
            Ok(Some(id)) => self
                .database()
                .execute(Select(By::<Option<Supplier>, _>::new(id)))
                .await
                .map_err(|e| e.to_string()),
            Ok(None) => Ok(None),
            Err(e) => Err(e.to_string()),
        };
        let supplier_name = match supplier {
            Ok(s) => s.map(|s| s.name),
            Err(e) => {
                log::warn!(
                    "failed to load supplier of `Booking(id: {})`: {e}",
                    booking.id,
                );
                None
            }
        };

        self.notify(notifier::Event::BookingConfirmed {
            booking,
            company_email: company.email,
            supplier_name,
        })
        .await;
    }
}

/// Error of [`UpdatePaymentState`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] of the [`Payment`] does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Payment`] cannot be moved into the requested [`payment::Status`].
    #[display("`Payment(id: {payment_id})` cannot move from {from} to {to}")]
    InvalidTransition {
        /// ID of the [`Payment`].
        payment_id: payment::Id,

        /// Current [`payment::Status`] of the [`Payment`].
        from: payment::Status,

        /// Requested [`payment::Status`].
        to: payment::Status,
    },

    /// [`Payment`] with the provided ID does not exist.
    #[display("`Payment(id: {_0})` does not exist")]
    PaymentNotExists(#[error(not(source))] payment::Id),
}
