//! [`Command`] for starting a [`Payment`] in a [`PaymentGateway`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{booking, company, payment, Booking, Payment},
    infra::{
        database,
        payment_gateway::{self, ClientSecret, CreateIntent, Intent},
        Database, PaymentGateway,
    },
    Service,
};

use super::Command;

/// [`Command`] for starting a [`Payment`] by registering its intent in a
/// [`PaymentGateway`].
///
/// The [`Payment`] is left untouched if the [`PaymentGateway`] fails.
#[derive(Clone, Copy, Debug)]
pub struct StartPayment {
    /// ID of the [`Payment`] to be started.
    pub payment_id: payment::Id,

    /// ID of the company paying.
    pub company_id: company::Id,
}

/// Result of [`StartPayment`] [`Command`] execution.
#[derive(Clone, Debug)]
pub struct Output {
    /// Started [`Payment`].
    pub payment: Payment,

    /// [`ClientSecret`] to finish the [`Payment`] on the client side with.
    pub client_secret: ClientSecret,
}

impl<Db, Ntf, Gw> Command<StartPayment> for Service<Db, Ntf, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Payment>, payment::Id>>,
            Ok = Option<Payment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Payment, payment::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Payment>, payment::Id>>,
            Ok = Option<Payment>,
            Err = Traced<database::Error>,
        > + Database<Insert<Payment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Gw: PaymentGateway<
        CreateIntent,
        Ok = Intent,
        Err = Traced<payment_gateway::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: StartPayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let StartPayment {
            payment_id,
            company_id,
        } = cmd;

        let payment = self
            .database()
            .execute(Select(By::<Option<Payment>, _>::new(payment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PaymentNotExists(payment_id))
            .map_err(tracerr::wrap!())?;
        let owner = self
            .database()
            .execute(Select(By::<Option<Booking>, _>::new(payment.booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .map(|b| b.company_id);
        if owner != Some(company_id) {
            return Err(tracerr::new!(E::NotPaymentOwner(
                company_id, payment_id,
            )));
        }
        if !payment.status.can_transition_to(payment::Status::Processing) {
            return Err(tracerr::new!(E::NotStartable(
                payment_id,
                payment.status,
            )));
        }

        let intent = self
            .payment_gateway()
            .execute(CreateIntent {
                amount: payment.amount,
                payment_id,
                booking_id: payment.booking_id,
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid racing with other state updates of the `Payment`.
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
        payment
            .transition(payment::Status::Processing, DateTime::now().coerce())
            .map_err(|s| tracerr::new!(E::NotStartable(payment_id, s)))?;
        payment.gateway_payment_id = Some(intent.id);

        tx.execute(Insert(payment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output {
            payment,
            client_secret: intent.client_secret,
        })
    }
}

/// Error of [`StartPayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Company doesn't own the [`Booking`] being paid.
    #[display("`Company(id: {_0})` doesn't own `Payment(id: {_1})`")]
    NotPaymentOwner(company::Id, payment::Id),

    /// [`Payment`] cannot be started in its current [`payment::Status`].
    #[display("`Payment(id: {_0})` is {_1} and cannot be started")]
    NotStartable(payment::Id, payment::Status),

    /// [`PaymentGateway`] error.
    #[display("`PaymentGateway` operation failed: {_0}")]
    #[from]
    PaymentGateway(payment_gateway::Error),

    /// [`Payment`] with the provided ID does not exist.
    #[display("`Payment(id: {_0})` does not exist")]
    PaymentNotExists(#[error(not(source))] payment::Id),
}
