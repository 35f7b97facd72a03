//! [`Command`] for confirming a started [`Payment`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{booking, company, payment, Booking, Payment},
    infra::{
        database,
        payment_gateway::{self, Confirmation, ConfirmIntent},
        Database, PaymentGateway,
    },
    Service,
};

use super::{update_payment_state, Command, UpdatePaymentState};

/// [`Command`] for confirming a started [`Payment`] in a [`PaymentGateway`].
///
/// The [`Payment`] becomes [`payment::Status::Completed`] (confirming its
/// [`Booking`]) on success, or [`payment::Status::Failed`] otherwise.
#[derive(Clone, Copy, Debug)]
pub struct ConfirmPayment {
    /// ID of the [`Payment`] to be confirmed.
    pub payment_id: payment::Id,

    /// ID of the company paying.
    pub company_id: company::Id,
}

impl<Db, Ntf, Gw> Command<ConfirmPayment> for Service<Db, Ntf, Gw>
where
    Db: Database<
            Select<By<Option<Payment>, payment::Id>>,
            Ok = Option<Payment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        >,
    Gw: PaymentGateway<
        ConfirmIntent,
        Ok = Confirmation,
        Err = Traced<payment_gateway::Error>,
    >,
    Self: Command<
        UpdatePaymentState,
        Ok = Payment,
        Err = Traced<update_payment_state::ExecutionError>,
    >,
{
    type Ok = Payment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ConfirmPayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ConfirmPayment {
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

        let intent_id = payment
            .gateway_payment_id
            .filter(|_| payment.status == payment::Status::Processing)
            .ok_or(E::NotStarted(payment_id, payment.status))
            .map_err(tracerr::wrap!())?;

        let Confirmation {
            success,
            transaction_id,
        } = self
            .payment_gateway()
            .execute(ConfirmIntent { intent_id })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        self.execute(UpdatePaymentState {
            payment_id,
            status: if success {
                payment::Status::Completed
            } else {
                payment::Status::Failed
            },
            gateway_payment_id: None,
            gateway_transaction_id: transaction_id,
        })
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`ConfirmPayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Company doesn't own the [`Booking`] being paid.
    #[display("`Company(id: {_0})` doesn't own `Payment(id: {_1})`")]
    NotPaymentOwner(company::Id, payment::Id),

    /// [`Payment`] is not started in a [`PaymentGateway`].
    #[display("`Payment(id: {_0})` is {_1} and not started")]
    NotStarted(payment::Id, payment::Status),

    /// [`PaymentGateway`] error.
    #[display("`PaymentGateway` operation failed: {_0}")]
    #[from]
    PaymentGateway(payment_gateway::Error),

    /// [`Payment`] with the provided ID does not exist.
    #[display("`Payment(id: {_0})` does not exist")]
    PaymentNotExists(#[error(not(source))] payment::Id),

    /// Recording the outcome of the [`Payment`] failed.
    #[display("Failed to record `Payment` outcome: {_0}")]
    #[from]
    UpdateState(update_payment_state::ExecutionError),
}
