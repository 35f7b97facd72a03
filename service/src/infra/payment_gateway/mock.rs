//! [`Mock`] payment gateway definitions.

use std::time::{SystemTime, UNIX_EPOCH};

use tracerr::Traced;
use tracing as log;

use crate::domain::payment;

use super::{
    ClientSecret, ConfirmIntent, Confirmation, CreateIntent, Error, Intent,
    PaymentGateway,
};

/// Prefix of the [`Intent`] IDs issued by the [`Mock`].
const INTENT_PREFIX: &str = "mock_pi_";

/// [`PaymentGateway`] approving everything without charging anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mock;

impl PaymentGateway<CreateIntent> for Mock {
    type Ok = Intent;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        op: CreateIntent,
    ) -> Result<Self::Ok, Self::Err> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| tracerr::new!(Error::Unavailable(e.to_string())))?
            .as_millis();

        let id = payment::GatewayPaymentId::new(format!(
            "{INTENT_PREFIX}{millis}"
        ))
        .ok_or_else(|| {
            tracerr::new!(Error::Rejected("malformed intent ID".into()))
        })?;
        log::debug!(
            intent.id = %id,
            amount = %op.amount,
            metadata = ?op.metadata(),
            "mock payment intent created",
        );

        Ok(Intent {
            id,
            client_secret: ClientSecret::from(format!(
                "mock_secret_{}",
                op.payment_id,
            )),
            status: "requires_payment_method".into(),
        })
    }
}

impl PaymentGateway<ConfirmIntent> for Mock {
    type Ok = Confirmation;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        ConfirmIntent { intent_id }: ConfirmIntent,
    ) -> Result<Self::Ok, Self::Err> {
        let id: &str = intent_id.as_ref();
        let Some(suffix) = id.strip_prefix(INTENT_PREFIX) else {
            return Ok(Confirmation {
                success: false,
                transaction_id: None,
            });
        };

        Ok(Confirmation {
            success: true,
            transaction_id: payment::GatewayTransactionId::new(format!(
                "mock_tx_{suffix}"
            )),
        })
    }
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Money};

    use crate::{
        domain::{booking, payment},
        infra::PaymentGateway as _,
    };

    use super::{ConfirmIntent, CreateIntent, Mock};

    #[tokio::test]
    async fn issues_mock_intents() {
        let payment_id = payment::Id::new();
        let intent = Mock
            .execute(CreateIntent {
                amount: Money::new(500.into(), Currency::Eur),
                payment_id,
                booking_id: booking::Id::new(),
            })
            .await
            .unwrap();

        let id: &str = intent.id.as_ref();
        assert!(id.starts_with("mock_pi_"));
        assert_eq!(
            intent.client_secret.to_string(),
            format!("mock_secret_{payment_id}"),
        );
        assert_eq!(intent.status, "requires_payment_method");
    }

    #[tokio::test]
    async fn confirms_only_own_intents() {
        let ok = Mock
            .execute(ConfirmIntent {
                intent_id: payment::GatewayPaymentId::new("mock_pi_42")
                    .unwrap(),
            })
            .await
            .unwrap();
        assert!(ok.success);
        assert_eq!(
            ok.transaction_id,
            payment::GatewayTransactionId::new("mock_tx_42"),
        );

        let foreign = Mock
            .execute(ConfirmIntent {
                intent_id: payment::GatewayPaymentId::new("pi_42").unwrap(),
            })
            .await
            .unwrap();
        assert!(!foreign.success);
        assert!(foreign.transaction_id.is_none());
    }
}
