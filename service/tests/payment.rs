//! Payment lifecycle scenarios.

#![cfg(feature = "memory")]

mod common;

use service::{
    command::{
        confirm_payment, create_payment, start_payment, update_payment_state,
        AcceptProposal, BookActivity, CancelBooking, ConfirmPayment,
        CreatePayment, StartPayment, UpdatePaymentState,
    },
    domain::{booking, company, payment, Booking, Payment},
    infra::notifier::Event,
    query, Command as _, Config, Query as _,
};

use self::common::{
    date, eur, new_activity, new_company, new_rfq, new_supplier, party,
    service_with, submit, Gateway, Recorder, TestService,
};

/// Creates a [`TestService`] with the returned [`Gateway`] controlling its
/// payment gateway.
fn service() -> (TestService, Gateway) {
    let gw = Gateway::default();
    let svc = service_with(Config::default(), Recorder::default(), gw.clone());
    (svc, gw)
}

/// Books 4 people for an activity of 50 EUR per person.
async fn booking(svc: &TestService) -> Booking {
    let company = new_company(svc).await;
    let supplier = new_supplier(svc).await;
    let activity = new_activity(svc, supplier.id, "50", 20).await;
    svc.execute(BookActivity {
        company_id: company.id,
        activity_id: activity.id,
        date: date(),
        party_size: party(4),
    })
    .await
    .unwrap()
}

async fn pay(
    svc: &TestService,
    booking: &Booking,
) -> Result<Payment, create_payment::ExecutionError> {
    svc.execute(CreatePayment {
        booking_id: booking.id,
        company_id: booking.company_id,
        method: payment::Method::Card,
        description: None,
        invoice_email: None,
    })
    .await
    .map_err(|e| e.into_inner())
}

async fn stored_booking(svc: &TestService, id: booking::Id) -> Booking {
    svc.execute(query::booking::ById::by(id))
        .await
        .unwrap()
        .unwrap()
}

async fn stored_payment(svc: &TestService, id: payment::Id) -> Payment {
    svc.execute(query::payment::ById::by(id))
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn pays_booking_total() {
    let (svc, _) = service();
    let booking = booking(&svc).await;

    let payment = pay(&svc, &booking).await.unwrap();
    assert_eq!(payment.amount, eur("200"));
    assert_eq!(payment.amount, booking.total_price);
    assert_eq!(payment.status, payment::Status::Pending);

    let found = svc
        .execute(query::payment::ByBooking::by(booking.id))
        .await
        .unwrap()
        .map(|p| p.id);
    assert_eq!(found, Some(payment.id));
}

#[tokio::test]
async fn refuses_second_payment_of_booking() {
    let (svc, _) = service();
    let booking = booking(&svc).await;
    _ = pay(&svc, &booking).await.unwrap();

    let err = pay(&svc, &booking).await.unwrap_err();
    assert!(matches!(
        err,
        create_payment::ExecutionError::DuplicatePayment(id) if id == booking.id,
    ));
}

#[tokio::test]
async fn concurrent_payments_of_booking_let_single_one_in() {
    let (svc, _) = service();
    let booking = booking(&svc).await;

    let (r1, r2) = tokio::join!(pay(&svc, &booking), pay(&svc, &booking));
    assert_eq!(usize::from(r1.is_ok()) + usize::from(r2.is_ok()), 1);
    assert!(matches!(
        r1.err().or(r2.err()),
        Some(create_payment::ExecutionError::DuplicatePayment(_)),
    ));
}

#[tokio::test]
async fn refuses_paying_cancelled_booking() {
    let (svc, _) = service();
    let booking = booking(&svc).await;
    _ = svc
        .execute(CancelBooking {
            booking_id: booking.id,
            company_id: booking.company_id,
        })
        .await
        .unwrap();

    let err = pay(&svc, &booking).await.unwrap_err();
    assert!(matches!(
        err,
        create_payment::ExecutionError::BookingNotPayable(
            _,
            booking::Status::Cancelled,
        ),
    ));
}

#[tokio::test]
async fn completion_confirms_booking_once() {
    let (svc, _) = service();
    let booking = booking(&svc).await;
    let payment = pay(&svc, &booking).await.unwrap();

    let started = svc
        .execute(StartPayment {
            payment_id: payment.id,
            company_id: booking.company_id,
        })
        .await
        .unwrap();
    assert_eq!(started.payment.status, payment::Status::Processing);
    let secret: &str = started.client_secret.as_ref();
    assert_eq!(secret, format!("secret_{}", payment.id));

    let completed = svc
        .execute(ConfirmPayment {
            payment_id: payment.id,
            company_id: booking.company_id,
        })
        .await
        .unwrap();
    assert_eq!(completed.status, payment::Status::Completed);
    assert!(completed.completed_at.is_some());
    assert!(completed.gateway_transaction_id.is_some());

    assert_eq!(
        stored_booking(&svc, booking.id).await.status,
        booking::Status::Confirmed,
    );

    let err = svc
        .execute(UpdatePaymentState {
            payment_id: payment.id,
            status: payment::Status::Completed,
            gateway_payment_id: None,
            gateway_transaction_id: None,
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(
        err,
        update_payment_state::ExecutionError::InvalidTransition {
            from: payment::Status::Completed,
            to: payment::Status::Completed,
            ..
        },
    ));

    let confirmations = svc
        .notifier()
        .events()
        .into_iter()
        .filter(|ev| {
            matches!(ev, Event::BookingConfirmed { booking: b, .. }
                if b.id == booking.id)
        })
        .count();
    assert_eq!(confirmations, 1);
}

#[tokio::test]
async fn gateway_outage_leaves_payment_pending() {
    let (svc, gw) = service();
    let booking = booking(&svc).await;
    let payment = pay(&svc, &booking).await.unwrap();

    gw.set_unavailable(true);
    let err = svc
        .execute(StartPayment {
            payment_id: payment.id,
            company_id: booking.company_id,
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(err, start_payment::ExecutionError::PaymentGateway(_)));

    let stored = stored_payment(&svc, payment.id).await;
    assert_eq!(stored.status, payment::Status::Pending);
    assert!(stored.gateway_payment_id.is_none());

    gw.set_unavailable(false);
    let started = svc
        .execute(StartPayment {
            payment_id: payment.id,
            company_id: booking.company_id,
        })
        .await
        .unwrap();
    assert_eq!(started.payment.status, payment::Status::Processing);
}

#[tokio::test]
async fn declined_charge_fails_payment_and_allows_retry() {
    let (svc, gw) = service();
    let booking = booking(&svc).await;
    let payment = pay(&svc, &booking).await.unwrap();
    let start = StartPayment {
        payment_id: payment.id,
        company_id: booking.company_id,
    };
    let confirm = ConfirmPayment {
        payment_id: payment.id,
        company_id: booking.company_id,
    };

    _ = svc.execute(start).await.unwrap();
    gw.set_declining(true);
    let failed = svc.execute(confirm).await.unwrap();
    assert_eq!(failed.status, payment::Status::Failed);
    assert_eq!(
        stored_booking(&svc, booking.id).await.status,
        booking::Status::Pending,
    );

    gw.set_declining(false);
    _ = svc.execute(start).await.unwrap();
    let completed = svc.execute(confirm).await.unwrap();
    assert_eq!(completed.status, payment::Status::Completed);
    assert_eq!(
        stored_booking(&svc, booking.id).await.status,
        booking::Status::Confirmed,
    );
}

#[tokio::test]
async fn confirming_requires_started_payment() {
    let (svc, _) = service();
    let booking = booking(&svc).await;
    let payment = pay(&svc, &booking).await.unwrap();

    let err = svc
        .execute(ConfirmPayment {
            payment_id: payment.id,
            company_id: booking.company_id,
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(
        err,
        confirm_payment::ExecutionError::NotStarted(
            _,
            payment::Status::Pending,
        ),
    ));
}

#[tokio::test]
async fn only_booking_owner_starts_payment() {
    let (svc, _) = service();
    let booking = booking(&svc).await;
    let payment = pay(&svc, &booking).await.unwrap();
    let stranger: company::Id = new_company(&svc).await.id;

    let err = svc
        .execute(StartPayment {
            payment_id: payment.id,
            company_id: stranger,
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(
        err,
        start_payment::ExecutionError::NotPaymentOwner(..),
    ));
}

/// Moves the provided [`Payment`] into the `status` bypassing the gateway.
async fn transition(
    svc: &TestService,
    payment: &Payment,
    status: payment::Status,
) -> Payment {
    svc.execute(UpdatePaymentState {
        payment_id: payment.id,
        status,
        gateway_payment_id: None,
        gateway_transaction_id: None,
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn paid_booking_still_may_be_cancelled() {
    let (svc, _) = service();
    let booking = booking(&svc).await;
    let payment = pay(&svc, &booking).await.unwrap();
    let start = StartPayment {
        payment_id: payment.id,
        company_id: booking.company_id,
    };
    let confirm = ConfirmPayment {
        payment_id: payment.id,
        company_id: booking.company_id,
    };

    _ = svc.execute(start).await.unwrap();
    let completed = svc.execute(confirm).await.unwrap();
    assert_eq!(completed.status, payment::Status::Completed);
    assert_eq!(
        stored_booking(&svc, booking.id).await.status,
        booking::Status::Confirmed,
    );

    let cancelled = svc
        .execute(CancelBooking {
            booking_id: booking.id,
            company_id: booking.company_id,
        })
        .await
        .unwrap();
    assert_eq!(cancelled.status, booking::Status::Cancelled);
    assert_eq!(
        stored_booking(&svc, booking.id).await.status,
        booking::Status::Cancelled,
    );
}

#[tokio::test]
async fn other_terminal_states_leave_booking_untouched() {
    let (svc, _) = service();

    let pending = booking(&svc).await;
    let payment = pay(&svc, &pending).await.unwrap();
    let cancelled = transition(&svc, &payment, payment::Status::Cancelled).await;
    assert_eq!(cancelled.status, payment::Status::Cancelled);
    assert!(cancelled.completed_at.is_none());
    assert_eq!(
        stored_booking(&svc, pending.id).await.status,
        booking::Status::Pending,
    );

    let confirmed = booking(&svc).await;
    let payment = pay(&svc, &confirmed).await.unwrap();
    _ = transition(&svc, &payment, payment::Status::Completed).await;
    assert_eq!(
        stored_booking(&svc, confirmed.id).await.status,
        booking::Status::Confirmed,
    );
    let refunded = transition(&svc, &payment, payment::Status::Refunded).await;
    assert_eq!(refunded.status, payment::Status::Refunded);
    assert_eq!(
        stored_booking(&svc, confirmed.id).await.status,
        booking::Status::Confirmed,
    );
}

#[tokio::test]
async fn confirmation_names_supplier_of_proposal_without_activity() {
    let (svc, _) = service();
    let company = new_company(&svc).await;
    let supplier = new_supplier(&svc).await;
    let rfq = new_rfq(&svc, company.id, 8).await;
    let proposal = submit(&svc, rfq.id, supplier.id, None, "800").await;
    let booking = svc
        .execute(AcceptProposal {
            proposal_id: proposal.id,
            company_id: company.id,
        })
        .await
        .unwrap()
        .booking;
    assert_eq!(booking.activity_id, None);

    let payment = pay(&svc, &booking).await.unwrap();
    _ = transition(&svc, &payment, payment::Status::Completed).await;

    let names = svc
        .notifier()
        .events()
        .into_iter()
        .filter_map(|ev| match ev {
            Event::BookingConfirmed {
                booking: b,
                supplier_name,
                ..
            } if b.id == booking.id => Some(supplier_name),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(names.len(), 1);
    assert_eq!(
        names[0].as_ref().map(ToString::to_string),
        Some(supplier.name.to_string()),
    );
}
