//! Direct booking scenarios.

#![cfg(feature = "memory")]

mod common;

use std::collections::HashSet;

use service::{
    command::{
        book_activity, cancel_booking, confirm_booking, create_payment,
        reject_booking, AcceptProposal, BookActivity, CancelBooking,
        ConfirmBooking, CreatePayment, RejectBooking,
    },
    domain::{activity, booking, payment, supplier, Booking},
    query, Command as _, Query as _,
};

use self::common::{
    date, eur, new_activity, new_company, new_rfq, new_supplier, party,
    service, submit, TestService,
};

#[tokio::test]
async fn prices_booking_exactly() {
    let svc = service();
    let company = new_company(&svc).await;
    let supplier = new_supplier(&svc).await;
    let activity = new_activity(&svc, supplier.id, "19.99", 20).await;

    let booking = svc
        .execute(BookActivity {
            company_id: company.id,
            activity_id: activity.id,
            date: date(),
            party_size: party(3),
        })
        .await
        .unwrap();

    assert_eq!(booking.total_price, eur("59.97"));
    assert_eq!(booking.status, booking::Status::Pending);
    assert_eq!(booking.proposal_id, None);
}

#[tokio::test]
async fn respects_activity_capacity() {
    let svc = service();
    let company = new_company(&svc).await;
    let supplier = new_supplier(&svc).await;
    let activity = new_activity(&svc, supplier.id, "30", 20).await;

    let book = |size| BookActivity {
        company_id: company.id,
        activity_id: activity.id,
        date: date(),
        party_size: party(size),
    };

    let full = svc.execute(book(20)).await.unwrap();
    assert_eq!(full.total_price, eur("600"));

    let err = svc.execute(book(21)).await.unwrap_err().into_inner();
    assert!(matches!(
        err,
        book_activity::ExecutionError::Price(
            activity::PriceError::CapacityExceeded(e),
        ) if e.activity_id == activity.id,
    ));

    let bookings = svc
        .execute(query::booking::ByCompany::by(company.id))
        .await
        .unwrap();
    assert_eq!(bookings.len(), 1);
}

#[tokio::test]
async fn cancels_only_own_bookings() {
    let svc = service();
    let owner = new_company(&svc).await;
    let stranger = new_company(&svc).await;
    let supplier = new_supplier(&svc).await;
    let activity = new_activity(&svc, supplier.id, "30", 20).await;
    let booking = svc
        .execute(BookActivity {
            company_id: owner.id,
            activity_id: activity.id,
            date: date(),
            party_size: party(4),
        })
        .await
        .unwrap();

    let err = svc
        .execute(CancelBooking {
            booking_id: booking.id,
            company_id: stranger.id,
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(
        err,
        cancel_booking::ExecutionError::NotBookingOwner(..),
    ));

    let cancelled = svc
        .execute(CancelBooking {
            booking_id: booking.id,
            company_id: owner.id,
        })
        .await
        .unwrap();
    assert_eq!(cancelled.status, booking::Status::Cancelled);
}

#[tokio::test]
async fn refuses_unknown_activity() {
    let svc = service();
    let company = new_company(&svc).await;
    let supplier = new_supplier(&svc).await;
    let other = new_activity(&svc, supplier.id, "30", 20).await;
    let unknown = activity::Id::new();
    assert_ne!(unknown, other.id);

    let err = svc
        .execute(BookActivity {
            company_id: company.id,
            activity_id: unknown,
            date: date(),
            party_size: party(2),
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(
        err,
        book_activity::ExecutionError::ActivityNotExists(id) if id == unknown,
    ));
}

#[tokio::test]
async fn refuses_price_too_large_to_represent() {
    let svc = service();
    let company = new_company(&svc).await;
    let supplier = new_supplier(&svc).await;
    let activity =
        new_activity(&svc, supplier.id, "79228162514264337593543950335", 20)
            .await;

    let err = svc
        .execute(BookActivity {
            company_id: company.id,
            activity_id: activity.id,
            date: date(),
            party_size: party(2),
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(
        err,
        book_activity::ExecutionError::Price(activity::PriceError::Overflow(
            e,
        )) if e.activity_id == activity.id,
    ));

    let bookings = svc
        .execute(query::booking::ByCompany::by(company.id))
        .await
        .unwrap();
    assert!(bookings.is_empty());
}

/// Books 2 people for the provided activity by a new company.
async fn book(svc: &TestService, activity_id: activity::Id) -> Booking {
    let company = new_company(svc).await;
    svc.execute(BookActivity {
        company_id: company.id,
        activity_id,
        date: date(),
        party_size: party(2),
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn supplier_confirms_own_bookings_only() {
    let svc = service();
    let (provider, stranger) =
        (new_supplier(&svc).await, new_supplier(&svc).await);
    let activity = new_activity(&svc, provider.id, "30", 20).await;
    let booking = book(&svc, activity.id).await;

    let err = svc
        .execute(ConfirmBooking {
            booking_id: booking.id,
            supplier_id: stranger.id,
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(
        err,
        confirm_booking::ExecutionError::NotBookingSupplier(s, b)
            if s == stranger.id && b == booking.id,
    ));

    let confirm = ConfirmBooking {
        booking_id: booking.id,
        supplier_id: provider.id,
    };
    let confirmed = svc.execute(confirm).await.unwrap();
    assert_eq!(confirmed.status, booking::Status::Confirmed);
    let again = svc.execute(confirm).await.unwrap();
    assert_eq!(again.status, booking::Status::Confirmed);
    assert_eq!(again.updated_at, confirmed.updated_at);

    let err = svc
        .execute(RejectBooking {
            booking_id: booking.id,
            supplier_id: provider.id,
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(
        err,
        reject_booking::ExecutionError::BookingNotPending(
            _,
            booking::Status::Confirmed,
        ),
    ));
}

#[tokio::test]
async fn rejected_booking_is_final_and_unpayable() {
    let svc = service();
    let provider = new_supplier(&svc).await;
    let activity = new_activity(&svc, provider.id, "30", 20).await;
    let booking = book(&svc, activity.id).await;

    let rejected = svc
        .execute(RejectBooking {
            booking_id: booking.id,
            supplier_id: provider.id,
        })
        .await
        .unwrap();
    assert_eq!(rejected.status, booking::Status::Rejected);

    let err = svc
        .execute(ConfirmBooking {
            booking_id: booking.id,
            supplier_id: provider.id,
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(
        err,
        confirm_booking::ExecutionError::BookingClosed(
            _,
            booking::Status::Rejected,
        ),
    ));

    let err = svc
        .execute(CreatePayment {
            booking_id: booking.id,
            company_id: booking.company_id,
            method: payment::Method::Card,
            description: None,
            invoice_email: None,
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(
        err,
        create_payment::ExecutionError::BookingNotPayable(
            _,
            booking::Status::Rejected,
        ),
    ));

    let stored = svc
        .execute(query::booking::ById::by(booking.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, booking::Status::Rejected);
}

#[tokio::test]
async fn proposal_author_decides_booking_without_activity() {
    let svc = service();
    let company = new_company(&svc).await;
    let (author, stranger) =
        (new_supplier(&svc).await, new_supplier(&svc).await);
    let rfq = new_rfq(&svc, company.id, 6).await;
    let proposal = submit(&svc, rfq.id, author.id, None, "600").await;
    let booking = svc
        .execute(AcceptProposal {
            proposal_id: proposal.id,
            company_id: company.id,
        })
        .await
        .unwrap()
        .booking;

    let reject = |supplier_id: supplier::Id| RejectBooking {
        booking_id: booking.id,
        supplier_id,
    };
    let err = svc.execute(reject(stranger.id)).await.unwrap_err().into_inner();
    assert!(matches!(
        err,
        reject_booking::ExecutionError::NotBookingSupplier(..),
    ));

    let rejected = svc.execute(reject(author.id)).await.unwrap();
    assert_eq!(rejected.status, booking::Status::Rejected);
}

#[tokio::test]
async fn lists_bookings_provided_by_supplier() {
    let svc = service();
    let company = new_company(&svc).await;
    let (provider, other) = (new_supplier(&svc).await, new_supplier(&svc).await);
    let mine = new_activity(&svc, provider.id, "30", 20).await;
    let theirs = new_activity(&svc, other.id, "30", 20).await;

    let direct = book(&svc, mine.id).await;
    _ = book(&svc, theirs.id).await;

    let rfq = new_rfq(&svc, company.id, 6).await;
    let proposal = submit(&svc, rfq.id, provider.id, None, "600").await;
    let derived = svc
        .execute(AcceptProposal {
            proposal_id: proposal.id,
            company_id: company.id,
        })
        .await
        .unwrap()
        .booking;

    let listed = svc
        .execute(query::booking::BySupplier::by(provider.id))
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect::<HashSet<_>>();
    assert_eq!(listed, HashSet::from([direct.id, derived.id]));

    let listed = svc
        .execute(query::booking::BySupplier::by(other.id))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}
