//! RFQ and proposal lifecycle scenarios.

#![cfg(feature = "memory")]

mod common;

use std::time::Duration;

use service::{
    command::{
        accept_proposal, cancel_rfq, submit_proposal, update_proposal,
        AcceptProposal, BookFromProposal, CancelRfq, RejectProposal,
        UpdateProposal,
    },
    domain::{booking, proposal, rfq},
    query, Command as _, Config, Query as _,
};

use self::common::{
    eur, new_activity, new_company, new_rfq, new_supplier, party, service,
    service_with, submit, Broken, Gateway, Recorder,
};

#[tokio::test]
async fn accepting_closes_rfq_and_rejects_siblings() {
    let svc = service();
    let company = new_company(&svc).await;
    let (a, b) = (new_supplier(&svc).await, new_supplier(&svc).await);
    let canoeing = new_activity(&svc, a.id, "25", 20).await;

    let rfq = new_rfq(&svc, company.id, 10).await;
    assert_eq!(rfq.status, rfq::Status::Open);

    let p1 = submit(&svc, rfq.id, a.id, Some(canoeing.id), "300").await;
    let p2 = submit(&svc, rfq.id, b.id, None, "900").await;
    let stored = svc
        .execute(query::rfq::ById::by(rfq.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, rfq::Status::Negotiating);

    let accept_proposal::Output { proposal, booking } = svc
        .execute(AcceptProposal {
            proposal_id: p1.id,
            company_id: company.id,
        })
        .await
        .unwrap();
    assert_eq!(proposal.status, proposal::Status::Accepted);

    // Price is re-derived from the activity, not taken from the proposal.
    assert_eq!(booking.total_price, eur("250"));
    assert_eq!(booking.activity_id, Some(canoeing.id));
    assert_eq!(booking.proposal_id, Some(p1.id));
    assert_eq!(booking.party_size, party(10));
    assert_eq!(booking.status, booking::Status::Pending);

    let stored = svc
        .execute(query::rfq::ById::by(rfq.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, rfq::Status::Closed);

    let sibling = svc
        .execute(query::proposal::ById::by(p2.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sibling.status, proposal::Status::Rejected);

    let accepted = svc
        .execute(query::proposal::ByRfq::by(rfq.id))
        .await
        .unwrap()
        .into_iter()
        .filter(|p| p.status == proposal::Status::Accepted)
        .count();
    assert_eq!(accepted, 1);

    assert_eq!(
        svc.notifier().names(),
        [
            "rfq_created",
            "proposal_received",
            "proposal_received",
            "proposal_accepted",
        ],
    );
}

#[tokio::test]
async fn accepting_without_activity_uses_proposed_total() {
    let svc = service();
    let company = new_company(&svc).await;
    let supplier = new_supplier(&svc).await;
    let rfq = new_rfq(&svc, company.id, 12).await;
    let p = submit(&svc, rfq.id, supplier.id, None, "1234.56").await;

    let out = svc
        .execute(AcceptProposal {
            proposal_id: p.id,
            company_id: company.id,
        })
        .await
        .unwrap();

    assert_eq!(out.booking.total_price, eur("1234.56"));
    assert_eq!(out.booking.activity_id, None);
    assert_eq!(out.booking.date, p.proposed_date);
}

#[tokio::test]
async fn closed_rfq_refuses_proposals() {
    let svc = service();
    let company = new_company(&svc).await;
    let supplier = new_supplier(&svc).await;
    let rfq = new_rfq(&svc, company.id, 5).await;
    let p = submit(&svc, rfq.id, supplier.id, None, "500").await;
    _ = svc
        .execute(AcceptProposal {
            proposal_id: p.id,
            company_id: company.id,
        })
        .await
        .unwrap();

    let err = svc
        .execute(service::command::SubmitProposal {
            rfq_id: rfq.id,
            supplier_id: supplier.id,
            activity_id: None,
            total_price: eur("400"),
            price_per_person: eur("80"),
            description: proposal::Description::new("Cheaper").unwrap(),
            extras: None,
            conditions: None,
            proposed_date: p.proposed_date,
            duration: None,
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(
        err,
        submit_proposal::ExecutionError::RfqNotOpen(_, rfq::Status::Closed),
    ));
}

#[tokio::test]
async fn only_rfq_owner_decides_on_proposals() {
    let svc = service();
    let owner = new_company(&svc).await;
    let stranger = new_company(&svc).await;
    let supplier = new_supplier(&svc).await;
    let rfq = new_rfq(&svc, owner.id, 5).await;
    let p = submit(&svc, rfq.id, supplier.id, None, "500").await;

    let err = svc
        .execute(AcceptProposal {
            proposal_id: p.id,
            company_id: stranger.id,
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(
        err,
        accept_proposal::ExecutionError::NotRfqOwner(..),
    ));

    let stored = svc
        .execute(query::proposal::ById::by(p.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, proposal::Status::Pending);
}

#[tokio::test]
async fn rejected_proposal_cannot_be_accepted() {
    let svc = service();
    let company = new_company(&svc).await;
    let supplier = new_supplier(&svc).await;
    let rfq = new_rfq(&svc, company.id, 5).await;
    let p = submit(&svc, rfq.id, supplier.id, None, "500").await;

    let rejected = svc
        .execute(RejectProposal {
            proposal_id: p.id,
            company_id: company.id,
        })
        .await
        .unwrap();
    assert_eq!(rejected.status, proposal::Status::Rejected);

    let err = svc
        .execute(AcceptProposal {
            proposal_id: p.id,
            company_id: company.id,
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(
        err,
        accept_proposal::ExecutionError::ProposalNotPending(
            _,
            proposal::Status::Rejected,
        ),
    ));
}

#[tokio::test]
async fn concurrent_accepts_let_single_proposal_win() {
    let svc = service();
    let company = new_company(&svc).await;
    let (a, b) = (new_supplier(&svc).await, new_supplier(&svc).await);
    let rfq = new_rfq(&svc, company.id, 8).await;
    let p1 = submit(&svc, rfq.id, a.id, None, "800").await;
    let p2 = submit(&svc, rfq.id, b.id, None, "700").await;

    let (r1, r2) = tokio::join!(
        svc.execute(AcceptProposal {
            proposal_id: p1.id,
            company_id: company.id,
        }),
        svc.execute(AcceptProposal {
            proposal_id: p2.id,
            company_id: company.id,
        }),
    );

    assert_eq!(
        usize::from(r1.is_ok()) + usize::from(r2.is_ok()),
        1,
        "exactly one accept must succeed",
    );
    let loser = r1.err().or(r2.err()).unwrap().into_inner();
    assert!(matches!(
        loser,
        accept_proposal::ExecutionError::ProposalNotPending(..)
            | accept_proposal::ExecutionError::RfqNotOpen(..),
    ));

    let statuses = svc
        .execute(query::proposal::ByRfq::by(rfq.id))
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.status)
        .collect::<Vec<_>>();
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == proposal::Status::Accepted)
            .count(),
        1,
    );
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == proposal::Status::Rejected)
            .count(),
        1,
    );
}

#[tokio::test]
async fn expired_proposal_cannot_be_accepted() {
    let svc = service_with(
        Config {
            proposal_ttl: Duration::ZERO,
            ..Config::default()
        },
        Recorder::default(),
        Gateway::default(),
    );
    let company = new_company(&svc).await;
    let supplier = new_supplier(&svc).await;
    let rfq = new_rfq(&svc, company.id, 5).await;
    let p = submit(&svc, rfq.id, supplier.id, None, "500").await;

    assert_eq!(p.current_status(), proposal::Status::Expired);

    let err = svc
        .execute(AcceptProposal {
            proposal_id: p.id,
            company_id: company.id,
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(
        err,
        accept_proposal::ExecutionError::ProposalNotPending(
            _,
            proposal::Status::Expired,
        ),
    ));
}

#[tokio::test]
async fn booking_from_proposal_is_idempotent() {
    let svc = service();
    let company = new_company(&svc).await;
    let supplier = new_supplier(&svc).await;
    let rfq = new_rfq(&svc, company.id, 5).await;
    let p = submit(&svc, rfq.id, supplier.id, None, "500").await;
    let out = svc
        .execute(AcceptProposal {
            proposal_id: p.id,
            company_id: company.id,
        })
        .await
        .unwrap();

    let again = svc
        .execute(BookFromProposal {
            company_id: company.id,
            proposal_id: p.id,
            party_size: party(5),
        })
        .await
        .unwrap();
    assert_eq!(again.id, out.booking.id);

    let bookings = svc
        .execute(query::booking::ByCompany::by(company.id))
        .await
        .unwrap();
    assert_eq!(bookings.len(), 1);
}

#[tokio::test]
async fn pending_proposal_is_updated_by_its_supplier_only() {
    let svc = service();
    let company = new_company(&svc).await;
    let (owner, other) = (new_supplier(&svc).await, new_supplier(&svc).await);
    let rfq = new_rfq(&svc, company.id, 5).await;
    let p = submit(&svc, rfq.id, owner.id, None, "500").await;

    let update = |supplier_id| UpdateProposal {
        proposal_id: p.id,
        supplier_id,
        total_price: Some(eur("450")),
        price_per_person: None,
        description: None,
        extras: Some(proposal::Extras::new("Lunch included").unwrap()),
        conditions: None,
        proposed_date: None,
        duration: None,
    };

    let err = svc.execute(update(other.id)).await.unwrap_err().into_inner();
    assert!(matches!(
        err,
        update_proposal::ExecutionError::NotProposalOwner(..),
    ));

    let updated = svc.execute(update(owner.id)).await.unwrap();
    assert_eq!(updated.total_price, eur("450"));
    assert_eq!(updated.price_per_person, p.price_per_person);
    assert!(updated.extras.is_some());
}

#[tokio::test]
async fn cancellation_keeps_proposals_by_default() {
    let svc = service();
    let company = new_company(&svc).await;
    let supplier = new_supplier(&svc).await;
    let rfq = new_rfq(&svc, company.id, 5).await;
    let p = submit(&svc, rfq.id, supplier.id, None, "500").await;

    let cancelled = svc
        .execute(CancelRfq {
            rfq_id: rfq.id,
            company_id: company.id,
        })
        .await
        .unwrap();
    assert_eq!(cancelled.status, rfq::Status::Cancelled);

    let stored = svc
        .execute(query::proposal::ById::by(p.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, proposal::Status::Pending);

    let err = svc
        .execute(CancelRfq {
            rfq_id: rfq.id,
            company_id: company.id,
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(
        err,
        cancel_rfq::ExecutionError::RfqNotOpen(_, rfq::Status::Cancelled),
    ));
}

#[tokio::test]
async fn cancellation_may_reject_pending_proposals() {
    let svc = service_with(
        Config {
            rfq_cancellation: rfq::CancellationPolicy::RejectPendingProposals,
            ..Config::default()
        },
        Recorder::default(),
        Gateway::default(),
    );
    let company = new_company(&svc).await;
    let supplier = new_supplier(&svc).await;
    let rfq = new_rfq(&svc, company.id, 5).await;
    let p = submit(&svc, rfq.id, supplier.id, None, "500").await;

    _ = svc
        .execute(CancelRfq {
            rfq_id: rfq.id,
            company_id: company.id,
        })
        .await
        .unwrap();

    let stored = svc
        .execute(query::proposal::ById::by(p.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, proposal::Status::Rejected);
}

#[tokio::test]
async fn notification_failures_do_not_fail_commands() {
    let svc = service_with(Config::default(), Broken, Gateway::default());
    let company = new_company(&svc).await;
    let supplier = new_supplier(&svc).await;

    let rfq = new_rfq(&svc, company.id, 5).await;
    let p = submit(&svc, rfq.id, supplier.id, None, "500").await;

    let stored = svc
        .execute(query::proposal::ById::by(p.id))
        .await
        .unwrap();
    assert!(stored.is_some());
}
