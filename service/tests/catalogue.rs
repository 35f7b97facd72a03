//! Activity catalogue, reviews and RFQ listing scenarios.

#![cfg(feature = "memory")]

mod common;

use std::collections::HashSet;

use ::common::Rating;
use service::{
    command::{
        create_activity, create_review, review_activity, CreateActivity,
        CreateReview, ReviewActivity,
    },
    domain::{activity, review, rfq, Capacity},
    query,
    read::rfq::list::{Arguments, Filter, Selector},
    Command as _, Query as _,
};

use self::common::{
    eur, new_activity, new_company, new_rfq, new_supplier, service,
};

#[tokio::test]
async fn moderates_activity_once() {
    let svc = service();
    let supplier = new_supplier(&svc).await;
    let created = svc
        .execute(CreateActivity {
            supplier_id: supplier.id,
            name: activity::Name::new("Escape room").unwrap(),
            price_per_person: eur("35.50"),
            capacity: Capacity::new(8).unwrap(),
        })
        .await
        .unwrap();
    assert_eq!(created.status, activity::Status::Pending);
    assert_eq!(created.reviews_count, 0);

    let rejected = svc
        .execute(ReviewActivity {
            activity_id: created.id,
            approve: false,
        })
        .await
        .unwrap();
    assert_eq!(rejected.status, activity::Status::Rejected);

    let err = svc
        .execute(ReviewActivity {
            activity_id: created.id,
            approve: true,
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(
        err,
        review_activity::ExecutionError::AlreadyReviewed(
            _,
            activity::Status::Rejected,
        ),
    ));
}

#[tokio::test]
async fn refuses_free_activity() {
    let svc = service();
    let supplier = new_supplier(&svc).await;

    let err = svc
        .execute(CreateActivity {
            supplier_id: supplier.id,
            name: activity::Name::new("Picnic").unwrap(),
            price_per_person: eur("0"),
            capacity: Capacity::new(8).unwrap(),
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(
        err,
        create_activity::ExecutionError::NonPositivePrice(_),
    ));

    let listed = svc
        .execute(query::activity::BySupplier::by(supplier.id))
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn reviews_recompute_activity_rating() {
    let svc = service();
    let company = new_company(&svc).await;
    let supplier = new_supplier(&svc).await;
    let activity = new_activity(&svc, supplier.id, "20", 10).await;
    assert_eq!(activity.rating, Rating::default());

    for score in [5, 4, 4] {
        _ = svc
            .execute(CreateReview {
                company_id: company.id,
                activity_id: Some(activity.id),
                supplier_id: None,
                score: review::Score::new(score).unwrap(),
                comment: None,
            })
            .await
            .unwrap();
    }

    let rated = svc
        .execute(query::activity::ById::by(activity.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rated.rating, "4.33".parse::<Rating>().unwrap());
    assert_eq!(rated.reviews_count, 3);

    let reviews = svc
        .execute(query::review::ByActivity::by(activity.id))
        .await
        .unwrap();
    assert_eq!(reviews.len(), 3);
}

#[tokio::test]
async fn review_requires_target() {
    let svc = service();
    let company = new_company(&svc).await;

    let err = svc
        .execute(CreateReview {
            company_id: company.id,
            activity_id: None,
            supplier_id: None,
            score: review::Score::new(3).unwrap(),
            comment: None,
        })
        .await
        .unwrap_err()
        .into_inner();
    assert!(matches!(err, create_review::ExecutionError::NoTarget));
}

#[tokio::test]
async fn lists_reviews_given_to_supplier() {
    let svc = service();
    let company = new_company(&svc).await;
    let (rated, other) = (new_supplier(&svc).await, new_supplier(&svc).await);
    let activity = new_activity(&svc, rated.id, "40", 10).await;

    let rate = |activity_id, supplier_id, score| CreateReview {
        company_id: company.id,
        activity_id,
        supplier_id,
        score: review::Score::new(score).unwrap(),
        comment: None,
    };
    let direct = svc.execute(rate(None, Some(rated.id), 5)).await.unwrap();
    let both = svc
        .execute(rate(Some(activity.id), Some(rated.id), 4))
        .await
        .unwrap();
    _ = svc.execute(rate(Some(activity.id), None, 2)).await.unwrap();
    _ = svc.execute(rate(None, Some(other.id), 1)).await.unwrap();

    let listed = svc
        .execute(query::review::BySupplier::by(rated.id))
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect::<HashSet<_>>();
    assert_eq!(listed, HashSet::from([direct.id, both.id]));
}

#[tokio::test]
async fn pages_through_filtered_rfqs() {
    let svc = service();
    let (mine, theirs) = (new_company(&svc).await, new_company(&svc).await);
    let mut expected = HashSet::new();
    for size in 1..=5 {
        _ = expected.insert(new_rfq(&svc, mine.id, size).await.id);
    }
    _ = new_rfq(&svc, theirs.id, 7).await;

    let filter = Filter {
        company_id: Some(mine.id),
        ..Filter::default()
    };

    let total = svc
        .execute(query::rfq::TotalCount::by(filter.clone()))
        .await
        .unwrap();
    assert_eq!(i32::from(total), 5);

    let mut seen = HashSet::new();
    let mut cursor = None;
    let mut pages = 0;
    loop {
        let page = svc
            .execute(query::rfq::List::by(Selector {
                arguments: Arguments::new(Some(2), cursor, None, None, 10)
                    .unwrap(),
                filter: filter.clone(),
            }))
            .await
            .unwrap();
        pages += 1;
        for edge in &page.edges {
            assert_eq!(edge.node.company_id, mine.id);
            assert!(seen.insert(edge.cursor), "no RFQ is listed twice");
        }
        let info = page.page_info();
        if !info.has_next_page {
            break;
        }
        cursor = info.end_cursor;
    }
    assert_eq!(pages, 3);
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn filters_rfqs_by_location_and_status() {
    let svc = service();
    let company = new_company(&svc).await;
    let open = new_rfq(&svc, company.id, 4).await;

    let svc = &svc;
    let count = move |filter| async move {
        i32::from(
            svc.execute(query::rfq::TotalCount::by(filter))
                .await
                .unwrap(),
        )
    };

    assert_eq!(
        count(Filter {
            location: Some(rfq::Location::new("lisbon coast").unwrap()),
            ..Filter::default()
        })
        .await,
        1,
    );
    assert_eq!(
        count(Filter {
            location: Some(rfq::Location::new("Porto").unwrap()),
            ..Filter::default()
        })
        .await,
        0,
    );
    assert_eq!(
        count(Filter {
            status: Some(rfq::Status::Closed),
            ..Filter::default()
        })
        .await,
        0,
    );

    let listed = svc
        .execute(query::rfq::ByCompany::by(company.id))
        .await
        .unwrap();
    assert_eq!(listed.iter().map(|r| r.id).collect::<Vec<_>>(), [open.id]);
}
