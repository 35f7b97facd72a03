//! [`ExpireProposals`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Perform, Start, Update};
use smart_default::SmartDefault;
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Proposal;
use crate::{
    domain::proposal,
    infra::{database, Database},
    read, Service,
};

use super::Task;

/// Configuration for [`ExpireProposals`] [`Task`].
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Interval between sweeps of the pending [`Proposal`]s.
    #[default(time::Duration::from_secs(60 * 60))]
    pub interval: time::Duration,
}

/// [`Task`] storing [`Proposal`]s pending past their deadline as
/// [`proposal::Status::Expired`].
///
/// [`Proposal::current_status()`] reports the expiration regardless of this
/// [`Task`], which only keeps the stored statuses in sync.
#[derive(Clone, Copy, Debug)]
pub struct ExpireProposals<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, Ntf, Gw> Task<Start<By<ExpireProposals<Self>, Config>>>
    for Service<Db, Ntf, Gw>
where
    ExpireProposals<Self>: Task<
            Perform<()>,
            Ok = read::proposal::ExpiredCount,
            Err: Error,
        > + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<ExpireProposals<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = ExpireProposals {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(count) => log::debug!("{count} proposals expired"),
                Err(e) => log::error!("`task::ExpireProposals` failed: {e}"),
            }
        }
    }
}

impl<Db, Ntf, Gw> Task<Perform<()>> for ExpireProposals<Service<Db, Ntf, Gw>>
where
    Db: Database<
        Update<By<read::proposal::ExpiredCount, proposal::ExpirationDateTime>>,
        Ok = read::proposal::ExpiredCount,
        Err = Traced<database::Error>,
    >,
{
    type Ok = read::proposal::ExpiredCount;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        self.service
            .database()
            .execute(Update(By::new(proposal::ExpirationDateTime::now())))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`ExpireProposals`] execution.
pub type ExecutionError = Traced<database::Error>;

#[cfg(all(test, feature = "memory"))]
mod spec {
    use std::time::Duration;

    use common::{
        money::Currency,
        operations::{By, Perform, Select},
        Date, Money,
    };

    use crate::{
        command::{CreateCompany, CreateRfq, CreateSupplier, SubmitProposal},
        domain::{company, proposal, rfq, supplier, Email, PartySize, Proposal},
        infra::{notifier, payment_gateway, Database as _, Memory},
        Command as _, Config, Service,
    };

    use super::{ExpireProposals, Task as _};

    type TestService = Service<Memory, notifier::Log, payment_gateway::Mock>;

    async fn pending_proposal(svc: &TestService) -> Proposal {
        let eur = |v: &str| Money::new(v.parse().unwrap(), Currency::Eur);
        let company = svc
            .execute(CreateCompany {
                name: company::Name::new("Acme").unwrap(),
                email: Email::new("events@acme.test").unwrap(),
            })
            .await
            .unwrap();
        let supplier = svc
            .execute(CreateSupplier {
                name: supplier::Name::new("Outdoor Co").unwrap(),
                email: Email::new("sales@outdoor.test").unwrap(),
            })
            .await
            .unwrap();
        let rfq = svc
            .execute(CreateRfq {
                company_id: company.id,
                party_size: PartySize::new(4).unwrap(),
                preferred_date: Date::from_ymd(2030, 6, 1).unwrap(),
                alternate_date: None,
                location: rfq::Location::new("Porto").unwrap(),
                radius_km: None,
                max_budget: eur("400"),
                objective: rfq::Objective::new("Offsite").unwrap(),
                preferences: None,
                category: None,
                climate: None,
                max_duration: None,
            })
            .await
            .unwrap();
        svc.execute(SubmitProposal {
            rfq_id: rfq.id,
            supplier_id: supplier.id,
            activity_id: None,
            total_price: eur("320"),
            price_per_person: eur("80"),
            description: proposal::Description::new("Wine tasting").unwrap(),
            extras: None,
            conditions: None,
            proposed_date: Date::from_ymd(2030, 6, 1).unwrap(),
            duration: None,
        })
        .await
        .unwrap()
    }

    fn service(ttl: Duration) -> TestService {
        let (svc, _) = Service::new(
            Config {
                proposal_ttl: ttl,
                ..Config::default()
            },
            Memory::new(),
            notifier::Log,
            payment_gateway::Mock,
        );
        svc
    }

    #[tokio::test]
    async fn stores_expired_proposals() {
        let svc = service(Duration::ZERO);
        let p = pending_proposal(&svc).await;
        assert_eq!(p.status, proposal::Status::Pending);

        let task = ExpireProposals {
            config: super::Config::default(),
            service: svc.clone(),
        };
        let count = task.execute(Perform(())).await.unwrap();
        assert_eq!(u64::from(count), 1);

        let stored = svc
            .database()
            .execute(Select(By::<Option<Proposal>, _>::new(p.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, proposal::Status::Expired);

        let count = task.execute(Perform(())).await.unwrap();
        assert_eq!(u64::from(count), 0);
    }

    #[tokio::test]
    async fn keeps_proposals_within_deadline() {
        let svc = service(Proposal::DEFAULT_TTL);
        let p = pending_proposal(&svc).await;

        let task = ExpireProposals {
            config: super::Config::default(),
            service: svc.clone(),
        };
        let count = task.execute(Perform(())).await.unwrap();
        assert_eq!(u64::from(count), 0);

        let stored = svc
            .database()
            .execute(Select(By::<Option<Proposal>, _>::new(p.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, proposal::Status::Pending);
    }
}
