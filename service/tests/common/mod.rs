//! Shared helpers of the [`Service`] integration tests.

#![allow(dead_code, reason = "not every test uses every helper")]

use std::{
    convert::Infallible,
    fmt::Debug,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use common::{
    money::Currency,
    operations::{By, Notify, Start},
    Date, Money,
};
use service::{
    command::{
        CreateActivity, CreateCompany, CreateRfq, CreateSupplier,
        ReviewActivity, SubmitProposal,
    },
    domain::{
        activity, company, payment, proposal, rfq, supplier, Activity,
        Capacity, Company, Email, PartySize, Proposal, Rfq, Supplier,
    },
    infra::{
        notifier::{self, Event},
        payment_gateway::{
            self, ClientSecret, ConfirmIntent, Confirmation, CreateIntent,
            Intent,
        },
        Memory, Notifier, PaymentGateway,
    },
    task::{expire_proposals, ExpireProposals},
    Command, Config, Service, Task,
};
use tracerr::Traced;

/// [`Service`] under test.
pub type TestService = Service<Memory, Recorder, Gateway>;

/// Creates a new [`TestService`] over an empty [`Memory`] database.
pub fn service() -> TestService {
    service_with(Config::default(), Recorder::default(), Gateway::default())
}

/// Creates a new [`Service`] with the provided parts over an empty [`Memory`]
/// database.
pub fn service_with<Ntf, Gw>(
    config: Config,
    notifier: Ntf,
    gateway: Gw,
) -> Service<Memory, Ntf, Gw>
where
    Service<Memory, Ntf, Gw>: Task<
            Start<
                By<
                    ExpireProposals<Service<Memory, Ntf, Gw>>,
                    expire_proposals::Config,
                >,
            >,
            Ok = (),
            Err = Infallible,
        > + Clone
        + 'static,
{
    // Background tasks are not run in tests.
    let (svc, _) = Service::new(config, Memory::new(), notifier, gateway);
    svc
}

/// Parses [`Money`] in euros.
pub fn eur(amount: &str) -> Money {
    Money::new(amount.parse().unwrap(), Currency::Eur)
}

/// Creates a new [`PartySize`].
pub fn party(size: u16) -> PartySize {
    PartySize::new(size).unwrap()
}

/// Returns a date far enough in the future.
pub fn date() -> Date {
    Date::from_ymd(2030, 6, 1).unwrap()
}

/// [`Notifier`] recording every delivered [`Event`].
#[derive(Clone, Debug, Default)]
pub struct Recorder(Arc<Mutex<Vec<Event>>>);

impl Recorder {
    /// Returns names of the recorded [`Event`]s in delivery order.
    pub fn names(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().iter().map(Event::name).collect()
    }

    /// Returns the recorded [`Event`]s.
    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }
}

impl Notifier<Notify<Event>> for Recorder {
    type Ok = ();
    type Err = Traced<notifier::Error>;

    async fn execute(&self, Notify(ev): Notify<Event>) -> Result<(), Self::Err> {
        self.0.lock().unwrap().push(ev);
        Ok(())
    }
}

/// [`Notifier`] failing every delivery.
#[derive(Clone, Copy, Debug, Default)]
pub struct Broken;

impl Notifier<Notify<Event>> for Broken {
    type Ok = ();
    type Err = Traced<notifier::Error>;

    async fn execute(&self, _: Notify<Event>) -> Result<(), Self::Err> {
        Err(tracerr::new!(notifier::Error::Delivery("smtp is down".into())))
    }
}

/// Scriptable [`PaymentGateway`].
#[derive(Clone, Debug, Default)]
pub struct Gateway {
    /// Whether the gateway is unreachable.
    pub unavailable: Arc<AtomicBool>,

    /// Whether the gateway declines charges.
    pub declining: Arc<AtomicBool>,
}

impl Gateway {
    /// Makes this [`Gateway`] (un)reachable.
    pub fn set_unavailable(&self, v: bool) {
        self.unavailable.store(v, Ordering::SeqCst);
    }

    /// Makes this [`Gateway`] decline (or approve) charges.
    pub fn set_declining(&self, v: bool) {
        self.declining.store(v, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), Traced<payment_gateway::Error>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(tracerr::new!(payment_gateway::Error::Unavailable(
                "connection refused".into(),
            )));
        }
        Ok(())
    }
}

impl PaymentGateway<CreateIntent> for Gateway {
    type Ok = Intent;
    type Err = Traced<payment_gateway::Error>;

    async fn execute(&self, op: CreateIntent) -> Result<Intent, Self::Err> {
        self.check()?;
        Ok(Intent {
            id: payment::GatewayPaymentId::new(format!("pi_{}", op.payment_id))
                .unwrap(),
            client_secret: ClientSecret::from(format!("secret_{}", op.payment_id)),
            status: "requires_payment_method".into(),
        })
    }
}

impl PaymentGateway<ConfirmIntent> for Gateway {
    type Ok = Confirmation;
    type Err = Traced<payment_gateway::Error>;

    async fn execute(
        &self,
        op: ConfirmIntent,
    ) -> Result<Confirmation, Self::Err> {
        self.check()?;
        if self.declining.load(Ordering::SeqCst) {
            return Ok(Confirmation {
                success: false,
                transaction_id: None,
            });
        }
        let id: &str = op.intent_id.as_ref();
        Ok(Confirmation {
            success: true,
            transaction_id: payment::GatewayTransactionId::new(format!(
                "tx_{id}"
            )),
        })
    }
}

/// Creates a new [`Company`].
pub async fn new_company<S>(svc: &S) -> Company
where
    S: Command<CreateCompany, Ok = Company, Err: Debug>,
{
    svc.execute(CreateCompany {
        name: company::Name::new("Acme").unwrap(),
        email: Email::new("events@acme.test").unwrap(),
    })
    .await
    .unwrap()
}

/// Creates a new [`Supplier`].
pub async fn new_supplier<S>(svc: &S) -> Supplier
where
    S: Command<CreateSupplier, Ok = Supplier, Err: Debug>,
{
    svc.execute(CreateSupplier {
        name: supplier::Name::new("Outdoor Co").unwrap(),
        email: Email::new("sales@outdoor.test").unwrap(),
    })
    .await
    .unwrap()
}

/// Creates a new approved [`Activity`] of the provided [`Supplier`].
pub async fn new_activity<S>(
    svc: &S,
    supplier_id: supplier::Id,
    price: &str,
    capacity: u16,
) -> Activity
where
    S: Command<CreateActivity, Ok = Activity, Err: Debug>
        + Command<ReviewActivity, Ok = Activity, Err: Debug>,
{
    let a = svc
        .execute(CreateActivity {
            supplier_id,
            name: activity::Name::new("Canoeing").unwrap(),
            price_per_person: eur(price),
            capacity: Capacity::new(capacity).unwrap(),
        })
        .await
        .unwrap();
    svc.execute(ReviewActivity {
        activity_id: a.id,
        approve: true,
    })
    .await
    .unwrap()
}

/// Creates a new [`Rfq`] of the provided [`Company`].
pub async fn new_rfq<S>(svc: &S, company_id: company::Id, party_size: u16) -> Rfq
where
    S: Command<CreateRfq, Ok = Rfq, Err: Debug>,
{
    svc.execute(CreateRfq {
        company_id,
        party_size: party(party_size),
        preferred_date: date(),
        alternate_date: None,
        location: rfq::Location::new("Lisbon").unwrap(),
        radius_km: None,
        max_budget: eur("2000"),
        objective: rfq::Objective::new("Team bonding").unwrap(),
        preferences: None,
        category: None,
        climate: None,
        max_duration: None,
    })
    .await
    .unwrap()
}

/// Submits a new [`Proposal`] of the provided [`Supplier`].
pub async fn submit<S>(
    svc: &S,
    rfq_id: rfq::Id,
    supplier_id: supplier::Id,
    activity_id: Option<activity::Id>,
    total: &str,
) -> Proposal
where
    S: Command<SubmitProposal, Ok = Proposal, Err: Debug>,
{
    svc.execute(SubmitProposal {
        rfq_id,
        supplier_id,
        activity_id,
        total_price: eur(total),
        price_per_person: eur("10"),
        description: proposal::Description::new("Full day on the river")
            .unwrap(),
        extras: None,
        conditions: None,
        proposed_date: date(),
        duration: None,
    })
    .await
    .unwrap()
}
