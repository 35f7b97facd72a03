//! [`Command`] for creating a new [`Rfq`].

use common::{
    operations::{By, Commit, Insert, Notify, Select, Transact, Transacted},
    Date, DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{company, rfq, Company, Minutes, PartySize, RadiusKm, Rfq},
    infra::{database, notifier, Database, Notifier},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Rfq`] of a [`Company`].
#[derive(Clone, Debug)]
pub struct CreateRfq {
    /// ID of the [`Company`] issuing the [`Rfq`].
    pub company_id: company::Id,

    /// Number of people the event is requested for.
    pub party_size: PartySize,

    /// Date the event is preferred to take place on.
    pub preferred_date: Date,

    /// Alternative date the event may take place on.
    pub alternate_date: Option<Date>,

    /// Location the event should take place around.
    pub location: rfq::Location,

    /// Search radius around the location.
    ///
    /// [`RadiusKm::default()`] is used if [`None`].
    pub radius_km: Option<RadiusKm>,

    /// Maximal budget for the whole event.
    pub max_budget: Money,

    /// Objective of the event.
    pub objective: rfq::Objective,

    /// Free-form preferences of the [`Company`].
    pub preferences: Option<rfq::Preferences>,

    /// Category of the interesting activities.
    pub category: Option<rfq::Category>,

    /// Preferred climate of the event.
    pub climate: Option<rfq::Climate>,

    /// Maximal duration of the event.
    pub max_duration: Option<Minutes>,
}

impl<Db, Ntf, Gw> Command<CreateRfq> for Service<Db, Ntf, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Company>, company::Id>>,
            Ok = Option<Company>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Insert<Rfq>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Ntf: Notifier<
        Notify<notifier::Event>,
        Ok = (),
        Err = Traced<notifier::Error>,
    >,
{
    type Ok = Rfq;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRfq) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRfq {
            company_id,
            party_size,
            preferred_date,
            alternate_date,
            location,
            radius_km,
            max_budget,
            objective,
            preferences,
            category,
            climate,
            max_duration,
        } = cmd;

        if !max_budget.is_positive() {
            return Err(tracerr::new!(E::NonPositiveBudget(max_budget)));
        }

        self.database()
            .execute(Select(By::<Option<Company>, _>::new(company_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CompanyNotExists(company_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let now = DateTime::now();
        let rfq = Rfq {
            id: rfq::Id::new(),
            company_id,
            party_size,
            preferred_date,
            alternate_date,
            location,
            radius_km: radius_km.unwrap_or_default(),
            max_budget,
            objective,
            preferences,
            category,
            climate,
            max_duration,
            status: rfq::Status::Open,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(rfq.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.notify(notifier::Event::RfqCreated { rfq: rfq.clone() })
            .await;

        Ok(rfq)
    }
}

/// Error of [`CreateRfq`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Company`] with the provided ID does not exist.
    #[display("`Company(id: {_0})` does not exist")]
    CompanyNotExists(#[error(not(source))] company::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Budget of the [`Rfq`] is not positive.
    #[display("`Rfq` budget must be positive, got {_0}")]
    NonPositiveBudget(#[error(not(source))] Money),
}
