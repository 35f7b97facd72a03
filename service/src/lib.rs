//! Service contains the business logic of the team-building marketplace.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use std::time::Duration;

use common::operations::{By, Notify, Start};
use derive_more::{Debug, Display, Error};
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{rfq, Proposal},
    infra::{notifier, Notifier},
};
#[cfg(doc)]
use crate::infra::{Database, PaymentGateway};

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Period a submitted [`Proposal`] stays pending for.
    #[default(Proposal::DEFAULT_TTL)]
    pub proposal_ttl: Duration,

    /// What happens to pending proposals of a cancelled RFQ.
    pub rfq_cancellation: rfq::CancellationPolicy,

    /// [`task::ExpireProposals`] configuration.
    pub expire_proposals: task::expire_proposals::Config,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Ntf, Gw> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Notifier`] of this [`Service`].
    notifier: Ntf,

    /// [`PaymentGateway`] of this [`Service`].
    payment_gateway: Gw,
}

impl<Db, Ntf, Gw> Service<Db, Ntf, Gw> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(
        config: Config,
        database: Db,
        notifier: Ntf,
        payment_gateway: Gw,
    ) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<
                        task::ExpireProposals<Self>,
                        task::expire_proposals::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Service {
            config,
            database,
            notifier,
            payment_gateway,
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn("expire_proposals", async move {
            svc.execute(Start(By::new(svc.config().expire_proposals)))
                .await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`Notifier`] of this [`Service`].
    #[must_use]
    pub fn notifier(&self) -> &Ntf {
        &self.notifier
    }

    /// Returns [`PaymentGateway`] of this [`Service`].
    #[must_use]
    pub fn payment_gateway(&self) -> &Gw {
        &self.payment_gateway
    }

    /// Delivers the provided [`notifier::Event`].
    ///
    /// Failures are logged and swallowed, as the reported changes are
    /// committed already.
    pub(crate) async fn notify(&self, event: notifier::Event)
    where
        Ntf: Notifier<
            Notify<notifier::Event>,
            Ok = (),
            Err = Traced<notifier::Error>,
        >,
    {
        let name = event.name();
        if let Err(e) = self.notifier.execute(Notify(event)).await {
            log::warn!("`{name}` notification failed: {e}");
        }
    }
}

/// Shortcut for the error of starting a [`Task`].
type TaskStartError<Svc, T, Args> = <Svc as Task<Start<By<T, Args>>>>::Err;

/// Error of starting a [`Service`].
#[derive(Debug, Display, Error)]
pub enum StartupError<Svc>
where
    Svc: Task<
        Start<
            By<task::ExpireProposals<Svc>, task::expire_proposals::Config>,
        >,
    >,
{
    /// [`task::ExpireProposals`] failed to start.
    ExpireProposalsTask(
        TaskStartError<
            Svc,
            task::ExpireProposals<Svc>,
            task::expire_proposals::Config,
        >,
    ),
}
