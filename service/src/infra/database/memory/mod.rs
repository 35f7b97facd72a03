//! In-memory [`Database`] implementation.
//!
//! Transactions are serialized: a [`Tx`] holds the whole [`State`] locked from
//! the [`Transact`] until it's committed or dropped, so any row lock taken
//! inside it is trivially satisfied.
//!
//! A [`NonTx`] client must never be used by a task owning a live [`Tx`],
//! otherwise it waits for itself.

mod impls;

use std::{collections::HashMap, future::Future, sync::Arc};

use common::operations::{Commit, Transact};
use derive_more::{Deref, Display, Error as StdError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracerr::Traced;

use crate::{
    domain::{
        activity, booking, company, payment, proposal, review, rfq, supplier,
        Activity, Booking, Company, Payment, Proposal, Review, Rfq, Supplier,
    },
    infra::{database, Database},
};

/// In-memory [`Database`] client.
#[derive(Clone, Debug, Default, Deref)]
pub struct Memory<T = NonTx>(T);

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Tables of a [`Memory`] database.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Stored [`Company`] entities.
    pub(crate) companies: HashMap<company::Id, Company>,

    /// Stored [`Supplier`] entities.
    pub(crate) suppliers: HashMap<supplier::Id, Supplier>,

    /// Stored [`Activity`] entities.
    pub(crate) activities: HashMap<activity::Id, Activity>,

    /// Stored [`Rfq`] entities.
    pub(crate) rfqs: HashMap<rfq::Id, Rfq>,

    /// Stored [`Proposal`] entities.
    pub(crate) proposals: HashMap<proposal::Id, Proposal>,

    /// Stored [`Booking`] entities.
    pub(crate) bookings: HashMap<booking::Id, Booking>,

    /// Stored [`Payment`] entities.
    pub(crate) payments: HashMap<payment::Id, Payment>,

    /// Stored [`Review`] entities.
    pub(crate) reviews: HashMap<review::Id, Review>,
}

/// Non-transactional [`Memory`] client.
#[derive(Clone, Debug, Default)]
pub struct NonTx {
    /// Shared [`State`] of the database.
    state: Arc<Mutex<State>>,
}

/// Transactional [`Memory`] client.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`Staged`] changes, until committed.
    staged: Arc<Mutex<Option<Staged>>>,
}

/// Changes of a [`Tx`] not committed yet.
#[derive(Debug)]
struct Staged {
    /// Guard of the shared [`State`] held for the whole transaction.
    guard: OwnedMutexGuard<State>,

    /// Working copy of the [`State`].
    state: State,
}

/// Access to the [`State`] of a [`Memory`] client.
pub trait Storage {
    /// Reads the [`State`] with the provided function.
    ///
    /// # Errors
    ///
    /// If the [`State`] is not accessible anymore.
    fn read<R>(
        &self,
        f: impl FnOnce(&State) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;

    /// Modifies the [`State`] with the provided function.
    ///
    /// # Errors
    ///
    /// If the [`State`] is not accessible anymore, or the provided function
    /// fails.
    fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> Result<R, Error>,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;
}

impl Storage for NonTx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        Ok(f(&*self.state.lock().await))
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> Result<R, Error>,
    ) -> Result<R, Traced<database::Error>> {
        f(&mut *self.state.lock().await)
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl Storage for Tx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        let staged = self.staged.lock().await;
        let staged = staged
            .as_ref()
            .ok_or(Error::TxFinished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        Ok(f(&staged.state))
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> Result<R, Error>,
    ) -> Result<R, Traced<database::Error>> {
        let mut staged = self.staged.lock().await;
        let staged = staged
            .as_mut()
            .ok_or(Error::TxFinished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        f(&mut staged.state)
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let state = guard.clone();
        Ok(Memory(Tx {
            staged: Arc::new(Mutex::new(Some(Staged { guard, state }))),
        }))
    }
}

impl Database<Transact> for Memory<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        let Staged { mut guard, state } = self
            .staged
            .lock()
            .await
            .take()
            .ok_or(Error::TxFinished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        *guard = state;
        Ok(())
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Transaction is committed already.
    #[display("Transaction is finished already")]
    TxFinished,

    /// Unique constraint is violated.
    #[display("Unique constraint `{_0}` is violated")]
    UniqueViolation(#[error(not(source))] &'static str),
}

impl Error {
    /// Checks if this [`Error`] is a violation of the specified unique
    /// constraint.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: &str) -> bool {
        matches!(self, Self::UniqueViolation(c) if *c == constraint)
    }
}
