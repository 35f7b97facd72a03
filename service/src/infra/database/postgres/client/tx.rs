//! [`Tx`] client definitions.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

use super::{delegate_connection, NonTx};

/// Transactional Postgres database client.
///
/// The transaction begins lazily on the first operation and is rolled back
/// if this client is dropped without being committed.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`connection::Pool`] to acquire a [`Connection`] from.
    pool: connection::Pool,

    /// [`NonTx`] client to reuse the [`Connection`] of, if not reused yet.
    origin: Arc<Mutex<Option<NonTx>>>,

    /// Begun [`connection::Tx`], if any.
    begun: Arc<RwLock<Option<connection::Tx>>>,
}

impl Tx {
    /// Creates a new [`Tx`] client out of the provided [`NonTx`] one.
    #[must_use]
    pub fn from_non_tx(client: NonTx) -> Self {
        Self {
            pool: client.pool.clone(),
            origin: Arc::new(Mutex::new(Some(client))),
            begun: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the [`connection::Tx`] of this [`Tx`] client, beginning it if
    /// there is none yet.
    async fn acquire(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        if let Ok(guard) =
            RwLockReadGuard::try_map(self.begun.read().await, Option::as_ref)
        {
            return Ok(guard);
        }

        let mut begun = self.begun.write().await;
        if begun.is_none() {
            let reused = match self.origin.lock().await.take() {
                Some(client) => client.release().await,
                None => None,
            };
            let conn = match reused {
                Some(conn) => conn,
                None => self
                    .pool
                    .get()
                    .await
                    .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                    .map_err(tracerr::map_from)?,
            };
            *begun = Some(
                connection::Tx::begin(conn)
                    .await
                    .map_err(tracerr::wrap!())?,
            );
        }
        Ok(RwLockReadGuard::map(begun.downgrade(), |tx| {
            tx.as_ref().expect("just begun")
        }))
    }

    /// Commits this [`Tx`] client.
    ///
    /// Nothing is done if no operation has been performed in it.
    ///
    /// # Errors
    ///
    /// If failed to commit the transaction.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Some(tx) = self.begun.write().await.take() else {
            return Ok(());
        };
        tx.commit().await.map_err(tracerr::wrap!())
    }
}

delegate_connection!(Tx);
