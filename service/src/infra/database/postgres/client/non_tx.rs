//! [`NonTx`] client definitions.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

use super::delegate_connection;

/// Non-transactional Postgres database client.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to acquire [`Connection`]s from.
    pub(crate) pool: connection::Pool,

    /// [`Connection`] acquired for non-transactional operations, if any.
    acquired: Arc<RwLock<Option<connection::NonTx>>>,
}

impl NonTx {
    /// Creates a new [`NonTx`] client over the provided [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self {
            pool,
            acquired: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the [`Connection`] of this [`NonTx`] client, acquiring it from
    /// the [`connection::Pool`] if there is none yet.
    pub(crate) async fn acquire(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::NonTx>, Traced<database::Error>>
    {
        if let Ok(guard) = RwLockReadGuard::try_map(
            self.acquired.read().await,
            Option::as_ref,
        ) {
            return Ok(guard);
        }

        let mut acquired = self.acquired.write().await;
        if acquired.is_none() {
            *acquired = Some(
                self.pool
                    .get()
                    .await
                    .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                    .map_err(tracerr::map_from)?,
            );
        }
        Ok(RwLockReadGuard::map(acquired.downgrade(), |conn| {
            conn.as_ref().expect("just acquired")
        }))
    }

    /// Releases the [`Connection`] of this [`NonTx`] client, if any.
    ///
    /// The next operation of this [`NonTx`] client acquires a new one.
    pub(crate) async fn release(&self) -> Option<connection::NonTx> {
        self.acquired.write().await.take()
    }
}

delegate_connection!(NonTx);
