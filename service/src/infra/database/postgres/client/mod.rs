//! Postgres database client definitions.
//!
//! Clients acquire their [`connection::NonTx`] from a [`connection::Pool`]
//! lazily, on the first query.
//!
//! [`connection::NonTx`]: super::connection::NonTx
//! [`connection::Pool`]: super::connection::Pool

pub mod non_tx;
pub mod tx;

pub use self::{non_tx::NonTx, tx::Tx};

/// Implements [`Connection`] for a client by delegating to the
/// [`Connection`] returned from its `acquire()` method.
///
/// [`Connection`]: super::Connection
macro_rules! delegate_connection {
    ($client:ty) => {
        impl Connection for $client {
            async fn query<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Vec<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.acquire()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn query_opt<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Option<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.acquire()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query_opt(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn exec<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<u64, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.acquire()
                    .await
                    .map_err(tracerr::wrap!())?
                    .exec(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }
        }
    };
}

use delegate_connection;
