//! Background environment for running [`Task`]s.

use std::{
    error::Error,
    future::{Future, IntoFuture},
    iter,
};

use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;
use tracing as log;

#[cfg(doc)]
use crate::Task;

/// Boxed error of a failed [`Task`].
type BoxError = Box<dyn Error + 'static>;

/// Background environment for running [`Task`]s on the current thread.
///
/// Resolves once any of the spawned [`Task`]s fails, or all of them finish.
#[derive(Debug, Default)]
pub struct Background {
    /// Local set the [`Task`]s are spawned onto.
    set: task::LocalSet,

    /// Names and handles of the spawned [`Task`]s.
    handles: Vec<(&'static str, task::JoinHandle<Result<(), BoxError>>)>,
}

impl Background {
    /// Spawns a new [`Task`] with the provided `name` inside this
    /// [`Background`] environment.
    pub fn spawn<F, E>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        log::debug!("spawning `{name}` background task");
        let handle = self
            .set
            .spawn_local(future.map_err(|e| BoxError::from(Box::new(e))));
        self.handles.push((name, handle));
    }

    /// Returns the number of spawned [`Task`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Indicates whether no [`Task`] is spawned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl IntoFuture for Background {
    type Output = Result<(), BoxError>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;
        let tasks = handles.into_iter().map(|(name, h)| {
            h.map(move |r| {
                let res = match r {
                    Ok(res) => res,
                    Err(e) => Err(BoxError::from(Box::new(e))),
                };
                if let Err(e) = &res {
                    log::error!("`{name}` background task failed: {e}");
                }
                res
            })
            .boxed_local()
        });
        future::try_join_all(iter::once(set.map(Ok).boxed_local()).chain(tasks))
            .map_ok(drop)
            .boxed_local()
    }
}
