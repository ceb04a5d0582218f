//! Errors which can happen in various parts of the library.

use std::sync::PoisonError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The labeling thread could not be started.
    #[error("failed to spawn the labeling thread")]
    Spawn(#[source] std::io::Error),
    /// A thread panicked while holding one of the locks shared between the worker and the
    /// consumer. The shared state can not be trusted anymore.
    #[error("lock guarding the {0} was poisoned")]
    Poisoned(&'static str),
    #[error("kernel is missing a {0}")]
    MissingCollaborator(&'static str),
}

impl Error {
    pub(crate) fn poisoned<T>(what: &'static str) -> impl FnOnce(PoisonError<T>) -> Error {
        move |_| Error::Poisoned(what)
    }
}
