//! Subcommand implementations. Each one receives a ready [`Context`].

mod clear;
mod list;
mod migrate;
mod status;

use quill_domain::CredentialSet;
use quill_domain::config::QuillConfig;
use quill_errors::{ErrorCode, QuillError};
use quill_resilience::Resilience;
use quill_vault::CredentialStore;

pub(crate) use clear::clear;
pub(crate) use list::list;
pub(crate) use migrate::migrate;
pub(crate) use status::status;

/// Everything a subcommand needs.
#[derive(Debug)]
pub(crate) struct Context {
    pub(crate) config: QuillConfig,
    pub(crate) store: CredentialStore,
    pub(crate) resilience: Resilience,
}

impl Context {
    /// Loads the store under the configured retry policy, bounding each attempt by
    /// `timeouts.load_ms`.
    pub(crate) async fn load(&self) -> anyhow::Result<CredentialSet> {
        let timeout = self.config.timeouts.load();
        self.resilience
            .retry(&self.config.retry, "credentials.load", || {
                let store = self.store.clone();
                self.resilience.with_timeout(
                    async move { store.load().await },
                    timeout,
                    "credentials.load",
                )
            })
            .await
            .map_err(|err| escalate(err, true))
    }
}

/// A failure the resilience engine has already logged at error level.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub(crate) struct Logged(pub(crate) QuillError);

/// Wraps `err` in [`Logged`] when the engine reported it: every timeout, and any
/// retryable error that came out of `retry` (it only returns one once attempts run out).
pub(crate) fn escalate(err: QuillError, retried: bool) -> anyhow::Error {
    if err.code() == ErrorCode::SystemTimeout || (retried && err.retryable()) {
        Logged(err).into()
    } else {
        err.into()
    }
}

/// Turns a subcommand failure into the message shown to the operator, logging typed
/// errors the engine has not logged yet.
pub(crate) fn conclude(err: anyhow::Error, resilience: &Resilience) -> anyhow::Error {
    let err = match err.downcast::<Logged>() {
        Ok(Logged(typed)) => return user_facing(&typed),
        Err(other) => other,
    };
    match err.downcast::<QuillError>() {
        Ok(typed) => {
            resilience.report(&typed, "quill");
            user_facing(&typed)
        },
        Err(other) => other,
    }
}

pub(crate) fn user_facing(err: &QuillError) -> anyhow::Error {
    anyhow::anyhow!(err.to_user_message())
}
