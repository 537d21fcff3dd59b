// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Apply-then-confirm mutations with rollback.
//!
//! The local change is visible before the remote call resolves. If the
//! remote call fails the captured pre-state is restored and the error is
//! returned once; nothing is retried.

use std::future::Future;
use std::sync::{Arc, Weak};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum OptimisticError<E> {
    /// The state was dropped before the local change could be applied
    #[error("state was dropped before the mutation started")]
    Detached,
    #[error(transparent)]
    Remote(E),
}

/// Wraps one piece of shared view state.
///
/// Only a weak reference is held: once the owner drops the state, late
/// remote results are discarded instead of written.
pub struct OptimisticMutationController<S> {
    state: Weak<Mutex<S>>,
}

impl<S> Clone for OptimisticMutationController<S> {
    fn clone(&self) -> Self {
        Self { state: self.state.clone() }
    }
}

impl<S> OptimisticMutationController<S> {
    pub fn new(state: &Arc<Mutex<S>>) -> Self {
        Self { state: Arc::downgrade(state) }
    }

    pub fn is_attached(&self) -> bool {
        self.state.strong_count() > 0
    }

    /// Run `local` immediately, then await `remote`.
    ///
    /// `local` returns whatever it needs to undo itself; on failure that
    /// value is handed to `restore`. The lock is never held across `remote`.
    pub async fn apply<P, T, E, L, R, Fut>(
        &self,
        local: L,
        restore: R,
        remote: Fut,
    ) -> Result<T, OptimisticError<E>>
    where
        L: FnOnce(&mut S) -> P,
        R: FnOnce(&mut S, P),
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let pre_state = {
            let state = self.state.upgrade().ok_or(OptimisticError::Detached)?;
            let mut guard = state.lock().await;
            local(&mut guard)
        };

        match remote.await {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!("Remote mutation failed, rolling back: {}", e);
                match self.state.upgrade() {
                    Some(state) => {
                        let mut guard = state.lock().await;
                        restore(&mut guard, pre_state);
                    }
                    None => debug!("State dropped before rollback, discarding"),
                }
                Err(OptimisticError::Remote(e))
            }
        }
    }

    /// Write a settled result if the state is still alive.
    /// Returns `false` when the write was discarded.
    pub async fn settle(&self, write: impl FnOnce(&mut S)) -> bool {
        match self.state.upgrade() {
            Some(state) => {
                let mut guard = state.lock().await;
                write(&mut guard);
                true
            }
            None => {
                debug!("State dropped before settlement, discarding result");
                false
            }
        }
    }
}
