// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Wallet address to internal user id resolution.
//!
//! Every reaction and comment write is keyed by the resolved user id,
//! never by the raw wallet address.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{IdentityError, StoreError};
use crate::models::UserId;
use crate::store::Store;

#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn Store>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Resolve an existing user without creating one
    pub async fn lookup(&self, wallet: &str) -> Result<Option<UserId>, IdentityError> {
        let wallet = normalize(wallet)?;
        self.store
            .find_user_by_wallet(wallet)
            .await
            .map(|user| user.map(|u| u.id))
            .map_err(|source| IdentityError::Unresolved {
                wallet: wallet.to_string(),
                source,
            })
    }

    /// Return the user id for `wallet`, creating the user on first sight.
    ///
    /// Safe to race with other clients: a unique violation on insert means
    /// someone else created the row, so it is read back instead.
    pub async fn ensure_user(&self, wallet: &str) -> Result<UserId, IdentityError> {
        let wallet = normalize(wallet)?;

        match self.store.find_user_by_wallet(wallet).await {
            Ok(Some(user)) => return Ok(user.id),
            Ok(None) => {}
            Err(e) => warn!("User lookup for {} failed, attempting insert: {}", wallet, e),
        }

        match self.store.insert_user(wallet).await {
            Ok(user) => {
                info!("Created user {} for wallet {}", user.id, wallet);
                Ok(user.id)
            }
            Err(StoreError::UniqueViolation(constraint)) => {
                debug!("User for {} created concurrently ({}), re-querying", wallet, constraint);
                self.requery(wallet).await
            }
            Err(e) => {
                warn!("User insert for {} failed, re-querying: {}", wallet, e);
                self.requery(wallet).await
            }
        }
    }

    async fn requery(&self, wallet: &str) -> Result<UserId, IdentityError> {
        match self.store.find_user_by_wallet(wallet).await {
            Ok(Some(user)) => Ok(user.id),
            Ok(None) => Err(IdentityError::Unresolved {
                wallet: wallet.to_string(),
                source: StoreError::NotFound,
            }),
            Err(source) => Err(IdentityError::Unresolved {
                wallet: wallet.to_string(),
                source,
            }),
        }
    }
}

fn normalize(wallet: &str) -> Result<&str, IdentityError> {
    let wallet = wallet.trim();
    if wallet.is_empty() {
        return Err(IdentityError::EmptyWallet);
    }
    Ok(wallet)
}
