// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use super::is_sponsored_id;
use crate::error::{StoreError, TipError};
use crate::identity::IdentityResolver;
use crate::models::{NewTip, Tip};
use crate::payment::{self, sol_to_lamports, Signer, TransferSpec};
use crate::store::Store;

pub const MIN_TIP_SOL: f64 = 0.001;

#[derive(Debug, Clone, Serialize)]
pub struct SentTip {
    pub tip: Tip,
    pub amount_sol: f64,
}

/// Direct transfers from a reader to a post's author
pub struct TipJar {
    store: Arc<dyn Store>,
    identity: IdentityResolver,
    signer: Arc<dyn Signer>,
}

impl TipJar {
    pub fn new(store: Arc<dyn Store>, signer: Arc<dyn Signer>) -> Self {
        Self {
            identity: IdentityResolver::new(store.clone()),
            store,
            signer,
        }
    }

    pub async fn send_tip(
        &self,
        post_id: &str,
        sender_wallet: &str,
        amount_sol: f64,
    ) -> Result<SentTip, TipError> {
        if amount_sol.is_nan() || amount_sol <= 0.0 {
            return Err(TipError::NonPositive);
        }
        if amount_sol < MIN_TIP_SOL {
            return Err(TipError::BelowMinimum { min_sol: MIN_TIP_SOL });
        }
        if is_sponsored_id(post_id) {
            return Err(TipError::Sponsored);
        }

        let recipient = self.author_wallet(post_id).await?;
        let sender_id = self.identity.ensure_user(sender_wallet).await?;

        let lamports = sol_to_lamports(amount_sol);
        let transfer = TransferSpec {
            from: sender_wallet.to_string(),
            to: recipient.clone(),
            lamports,
        };
        let signature = payment::pay(self.signer.as_ref(), &transfer).await?;

        let tip = self
            .store
            .insert_tip(NewTip {
                post_id: post_id.to_string(),
                sender_id,
                recipient_wallet: recipient,
                amount_lamports: i64::try_from(lamports).unwrap_or(i64::MAX),
                signature: signature.to_string(),
            })
            .await
            .map_err(|e| {
                error!("Tip {} confirmed but not recorded: {}", signature, e);
                TipError::Store(e)
            })?;

        info!("Recorded tip of {} SOL on post {} ({})", amount_sol, post_id, signature);
        Ok(SentTip { tip, amount_sol })
    }

    async fn author_wallet(&self, post_id: &str) -> Result<String, TipError> {
        let post = self
            .store
            .find_post(post_id)
            .await?
            .ok_or(TipError::UnknownAuthor)?;
        match self.store.find_user(&post.user_id).await {
            Ok(Some(author)) => Ok(author.wallet_address),
            Ok(None) | Err(StoreError::NotFound) => Err(TipError::UnknownAuthor),
            Err(e) => Err(TipError::Store(e)),
        }
    }
}
