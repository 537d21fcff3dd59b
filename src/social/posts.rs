// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Paid post submission: the platform fee is settled on the ledger before
//! the post row is written.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::config::PaymentConfig;
use crate::error::SubmissionError;
use crate::identity::IdentityResolver;
use crate::models::{NewPost, Post, PostDraft, POST_MAX_LENGTH};
use crate::payment::{self, Signature, Signer, TransferSpec};
use crate::store::Store;

#[derive(Debug, Clone, Serialize)]
pub struct SubmittedPost {
    pub post: Post,
    pub signature: Signature,
}

pub struct PostComposer {
    store: Arc<dyn Store>,
    identity: IdentityResolver,
    signer: Arc<dyn Signer>,
    payments: PaymentConfig,
}

impl PostComposer {
    pub fn new(store: Arc<dyn Store>, signer: Arc<dyn Signer>, payments: PaymentConfig) -> Self {
        Self {
            identity: IdentityResolver::new(store.clone()),
            store,
            signer,
            payments,
        }
    }

    pub async fn submit_post(
        &self,
        wallet: &str,
        draft: PostDraft,
    ) -> Result<SubmittedPost, SubmissionError> {
        let content = draft.content.trim();
        if content.is_empty() {
            return Err(SubmissionError::EmptyContent);
        }
        if content.chars().count() > POST_MAX_LENGTH {
            return Err(SubmissionError::TooLong { max: POST_MAX_LENGTH });
        }

        let fee = TransferSpec {
            from: wallet.to_string(),
            to: self.payments.platform_fee_address.clone(),
            lamports: self.payments.platform_fee_lamports,
        };
        let signature = payment::pay(self.signer.as_ref(), &fee).await?;

        let user_id = self.identity.ensure_user(wallet).await.map_err(|source| {
            error!("Fee {} was paid but the author could not be resolved: {}", signature, source);
            SubmissionError::Identity {
                signature: signature.to_string(),
                source,
            }
        })?;
        let links = draft.links.normalized();
        let new_post = NewPost {
            user_id,
            content: content.to_string(),
            twitter_embed: links.twitter_embed,
            website: links.website,
            facebook: links.facebook,
            telegram: links.telegram,
        };

        let post = self.store.insert_post(new_post).await.map_err(|source| {
            error!("Fee {} was paid but post could not be saved: {}", signature, source);
            SubmissionError::Save {
                signature: signature.to_string(),
                source,
            }
        })?;

        info!("Published post {} (fee tx {})", post.id, signature);
        Ok(SubmittedPost { post, signature })
    }
}
