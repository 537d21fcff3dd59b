// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Boundary with the external wallet signer and ledger.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::PaymentError;

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// A single native-token transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSpec {
    pub from: String,
    pub to: String,
    pub lamports: u64,
}

/// Ledger transaction signature
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(pub String);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The user's wallet: signs, submits and tracks transfers
#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign_and_send(&self, transfer: &TransferSpec) -> Result<Signature, PaymentError>;
    /// Resolves once the transaction is confirmed on the ledger
    async fn confirm(&self, signature: &Signature) -> Result<(), PaymentError>;
}

/// Send `transfer` and wait for confirmation
pub async fn pay(signer: &dyn Signer, transfer: &TransferSpec) -> Result<Signature, PaymentError> {
    if transfer.to.trim().is_empty() {
        return Err(PaymentError::InvalidRecipient(transfer.to.clone()));
    }

    debug!(
        "Requesting transfer of {} lamports from {} to {}",
        transfer.lamports, transfer.from, transfer.to
    );
    let signature = signer.sign_and_send(transfer).await.map_err(|e| {
        warn!("Transfer from {} was not sent: {}", transfer.from, e);
        e
    })?;

    signer.confirm(&signature).await.map_err(|e| {
        warn!("Transaction {} failed confirmation: {}", signature, e);
        e
    })?;

    info!("Transaction {} confirmed", signature);
    Ok(signature)
}

/// Convert SOL to lamports, rounding to the nearest lamport
pub fn sol_to_lamports(sol: f64) -> u64 {
    if !sol.is_finite() || sol <= 0.0 {
        return 0;
    }
    (sol * LAMPORTS_PER_SOL as f64).round() as u64
}
