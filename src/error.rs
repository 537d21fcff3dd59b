// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Failures reported by a [`Store`](crate::store::Store) backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A unique constraint rejected the insert
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("record not found")]
    NotFound,
    #[error("database connection error: {0}")]
    Connection(String),
    #[error("database error: {0}")]
    Backend(String),
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::UniqueViolation(info.message().to_string())
            }
            Error::NotFound => StoreError::NotFound,
            other => StoreError::Backend(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("wallet address is empty")]
    EmptyWallet,
    #[error("could not resolve user for wallet {wallet}: {source}")]
    Unresolved {
        wallet: String,
        #[source]
        source: StoreError,
    },
}

#[derive(Debug, Error)]
pub enum ReactionError {
    /// The remote insert or delete failed; the optimistic change was rolled back
    #[error("failed to update reaction: {0}")]
    RemoteMutationFailure(#[source] StoreError),
    #[error("a reaction update is already in flight for this control")]
    InFlight,
    #[error("sponsored posts cannot be reacted to")]
    Sponsored,
    #[error("post {0} is not in the feed")]
    UnknownPost(String),
    #[error("the feed view was dropped before the reaction settled")]
    Detached,
    #[error("wallet not connected")]
    WalletNotConnected,
}

#[derive(Debug, Error)]
pub enum FeedError {
    /// Every organic query failed
    #[error("feed unavailable: {0}")]
    Unavailable(#[source] StoreError),
}

/// Failures at the boundary with the external signer and ledger.
///
/// The variants are kept distinct because the user's recourse differs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("transaction was cancelled in the wallet")]
    UserRejected,
    #[error("insufficient balance for transfer and fee")]
    InsufficientFunds,
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid recipient address: {0}")]
    InvalidRecipient(String),
    #[error("transaction {0} was not confirmed")]
    Unconfirmed(String),
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("post content is required")]
    EmptyContent,
    #[error("post content exceeds {max} characters")]
    TooLong { max: usize },
    #[error(transparent)]
    Payment(#[from] PaymentError),
    /// Payment went through but the author could not be resolved
    #[error("payment {signature} confirmed but resolving the author failed: {source}")]
    Identity {
        signature: String,
        #[source]
        source: IdentityError,
    },
    /// Payment went through but the post row could not be written
    #[error("payment {signature} confirmed but saving the post failed: {source}")]
    Save {
        signature: String,
        #[source]
        source: StoreError,
    },
}

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("comment content is required")]
    EmptyContent,
    #[error("comment exceeds {max} characters")]
    TooLong { max: usize },
    #[error("sponsored posts do not accept comments")]
    Sponsored,
    #[error("wallet not connected")]
    WalletNotConnected,
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("comment store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum TipError {
    #[error("tip amount must be greater than 0")]
    NonPositive,
    #[error("minimum tip amount is {min_sol} SOL")]
    BelowMinimum { min_sol: f64 },
    #[error("sponsored posts cannot be tipped")]
    Sponsored,
    #[error("post author could not be found")]
    UnknownAuthor,
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("tip store error: {0}")]
    Store(#[from] StoreError),
}
