// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use crate::schema::tips;

use super::{PostId, UserId};

/// A confirmed tip transfer recorded against a post
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = tips)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Tip {
    pub id: String,
    pub post_id: PostId,
    pub sender_id: UserId,
    pub recipient_wallet: String,
    pub amount_lamports: i64,
    /// Ledger transaction signature
    pub signature: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = tips)]
pub struct NewTip {
    pub post_id: PostId,
    pub sender_id: UserId,
    pub recipient_wallet: String,
    pub amount_lamports: i64,
    pub signature: String,
}
