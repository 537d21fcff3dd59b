// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

// Import diesel table macros
use diesel::table;
use diesel::allow_tables_to_appear_in_same_query;
use diesel::joinable;

// Wallet-backed identities
table! {
    users (id) {
        id -> Text,
        wallet_address -> Varchar,
        created_at -> Timestamptz,
    }
}

// Organic posts submitted through the paid flow
table! {
    posts (id) {
        id -> Text,
        user_id -> Text,
        content -> Varchar,
        twitter_embed -> Nullable<Varchar>,
        website -> Nullable<Varchar>,
        facebook -> Nullable<Varchar>,
        telegram -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

// Emoji reactions, unique on (post_id, user_id, emoji_type)
table! {
    likes (id) {
        id -> Text,
        post_id -> Text,
        user_id -> Text,
        emoji_type -> Varchar,
        created_at -> Timestamptz,
    }
}

table! {
    comments (id) {
        id -> Text,
        post_id -> Text,
        user_id -> Text,
        content -> Varchar,
        created_at -> Timestamptz,
    }
}

// Sponsored content
table! {
    adtweet (id) {
        id -> Text,
        content -> Varchar,
        twitter_embed -> Nullable<Varchar>,
        website -> Nullable<Varchar>,
        facebook -> Nullable<Varchar>,
        telegram -> Nullable<Varchar>,
        sponsor_name -> Varchar,
        priority -> Integer,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

table! {
    tips (id) {
        id -> Text,
        post_id -> Text,
        sender_id -> Text,
        recipient_wallet -> Varchar,
        amount_lamports -> Bigint,
        signature -> Varchar,
        created_at -> Timestamptz,
    }
}

joinable!(posts -> users (user_id));
joinable!(likes -> posts (post_id));
joinable!(comments -> posts (post_id));
joinable!(tips -> posts (post_id));

allow_tables_to_appear_in_same_query!(
    users,
    posts,
    likes,
    comments,
    adtweet,
    tips,
);
