use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infrastructure::postgres::schema::session_tokens;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = session_tokens)]
pub struct SessionTokenEntity {
    pub id: i64,
    pub account_id: i64,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = session_tokens)]
pub struct UpsertSessionTokenEntity {
    pub account_id: i64,
    pub token: String,
    pub created_at: DateTime<Utc>,
}
