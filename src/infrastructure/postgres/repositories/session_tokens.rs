use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::entities::accounts::AccountEntity;
use crate::domain::entities::session_tokens::{SessionTokenEntity, UpsertSessionTokenEntity};
use crate::domain::repositories::session_tokens::SessionTokenRepository;
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{accounts, session_tokens},
};

pub struct SessionTokenPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SessionTokenPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SessionTokenRepository for SessionTokenPostgres {
    async fn find_by_token(
        &self,
        token: String,
    ) -> Result<Option<(SessionTokenEntity, AccountEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = session_tokens::table
            .inner_join(accounts::table)
            .filter(session_tokens::token.eq(token))
            .select((SessionTokenEntity::as_select(), AccountEntity::as_select()))
            .first::<(SessionTokenEntity, AccountEntity)>(&mut conn)
            .optional()?;

        Ok(row)
    }

    async fn upsert_for_account(&self, entity: UpsertSessionTokenEntity) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        diesel::insert_into(session_tokens::table)
            .values(&entity)
            .on_conflict(session_tokens::account_id)
            .do_update()
            .set((
                session_tokens::token.eq(&entity.token),
                session_tokens::created_at.eq(entity.created_at),
            ))
            .execute(&mut conn)?;

        Ok(())
    }
}
