use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::accounts::AccountEntity;
use crate::domain::entities::session_tokens::{SessionTokenEntity, UpsertSessionTokenEntity};

#[async_trait]
#[automock]
pub trait SessionTokenRepository {
    async fn find_by_token(
        &self,
        token: String,
    ) -> Result<Option<(SessionTokenEntity, AccountEntity)>>;

    /// Write the account's session row, replacing any previous token.
    async fn upsert_for_account(&self, entity: UpsertSessionTokenEntity) -> Result<()>;
}
